//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components. It owns
//! the account table, the filter controls, the modal stack and the services
//! (dispatcher, store, exporter, clipboard) the actions talk to.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_accounts_screen, AccountDetailDialog, AccountFormDialog, AccountsComponent,
    AccountsRenderContext, AnalyticsDialog, ChoiceDialog, ConfirmDialog, HelpDialog,
    ImportDialog, ImportReportDialog, SettingsDialog,
};
use crate::model::form::FormMode;
use crate::model::import::ImportMode;
use crate::model::toast::TOAST_DURATION;
use crate::model::{
    AccountForm, AccountRecord, AccountTable, Analytics, Category, ChoiceKind, ConfirmKind,
    ExportFormat, FilterCriteria, ImportReport, MaintenanceEntry, Modal,
    ModalStack, Scheduler, Settings, SortKey, StatsCounters, Status, ToastLevel, ToastQueue,
};
use crate::services::export::ExportError;
use crate::services::report;
use crate::services::{
    generate_password, load_inventory, AnalyticsUse, ApiPayload, ApiReply, ApiRequest,
    ClipboardSink, Dispatcher, Exporter, ReportUse, SessionStore,
};
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Delay between a successful maintenance task and the table reload
const RELOAD_AFTER_MAINTENANCE: Duration = Duration::from_secs(1);

const CREDENTIALS_HIDDEN: &str = "The server hides credentials for this account";

/// Deferred work run from the tick
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduledTask {
    DismissToast(u64),
    ReloadAccounts,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Set when a notification should ring the terminal bell; taken by the main loop
    pub pending_bell: bool,

    pub table: AccountTable,
    pub criteria: FilterCriteria,
    pub modals: ModalStack,
    pub toasts: ToastQueue,
    pub scheduler: Scheduler<ScheduledTask>,
    pub counters: StatsCounters,
    pub settings: Settings,

    /// Service names for the quick filter, from the server when reachable
    pub services: Vec<String>,
    /// Latest analytics snapshot
    pub analytics: Option<Analytics>,
    /// Latest import report
    pub import_report: Option<ImportReport>,

    /// Shown in the header: server URL or inventory file
    pub source: String,
    /// Inventory file re-read on reload when offline
    pub inventory_path: Option<PathBuf>,

    store: SessionStore,
    dispatcher: Dispatcher,
    exporter: Exporter,
    clipboard: Box<dyn ClipboardSink>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub accounts: AccountsComponent,
    pub confirm_dialog: ConfirmDialog,
    pub choice_dialog: ChoiceDialog,
    pub account_detail: AccountDetailDialog,
    pub account_form: AccountFormDialog,
    pub import_dialog: ImportDialog,
    pub analytics_dialog: AnalyticsDialog,
    pub import_report_dialog: ImportReportDialog,
    pub settings_dialog: SettingsDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(
        dispatcher: Dispatcher,
        store: SessionStore,
        exporter: Exporter,
        clipboard: Box<dyn ClipboardSink>,
    ) -> App {
        App {
            should_quit: false,
            pending_bell: false,
            table: AccountTable::from_records(Vec::new()),
            criteria: FilterCriteria::default(),
            modals: ModalStack::new(),
            toasts: ToastQueue::new(),
            scheduler: Scheduler::new(),
            counters: StatsCounters::default(),
            settings: Settings::default(),
            services: Vec::new(),
            analytics: None,
            import_report: None,
            source: String::new(),
            inventory_path: None,
            store,
            dispatcher,
            exporter,
            clipboard,
            // Components
            accounts: AccountsComponent::new(),
            confirm_dialog: ConfirmDialog::default(),
            choice_dialog: ChoiceDialog::new(),
            account_detail: AccountDetailDialog::default(),
            account_form: AccountFormDialog::default(),
            import_dialog: ImportDialog::default(),
            analytics_dialog: AnalyticsDialog::default(),
            import_report_dialog: ImportReportDialog::default(),
            settings_dialog: SettingsDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    /// Start with rows already loaded (inventory file)
    pub fn with_records(mut self, records: Vec<AccountRecord>) -> Self {
        self.table = AccountTable::from_records(records);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_inventory_path(mut self, path: Option<PathBuf>) -> Self {
        self.inventory_path = path;
        self
    }

    pub fn is_online(&self) -> bool {
        self.dispatcher.is_online()
    }

    /// Show a toast and schedule its dismissal
    pub fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        debug!(?level, %message, "toast");
        let id = self.toasts.push(level, message);
        self.scheduler
            .schedule(Instant::now(), TOAST_DURATION, ScheduledTask::DismissToast(id));
        if self.settings.sound_notif && matches!(level, ToastLevel::Warning | ToastLevel::Danger) {
            self.pending_bell = true;
        }
    }

    /// Re-run the filter after the rows or the controls changed
    fn refresh_table(&mut self) {
        self.table.apply_filters(&self.criteria);
        self.accounts.clamp(self.table.visible_records().len());
    }

    fn restart_counters(&mut self) {
        self.counters = StatsCounters::start(&self.table.stats(), self.settings.animations);
    }

    fn visible_len(&self) -> usize {
        self.table.visible_records().len()
    }

    fn copy_to_clipboard(&mut self, text: &str, done: &str) {
        match self.clipboard.set_text(text) {
            Ok(()) => self.notify(ToastLevel::Success, done),
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.notify(ToastLevel::Danger, format!("Copy failed: {}", e));
            }
        }
    }

    fn report_export(&mut self, what: &str, result: Result<PathBuf, ExportError>) {
        match result {
            Ok(path) => self.notify(
                ToastLevel::Success,
                format!("{} saved to {}", what, path.display()),
            ),
            Err(e) => {
                warn!(error = %e, "export failed");
                self.notify(ToastLevel::Danger, format!("Export failed: {}", e));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    fn reload_accounts(&mut self) {
        if self.is_online() {
            self.dispatcher.dispatch(ApiRequest::LoadAccounts);
            return;
        }

        let Some(path) = self.inventory_path.clone() else {
            self.notify(ToastLevel::Info, "Offline: nothing to reload");
            return;
        };
        match load_inventory(&path) {
            Ok(records) => {
                let count = records.len();
                self.table.replace_records(records);
                self.refresh_table();
                self.restart_counters();
                self.notify(ToastLevel::Success, format!("Reloaded {} account(s)", count));
            }
            Err(e) => {
                warn!(error = %e, "inventory reload failed");
                self.notify(ToastLevel::Danger, e.to_string());
            }
        }
    }

    /// Service names for the quick filter
    fn quick_services(&self) -> Vec<String> {
        if self.services.is_empty() {
            self.table.service_names()
        } else {
            self.services.clone()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replies from the server
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_reply(&mut self, reply: ApiReply) {
        let ApiReply { request, result } = reply;
        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                warn!(request = %request.describe(), error = %e, "request failed");
                if request == ApiRequest::LoadServices {
                    self.services = self.table.service_names();
                }
                self.notify(
                    ToastLevel::Danger,
                    format!("Failed to {}: {}", request.describe(), e),
                );
                return;
            }
        };

        match (request, payload) {
            (_, ApiPayload::Accounts(records)) => {
                info!(count = records.len(), "accounts loaded");
                self.table.replace_records(records);
                self.refresh_table();
                self.restart_counters();
            }
            (_, ApiPayload::Services(services)) => {
                self.services = services;
            }
            (ApiRequest::Analytics(usage), ApiPayload::Analytics(analytics)) => {
                self.use_analytics(usage, analytics);
            }
            (ApiRequest::ImportReport(usage), ApiPayload::ImportReport(import_report)) => {
                if usage == ReportUse::Copy {
                    let text = report::import_report_text(&import_report);
                    self.copy_to_clipboard(&text, "Import report copied");
                }
                self.import_report = Some(import_report);
            }
            (ApiRequest::Maintenance(task), ApiPayload::Removed(removed)) => {
                self.notify(
                    ToastLevel::Success,
                    format!("{}: removed {} account(s)", task.label(), removed),
                );
                // A newer maintenance reply supersedes a reload still waiting
                self.scheduler
                    .cancel_where(|t| *t == ScheduledTask::ReloadAccounts);
                self.scheduler.schedule(
                    Instant::now(),
                    RELOAD_AFTER_MAINTENANCE,
                    ScheduledTask::ReloadAccounts,
                );
            }
            (ApiRequest::AddAccount(_), ApiPayload::Submitted(outcome)) => {
                match self.store.on_navigation(outcome.query()) {
                    Ok(cleared) => debug!(cleared, "draft after add"),
                    Err(e) => warn!(error = %e, "failed to clear draft"),
                }
                self.modals.remove_where(|m| *m == Modal::AccountForm);
                self.notify(ToastLevel::Success, "Account added");
                self.reload_accounts();
            }
            (ApiRequest::EditAccount(_), ApiPayload::Submitted(_)) => {
                self.modals.remove_where(|m| *m == Modal::AccountForm);
                self.notify(ToastLevel::Success, "Account updated");
                self.reload_accounts();
            }
            (ApiRequest::ImportAccounts(_), ApiPayload::Submitted(_)) => {
                self.modals.remove_where(|m| *m == Modal::Import);
                self.notify(ToastLevel::Success, "Import sent to the server");
                self.reload_accounts();
            }
            (ApiRequest::ImportBulkEmails(_), ApiPayload::Submitted(_)) => {
                self.modals.remove_where(|m| *m == Modal::Import);
                self.notify(
                    ToastLevel::Success,
                    "Emails imported, press I for the import report",
                );
                self.reload_accounts();
            }
            (ApiRequest::DeleteAccount(id), ApiPayload::Submitted(_)) => {
                debug!(%id, "account deleted on server");
            }
            (request, payload) => {
                warn!(request = %request.describe(), ?payload, "unexpected reply");
            }
        }
    }

    fn use_analytics(&mut self, usage: AnalyticsUse, analytics: Analytics) {
        match usage {
            AnalyticsUse::Show => {}
            AnalyticsUse::ExportCsv => {
                let result = self.exporter.analytics_csv(&analytics);
                self.report_export("Analytics CSV", result);
            }
            AnalyticsUse::HtmlReport => {
                let result = self.exporter.analytics_html(&analytics, Utc::now());
                self.report_export("Analytics report", result);
            }
        }
        self.analytics_dialog.set_analytics(Some(&analytics));
        self.analytics = Some(analytics);
    }

    /// Time-based work: server replies, due tasks and counter frames
    fn on_tick(&mut self, now: Instant) {
        for reply in self.dispatcher.poll() {
            self.handle_reply(reply);
        }
        for task in self.scheduler.drain_due(now) {
            self.run_scheduled(task);
        }
        self.counters.tick();
    }

    fn run_scheduled(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::DismissToast(id) => {
                self.toasts.dismiss(id);
            }
            ScheduledTask::ReloadAccounts => self.reload_accounts(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Choices
    // ─────────────────────────────────────────────────────────────────────────

    /// Entries of a choice list and the index of the active one
    fn choice_options(&self, kind: ChoiceKind) -> (Vec<String>, Option<usize>) {
        let with_all = |labels: Vec<String>, current: Option<usize>| {
            let mut options = vec!["All".to_string()];
            options.extend(labels);
            (options, Some(current.map_or(0, |i| i + 1)))
        };

        match kind {
            ChoiceKind::Category => {
                let categories = Category::known();
                let current = self
                    .criteria
                    .category
                    .as_ref()
                    .and_then(|c| categories.iter().position(|k| k == c));
                with_all(categories.iter().map(|c| c.to_string()).collect(), current)
            }
            ChoiceKind::Status => {
                let statuses = Status::all();
                let current = self
                    .criteria
                    .status
                    .and_then(|s| statuses.iter().position(|k| *k == s));
                with_all(
                    statuses.iter().map(|s| s.label().to_string()).collect(),
                    current,
                )
            }
            ChoiceKind::Sort => {
                let keys = SortKey::all();
                let current = keys.iter().position(|k| *k == self.criteria.sort);
                (keys.iter().map(|k| k.label().to_string()).collect(), current)
            }
            ChoiceKind::QuickService => {
                let services = self.quick_services();
                let current = services.iter().position(|s| *s == self.criteria.search);
                (services, current)
            }
            ChoiceKind::Maintenance => (
                MaintenanceEntry::all()
                    .iter()
                    .map(|e| e.label().to_string())
                    .collect(),
                None,
            ),
            ChoiceKind::Export => (
                ExportFormat::all()
                    .iter()
                    .map(|f| f.label().to_string())
                    .collect(),
                None,
            ),
        }
    }

    fn apply_choice(&mut self, kind: ChoiceKind, index: usize) -> Option<Action> {
        match kind {
            ChoiceKind::Category => {
                self.criteria.category = index
                    .checked_sub(1)
                    .and_then(|i| Category::known().get(i).cloned());
                self.refresh_table();
            }
            ChoiceKind::Status => {
                self.criteria.status = index
                    .checked_sub(1)
                    .and_then(|i| Status::all().get(i).copied());
                self.refresh_table();
            }
            ChoiceKind::Sort => {
                if let Some(key) = SortKey::all().get(index) {
                    self.criteria.sort = *key;
                    self.refresh_table();
                }
            }
            ChoiceKind::QuickService => {
                if let Some(service) = self.choice_dialog.options.get(index).cloned() {
                    self.criteria.search = service;
                    self.refresh_table();
                }
            }
            ChoiceKind::Maintenance => {
                return match MaintenanceEntry::all().get(index) {
                    Some(MaintenanceEntry::Server(task)) => Some(Action::RequestMaintenance(*task)),
                    Some(MaintenanceEntry::ResetCounters) => Some(Action::ResetCounters),
                    Some(MaintenanceEntry::ClearCache) => Some(Action::RequestClearCache),
                    None => None,
                };
            }
            ChoiceKind::Export => {
                return ExportFormat::all().get(index).map(|f| Action::Export(*f));
            }
        }
        None
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Confirmed actions
    // ─────────────────────────────────────────────────────────────────────────

    fn confirm(&mut self, kind: ConfirmKind) {
        match kind {
            ConfirmKind::Quit => self.should_quit = true,
            ConfirmKind::BulkDelete { ids } => self.delete_accounts(ids),
            ConfirmKind::Maintenance(task) => {
                self.dispatcher.dispatch(ApiRequest::Maintenance(task));
                self.notify(ToastLevel::Info, format!("Running {}…", task.label()));
            }
            ConfirmKind::ClearCache => match self.store.clear_all() {
                Ok(()) => {
                    self.settings = Settings::default();
                    self.notify(ToastLevel::Success, "Local cache cleared");
                }
                Err(e) => {
                    warn!(error = %e, "failed to clear cache");
                    self.notify(ToastLevel::Danger, format!("Clear cache failed: {}", e));
                }
            },
        }
    }

    fn delete_accounts(&mut self, ids: Vec<String>) {
        let doomed: HashSet<String> = ids.iter().cloned().collect();
        let removed = self.table.remove(&doomed);
        self.modals
            .remove_where(|m| matches!(m, Modal::AccountDetail { id } if doomed.contains(id)));

        if self.is_online() {
            for id in ids {
                self.dispatcher.dispatch(ApiRequest::DeleteAccount(id));
            }
        }

        info!(removed, "bulk delete");
        self.refresh_table();
        self.restart_counters();
        self.notify(ToastLevel::Success, format!("Deleted {} account(s)", removed));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form
    // ─────────────────────────────────────────────────────────────────────────

    fn open_add_form(&mut self) {
        let form = self
            .store
            .load_draft()
            .map(|draft| AccountForm::from_draft(&draft))
            .unwrap_or_else(AccountForm::new_add);
        self.account_form.open(form);
        self.modals.push(Modal::AccountForm);
    }

    fn submit_form(&mut self) {
        if !self.account_form.form.check() {
            return;
        }
        let params = self.account_form.form.to_params();

        match self.account_form.form.mode.clone() {
            FormMode::Add if self.is_online() => {
                self.dispatcher.dispatch(ApiRequest::AddAccount(params));
                self.notify(ToastLevel::Info, "Adding account…");
            }
            FormMode::Add => {
                self.notify(
                    ToastLevel::Warning,
                    "Adding accounts needs the server; the draft is kept",
                );
            }
            FormMode::Edit { .. } if self.is_online() => {
                self.dispatcher.dispatch(ApiRequest::EditAccount(params));
                self.notify(ToastLevel::Info, "Saving account…");
            }
            FormMode::Edit { account_id } => {
                let Some(original) = self.table.get(&account_id).cloned() else {
                    self.notify(ToastLevel::Warning, "This account is no longer in the table");
                    return;
                };
                let edited = self.account_form.form.edited_record(&original);
                self.table.update_record(edited);
                self.refresh_table();
                self.restart_counters();
                self.modals.remove_where(|m| *m == Modal::AccountForm);
                self.notify(ToastLevel::Success, "Account updated locally");
            }
        }
    }

    fn submit_import(&mut self) {
        if !self.import_dialog.form.check() {
            return;
        }
        if !self.is_online() {
            self.notify(ToastLevel::Warning, "Importing accounts needs the server");
            return;
        }
        let form = &self.import_dialog.form;
        let request = match form.mode {
            ImportMode::Accounts => ApiRequest::ImportAccounts(form.to_params()),
            ImportMode::BulkEmails => ApiRequest::ImportBulkEmails(form.to_params()),
        };
        self.dispatcher.dispatch(request);
        self.notify(ToastLevel::Info, "Importing…");
    }

    fn export(&mut self, format: ExportFormat) {
        let now = Utc::now();
        match format {
            ExportFormat::AccountsCsv => {
                let result = self.exporter.accounts_csv(self.table.visible_records(), now);
                self.report_export("Accounts CSV", result);
            }
            ExportFormat::Backup if self.table.records().any(|r| r.redacted) => {
                self.notify(
                    ToastLevel::Warning,
                    "A backup needs credentials, which the server hides",
                );
            }
            ExportFormat::Backup => {
                let result = self.exporter.backup(self.table.records(), now);
                self.report_export("Backup", result);
            }
            ExportFormat::AnalyticsCsv | ExportFormat::AnalyticsHtml => {
                let usage = if format == ExportFormat::AnalyticsCsv {
                    AnalyticsUse::ExportCsv
                } else {
                    AnalyticsUse::HtmlReport
                };
                if self.is_online() {
                    self.dispatcher.dispatch(ApiRequest::Analytics(usage));
                } else {
                    let analytics = Analytics::from_records(self.table.records());
                    self.use_analytics(usage, analytics);
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.settings = self.store.load_settings();
        self.refresh_table();
        self.restart_counters();

        if self.is_online() {
            self.dispatcher.dispatch(ApiRequest::LoadAccounts);
            self.dispatcher.dispatch(ApiRequest::LoadServices);
        } else {
            self.services = self.table.service_names();
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else if self.accounts.search_mode {
            self.handle_search_key_event(key)
        } else {
            self.accounts.handle_key_event(key)
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.on_tick(Instant::now()),
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation (delegate to AccountsComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => self.accounts.next(self.visible_len()),
            Action::PrevItem => self.accounts.previous(self.visible_len()),
            Action::FirstItem => self.accounts.select_first(self.visible_len()),
            Action::LastItem => self.accounts.select_last(self.visible_len()),
            Action::PageDown => self.accounts.page_down(self.visible_len()),
            Action::PageUp => self.accounts.page_up(self.visible_len()),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.confirm_dialog.set(ConfirmKind::Quit, Vec::new());
                self.modals.push(Modal::Confirm(ConfirmKind::Quit));
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::OpenChoice(kind) => {
                let (options, current) = self.choice_options(kind);
                self.choice_dialog.set_options(kind, options, current);
                self.modals.push(Modal::Choice { kind });
            }
            Action::OpenAccountDetail => {
                if let Some(id) = self.accounts.selected_id(&self.table) {
                    self.account_detail.open(&id);
                    self.modals.push(Modal::AccountDetail { id });
                }
            }
            Action::OpenAddForm => self.open_add_form(),
            Action::OpenEditForm(id) => match self.table.get(&id) {
                Some(record) => {
                    let form = AccountForm::for_record(record);
                    self.account_form.open(form);
                    self.modals.push(Modal::AccountForm);
                }
                None => self.notify(ToastLevel::Warning, "This account is no longer in the table"),
            },
            Action::OpenImport => {
                if self.is_online() {
                    self.import_dialog.open();
                    self.modals.push(Modal::Import);
                } else {
                    self.notify(ToastLevel::Warning, "Importing accounts needs the server");
                }
            }
            Action::OpenAnalytics => {
                if self.is_online() {
                    self.dispatcher
                        .dispatch(ApiRequest::Analytics(AnalyticsUse::Show));
                } else {
                    self.analytics = Some(Analytics::from_records(self.table.records()));
                }
                self.analytics_dialog.set_analytics(self.analytics.as_ref());
                self.modals.push(Modal::Analytics);
            }
            Action::OpenImportReport => {
                if self.is_online() {
                    self.dispatcher
                        .dispatch(ApiRequest::ImportReport(ReportUse::Show));
                    self.import_report_dialog.scroll_offset = 0;
                    self.modals.push(Modal::ImportReport { scroll_offset: 0 });
                } else {
                    self.notify(ToastLevel::Warning, "The import report needs the server");
                }
            }
            Action::OpenSettings => {
                self.settings_dialog.open(self.settings);
                self.modals.push(Modal::Settings);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(Modal::Confirm(kind)) = self.modals.top().cloned() {
                    self.modals.pop();
                    self.confirm(kind);
                }
            }
            Action::ChooseOption(index) => {
                if let Some(Modal::Choice { kind }) = self.modals.top().cloned() {
                    self.modals.pop();
                    return Ok(self.apply_choice(kind, index));
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Search & Filters
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode => self.accounts.search_mode = true,
            Action::ExitSearchMode => self.accounts.search_mode = false,
            Action::SearchInput(c) => {
                self.criteria.search.push(c);
                self.refresh_table();
            }
            Action::SearchBackspace => {
                self.criteria.search.pop();
                self.refresh_table();
            }
            Action::ClearFilters => {
                self.criteria.clear();
                self.refresh_table();
                self.notify(ToastLevel::Info, "Filters cleared");
            }

            // ─────────────────────────────────────────────────────────────────
            // Selection
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleRowSelection => {
                if let Some(id) = self.accounts.selected_id(&self.table) {
                    self.table.toggle_row(&id);
                }
            }
            Action::ToggleSelectAll => self.table.flip_all(),
            Action::ClearSelection => self.table.toggle_all(false),

            // ─────────────────────────────────────────────────────────────────
            // Clipboard
            // ─────────────────────────────────────────────────────────────────
            Action::CopyCredentials(id) => match self.table.get(&id) {
                Some(record) if record.redacted => {
                    self.notify(ToastLevel::Warning, CREDENTIALS_HIDDEN);
                }
                Some(record) => {
                    let text = record.credentials();
                    self.copy_to_clipboard(&text, "Credentials copied");
                }
                None => {}
            },
            Action::CopyDetails(id) => match self.table.get(&id) {
                Some(record) if record.redacted => {
                    self.notify(ToastLevel::Warning, CREDENTIALS_HIDDEN);
                }
                Some(record) => {
                    let text = report::account_details_text(record);
                    self.copy_to_clipboard(&text, "Account details copied");
                }
                None => {}
            },
            Action::BulkCopy => {
                let checked = self.table.checked_records();
                if checked.is_empty() {
                    self.notify(ToastLevel::Warning, "No accounts selected");
                } else if checked.iter().any(|r| r.redacted) {
                    self.notify(
                        ToastLevel::Warning,
                        "The server hides credentials of the selected accounts",
                    );
                } else {
                    let count = checked.len();
                    let text = report::bulk_copy_text(checked);
                    self.copy_to_clipboard(&text, &format!("Copied {} account(s)", count));
                }
            }
            Action::CopyImportReport => match self.import_report.as_ref() {
                Some(import_report) => {
                    let text = report::import_report_text(import_report);
                    self.copy_to_clipboard(&text, "Import report copied");
                }
                None if self.is_online() => {
                    self.dispatcher
                        .dispatch(ApiRequest::ImportReport(ReportUse::Copy));
                }
                None => self.notify(ToastLevel::Warning, "No import report loaded"),
            },

            // ─────────────────────────────────────────────────────────────────
            // Accounts
            // ─────────────────────────────────────────────────────────────────
            Action::ReloadAccounts => self.reload_accounts(),
            Action::RequestBulkDelete => {
                let checked = self.table.checked_records();
                if checked.is_empty() {
                    self.notify(ToastLevel::Warning, "No accounts selected");
                } else {
                    let ids: Vec<String> = checked.iter().map(|r| r.id.clone()).collect();
                    let items: Vec<String> = checked
                        .iter()
                        .map(|r| format!("{} - {}", r.display_name(), r.email))
                        .collect();
                    let kind = ConfirmKind::BulkDelete { ids };
                    self.confirm_dialog.set(kind.clone(), items);
                    self.modals.push(Modal::Confirm(kind));
                }
            }
            Action::FormEdited => {
                if !self.account_form.form.is_edit() {
                    let draft = self.account_form.form.to_draft();
                    if let Err(e) = self.store.save_draft(&draft) {
                        warn!(error = %e, "failed to save draft");
                    }
                }
            }
            Action::GeneratePassword => {
                self.account_form.form.set_password(generate_password());
                return Ok(Some(Action::FormEdited));
            }
            Action::SubmitForm => self.submit_form(),
            Action::SubmitImport => self.submit_import(),

            // ─────────────────────────────────────────────────────────────────
            // Reports & Maintenance
            // ─────────────────────────────────────────────────────────────────
            Action::Export(format) => self.export(format),
            Action::RequestMaintenance(task) => {
                if self.is_online() {
                    let kind = ConfirmKind::Maintenance(task);
                    self.confirm_dialog.set(kind.clone(), Vec::new());
                    self.modals.push(Modal::Confirm(kind));
                } else {
                    self.notify(ToastLevel::Warning, "Maintenance needs the server");
                }
            }
            Action::ResetCounters => {
                self.restart_counters();
                self.notify(ToastLevel::Info, "Counters reset");
            }
            Action::RequestClearCache => {
                self.confirm_dialog.set(ConfirmKind::ClearCache, Vec::new());
                self.modals.push(Modal::Confirm(ConfirmKind::ClearCache));
            }

            // ─────────────────────────────────────────────────────────────────
            // Settings & Notifications
            // ─────────────────────────────────────────────────────────────────
            Action::SaveSettings(settings) => {
                self.settings = settings;
                self.modals.pop();
                match self.store.save_settings(&settings) {
                    Ok(()) => self.notify(ToastLevel::Success, "Settings saved"),
                    Err(e) => {
                        warn!(error = %e, "failed to save settings");
                        self.notify(ToastLevel::Danger, format!("Saving settings failed: {}", e));
                    }
                }
            }
            Action::DismissToast => {
                if let Some(id) = self.toasts.dismiss_latest() {
                    self.scheduler
                        .cancel_where(|t| *t == ScheduledTask::DismissToast(id));
                }
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let online = self.is_online();
        let ctx = AccountsRenderContext {
            table: &self.table,
            criteria: &self.criteria,
            counters: &self.counters,
            toasts: self.toasts.toasts(),
            source: &self.source,
            online,
            in_flight: self.dispatcher.in_flight(),
            dark_mode: self.settings.dark_mode,
        };
        draw_accounts_screen(frame, area, &mut self.accounts, &ctx)?;

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::Confirm(_) => self.confirm_dialog.handle_key_event(key),
            Modal::Choice { .. } => self.choice_dialog.handle_key_event(key),
            Modal::AccountDetail { .. } => self.account_detail.handle_key_event(key),
            Modal::AccountForm => self.account_form.handle_key_event(key),
            Modal::Import => self.import_dialog.handle_key_event(key),
            Modal::Analytics => self.analytics_dialog.handle_key_event(key),
            Modal::ImportReport { .. } => self.import_report_dialog.handle_key_event(key),
            Modal::Settings => self.settings_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn handle_search_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ForceQuit)
            }
            KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::Confirm(_) => self.confirm_dialog.draw(frame, area)?,
            Modal::Choice { .. } => self.choice_dialog.draw(frame, area)?,
            Modal::AccountDetail { id } => {
                self.account_detail
                    .draw_with_record(frame, area, self.table.get(id))?;
            }
            Modal::AccountForm => self.account_form.draw(frame, area)?,
            Modal::Import => self.import_dialog.draw(frame, area)?,
            Modal::Analytics => self.analytics_dialog.draw(frame, area)?,
            Modal::ImportReport { .. } => {
                self.import_report_dialog
                    .draw_with_report(frame, area, self.import_report.as_ref())?;
            }
            Modal::Settings => self.settings_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}
