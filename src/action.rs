//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::{ChoiceKind, ExportFormat, MaintenanceTask, Settings};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for animations, timers and background replies
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextItem,
    PrevItem,
    FirstItem,
    LastItem,
    PageDown,
    PageUp,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    /// Open a list picker (filters, sort, quick filters, menus)
    OpenChoice(ChoiceKind),
    /// Detail view of the row under the cursor
    OpenAccountDetail,
    OpenAddForm,
    /// Edit form for the account with this id
    OpenEditForm(String),
    /// Bulk import dialog
    OpenImport,
    OpenAnalytics,
    OpenImportReport,
    OpenSettings,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// An entry was picked in the choice dialog
    ChooseOption(usize),

    // ─────────────────────────────────────────────────────────────────────────
    // Search & Filters
    // ─────────────────────────────────────────────────────────────────────────
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    /// Reset search, category, status and sort
    ClearFilters,

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────
    /// Toggle the checkbox of the row under the cursor
    ToggleRowSelection,
    /// The select-all checkbox was pressed
    ToggleSelectAll,
    ClearSelection,

    // ─────────────────────────────────────────────────────────────────────────
    // Clipboard
    // ─────────────────────────────────────────────────────────────────────────
    /// Copy `email:password` of one account
    CopyCredentials(String),
    /// Copy the full detail block of one account
    CopyDetails(String),
    /// Copy service and credentials of every checked row
    BulkCopy,
    /// Fetch the import report and copy it as text
    CopyImportReport,

    // ─────────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────────
    ReloadAccounts,
    /// Ask to delete every checked row
    RequestBulkDelete,
    /// A field of the account form changed
    FormEdited,
    GeneratePassword,
    SubmitForm,
    SubmitImport,

    // ─────────────────────────────────────────────────────────────────────────
    // Reports & Maintenance
    // ─────────────────────────────────────────────────────────────────────────
    Export(ExportFormat),
    /// Ask to run a server cleanup task
    RequestMaintenance(MaintenanceTask),
    ResetCounters,
    /// Ask to wipe the persisted settings and draft
    RequestClearCache,

    // ─────────────────────────────────────────────────────────────────────────
    // Settings & Notifications
    // ─────────────────────────────────────────────────────────────────────────
    SaveSettings(Settings),
    /// Close the newest toast
    DismissToast,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::PageDown => write!(f, "PageDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenChoice(kind) => write!(f, "OpenChoice({:?})", kind),
            Action::OpenAccountDetail => write!(f, "OpenAccountDetail"),
            Action::OpenAddForm => write!(f, "OpenAddForm"),
            Action::OpenEditForm(id) => write!(f, "OpenEditForm({})", id),
            Action::OpenImport => write!(f, "OpenImport"),
            Action::OpenAnalytics => write!(f, "OpenAnalytics"),
            Action::OpenImportReport => write!(f, "OpenImportReport"),
            Action::OpenSettings => write!(f, "OpenSettings"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ChooseOption(index) => write!(f, "ChooseOption({})", index),
            Action::EnterSearchMode => write!(f, "EnterSearchMode"),
            Action::ExitSearchMode => write!(f, "ExitSearchMode"),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::ClearFilters => write!(f, "ClearFilters"),
            Action::ToggleRowSelection => write!(f, "ToggleRowSelection"),
            Action::ToggleSelectAll => write!(f, "ToggleSelectAll"),
            Action::ClearSelection => write!(f, "ClearSelection"),
            Action::CopyCredentials(id) => write!(f, "CopyCredentials({})", id),
            Action::CopyDetails(id) => write!(f, "CopyDetails({})", id),
            Action::BulkCopy => write!(f, "BulkCopy"),
            Action::CopyImportReport => write!(f, "CopyImportReport"),
            Action::ReloadAccounts => write!(f, "ReloadAccounts"),
            Action::RequestBulkDelete => write!(f, "RequestBulkDelete"),
            Action::FormEdited => write!(f, "FormEdited"),
            Action::GeneratePassword => write!(f, "GeneratePassword"),
            Action::SubmitForm => write!(f, "SubmitForm"),
            Action::SubmitImport => write!(f, "SubmitImport"),
            Action::Export(format) => write!(f, "Export({:?})", format),
            Action::RequestMaintenance(task) => write!(f, "RequestMaintenance({:?})", task),
            Action::ResetCounters => write!(f, "ResetCounters"),
            Action::RequestClearCache => write!(f, "RequestClearCache"),
            Action::SaveSettings(_) => write!(f, "SaveSettings"),
            Action::DismissToast => write!(f, "DismissToast"),
        }
    }
}
