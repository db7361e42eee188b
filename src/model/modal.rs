//! Modal stack for managing overlays
//!
//! Every dialog the console can show is a variant of [`Modal`]. Only the top
//! of the stack is drawn and receives input.

use super::analytics::MaintenanceTask;

/// What a yes/no confirmation is asking about
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmKind {
    Quit,
    /// Delete the listed rows from the table and the server
    BulkDelete { ids: Vec<String> },
    Maintenance(MaintenanceTask),
    /// Wipe every persisted key (settings and form draft)
    ClearCache,
}

/// Which list a choice dialog is picking from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    Category,
    Status,
    Sort,
    QuickService,
    Maintenance,
    Export,
}

impl ChoiceKind {
    pub fn title(&self) -> &'static str {
        match self {
            ChoiceKind::Category => " Filter by Category ",
            ChoiceKind::Status => " Filter by Status ",
            ChoiceKind::Sort => " Sort by ",
            ChoiceKind::QuickService => " Quick Filter: Service ",
            ChoiceKind::Maintenance => " Maintenance ",
            ChoiceKind::Export => " Export ",
        }
    }
}

/// Entries of the maintenance menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceEntry {
    Server(MaintenanceTask),
    ResetCounters,
    ClearCache,
}

impl MaintenanceEntry {
    pub fn all() -> Vec<MaintenanceEntry> {
        let mut entries: Vec<MaintenanceEntry> = MaintenanceTask::all()
            .into_iter()
            .map(MaintenanceEntry::Server)
            .collect();
        entries.push(MaintenanceEntry::ResetCounters);
        entries.push(MaintenanceEntry::ClearCache);
        entries
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceEntry::Server(task) => task.label(),
            MaintenanceEntry::ResetCounters => "Reset counters",
            MaintenanceEntry::ClearCache => "Clear local cache",
        }
    }
}

/// Artifacts the export menu can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    AccountsCsv,
    Backup,
    AnalyticsCsv,
    AnalyticsHtml,
}

impl ExportFormat {
    pub fn all() -> [ExportFormat; 4] {
        [
            ExportFormat::AccountsCsv,
            ExportFormat::Backup,
            ExportFormat::AnalyticsCsv,
            ExportFormat::AnalyticsHtml,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::AccountsCsv => "Visible accounts (CSV)",
            ExportFormat::Backup => "Full backup (JSON)",
            ExportFormat::AnalyticsCsv => "Analytics (CSV)",
            ExportFormat::AnalyticsHtml => "Analytics report (HTML)",
        }
    }
}

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Confirm(ConfirmKind),
    /// Pick one entry from a list
    Choice { kind: ChoiceKind },
    /// Full record of one account. Carries the id instead of a copy so edits
    /// and deletes never act on a stale row.
    AccountDetail { id: String },
    /// Add or edit form; the form state lives in the dialog
    AccountForm,
    /// Bulk import; the form state lives in the dialog
    Import,
    Analytics,
    ImportReport { scroll_offset: usize },
    Settings,
    Help,
}

/// A stack of modal overlays
///
/// Closing the top modal reveals the one below it unchanged.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Drop every modal matching the predicate, wherever it sits
    pub fn remove_where(&mut self, predicate: impl Fn(&Modal) -> bool) {
        self.stack.retain(|m| !predicate(m));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::Confirm(ConfirmKind::Quit));
        stack.push(Modal::Help);
        assert_eq!(stack.len(), 2);

        assert_eq!(stack.pop(), Some(Modal::Help));
        assert_eq!(stack.pop(), Some(Modal::Confirm(ConfirmKind::Quit)));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_remove_where_keeps_order() {
        let mut stack = ModalStack::new();
        stack.push(Modal::AccountDetail { id: "7".to_string() });
        stack.push(Modal::AccountForm);
        stack.push(Modal::Help);

        stack.remove_where(|m| matches!(m, Modal::AccountDetail { id } if id == "7"));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top(), Some(&Modal::Help));
    }

    #[test]
    fn test_maintenance_menu_lists_server_tasks_first() {
        let entries = MaintenanceEntry::all();
        assert_eq!(entries.len(), 5);
        assert_eq!(
            entries[0],
            MaintenanceEntry::Server(MaintenanceTask::CleanDuplicates)
        );
        assert_eq!(entries[4], MaintenanceEntry::ClearCache);
    }
}
