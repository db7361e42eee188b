//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod account_detail;
pub mod account_form;
pub mod accounts;
pub mod analytics_dialog;
pub mod choice_dialog;
pub mod confirm_dialog;
pub mod help_dialog;
pub mod import_dialog;
pub mod import_report_dialog;
pub mod layout;
pub mod settings_dialog;

pub use account_detail::AccountDetailDialog;
pub use account_form::AccountFormDialog;
pub use accounts::{draw_accounts_screen, AccountsComponent, AccountsRenderContext};
pub use analytics_dialog::AnalyticsDialog;
pub use choice_dialog::ChoiceDialog;
pub use confirm_dialog::ConfirmDialog;
pub use help_dialog::HelpDialog;
pub use import_dialog::ImportDialog;
pub use import_report_dialog::ImportReportDialog;
pub use layout::centered_popup;
pub use settings_dialog::SettingsDialog;
