//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `AccountTable` - Account rows with filter, sort and selection state
//! - `FilterCriteria` - The active search/category/status/sort controls
//! - `ModalStack` - Modal overlay management
//! - Toasts, counters, scheduled tasks, settings, the account and import forms

pub mod account;
pub mod analytics;
pub mod counter;
pub mod filter;
pub mod form;
pub mod import;
pub mod modal;
pub mod schedule;
pub mod settings;
pub mod table;
pub mod toast;

// Re-export commonly used types
pub use account::{AccountRecord, Category, Status};
pub use analytics::{Analytics, ImportReport, MaintenanceTask};
pub use counter::{CounterAnimation, StatsCounters};
pub use filter::{FilterCriteria, SortKey};
pub use form::{AccountForm, FormField};
pub use import::{ImportField, ImportForm};
pub use modal::{ChoiceKind, ConfirmKind, ExportFormat, MaintenanceEntry, Modal, ModalStack};
pub use schedule::Scheduler;
pub use settings::{SettingField, Settings};
pub use table::AccountTable;
pub use toast::{ToastLevel, ToastQueue};
