//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - Admin server HTTP API and the background dispatcher
//! - Local inventory files and report exports
//! - Settings/draft persistence
//! - Clipboard and password generation

pub mod api;
pub mod clipboard;
pub mod credentials;
pub mod dispatcher;
pub mod export;
pub mod inventory;
pub mod report;
pub mod store;

pub use api::ApiClient;
#[cfg(test)]
pub use clipboard::MemoryClipboard;
pub use clipboard::{ClipboardSink, SystemClipboard};
pub use credentials::generate_password;
pub use dispatcher::{
    AnalyticsUse, ApiPayload, ApiReply, ApiRequest, Dispatcher, ReportUse,
};
pub use export::Exporter;
pub use inventory::load_inventory;
pub use store::{FileStore, SessionStore};
