//! Background request dispatcher
//!
//! Each dispatched request runs on its own worker thread and reports back
//! through a channel that the event loop drains on every tick. Requests are
//! never deduplicated or cancelled, so when the same action is triggered twice
//! the reply that arrives last is the one the UI ends up showing.

use super::api::{ApiClient, ApiError, SubmitOutcome};
use crate::model::analytics::{Analytics, ImportReport};
use crate::model::analytics::MaintenanceTask;
use crate::model::AccountRecord;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::{debug, info};

/// What the analytics snapshot was requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsUse {
    Show,
    ExportCsv,
    HtmlReport,
}

/// What the import report was requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportUse {
    Show,
    Copy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    LoadAccounts,
    LoadServices,
    Analytics(AnalyticsUse),
    ImportReport(ReportUse),
    Maintenance(MaintenanceTask),
    AddAccount(Vec<(String, String)>),
    EditAccount(Vec<(String, String)>),
    DeleteAccount(String),
    /// Pasted service / `email:password` blocks
    ImportAccounts(Vec<(String, String)>),
    /// One email per line sharing a password
    ImportBulkEmails(Vec<(String, String)>),
}

impl ApiRequest {
    /// Short name for logs and error toasts
    pub fn describe(&self) -> String {
        match self {
            ApiRequest::LoadAccounts => "load accounts".to_string(),
            ApiRequest::LoadServices => "load services".to_string(),
            ApiRequest::Analytics(_) => "load analytics".to_string(),
            ApiRequest::ImportReport(_) => "load import report".to_string(),
            ApiRequest::Maintenance(task) => task.label().to_lowercase(),
            ApiRequest::AddAccount(_) => "add account".to_string(),
            ApiRequest::EditAccount(_) => "edit account".to_string(),
            ApiRequest::DeleteAccount(id) => format!("delete account {}", id),
            ApiRequest::ImportAccounts(_) => "import accounts".to_string(),
            ApiRequest::ImportBulkEmails(_) => "import emails".to_string(),
        }
    }

    fn endpoint(&self) -> String {
        match self {
            ApiRequest::LoadAccounts => "/api/accounts".to_string(),
            ApiRequest::LoadServices => "/api/services".to_string(),
            ApiRequest::Analytics(_) => "/api/analytics".to_string(),
            ApiRequest::ImportReport(_) => "/api/import_report".to_string(),
            ApiRequest::Maintenance(MaintenanceTask::CleanFailed) => {
                "/maintenance/clean_failed".to_string()
            }
            ApiRequest::Maintenance(_) => "/maintenance/clean_duplicates".to_string(),
            ApiRequest::AddAccount(_) => "/add_account".to_string(),
            ApiRequest::EditAccount(_) => "/edit_account".to_string(),
            ApiRequest::DeleteAccount(id) => format!("/delete_account/{}", id),
            ApiRequest::ImportAccounts(_) => "/import_accounts".to_string(),
            ApiRequest::ImportBulkEmails(_) => "/import_bulk_emails".to_string(),
        }
    }
}

/// Successful response body of a request
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    Accounts(Vec<AccountRecord>),
    Services(Vec<String>),
    Analytics(Analytics),
    ImportReport(ImportReport),
    /// Rows a maintenance task removed
    Removed(u64),
    Submitted(SubmitOutcome),
}

/// A finished request paired with what was asked
#[derive(Debug)]
pub struct ApiReply {
    pub request: ApiRequest,
    pub result: Result<ApiPayload, ApiError>,
}

/// Run one request to completion on the calling thread
pub fn execute(client: &ApiClient, request: &ApiRequest) -> Result<ApiPayload, ApiError> {
    match request {
        ApiRequest::LoadAccounts => client.fetch_accounts().map(ApiPayload::Accounts),
        ApiRequest::LoadServices => client.fetch_services().map(ApiPayload::Services),
        ApiRequest::Analytics(_) => client.fetch_analytics().map(ApiPayload::Analytics),
        ApiRequest::ImportReport(_) => client.fetch_import_report().map(ApiPayload::ImportReport),
        ApiRequest::Maintenance(MaintenanceTask::CleanDuplicates) => client
            .clean_duplicates()
            .map(|outcome| ApiPayload::Removed(outcome.removed)),
        ApiRequest::Maintenance(MaintenanceTask::CleanFailed) => client
            .clean_failed()
            .map(|outcome| ApiPayload::Removed(outcome.removed)),
        ApiRequest::Maintenance(MaintenanceTask::Full) => {
            let duplicates = client.clean_duplicates()?;
            let failed = client.clean_failed()?;
            Ok(ApiPayload::Removed(duplicates.removed + failed.removed))
        }
        ApiRequest::AddAccount(params) => client.add_account(params).map(ApiPayload::Submitted),
        ApiRequest::EditAccount(params) => client.edit_account(params).map(ApiPayload::Submitted),
        ApiRequest::DeleteAccount(id) => client.delete_account(id).map(ApiPayload::Submitted),
        ApiRequest::ImportAccounts(params) => {
            client.import_accounts(params).map(ApiPayload::Submitted)
        }
        ApiRequest::ImportBulkEmails(params) => {
            client.import_bulk_emails(params).map(ApiPayload::Submitted)
        }
    }
}

pub struct Dispatcher {
    /// `None` in offline mode
    client: Option<ApiClient>,
    sender: Sender<ApiReply>,
    receiver: Receiver<ApiReply>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(client: Option<ApiClient>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            client,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    #[cfg(test)]
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    /// Requests sent but not yet drained
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start a request on a worker thread
    pub fn dispatch(&mut self, request: ApiRequest) {
        self.in_flight += 1;
        let tx = self.sender.clone();

        let Some(client) = self.client.clone() else {
            debug!(request = %request.describe(), "offline, not sending");
            let result = Err(ApiError::Offline {
                endpoint: request.endpoint(),
            });
            let _ = tx.send(ApiReply { request, result });
            return;
        };

        info!(request = %request.describe(), "dispatching");
        thread::spawn(move || {
            let result = execute(&client, &request);
            let _ = tx.send(ApiReply { request, result });
        });
    }

    /// Collect every reply that has arrived
    pub fn poll(&mut self) -> Vec<ApiReply> {
        let mut replies = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(reply) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    replies.push(reply);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        replies
    }
}
