//! Local inventory files
//!
//! Rows can be loaded from a JSON or CSV file instead of the server, e.g. a
//! backup written by the export menu. Files are only ever read here.

use crate::model::account::{Category, Price, Status};
use crate::model::AccountRecord;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: row {row} has an unknown status {status:?}")]
    Status {
        path: PathBuf,
        row: usize,
        status: String,
    },
}

/// Accepted JSON layouts: a bare array, the `/api/accounts` body, or a backup
#[derive(Deserialize)]
#[serde(untagged)]
enum InventoryJson {
    Rows(Vec<AccountRecord>),
    Wrapped { accounts: Vec<AccountRecord> },
}

/// CSV columns, matching the accounts export plus optional id and password
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "Id", alias = "ID")]
    id: String,
    #[serde(alias = "Email")]
    email: String,
    #[serde(default, alias = "Password")]
    password: String,
    #[serde(default, alias = "Service", alias = "service")]
    name: String,
    #[serde(default, rename = "type", alias = "Category", alias = "category")]
    category: String,
    #[serde(default, alias = "Price")]
    price: String,
    #[serde(default, alias = "Status")]
    status: String,
}

/// Load rows from a `.json` or `.csv` file, chosen by extension
pub fn load_inventory(path: &Path) -> Result<Vec<AccountRecord>, InventoryError> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let mut records = if is_csv {
        load_csv(path)?
    } else {
        load_json(path)?
    };
    assign_missing_ids(&mut records);

    info!(path = %path.display(), count = records.len(), "loaded inventory");
    Ok(records)
}

fn load_json(path: &Path) -> Result<Vec<AccountRecord>, InventoryError> {
    let contents = fs::read_to_string(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: InventoryJson =
        serde_json::from_str(&contents).map_err(|source| InventoryError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(match parsed {
        InventoryJson::Rows(rows) => rows,
        InventoryJson::Wrapped { accounts } => accounts,
    })
}

fn load_csv(path: &Path) -> Result<Vec<AccountRecord>, InventoryError> {
    let csv_err = |source| InventoryError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(csv_err)?;
        let status = if row.status.is_empty() {
            Status::default()
        } else {
            Status::parse(&row.status).ok_or_else(|| InventoryError::Status {
                path: path.to_path_buf(),
                row: i + 1,
                status: row.status.clone(),
            })?
        };
        records.push(AccountRecord {
            id: row.id,
            email: row.email,
            password: row.password,
            service_name: row.name,
            category: Category::from(row.category),
            price: Price::from_text(row.price),
            status,
            redacted: false,
        });
    }
    Ok(records)
}

/// Rows without an id get `local-<n>` so selection and edits can address them
fn assign_missing_ids(records: &mut [AccountRecord]) {
    for (i, record) in records.iter_mut().enumerate() {
        if record.id.trim().is_empty() {
            record.id = format!("local-{}", i + 1);
        }
    }
}
