//! Writing report artifacts to the export directory

use super::report::{self, ReportError, ANALYTICS_CSV_FILENAME};
use crate::model::analytics::Analytics;
use crate::model::AccountRecord;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes dated report files into one directory
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write(&self, filename: &str, contents: &str) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(filename);
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(&path, contents).map_err(io_err)?;
        info!(path = %path.display(), bytes = contents.len(), "wrote export");
        Ok(path)
    }

    /// `accounts_<date>.csv` with the given rows
    pub fn accounts_csv<'a>(
        &self,
        records: impl IntoIterator<Item = &'a AccountRecord>,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, ExportError> {
        let csv = report::accounts_csv(records)?;
        self.write(&report::accounts_filename(now.date_naive()), &csv)
    }

    /// `backup_accounts_<date>.json`
    pub fn backup<'a>(
        &self,
        records: impl IntoIterator<Item = &'a AccountRecord>,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, ExportError> {
        let json = report::backup_json(records, now)?;
        self.write(&report::backup_filename(now.date_naive()), &json)
    }

    /// `analytics_report.csv`, overwritten on each export
    pub fn analytics_csv(&self, analytics: &Analytics) -> Result<PathBuf, ExportError> {
        let csv = report::analytics_csv(analytics)?;
        self.write(ANALYTICS_CSV_FILENAME, &csv)
    }

    /// `analytics_report_<date>.html`, ready to print
    pub fn analytics_html(
        &self,
        analytics: &Analytics,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, ExportError> {
        let html = report::analytics_html(analytics, now.date_naive());
        self.write(&report::analytics_html_filename(now.date_naive()), &html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::{Category, Price, Status};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn records() -> Vec<AccountRecord> {
        vec![AccountRecord {
            id: "1".to_string(),
            email: "a@x.com".to_string(),
            password: "pw".to_string(),
            service_name: "Netflix".to_string(),
            category: Category::Streaming,
            price: Price::from_text("$9.99"),
            status: Status::Available,
            redacted: false,
        }]
    }

    #[test]
    fn test_exports_use_dated_names() {
        let dir = TempDir::new().unwrap();
        let exporter = Exporter::new(dir.path().join("exports"));
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let csv = exporter.accounts_csv(&records(), now).unwrap();
        assert_eq!(csv.file_name().unwrap(), "accounts_2024-03-01.csv");
        assert!(fs::read_to_string(&csv).unwrap().contains("a@x.com,Netflix"));

        let backup = exporter.backup(&records(), now).unwrap();
        assert_eq!(backup.file_name().unwrap(), "backup_accounts_2024-03-01.json");

        let analytics = Analytics::from_records(&records());
        let html = exporter.analytics_html(&analytics, now).unwrap();
        assert_eq!(html.file_name().unwrap(), "analytics_report_2024-03-01.html");

        let csv = exporter.analytics_csv(&analytics).unwrap();
        assert_eq!(csv.file_name().unwrap(), "analytics_report.csv");
    }

    #[test]
    fn test_unwritable_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let exporter = Exporter::new(blocker.join("sub"));
        let err = exporter.analytics_csv(&Analytics::default()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
