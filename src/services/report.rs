//! Report builders
//!
//! Pure transformations from table rows or a server analytics snapshot into
//! CSV, JSON, HTML or clipboard text. Field values are emitted verbatim; CSV
//! fields are quoted only where the csv crate needs to.

use crate::model::account::format_currency;
use crate::model::analytics::{Analytics, ImportReport};
use crate::model::AccountRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::string::FromUtf8Error;
use thiserror::Error;

pub const ANALYTICS_CSV_FILENAME: &str = "analytics_report.csv";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub fn accounts_filename(date: NaiveDate) -> String {
    format!("accounts_{}.csv", date.format("%Y-%m-%d"))
}

pub fn backup_filename(date: NaiveDate) -> String {
    format!("backup_accounts_{}.json", date.format("%Y-%m-%d"))
}

pub fn analytics_html_filename(date: NaiveDate) -> String {
    format!("analytics_report_{}.html", date.format("%Y-%m-%d"))
}

fn write_csv(rows: Vec<Vec<String>>) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// `Email,Service,Category,Price,Status`, one line per row in the order given
pub fn accounts_csv<'a>(
    records: impl IntoIterator<Item = &'a AccountRecord>,
) -> Result<String, ReportError> {
    let mut rows = vec![vec![
        "Email".to_string(),
        "Service".to_string(),
        "Category".to_string(),
        "Price".to_string(),
        "Status".to_string(),
    ]];
    rows.extend(records.into_iter().map(|r| {
        vec![
            r.email.clone(),
            r.display_name().to_string(),
            r.category.to_string(),
            r.price.to_string(),
            r.status.label().to_string(),
        ]
    }));
    write_csv(rows)
}

#[derive(Serialize)]
struct BackupEntry<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    category: &'a str,
    price: &'a str,
    status: &'a str,
}

#[derive(Serialize)]
struct Backup<'a> {
    date: String,
    total: usize,
    accounts: Vec<BackupEntry<'a>>,
}

/// Pretty-printed JSON backup with credentials
pub fn backup_json<'a>(
    records: impl IntoIterator<Item = &'a AccountRecord>,
    now: DateTime<Utc>,
) -> Result<String, ReportError> {
    let accounts: Vec<BackupEntry> = records
        .into_iter()
        .map(|r| BackupEntry {
            email: &r.email,
            password: &r.password,
            name: &r.service_name,
            category: r.category.as_str(),
            price: r.price.as_str(),
            status: r.status.as_str(),
        })
        .collect();
    let backup = Backup {
        date: now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        total: accounts.len(),
        accounts,
    };
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// `Metric,Value` rows: totals, money, then one row per category and price range
pub fn analytics_csv(analytics: &Analytics) -> Result<String, ReportError> {
    let mut rows = vec![
        vec!["Metric".to_string(), "Value".to_string()],
        vec![
            "Total products".to_string(),
            analytics.total_products.to_string(),
        ],
        vec![
            "Available products".to_string(),
            analytics.available_products.to_string(),
        ],
        vec![
            "Sold products".to_string(),
            analytics.sold_products.to_string(),
        ],
        vec!["Revenue".to_string(), format_currency(analytics.revenue)],
        vec![
            "Inventory value".to_string(),
            format_currency(analytics.inventory_value),
        ],
    ];
    rows.extend(
        analytics
            .categories
            .iter()
            .map(|(category, count)| vec![format!("Category {}", category), count.to_string()]),
    );
    rows.extend(
        analytics
            .ordered_price_ranges()
            .into_iter()
            .map(|(range, count)| vec![format!("Price range ${}", range), count.to_string()]),
    );
    write_csv(rows)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const REPORT_CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 20px; }
.header { text-align: center; margin-bottom: 30px; }
.stats { display: flex; justify-content: space-around; margin: 20px 0; }
.stat-card { text-align: center; padding: 15px; border: 1px solid #ddd; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; }
"#;

/// Printable HTML analytics report
pub fn analytics_html(analytics: &Analytics, date: NaiveDate) -> String {
    let cards = [
        (analytics.total_products.to_string(), "Total products"),
        (analytics.available_products.to_string(), "Available"),
        (format_currency(analytics.revenue), "Revenue"),
        (format_currency(analytics.inventory_value), "Inventory value"),
    ]
    .iter()
    .map(|(value, label)| {
        format!(
            r#"<div class="stat-card"><h3>{}</h3><p>{}</p></div>"#,
            html_escape(value),
            label
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    let category_rows = analytics
        .categories
        .iter()
        .map(|(category, count)| {
            format!("<tr><td>{}</td><td>{}</td></tr>", html_escape(category), count)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let range_rows = analytics
        .ordered_price_ranges()
        .into_iter()
        .map(|(range, count)| format!("<tr><td>${}</td><td>{}</td></tr>", html_escape(range), count))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Analytics Report</title>
<style>{css}</style>
</head>
<body>
<div class="header">
<h1>Analytics Report</h1>
<p>Sales inventory - {date}</p>
</div>
<div class="stats">
{cards}
</div>
<h3>Products by category</h3>
<table>
<tr><th>Category</th><th>Count</th></tr>
{category_rows}
</table>
<h3>Price ranges</h3>
<table>
<tr><th>Range</th><th>Products</th></tr>
{range_rows}
</table>
</body>
</html>
"#,
        css = REPORT_CSS,
        date = date.format("%Y-%m-%d"),
        cards = cards,
        category_rows = category_rows,
        range_rows = range_rows,
    )
}

/// Render a server timestamp for humans, keeping it raw if it doesn't parse
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    raw.to_string()
}

/// Plain-text import report for the clipboard
pub fn import_report_text(report: &ImportReport) -> String {
    let mut text = format!("IMPORT REPORT - {}\n", report.service_name);
    let date = report
        .last_import
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| "never".to_string());
    text.push_str(&format!("Date: {}\n", date));
    text.push_str(&format!("Imported: {}\n", report.total_imported));
    text.push_str(&format!("Failed: {}\n\n", report.failed_count));

    if report.failed_count > 0 {
        text.push_str("FAILED ACCOUNTS:\n");
        for (i, account) in report.failed_accounts.iter().enumerate() {
            text.push_str(&format!("{}. {} - {}\n", i + 1, account.email, account.reason));
        }
    }
    text
}

/// Service name then `email:password`, blank line between accounts
pub fn bulk_copy_text<'a>(records: impl IntoIterator<Item = &'a AccountRecord>) -> String {
    records
        .into_iter()
        .map(|r| format!("{}\n{}\n\n", r.display_name(), r.credentials()))
        .collect()
}

pub fn account_details_text(record: &AccountRecord) -> String {
    format!(
        "Service: {}\nEmail: {}\nPassword: {}\nCategory: {}\nPrice: {}\nStatus: {}",
        record.display_name(),
        record.email,
        record.password,
        record.category,
        record.price,
        record.status.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::{Category, Price, Status};
    use crate::model::analytics::FailedAccount;
    use chrono::TimeZone;

    fn record(email: &str, name: &str, price: &str) -> AccountRecord {
        AccountRecord {
            id: String::new(),
            email: email.to_string(),
            password: "secret".to_string(),
            service_name: name.to_string(),
            category: Category::Streaming,
            price: Price::from_text(price),
            status: Status::Available,
            redacted: false,
        }
    }

    #[test]
    fn test_accounts_csv_two_rows_in_order() {
        let records = vec![
            record("a@x.com", "Netflix", "$9.99"),
            record("b@y.com", "Hulu", "$12.00"),
        ];
        let csv = accounts_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Email,Service,Category,Price,Status",
                "a@x.com,Netflix,Streaming,$9.99,Available",
                "b@y.com,Hulu,Streaming,$12.00,Available",
            ]
        );
    }

    #[test]
    fn test_accounts_csv_quotes_delimiters() {
        let records = vec![record("a@x.com", "Netflix, 4K \"UHD\"", "$9.99")];
        let csv = accounts_csv(&records).unwrap();
        assert!(csv.contains(r#"a@x.com,"Netflix, 4K ""UHD""",Streaming"#));
    }

    #[test]
    fn test_accounts_csv_empty_has_header_only() {
        let csv = accounts_csv(std::iter::empty::<&AccountRecord>()).unwrap();
        assert_eq!(csv, "Email,Service,Category,Price,Status\n");
    }

    #[test]
    fn test_backup_json_shape() {
        let records = vec![record("a@x.com", "Netflix", "$9.99")];
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let json = backup_json(&records, now).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total"], 1);
        assert_eq!(value["date"], "2024-03-01T12:00:00.000Z");
        assert_eq!(value["accounts"][0]["password"], "secret");
        assert_eq!(value["accounts"][0]["type"], "Streaming");
        assert_eq!(value["accounts"][0]["status"], "available");
    }

    fn analytics() -> Analytics {
        let mut analytics = Analytics {
            total_products: 5,
            available_products: 3,
            sold_products: 2,
            revenue: 25.0,
            inventory_value: 30.5,
            ..Default::default()
        };
        analytics.categories.insert("Gaming".to_string(), 1);
        analytics.categories.insert("Streaming".to_string(), 2);
        for (range, count) in [("0-10", 2), ("10-20", 1), ("20-50", 0), ("50+", 0)] {
            analytics.price_ranges.insert(range.to_string(), count);
        }
        analytics
    }

    #[test]
    fn test_analytics_csv_one_line_per_metric() {
        let csv = analytics_csv(&analytics()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Metric,Value");
        assert_eq!(lines[1], "Total products,5");
        assert_eq!(lines[4], "Revenue,$25.00");
        assert_eq!(lines[5], "Inventory value,$30.50");
        assert_eq!(lines[6], "Category Gaming,1");
        assert_eq!(lines[7], "Category Streaming,2");
        assert_eq!(lines[8], "Price range $0-10,2");
        assert_eq!(lines.len(), 1 + 5 + 2 + 4);
    }

    #[test]
    fn test_analytics_html_escapes_values() {
        let mut data = analytics();
        data.categories.insert("<script>".to_string(), 1);
        let html = analytics_html(&data, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<td><script>"));
        assert!(html.contains("<h3>$30.50</h3>"));
        assert!(html.contains("<tr><td>$10-20</td><td>1</td></tr>"));
        assert!(html.contains("2024-03-01"));
    }

    #[test]
    fn test_import_report_text() {
        let report = ImportReport {
            service_name: "Netflix".to_string(),
            last_import: Some("Fri, 01 Mar 2024 10:30:00 GMT".to_string()),
            total_imported: 8,
            failed_count: 2,
            failed_accounts: vec![
                FailedAccount {
                    email: "abc***@x.com".to_string(),
                    reason: "Invalid format".to_string(),
                },
                FailedAccount {
                    email: "def***@y.com".to_string(),
                    reason: "Duplicate".to_string(),
                },
            ],
        };
        let text = import_report_text(&report);
        assert!(text.starts_with("IMPORT REPORT - Netflix\nDate: 2024-03-01 10:30:00\n"));
        assert!(text.contains("Imported: 8\nFailed: 2\n\nFAILED ACCOUNTS:\n"));
        assert!(text.ends_with("2. def***@y.com - Duplicate\n"));
    }

    #[test]
    fn test_import_report_text_without_failures() {
        let report = ImportReport {
            service_name: "Hulu".to_string(),
            total_imported: 3,
            ..Default::default()
        };
        let text = import_report_text(&report);
        assert!(!text.contains("FAILED ACCOUNTS"));
        assert!(text.contains("Date: never"));
    }

    #[test]
    fn test_bulk_copy_text() {
        let records = vec![
            record("a@x.com", "Netflix", "$1"),
            record("b@y.com", "", "$1"),
        ];
        let refs: Vec<&AccountRecord> = records.iter().collect();
        assert_eq!(
            bulk_copy_text(refs),
            "Netflix\na@x.com:secret\n\nService unavailable\nb@y.com:secret\n\n"
        );
    }

    #[test]
    fn test_account_details_text() {
        let text = account_details_text(&record("a@x.com", "Netflix", "$9.99"));
        assert_eq!(
            text,
            "Service: Netflix\nEmail: a@x.com\nPassword: secret\nCategory: Streaming\nPrice: $9.99\nStatus: Available"
        );
    }

    #[test]
    fn test_dated_filenames() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        assert_eq!(accounts_filename(date), "accounts_2024-12-05.csv");
        assert_eq!(backup_filename(date), "backup_accounts_2024-12-05.json");
        assert_eq!(analytics_html_filename(date), "analytics_report_2024-12-05.html");
    }

    #[test]
    fn test_format_timestamp_variants() {
        assert_eq!(
            format_timestamp("2024-03-01T10:30:00.123"),
            "2024-03-01 10:30:00"
        );
        assert_eq!(
            format_timestamp("2024-03-01T10:30:00+00:00"),
            "2024-03-01 10:30:00"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
