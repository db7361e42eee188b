//! Server response payloads and derived statistics

use super::account::{AccountRecord, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price range buckets, in display order
pub const PRICE_RANGES: [&str; 4] = ["0-10", "10-20", "20-50", "50+"];

/// Inventory analytics snapshot (`GET /api/analytics`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub available_products: u64,
    #[serde(default)]
    pub sold_products: u64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub inventory_value: f64,
    /// Available accounts per category
    #[serde(default)]
    pub categories: BTreeMap<String, u64>,
    /// Available accounts per price bucket
    #[serde(default)]
    pub price_ranges: BTreeMap<String, u64>,
}

impl Analytics {
    /// Compute the same snapshot the server would from local rows.
    ///
    /// Used in offline mode. Rows whose price does not parse count as 0.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AccountRecord>) -> Self {
        let mut analytics = Analytics {
            price_ranges: PRICE_RANGES.iter().map(|r| (r.to_string(), 0)).collect(),
            ..Default::default()
        };

        for record in records {
            let price = record.price.amount().unwrap_or(0.0);
            analytics.total_products += 1;
            match record.status {
                Status::Available => {
                    analytics.available_products += 1;
                    analytics.inventory_value += price;
                    *analytics
                        .categories
                        .entry(record.category.as_str().to_string())
                        .or_insert(0) += 1;
                    *analytics
                        .price_ranges
                        .entry(price_range(price).to_string())
                        .or_insert(0) += 1;
                }
                Status::Sold => {
                    analytics.sold_products += 1;
                    analytics.revenue += price;
                }
                Status::Failed => {}
            }
        }

        analytics
    }

    /// Price ranges in bucket order, then any unknown buckets the server sent
    pub fn ordered_price_ranges(&self) -> Vec<(&str, u64)> {
        let mut ranges: Vec<(&str, u64)> = PRICE_RANGES
            .iter()
            .filter_map(|r| self.price_ranges.get(*r).map(|count| (*r, *count)))
            .collect();
        ranges.extend(
            self.price_ranges
                .iter()
                .filter(|(r, _)| !PRICE_RANGES.contains(&r.as_str()))
                .map(|(r, count)| (r.as_str(), *count)),
        );
        ranges
    }
}

/// Bucket for a price, with inclusive upper bounds
pub fn price_range(price: f64) -> &'static str {
    if price <= 10.0 {
        "0-10"
    } else if price <= 20.0 {
        "10-20"
    } else if price <= 50.0 {
        "20-50"
    } else {
        "50+"
    }
}

/// One account the last import rejected
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FailedAccount {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub reason: String,
}

/// Summary of the last bulk import (`GET /api/import_report`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImportReport {
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub last_import: Option<String>,
    #[serde(default)]
    pub total_imported: u64,
    #[serde(default)]
    pub failed_count: u64,
    #[serde(default)]
    pub failed_accounts: Vec<FailedAccount>,
}

impl ImportReport {
    /// Share of imported accounts, in percent. `None` when nothing was attempted.
    pub fn success_rate(&self) -> Option<f64> {
        let attempted = self.total_imported + self.failed_count;
        if attempted == 0 {
            return None;
        }
        Some(self.total_imported as f64 / attempted as f64 * 100.0)
    }
}

/// `GET /api/services`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ServiceList {
    #[serde(default)]
    pub services: Vec<String>,
}

/// `GET /api/accounts`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AccountList {
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

/// Response of a maintenance endpoint
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct MaintenanceOutcome {
    #[serde(default)]
    pub removed: u64,
}

/// Server-side cleanup jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceTask {
    CleanDuplicates,
    CleanFailed,
    /// Clean duplicates, then failed accounts
    Full,
}

impl MaintenanceTask {
    pub fn all() -> [MaintenanceTask; 3] {
        [
            MaintenanceTask::CleanDuplicates,
            MaintenanceTask::CleanFailed,
            MaintenanceTask::Full,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceTask::CleanDuplicates => "Remove duplicate accounts",
            MaintenanceTask::CleanFailed => "Remove failed accounts",
            MaintenanceTask::Full => "Full maintenance",
        }
    }
}

/// Counts shown on the stats cards, computed from the table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableStats {
    pub total: usize,
    pub available: usize,
    pub sold: usize,
    pub failed: usize,
    pub inventory_value: f64,
}

impl TableStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AccountRecord>) -> Self {
        let mut stats = TableStats::default();
        for record in records {
            stats.total += 1;
            match record.status {
                Status::Available => {
                    stats.available += 1;
                    stats.inventory_value += record.price.amount().unwrap_or(0.0);
                }
                Status::Sold => stats.sold += 1,
                Status::Failed => stats.failed += 1,
            }
        }
        stats
    }
}
