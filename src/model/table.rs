//! Accounts table model
//!
//! The table is the single source of truth for account rows. Rendering,
//! bulk actions and report builders all read from it; nothing reads rendered
//! text back as data.

use super::account::{AccountRecord, UNAVAILABLE_SERVICE};
use super::analytics::TableStats;
use super::filter::{FilterCriteria, RowAnnotations, SortKey};
use std::cmp::Ordering;
use std::collections::HashSet;

/// What a table row holds
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Data {
        record: AccountRecord,
        annotations: RowAnnotations,
    },
    /// Shown when the table has no accounts; never filtered, sorted or selected
    Placeholder,
}

/// One row of the table with its view flags
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub kind: RowKind,
    pub visible: bool,
    pub checked: bool,
}

impl TableRow {
    fn data(record: AccountRecord) -> Self {
        let annotations = annotate(&record);
        Self {
            kind: RowKind::Data {
                record,
                annotations,
            },
            visible: true,
            checked: false,
        }
    }

    fn placeholder() -> Self {
        Self {
            kind: RowKind::Placeholder,
            visible: true,
            checked: false,
        }
    }

    pub fn record(&self) -> Option<&AccountRecord> {
        match &self.kind {
            RowKind::Data { record, .. } => Some(record),
            RowKind::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, RowKind::Placeholder)
    }
}

fn annotate(record: &AccountRecord) -> RowAnnotations {
    RowAnnotations {
        name: record.service_name.to_lowercase(),
        email: record.email.to_lowercase(),
        category: record.category.clone(),
        status: record.status,
    }
}

/// Ordering of two records for a sort key.
///
/// Prices that do not parse sort after every parsable price.
fn compare_records(a: &AccountRecord, b: &AccountRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.service_name.cmp(&b.service_name),
        SortKey::Type => a.category.as_str().cmp(b.category.as_str()),
        SortKey::Price => match (a.price.amount(), b.price.amount()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::None => Ordering::Equal,
    }
}

/// The accounts table: rows in display order plus the select-all controller
#[derive(Debug, Clone, PartialEq)]
pub struct AccountTable {
    rows: Vec<TableRow>,
    select_all: bool,
}

impl Default for AccountTable {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

impl AccountTable {
    pub fn from_records(records: Vec<AccountRecord>) -> Self {
        let mut table = Self {
            rows: Vec::new(),
            select_all: false,
        };
        table.replace_records(records);
        table
    }

    /// Replace every row, resetting visibility and selection
    pub fn replace_records(&mut self, records: Vec<AccountRecord>) {
        self.rows = records.into_iter().map(TableRow::data).collect();
        self.select_all = false;
        self.ensure_placeholder();
    }

    fn ensure_placeholder(&mut self) {
        let has_data = self.rows.iter().any(|r| !r.is_placeholder());
        if has_data {
            self.rows.retain(|r| !r.is_placeholder());
        } else if self.rows.is_empty() {
            self.rows.push(TableRow::placeholder());
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// All rows in display order, including hidden and placeholder rows
    #[cfg(test)]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Data records in display order, hidden ones included
    pub fn records(&self) -> impl Iterator<Item = &AccountRecord> {
        self.rows.iter().filter_map(TableRow::record)
    }

    /// Data records of the visible set, in display order
    pub fn visible_records(&self) -> Vec<&AccountRecord> {
        self.rows
            .iter()
            .filter(|r| r.visible)
            .filter_map(TableRow::record)
            .collect()
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.records().count()
    }

    /// Whether there are no data rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<&AccountRecord> {
        self.records().find(|r| r.id == id)
    }

    /// Distinct service names in first-seen order
    pub fn service_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records()
            .map(|r| r.service_name.trim())
            .filter(|name| !name.is_empty() && *name != UNAVAILABLE_SERVICE)
            .filter(|name| seen.insert(name.to_string()))
            .map(str::to_string)
            .collect()
    }

    pub fn stats(&self) -> TableStats {
        TableStats::from_records(self.records())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filtering & Sorting
    // ─────────────────────────────────────────────────────────────────────────

    /// Recompute visibility for every data row and reorder the visible set.
    ///
    /// Visible rows come first in sort order; hidden rows follow in their
    /// previous relative order. With `SortKey::None` nothing moves.
    pub fn apply_filters(&mut self, criteria: &FilterCriteria) {
        if self.rows.is_empty() {
            return;
        }

        for row in &mut self.rows {
            if let RowKind::Data { annotations, .. } = &row.kind {
                row.visible = criteria.matches(annotations);
            }
        }

        if criteria.sort == SortKey::None {
            return;
        }

        let rows = std::mem::take(&mut self.rows);
        let (mut visible, rest): (Vec<TableRow>, Vec<TableRow>) = rows
            .into_iter()
            .partition(|r| r.visible && !r.is_placeholder());
        let (hidden, placeholders): (Vec<TableRow>, Vec<TableRow>) =
            rest.into_iter().partition(|r| !r.is_placeholder());

        // sort_by is stable, so re-sorting a sorted set is a no-op
        visible.sort_by(|a, b| match (a.record(), b.record()) {
            (Some(a), Some(b)) => compare_records(a, b, criteria.sort),
            _ => Ordering::Equal,
        });

        self.rows = visible;
        self.rows.extend(hidden);
        self.rows.extend(placeholders);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// State of the select-all controller
    pub fn select_all_checked(&self) -> bool {
        self.select_all
    }

    /// Set every row checkbox to `desired` and the controller to match
    pub fn toggle_all(&mut self, desired: bool) {
        for row in &mut self.rows {
            if !row.is_placeholder() {
                row.checked = desired;
            }
        }
        self.select_all = desired;
    }

    /// Check everything unless everything is already checked
    pub fn flip_all(&mut self) {
        let all_checked = self
            .rows
            .iter()
            .filter(|r| !r.is_placeholder())
            .all(|r| r.checked);
        self.toggle_all(!all_checked);
    }

    /// Flip one row and recompute the controller
    pub fn toggle_row(&mut self, id: &str) -> bool {
        let Some(row) = self
            .rows
            .iter_mut()
            .find(|r| r.record().is_some_and(|rec| rec.id == id))
        else {
            return false;
        };
        row.checked = !row.checked;
        self.reconcile_select_all();
        true
    }

    fn reconcile_select_all(&mut self) {
        let mut data_rows = self.rows.iter().filter(|r| !r.is_placeholder()).peekable();
        let has_rows = data_rows.peek().is_some();
        self.select_all = has_rows && data_rows.all(|r| r.checked);
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.rows
            .iter()
            .any(|r| r.checked && r.record().is_some_and(|rec| rec.id == id))
    }

    /// Checked records in display order
    pub fn checked_records(&self) -> Vec<&AccountRecord> {
        self.rows
            .iter()
            .filter(|r| r.checked)
            .filter_map(TableRow::record)
            .collect()
    }

    pub fn checked_count(&self) -> usize {
        self.checked_records().len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove rows by id, returning how many were removed
    pub fn remove(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.rows.len();
        self.rows
            .retain(|r| r.record().is_none_or(|rec| !ids.contains(&rec.id)));
        let removed = before - self.rows.len();
        self.ensure_placeholder();
        self.reconcile_select_all();
        removed
    }

    /// Replace the record with the same id, keeping position and view flags
    pub fn update_record(&mut self, record: AccountRecord) -> bool {
        for row in &mut self.rows {
            if row.record().is_some_and(|rec| rec.id == record.id) {
                let annotations = annotate(&record);
                row.kind = RowKind::Data {
                    record,
                    annotations,
                };
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::{Category, Price, Status};

    fn record(id: &str, email: &str, name: &str, price: &str) -> AccountRecord {
        AccountRecord {
            id: id.to_string(),
            email: email.to_string(),
            password: format!("pw-{}", id),
            service_name: name.to_string(),
            category: Category::Streaming,
            price: Price::from_text(price),
            status: Status::Available,
            redacted: false,
        }
    }

    fn sample_table() -> AccountTable {
        AccountTable::from_records(vec![
            record("1", "a@x.com", "Netflix", "$9.99"),
            record("2", "b@y.com", "Hulu", "$10.00"),
            record("3", "c@z.com", "Disney", "$2.50"),
            AccountRecord {
                category: Category::Gaming,
                status: Status::Sold,
                ..record("4", "d@w.com", "Steam", "$30.00")
            },
            AccountRecord {
                status: Status::Failed,
                ..record("5", "e@v.com", "Netflix", "$8.00")
            },
        ])
    }

    fn visible_ids(table: &AccountTable) -> Vec<String> {
        table
            .visible_records()
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }

    #[test]
    fn test_empty_table_has_placeholder() {
        let mut table = AccountTable::from_records(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.rows().len(), 1);
        assert!(table.rows()[0].is_placeholder());

        // No-op on empty table
        table.apply_filters(&FilterCriteria {
            search: "x".to_string(),
            sort: SortKey::Price,
            ..Default::default()
        });
        assert_eq!(table.rows().len(), 1);
        assert!(table.rows()[0].visible);
    }

    #[test]
    fn test_visibility_follows_predicates_not_history() {
        let mut table = sample_table();
        let criteria = FilterCriteria {
            search: "netflix".to_string(),
            ..Default::default()
        };
        table.apply_filters(&criteria);
        assert_eq!(visible_ids(&table), vec!["1", "5"]);

        let criteria = FilterCriteria {
            status: Some(Status::Available),
            sort: SortKey::None,
            ..Default::default()
        };
        table.apply_filters(&criteria);
        assert_eq!(visible_ids(&table), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_combined_predicates() {
        let mut table = sample_table();
        table.apply_filters(&FilterCriteria {
            search: "@".to_string(),
            category: Some(Category::Gaming),
            status: Some(Status::Sold),
            sort: SortKey::None,
        });
        assert_eq!(visible_ids(&table), vec!["4"]);
    }

    #[test]
    fn test_sort_by_price_numeric() {
        let mut table = AccountTable::from_records(vec![
            record("1", "a@x.com", "A", "$9.99"),
            record("2", "b@x.com", "B", "$10.00"),
            record("3", "c@x.com", "C", "$2.50"),
        ]);
        table.apply_filters(&FilterCriteria {
            sort: SortKey::Price,
            ..Default::default()
        });
        let prices: Vec<&str> = table
            .visible_records()
            .iter()
            .map(|r| r.price.as_str())
            .collect();
        assert_eq!(prices, vec!["$2.50", "$9.99", "$10.00"]);
    }

    #[test]
    fn test_unparsable_prices_sort_last() {
        let mut table = AccountTable::from_records(vec![
            record("1", "a@x.com", "A", "n/a"),
            record("2", "b@x.com", "B", "$5.00"),
            record("3", "c@x.com", "C", "??"),
            record("4", "d@x.com", "D", "$1.00"),
        ]);
        table.apply_filters(&FilterCriteria {
            sort: SortKey::Price,
            ..Default::default()
        });
        assert_eq!(visible_ids(&table), vec!["4", "2", "1", "3"]);
    }

    #[test]
    fn test_sort_by_name_is_case_sensitive_and_idempotent() {
        let mut table = AccountTable::from_records(vec![
            record("1", "a@x.com", "netflix", "$1"),
            record("2", "b@x.com", "Netflix", "$1"),
            record("3", "c@x.com", "Amazon", "$1"),
        ]);
        let criteria = FilterCriteria {
            sort: SortKey::Name,
            ..Default::default()
        };
        table.apply_filters(&criteria);
        let first = table.clone();
        assert_eq!(visible_ids(&table), vec!["3", "2", "1"]);

        table.apply_filters(&criteria);
        assert_eq!(table, first);
    }

    #[test]
    fn test_sort_keeps_hidden_rows_below_visible() {
        let mut table = sample_table();
        table.apply_filters(&FilterCriteria {
            status: Some(Status::Available),
            sort: SortKey::Name,
            ..Default::default()
        });

        let order: Vec<(String, bool)> = table
            .rows()
            .iter()
            .map(|r| (r.record().unwrap().id.clone(), r.visible))
            .collect();
        assert_eq!(
            order,
            vec![
                ("3".to_string(), true),
                ("2".to_string(), true),
                ("1".to_string(), true),
                ("4".to_string(), false),
                ("5".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_no_sort_preserves_document_order() {
        let mut table = sample_table();
        table.apply_filters(&FilterCriteria {
            sort: SortKey::None,
            ..Default::default()
        });
        let ids: Vec<&str> = table.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_clearing_filters_restores_all_rows() {
        let mut table = sample_table();
        table.apply_filters(&FilterCriteria {
            search: "zzz".to_string(),
            ..Default::default()
        });
        assert!(table.visible_records().is_empty());

        let mut criteria = FilterCriteria::default();
        criteria.clear();
        table.apply_filters(&criteria);
        assert_eq!(table.visible_records().len(), 5);
    }

    #[test]
    fn test_flip_all_checks_then_unchecks() {
        let mut table = sample_table();
        table.toggle_row("1");
        table.toggle_row("3");
        assert_eq!(table.checked_count(), 2);
        assert!(!table.select_all_checked());

        table.flip_all();
        assert_eq!(table.checked_count(), 5);
        assert!(table.select_all_checked());

        table.flip_all();
        assert_eq!(table.checked_count(), 0);
        assert!(!table.select_all_checked());
    }

    #[test]
    fn test_toggle_all_sets_controller() {
        let mut table = sample_table();
        table.toggle_all(true);
        assert!(table.rows().iter().all(|r| r.checked));
        assert!(table.select_all_checked());

        table.toggle_all(false);
        assert_eq!(table.checked_count(), 0);
        assert!(!table.select_all_checked());
    }

    #[test]
    fn test_toggle_row_reconciles_controller() {
        let mut table = sample_table();
        table.toggle_all(true);
        table.toggle_row("2");
        assert!(!table.select_all_checked());
        table.toggle_row("2");
        assert!(table.select_all_checked());
        assert!(!table.toggle_row("missing"));
    }

    #[test]
    fn test_placeholder_is_never_checked() {
        let mut table = AccountTable::default();
        table.toggle_all(true);
        assert_eq!(table.checked_count(), 0);
        assert!(!table.rows()[0].checked);
    }

    #[test]
    fn test_remove_rows_restores_placeholder() {
        let mut table = AccountTable::from_records(vec![
            record("1", "a@x.com", "A", "$1"),
            record("2", "b@x.com", "B", "$2"),
        ]);
        let ids: HashSet<String> = ["1".to_string(), "2".to_string()].into_iter().collect();
        assert_eq!(table.remove(&ids), 2);
        assert!(table.is_empty());
        assert!(table.rows()[0].is_placeholder());
    }

    #[test]
    fn test_update_record_refreshes_annotations() {
        let mut table = sample_table();
        let mut updated = table.get("2").cloned().unwrap();
        updated.service_name = "Paramount".to_string();
        assert!(table.update_record(updated));

        table.apply_filters(&FilterCriteria {
            search: "paramount".to_string(),
            ..Default::default()
        });
        assert_eq!(visible_ids(&table), vec!["2"]);
    }

    #[test]
    fn test_service_names_distinct_in_order() {
        let table = sample_table();
        assert_eq!(
            table.service_names(),
            vec!["Netflix", "Hulu", "Disney", "Steam"]
        );
    }
}
