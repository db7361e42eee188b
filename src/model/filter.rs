//! Filter criteria for the accounts table

use super::account::{Category, Status};

/// Column the visible rows are ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Type,
    /// Keep document order
    None,
}

impl SortKey {
    pub fn all() -> Vec<SortKey> {
        vec![SortKey::Name, SortKey::Price, SortKey::Type, SortKey::None]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Service name",
            SortKey::Price => "Price",
            SortKey::Type => "Category",
            SortKey::None => "No sorting",
        }
    }
}

/// Precomputed per-row values the filter reads, kept alongside each row
#[derive(Debug, Clone, PartialEq)]
pub struct RowAnnotations {
    pub name: String,
    pub email: String,
    pub category: Category,
    pub status: Status,
}

/// Current filter controls: search text, category, status and sort key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub search: String,
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub sort: SortKey,
}

impl FilterCriteria {
    /// A row matches when the search text is a substring of its email or
    /// service name (case-insensitive) and category/status match exactly.
    /// Unset controls always match.
    pub fn matches(&self, row: &RowAnnotations) -> bool {
        let query = self.search.to_lowercase();
        let matches_search =
            query.is_empty() || row.name.contains(&query) || row.email.contains(&query);
        let matches_category = self
            .category
            .as_ref()
            .is_none_or(|category| *category == row.category);
        let matches_status = self.status.is_none_or(|status| status == row.status);

        matches_search && matches_category && matches_status
    }

    /// Reset every control to its startup value
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
