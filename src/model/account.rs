//! Data models for inventory accounts (the rows of the admin table)

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Display name used when a row has no service name
pub const UNAVAILABLE_SERVICE: &str = "Service unavailable";

/// Matches a price with an optional leading currency symbol: `$9.99`, `€ 12`, `3.5`
static PRICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\p{Sc}?\s*([+-]?\d+(?:\.\d+)?)\s*$").unwrap()
});

/// Product category of an account
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Streaming,
    Gaming,
    Football,
    Other(String),
}

impl Category {
    /// Categories offered by the filter and form pickers
    pub fn known() -> Vec<Category> {
        vec![Category::Streaming, Category::Gaming, Category::Football]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Streaming => "Streaming",
            Category::Gaming => "Gaming",
            Category::Football => "Football",
            Category::Other(name) => name,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Streaming" => Category::Streaming,
            "Gaming" => Category::Gaming,
            "Football" => Category::Football,
            _ => Category::Other(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sale status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Available,
    Sold,
    Failed,
}

impl Status {
    pub fn all() -> Vec<Status> {
        vec![Status::Available, Status::Sold, Status::Failed]
    }

    /// Wire value, as used by the server and the filter
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::Sold => "sold",
            Status::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Sold => "Sold",
            Status::Failed => "Failed",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Status::Available => "✓",
            Status::Sold => "✗",
            Status::Failed => "!",
        }
    }

    pub fn parse(value: &str) -> Option<Status> {
        match value.trim().to_lowercase().as_str() {
            "available" => Some(Status::Available),
            "sold" => Some(Status::Sold),
            "failed" => Some(Status::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency-formatted price text
///
/// The text is kept exactly as received so exports reproduce it verbatim.
/// The numeric value is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    /// Format an amount as `$x.xx`
    pub fn from_amount(amount: f64) -> Self {
        Price(format_currency(amount))
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Price(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value after stripping a leading currency symbol.
    /// Returns `None` when the text does not parse.
    pub fn amount(&self) -> Option<f64> {
        let caps = PRICE_REGEX.captures(&self.0)?;
        caps.get(1)?.as_str().parse::<f64>().ok()
    }

    /// Value without the currency symbol, used to prefill the edit form
    pub fn plain(&self) -> String {
        match self.amount() {
            Some(amount) => format!("{:.2}", amount),
            None => self.0.clone(),
        }
    }
}

impl Default for Price {
    fn default() -> Self {
        Price::from_amount(0.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPrice {
            Number(f64),
            Text(String),
        }

        Ok(match RawPrice::deserialize(deserializer)? {
            RawPrice::Number(amount) => Price::from_amount(amount),
            RawPrice::Text(text) => Price::from_text(text),
        })
    }
}

/// Format a currency amount with two fraction digits
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// A single inventory account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(default)]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "name", default)]
    pub service_name: String,
    #[serde(rename = "type", default)]
    pub category: Category,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub status: Status,
    /// Row came from the server listing, which masks the email and never
    /// sends the password
    #[serde(skip)]
    pub redacted: bool,
}

impl AccountRecord {
    /// Service name for display, with a fallback for unnamed rows
    pub fn display_name(&self) -> &str {
        if self.service_name.trim().is_empty() {
            UNAVAILABLE_SERVICE
        } else {
            &self.service_name
        }
    }

    /// `email:password` pair
    pub fn credentials(&self) -> String {
        format!("{}:{}", self.email, self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_amount_strips_currency_symbol() {
        assert_eq!(Price::from_text("$9.99").amount(), Some(9.99));
        assert_eq!(Price::from_text("€ 12").amount(), Some(12.0));
        assert_eq!(Price::from_text("2.50").amount(), Some(2.5));
        assert_eq!(Price::from_text(" $10.00 ").amount(), Some(10.0));
    }

    #[test]
    fn test_price_amount_unparsable() {
        assert_eq!(Price::from_text("free").amount(), None);
        assert_eq!(Price::from_text("").amount(), None);
        assert_eq!(Price::from_text("$").amount(), None);
    }

    #[test]
    fn test_price_from_amount_two_digits() {
        assert_eq!(Price::from_amount(12.0).as_str(), "$12.00");
        assert_eq!(Price::from_amount(9.999).as_str(), "$10.00");
        assert_eq!(Price::from_text("$7.5").plain(), "7.50");
    }

    #[test]
    fn test_category_round_trip() {
        assert_eq!(Category::from("Gaming"), Category::Gaming);
        assert_eq!(
            Category::from("Music"),
            Category::Other("Music".to_string())
        );
        assert_eq!(Category::Football.as_str(), "Football");
    }

    #[test]
    fn test_record_deserializes_server_shape() {
        let json = r#"{"id":"1","email":"a@x.com","name":"Netflix","type":"Streaming","price":9.5,"status":"sold"}"#;
        let record: AccountRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.service_name, "Netflix");
        assert_eq!(record.category, Category::Streaming);
        assert_eq!(record.price.as_str(), "$9.50");
        assert_eq!(record.status, Status::Sold);
        assert!(record.password.is_empty());
        assert!(!record.redacted);
    }

    #[test]
    fn test_record_accepts_text_price() {
        let json = r#"{"email":"b@y.com","password":"pw","name":"Hulu","type":"Streaming","price":"$12.00"}"#;
        let record: AccountRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.price.amount(), Some(12.0));
        assert_eq!(record.status, Status::Available);
        assert_eq!(record.credentials(), "b@y.com:pw");
    }

    #[test]
    fn test_display_name_fallback() {
        let record = AccountRecord {
            id: "1".to_string(),
            email: "a@x.com".to_string(),
            password: String::new(),
            service_name: "  ".to_string(),
            category: Category::Gaming,
            price: Price::default(),
            status: Status::Available,
            redacted: false,
        };
        assert_eq!(record.display_name(), UNAVAILABLE_SERVICE);
    }
}
