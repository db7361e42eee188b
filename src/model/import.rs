//! Import form state
//!
//! Two ways to load accounts in bulk: pasted `service` / `email:password`
//! blocks, or a list of emails that share one password.

use super::account::Category;
use thiserror::Error;

/// Price the server assumes when a text import gives none
pub const DEFAULT_IMPORT_PRICE: &str = "15.99";
/// Price the server assumes for a bulk email import
pub const DEFAULT_BULK_PRICE: &str = "9.99";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Service name lines followed by `email:password` lines
    #[default]
    Accounts,
    /// One email per line, all with the same service and password
    BulkEmails,
}

impl ImportMode {
    pub fn label(&self) -> &'static str {
        match self {
            ImportMode::Accounts => "Account list",
            ImportMode::BulkEmails => "Bulk emails",
        }
    }

    fn toggled(self) -> Self {
        match self {
            ImportMode::Accounts => ImportMode::BulkEmails,
            ImportMode::BulkEmails => ImportMode::Accounts,
        }
    }
}

/// Import form fields in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportField {
    Mode,
    AccountsText,
    ServiceName,
    Password,
    EmailsList,
    Category,
    Price,
    Validate,
}

impl ImportField {
    pub fn label(&self) -> &'static str {
        match self {
            ImportField::Mode => "Import",
            ImportField::AccountsText => "Accounts",
            ImportField::ServiceName => "Service",
            ImportField::Password => "Password",
            ImportField::EmailsList => "Emails",
            ImportField::Category => "Category",
            ImportField::Price => "Price",
            ImportField::Validate => "Validate",
        }
    }

    /// Fields cycled with Left/Right instead of typed
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            ImportField::Mode | ImportField::Category | ImportField::Validate
        )
    }

    /// Text areas where Enter starts a new line
    pub fn is_multiline(&self) -> bool {
        matches!(self, ImportField::AccountsText | ImportField::EmailsList)
    }
}

/// An import field failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .field.label())]
pub struct ImportError {
    pub field: ImportField,
    pub message: String,
}

impl ImportError {
    fn new(field: ImportField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportForm {
    pub mode: ImportMode,
    pub accounts_text: String,
    pub service_name: String,
    pub password: String,
    pub emails_list: String,
    pub category: Category,
    pub price: String,
    /// Let the server mark a random share of imported rows as failed
    pub validate: bool,
    pub focus: ImportField,
    pub error: Option<ImportError>,
}

impl Default for ImportForm {
    fn default() -> Self {
        Self {
            mode: ImportMode::Accounts,
            accounts_text: String::new(),
            service_name: String::new(),
            password: String::new(),
            emails_list: String::new(),
            category: Category::Other("Other".to_string()),
            price: DEFAULT_IMPORT_PRICE.to_string(),
            validate: false,
            focus: ImportField::Mode,
            error: None,
        }
    }
}

impl ImportForm {
    pub fn fields(&self) -> Vec<ImportField> {
        match self.mode {
            ImportMode::Accounts => vec![
                ImportField::Mode,
                ImportField::AccountsText,
                ImportField::Category,
                ImportField::Price,
                ImportField::Validate,
            ],
            ImportMode::BulkEmails => vec![
                ImportField::Mode,
                ImportField::ServiceName,
                ImportField::Password,
                ImportField::EmailsList,
                ImportField::Category,
                ImportField::Price,
            ],
        }
    }

    pub fn value(&self, field: ImportField) -> String {
        match field {
            ImportField::Mode => self.mode.label().to_string(),
            ImportField::AccountsText => self.accounts_text.clone(),
            ImportField::ServiceName => self.service_name.clone(),
            ImportField::Password => self.password.clone(),
            ImportField::EmailsList => self.emails_list.clone(),
            ImportField::Category => self.category.as_str().to_string(),
            ImportField::Price => self.price.clone(),
            ImportField::Validate => if self.validate { "yes" } else { "no" }.to_string(),
        }
    }

    fn text_mut(&mut self, field: ImportField) -> Option<&mut String> {
        match field {
            ImportField::AccountsText => Some(&mut self.accounts_text),
            ImportField::ServiceName => Some(&mut self.service_name),
            ImportField::Password => Some(&mut self.password),
            ImportField::EmailsList => Some(&mut self.emails_list),
            ImportField::Price => Some(&mut self.price),
            ImportField::Mode | ImportField::Category | ImportField::Validate => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    pub fn push_char(&mut self, c: char) {
        let focus = self.focus;
        if let Some(text) = self.text_mut(focus) {
            text.push(c);
            self.error = None;
        }
    }

    pub fn pop_char(&mut self) {
        let focus = self.focus;
        if let Some(text) = self.text_mut(focus) {
            text.pop();
            self.error = None;
        }
    }

    /// Cycle the focused choice field. Switching mode resets the price to
    /// that mode's default unless it was edited.
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            ImportField::Mode => {
                let untouched = self.price == self.default_price();
                self.mode = self.mode.toggled();
                if untouched {
                    self.price = self.default_price().to_string();
                }
            }
            ImportField::Category => {
                let mut options = Category::known();
                options.push(Category::Other("Other".to_string()));
                let idx = options.iter().position(|c| *c == self.category);
                let next = match (idx, forward) {
                    (Some(i), true) => (i + 1) % options.len(),
                    (Some(i), false) => (i + options.len() - 1) % options.len(),
                    (None, _) => 0,
                };
                self.category = options[next].clone();
            }
            ImportField::Validate => self.validate = !self.validate,
            _ => {}
        }
        self.error = None;
    }

    fn default_price(&self) -> &'static str {
        match self.mode {
            ImportMode::Accounts => DEFAULT_IMPORT_PRICE,
            ImportMode::BulkEmails => DEFAULT_BULK_PRICE,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    pub fn validate(&self) -> Result<(), ImportError> {
        match self.mode {
            ImportMode::Accounts => {
                if self.accounts_text.trim().is_empty() {
                    return Err(ImportError::new(
                        ImportField::AccountsText,
                        "paste at least one service and email:password line",
                    ));
                }
            }
            ImportMode::BulkEmails => {
                if self.service_name.trim().is_empty() {
                    return Err(ImportError::new(
                        ImportField::ServiceName,
                        "a service name is required",
                    ));
                }
                if self.password.trim().is_empty() {
                    return Err(ImportError::new(
                        ImportField::Password,
                        "a shared password is required",
                    ));
                }
                if self.emails().is_empty() {
                    return Err(ImportError::new(
                        ImportField::EmailsList,
                        "enter at least one email address",
                    ));
                }
            }
        }

        match self.price.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => Ok(()),
            _ => Err(ImportError::new(
                ImportField::Price,
                "price must be a number of at least 0",
            )),
        }
    }

    /// Validate and record the failure inline, moving focus to the bad field
    pub fn check(&mut self) -> bool {
        match self.validate() {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(err) => {
                self.focus = err.field;
                self.error = Some(err);
                false
            }
        }
    }

    /// Lines of the email list that look like addresses
    pub fn emails(&self) -> Vec<&str> {
        self.emails_list
            .lines()
            .map(str::trim)
            .filter(|line| line.contains('@'))
            .collect()
    }

    /// Form body for `/import_accounts` or `/import_bulk_emails`
    pub fn to_params(&self) -> Vec<(String, String)> {
        let pair = |key: &str, value: &str| (key.to_string(), value.to_string());
        let price = self.price.trim();
        match self.mode {
            ImportMode::Accounts => {
                let mut params = vec![
                    pair("accounts_text", self.accounts_text.trim()),
                    pair("default_type", self.category.as_str()),
                    pair("default_price", price),
                ];
                if self.validate {
                    params.push(pair("validate_accounts", "on"));
                }
                params
            }
            ImportMode::BulkEmails => vec![
                pair("service_name", self.service_name.trim()),
                pair("universal_password", self.password.trim()),
                pair("bulk_type", self.category.as_str()),
                pair("bulk_price", price),
                pair("emails_list", &self.emails().join("\n")),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut ImportForm, text: &str) {
        for c in text.chars() {
            form.push_char(c);
        }
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let mut form = ImportForm::default();
        form.accounts_text = "  \n ".to_string();
        assert!(!form.check());
        assert_eq!(form.focus, ImportField::AccountsText);
    }

    #[test]
    fn test_account_list_params() {
        let mut form = ImportForm::default();
        form.focus = ImportField::AccountsText;
        type_into(&mut form, "Netflix\na@x.com:pw\n");
        form.focus = ImportField::Validate;
        form.cycle_choice(true);

        assert!(form.validate().is_ok());
        assert_eq!(
            form.to_params(),
            vec![
                ("accounts_text".to_string(), "Netflix\na@x.com:pw".to_string()),
                ("default_type".to_string(), "Other".to_string()),
                ("default_price".to_string(), "15.99".to_string()),
                ("validate_accounts".to_string(), "on".to_string()),
            ]
        );
    }

    #[test]
    fn test_bulk_emails_need_every_field() {
        let mut form = ImportForm::default();
        form.focus = ImportField::Mode;
        form.cycle_choice(true);
        assert_eq!(form.mode, ImportMode::BulkEmails);
        assert_eq!(form.price, DEFAULT_BULK_PRICE);

        assert_eq!(form.validate().unwrap_err().field, ImportField::ServiceName);
        form.service_name = "Spotify".to_string();
        assert_eq!(form.validate().unwrap_err().field, ImportField::Password);
        form.password = "shared".to_string();
        form.emails_list = "not an email\n".to_string();
        assert_eq!(form.validate().unwrap_err().field, ImportField::EmailsList);

        form.emails_list = "a@x.com\n\n junk \n b@y.com ".to_string();
        assert!(form.validate().is_ok());
        let params = form.to_params();
        assert!(params.contains(&("emails_list".to_string(), "a@x.com\nb@y.com".to_string())));
        assert!(params.contains(&("bulk_price".to_string(), "9.99".to_string())));
    }

    #[test]
    fn test_edited_price_survives_mode_switch() {
        let mut form = ImportForm::default();
        form.price = "3".to_string();
        form.focus = ImportField::Mode;
        form.cycle_choice(true);
        assert_eq!(form.price, "3");
    }

    #[test]
    fn test_bad_price_is_rejected() {
        let mut form = ImportForm::default();
        form.accounts_text = "Netflix\na@x.com:pw".to_string();
        form.price = "cheap".to_string();
        assert_eq!(form.validate().unwrap_err().field, ImportField::Price);
    }
}
