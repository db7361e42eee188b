//! Add / edit account form state

use super::account::{AccountRecord, Category, Price, Status};
use super::settings::FormDraft;
use thiserror::Error;

/// Form fields in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Email,
    Password,
    Name,
    Category,
    Price,
    Quantity,
    Status,
    Description,
}

impl FormField {
    /// Name used on the wire and as the draft key
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Email => "email",
            FormField::Password => "password",
            FormField::Name => "name",
            FormField::Category => "type",
            FormField::Price => "price",
            FormField::Quantity => "quantity",
            FormField::Status => "status",
            FormField::Description => "description",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Email => "Email",
            FormField::Password => "Password",
            FormField::Name => "Service",
            FormField::Category => "Category",
            FormField::Price => "Price",
            FormField::Quantity => "Quantity",
            FormField::Status => "Status",
            FormField::Description => "Description",
        }
    }

    /// Fields cycled with Left/Right instead of typed
    pub fn is_choice(&self) -> bool {
        matches!(self, FormField::Category | FormField::Status)
    }
}

/// Whether the form creates a new account or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { account_id: String },
}

/// A field failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .field.label())]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Service name suggested for an email: `a@netflix.com` gives `Netflix Premium`
pub fn suggest_name(email: &str) -> Option<String> {
    let domain = email.split('@').nth(1)?;
    let service = domain.split('.').next()?;
    let mut chars = service.chars();
    let first = chars.next()?;
    Some(format!(
        "{}{} Premium",
        first.to_uppercase(),
        chars.as_str()
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountForm {
    pub mode: FormMode,
    pub email: String,
    pub password: String,
    pub name: String,
    pub category: Category,
    pub price: String,
    pub quantity: String,
    pub status: Status,
    pub description: String,
    /// Email and password must be typed again because the row was redacted.
    /// The server overwrites both on every edit.
    pub credentials_required: bool,
    pub focus: FormField,
    pub error: Option<FieldError>,
}

impl Default for AccountForm {
    fn default() -> Self {
        Self::new_add()
    }
}

impl AccountForm {
    pub fn new_add() -> Self {
        Self {
            mode: FormMode::Add,
            email: String::new(),
            password: String::new(),
            name: String::new(),
            category: Category::Streaming,
            price: String::new(),
            quantity: "1".to_string(),
            status: Status::Available,
            description: String::new(),
            credentials_required: false,
            focus: FormField::Email,
            error: None,
        }
    }

    /// Add form with a saved draft restored over the defaults
    pub fn from_draft(draft: &FormDraft) -> Self {
        let mut form = Self::new_add();
        for field in form.fields() {
            if let Some(value) = draft.get(field.key()) {
                form.set_value(field, value);
            }
        }
        form
    }

    /// Edit form prefilled from a record. Quantity resets to 1.
    /// A redacted record leaves email and password blank.
    pub fn for_record(record: &AccountRecord) -> Self {
        let (email, password) = if record.redacted {
            (String::new(), String::new())
        } else {
            (record.email.clone(), record.password.clone())
        };
        Self {
            mode: FormMode::Edit {
                account_id: record.id.clone(),
            },
            email,
            password,
            name: record.service_name.clone(),
            category: record.category.clone(),
            price: record.price.plain(),
            quantity: "1".to_string(),
            status: record.status,
            description: String::new(),
            credentials_required: record.redacted,
            focus: FormField::Email,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// Fields shown for the current mode. Status is only editable on existing accounts.
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Email,
            FormField::Password,
            FormField::Name,
            FormField::Category,
            FormField::Price,
            FormField::Quantity,
        ];
        if self.is_edit() {
            fields.push(FormField::Status);
        }
        fields.push(FormField::Description);
        fields
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Email => self.email.clone(),
            FormField::Password => self.password.clone(),
            FormField::Name => self.name.clone(),
            FormField::Category => self.category.as_str().to_string(),
            FormField::Price => self.price.clone(),
            FormField::Quantity => self.quantity.clone(),
            FormField::Status => self.status.as_str().to_string(),
            FormField::Description => self.description.clone(),
        }
    }

    fn set_value(&mut self, field: FormField, value: &str) {
        match field {
            FormField::Email => self.email = value.to_string(),
            FormField::Password => self.password = value.to_string(),
            FormField::Name => self.name = value.to_string(),
            FormField::Category => self.category = Category::from(value),
            FormField::Price => self.price = value.to_string(),
            FormField::Quantity => self.quantity = value.to_string(),
            FormField::Status => {
                if let Some(status) = Status::parse(value) {
                    self.status = status;
                }
            }
            FormField::Description => self.description = value.to_string(),
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Email => Some(&mut self.email),
            FormField::Password => Some(&mut self.password),
            FormField::Name => Some(&mut self.name),
            FormField::Price => Some(&mut self.price),
            FormField::Quantity => Some(&mut self.quantity),
            FormField::Description => Some(&mut self.description),
            FormField::Category | FormField::Status => None,
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

    /// Type a character into the focused text field
    pub fn push_char(&mut self, c: char) {
        let focus = self.focus;
        if let Some(text) = self.text_mut(focus) {
            text.push(c);
            self.after_edit(focus);
        }
    }

    pub fn pop_char(&mut self) {
        let focus = self.focus;
        if let Some(text) = self.text_mut(focus) {
            text.pop();
            self.after_edit(focus);
        }
    }

    /// Cycle the focused choice field
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            FormField::Category => {
                let options = Category::known();
                let idx = options.iter().position(|c| *c == self.category);
                let next = match (idx, forward) {
                    (Some(i), true) => (i + 1) % options.len(),
                    (Some(i), false) => (i + options.len() - 1) % options.len(),
                    (None, _) => 0,
                };
                self.category = options[next].clone();
            }
            FormField::Status => {
                let options = Status::all();
                let idx = options.iter().position(|s| *s == self.status).unwrap_or(0);
                let next = if forward {
                    (idx + 1) % options.len()
                } else {
                    (idx + options.len() - 1) % options.len()
                };
                self.status = options[next];
            }
            _ => {}
        }
        self.error = None;
    }

    pub fn set_password(&mut self, password: String) {
        self.password = password;
        self.error = None;
    }

    fn after_edit(&mut self, field: FormField) {
        self.error = None;
        if field == FormField::Email && self.mode == FormMode::Add && self.name.is_empty() {
            if let Some(name) = suggest_name(&self.email) {
                self.name = name;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Check the fields that would block submission
    pub fn validate(&self) -> Result<(), FieldError> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((_, domain)) if !domain.trim().is_empty() => {}
            _ => {
                return Err(FieldError::new(
                    FormField::Email,
                    "enter a valid email address",
                ))
            }
        }

        if self.credentials_required {
            if email.contains("***@") {
                return Err(FieldError::new(
                    FormField::Email,
                    "enter the full email, the listing only shows a masked one",
                ));
            }
            if self.password.trim().is_empty() {
                return Err(FieldError::new(
                    FormField::Password,
                    "re-enter the password, the server does not send it",
                ));
            }
        }

        match self.price.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => {}
            _ => {
                return Err(FieldError::new(
                    FormField::Price,
                    "price must be a number of at least 0",
                ))
            }
        }

        match self.quantity.trim().parse::<u32>() {
            Ok(quantity) if quantity > 0 => {}
            _ => {
                return Err(FieldError::new(
                    FormField::Quantity,
                    "quantity must be a whole number of at least 1",
                ))
            }
        }

        Ok(())
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

    /// Form body for `/add_account` or `/edit_account`
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let FormMode::Edit { account_id } = &self.mode {
            params.push(("account_id".to_string(), account_id.clone()));
        }
        for field in self.fields() {
            let value = self.value(field);
            params.push((field.key().to_string(), value.trim().to_string()));
        }
        params
    }

    /// The record as it reads after this edit, keeping the original id.
    /// Unparsable prices keep their text.
    pub fn edited_record(&self, original: &AccountRecord) -> AccountRecord {
        let price = match self.price.trim().parse::<f64>() {
            Ok(amount) => Price::from_amount(amount),
            Err(_) => Price::from_text(self.price.trim()),
        };
        AccountRecord {
            id: original.id.clone(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            service_name: self.name.trim().to_string(),
            category: self.category.clone(),
            price,
            status: self.status,
            redacted: original.redacted,
        }
    }

    /// Snapshot of every field, for the draft store
    pub fn to_draft(&self) -> FormDraft {
        let mut draft = FormDraft::default();
        for field in self.fields() {
            draft.set(field.key(), self.value(field));
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut AccountForm, text: &str) {
        for c in text.chars() {
            form.push_char(c);
        }
    }

    fn filled_form() -> AccountForm {
        let mut form = AccountForm::new_add();
        form.email = "a@netflix.com".to_string();
        form.price = "9.99".to_string();
        form
    }

    #[test]
    fn test_suggest_name_from_domain() {
        assert_eq!(
            suggest_name("user@netflix.com"),
            Some("Netflix Premium".to_string())
        );
        assert_eq!(suggest_name("user@"), None);
        assert_eq!(suggest_name("user"), None);
    }

    #[test]
    fn test_email_fills_empty_name() {
        let mut form = AccountForm::new_add();
        type_into(&mut form, "bob@hulu.com");
        assert_eq!(form.name, "Hulu Premium");
    }

    #[test]
    fn test_email_does_not_overwrite_name() {
        let mut form = AccountForm::new_add();
        form.name = "Custom".to_string();
        type_into(&mut form, "bob@hulu.com");
        assert_eq!(form.name, "Custom");
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut form = filled_form();
        form.email = "not-an-email".to_string();
        assert_eq!(form.validate().unwrap_err().field, FormField::Email);

        form.email = "user@".to_string();
        assert_eq!(form.validate().unwrap_err().field, FormField::Email);
    }

    #[test]
    fn test_validate_rejects_bad_price_and_quantity() {
        let mut form = filled_form();
        form.price = "-1".to_string();
        assert_eq!(form.validate().unwrap_err().field, FormField::Price);

        form.price = "abc".to_string();
        assert_eq!(form.validate().unwrap_err().field, FormField::Price);

        form.price = "0".to_string();
        form.quantity = "0".to_string();
        assert_eq!(form.validate().unwrap_err().field, FormField::Quantity);

        form.quantity = "2".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_check_moves_focus_to_error() {
        let mut form = filled_form();
        form.quantity = "x".to_string();
        assert!(!form.check());
        assert_eq!(form.focus, FormField::Quantity);
        assert!(form.error.is_some());
    }

    #[test]
    fn test_draft_round_trip() {
        let mut form = filled_form();
        form.category = Category::Gaming;
        form.description = "family plan".to_string();

        let restored = AccountForm::from_draft(&form.to_draft());
        assert_eq!(restored.email, "a@netflix.com");
        assert_eq!(restored.category, Category::Gaming);
        assert_eq!(restored.description, "family plan");
    }

    #[test]
    fn test_edit_params_include_account_id() {
        let record = AccountRecord {
            id: "abc123".to_string(),
            email: "a@x.com".to_string(),
            password: "pw".to_string(),
            service_name: "Netflix".to_string(),
            category: Category::Streaming,
            price: Price::from_text("$9.99"),
            status: Status::Sold,
            redacted: false,
        };
        let form = AccountForm::for_record(&record);
        let params = form.to_params();

        assert_eq!(params[0], ("account_id".to_string(), "abc123".to_string()));
        assert!(params.contains(&("price".to_string(), "9.99".to_string())));
        assert!(params.contains(&("status".to_string(), "sold".to_string())));
        assert!(params.contains(&("type".to_string(), "Streaming".to_string())));
    }

    #[test]
    fn test_focus_cycles_through_fields() {
        let mut form = AccountForm::new_add();
        form.focus_prev();
        assert_eq!(form.focus, FormField::Description);
        form.focus_next();
        assert_eq!(form.focus, FormField::Email);
    }

    #[test]
    fn test_edited_record_keeps_id() {
        let original = AccountRecord {
            id: "42".to_string(),
            email: "old@x.com".to_string(),
            password: "pw".to_string(),
            service_name: "Old".to_string(),
            category: Category::Gaming,
            price: Price::from_text("$1.00"),
            status: Status::Available,
            redacted: false,
        };
        let mut form = AccountForm::for_record(&original);
        form.email = " new@x.com ".to_string();
        form.price = "12.5".to_string();
        form.status = Status::Sold;

        let edited = form.edited_record(&original);
        assert_eq!(edited.id, "42");
        assert_eq!(edited.email, "new@x.com");
        assert_eq!(edited.price.as_str(), "$12.50");
        assert_eq!(edited.status, Status::Sold);
    }

    #[test]
    fn test_redacted_record_requires_credentials() {
        let json = r#"{"id":"1","email":"abc***@x.com","name":"Netflix","type":"Streaming","price":9.99,"status":"available"}"#;
        let record = AccountRecord {
            redacted: true,
            ..serde_json::from_str(json).unwrap()
        };
        let mut form = AccountForm::for_record(&record);
        assert!(form.email.is_empty());
        assert!(form.password.is_empty());

        form.price = "12".to_string();
        form.email = "abc***@x.com".to_string();
        assert_eq!(form.validate().unwrap_err().field, FormField::Email);

        form.email = "abcdef@x.com".to_string();
        assert_eq!(form.validate().unwrap_err().field, FormField::Password);

        form.password = "hunter2".to_string();
        assert!(form.validate().is_ok());
        let params = form.to_params();
        assert!(params.contains(&("email".to_string(), "abcdef@x.com".to_string())));
        assert!(params.contains(&("password".to_string(), "hunter2".to_string())));
        assert!(!params.iter().any(|(_, v)| v.contains("***")));
    }
}
