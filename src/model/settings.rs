//! Client-side preferences and the add-account draft

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User preferences, persisted under the `settings` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    /// Animate the stats counters
    pub animations: bool,
    pub email_notif: bool,
    /// Ring the terminal bell on notifications
    pub sound_notif: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            animations: true,
            email_notif: true,
            sound_notif: false,
        }
    }
}

/// Which setting a toggle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    DarkMode,
    Animations,
    EmailNotif,
    SoundNotif,
}

impl SettingField {
    pub fn all() -> [SettingField; 4] {
        [
            SettingField::DarkMode,
            SettingField::Animations,
            SettingField::EmailNotif,
            SettingField::SoundNotif,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingField::DarkMode => "Dark mode",
            SettingField::Animations => "Animations",
            SettingField::EmailNotif => "Email notifications",
            SettingField::SoundNotif => "Sound notifications",
        }
    }
}

impl Settings {
    pub fn get(&self, field: SettingField) -> bool {
        match field {
            SettingField::DarkMode => self.dark_mode,
            SettingField::Animations => self.animations,
            SettingField::EmailNotif => self.email_notif,
            SettingField::SoundNotif => self.sound_notif,
        }
    }

    pub fn toggle(&mut self, field: SettingField) {
        let slot = match field {
            SettingField::DarkMode => &mut self.dark_mode,
            SettingField::Animations => &mut self.animations,
            SettingField::EmailNotif => &mut self.email_notif,
            SettingField::SoundNotif => &mut self.sound_notif,
        };
        *slot = !*slot;
    }
}

/// Saved add-account form fields, keyed by form field name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDraft(pub BTreeMap<String, String>);

impl FormDraft {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    /// A draft with every field blank carries nothing worth restoring
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_wire_names() {
        let settings = Settings {
            dark_mode: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"darkMode\":true"));
        assert!(json.contains("\"soundNotif\":false"));
    }

    #[test]
    fn test_settings_missing_keys_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"darkMode":true}"#).unwrap();
        assert!(settings.dark_mode);
        assert!(settings.animations);
    }

    #[test]
    fn test_settings_toggle() {
        let mut settings = Settings::default();
        settings.toggle(SettingField::SoundNotif);
        assert!(settings.get(SettingField::SoundNotif));
        settings.toggle(SettingField::Animations);
        assert!(!settings.animations);
    }

    #[test]
    fn test_form_draft_blank() {
        let mut draft = FormDraft::default();
        assert!(draft.is_blank());
        draft.set("email", " ");
        assert!(draft.is_blank());
        draft.set("email", "a@x.com");
        assert!(!draft.is_blank());
        assert_eq!(draft.get("email"), Some("a@x.com"));
    }
}
