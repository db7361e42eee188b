//! Add / edit account form dialog

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::{AccountForm, FormField};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Label column width, so values line up
const LABEL_WIDTH: usize = 12;

#[derive(Default)]
pub struct AccountFormDialog {
    pub form: AccountForm,
}

impl AccountFormDialog {
    pub fn open(&mut self, form: AccountForm) {
        self.form = form;
    }

    fn field_line(&self, field: FormField) -> Line<'static> {
        let focused = self.form.focus == field;
        let has_error = self
            .form
            .error
            .as_ref()
            .is_some_and(|err| err.field == field);

        let label_style = if has_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let value = self.form.value(field);
        let value_text = if field.is_choice() {
            if focused {
                format!("◀ {} ▶", value)
            } else {
                value
            }
        } else if focused {
            format!("{}_", value)
        } else {
            value
        };
        let value_style = if focused {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        Line::from(vec![
            Span::styled(if focused { "▶ " } else { "  " }, label_style),
            Span::styled(format!("{:width$}", field.label(), width = LABEL_WIDTH), label_style),
            Span::styled(value_text, value_style),
        ])
    }
}

impl Component for AccountFormDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::SubmitForm),
            KeyCode::Char('g') if ctrl => Some(Action::GeneratePassword),
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus_prev();
                None
            }
            KeyCode::Left | KeyCode::Right if self.form.focus.is_choice() => {
                self.form.cycle_choice(key.code == KeyCode::Right);
                Some(Action::FormEdited)
            }
            KeyCode::Backspace => {
                self.form.pop_char();
                Some(Action::FormEdited)
            }
            KeyCode::Char(c) if !ctrl => {
                self.form.push_char(c);
                Some(Action::FormEdited)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let fields = self.form.fields();
        let height = fields.len() as u16 + 9 + u16::from(self.form.credentials_required);
        let popup_area = centered_popup(area, 64, height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(3)])
            .split(popup_area);

        let mut lines = vec![Line::from("")];
        if self.form.credentials_required {
            lines.push(Line::from(Span::styled(
                "  The server hides credentials, re-enter email and password",
                Style::default().fg(Color::Yellow),
            )));
        }
        for field in fields {
            lines.push(self.field_line(field));
        }
        lines.push(Line::from(""));
        match &self.form.error {
            Some(error) => lines.push(Line::from(Span::styled(
                format!("  Error: {}", error),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from("")),
        }

        let title = if self.form.is_edit() {
            " Edit Account "
        } else {
            " Add Account "
        };
        let form = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title)
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(form, chunks[0]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Save  "),
            Span::styled(" Tab ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("Next field  "),
            Span::styled(" ←/→ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("Choose  "),
            Span::styled(" Ctrl+g ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
            Span::raw("Password  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn press(dialog: &mut AccountFormDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_typing_reports_edits() {
        let mut dialog = AccountFormDialog::default();
        for c in "a@hulu.com".chars() {
            assert_eq!(press(&mut dialog, KeyCode::Char(c)), Some(Action::FormEdited));
        }
        assert_eq!(dialog.form.email, "a@hulu.com");
        assert_eq!(dialog.form.name, "Hulu Premium");
    }

    #[test]
    fn test_arrows_cycle_choice_fields_only() {
        let mut dialog = AccountFormDialog::default();
        dialog.form.focus = FormField::Category;
        assert_eq!(press(&mut dialog, KeyCode::Right), Some(Action::FormEdited));
        assert_eq!(dialog.form.category, Category::Gaming);

        dialog.form.focus = FormField::Email;
        assert_eq!(press(&mut dialog, KeyCode::Right), None);
    }

    #[test]
    fn test_ctrl_g_requests_password() {
        let mut dialog = AccountFormDialog::default();
        let action = dialog
            .handle_key_event(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::GeneratePassword));
        assert!(dialog.form.email.is_empty());
    }
}
