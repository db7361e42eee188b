//! Bulk import dialog
//!
//! Text areas take Enter as a new line; Ctrl+s submits from anywhere.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::{ImportField, ImportForm};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const LABEL_WIDTH: usize = 10;
/// Lines of a text area kept on screen; the tail is shown while typing
const TEXT_AREA_LINES: usize = 6;

#[derive(Default)]
pub struct ImportDialog {
    pub form: ImportForm,
}

impl ImportDialog {
    pub fn open(&mut self) {
        self.form = ImportForm::default();
    }

    fn label_style(&self, field: ImportField) -> Style {
        let has_error = self
            .form
            .error
            .as_ref()
            .is_some_and(|err| err.field == field);
        if has_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if self.form.focus == field {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn field_lines(&self, field: ImportField) -> Vec<Line<'static>> {
        let focused = self.form.focus == field;
        let label_style = self.label_style(field);
        let marker = Span::styled(if focused { "▶ " } else { "  " }, label_style);
        let label = Span::styled(
            format!("{:width$}", field.label(), width = LABEL_WIDTH),
            label_style,
        );
        let value_style = Style::default().fg(Color::White);
        let value = self.form.value(field);

        if field.is_multiline() {
            let mut text: Vec<String> = value.split('\n').map(str::to_string).collect();
            if focused {
                if let Some(last) = text.last_mut() {
                    last.push('_');
                }
            }
            let skip = text.len().saturating_sub(TEXT_AREA_LINES);
            let mut lines = vec![Line::from(vec![
                marker,
                label,
                Span::styled(
                    format!("{} line(s)", value.lines().count()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])];
            for row in text.into_iter().skip(skip) {
                lines.push(Line::from(Span::styled(format!("    {}", row), value_style)));
            }
            while lines.len() <= TEXT_AREA_LINES {
                lines.push(Line::from(""));
            }
            return lines;
        }

        let value_text = match (field.is_choice(), focused) {
            (true, true) => format!("◀ {} ▶", value),
            (false, true) => format!("{}_", value),
            _ => value,
        };
        vec![Line::from(vec![
            marker,
            label,
            Span::styled(value_text, value_style),
        ])]
    }
}

impl Component for ImportDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Char('s') if ctrl => Some(Action::SubmitImport),
            KeyCode::Enter if self.form.focus.is_multiline() => {
                self.form.push_char('\n');
                None
            }
            KeyCode::Enter => Some(Action::SubmitImport),
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
                None
            }
            KeyCode::Backspace => {
                self.form.pop_char();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                self.form.push_char(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let mut lines = vec![Line::from("")];
        for field in self.form.fields() {
            lines.extend(self.field_lines(field));
        }
        lines.push(Line::from(""));
        match &self.form.error {
            Some(error) => lines.push(Line::from(Span::styled(
                format!("  Error: {}", error),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from(Span::styled(
                "  Account list: a service line, then its email:password lines",
                Style::default().fg(Color::DarkGray),
            ))),
        }

        let height = lines.len() as u16 + 5;
        let popup_area = centered_popup(area, 70, height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(3)])
            .split(popup_area);

        let form = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Import Accounts ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(form, chunks[0]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Ctrl+s ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Import  "),
            Span::styled(" Tab ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("Next field  "),
            Span::styled(" ←/→ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("Choose  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Cancel"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::import::ImportMode;

    fn press(dialog: &mut ImportDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_enter_breaks_lines_in_text_area() {
        let mut dialog = ImportDialog::default();
        assert_eq!(press(&mut dialog, KeyCode::Tab), None);
        assert_eq!(dialog.form.focus, ImportField::AccountsText);

        for c in "Netflix".chars() {
            press(&mut dialog, KeyCode::Char(c));
        }
        assert_eq!(press(&mut dialog, KeyCode::Enter), None);
        press(&mut dialog, KeyCode::Char('a'));
        assert_eq!(dialog.form.accounts_text, "Netflix\na");
    }

    #[test]
    fn test_enter_submits_outside_text_area() {
        let mut dialog = ImportDialog::default();
        dialog.form.focus = ImportField::Price;
        assert_eq!(press(&mut dialog, KeyCode::Enter), Some(Action::SubmitImport));

        let action = dialog
            .handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::SubmitImport));
    }

    #[test]
    fn test_arrows_switch_mode() {
        let mut dialog = ImportDialog::default();
        press(&mut dialog, KeyCode::Right);
        assert_eq!(dialog.form.mode, ImportMode::BulkEmails);
        assert!(dialog.form.fields().contains(&ImportField::EmailsList));
    }
}
