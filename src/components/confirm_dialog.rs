//! Yes/no confirmation dialog
//!
//! Used before quitting, deleting selected rows, running server maintenance
//! and wiping the local cache.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::ConfirmKind;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Rows listed by name in a bulk delete prompt before summarizing the rest
const MAX_LISTED_ROWS: usize = 8;

/// Confirmation dialog. The App fills in what is being confirmed.
pub struct ConfirmDialog {
    pub kind: ConfirmKind,
    /// One line per affected row, for bulk deletes
    pub items: Vec<String>,
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self {
            kind: ConfirmKind::Quit,
            items: Vec::new(),
        }
    }
}

impl ConfirmDialog {
    pub fn set(&mut self, kind: ConfirmKind, items: Vec<String>) {
        self.kind = kind;
        self.items = items;
    }

    fn title(&self) -> &'static str {
        match self.kind {
            ConfirmKind::Quit => " Quit? ",
            ConfirmKind::BulkDelete { .. } => " Delete Accounts ",
            ConfirmKind::Maintenance(_) => " Maintenance ",
            ConfirmKind::ClearCache => " Clear Cache ",
        }
    }

    fn question(&self) -> String {
        match &self.kind {
            ConfirmKind::Quit => "Are you sure you want to quit?".to_string(),
            ConfirmKind::BulkDelete { ids } => {
                format!("Delete {} selected account(s)?", ids.len())
            }
            ConfirmKind::Maintenance(task) => format!("Run \"{}\" on the server?", task.label()),
            ConfirmKind::ClearCache => "Forget saved settings and the form draft?".to_string(),
        }
    }

    fn accent(&self) -> Color {
        match self.kind {
            ConfirmKind::Quit => Color::Yellow,
            _ => Color::Red,
        }
    }

    fn content(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.question(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        if !self.items.is_empty() {
            lines.push(Line::from(""));
            for item in self.items.iter().take(MAX_LISTED_ROWS) {
                lines.push(Line::from(Span::styled(
                    format!("• {}", item),
                    Style::default().fg(Color::Gray),
                )));
            }
            if self.items.len() > MAX_LISTED_ROWS {
                lines.push(Line::from(Span::styled(
                    format!("… and {} more", self.items.len() - MAX_LISTED_ROWS),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                " y ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Yes  "),
            Span::styled(
                " n/Esc ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("No, cancel"),
        ]));
        lines
    }
}

impl Component for ConfirmDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => match self.kind {
                ConfirmKind::Quit => Some(Action::ForceQuit),
                _ => Some(Action::ConfirmModal),
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content = self.content();
        let height = content.len() as u16 + 2;
        let width = if self.items.is_empty() { 48 } else { 60 };
        let popup_area = centered_popup(area, width, height);

        frame.render_widget(Clear, popup_area);

        let accent = self.accent();
        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent))
                    .title(self.title())
                    .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: false })
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_confirms_with_force_quit() {
        let mut dialog = ConfirmDialog::default();
        assert_eq!(dialog.handle_key_event(key('y')).unwrap(), Some(Action::ForceQuit));
        assert_eq!(dialog.handle_key_event(key('n')).unwrap(), Some(Action::CloseModal));
    }

    #[test]
    fn test_bulk_delete_lists_rows() {
        let mut dialog = ConfirmDialog::default();
        let items: Vec<String> = (0..10).map(|i| format!("row{}", i)).collect();
        dialog.set(
            ConfirmKind::BulkDelete {
                ids: (0..10).map(|i| i.to_string()).collect(),
            },
            items,
        );
        assert_eq!(
            dialog.handle_key_event(key('Y')).unwrap(),
            Some(Action::ConfirmModal)
        );
        assert_eq!(dialog.question(), "Delete 10 selected account(s)?");

        let text: Vec<String> = dialog.content().iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l == "• row7"));
        assert!(!text.iter().any(|l| l == "• row8"));
        assert!(text.iter().any(|l| l == "… and 2 more"));
    }
}
