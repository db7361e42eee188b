//! Account detail dialog
//!
//! Shows every field of one account, including the clear-text password when
//! the row carries one.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::{AccountRecord, Status};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Default)]
pub struct AccountDetailDialog {
    /// Id of the account on display
    pub account_id: String,
}

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Available => Color::Green,
        Status::Sold => Color::Blue,
        Status::Failed => Color::Red,
    }
}

fn row(label: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:10}", label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(value, style),
    ])
}

impl AccountDetailDialog {
    pub fn open(&mut self, id: &str) {
        self.account_id = id.to_string();
    }

    /// Draw the record, or a notice when it has left the table
    pub fn draw_with_record(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        record: Option<&AccountRecord>,
    ) -> Result<()> {
        let popup_area = centered_popup(area, 60, 14);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let white = Style::default().fg(Color::White);
        let lines = match record {
            Some(record) => vec![
                Line::from(""),
                row(
                    "Service",
                    record.display_name().to_string(),
                    white.add_modifier(Modifier::BOLD),
                ),
                row("Email", record.email.clone(), white),
                if record.redacted {
                    row(
                        "Password",
                        "hidden by the server".to_string(),
                        Style::default().fg(Color::DarkGray),
                    )
                } else {
                    row(
                        "Password",
                        record.password.clone(),
                        Style::default().fg(Color::Yellow),
                    )
                },
                row("Category", record.category.to_string(), white),
                row(
                    "Price",
                    record.price.to_string(),
                    Style::default().fg(Color::Green),
                ),
                row(
                    "Status",
                    format!("{} {}", record.status.icon(), record.status.label()),
                    Style::default().fg(status_color(record.status)),
                ),
                row(
                    "ID",
                    record.id.clone(),
                    Style::default().fg(Color::DarkGray),
                ),
            ],
            None => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  This account is no longer in the table",
                    Style::default().fg(Color::Yellow),
                )),
            ],
        };

        let details = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Account Details ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(details, chunks[0]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" c ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Copy login  "),
            Span::styled(" y ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Copy all  "),
            Span::styled(" e ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("Edit  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Close"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

impl Component for AccountDetailDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let id = self.account_id.clone();
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('c') => Some(Action::CopyCredentials(id)),
            KeyCode::Char('y') => Some(Action::CopyDetails(id)),
            KeyCode::Char('e') => Some(Action::OpenEditForm(id)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_record(frame, area, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_actions_carry_account_id() {
        let mut dialog = AccountDetailDialog::default();
        dialog.open("a7");
        let press = |dialog: &mut AccountDetailDialog, c| {
            dialog
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap()
        };
        assert_eq!(
            press(&mut dialog, 'c'),
            Some(Action::CopyCredentials("a7".to_string()))
        );
        assert_eq!(
            press(&mut dialog, 'e'),
            Some(Action::OpenEditForm("a7".to_string()))
        );
    }
}
