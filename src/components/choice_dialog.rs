//! List picker dialog
//!
//! One dialog serves every single-choice list: category, status and sort
//! filters, service quick filters, and the maintenance and export menus.

use crate::action::Action;
use crate::component::Component;
use crate::model::ChoiceKind;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Single-choice list dialog
pub struct ChoiceDialog {
    pub kind: ChoiceKind,
    pub options: Vec<String>,
    /// Index of the entry currently in effect, marked with a dot
    pub current: Option<usize>,
    pub selected_index: usize,
    list_state: ListState,
}

impl Default for ChoiceDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChoiceDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            kind: ChoiceKind::Category,
            options: Vec::new(),
            current: None,
            selected_index: 0,
            list_state,
        }
    }

    /// Load a list, starting the cursor on the active entry
    pub fn set_options(&mut self, kind: ChoiceKind, options: Vec<String>, current: Option<usize>) {
        self.kind = kind;
        self.options = options;
        self.current = current.filter(|&i| i < self.options.len());
        self.selected_index = self.current.unwrap_or(0);
        self.list_state.select(Some(self.selected_index));
    }

    fn select_next(&mut self) {
        if self.selected_index + 1 < self.options.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn empty_message(&self) -> &'static str {
        match self.kind {
            ChoiceKind::QuickService => "No services found",
            _ => "Nothing to choose from",
        }
    }
}

impl Component for ChoiceDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter if !self.options.is_empty() => {
                Some(Action::ChooseOption(self.selected_index))
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 46u16.min(area.width.saturating_sub(4));
        let content_height = self.options.len().max(1) as u16 + 2;
        let popup_height = (content_height + 3).min(area.height.saturating_sub(2)).max(8);

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(self.kind.title())
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            );

        if self.options.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    self.empty_message(),
                    Style::default().fg(Color::Yellow),
                )),
            ])
            .alignment(ratatui::layout::Alignment::Center)
            .block(block);
            frame.render_widget(empty, chunks[0]);
        } else {
            let items: Vec<ListItem> = self
                .options
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    let is_current = self.current == Some(i);
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            if is_current { "● " } else { "  " },
                            Style::default().fg(Color::Green),
                        ),
                        Span::styled(
                            option.clone(),
                            if is_current {
                                Style::default()
                                    .fg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD)
                            } else {
                                Style::default().fg(Color::White)
                            },
                        ),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        let help_text = if self.options.is_empty() {
            vec![
                Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
                Span::raw("Close"),
            ]
        } else {
            vec![
                Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
                Span::raw("Select  "),
                Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
                Span::raw("Navigate  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
                Span::raw("Cancel"),
            ]
        };
        let help = Paragraph::new(Line::from(help_text))
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dialog(options: &[&str], current: Option<usize>) -> ChoiceDialog {
        let mut dialog = ChoiceDialog::new();
        dialog.set_options(
            ChoiceKind::Status,
            options.iter().map(|s| s.to_string()).collect(),
            current,
        );
        dialog
    }

    #[test]
    fn test_cursor_starts_on_current_entry() {
        let dialog = dialog(&["All", "Available", "Sold"], Some(2));
        assert_eq!(dialog.selected_index, 2);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut dialog = dialog(&["All", "Available"], None);
        dialog.handle_key_event(key(KeyCode::Up)).unwrap();
        assert_eq!(dialog.selected_index, 0);
        dialog.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        dialog.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(dialog.selected_index, 1);

        let action = dialog.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::ChooseOption(1)));
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        let mut dialog = dialog(&[], Some(3));
        assert_eq!(dialog.current, None);
        assert_eq!(dialog.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
    }
}
