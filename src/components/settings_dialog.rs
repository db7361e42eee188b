//! Settings dialog
//!
//! Toggles edit a working copy; nothing is persisted until Enter saves it.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::{SettingField, Settings};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct SettingsDialog {
    pub draft: Settings,
    pub selected_index: usize,
    list_state: ListState,
}

impl Default for SettingsDialog {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            draft: Settings::default(),
            selected_index: 0,
            list_state,
        }
    }
}

impl SettingsDialog {
    pub fn open(&mut self, settings: Settings) {
        self.draft = settings;
        self.selected_index = 0;
        self.list_state.select(Some(0));
    }

    fn selected_field(&self) -> SettingField {
        SettingField::all()[self.selected_index]
    }

    fn move_by(&mut self, forward: bool) {
        let len = SettingField::all().len();
        self.selected_index = if forward {
            (self.selected_index + 1).min(len - 1)
        } else {
            self.selected_index.saturating_sub(1)
        };
        self.list_state.select(Some(self.selected_index));
    }
}

impl Component for SettingsDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::SaveSettings(self.draft)),
            KeyCode::Char(' ') => {
                let field = self.selected_field();
                self.draft.toggle(field);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_by(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_by(false);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_popup(area, 44, 11);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let items: Vec<ListItem> = SettingField::all()
            .iter()
            .map(|field| {
                let on = self.draft.get(*field);
                ListItem::new(Line::from(vec![
                    Span::styled(
                        if on { "[x] " } else { "[ ] " },
                        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
                    ),
                    Span::styled(field.label(), Style::default().fg(Color::White)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Settings ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Space ", Style::default().fg(Color::Cyan)),
            Span::raw("Toggle  "),
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Save  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
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
    use crossterm::event::KeyModifiers;

    fn press(dialog: &mut SettingsDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_toggle_then_save_sends_working_copy() {
        let mut dialog = SettingsDialog::default();
        dialog.open(Settings::default());

        press(&mut dialog, KeyCode::Char('j'));
        press(&mut dialog, KeyCode::Char(' '));

        let mut expected = Settings::default();
        expected.toggle(SettingField::all()[1]);
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::SaveSettings(expected))
        );
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut dialog = SettingsDialog::default();
        for _ in 0..10 {
            press(&mut dialog, KeyCode::Down);
        }
        assert_eq!(dialog.selected_index, SettingField::all().len() - 1);
        assert_eq!(press(&mut dialog, KeyCode::Esc), Some(Action::CloseModal));
    }
}
