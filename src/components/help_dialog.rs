//! Keyboard shortcut reference

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::overlay_area;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = overlay_area(area, 4);
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Navigation");
    add_shortcut(&mut lines, "j / ↓", "Next row");
    add_shortcut(&mut lines, "k / ↑", "Previous row");
    add_shortcut(&mut lines, "g / G", "First / last row");
    add_shortcut(&mut lines, "PgDn / PgUp", "Move ten rows");

    add_section(&mut lines, "Search & Filters");
    add_shortcut(&mut lines, "/", "Search email or service");
    add_shortcut(&mut lines, "t", "Filter by category");
    add_shortcut(&mut lines, "s", "Filter by status");
    add_shortcut(&mut lines, "o", "Sort order");
    add_shortcut(&mut lines, "f", "Quick filter by service");
    add_shortcut(&mut lines, "x", "Clear all filters");

    add_section(&mut lines, "Selection");
    add_shortcut(&mut lines, "Space", "Check / uncheck row");
    add_shortcut(&mut lines, "a", "Check / uncheck all");
    add_shortcut(&mut lines, "u", "Uncheck everything");
    add_shortcut(&mut lines, "y", "Copy checked accounts");
    add_shortcut(&mut lines, "d", "Delete checked accounts");

    add_section(&mut lines, "Accounts");
    add_shortcut(&mut lines, "Enter", "Account details");
    add_shortcut(&mut lines, "c", "Copy email:password");
    add_shortcut(&mut lines, "n", "Add account");
    add_shortcut(&mut lines, "i", "Import accounts");
    add_shortcut(&mut lines, "e", "Edit account");
    add_shortcut(&mut lines, "r", "Reload from server");

    add_section(&mut lines, "Reports & Maintenance");
    add_shortcut(&mut lines, "A", "Analytics");
    add_shortcut(&mut lines, "I", "Import report");
    add_shortcut(&mut lines, "E", "Export menu");
    add_shortcut(&mut lines, "m", "Maintenance menu");
    add_shortcut(&mut lines, "R", "Replay stats counters");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "S", "Settings");
    add_shortcut(&mut lines, "Esc", "Dismiss newest notification");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit");
    add_shortcut(&mut lines, "Ctrl+c", "Quit immediately");

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_bulk_shortcuts() {
        let text: Vec<String> = build_help_content()
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert!(text.iter().any(|l| l.contains("Delete checked accounts")));
        assert!(text.iter().any(|l| l.contains("Reports & Maintenance")));
    }
}
