//! Import report overlay

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::overlay_area;
use crate::model::ImportReport;
use crate::services::report::format_timestamp;
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
pub struct ImportReportDialog {
    pub scroll_offset: usize,
}

impl ImportReportDialog {
    pub fn draw_with_report(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        report: Option<&ImportReport>,
    ) -> Result<()> {
        let overlay = overlay_area(area, 3);
        frame.render_widget(Clear, overlay);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(overlay);

        let lines = match report {
            Some(report) => report_lines(report),
            None => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Loading import report…",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        };

        let visible = chunks[0].height.saturating_sub(2) as usize;
        let max_scroll = lines.len().saturating_sub(visible);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(" Import Report ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, chunks[0]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" c ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Copy report  "),
            Span::styled(" j/k ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("Scroll  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Close"),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

impl Component for ImportReportDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('I') => Some(Action::CloseModal),
            KeyCode::Char('c') => Some(Action::CopyImportReport),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_report(frame, area, None)
    }
}

fn report_lines(report: &ImportReport) -> Vec<Line<'static>> {
    let label = |text: &str| Span::raw(format!("  {:14}", text));
    let date = report
        .last_import
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| "never".to_string());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", report.service_name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![label("Last import"), Span::raw(date)]),
        Line::from(vec![
            label("Imported"),
            Span::styled(
                report.total_imported.to_string(),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            label("Failed"),
            Span::styled(
                report.failed_count.to_string(),
                Style::default().fg(Color::Red),
            ),
        ]),
    ];
    if let Some(rate) = report.success_rate() {
        lines.push(Line::from(vec![
            label("Success rate"),
            Span::styled(format!("{:.1}%", rate), Style::default().fg(Color::Cyan)),
        ]));
    }

    lines.push(Line::from(""));
    if report.failed_accounts.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No failed accounts",
            Style::default().fg(Color::Green),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  Failed accounts",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        for (i, failed) in report.failed_accounts.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:>3}. ", i + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(failed.email.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  {}", failed.reason),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }
    lines
}
