//! Analytics overlay
//!
//! Shows the latest analytics snapshot with category and price-range
//! breakdowns, and offers the CSV and HTML exports of the same data.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::overlay_area;
use crate::model::account::format_currency;
use crate::model::{Analytics, ExportFormat};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph},
    Frame,
};

/// Analytics dialog. Content is rebuilt whenever a new snapshot arrives.
#[derive(Default)]
pub struct AnalyticsDialog {
    content: Vec<Line<'static>>,
    price_bars: Vec<(String, u64)>,
}

impl AnalyticsDialog {
    pub fn set_analytics(&mut self, analytics: Option<&Analytics>) {
        match analytics {
            Some(analytics) => {
                self.content = render_analytics(analytics);
                self.price_bars = analytics
                    .ordered_price_ranges()
                    .into_iter()
                    .map(|(range, count)| (format!("${}", range), count))
                    .collect();
            }
            None => {
                self.content = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Loading analytics…",
                        Style::default().fg(Color::DarkGray),
                    )),
                ];
                self.price_bars.clear();
            }
        }
    }
}

impl Component for AnalyticsDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('A') => Some(Action::CloseModal),
            KeyCode::Char('x') => Some(Action::Export(ExportFormat::AnalyticsCsv)),
            KeyCode::Char('p') => Some(Action::Export(ExportFormat::AnalyticsHtml)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let overlay = overlay_area(area, 2);
        frame.render_widget(Clear, overlay);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(overlay);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        let summary = Paragraph::new(self.content.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Analytics ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(summary, body[0]);

        let bars: Vec<Bar> = self
            .price_bars
            .iter()
            .map(|(label, count)| {
                Bar::default()
                    .label(Line::from(label.clone()))
                    .value(*count)
                    .style(Style::default().fg(Color::Green))
            })
            .collect();
        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Available by price "),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(7)
            .bar_gap(2);
        frame.render_widget(chart, body[1]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" x ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Export CSV  "),
            Span::styled(" p ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Printable report  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Close"),
        ]))
        .alignment(ratatui::layout::Alignment::Left)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, main_chunks[1]);

        Ok(())
    }
}

fn metric(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("  {:18}", label)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_analytics(analytics: &Analytics) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""), section("Summary")];
    lines.push(metric(
        "Total products",
        analytics.total_products.to_string(),
        Color::White,
    ));
    lines.push(metric(
        "Available",
        analytics.available_products.to_string(),
        Color::Green,
    ));
    lines.push(metric(
        "Sold",
        analytics.sold_products.to_string(),
        Color::Blue,
    ));
    lines.push(metric(
        "Revenue",
        format_currency(analytics.revenue),
        Color::Yellow,
    ));
    lines.push(metric(
        "Inventory value",
        format_currency(analytics.inventory_value),
        Color::Yellow,
    ));
    lines.push(Line::from(""));

    lines.push(section("Available by category"));
    if analytics.categories.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No available accounts",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (category, count) in &analytics.categories {
        lines.push(metric(category, count.to_string(), Color::Cyan));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lists_categories() {
        let mut analytics = Analytics {
            total_products: 3,
            revenue: 12.5,
            ..Default::default()
        };
        analytics.categories.insert("Gaming".to_string(), 2);

        let mut dialog = AnalyticsDialog::default();
        dialog.set_analytics(Some(&analytics));
        let text: Vec<String> = dialog.content.iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l.contains("Revenue") && l.contains("$12.50")));
        assert!(text.iter().any(|l| l.contains("Gaming") && l.ends_with('2')));

        dialog.set_analytics(None);
        assert!(dialog.price_bars.is_empty());
    }
}
