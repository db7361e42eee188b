//! Accounts screen
//!
//! The main view: stats cards, the active filters, the accounts table with
//! its checkboxes, toasts and the help bar. Table data lives in the App; this
//! component only owns the row cursor and the search input mode.

use super::account_detail::status_color;
use super::layout::{calculate_main_layout, stat_cards, toast_slot};
use crate::action::Action;
use crate::component::Component;
use crate::model::account::format_currency;
use crate::model::filter::FilterCriteria;
use crate::model::toast::Toast;
use crate::model::{AccountTable, ChoiceKind, CounterAnimation, StatsCounters, ToastLevel};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthChar;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

/// Rows moved by PageUp / PageDown
const PAGE_SIZE: usize = 10;

pub struct AccountsComponent {
    pub table_state: TableState,
    pub search_mode: bool,
}

impl Default for AccountsComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountsComponent {
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
            search_mode: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor
    // ─────────────────────────────────────────────────────────────────────────

    /// Id of the visible data row under the cursor
    pub fn selected_id(&self, table: &AccountTable) -> Option<String> {
        let index = self.table_state.selected()?;
        table
            .visible_records()
            .get(index)
            .map(|record| record.id.clone())
    }

    pub fn next(&mut self, visible: usize) {
        self.move_to(visible, |current| current + 1);
    }

    pub fn previous(&mut self, visible: usize) {
        self.move_to(visible, |current| current.saturating_sub(1));
    }

    pub fn page_down(&mut self, visible: usize) {
        self.move_to(visible, |current| current + PAGE_SIZE);
    }

    pub fn page_up(&mut self, visible: usize) {
        self.move_to(visible, |current| current.saturating_sub(PAGE_SIZE));
    }

    pub fn select_first(&mut self, visible: usize) {
        self.table_state
            .select(if visible == 0 { None } else { Some(0) });
    }

    pub fn select_last(&mut self, visible: usize) {
        self.table_state.select(visible.checked_sub(1));
    }

    /// Keep the cursor on a row after the visible set changed
    pub fn clamp(&mut self, visible: usize) {
        match (self.table_state.selected(), visible) {
            (_, 0) => self.table_state.select(None),
            (None, _) => self.table_state.select(Some(0)),
            (Some(i), n) if i >= n => self.table_state.select(Some(n - 1)),
            _ => {}
        }
    }

    fn move_to(&mut self, visible: usize, step: impl Fn(usize) -> usize) {
        if visible == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(step(current).min(visible - 1)));
    }
}

impl Component for AccountsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ForceQuit)
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),

            // Search & filters
            KeyCode::Char('/') => Some(Action::EnterSearchMode),
            KeyCode::Char('t') => Some(Action::OpenChoice(ChoiceKind::Category)),
            KeyCode::Char('s') => Some(Action::OpenChoice(ChoiceKind::Status)),
            KeyCode::Char('o') => Some(Action::OpenChoice(ChoiceKind::Sort)),
            KeyCode::Char('f') => Some(Action::OpenChoice(ChoiceKind::QuickService)),
            KeyCode::Char('x') => Some(Action::ClearFilters),

            // Selection
            KeyCode::Char(' ') => Some(Action::ToggleRowSelection),
            KeyCode::Char('a') => Some(Action::ToggleSelectAll),
            KeyCode::Char('u') => Some(Action::ClearSelection),
            KeyCode::Char('y') => Some(Action::BulkCopy),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::RequestBulkDelete),

            // Accounts
            KeyCode::Enter => Some(Action::OpenAccountDetail),
            KeyCode::Char('n') => Some(Action::OpenAddForm),
            KeyCode::Char('i') => Some(Action::OpenImport),
            KeyCode::Char('r') => Some(Action::ReloadAccounts),

            // Reports & maintenance
            KeyCode::Char('A') => Some(Action::OpenAnalytics),
            KeyCode::Char('I') => Some(Action::OpenImportReport),
            KeyCode::Char('E') => Some(Action::OpenChoice(ChoiceKind::Export)),
            KeyCode::Char('m') => Some(Action::OpenChoice(ChoiceKind::Maintenance)),
            KeyCode::Char('R') => Some(Action::ResetCounters),

            // General
            KeyCode::Char('S') => Some(Action::OpenSettings),
            KeyCode::Esc => Some(Action::DismissToast),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),

            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawn through draw_accounts_screen, which needs the App's data
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything the accounts screen shows that the App owns
pub struct AccountsRenderContext<'a> {
    pub table: &'a AccountTable,
    pub criteria: &'a FilterCriteria,
    pub counters: &'a StatsCounters,
    pub toasts: &'a [Toast],
    /// Where rows came from: server URL or inventory file
    pub source: &'a str,
    pub online: bool,
    pub in_flight: usize,
    pub dark_mode: bool,
}

pub fn draw_accounts_screen(
    frame: &mut Frame,
    area: Rect,
    accounts: &mut AccountsComponent,
    ctx: &AccountsRenderContext,
) -> Result<()> {
    if ctx.dark_mode {
        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Black)),
            area,
        );
    }

    let layout = calculate_main_layout(area);
    accounts.clamp(ctx.table.visible_records().len());

    render_header(frame, layout.header, ctx);
    render_stats(frame, layout.stats, ctx.counters);
    render_filter_bar(frame, layout.filters, accounts, ctx.criteria);
    render_table(frame, layout.table, accounts, ctx.table);
    render_help_bar(frame, layout.help, accounts, ctx.table.checked_count());
    render_toasts(frame, area, ctx.toasts);

    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &AccountsRenderContext) {
    let mut spans = vec![
        Span::styled(
            " acctdesk ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    let (mode, color) = if ctx.online {
        ("online", Color::Green)
    } else {
        ("offline", Color::Yellow)
    };
    spans.push(Span::styled(
        format!(" {} ", mode),
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        format!(" {}", ctx.source),
        Style::default().fg(Color::DarkGray),
    ));

    if ctx.in_flight > 0 {
        spans.push(Span::styled(
            format!("  ⟳ {} request(s)", ctx.in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_stats(frame: &mut Frame, area: Rect, counters: &StatsCounters) {
    let count = |c: &CounterAnimation| format!("{}", c.value() as u64);
    let cards = [
        ("Total", count(&counters.total), Color::White),
        ("Available", count(&counters.available), Color::Green),
        ("Sold", count(&counters.sold), Color::Blue),
        ("Failed", count(&counters.failed), Color::Red),
        (
            "Inventory value",
            format_currency(counters.inventory_value.value()),
            Color::Yellow,
        ),
    ];

    for ((label, value, color), slot) in cards.into_iter().zip(stat_cards(area, 5)) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", label)),
        );
        frame.render_widget(card, slot);
    }
}

fn render_filter_bar(
    frame: &mut Frame,
    area: Rect,
    accounts: &AccountsComponent,
    criteria: &FilterCriteria,
) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Cyan);

    let search = if accounts.search_mode {
        Span::styled(
            format!("{}_", criteria.search),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    } else if criteria.search.is_empty() {
        Span::styled("any", label)
    } else {
        Span::styled(criteria.search.clone(), value)
    };

    let line = Line::from(vec![
        Span::styled(" Search: ", label),
        search,
        Span::styled("   Category: ", label),
        Span::styled(
            criteria
                .category
                .as_ref()
                .map_or_else(|| "all".to_string(), |c| c.to_string()),
            value,
        ),
        Span::styled("   Status: ", label),
        Span::styled(
            criteria.status.map_or("all", |s| s.label()),
            value,
        ),
        Span::styled("   Sort: ", label),
        Span::styled(criteria.sort.label(), value),
    ]);

    let border = if accounts.search_mode {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Filters "),
    );
    frame.render_widget(bar, area);
}

fn render_table(frame: &mut Frame, area: Rect, accounts: &mut AccountsComponent, table: &AccountTable) {
    let visible = table.visible_records();
    let all_marker = if table.select_all_checked() { "[x]" } else { "[ ]" };

    let header = Row::new(vec![
        Cell::from(all_marker),
        Cell::from("Service"),
        Cell::from("Email"),
        Cell::from("Category"),
        Cell::from("Price"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .map(|record| {
            let checked = table.is_checked(&record.id);
            let base = if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(if checked { "[x]" } else { "[ ]" }).style(base),
                Cell::from(record.display_name().to_string()).style(base.add_modifier(Modifier::BOLD)),
                Cell::from(record.email.clone()).style(base),
                Cell::from(record.category.to_string()).style(Style::default().fg(Color::Cyan)),
                Cell::from(record.price.to_string()).style(Style::default().fg(Color::Green)),
                Cell::from(format!("{} {}", record.status.icon(), record.status.label()))
                    .style(Style::default().fg(status_color(record.status))),
            ])
        })
        .collect();

    let mut title = format!(" Accounts ({}/{}) ", visible.len(), table.len());
    let checked = table.checked_count();
    if checked > 0 {
        title = format!("{}[{}✓] ", title, checked);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::DarkGray));

    if visible.is_empty() {
        let message = if table.is_empty() {
            "No accounts found"
        } else {
            "No accounts match the current filters"
        };
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(ratatui::layout::Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(24),
        Constraint::Percentage(32),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(13),
    ];
    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(widget, area, &mut accounts.table_state);
}

fn render_help_bar(frame: &mut Frame, area: Rect, accounts: &AccountsComponent, checked: usize) {
    let key = |k: &str, color: Color| {
        Span::styled(
            format!(" {} ", k),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    };

    let spans = if accounts.search_mode {
        vec![
            key("Esc/Enter", Color::Yellow),
            Span::raw("Done  "),
            key("Backspace", Color::Cyan),
            Span::raw("Delete"),
        ]
    } else if checked > 0 {
        vec![
            key("Space", Color::Green),
            Span::raw("Toggle "),
            key("y", Color::Green),
            Span::raw("Copy "),
            key("d", Color::Red),
            Span::raw("Delete "),
            key("u", Color::Yellow),
            Span::raw("Uncheck all "),
            Span::styled(format!("{} selected", checked), Style::default().fg(Color::Cyan)),
        ]
    } else {
        vec![
            key("q", Color::Yellow),
            Span::raw("Quit "),
            key("/", Color::Cyan),
            Span::raw("Search "),
            key("t/s/o/f", Color::Cyan),
            Span::raw("Filter "),
            key("Enter", Color::Green),
            Span::raw("Details "),
            key("n", Color::Green),
            Span::raw("Add "),
            key("A", Color::Magenta),
            Span::raw("Analytics "),
            key("E", Color::Magenta),
            Span::raw("Export "),
            key("m", Color::Magenta),
            Span::raw("Maintenance "),
            key("?", Color::White),
            Span::raw("Help"),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn toast_color(level: ToastLevel) -> Color {
    match level {
        ToastLevel::Info => Color::Cyan,
        ToastLevel::Success => Color::Green,
        ToastLevel::Warning => Color::Yellow,
        ToastLevel::Danger => Color::Red,
    }
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`
fn truncate_to_width(text: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max {
            out.pop();
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

/// Newest toast on top
fn render_toasts(frame: &mut Frame, area: Rect, toasts: &[Toast]) {
    for (i, toast) in toasts.iter().rev().enumerate() {
        let Some(slot) = toast_slot(area, i as u16) else {
            break;
        };
        let color = toast_color(toast.level);
        frame.render_widget(Clear, slot);
        let widget = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} ", toast.level.icon()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(truncate_to_width(
                &toast.message,
                slot.width.saturating_sub(4) as usize,
            )),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(widget, slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::{Category, Price, Status};
    use crate::model::AccountRecord;

    fn table(n: usize) -> AccountTable {
        AccountTable::from_records(
            (0..n)
                .map(|i| AccountRecord {
                    id: i.to_string(),
                    email: format!("u{}@x.com", i),
                    password: "pw".to_string(),
                    service_name: format!("Svc{}", i),
                    category: Category::Streaming,
                    price: Price::from_amount(i as f64),
                    status: Status::Available,
                    redacted: false,
                })
                .collect(),
        )
    }

    #[test]
    fn test_cursor_moves_within_visible_rows() {
        let mut accounts = AccountsComponent::new();
        accounts.select_first(3);
        accounts.next(3);
        accounts.next(3);
        accounts.next(3);
        assert_eq!(accounts.table_state.selected(), Some(2));
        accounts.page_up(3);
        assert_eq!(accounts.table_state.selected(), Some(0));
        accounts.select_last(0);
        assert_eq!(accounts.table_state.selected(), None);
    }

    #[test]
    fn test_clamp_after_rows_disappear() {
        let mut accounts = AccountsComponent::new();
        accounts.table_state.select(Some(8));
        accounts.clamp(3);
        assert_eq!(accounts.table_state.selected(), Some(2));
        accounts.clamp(0);
        assert_eq!(accounts.table_state.selected(), None);
        accounts.clamp(5);
        assert_eq!(accounts.table_state.selected(), Some(0));
    }

    #[test]
    fn test_selected_id_follows_visible_order() {
        let mut table = table(3);
        let criteria = FilterCriteria {
            search: "svc2".to_string(),
            ..Default::default()
        };
        table.apply_filters(&criteria);

        let mut accounts = AccountsComponent::new();
        accounts.select_first(table.visible_records().len());
        assert_eq!(accounts.selected_id(&table), Some("2".to_string()));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("", 3), "");
    }

    #[test]
    fn test_keys_map_to_actions() {
        let mut accounts = AccountsComponent::new();
        let press = |accounts: &mut AccountsComponent, code| {
            accounts
                .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
                .unwrap()
        };
        assert_eq!(
            press(&mut accounts, KeyCode::Char('f')),
            Some(Action::OpenChoice(ChoiceKind::QuickService))
        );
        assert_eq!(
            press(&mut accounts, KeyCode::Char('d')),
            Some(Action::RequestBulkDelete)
        );
        assert_eq!(press(&mut accounts, KeyCode::Char('Z')), None);
    }
}
