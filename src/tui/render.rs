use std::borrow::Cow;

use super::state::AppState;
use super::{Dashboard, WEBHOOKS_TIER};
use crate::entitlement::{decide, EntitlementState, ModalState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

const PILL_WIDTH: u16 = 18;

pub fn draw(f: &mut Frame, dash: &Dashboard, entitlement: &EntitlementState, modal: &ModalState) {
    let banner_height = if entitlement.is_subscribed { 0 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, dash, entitlement, chunks[0]);
    dash.banner.render(entitlement, chunks[1], f.buffer_mut());
    draw_actions(f, dash, entitlement, chunks[2]);
    draw_workspace(f, dash, entitlement, chunks[3]);
    draw_executions(f, &dash.state, chunks[4]);
    dash.retention.render(entitlement, chunks[5], f.buffer_mut());
    draw_logs(f, &dash.state, chunks[6]);
    draw_footer(f, chunks[7]);

    dash.upgrade.render(modal, entitlement, f.area(), f.buffer_mut());
}

fn draw_header(f: &mut Frame, dash: &Dashboard, entitlement: &EntitlementState, area: Rect) {
    let block = Block::default()
        .title(" planward ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(PILL_WIDTH)])
        .split(inner);

    let line = Line::from(vec![
        Span::styled(" Dashboard", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" | Up: ", Style::default().fg(Color::DarkGray)),
        Span::raw(dash.state.uptime()),
        Span::styled(" | Workflows: ", Style::default().fg(Color::DarkGray)),
        Span::raw(dash.state.workflows.len().to_string()),
    ]);
    f.render_widget(Paragraph::new(line), cols[0]);
    dash.pill.render(entitlement, cols[1], f.buffer_mut());
}

fn draw_actions(f: &mut Frame, dash: &Dashboard, entitlement: &EntitlementState, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    dash.export.render(entitlement, cols[0], f.buffer_mut());
    dash.replay.render(entitlement, cols[1], f.buffer_mut());
}

fn draw_workspace(f: &mut Frame, dash: &Dashboard, entitlement: &EntitlementState, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    dash.insights.render(entitlement, insights_widget(&dash.state), cols[0], f.buffer_mut());

    if decide(entitlement, Some(WEBHOOKS_TIER)).is_denied() {
        dash.webhooks.render(cols[1], f.buffer_mut());
    } else {
        let lines: Vec<Line> = dash
            .state
            .workflows
            .iter()
            .filter(|w| w.trigger == "webhook")
            .map(|w| Line::from(format!(" POST /hooks/{}", slug(&w.name))))
            .collect();
        let para = Paragraph::new(lines).block(Block::default().title(" Webhooks ").borders(Borders::ALL));
        f.render_widget(para, cols[1]);
    }
}

fn insights_widget(state: &AppState) -> Table<'static> {
    let header = Row::new(vec!["Workflow", "Trigger", "Runs", "State"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = state
        .workflows
        .iter()
        .map(|w| {
            let (label, color) = if w.active {
                ("on", Color::Green)
            } else {
                ("off", Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(w.name.clone()),
                Cell::from(w.trigger.clone()),
                Cell::from(w.runs_today.to_string()),
                Cell::from(label).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let title = match state.success_rate() {
        Some(rate) => format!(" Run insights | {}% success ", rate),
        None => " Run insights ".to_string(),
    };

    Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(18),
            Constraint::Length(5),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL))
}

fn draw_executions(f: &mut Frame, state: &AppState, area: Rect) {
    let header = Row::new(vec!["Started", "Workflow", "Duration", "Result"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = state
        .executions
        .iter()
        .map(|e| {
            let (result, color) = if e.succeeded {
                ("ok", Color::Green)
            } else {
                ("failed", Color::Red)
            };
            Row::new(vec![
                Cell::from(e.started.clone()),
                Cell::from(e.workflow.clone()),
                Cell::from(format!("{}ms", e.duration_ms)),
                Cell::from(result).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let title = format!(
        " Executions | exports: {} | replays: {} ",
        state.exports_run, state.replays_run
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(table, area);
}

fn draw_logs(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize; // borders
    let visible_lines = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible_lines)
        .map(|l| {
            let color = match l.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                "GATE" => Color::Magenta,
                _ => Color::DarkGray,
            };
            let prefix = format!(" {} [{}] ", l.time, l.level);
            let msg_max = max_width.saturating_sub(prefix.len());
            let msg = truncate_with_ellipsis(&l.message, msg_max);
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ])
        })
        .collect();

    let para = Paragraph::new(lines).block(Block::default().title(" Activity ").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let line = Line::from(vec![
        key("  [q]"),
        Span::raw("uit  "),
        key("[e]"),
        Span::raw("xport  "),
        key("[r]"),
        Span::raw("eplay  "),
        key("[u]"),
        Span::raw("pgrade insights  "),
        key("[w]"),
        Span::raw(" retention  "),
        key("[t]"),
        Span::raw("ier  "),
        key("[Esc]"),
        Span::raw(" close"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn slug(name: &str) -> String {
    name.to_ascii_lowercase().replace(' ', "-")
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
