use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{BarChart, Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::report::Summary;
use crate::store::Session;
use crate::ui::Tab;

pub enum DashboardAction {
    Quit,
    ShowTab(Tab),
}

// The dashboard holds no state of its own: everything is recomputed from the
// session each time it is drawn.
pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, area: Rect, session: &Session) {
    let summary = Summary::compute(session);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(3),
        ].as_ref())
        .split(area);

    let stats = Paragraph::new(vec![
        Spans::from(format!(
            "Total Invoiced: {:>12.2}    Total Paid: {:>12.2}",
            summary.total_invoiced, summary.total_paid
        )),
        Spans::from(format!(
            "Total Expenses: {:>12.2}    Net Profit: {:>12.2}",
            summary.total_expenses, summary.net_profit
        )),
    ])
    .block(Block::default().title("Financial Summary").borders(Borders::ALL));
    frame.render_widget(stats, chunks[0]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(chunks[1]);

    // Bar heights are whole currency units; a negative net profit shows as
    // an empty bar, the signed value stays visible in the stats above.
    let bar_data = [
        ("Invoiced", bar_value(summary.total_invoiced)),
        ("Paid", bar_value(summary.total_paid)),
        ("Expenses", bar_value(summary.total_expenses)),
        ("Profit", bar_value(summary.net_profit)),
    ];
    let bar_chart = BarChart::default()
        .block(Block::default().title("Totals").borders(Borders::ALL))
        .data(&bar_data)
        .bar_width(10)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .label_style(Style::default().fg(Color::White));
    frame.render_widget(bar_chart, charts[0]);

    if summary.has_invoices() {
        let gauge = Gauge::default()
            .block(Block::default().title("Invoice Status (paid share)").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .ratio(summary.paid_ratio())
            .label(format!("{} paid / {} unpaid", summary.paid_count, summary.unpaid_count));
        frame.render_widget(gauge, charts[1]);
    } else {
        let placeholder = Paragraph::new("No invoice data")
            .block(Block::default().title("Invoice Status").borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(placeholder, charts[1]);
    }

    let help = Paragraph::new("<Tab> Next Tab | <1-4> Jump to Tab | <Q> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[2]);
}

fn bar_value(value: f64) -> u64 {
    if value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

pub fn handle_input() -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                return Ok(Some(DashboardAction::Quit));
            }
            KeyCode::Tab => {
                return Ok(Some(DashboardAction::ShowTab(Tab::Dashboard.next())));
            }
            KeyCode::BackTab => {
                return Ok(Some(DashboardAction::ShowTab(Tab::Dashboard.previous())));
            }
            KeyCode::Char(c) => {
                if let Some(tab) = Tab::from_digit(c) {
                    return Ok(Some(DashboardAction::ShowTab(tab)));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
