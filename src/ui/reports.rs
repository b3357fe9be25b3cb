use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::report::Summary;
use crate::store::Session;
use crate::ui::Tab;

pub struct ReportsState {
    path_input: String,
    editing_path: bool,
    status: Option<(String, bool)>, // (message, is_error)
}

impl ReportsState {
    pub fn new(default_path: &Path) -> Self {
        Self {
            path_input: default_path.display().to_string(),
            editing_path: false,
            status: None,
        }
    }

    pub fn set_status(&mut self, message: String, is_error: bool) {
        self.status = Some((message, is_error));
    }
}

pub enum ReportAction {
    Quit,
    ShowTab(Tab),
    Export(PathBuf),
}

pub fn render_reports<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    session: &Session,
    state: &mut ReportsState,
) {
    let summary = Summary::compute(session);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),
            Constraint::Length(3),
            Constraint::Length(3),
        ].as_ref())
        .split(area);

    let mut lines = vec![
        Spans::from(Span::styled(
            "Financial Report",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Spans::from(""),
        Spans::from(format!("Total Invoiced:      ${:.2}", summary.total_invoiced)),
        Spans::from(format!("Total Paid:          ${:.2}", summary.total_paid)),
        Spans::from(format!("Total Expenses:      ${:.2}", summary.total_expenses)),
        Spans::from(format!("Net Profit:          ${:.2}", summary.net_profit)),
        Spans::from(format!("Estimated Tax (10%): ${:.2}", summary.tax_due)),
    ];
    if let Some((message, is_error)) = &state.status {
        let style = if *is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        lines.push(Spans::from(""));
        lines.push(Spans::from(Span::styled(message.clone(), style)));
    }
    let report = Paragraph::new(lines).block(Block::default().title("Reports").borders(Borders::ALL));
    frame.render_widget(report, chunks[0]);

    let prompt_style = if state.editing_path {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if state.editing_path { "|" } else { "" };
    let prompt = Paragraph::new(Spans::from(vec![
        Span::styled("Export to: ", prompt_style),
        Span::raw(format!("{}{}", state.path_input, cursor)),
    ]))
    .block(Block::default().title("Export CSV").borders(Borders::ALL));
    frame.render_widget(prompt, chunks[1]);

    let help_text = if state.editing_path {
        "Enter - Export | Esc - Cancel"
    } else {
        "<E> Export CSV | <Tab> Next Tab | <1-4> Jump to Tab | <Q> Quit"
    };
    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[2]);
}

pub fn handle_input(state: &mut ReportsState) -> Result<Option<ReportAction>> {
    if let Event::Key(key) = event::read()? {
        if state.editing_path {
            match key.code {
                KeyCode::Esc => {
                    state.editing_path = false;
                }
                KeyCode::Enter => {
                    state.editing_path = false;
                    let path = state.path_input.trim();
                    if !path.is_empty() {
                        return Ok(Some(ReportAction::Export(PathBuf::from(path))));
                    }
                }
                KeyCode::Backspace => {
                    state.path_input.pop();
                }
                KeyCode::Char(c) => {
                    state.path_input.push(c);
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                return Ok(Some(ReportAction::Quit));
            }
            KeyCode::Tab => {
                return Ok(Some(ReportAction::ShowTab(Tab::Reports.next())));
            }
            KeyCode::BackTab => {
                return Ok(Some(ReportAction::ShowTab(Tab::Reports.previous())));
            }
            KeyCode::Char('e') => {
                state.status = None;
                state.editing_path = true;
            }
            KeyCode::Char(c) => {
                if let Some(tab) = Tab::from_digit(c) {
                    return Ok(Some(ReportAction::ShowTab(tab)));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
