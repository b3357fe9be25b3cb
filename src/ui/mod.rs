pub mod components;
pub mod dashboard;
pub mod expense_form;
pub mod expenses;
pub mod invoice_form;
pub mod invoices;
pub mod reports;

use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// The four top-level screens, in tab-bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Invoices,
    Expenses,
    Reports,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Invoices, Tab::Expenses, Tab::Reports];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Invoices => "Invoices",
            Tab::Expenses => "Expenses",
            Tab::Reports => "Reports",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Tab bound to a number key, '1' through '4'.
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(Tab::Dashboard),
            '2' => Some(Tab::Invoices),
            '3' => Some(Tab::Expenses),
            '4' => Some(Tab::Reports),
            _ => None,
        }
    }
}

pub fn render_tab_bar<B: Backend>(frame: &mut Frame<B>, area: Rect, active: Tab) {
    let titles: Vec<Spans> = Tab::ALL.iter().map(|t| Spans::from(t.title())).collect();
    let index = Tab::ALL.iter().position(|t| *t == active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().title("Invoicing & Accounting").borders(Borders::ALL))
        .select(index)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

pub(crate) fn render_search_line<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    label: &str,
    query: &str,
    active: bool,
) {
    let label_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if active { "|" } else { "" };

    let line = Spans::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::raw(format!("{}{}", query, cursor)),
    ]);
    let search = Paragraph::new(line).block(Block::default().title("Search").borders(Borders::ALL));
    frame.render_widget(search, area);
}

pub(crate) fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect, noun: &str) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(format!("Are you sure you want to delete this {}?", noun)),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

pub(crate) fn render_error_popup<B: Backend>(frame: &mut Frame<B>, size: Rect, error: &str) {
    let popup_area = centered_rect(60, 20, size);

    let error_msg = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(error),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .block(Block::default().title("Error").borders(Borders::ALL))
    .style(Style::default().fg(Color::Red));

    frame.render_widget(error_msg, popup_area);
}

// Helper function to create a centered rect
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
