use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::Expense;
use crate::store::Session;
use crate::ui::{render_delete_confirmation, render_search_line, Tab};

// Search query and selection for the expenses tab; rows come from the
// session on every render.
pub struct ExpensesState {
    query: String,
    searching: bool,
    table_state: TableState,
    confirm_delete: Option<u64>,
}

impl ExpensesState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            searching: false,
            table_state: TableState::default(),
            confirm_delete: None,
        }
    }

    /// Expenses visible under the current search query, insertion order.
    pub fn visible<'a>(&self, session: &'a Session) -> Vec<&'a Expense> {
        session.search_expenses(&self.query).collect()
    }

    pub fn selected_id(&self, session: &Session) -> Option<u64> {
        let visible = self.visible(session);
        self.table_state
            .selected()
            .and_then(|i| visible.get(i))
            .map(|expense| expense.id)
    }

    fn next(&mut self, session: &Session) {
        let len = self.visible(session).len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn previous(&mut self, session: &Session) {
        let len = self.visible(session).len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn clamp_selection(&mut self, session: &Session) {
        let len = self.visible(session).len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        match self.table_state.selected() {
            Some(i) if i < len => {}
            _ => self.table_state.select(Some(len - 1)),
        }
    }
}

impl Default for ExpensesState {
    fn default() -> Self {
        Self::new()
    }
}

pub enum ExpenseAction {
    Quit,
    ShowTab(Tab),
    New,
    Edit(u64),
    Delete(u64),
}

pub fn render_expenses<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    session: &Session,
    state: &mut ExpensesState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ].as_ref())
        .split(area);

    render_search_line(frame, chunks[0], "Search by description", &state.query, state.searching);

    let visible = state.visible(session);

    let header_cells = ["ID", "Category", "Description", "Date", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = visible.iter().map(|expense| {
        let cells = vec![
            Cell::from(expense.id.to_string()),
            Cell::from(expense.category.as_str()),
            Cell::from(expense.description.clone()),
            Cell::from(expense.date.format("%Y-%m-%d").to_string()),
            Cell::from(format!("{:.2}", expense.amount)),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Expenses").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Percentage(40),
            Constraint::Length(14),
            Constraint::Length(12),
        ]);

    frame.render_stateful_widget(table, chunks[1], &mut state.table_state);

    let buttons_text = if visible.is_empty() {
        "<N> New | </> Search | <Tab> Next Tab | <Q> Quit"
    } else {
        "<N> New | <E> Edit | <D> Delete | </> Search | <Tab> Next Tab | <Q> Quit"
    };
    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[2]);

    if state.confirm_delete.is_some() {
        render_delete_confirmation(frame, area, "expense");
    }
}

pub fn handle_input(session: &Session, state: &mut ExpensesState) -> Result<Option<ExpenseAction>> {
    if let Event::Key(key) = event::read()? {
        if let Some(id) = state.confirm_delete {
            match key.code {
                KeyCode::Char('y') => {
                    state.confirm_delete = None;
                    return Ok(Some(ExpenseAction::Delete(id)));
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    state.confirm_delete = None;
                }
                _ => {}
            }
            return Ok(None);
        }

        if state.searching {
            match key.code {
                KeyCode::Esc => {
                    state.searching = false;
                    state.query.clear();
                    state.clamp_selection(session);
                }
                KeyCode::Enter => {
                    state.searching = false;
                }
                KeyCode::Backspace => {
                    state.query.pop();
                    state.clamp_selection(session);
                }
                KeyCode::Char(c) => {
                    state.query.push(c);
                    state.clamp_selection(session);
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                return Ok(Some(ExpenseAction::Quit));
            }
            KeyCode::Tab => {
                return Ok(Some(ExpenseAction::ShowTab(Tab::Expenses.next())));
            }
            KeyCode::BackTab => {
                return Ok(Some(ExpenseAction::ShowTab(Tab::Expenses.previous())));
            }
            KeyCode::Char('/') => {
                state.searching = true;
            }
            KeyCode::Char('n') => {
                return Ok(Some(ExpenseAction::New));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = state.selected_id(session) {
                    return Ok(Some(ExpenseAction::Edit(id)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = state.selected_id(session) {
                    state.confirm_delete = Some(id);
                }
            }
            KeyCode::Down => {
                state.next(session);
            }
            KeyCode::Up => {
                state.previous(session);
            }
            KeyCode::Char(c) => {
                if let Some(tab) = Tab::from_digit(c) {
                    return Ok(Some(ExpenseAction::ShowTab(tab)));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
