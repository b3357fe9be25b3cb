use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Expense, ExpenseCategory, ExpenseDraft};
use crate::ui::components::date_input::DateField;
use crate::ui::render_error_popup;

#[derive(Clone, Copy, PartialEq)]
enum ExpenseField {
    Category,
    Description,
    Date,
    Amount,
}

pub struct ExpenseFormState {
    expense_id: Option<u64>,
    category: ExpenseCategory,
    description: String,
    date: DateField,
    amount_input: String,
    current_field: ExpenseField,
    editing: bool,
    error: Option<String>,
}

impl ExpenseFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            expense_id: None,
            category: ExpenseCategory::default(),
            description: String::new(),
            date: DateField::new(date),
            amount_input: String::new(),
            current_field: ExpenseField::Category,
            editing: false,
            error: None,
        }
    }

    pub fn from_existing(expense: &Expense) -> Self {
        Self {
            expense_id: Some(expense.id),
            category: expense.category,
            description: expense.description.clone(),
            date: DateField::new(expense.date),
            amount_input: format!("{:.2}", expense.amount),
            current_field: ExpenseField::Category,
            editing: false,
            error: None,
        }
    }

    pub fn show_error(&mut self, message: String) {
        self.error = Some(message);
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ExpenseField::Category => ExpenseField::Description,
            ExpenseField::Description => ExpenseField::Date,
            ExpenseField::Date => ExpenseField::Amount,
            ExpenseField::Amount => ExpenseField::Category,
        };
    }

    fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ExpenseField::Category => ExpenseField::Amount,
            ExpenseField::Description => ExpenseField::Category,
            ExpenseField::Date => ExpenseField::Description,
            ExpenseField::Amount => ExpenseField::Date,
        };
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        match self.current_field {
            ExpenseField::Category => match key {
                KeyCode::Right | KeyCode::Down => self.category = self.category.next(),
                KeyCode::Left | KeyCode::Up => self.category = self.category.previous(),
                _ => {}
            },
            ExpenseField::Description => match key {
                KeyCode::Char(c) => self.description.push(c),
                KeyCode::Backspace => {
                    self.description.pop();
                }
                _ => {}
            },
            ExpenseField::Date => self.date.handle_key(key),
            ExpenseField::Amount => match key {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => self.amount_input.push(c),
                KeyCode::Backspace => {
                    self.amount_input.pop();
                }
                _ => {}
            },
        }
    }

    fn draft(&self) -> Result<ExpenseDraft, String> {
        let amount: f64 = self
            .amount_input
            .trim()
            .parse()
            .map_err(|_| "amount: amount must be a number".to_string())?;
        Ok(ExpenseDraft {
            category: self.category,
            description: self.description.clone(),
            date: self.date.date,
            amount,
        })
    }
}

pub enum ExpenseFormAction {
    Cancel,
    Save { id: Option<u64>, draft: ExpenseDraft },
}

pub fn render_expense_form<B: Backend>(frame: &mut Frame<B>, state: &mut ExpenseFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title_text = if state.expense_id.is_some() {
        "Edit Expense"
    } else {
        "Add Expense"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_form(frame, state, chunks[1]);

    let help_text = match (state.editing, state.current_field) {
        (false, _) => "Enter - Edit field | Up/Down - Navigate fields | S - Save expense | Esc - Cancel",
        (true, ExpenseField::Category) => "Left/Right - Change category | Enter - Done | Esc - Done",
        (true, ExpenseField::Date) => "Left/Right - Date part | Up/Down - Adjust | Enter - Done | Esc - Done",
        (true, _) => "Enter - Save field | Esc - Cancel editing",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);

    if let Some(error) = &state.error {
        render_error_popup(frame, frame.size(), error);
    }
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut ExpenseFormState, area: Rect) {
    let editing = state.editing;
    let active = state.current_field;

    let category_value = if editing && active == ExpenseField::Category {
        format!("< {} >", state.category)
    } else {
        state.category.to_string()
    };

    let field_values = [
        (ExpenseField::Category, "Category", category_value),
        (
            ExpenseField::Description,
            "Description",
            format!(
                "{}{}",
                state.description,
                if editing && active == ExpenseField::Description { "|" } else { "" }
            ),
        ),
        (
            ExpenseField::Date,
            "Date",
            state.date.display(editing && active == ExpenseField::Date),
        ),
        (
            ExpenseField::Amount,
            "Amount",
            format!(
                "$ {}{}",
                state.amount_input,
                if editing && active == ExpenseField::Amount { "|" } else { "" }
            ),
        ),
    ];

    let items: Vec<ListItem> = field_values
        .iter()
        .map(|(field, name, value)| {
            let name_style = if *field == active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value_style = if *field == active && editing {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", name), name_style),
                Span::styled(value.clone(), value_style),
            ]))
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Expense Details"));
    frame.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ExpenseFormState) -> Result<Option<ExpenseFormAction>> {
    if let Event::Key(key) = event::read()? {
        if state.error.is_some() {
            // Any key dismisses the error popup
            state.error = None;
            return Ok(None);
        }

        if state.editing {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    state.editing = false;
                }
                code => state.edit_current_field(code),
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc => {
                return Ok(Some(ExpenseFormAction::Cancel));
            }
            KeyCode::Enter => {
                state.editing = true;
            }
            KeyCode::Down | KeyCode::Tab => {
                state.next_field();
            }
            KeyCode::Up | KeyCode::BackTab => {
                state.previous_field();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => match state.draft() {
                Ok(draft) => {
                    return Ok(Some(ExpenseFormAction::Save {
                        id: state.expense_id,
                        draft,
                    }));
                }
                Err(message) => state.show_error(message),
            },
            _ => {}
        }
    }
    Ok(None)
}
