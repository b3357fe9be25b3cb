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

use crate::models::{Invoice, InvoiceDraft};
use crate::ui::components::date_input::DateField;
use crate::ui::render_error_popup;

// Represents a field in the invoice form
#[derive(Clone, Copy, PartialEq)]
enum InvoiceField {
    Customer,
    InvoiceDate,
    DueDate,
    Amount,
}

pub struct InvoiceFormState {
    invoice_id: Option<u64>,
    customer: String,
    invoice_date: DateField,
    due_date: DateField,
    amount_input: String,
    current_field: InvoiceField,
    editing: bool,
    error: Option<String>,
}

impl InvoiceFormState {
    pub fn new(invoice_date: NaiveDate, due_date: NaiveDate) -> Self {
        Self {
            invoice_id: None,
            customer: String::new(),
            invoice_date: DateField::new(invoice_date),
            due_date: DateField::new(due_date),
            amount_input: String::new(),
            current_field: InvoiceField::Customer,
            editing: false,
            error: None,
        }
    }

    pub fn from_existing(invoice: &Invoice) -> Self {
        Self {
            invoice_id: Some(invoice.id),
            customer: invoice.customer.clone(),
            invoice_date: DateField::new(invoice.invoice_date),
            due_date: DateField::new(invoice.due_date),
            amount_input: format!("{:.2}", invoice.amount),
            current_field: InvoiceField::Customer,
            editing: false,
            error: None,
        }
    }

    pub fn show_error(&mut self, message: String) {
        self.error = Some(message);
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            InvoiceField::Customer => InvoiceField::InvoiceDate,
            InvoiceField::InvoiceDate => InvoiceField::DueDate,
            InvoiceField::DueDate => InvoiceField::Amount,
            InvoiceField::Amount => InvoiceField::Customer,
        };
    }

    fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            InvoiceField::Customer => InvoiceField::Amount,
            InvoiceField::InvoiceDate => InvoiceField::Customer,
            InvoiceField::DueDate => InvoiceField::InvoiceDate,
            InvoiceField::Amount => InvoiceField::DueDate,
        };
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        match self.current_field {
            InvoiceField::Customer => match key {
                KeyCode::Char(c) => self.customer.push(c),
                KeyCode::Backspace => {
                    self.customer.pop();
                }
                _ => {}
            },
            InvoiceField::InvoiceDate => self.invoice_date.handle_key(key),
            InvoiceField::DueDate => self.due_date.handle_key(key),
            InvoiceField::Amount => match key {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => self.amount_input.push(c),
                KeyCode::Backspace => {
                    self.amount_input.pop();
                }
                _ => {}
            },
        }
    }

    /// The draft currently held by the form. The session applies the field
    /// rules; only an unparseable amount is caught here.
    fn draft(&self) -> Result<InvoiceDraft, String> {
        let amount: f64 = self
            .amount_input
            .trim()
            .parse()
            .map_err(|_| "amount: amount must be a number".to_string())?;
        Ok(InvoiceDraft {
            customer: self.customer.clone(),
            invoice_date: self.invoice_date.date,
            due_date: self.due_date.date,
            amount,
        })
    }
}

pub enum InvoiceFormAction {
    Cancel,
    Save { id: Option<u64>, draft: InvoiceDraft },
}

pub fn render_invoice_form<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState) {
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

    let title_text = if state.invoice_id.is_some() {
        "Edit Invoice"
    } else {
        "Add Invoice"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_form(frame, state, chunks[1]);

    let help_text = match (state.editing, state.current_field) {
        (false, _) => "Enter - Edit field | Up/Down - Navigate fields | S - Save invoice | Esc - Cancel",
        (true, InvoiceField::InvoiceDate | InvoiceField::DueDate) => {
            "Left/Right - Date part | Up/Down - Adjust | Enter - Done | Esc - Done"
        }
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

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState, area: Rect) {
    let editing = state.editing;
    let active = state.current_field;

    let field_values = [
        (
            InvoiceField::Customer,
            "Customer",
            format!(
                "{}{}",
                state.customer,
                if editing && active == InvoiceField::Customer { "|" } else { "" }
            ),
        ),
        (
            InvoiceField::InvoiceDate,
            "Invoice Date",
            state.invoice_date.display(editing && active == InvoiceField::InvoiceDate),
        ),
        (
            InvoiceField::DueDate,
            "Due Date",
            state.due_date.display(editing && active == InvoiceField::DueDate),
        ),
        (
            InvoiceField::Amount,
            "Amount",
            format!(
                "$ {}{}",
                state.amount_input,
                if editing && active == InvoiceField::Amount { "|" } else { "" }
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
        .block(Block::default().borders(Borders::ALL).title("Invoice Details"));
    frame.render_widget(form_list, area);
}

pub fn handle_input(state: &mut InvoiceFormState) -> Result<Option<InvoiceFormAction>> {
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
                return Ok(Some(InvoiceFormAction::Cancel));
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
                    return Ok(Some(InvoiceFormAction::Save {
                        id: state.invoice_id,
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
