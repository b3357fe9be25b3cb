use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::Result;
use chrono::{Duration, Local};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use bizbooks::config::{self, Config};
use bizbooks::export;
use bizbooks::store::Session;
use bizbooks::ui::{
    self,
    dashboard::{self, DashboardAction},
    expense_form::{self, ExpenseFormAction, ExpenseFormState},
    expenses::{self, ExpenseAction, ExpensesState},
    invoice_form::{self, InvoiceFormAction, InvoiceFormState},
    invoices::{self, InvoiceAction, InvoicesState},
    reports::{self, ReportAction, ReportsState},
    Tab,
};

// Represents the current screen in the app
enum AppScreen {
    Tab(Tab),
    InvoiceForm,
    ExpenseForm,
}

// Main application state. The session exclusively owns the record lists;
// every screen reads it through references handed out here.
struct AppState {
    session: Session,
    config: Config,
    screen: AppScreen,
    invoices_state: InvoicesState,
    expenses_state: ExpensesState,
    reports_state: ReportsState,
    invoice_form_state: Option<InvoiceFormState>,
    expense_form_state: Option<ExpenseFormState>,
}

impl AppState {
    fn new(config: Config) -> Self {
        let reports_state = ReportsState::new(&config.default_export_path());
        Self {
            session: Session::new(),
            config,
            screen: AppScreen::Tab(Tab::Dashboard),
            invoices_state: InvoicesState::new(),
            expenses_state: ExpensesState::new(),
            reports_state,
            invoice_form_state: None,
            expense_form_state: None,
        }
    }
}

fn main() -> Result<()> {
    // Load configuration
    let config = config::init()?;
    init_logging(&config)?;
    info!("starting bizbooks");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app_state = AppState::new(config);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    Ok(())
}

/// Sends tracing output to the configured log file; the terminal itself
/// belongs to the TUI.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| draw(f, app_state))?;

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Tab(Tab::Dashboard) => handle_dashboard_tab(app_state)?,
            AppScreen::Tab(Tab::Invoices) => handle_invoices_tab(app_state)?,
            AppScreen::Tab(Tab::Expenses) => handle_expenses_tab(app_state)?,
            AppScreen::Tab(Tab::Reports) => handle_reports_tab(app_state)?,
            AppScreen::InvoiceForm => handle_invoice_form(app_state)?,
            AppScreen::ExpenseForm => handle_expense_form(app_state)?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

fn draw<B: Backend>(frame: &mut Frame<B>, app_state: &mut AppState) {
    let AppState {
        session,
        screen,
        invoices_state,
        expenses_state,
        reports_state,
        invoice_form_state,
        expense_form_state,
        ..
    } = app_state;

    match screen {
        AppScreen::Tab(tab) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
                .split(frame.size());
            ui::render_tab_bar(frame, chunks[0], *tab);

            match tab {
                Tab::Dashboard => dashboard::render_dashboard(frame, chunks[1], session),
                Tab::Invoices => invoices::render_invoices(frame, chunks[1], session, invoices_state),
                Tab::Expenses => expenses::render_expenses(frame, chunks[1], session, expenses_state),
                Tab::Reports => reports::render_reports(frame, chunks[1], session, reports_state),
            }
        }
        AppScreen::InvoiceForm => {
            if let Some(state) = invoice_form_state {
                invoice_form::render_invoice_form(frame, state);
            }
        }
        AppScreen::ExpenseForm => {
            if let Some(state) = expense_form_state {
                expense_form::render_expense_form(frame, state);
            }
        }
    }
}

fn handle_dashboard_tab(app_state: &mut AppState) -> Result<bool> {
    match dashboard::handle_input()? {
        Some(DashboardAction::Quit) => return Ok(true),
        Some(DashboardAction::ShowTab(tab)) => {
            app_state.screen = AppScreen::Tab(tab);
        }
        None => {}
    }
    Ok(false)
}

fn handle_invoices_tab(app_state: &mut AppState) -> Result<bool> {
    match invoices::handle_input(&app_state.session, &mut app_state.invoices_state)? {
        Some(InvoiceAction::Quit) => return Ok(true),
        Some(InvoiceAction::ShowTab(tab)) => {
            app_state.screen = AppScreen::Tab(tab);
        }
        Some(InvoiceAction::New) => {
            let today = Local::now().date_naive();
            let due = today + Duration::days(app_state.config.due_in_days);
            app_state.invoice_form_state = Some(InvoiceFormState::new(today, due));
            app_state.screen = AppScreen::InvoiceForm;
        }
        Some(InvoiceAction::Edit(id)) => {
            if let Ok(invoice) = app_state.session.invoice(id) {
                app_state.invoice_form_state = Some(InvoiceFormState::from_existing(invoice));
                app_state.screen = AppScreen::InvoiceForm;
            }
        }
        Some(InvoiceAction::MarkPaid(id)) => {
            if let Err(err) = app_state.session.mark_invoice_paid(id) {
                warn!(%err, "mark paid failed");
            }
        }
        Some(InvoiceAction::Delete(id)) => {
            app_state.session.remove_invoices(&[id]);
            app_state.invoices_state.clamp_selection(&app_state.session);
        }
        None => {}
    }
    Ok(false)
}

fn handle_expenses_tab(app_state: &mut AppState) -> Result<bool> {
    match expenses::handle_input(&app_state.session, &mut app_state.expenses_state)? {
        Some(ExpenseAction::Quit) => return Ok(true),
        Some(ExpenseAction::ShowTab(tab)) => {
            app_state.screen = AppScreen::Tab(tab);
        }
        Some(ExpenseAction::New) => {
            let today = Local::now().date_naive();
            app_state.expense_form_state = Some(ExpenseFormState::new(today));
            app_state.screen = AppScreen::ExpenseForm;
        }
        Some(ExpenseAction::Edit(id)) => {
            if let Ok(expense) = app_state.session.expense(id) {
                app_state.expense_form_state = Some(ExpenseFormState::from_existing(expense));
                app_state.screen = AppScreen::ExpenseForm;
            }
        }
        Some(ExpenseAction::Delete(id)) => {
            app_state.session.remove_expenses(&[id]);
            app_state.expenses_state.clamp_selection(&app_state.session);
        }
        None => {}
    }
    Ok(false)
}

fn handle_reports_tab(app_state: &mut AppState) -> Result<bool> {
    match reports::handle_input(&mut app_state.reports_state)? {
        Some(ReportAction::Quit) => return Ok(true),
        Some(ReportAction::ShowTab(tab)) => {
            app_state.screen = AppScreen::Tab(tab);
        }
        Some(ReportAction::Export(path)) => {
            match export::write_csv(&path, &app_state.session) {
                Ok(()) => {
                    app_state
                        .reports_state
                        .set_status(format!("Exported to {}", path.display()), false);
                }
                Err(err) => {
                    warn!(%err, "export failed");
                    app_state
                        .reports_state
                        .set_status(format!("Export failed: {}", err), true);
                }
            }
        }
        None => {}
    }
    Ok(false)
}

fn handle_invoice_form(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.invoice_form_state.as_mut() {
        Some(state) => invoice_form::handle_input(state)?,
        None => None,
    };

    match action {
        Some(InvoiceFormAction::Cancel) => {
            app_state.invoice_form_state = None;
            app_state.screen = AppScreen::Tab(Tab::Invoices);
        }
        Some(InvoiceFormAction::Save { id, draft }) => {
            let outcome = match id {
                Some(id) => app_state.session.update_invoice(id, draft).map(|_| id),
                None => app_state.session.add_invoice(draft),
            };
            match outcome {
                Ok(id) => {
                    info!(id, "invoice saved");
                    app_state.invoice_form_state = None;
                    app_state.invoices_state.clamp_selection(&app_state.session);
                    app_state.screen = AppScreen::Tab(Tab::Invoices);
                }
                Err(err) => {
                    if let Some(state) = app_state.invoice_form_state.as_mut() {
                        state.show_error(err.to_string());
                    }
                }
            }
        }
        None => {}
    }

    Ok(false)
}

fn handle_expense_form(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.expense_form_state.as_mut() {
        Some(state) => expense_form::handle_input(state)?,
        None => None,
    };

    match action {
        Some(ExpenseFormAction::Cancel) => {
            app_state.expense_form_state = None;
            app_state.screen = AppScreen::Tab(Tab::Expenses);
        }
        Some(ExpenseFormAction::Save { id, draft }) => {
            let outcome = match id {
                Some(id) => app_state.session.update_expense(id, draft).map(|_| id),
                None => app_state.session.add_expense(draft),
            };
            match outcome {
                Ok(id) => {
                    info!(id, "expense saved");
                    app_state.expense_form_state = None;
                    app_state.expenses_state.clamp_selection(&app_state.session);
                    app_state.screen = AppScreen::Tab(Tab::Expenses);
                }
                Err(err) => {
                    if let Some(state) = app_state.expense_form_state.as_mut() {
                        state.show_error(err.to_string());
                    }
                }
            }
        }
        None => {}
    }

    Ok(false)
}
