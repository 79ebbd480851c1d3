use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{
    AppError, LedgerStore, MSG_BUDGET_UPDATED, MSG_DATA_RESET, MSG_EXPENSE_ADDED,
    MSG_EXPENSE_DELETED, MSG_EXPENSE_LOADED_FOR_EDIT, MSG_RECEIPT_ATTACHED, MSG_RECEIPT_CREATED,
    Notice, validate_entry,
};
use crate::domain::{
    Category, Expense, ExpenseId, LedgerSummary, category_info, category_label, format_cents,
    units_from_cents,
};
use crate::io::{Exporter, ReceiptImage};
use crate::storage::{KeyValueStore, Repository};

/// Tally - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Track expenses against a monthly budget")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "tally.db", env = "TALLY_DATABASE")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        name: String,

        /// Amount in currency units (e.g., "4.50")
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Category: household, shopping, health, travel, education, pets, gifts, food_drink, other
        #[arg(short, long, default_value = "other")]
        category: String,
    },

    /// List recorded expenses
    List,

    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Edit an expense (it is removed and added again with a new ID)
    Edit {
        /// Expense ID
        id: ExpenseId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New amount
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Attach a receipt image to the most recent expense
    Receipt {
        /// Image file (max 2MB)
        path: PathBuf,
    },

    /// Show or set the monthly budget
    Budget {
        /// New budget amount (omit to show the current one)
        #[arg(allow_negative_numbers = true)]
        amount: Option<f64>,
    },

    /// Show totals and the spending breakdown
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List available categories
    Categories,

    /// Delete all expenses and reset the budget
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Show or change the dark mode preference
    DarkMode {
        /// on, off or toggle (omit to show the current setting)
        state: Option<DarkModeSwitch>,
    },

    /// Export expenses to CSV or JSON
    Export {
        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DarkModeSwitch {
    On,
    Off,
    Toggle,
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_filter = if verbose { "tally=debug" } else { "tally=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let repo = Repository::open(&self.database).await?;
        let mut store = LedgerStore::load(repo).await;

        let outcome = run_command(&mut store, self.command).await;

        if let Some(err) = store.take_persistence_error() {
            eprintln!("{}", Notice::from(&err));
        }

        match outcome {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(err) => {
                eprintln!("{}", Notice::from(&err));
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

async fn run_command<S: KeyValueStore>(
    store: &mut LedgerStore<S>,
    command: Commands,
) -> Result<(), AppError> {
    match command {
        Commands::Add {
            name,
            amount,
            category,
        } => {
            let expense = store.add_expense(&name, amount, &category).await?;
            print_notice(Notice::success(MSG_EXPENSE_ADDED));
            print_expense_line(&expense);
            print_totals(&store.summary());
        }

        Commands::List => {
            print_expenses(store.expenses());
            print_totals(&store.summary());
        }

        Commands::Delete { id } => {
            store.delete_expense(id).await?;
            print_notice(Notice::success(MSG_EXPENSE_DELETED));
            print_totals(&store.summary());
        }

        Commands::Edit {
            id,
            name,
            amount,
            category,
        } => {
            let current = store.find(id).cloned().ok_or(AppError::ExpenseNotFound(id))?;
            let name = name.unwrap_or_else(|| current.name.clone());
            let amount = amount.unwrap_or_else(|| units_from_cents(current.amount_cents));
            let category = category.unwrap_or_else(|| current.category.clone());

            // Reject bad input before the original record is taken out.
            validate_entry(&name, amount)?;

            store.start_edit(id).await?;
            print_notice(Notice::success(MSG_EXPENSE_LOADED_FOR_EDIT));
            let expense = store.add_expense(&name, amount, &category).await?;
            print_expense_line(&expense);
            print_totals(&store.summary());
        }

        Commands::Receipt { path } => {
            let image = ReceiptImage::read(&path).await?;
            let attachment = store.attach_receipt(image).await;
            let message = if attachment.created {
                MSG_RECEIPT_CREATED
            } else {
                MSG_RECEIPT_ATTACHED
            };
            print_notice(Notice::success(message));
            print_expense_line(&attachment.expense);
        }

        Commands::Budget { amount } => {
            if let Some(value) = amount {
                store.set_budget(value).await?;
                print_notice(Notice::success(MSG_BUDGET_UPDATED));
            }
            println!("Budget:    {:>12}", format_cents(store.budget()));
            print_totals(&store.summary());
        }

        Commands::Summary { format } => {
            let summary = store.summary();
            match format.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&summary)
                        .context("Failed to serialize summary")?;
                    println!("{}", json);
                }
                _ => {
                    println!("Budget:    {:>12}", format_cents(store.budget()));
                    print_totals(&summary);
                    println!();
                    print_breakdown(&summary);
                }
            }
        }

        Commands::Categories => {
            for category in Category::ALL {
                let info = category.info();
                println!(
                    "{} {:<12} {:<12} {}",
                    info.icon,
                    category.as_str(),
                    category_label(category.as_str()),
                    info.color
                );
            }
        }

        Commands::Reset { yes } => {
            if !yes {
                return Err(AppError::validation(
                    "This deletes ALL expenses and resets your budget. Re-run with --yes to confirm.",
                ));
            }
            store.reset_all().await;
            print_notice(Notice::success(MSG_DATA_RESET));
        }

        Commands::DarkMode { state } => {
            let enabled = match state {
                Some(DarkModeSwitch::On) => {
                    store.set_dark_mode(true).await;
                    true
                }
                Some(DarkModeSwitch::Off) => {
                    store.set_dark_mode(false).await;
                    false
                }
                Some(DarkModeSwitch::Toggle) => store.toggle_dark_mode().await,
                None => store.dark_mode(),
            };
            println!("Dark mode: {}", if enabled { "on" } else { "off" });
        }

        Commands::Export { format, output } => {
            run_export_command(store, &format, output.as_deref())?;
        }
    }

    Ok(())
}

fn run_export_command<S: KeyValueStore>(
    store: &LedgerStore<S>,
    format: &str,
    output: Option<&str>,
) -> Result<(), AppError> {
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(store);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_expenses_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} expenses", count);
            }
        }
        "json" => {
            let snapshot = exporter.export_snapshot_json(writer)?;
            if output.is_some() {
                eprintln!("Exported ledger: {} expenses", snapshot.expenses.len());
            }
        }
        other => {
            return Err(AppError::validation(format!(
                "Unknown export format '{}'. Valid formats: csv, json",
                other
            )));
        }
    }

    Ok(())
}

fn print_notice(notice: Notice) {
    if notice.is_error() {
        eprintln!("{}", notice.message);
    } else {
        println!("{}", notice.message);
    }
}

fn print_expense_line(expense: &Expense) {
    let info = category_info(&expense.category);
    println!(
        "{:<15} {:<13} {:<24} {} {:<12} {:>10}{}",
        expense.id,
        expense.date,
        expense.name,
        info.icon,
        category_label(&expense.category),
        format_cents(expense.amount_cents),
        if expense.has_receipt() { " 📎" } else { "" }
    );
}

fn print_expenses(expenses: &[Expense]) {
    if expenses.is_empty() {
        println!("No expenses yet.");
        return;
    }
    println!(
        "{:<15} {:<13} {:<24} {:<15} {:>10}",
        "ID", "DATE", "NAME", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(80));
    for expense in expenses {
        print_expense_line(expense);
    }
    println!("{}", "-".repeat(80));
}

fn print_totals(summary: &LedgerSummary) {
    println!("Spent:     {:>12}", format_cents(summary.total_spent));
    println!("Remaining: {:>12}", format_cents(summary.remaining));
    if summary.over_budget {
        println!("Over budget by {}!", format_cents(-summary.remaining));
    }
}

fn print_breakdown(summary: &LedgerSummary) {
    println!("Spending Breakdown");
    if summary.breakdown.is_empty() {
        println!("No spending data to display yet.");
        return;
    }
    for share in &summary.breakdown {
        let info = category_info(&share.category);
        let bar = "█".repeat((share.percentage / 5.0).round() as usize);
        println!(
            "{} {:<12} {:<20} {:>10} ({:.1}%)",
            info.icon,
            category_label(&share.category),
            bar,
            format_cents(share.amount),
            share.percentage
        );
    }
}
