mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::{BalanceArgs, PaymentArgs, ScheduleArgs};
use commands::closing_costs::ClosingCostsArgs;
use commands::refinance::{AnalyzeArgs, BreakevenArgs};
use refi_core::RefiError;

/// Mortgage refinance decision calculations
#[derive(Parser)]
#[command(
    name = "refi",
    version,
    about = "Mortgage refinance decision calculations",
    long_about = "A CLI for mortgage refinance decisions with decimal precision. \
                  Computes payments, amortization, closing-cost worksheets, breakeven, \
                  the cost of waiting for a better rate and double-refinance strategies."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log intermediate figures to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full refinance analysis (now, wait, double refinance)
    Analyze(AnalyzeArgs),
    /// Level monthly payment for a loan
    Payment(PaymentArgs),
    /// Remaining balance after a number of payments
    Balance(BalanceArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Aggregate a closing-cost worksheet
    ClosingCosts(ClosingCostsArgs),
    /// Months to recoup a cost from monthly savings
    Breakeven(BreakevenArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::refinance::run_analyze(args),
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Balance(args) => commands::amortization::run_balance(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::ClosingCosts(args) => commands::closing_costs::run_closing_costs(args),
        Commands::Breakeven(args) => commands::refinance::run_breakeven(args),
        Commands::Version => {
            println!("refi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            report_error(e.as_ref());
            process::exit(1);
        }
    }
}

fn report_error(e: &(dyn std::error::Error + 'static)) {
    match e.downcast_ref::<RefiError>() {
        Some(RefiError::ValidationFailed { issues }) => {
            eprintln!("{}: {} invalid input(s)", "error".red().bold(), issues.len());
            for issue in issues {
                eprintln!("  - {}", issue);
            }
        }
        _ => eprintln!("{}: {}", "error".red().bold(), e),
    }
}
