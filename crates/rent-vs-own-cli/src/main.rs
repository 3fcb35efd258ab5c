mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::cashflow::CashFlowArgs;
use commands::comparison::ScenarioArgs;
use commands::mortgage::AmortizeArgs;
use commands::sensitivity::SensitivityArgs;

/// Rent vs. own scenario simulations
#[derive(Parser)]
#[command(
    name = "rvo",
    version,
    about = "Rent vs. own scenario simulations",
    long_about = "Month-by-month simulations of buying a home versus renting and \
                  investing, with decimal precision. Covers live-in and rental \
                  ownership, net-worth accounting, cash-flow models for long- and \
                  short-term rentals, fix-and-flip, and 2-way sensitivity sweeps."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed-rate mortgage payment and amortisation schedule
    Amortize(AmortizeArgs),
    /// Buy and live in the home vs. rent and invest the difference
    BuyAndLive(ScenarioArgs),
    /// Buy and let the property vs. invest the same outlay in stocks
    BuyAndRent(ScenarioArgs),
    /// Net-worth view of buy-and-live vs. rent-and-invest
    NetWorthBuyAndLive(ScenarioArgs),
    /// Rental with a side portfolio vs. a stock portfolio
    HybridRental(ScenarioArgs),
    /// Long-term rental cash flow with depreciation and sale
    LongTermRental(CashFlowArgs),
    /// Short-term (nightly) rental cash flow
    ShortTermRental(CashFlowArgs),
    /// Fix and flip: renovate, hold and sell
    Flip(CashFlowArgs),
    /// 2-way sensitivity of a comparison's final advantage
    Sensitivity(SensitivityArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::mortgage::run_amortize(args),
        Commands::BuyAndLive(args) => commands::comparison::run_buy_and_live(args),
        Commands::BuyAndRent(args) => commands::comparison::run_buy_and_rent(args),
        Commands::NetWorthBuyAndLive(args) => commands::comparison::run_net_worth_buy_and_live(args),
        Commands::HybridRental(args) => commands::comparison::run_hybrid_rental(args),
        Commands::LongTermRental(args) => commands::cashflow::run_long_term_rental(args),
        Commands::ShortTermRental(args) => commands::cashflow::run_short_term_rental(args),
        Commands::Flip(args) => commands::cashflow::run_flip(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("rvo {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
