use clap::Parser;
use homelist::args::{Args, Command, ExpenseSubcommand, FridgeSubcommand};
use homelist::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Expense(expense_args) => {
            let config = Config::load(home).await?;
            match expense_args.action() {
                ExpenseSubcommand::Add(fields) => {
                    commands::expense_add(config, fields.clone()).await?.print()
                }
                ExpenseSubcommand::List => commands::expense_list(config).await?.print(),
                ExpenseSubcommand::Edit(args) => {
                    commands::expense_edit(config, args.clone()).await?.print()
                }
                ExpenseSubcommand::Delete(args) => {
                    commands::expense_delete(config, args.clone()).await?.print()
                }
                ExpenseSubcommand::Stats => commands::expense_stats(config).await?.print(),
            }
        }

        Command::Fridge(fridge_args) => {
            let config = Config::load(home).await?;
            match fridge_args.action() {
                FridgeSubcommand::Add(fields) => {
                    commands::fridge_add(config, fields.clone()).await?.print()
                }
                FridgeSubcommand::List => commands::fridge_list(config).await?.print(),
                FridgeSubcommand::Edit(args) => {
                    commands::fridge_edit(config, args.clone()).await?.print()
                }
                FridgeSubcommand::Delete(args) => {
                    commands::fridge_delete(config, args.clone()).await?.print()
                }
                FridgeSubcommand::Stats => commands::fridge_stats(config).await?.print(),
            }
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
