//! These structs provide the CLI interface for the homelist CLI.

use crate::store::Selector;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// homelist: keep track of fixed monthly expenses and of what is in the refrigerator.
///
/// Each list is kept in its own file in the homelist home directory. Run `homelist init` once to
/// create it, then use the `expense` and `fridge` subcommands to add, list, edit and delete
/// entries and to see statistics.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/homelist; pass --home or set HOMELIST_HOME to put it somewhere else.
    Init,
    /// Manage the list of fixed monthly expenses.
    Expense(ExpenseArgs),
    /// Manage the list of food in the refrigerator.
    Fridge(FridgeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where homelist data and configuration is held. Defaults to ~/homelist
    #[arg(long, env = "HOMELIST_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `homelist expense` command.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseArgs {
    #[command(subcommand)]
    action: ExpenseSubcommand,
}

impl ExpenseArgs {
    pub fn new(action: ExpenseSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &ExpenseSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExpenseSubcommand {
    /// Add a fixed expense.
    Add(ExpenseFields),
    /// List the expenses, largest amount first.
    List,
    /// Change some fields of an expense. Fields that are not given keep their value.
    Edit(ExpenseEditArgs),
    /// Delete an expense.
    Delete(SelectArgs),
    /// Show the monthly total, the most frequent category and other statistics.
    Stats,
}

/// The fields of a new expense. Values are validated when the expense is added.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseFields {
    /// What the expense is, e.g. "Rent".
    #[arg(long)]
    pub name: String,

    /// A free-form category used for grouping, e.g. "housing".
    #[arg(long)]
    pub category: String,

    /// The monthly amount in won. Thousands separators are allowed.
    #[arg(long)]
    pub amount: String,

    /// The day of the month the expense is paid, 1 to 31.
    #[arg(long)]
    pub payment_date: String,
}

/// Args for `homelist expense edit`.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseEditArgs {
    /// The list position (as shown by `list`) or the id of the expense.
    pub target: Selector,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub amount: Option<String>,

    #[arg(long)]
    pub payment_date: Option<String>,
}

/// Args for `homelist fridge`.
#[derive(Debug, Parser, Clone)]
pub struct FridgeArgs {
    #[command(subcommand)]
    action: FridgeSubcommand,
}

impl FridgeArgs {
    pub fn new(action: FridgeSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &FridgeSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum FridgeSubcommand {
    /// Add a food item.
    Add(FoodFields),
    /// List the food items, soonest expiry first.
    List,
    /// Change the name or expiry of a food item.
    Edit(FoodEditArgs),
    /// Delete a food item.
    Delete(SelectArgs),
    /// Show how many items are fresh, close to expiry or expired.
    Stats,
}

/// The fields of a new food item.
#[derive(Debug, Parser, Clone)]
pub struct FoodFields {
    /// What the food is, e.g. "Milk".
    #[arg(long)]
    pub name: String,

    /// The expiry date, YYYY-MM-DD.
    #[arg(long)]
    pub expiry: String,
}

/// Args for `homelist fridge edit`.
#[derive(Debug, Parser, Clone)]
pub struct FoodEditArgs {
    /// The list position (as shown by `list`) or the id of the food item.
    pub target: Selector,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub expiry: Option<String>,
}

/// Picks out one entry of a list.
#[derive(Debug, Parser, Clone)]
pub struct SelectArgs {
    /// The list position (as shown by `list`) or the id of the entry.
    pub target: Selector,
}

impl SelectArgs {
    pub fn new(target: Selector) -> Self {
        Self { target }
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("homelist"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or HOMELIST_HOME instead of relying on the default \
                homelist directory.",
            );
            PathBuf::from("homelist")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expense_add() {
        let args = Args::try_parse_from([
            "homelist",
            "--home",
            "/tmp/h",
            "expense",
            "add",
            "--name",
            "Rent",
            "--category",
            "housing",
            "--amount",
            "600,000",
            "--payment-date",
            "25",
        ])
        .unwrap();
        assert_eq!(args.common().home().path(), Path::new("/tmp/h"));
        match args.command() {
            Command::Expense(e) => match e.action() {
                ExpenseSubcommand::Add(fields) => {
                    assert_eq!(fields.amount, "600,000");
                    assert_eq!(fields.payment_date, "25");
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_fridge_delete_by_position() {
        let args = Args::try_parse_from(["homelist", "fridge", "delete", "2"]).unwrap();
        match args.command() {
            Command::Fridge(f) => match f.action() {
                FridgeSubcommand::Delete(select) => {
                    assert_eq!(select.target, Selector::Position(2))
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_bad_selector() {
        assert!(Args::try_parse_from(["homelist", "expense", "delete", "rent"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let args =
            Args::try_parse_from(["homelist", "--log-level", "debug", "expense", "list"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }
}
