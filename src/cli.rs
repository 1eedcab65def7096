//! Contains structures and functionality for the binary
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

use coltable::TableError;
use coltable::TableSnapshot;
use coltable::types::{Cell, TableConfig};

/// Output format for commands that print a table
#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Header lines followed by one space-separated line per row
    #[default]
    Text,
    /// The table as a JSON object
    Json,
}

/// Cli Arguments related to logging
#[derive(clap::Args, Debug)]
pub(crate) struct LoggingArgs {
    /// Increase log verbosity (multiple uses increase verbosity further)
    #[arg(short, long, action = clap::ArgAction::Count, group = "verbosity")]
    verbose: u8,
    /// Reduce log verbosity to show only errors (equivalent to --log error)
    #[arg(short, long, group = "verbosity")]
    quiet: bool,
    /// Set log verbosity (default is "warn")
    #[arg(long = "log", value_parser = clap::builder::PossibleValuesParser::new(["error", "warn", "info", "debug", "trace"]), group = "verbosity")]
    log_level: Option<String>,
}

impl LoggingArgs {
    /// Initialising Logging
    ///
    /// Sets the logging verbosity to the given log-level in the following order:
    ///  * `Info`, `Debug`, `Trace`; depending on the count of `-v`
    ///  * `Error` when `-q` is used
    ///  * The `COLTABLE_LOG` environment variable value
    ///  * `Warn` otherwise
    pub(crate) fn initialize_logging(&self) {
        let mut builder = env_logger::Builder::new();

        // Default log level
        builder.filter_level(log::LevelFilter::Warn);

        builder.parse_env("COLTABLE_LOG");
        if let Some(ref level) = self.log_level {
            builder.parse_filters(level);
        } else if self.quiet {
            builder.filter_level(log::LevelFilter::Error);
        } else if self.verbose > 0 {
            builder.filter_level(match self.verbose {
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            });
        }
        builder.init();
    }
}

/// Cli arguments related to table file handling
#[derive(clap::Args, Debug)]
pub(crate) struct StorageArgs {
    /// Do not take advisory locks on table files
    #[arg(long = "no-lock", global = true)]
    no_lock: bool,
    /// Flush table files to disk after every write
    #[arg(long, global = true)]
    sync: bool,
}

impl StorageArgs {
    /// Table configuration selected by these flags
    pub(crate) fn table_config(&self) -> TableConfig {
        TableConfig {
            lock_files: !self.no_lock,
            sync_on_write: self.sync,
        }
    }
}

/// Comma-separated list of row indices, e.g. "0,2,1"
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexList(pub(crate) Vec<u32>);

/// Parse a comma-separated list of row indices
///
/// Whitespace around items is ignored and an empty string is an empty list.
pub(crate) fn parse_index_list(input: &str) -> Result<IndexList, String> {
    if input.trim().is_empty() {
        return Ok(IndexList(Vec::new()));
    }
    input
        .split(',')
        .map(|item| {
            item.trim()
                .parse::<u32>()
                .map_err(|err: ParseIntError| format!("invalid row index '{}': {err}", item.trim()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(IndexList)
}

/// Parse one cell value for `add`
///
/// Fractional values are truncated toward zero.
pub(crate) fn parse_cell(input: &str) -> Result<Cell, String> {
    if let Ok(value) = input.parse::<Cell>() {
        return Ok(value);
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.trunc() <= f64::from(Cell::MAX) => {
            Ok(value.trunc() as Cell)
        }
        Ok(_) => Err(format!(
            "value '{input}' is outside the range 0..={}",
            Cell::MAX
        )),
        Err(_) => Err(format!("value '{input}' is not a number")),
    }
}

/// Table commands
#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// Create an empty table with a fixed number of columns
    Create {
        /// Table file to create
        file: PathBuf,
        /// Number of columns
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        num_columns: u32,
    },
    /// Print a table
    Read {
        /// Table file
        file: PathBuf,
    },
    /// Append one row to a table
    Add {
        /// Table file
        file: PathBuf,
        /// One value per column
        #[arg(required = true, num_args = 1.., value_parser = parse_cell, allow_negative_numbers = true)]
        values: Vec<Cell>,
    },
    /// Write the cross join of two tables to a new table and print it
    #[command(name = "fullouterjoin")]
    FullOuterJoin {
        /// Table file to create
        new_file: PathBuf,
        /// Left table
        table1: PathBuf,
        /// Right table
        table2: PathBuf,
    },
    /// Join the listed rows of two tables into a new table and print it
    #[command(name = "innerjoin")]
    InnerJoin {
        /// Table file to create
        new_file: PathBuf,
        /// Left table
        table1: PathBuf,
        /// Left row indices, e.g. "0,1,2"
        #[arg(value_parser = parse_index_list)]
        left_indices: IndexList,
        /// Right table
        table2: PathBuf,
        /// Right row indices, e.g. "2,1,0"
        #[arg(value_parser = parse_index_list)]
        right_indices: IndexList,
    },
    /// Delete a table file
    Remove {
        /// Table file
        file: PathBuf,
    },
    /// Recount the stored rows and repair the header entry count
    Recount {
        /// Table file
        file: PathBuf,
    },
}

/// Coltable CLI
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
pub struct CliApp {
    /// Command to run
    #[command(subcommand)]
    pub(crate) command: Command,
    /// Output format for printed tables
    #[arg(long, value_enum, default_value_t, global = true)]
    pub(crate) format: OutputFormat,
    /// Logging
    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
    /// Table file handling
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

/// Errors reported by the binary
#[derive(Debug)]
pub(crate) enum CliError {
    /// Table operation failed
    Table(TableError),
    /// Output serialization failed
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Table(err) => write!(f, "{}", err),
            CliError::Json(err) => write!(f, "Failed to serialize output: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Table(err) => Some(err),
            CliError::Json(err) => Some(err),
        }
    }
}

impl From<TableError> for CliError {
    fn from(err: TableError) -> Self {
        CliError::Table(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err)
    }
}

/// Render a table in the requested format
pub(crate) fn render(snapshot: &TableSnapshot, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(render_text(snapshot)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)?),
    }
}

fn render_text(snapshot: &TableSnapshot) -> String {
    let mut out = format!(
        "Table Name: {}\nNumber of entries: {}\nNumber of columns: {}\n",
        snapshot.name, snapshot.entry_count, snapshot.column_count
    );
    for row in &snapshot.rows {
        let line = row
            .iter()
            .map(Cell::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
