//! Coltable command line entry

// Use jemalloc as global allocator
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

mod cli;

use clap::Parser;
use cli::{CliApp, CliError, Command, render};
use coltable::types::TableConfig;
use coltable::{ColumnarTable, join};

fn print_table(table: &ColumnarTable, format: cli::OutputFormat) -> Result<(), CliError> {
    let snapshot = table.snapshot()?;
    print!("{}", render(&snapshot, format)?);
    Ok(())
}

fn run(cli: CliApp) -> Result<(), CliError> {
    let config: TableConfig = cli.storage.table_config();

    match cli.command {
        Command::Create { file, num_columns } => {
            ColumnarTable::create_with(&file, num_columns, config)?;
            println!(
                "Table {} created with {} columns.",
                file.display(),
                num_columns
            );
        }
        Command::Read { file } => {
            let table = ColumnarTable::open_with(&file, config)?;
            print_table(&table, cli.format)?;
        }
        Command::Add { file, values } => {
            let mut table = ColumnarTable::open_with(&file, config)?;
            table.append_rows(&[values])?;
            println!("Row added to table {}.", file.display());
        }
        Command::FullOuterJoin {
            new_file,
            table1,
            table2,
        } => {
            let left = ColumnarTable::open_with(&table1, config)?;
            let right = ColumnarTable::open_with(&table2, config)?;
            let joined = join::full_outer_join(&left, &right, &new_file)?;
            print_table(&joined, cli.format)?;
        }
        Command::InnerJoin {
            new_file,
            table1,
            left_indices,
            table2,
            right_indices,
        } => {
            let left = ColumnarTable::open_with(&table1, config)?;
            let right = ColumnarTable::open_with(&table2, config)?;
            let joined = join::inner_join(&left, &right, &new_file, &left_indices.0, &right_indices.0)?;
            print_table(&joined, cli.format)?;
        }
        Command::Remove { file } => {
            ColumnarTable::remove(&file)?;
            println!("Table {} removed.", file.display());
        }
        Command::Recount { file } => {
            let mut table = ColumnarTable::open_with(&file, config)?;
            let previous = table.cached_entry_count();
            let actual = table.repair_entry_count()?;
            println!(
                "Table {} holds {} entries (header recorded {}).",
                file.display(),
                actual,
                previous
            );
        }
    }

    Ok(())
}

fn main() {
    let cli = CliApp::try_parse().unwrap_or_else(|err| {
        // Help and version go to stdout with status 0, usage errors exit with 1
        if err.use_stderr() {
            let _ = err.print();
            std::process::exit(1)
        }
        err.exit()
    });

    cli.logging.initialize_logging();
    log::debug!("Command: {:?}", cli.command);

    run(cli).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1)
    })
}
