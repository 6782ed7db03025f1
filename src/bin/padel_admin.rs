use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;
use padel_registry::config::config::Config;
use padel_registry::models::admin::Table;
use padel_registry::repository::database::Database;

#[derive(Parser)]
#[command(author, version, about = "Maintenance tasks for the padel registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create any missing table.
    InitSchema,
    /// Delete one match together with its sets and results.
    DeleteMatch { match_id: i32 },
    /// Delete every match, set and result. Players and teams are kept.
    PurgeMatches,
    /// Print every row of a table as JSON lines.
    Dump {
        #[arg(value_enum)]
        table: Table,
    },
}

fn main() -> ExitCode {
    if let Err(err) = log4rs::init_file("./log-config.yml", Default::default()) {
        eprintln!("logging disabled: {err}");
    }
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("padel-admin failed: {}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::init()?;
    let db = Database::connect(&config.database)?;

    match command {
        Commands::InitSchema => {
            db.ensure_schema()?;
            println!("schema ready");
        }
        Commands::DeleteMatch { match_id } => {
            if db.delete_match(match_id)? {
                println!("deleted match {match_id}");
            } else {
                println!("match {match_id} does not exist");
            }
        }
        Commands::PurgeMatches => {
            let summary = db.purge_matches()?;
            println!(
                "deleted {} matches, {} sets and {} results",
                summary.matches, summary.sets, summary.outcomes
            );
        }
        Commands::Dump { table } => {
            let rows = db.dump_table(table)?;
            let mut out = io::stdout().lock();
            if rows.is_empty() {
                eprintln!("table {table} is empty");
            }
            for row in rows {
                writeln!(out, "{row}")?;
            }
        }
    }
    Ok(())
}
