//! Reserva CLI - seed and inspect a local booking database
//!
//! The seed command feeds a sync-batch JSON file through the same
//! reconciliation engine the API uses, so seeding is idempotent.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use reserva_core::db::{
    AppointmentRepository, CustomerRepository, Database, LabelRepository, ServiceRepository,
    SqliteAppointmentRepository, SqliteCustomerRepository, SqliteLabelRepository,
    SqliteServiceRepository, SqliteTeamMemberRepository, TeamMemberRepository,
};
use reserva_core::{SyncBatch, SyncEngine, SyncOptions};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "reserva")]
#[command(about = "Seed and inspect a Reserva booking database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the local database file
    #[arg(long, value_name = "PATH", default_value = "reserva.db")]
    db_path: PathBuf,

    /// Organization to operate on
    #[arg(long, default_value = "default")]
    org: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a sync-batch JSON file into the database
    Seed {
        /// Path to the batch file
        file: PathBuf,
        /// Commit records as they are written instead of one transaction
        #[arg(long)]
        no_transaction: bool,
    },
    /// List stored records
    List {
        /// Entity kind to list
        entity: Entity,
        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show row counts per entity kind
    Summary,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Entity {
    Customers,
    Services,
    TeamMembers,
    Labels,
    Appointments,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] reserva_core::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid batch file: {0}")]
    Parse(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let db = Database::open(&cli.db_path)?;

    match &cli.command {
        Commands::Seed {
            file,
            no_transaction,
        } => seed(&db, &cli.org, file, !*no_transaction),
        Commands::List {
            entity,
            limit,
            json,
        } => list(&db, &cli.org, *entity, *limit, *json),
        Commands::Summary => summary(&db, &cli.org),
    }
}

fn seed(db: &Database, org: &str, file: &Path, transactional: bool) -> Result<(), CliError> {
    let contents = fs::read_to_string(file)?;
    let batch: SyncBatch = serde_json::from_str(&contents)?;

    let summary = SyncEngine::new(db.connection(), org)
        .with_options(SyncOptions { transactional })
        .run(&batch)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn list(db: &Database, org: &str, entity: Entity, limit: usize, json: bool) -> Result<(), CliError> {
    let conn = db.connection();

    match entity {
        Entity::Customers => {
            let rows = SqliteCustomerRepository::new(conn, org).list(limit, 0)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!("{:>6}  {:<30}  {}", row.id, row.email, row.name);
                }
            }
        }
        Entity::Services => {
            let rows = SqliteServiceRepository::new(conn, org).list(limit, 0)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!(
                        "{:>6}  {:<30}  {:>4} min  {:>8.2}  {}",
                        row.id, row.name, row.duration, row.price, row.category
                    );
                }
            }
        }
        Entity::TeamMembers => {
            let rows = SqliteTeamMemberRepository::new(conn, org).list(limit, 0)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!("{:>6}  {:<30}  {:<20}  {}", row.id, row.email, row.name, row.role);
                }
            }
        }
        Entity::Labels => {
            let rows = SqliteLabelRepository::new(conn, org).list(limit, 0)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!("{:>6}  {:<20}  {}", row.id, row.label_type, row.label_value);
                }
            }
        }
        Entity::Appointments => {
            let rows = SqliteAppointmentRepository::new(conn, org).list(limit, 0)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!(
                        "{:>6}  {} {}  customer {}  {}",
                        row.id, row.date, row.time, row.customer_id, row.status
                    );
                }
            }
        }
    }

    Ok(())
}

fn summary(db: &Database, org: &str) -> Result<(), CliError> {
    let conn = db.connection();
    for table in [
        "customers",
        "services",
        "team_members",
        "custom_labels",
        "appointments",
    ] {
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE org_id = ?"),
            [org],
            |row| row.get(0),
        )
        .map_err(reserva_core::Error::from)?;
        println!("{table:<14} {count}");
    }
    Ok(())
}
