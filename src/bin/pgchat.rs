//! pgchat CLI
//!
//! Command-line interface for the natural-language PostgreSQL chat
//! pipeline.

use clap::{Parser, Subcommand};
use pgchat::catalog::CatalogSnapshot;
use pgchat::db::{loader, Database};
use pgchat::{Config, Pipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Natural-language chat over a PostgreSQL database
#[derive(Parser)]
#[command(name = "pgchat")]
#[command(
    about = "Ask a PostgreSQL database questions in natural language",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web console
    Serve {
        /// Host to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind
        #[arg(long, env = "PGCHAT_PORT", default_value = "8080")]
        port: u16,

        /// Disable few-shot example retrieval
        #[arg(long)]
        no_examples: bool,
    },

    /// Ask a single question
    Ask {
        /// Question in natural language
        question: String,

        /// Print the generated SQL without executing it
        #[arg(long)]
        sql_only: bool,

        /// Disable few-shot example retrieval
        #[arg(long)]
        no_examples: bool,
    },

    /// Print the introspected schema
    Schema,

    /// Load CSV files into tables (one table per file, replacing existing)
    Load {
        /// CSV files to load
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pgchat=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_examples,
        } => {
            let config = Config::from_env()?;
            let pipeline = Pipeline::from_config(&config, !no_examples).await?;
            pgchat::server::serve(Arc::new(pipeline), &host, port).await?;
        }

        Commands::Ask {
            question,
            sql_only,
            no_examples,
        } => {
            let config = Config::from_env()?;
            let pipeline = Pipeline::from_config(&config, !no_examples).await?;

            if sql_only {
                println!("{}", pipeline.generate_sql(&question).await?);
            } else {
                let exchange = pipeline.ask(&question).await?;
                println!("SQL: {}\n", exchange.sql);
                print!("{}", exchange.table.render());
                println!("\nAnswer: {}", exchange.answer);
            }
        }

        Commands::Schema => {
            let db = Database::connect(&db_url()?).await?;
            let snapshot = CatalogSnapshot::introspect(&db).await?;
            print!("{}", snapshot.render());
        }

        Commands::Load { files } => {
            if files.is_empty() {
                anyhow::bail!("no CSV files given");
            }
            let db = Database::connect(&db_url()?).await?;
            for file in &files {
                let report = loader::load_csv(&db, file).await?;
                println!("{}: {} rows", report.table, report.rows);
            }
        }
    }

    Ok(())
}

fn db_url() -> anyhow::Result<String> {
    std::env::var("DB_URL").map_err(|_| anyhow::anyhow!("DB_URL environment variable not set"))
}
