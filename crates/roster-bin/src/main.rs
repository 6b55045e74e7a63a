//! roster - students CRUD with a live list, and single-image upload.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roster_config::{init_logging, Config, Paths};

use crate::output::OutputFormat;

/// roster command-line interface.
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Manage student records and upload images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error). Defaults to the configured level
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for the database, blobs, logs and config. Defaults to ~/.roster
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a student
    Add {
        #[arg(long)]
        name: String,
        /// Age, validated as an integer before anything is written
        #[arg(long, allow_hyphen_values = true)]
        age: String,
    },
    /// Delete every student with this name and age
    Delete {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        age: String,
    },
    /// Set the age of every student with this name
    Update {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        age: String,
    },
    /// Print the current student list
    List,
    /// Print the student list every time it changes, until Ctrl-C
    Watch {
        /// How often to check for changes made by other processes
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
    /// Upload an image and print its download reference
    Upload {
        /// Image file to upload
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level, Some(paths.log_file()));
    paths.ensure_dirs()?;

    let format = cli.format;
    let result = match cli.command {
        Commands::Add { name, age } => commands::add(&config, &paths, &name, &age, format).await,
        Commands::Delete { name, age } => {
            commands::delete(&config, &paths, &name, &age, format).await
        }
        Commands::Update { name, age } => {
            commands::update(&config, &paths, &name, &age, format).await
        }
        Commands::List => commands::list(&config, &paths, format).await,
        Commands::Watch { interval_ms } => {
            commands::watch(&config, &paths, interval_ms, format).await
        }
        Commands::Upload { file } => commands::upload(&config, &paths, &file, format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{e:#}"), format);
        std::process::exit(1);
    }
    Ok(())
}
