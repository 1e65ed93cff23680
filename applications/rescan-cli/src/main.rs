/// Soul Rescan - keep library metadata in step with the files on disk
use clap::{Parser, Subcommand};
use soul_rescan_cli::{commands, open_storage, AppConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soul-rescan")]
#[command(about = "Incremental metadata rescanner for the Soul library", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./soul-rescan.toml if present)
    #[arg(short, long, global = true, env = "SOUL_RESCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scan pass in the foreground
    Scan,
    /// Register audio files or directories as compositions
    Add {
        /// Files or directories to register
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete a composition from the catalog
    Remove {
        /// Composition id
        id: i64,
    },
    /// Force the next pass to rescan the whole library
    BumpVersion,
    /// Show the persisted scanner state
    State {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soul_rescan=info,soul_storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    let ctx = open_storage(&config).await?;

    match cli.command {
        Commands::Scan => match commands::scan(&ctx, &config).await?.summary {
            Some(summary) => {
                println!(
                    "Scanned {} compositions in {:?} ({} updated, {} missing, {} removed, {} failed)",
                    summary.scanned,
                    summary.duration,
                    summary.updated,
                    summary.missing,
                    summary.removed,
                    summary.failed
                );
            }
            None => println!("A scan is already running"),
        },
        Commands::Add { paths } => {
            let outcome = commands::add(&ctx, &paths).await?;
            println!(
                "Added {} compositions ({} already registered)",
                outcome.added.len(),
                outcome.skipped.len()
            );
        }
        Commands::Remove { id } => {
            commands::remove(&ctx, id).await?;
            println!("Removed composition {}", id);
        }
        Commands::BumpVersion => {
            let version = commands::bump_version(&ctx).await?;
            println!("Library version is now {}", version);
        }
        Commands::State { json } => {
            let report = commands::state(&ctx).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Current version:      {}", report.current_version);
                println!("Last scanned version: {}", report.last_version);
                println!("Last complete scan:   {}", report.last_complete_scan_time);
                println!("Full rescan pending:  {}", report.full_rescan_pending);
                println!("Compositions:         {}", report.compositions);
            }
        }
    }

    Ok(())
}
