use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_app::Storage;
use shelf_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "shelf-cli", version, about = "Book records service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Keep records in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Apply pending schema migrations and exit
    Migrate,
    /// Print the resolved configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;

    match cli.command.unwrap_or(Command::Serve { in_memory: false }) {
        Command::CheckConfig => {
            println!("{:#?}", settings);
        }
        Command::Migrate => {
            shelf_telemetry::init(&settings.telemetry);
            let applied = shelf_app::migrate(&settings).await?;
            tracing::info!(applied, "migrations complete");
        }
        Command::Serve { in_memory } => {
            shelf_telemetry::init(&settings.telemetry);
            tracing::info!(
                env = ?settings.environment,
                db = %settings.database.endpoint(),
                in_memory,
                "shelf bootstrap starting"
            );
            let storage = if in_memory {
                Storage::InMemory
            } else {
                Storage::Postgres
            };
            shelf_app::serve(settings, storage).await?;
        }
    }

    Ok(())
}
