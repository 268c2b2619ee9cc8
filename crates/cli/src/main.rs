use anyhow::Context;
use bookstore_app::app::{self, App};
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Operate the bookstore catalog service
#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate the database and serve the HTTP API until shutdown
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
    /// Print the merged OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Openapi => {
            let document = app::openapi_document()?;
            let rendered =
                serde_json::to_string_pretty(&document).context("failed to render OpenAPI")?;
            println!("{rendered}");
            Ok(())
        }
        Command::Migrate => {
            let app = bootstrap().await?;
            tracing::info!(db = %app.settings().database.path, "migrations complete");
            Ok(())
        }
        Command::Serve => bootstrap().await?.serve().await,
    }
}

async fn bootstrap() -> anyhow::Result<App> {
    let settings = Settings::load().context("failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;
    tracing::info!(env = ?settings.environment, "bookstore CLI starting");
    App::bootstrap(settings).await
}
