use anyhow::Context;
use bookstore_app::app::App;
use bookstore_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path,
        "bookstore-app bootstrap starting"
    );

    let app = App::bootstrap(settings).await?;
    tracing::info!("bookstore-app bootstrap complete");

    app.serve().await
}
