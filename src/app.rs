//! Application bootstrap shared by the `bookstore-app` binary and the CLI.

use anyhow::Context;
use bookstore_db::Database;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Opened database plus the initialized module registry.
pub struct App {
    settings: Settings,
    db: Database,
    registry: ModuleRegistry,
}

impl App {
    /// Open the database, register and initialize every module, then apply
    /// pending migrations.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let db = Database::open(&settings.database).with_context(|| {
            format!("failed to open database at '{}'", settings.database.path)
        })?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &db);

        let app = Self {
            settings,
            db,
            registry,
        };
        app.registry
            .init_modules(&app.init_ctx())
            .await
            .context("module initialization failed")?;
        app.migrate().await?;
        Ok(app)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Apply pending migrations; returns how many ran.
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        let applied = self
            .db
            .migrate(self.registry.collect_migrations())
            .await
            .context("database migration failed")?;
        tracing::info!(applied, "database schema up to date");
        Ok(applied)
    }

    /// Start modules, serve HTTP until a shutdown signal, then stop modules.
    pub async fn serve(self) -> anyhow::Result<()> {
        let ctx = self.init_ctx();
        self.registry
            .start_modules(&ctx)
            .await
            .context("module start failed")?;

        let served = bookstore_http::start_server(&self.registry, &self.settings).await;

        self.registry
            .stop_modules()
            .await
            .context("module stop failed")?;
        served
    }

    fn init_ctx(&self) -> InitCtx<'_> {
        InitCtx {
            settings: &self.settings,
        }
    }
}

/// Merged OpenAPI document for every catalog module.
///
/// Modules are registered over a throwaway in-memory database, so no
/// configured database file is opened or created.
pub fn openapi_document() -> anyhow::Result<serde_json::Value> {
    let db = Database::open_in_memory().context("failed to open in-memory database")?;
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &db);
    Ok(bookstore_http::openapi::document(&registry))
}
