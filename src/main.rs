use anyhow::Result;
use asyncz_site::config::Config;
use asyncz_site::i18n::{Catalog, CatalogValidator};
use asyncz_site::server::{self, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("asyncz_site=info".parse()?),
        )
        .init();

    info!("Starting asyncz site");

    let config = Config::from_env()?;
    let catalog = Catalog::load_dir(&config.locales_dir)?;

    let report = CatalogValidator::validate(&catalog);
    for warning in &report.warnings {
        warn!("Catalog: {}", warning);
    }
    if report.has_errors() {
        for error in &report.errors {
            warn!("Catalog error: {}", error);
        }
        anyhow::bail!("Translation catalog has {} errors", report.errors.len());
    }
    info!(
        "Catalog validated ({} warnings)",
        report.warnings.len()
    );

    let state = AppState::new(config, catalog)?;
    server::serve(state).await
}
