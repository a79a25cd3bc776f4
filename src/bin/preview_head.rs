//! Preview binary - shows how a path is routed and what head it renders with
//!
//! Usage:
//!   cargo run --bin preview -- /pricing                 # English browser
//!   cargo run --bin preview -- /pricing "de-DE,de;q=0.9" # German browser
//!   cargo run --bin preview -- /ar/faq --full            # Whole document
//!
//! Optional environment variables:
//! - LOCALES_DIR (defaults to locales)
//! - SITE_URL (defaults to https://asyncz.com)

use anyhow::Result;
use asyncz_site::config::Config;
use asyncz_site::i18n::{parse_accept_language, Catalog, LocaleController};
use asyncz_site::pages::Page;
use asyncz_site::render::render_document;
use asyncz_site::seo::{apply_seo_metadata, HeadDocument};
use asyncz_site::storage::PreferenceStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("asyncz_site=warn".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let full = args.iter().any(|a| a == "--full");
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));
    let path = positional.next().cloned().unwrap_or_else(|| "/".to_string());
    let accept_language = positional.next().cloned().unwrap_or_else(|| "en".to_string());

    let config = Config::from_env()?;
    let catalog = Catalog::load_dir(&config.locales_dir)?;

    let mut controller = LocaleController::new(
        PreferenceStore::in_memory(),
        parse_accept_language(&accept_language),
    );
    let settled = controller.settle(&path);

    println!("\n{}", "=".repeat(60));
    println!("REQUEST: {}", path);
    for navigation in &settled.redirects {
        println!("  -> redirect to {}", navigation.to);
    }
    println!("LANGUAGE: {} ({})", settled.language.name(), settled.language.code());
    println!("{}\n", "=".repeat(60));

    let site = &config.site;
    let tr = catalog.translator(settled.language);
    let page = Page::resolve(&settled.path).settle(&tr);
    info!("Resolved {} to {:?}", settled.path, page);

    let mut head = HeadDocument::new();
    apply_seo_metadata(&mut head, &page.seo(&tr, site), &settled.path, site);

    if full {
        let main = page.body(&tr, site, None);
        println!("{}", render_document(&head, &tr, site, &settled.path, &main));
    } else {
        println!("{}", head.render());
    }

    println!("{}", "=".repeat(60));
    println!("STATUS: {}", page.status(&tr));
    Ok(())
}
