//! # Seed Data Generator
//!
//! Populates the database with a small catalogue and one sample quote for
//! development.
//!
//! ## Usage
//! ```bash
//! # Use the configured database (ORCA_DB_PATH / orca.toml / platform default)
//! cargo run -p orca-db --bin seed
//!
//! # Specify database path
//! cargo run -p orca-db --bin seed -- --db ./data/orca.db
//! ```

use chrono::Utc;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use orca_core::{DiscountSpec, Money, ProductGroupId, QuoteDraft};
use orca_db::{Database, DbConfig, OrcaConfig, QuoteService};

/// Product groups and their products: (group, [(product, price in cents)]).
const CATALOGUE: &[(&str, &[(&str, i64)])] = &[
    (
        "Papelaria",
        &[
            ("Caneta esferográfica azul", 250),
            ("Caderno universitário 200 folhas", 2890),
            ("Resma papel A4", 3490),
        ],
    ),
    (
        "Informática",
        &[
            ("Mouse sem fio", 8990),
            ("Teclado USB", 12900),
            ("Cabo HDMI 2m", 3990),
        ],
    ),
    (
        "Serviços",
        &[("Instalação", 15000), ("Visita técnica", 12000)],
    ),
];

/// Clients: (name, email, phone).
const CLIENTS: &[(&str, Option<&str>, Option<&str>)] = &[
    ("Padaria Central", Some("contato@padariacentral.com.br"), Some("(11) 3333-1000")),
    ("Escritório Silva & Filhos", Some("compras@silvaefilhos.com.br"), None),
    ("Maria Oliveira", None, Some("(21) 98888-2000")),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = OrcaConfig::load_or_default(None);
    let mut db_path = config.database_path.clone();

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Orca Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: configured path)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    info!(path = %db_path.display(), "Seeding database");
    let db = Database::new(DbConfig::new(&db_path)).await?;
    let service = QuoteService::new(db, &config);

    if !service.list_clients().await?.is_empty() {
        warn!("Database already has clients, skipping seed to avoid duplicates");
        return Ok(());
    }

    for (name, email, phone) in CLIENTS {
        service.add_client(name, *email, *phone).await?;
    }

    for (group, products) in CATALOGUE {
        let group_id: ProductGroupId = service.add_product_group(group).await?;
        for (name, cents) in products.iter() {
            service
                .add_product(name, Money::from_cents(*cents), Some(group_id))
                .await?;
        }
    }

    let clients = service.list_clients().await?;
    let products = service.list_products().await?;
    info!(clients = clients.len(), products = products.len(), "Catalogue created");

    let mut draft = QuoteDraft::new(Utc::now().date_naive())
        .with_notes("Orçamento de exemplo gerado pelo seed");
    draft.set_client(clients.first().map(|c| c.id));
    for product in products.iter().take(3) {
        draft.add_item(product)?;
    }
    if let Some(first) = products.first() {
        draft.set_quantity(first.id, 2)?;
    }
    draft.set_discount(DiscountSpec::percent_bps(1000));

    let totals = draft.totals();
    let quote_id = service.submit_draft(&draft).await?;

    info!(
        quote_id = %quote_id,
        gross = %config.format_currency(totals.gross_total),
        net = %config.format_currency(totals.net_total),
        "Sample quote created"
    );

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=orca=trace` - Show trace for orca crates only
/// - Default: `info,orca=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,orca=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
