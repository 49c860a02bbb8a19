//! # Database Migrations
//!
//! Embedded SQL migrations for Orca.
//!
//! ## Schema Versions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0001_initial_schema.sql                                                │
//! │     clientes, grupos_produtos, produtos, orcamentos, orcamento_itens    │
//! │                                                                         │
//! │  0002_print_tracking.sql                                                │
//! │     orcamentos.valor_bruto  (nullable, stored gross total)              │
//! │     orcamentos.print_count  (nullable, times printed)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers treat both 0002 columns as optional; see `records::QuoteRow`.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/` with the next sequence number
//! 2. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Migrations embedded from `crates/orca-db/migrations` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Runs all pending database migrations.
///
/// Idempotent: applied versions are tracked in `_sqlx_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
