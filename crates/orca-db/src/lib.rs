//! # orca-db: Storage Layer for Orca Quotes
//!
//! SQLite storage, the quote submission saga and the quote service.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orca Data Flow                                   │
//! │                                                                         │
//! │  Page action (submit, view, print, report)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     orca-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌───────────────────┐  │   │
//! │  │   │ QuoteService │──►│    saga      │──►│ QuoteStore (trait)│  │   │
//! │  │   │ (service.rs) │   │ header/items │   │   impl Database   │  │   │
//! │  │   └──────┬───────┘   │ /compensate  │   └─────────┬─────────┘  │   │
//! │  │          │           └──────────────┘             │            │   │
//! │  │          ▼                                        ▼            │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌───────────────────┐  │   │
//! │  │   │ Repositories │──►│   records    │   │    Migrations     │  │   │
//! │  │   │ client/      │   │ row ↔ core   │   │ 0001 schema       │  │   │
//! │  │   │ product/quote│   │   mapping    │   │ 0002 print/gross  │  │   │
//! │  │   └──────────────┘   └──────────────┘   └───────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`records`] - Row structs and optional-column fallbacks
//! - [`repository`] - Repository implementations
//! - [`store`] - The `QuoteStore` seam used by the saga
//! - [`saga`] - Quote submission with compensation
//! - [`service`] - `QuoteService`
//! - [`config`] - `OrcaConfig`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orca_db::{Database, DbConfig, OrcaConfig, QuoteService};
//!
//! let config = OrcaConfig::load_or_default(None);
//! let db = Database::new(DbConfig::new(&config.database_path)).await?;
//! let service = QuoteService::new(db, &config);
//!
//! let id = service.submit_draft(&draft).await?;
//! let details = service.details(id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod records;
pub mod repository;
pub mod saga;
pub mod service;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, OrcaConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use saga::{submit_quote, SubmitError, SubmitGate};
pub use service::{QuoteService, ServiceError, ServiceResult};
pub use store::QuoteStore;

// Repository re-exports for convenience
pub use repository::client::ClientRepository;
pub use repository::product::ProductRepository;
pub use repository::quote::QuoteRepository;
