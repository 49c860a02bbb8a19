//! # orca-core: Pure Business Logic for Orca Quotes
//!
//! This crate holds the quote pricing rules, submission preparation and
//! report aggregation as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orca Quotes Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Forms / Views                                │   │
//! │  │    New Quote ──► Quote Details ──► Print ──► Reports            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ orca-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │ submission │  │  report   │  │   │
//! │  │   │   Quote   │  │ Discount  │  │ Prepared   │  │ aggregate │  │   │
//! │  │   │  Product  │  │  Totals   │  │  Quote     │  │ GroupKey  │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    orca-db (Storage Layer)                      │   │
//! │  │        SQLite repositories, submit saga, QuoteService           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Product, Quote, QuoteDetails)
//! - [`money`] - Money type in integer cents
//! - [`pricing`] - Line items, discount clamping and totals
//! - [`draft`] - The "new quote" form state
//! - [`submission`] - Validation and row building before persistence
//! - [`report`] - Grouping and totals for reports
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use orca_core::money::Money;
//! use orca_core::pricing::{compute_totals, DiscountSpec};
//! use orca_core::types::{LineItem, Product, ProductId};
//!
//! let product = Product {
//!     id: ProductId(1),
//!     name: "Caneta".to_string(),
//!     price: Money::from_cents(10000),
//!     group_id: None,
//! };
//! let mut line = LineItem::from_product(&product);
//! line.quantity = 2;
//! line.subtotal = line.unit_price.multiply_quantity(2);
//!
//! // 10% discount, expressed in basis points
//! let totals = compute_totals(&[line], &DiscountSpec::percent_bps(1000));
//! assert_eq!(totals.net_total.cents(), 18000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod pricing;
pub mod report;
pub mod submission;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::QuoteDraft;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{ClampOutcome, DiscountMode, DiscountSpec, QuoteTotals};
pub use report::{GroupKey, ReportFilter, ReportModel};
pub use submission::{prepare_submission, PreparedQuote, QuoteHeaderInput};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products in a single quote.
pub const MAX_QUOTE_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches typos such as 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of the notes field, in characters.
pub const MAX_NOTES_LEN: usize = 2000;

/// Maximum unit price, in cents (R$ 1.000.000.000,00).
///
/// With `MAX_ITEM_QUANTITY` and `MAX_QUOTE_ITEMS` the gross total stays far
/// below `i64::MAX`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000_000;
