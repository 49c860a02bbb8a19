//! # Error Types
//!
//! Domain-specific error types for orca-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orca-core errors (this file)                                          │
//! │  ├── CoreError        - Draft and submission rule violations           │
//! │  └── ValidationError  - Field-level input validation failures          │
//! │                                                                         │
//! │  orca-db errors (separate crate)                                       │
//! │  ├── DbError          - Storage operation failures                     │
//! │  ├── SubmitError      - Quote submission protocol outcome              │
//! │  └── ServiceError     - Details / report / lookup failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SubmitError → notification        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is raised synchronously, before any storage call.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations while composing or submitting a quote.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The product is already a line of this quote.
    ///
    /// ## When This Occurs
    /// Adding a product a second time. The existing line is left untouched;
    /// the user changes its quantity instead.
    #[error("Product {product_id} is already in the quote")]
    DuplicateItem { product_id: ProductId },

    /// Quantity below 1.
    #[error("Invalid quantity {quantity}: must be at least 1")]
    InvalidQuantity { quantity: i64 },

    /// The product is not a line of this quote.
    #[error("Product {product_id} is not in the quote")]
    ItemNotFound { product_id: ProductId },

    /// Submission attempted with no line items.
    #[error("A quote needs at least one item")]
    EmptyQuote,

    /// Submission attempted without choosing a client.
    #[error("A quote needs a client")]
    MissingClient,

    /// Draft has reached the maximum number of distinct products.
    #[error("A quote cannot have more than {max} items")]
    TooManyItems { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
