//! # Quote Submission Saga
//!
//! Writes a quote as two dependent inserts with a compensating delete. The
//! store offers no multi-statement transaction to the caller, so consistency
//! is kept by ordering and compensation instead.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  prepare_submission ── EmptyQuote / MissingClient / ... ──► Invalid    │
//! │        │  (no store call yet)                                           │
//! │        ▼                                                                │
//! │  create_header ─────── failure ──────────────────► HeaderInsertFailed  │
//! │        │  id                                                            │
//! │        ▼                                                                │
//! │  create_items ──────── failure ──┐                                      │
//! │        │                         ▼                                      │
//! │        │                   compensate(id)   (outcome only logged)       │
//! │        │                         │                                      │
//! │        │                         └───────────────► ItemsInsertFailed   │
//! │        ▼                                                                │
//! │     Ok(id)                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Items are never written before the header insert has returned.
//! - Items never reference a missing header.
//! - A header with zero items may remain if the compensating delete fails.
//!   The error returned is still `ItemsInsertFailed`.
//! - Nothing is retried.

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::error::DbError;
use crate::store::QuoteStore;
use orca_core::{prepare_submission, CoreError, LineItem, NewQuote, NewQuoteItem, QuoteHeaderInput, QuoteId};

// =============================================================================
// Errors
// =============================================================================

/// Why a submission failed, naming the failed step.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Rejected before any store call.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// The header insert failed; nothing was written.
    #[error("Failed to save quote: {0}")]
    HeaderInsertFailed(String),

    /// The items insert failed after the header was written.
    #[error("Failed to save quote items: {0}")]
    ItemsInsertFailed(String),

    /// Another submission is still running.
    #[error("A quote submission is already in progress")]
    AlreadyInFlight,
}

impl SubmitError {
    /// Returns true when no store call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::Invalid(_) | SubmitError::AlreadyInFlight)
    }
}

// =============================================================================
// Saga
// =============================================================================

/// Validates, then writes header and items, compensating on item failure.
pub async fn submit_quote<S>(
    store: &S,
    header: &QuoteHeaderInput,
    items: &[LineItem],
) -> Result<QuoteId, SubmitError>
where
    S: QuoteStore + ?Sized,
{
    let prepared = prepare_submission(header, items)?;

    let quote_id = create_header(store, &prepared.header).await?;

    if let Err(err) = create_items(store, &prepared.item_rows(quote_id)).await {
        compensate(store, quote_id).await;
        return Err(SubmitError::ItemsInsertFailed(err.to_string()));
    }

    info!(
        quote_id = %quote_id,
        items = prepared.items.len(),
        net_total = prepared.totals.net_total.cents(),
        "Quote saved"
    );
    Ok(quote_id)
}

/// Step 1: writes the header row.
async fn create_header<S>(store: &S, header: &NewQuote) -> Result<QuoteId, SubmitError>
where
    S: QuoteStore + ?Sized,
{
    store.insert_header(header).await.map_err(|err| {
        error!(error = %err, client_id = %header.client_id, "Quote header insert failed");
        SubmitError::HeaderInsertFailed(err.to_string())
    })
}

/// Step 2: writes every item row in one call.
async fn create_items<S>(store: &S, rows: &[NewQuoteItem]) -> Result<(), DbError>
where
    S: QuoteStore + ?Sized,
{
    debug!(count = rows.len(), "Writing quote items");
    store.insert_items(rows).await
}

/// Compensation: best-effort delete of the header written in step 1.
async fn compensate<S>(store: &S, quote_id: QuoteId)
where
    S: QuoteStore + ?Sized,
{
    warn!(quote_id = %quote_id, "Items insert failed, deleting quote header");

    match store.delete_quote(quote_id).await {
        Ok(()) => debug!(quote_id = %quote_id, "Compensating delete succeeded"),
        Err(err) => error!(
            quote_id = %quote_id,
            error = %err,
            "Compensating delete failed, quote header left without items"
        ),
    }
}

// =============================================================================
// In-flight gate
// =============================================================================

/// Rejects a submission while another one is running.
///
/// A disabled gate lets every call through.
#[derive(Debug)]
pub struct SubmitGate {
    lock: Mutex<()>,
    enabled: bool,
}

/// Held for the duration of one submission.
#[derive(Debug)]
pub struct SubmitPermit<'a> {
    _guard: Option<MutexGuard<'a, ()>>,
}

impl SubmitGate {
    pub fn new(enabled: bool) -> Self {
        SubmitGate {
            lock: Mutex::new(()),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Takes the gate without waiting.
    ///
    /// ## Errors
    /// * `SubmitError::AlreadyInFlight` - a permit is currently held
    pub fn try_enter(&self) -> Result<SubmitPermit<'_>, SubmitError> {
        if !self.enabled {
            return Ok(SubmitPermit { _guard: None });
        }

        let guard = self.lock.try_lock().map_err(|_| SubmitError::AlreadyInFlight)?;
        Ok(SubmitPermit {
            _guard: Some(guard),
        })
    }
}

impl Default for SubmitGate {
    fn default() -> Self {
        SubmitGate::new(true)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rejects_second_entry() {
        let gate = SubmitGate::new(true);

        let permit = gate.try_enter().unwrap();
        assert!(matches!(gate.try_enter(), Err(SubmitError::AlreadyInFlight)));

        drop(permit);
        assert!(gate.try_enter().is_ok());
    }

    #[test]
    fn test_disabled_gate_allows_overlap() {
        let gate = SubmitGate::new(false);

        let _first = gate.try_enter().unwrap();
        assert!(gate.try_enter().is_ok());
    }

    #[test]
    fn test_error_messages_name_the_step() {
        let err = SubmitError::ItemsInsertFailed("disk full".to_string());
        assert_eq!(err.to_string(), "Failed to save quote items: disk full");

        let err = SubmitError::from(CoreError::EmptyQuote);
        assert!(err.is_validation());
    }
}
