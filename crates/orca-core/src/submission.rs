//! # Submission Preparation
//!
//! The synchronous half of saving a quote: validate the form, compute the
//! totals and build the rows the storage layer writes. Nothing here performs
//! I/O, so every rejection happens before a single network call.
//!
//! ## Validation Order
//! 1. `EmptyQuote` - no line items
//! 2. `MissingClient` - no client chosen
//! 3. `InvalidQuantity` / `DuplicateItem` / price range - malformed lines
//! 4. notes length
//!
//! Line subtotals are recomputed from quantity and unit price; whatever
//! subtotal the caller sent is ignored.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::pricing::{compute_totals, DiscountSpec, QuoteTotals};
use crate::types::{ClientId, LineItem, NewQuote, NewQuoteItem, QuoteId};
use crate::validation::{normalize_notes, validate_price, validate_quantity};

/// Header fields of the quote form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteHeaderInput {
    pub client_id: Option<ClientId>,
    pub created_at: NaiveDate,
    pub notes: Option<String>,
    pub discount: DiscountSpec,
}

/// A validated quote, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuote {
    pub header: NewQuote,
    pub items: Vec<LineItem>,
    pub totals: QuoteTotals,
}

impl PreparedQuote {
    /// Builds the `orcamento_itens` rows once the header id is known.
    pub fn item_rows(&self, quote_id: QuoteId) -> Vec<NewQuoteItem> {
        self.items
            .iter()
            .map(|item| NewQuoteItem {
                quote_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect()
    }
}

/// The stored timestamp of a quote dated `date` (midnight UTC).
pub fn quote_timestamp(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Validates the header and items and computes the rows to persist.
pub fn prepare_submission(header: &QuoteHeaderInput, items: &[LineItem]) -> CoreResult<PreparedQuote> {
    if items.is_empty() {
        return Err(CoreError::EmptyQuote);
    }

    let client_id = header.client_id.ok_or(CoreError::MissingClient)?;

    let mut seen = HashSet::with_capacity(items.len());
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 {
            return Err(CoreError::InvalidQuantity {
                quantity: item.quantity,
            });
        }
        validate_quantity(item.quantity)?;
        validate_price(item.unit_price)?;

        if !seen.insert(item.product_id) {
            return Err(CoreError::DuplicateItem {
                product_id: item.product_id,
            });
        }

        let mut line = item.clone();
        line.apply_quantity(item.quantity);
        lines.push(line);
    }

    let notes = normalize_notes(header.notes.as_deref())?;
    let totals = compute_totals(&lines, &header.discount);

    Ok(PreparedQuote {
        header: NewQuote {
            client_id,
            created_at: quote_timestamp(header.created_at),
            notes,
            discount_percent: totals.discount_percent_equivalent,
            net_total: totals.net_total,
            gross_total: totals.gross_total,
        },
        items: lines,
        totals,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
