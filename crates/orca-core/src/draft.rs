//! # Quote Draft
//!
//! The state of the "new quote" form as an explicit object: chosen client,
//! date, notes, line items and discount. Every pricing operation goes
//! through it, so the whole flow is testable without a browser.
//!
//! ## Form Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form Action              Draft Operation            State Change       │
//! │  ───────────              ───────────────            ────────────       │
//! │  Pick product + "Add" ──► add_item(&product) ──────► items.push(line)   │
//! │  Edit quantity ─────────► set_quantity(id, n) ─────► line.qty = n       │
//! │  Click trash ───────────► remove_item(id) ─────────► items.retain(..)   │
//! │  Type discount ─────────► set_discount(spec) ──────► discount = clamped │
//! │  Toggle % / R$ ─────────► switch_discount_mode(m) ─► discount re-clamped│
//! │  Submit ────────────────► prepare() ───────────────► PreparedQuote      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::pricing::{self, clamp_discount, ClampOutcome, DiscountMode, DiscountSpec, QuoteTotals};
use crate::submission::{prepare_submission, PreparedQuote, QuoteHeaderInput};
use crate::types::{ClientId, LineItem, Product, ProductId};

/// A quote being composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    client_id: Option<ClientId>,
    created_at: NaiveDate,
    notes: Option<String>,
    items: Vec<LineItem>,
    discount: DiscountSpec,
}

impl QuoteDraft {
    /// Creates an empty draft dated `created_at`.
    pub fn new(created_at: NaiveDate) -> Self {
        QuoteDraft {
            client_id: None,
            created_at,
            notes: None,
            items: Vec::new(),
            discount: DiscountSpec::none(),
        }
    }

    /// Builder: sets the client.
    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Builder: sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn set_client(&mut self, client_id: Option<ClientId>) {
        self.client_id = client_id;
    }

    pub fn set_date(&mut self, created_at: NaiveDate) {
        self.created_at = created_at;
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    pub fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn discount(&self) -> DiscountSpec {
        self.discount
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `product` with quantity 1 and returns the new line.
    pub fn add_item(&mut self, product: &Product) -> CoreResult<&LineItem> {
        pricing::add_item(&mut self.items, product)?;
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Changes the quantity of a line.
    pub fn set_quantity(&mut self, product_id: ProductId, qty: i64) -> CoreResult<()> {
        pricing::set_quantity(&mut self.items, product_id, qty)
    }

    /// Removes a line; absent ids are ignored.
    pub fn remove_item(&mut self, product_id: ProductId) {
        pricing::remove_item(&mut self.items, product_id);
    }

    /// Stores the discount clamped against the current gross total.
    ///
    /// The caller overwrites the discount input when the outcome says so.
    pub fn set_discount(&mut self, spec: DiscountSpec) -> ClampOutcome {
        let outcome = clamp_discount(&spec, pricing::gross_total(&self.items));
        self.discount = DiscountSpec {
            mode: spec.mode,
            raw_value: outcome.clamped_display_value,
        };
        outcome
    }

    /// Switches the discount mode, keeping the number in the input.
    ///
    /// The old value is re-read in the new unit and clamped again, so 50 (%)
    /// switched to absolute on a R$ 30,00 quote becomes R$ 30,00.
    pub fn switch_discount_mode(&mut self, mode: DiscountMode) -> ClampOutcome {
        self.set_discount(DiscountSpec {
            mode,
            raw_value: self.discount.raw_value,
        })
    }

    /// Current totals.
    pub fn totals(&self) -> QuoteTotals {
        pricing::compute_totals(&self.items, &self.discount)
    }

    /// Header fields as submitted by the form.
    pub fn header(&self) -> QuoteHeaderInput {
        QuoteHeaderInput {
            client_id: self.client_id,
            created_at: self.created_at,
            notes: self.notes.clone(),
            discount: self.discount,
        }
    }

    /// Validates the draft and builds the rows to persist.
    pub fn prepare(&self) -> CoreResult<PreparedQuote> {
        prepare_submission(&self.header(), &self.items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn product(id: i64, price_cents: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Produto {}", id),
            price: Money::from_cents(price_cents),
            group_id: None,
        }
    }

    #[test]
    fn test_draft_flow() {
        let mut draft = QuoteDraft::new(date()).with_client(ClientId(1));

        let line = draft.add_item(&product(1, 10000)).unwrap();
        assert_eq!(line.subtotal.cents(), 10000);
        draft.add_item(&product(2, 5000)).unwrap();
        draft.set_quantity(ProductId(1), 2).unwrap();

        let outcome = draft.set_discount(DiscountSpec::percent_bps(1000));
        assert!(!outcome.was_clamped);

        let totals = draft.totals();
        assert_eq!(totals.gross_total.cents(), 25000);
        assert_eq!(totals.net_total.cents(), 22500);
    }

    #[test]
    fn test_duplicate_add_keeps_single_line() {
        let mut draft = QuoteDraft::new(date());
        let p = product(1, 100);

        draft.add_item(&p).unwrap();
        assert!(matches!(
            draft.add_item(&p),
            Err(CoreError::DuplicateItem { .. })
        ));
        assert_eq!(draft.items().len(), 1);
    }

    #[test]
    fn test_set_discount_stores_clamped_value() {
        let mut draft = QuoteDraft::new(date());
        draft.add_item(&product(1, 25000)).unwrap();

        let outcome = draft.set_discount(DiscountSpec::absolute(Money::from_cents(30000)));

        assert!(outcome.was_clamped);
        assert_eq!(outcome.clamped_display_value, 25000);
        assert_eq!(draft.discount().raw_value, 25000);
        assert_eq!(draft.totals().net_total, Money::zero());
    }

    #[test]
    fn test_mode_switch_reclamps_stale_input() {
        let mut draft = QuoteDraft::new(date());
        draft.add_item(&product(1, 3000)).unwrap();

        // 50% entered as 5000 bps
        draft.set_discount(DiscountSpec::percent_bps(5000));
        let outcome = draft.switch_discount_mode(DiscountMode::Absolute);

        // 5000 cents > 3000 cents gross
        assert!(outcome.was_clamped);
        assert_eq!(outcome.clamped_display_value, 3000);
        assert_eq!(draft.totals().net_total, Money::zero());
    }

    #[test]
    fn test_removing_items_keeps_net_non_negative() {
        let mut draft = QuoteDraft::new(date());
        draft.add_item(&product(1, 3000)).unwrap();
        draft.add_item(&product(2, 1000)).unwrap();
        draft.set_discount(DiscountSpec::absolute(Money::from_cents(3500)));

        draft.remove_item(ProductId(1));

        let totals = draft.totals();
        assert_eq!(totals.discount_amount.cents(), 1000);
        assert_eq!(totals.net_total, Money::zero());
    }

    #[test]
    fn test_prepare_requires_items_then_client() {
        let mut draft = QuoteDraft::new(date());
        assert_eq!(draft.prepare().unwrap_err(), CoreError::EmptyQuote);

        draft.add_item(&product(1, 100)).unwrap();
        assert_eq!(draft.prepare().unwrap_err(), CoreError::MissingClient);

        draft.set_client(Some(ClientId(5)));
        let prepared = draft.prepare().unwrap();
        assert_eq!(prepared.header.client_id, ClientId(5));
    }
}
