//! Shared test doubles and fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use orca_core::{
    ClientId, DiscountSpec, LineItem, Money, NewQuote, NewQuoteItem, ProductId, QuoteHeaderInput,
    QuoteId,
};
use orca_db::{DbError, DbResult, QuoteStore};

/// One call made against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    InsertHeader(NewQuote),
    InsertItems(Vec<NewQuoteItem>),
    DeleteQuote(QuoteId),
}

/// Pauses `insert_header` until released.
#[derive(Debug, Default)]
pub struct HeaderHold {
    pub reached: Notify,
    pub release: Notify,
}

/// Records every call and fails the steps it is told to fail.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub(crate) calls: Mutex<Vec<Call>>,
    pub fail_header: bool,
    pub fail_items: bool,
    pub fail_delete: bool,
    pub hold: Option<Arc<HeaderHold>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_items() -> Self {
        RecordingStore {
            fail_items: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<QuoteId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteQuote(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl QuoteStore for RecordingStore {
    async fn insert_header(&self, quote: &NewQuote) -> DbResult<QuoteId> {
        self.record(Call::InsertHeader(quote.clone()));

        if let Some(hold) = &self.hold {
            hold.reached.notify_one();
            hold.release.notified().await;
        }

        if self.fail_header {
            return Err(DbError::QueryFailed("header rejected".to_string()));
        }
        Ok(QuoteId(41))
    }

    async fn insert_items(&self, items: &[NewQuoteItem]) -> DbResult<()> {
        self.record(Call::InsertItems(items.to_vec()));

        if self.fail_items {
            return Err(DbError::QueryFailed("items rejected".to_string()));
        }
        Ok(())
    }

    async fn delete_quote(&self, id: QuoteId) -> DbResult<()> {
        self.record(Call::DeleteQuote(id));

        if self.fail_delete {
            return Err(DbError::ConnectionFailed("network down".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn header(client: Option<ClientId>, discount: DiscountSpec) -> QuoteHeaderInput {
    QuoteHeaderInput {
        client_id: client,
        created_at: date(2026, 6, 1),
        notes: None,
        discount,
    }
}

pub fn line(product: i64, quantity: i64, price_cents: i64) -> LineItem {
    let unit_price = Money::from_cents(price_cents);
    LineItem {
        product_id: ProductId(product),
        name: format!("Produto {}", product),
        quantity,
        unit_price,
        subtotal: unit_price.multiply_quantity(quantity),
    }
}
