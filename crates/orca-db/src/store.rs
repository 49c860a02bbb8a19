//! # Quote Store
//!
//! The write side of the data access surface, as seen by the submit saga.
//! `Database` implements it over SQLite; tests substitute recording or
//! failing doubles.

use async_trait::async_trait;

use crate::error::DbResult;
use crate::pool::Database;
use orca_core::{NewQuote, NewQuoteItem, QuoteId};

#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Writes one header row and returns its generated id.
    async fn insert_header(&self, quote: &NewQuote) -> DbResult<QuoteId>;

    /// Writes all item rows in one call.
    async fn insert_items(&self, items: &[NewQuoteItem]) -> DbResult<()>;

    /// Deletes a header row (and, through the schema, its items).
    async fn delete_quote(&self, id: QuoteId) -> DbResult<()>;
}

#[async_trait]
impl QuoteStore for Database {
    async fn insert_header(&self, quote: &NewQuote) -> DbResult<QuoteId> {
        self.quotes().insert_header(quote).await
    }

    async fn insert_items(&self, items: &[NewQuoteItem]) -> DbResult<()> {
        self.quotes().insert_items(items).await?;
        Ok(())
    }

    async fn delete_quote(&self, id: QuoteId) -> DbResult<()> {
        self.quotes().delete(id).await?;
        Ok(())
    }
}
