//! # Quote Service
//!
//! The operations the pages call: submit a quote, view it, record a print,
//! build a report, and fill the form selects.
//!
//! ## Page Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Page                 Operation                    Returns              │
//! │  ────                 ─────────                    ───────              │
//! │  New quote            list_clients, list_products  Vec<Client/Product>  │
//! │                       submit / submit_draft        QuoteId              │
//! │  Quote details        details                      QuoteDetails         │
//! │                       record_print                 Option<i64>          │
//! │  Reports              list_product_groups          Vec<ProductGroup>    │
//! │                       report                       ReportModel          │
//! │  Catalogue / seed     add_client, add_product ...  ids                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::OrcaConfig;
use crate::error::DbError;
use crate::pool::Database;
use crate::saga::{submit_quote, SubmitError, SubmitGate};
use orca_core::report::{aggregate, GroupKey, ReportFilter, ReportModel};
use orca_core::validation::{
    validate_client_name, validate_group_name, validate_price, validate_product_name,
};
use orca_core::{
    Client, ClientId, LineItem, Money, Product, ProductGroup, ProductGroupId, ProductId,
    QuoteDetails, QuoteDraft, QuoteHeaderInput, QuoteId, ValidationError,
};

/// Errors surfaced by [`QuoteService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// Returns true when the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Db(err) if err.is_not_found())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Quote operations over a [`Database`].
#[derive(Debug)]
pub struct QuoteService {
    db: Database,
    track_print_count: bool,
    gate: SubmitGate,
}

impl QuoteService {
    /// Creates a service using the feature flags of `config`.
    pub fn new(db: Database, config: &OrcaConfig) -> Self {
        QuoteService {
            db,
            track_print_count: config.track_print_count,
            gate: SubmitGate::new(config.guard_concurrent_submit),
        }
    }

    /// Returns the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Saves a quote (header, then items, compensating on item failure).
    ///
    /// ## Errors
    /// * `SubmitError::AlreadyInFlight` - another submit has not finished
    /// * `SubmitError::Invalid` - rejected before touching the database
    /// * `SubmitError::HeaderInsertFailed` / `ItemsInsertFailed` - named step failed
    pub async fn submit(
        &self,
        header: &QuoteHeaderInput,
        items: &[LineItem],
    ) -> Result<QuoteId, SubmitError> {
        let _permit = self.gate.try_enter()?;
        submit_quote(&self.db, header, items).await
    }

    /// Saves the current state of a draft.
    pub async fn submit_draft(&self, draft: &QuoteDraft) -> Result<QuoteId, SubmitError> {
        self.submit(&draft.header(), draft.items()).await
    }

    // =========================================================================
    // Details and printing
    // =========================================================================

    /// Loads everything the details page shows.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - unknown quote id
    pub async fn details(&self, id: QuoteId) -> ServiceResult<QuoteDetails> {
        debug!(quote_id = %id, "Loading quote details");

        let quote = self
            .db
            .quotes()
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Quote", id))?;

        let client = self
            .db
            .clients()
            .get(quote.client_id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", quote.client_id))?;

        let items = self.db.quotes().items(id).await?;

        Ok(QuoteDetails::from_parts(quote, client, items))
    }

    /// Counts one print of a quote when print tracking is enabled.
    ///
    /// Printing never fails because of the counter: errors are logged and
    /// yield `None`, as does a disabled counter.
    pub async fn record_print(&self, id: QuoteId) -> Option<i64> {
        if !self.track_print_count {
            return None;
        }

        match self.db.quotes().increment_print_count(id).await {
            Ok(count) => {
                debug!(quote_id = %id, count, "Print recorded");
                Some(count)
            }
            Err(err) => {
                warn!(quote_id = %id, error = %err, "Failed to update print count");
                None
            }
        }
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Runs the report query and groups the result.
    pub async fn report(&self, filter: &ReportFilter, group_by: GroupKey) -> ServiceResult<ReportModel> {
        let quotes = self.db.quotes().report(filter).await?;
        let model = aggregate(quotes, group_by);

        info!(
            quotes = model.quote_count,
            groups = model.groups.len(),
            group_by = %group_by,
            "Report generated"
        );
        Ok(model)
    }

    // =========================================================================
    // Form lookups
    // =========================================================================

    pub async fn list_clients(&self) -> ServiceResult<Vec<Client>> {
        Ok(self.db.clients().list().await?)
    }

    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list().await?)
    }

    pub async fn list_product_groups(&self) -> ServiceResult<Vec<ProductGroup>> {
        Ok(self.db.products().list_groups().await?)
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Adds a client after validating the name. Blank contacts are dropped.
    pub async fn add_client(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> ServiceResult<ClientId> {
        validate_client_name(name)?;
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        let phone = phone.map(str::trim).filter(|p| !p.is_empty());

        Ok(self.db.clients().insert(name.trim(), email, phone).await?)
    }

    /// Adds a product group after validating the name.
    pub async fn add_product_group(&self, name: &str) -> ServiceResult<ProductGroupId> {
        validate_group_name(name)?;
        Ok(self.db.products().insert_group(name.trim()).await?)
    }

    /// Adds a product after validating name and price.
    pub async fn add_product(
        &self,
        name: &str,
        price: Money,
        group_id: Option<ProductGroupId>,
    ) -> ServiceResult<ProductId> {
        validate_product_name(name)?;
        validate_price(price)?;
        Ok(self.db.products().insert(name.trim(), price, group_id).await?)
    }
}
