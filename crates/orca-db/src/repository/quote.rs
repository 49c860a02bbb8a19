//! # Quote Repository
//!
//! Quote headers, their line items, the print counter and the report query.
//!
//! ## Two-Table Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert_header(&NewQuote) ──► orcamentos        (one row, id returned) │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  insert_items(&[NewQuoteItem]) ──► orcamento_itens (ONE statement)     │
//! │        │                                                                │
//! │        ✗ failure                                                        │
//! │        ▼                                                                │
//! │  delete(id) ──► orcamentos row gone, items cascade                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The steps are separate statements on purpose; sequencing and the
//! compensating delete live in `saga`.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::records::{fold_report_rows, DetailItemRow, QuoteRow, ReportRow};
use orca_core::report::{ReportFilter, ReportQuote};
use orca_core::{DetailItem, NewQuote, NewQuoteItem, Quote, QuoteId};

/// Repository for `orcamentos` and `orcamento_itens`.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a quote header and returns the generated id.
    pub async fn insert_header(&self, quote: &NewQuote) -> DbResult<QuoteId> {
        debug!(
            client_id = %quote.client_id,
            net_total = quote.net_total.cents(),
            "Inserting quote header"
        );

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orcamentos (
                cliente_id, created_at, observacoes, desconto, valor_total, valor_bruto
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(quote.client_id.get())
        .bind(quote.created_at)
        .bind(quote.notes.as_deref())
        .bind(quote.discount_percent)
        .bind(quote.net_total.cents())
        .bind(quote.gross_total.cents())
        .fetch_one(&self.pool)
        .await?;

        Ok(QuoteId(id))
    }

    /// Inserts all line item rows in one multi-row statement.
    ///
    /// Either every row is written or none is. Returns the row count.
    pub async fn insert_items(&self, items: &[NewQuoteItem]) -> DbResult<u64> {
        if items.is_empty() {
            return Ok(0);
        }

        debug!(count = items.len(), "Inserting quote items");

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO orcamento_itens (orcamento_id, produto_id, quantidade, valor_unitario) ",
        );
        builder.push_values(items, |mut row, item| {
            row.push_bind(item.quote_id.get())
                .push_bind(item.product_id.get())
                .push_bind(item.quantity)
                .push_bind(item.unit_price.cents());
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Deletes a quote header; its items go with it.
    ///
    /// ## Returns
    /// * `Ok(true)` - Row deleted
    /// * `Ok(false)` - No such quote
    pub async fn delete(&self, id: QuoteId) -> DbResult<bool> {
        debug!(quote_id = %id, "Deleting quote");

        let result = sqlx::query("DELETE FROM orcamentos WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a quote header by id.
    pub async fn get(&self, id: QuoteId) -> DbResult<Option<Quote>> {
        let row: Option<QuoteRow> = sqlx::query_as(
            r#"
            SELECT id, cliente_id, created_at, observacoes, desconto,
                   valor_total, valor_bruto, print_count
            FROM orcamentos
            WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Quote::from))
    }

    /// Line items of a quote with product names, in insertion order.
    pub async fn items(&self, id: QuoteId) -> DbResult<Vec<DetailItem>> {
        let rows: Vec<DetailItemRow> = sqlx::query_as(
            r#"
            SELECT i.produto_id, p.nome AS produto_nome, i.quantidade, i.valor_unitario
            FROM orcamento_itens i
            JOIN produtos p ON p.id = i.produto_id
            WHERE i.orcamento_id = ?1
            ORDER BY i.id
            "#,
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DetailItem::from).collect())
    }

    /// Number of line items stored for a quote.
    pub async fn item_count(&self, id: QuoteId) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orcamento_itens WHERE orcamento_id = ?1")
                .bind(id.get())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Total number of quote headers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orcamentos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Print counter
    // =========================================================================

    /// Adds one to the print counter in a single statement and returns the
    /// new value. A NULL counter counts as zero.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No such quote
    pub async fn increment_print_count(&self, id: QuoteId) -> DbResult<i64> {
        debug!(quote_id = %id, "Incrementing print count");

        let count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE orcamentos
            SET print_count = COALESCE(print_count, 0) + 1
            WHERE id = ?1
            RETURNING print_count
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        count.ok_or_else(|| DbError::not_found("Quote", id))
    }

    // =========================================================================
    // Report query
    // =========================================================================

    /// Quotes matching `filter` with client and items, oldest first.
    ///
    /// ## Query Shape
    /// One flattened row per (quote, item); quotes without items yield one
    /// row with NULL item columns. A product group filter is a WHERE on the
    /// joined product, so quotes without a matching item drop out and only
    /// matching items are kept.
    pub async fn report(&self, filter: &ReportFilter) -> DbResult<Vec<ReportQuote>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT o.id AS orcamento_id, o.created_at, o.valor_total, o.desconto,
                   c.id AS cliente_id, c.nome AS cliente_nome,
                   i.produto_id, p.nome AS produto_nome, i.quantidade,
                   g.id AS grupo_id, g.nome AS grupo_nome
            FROM orcamentos o
            JOIN clientes c ON c.id = o.cliente_id
            LEFT JOIN orcamento_itens i ON i.orcamento_id = o.id
            LEFT JOIN produtos p ON p.id = i.produto_id
            LEFT JOIN grupos_produtos g ON g.id = p.grupo_id
            WHERE 1 = 1
            "#,
        );

        let (from, until) = filter.time_range();
        if let Some(from) = from {
            builder.push(" AND o.created_at >= ").push_bind(from);
        }
        if let Some(until) = until {
            builder.push(" AND o.created_at < ").push_bind(until);
        }
        if let Some(client_id) = filter.client_id {
            builder.push(" AND o.cliente_id = ").push_bind(client_id.get());
        }
        if let Some(group_id) = filter.product_group_id {
            builder.push(" AND p.grupo_id = ").push_bind(group_id.get());
        }
        builder.push(" ORDER BY o.created_at, o.id, i.id");

        let rows: Vec<ReportRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), ?filter, "Report query returned rows");

        Ok(fold_report_rows(rows))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
