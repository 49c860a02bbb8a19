//! # Row Mapping
//!
//! Row structs for each query shape and their conversion into core types.
//! Column names follow the schema (`nome`, `preco`, ...); nothing outside
//! this module sees them.
//!
//! ## Optional Columns
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Column                  Since   Absent / NULL means                    │
//! │  ──────                  ─────   ───────────────────                    │
//! │  orcamentos.valor_bruto  0002    gross = Σ item subtotals               │
//! │  orcamentos.print_count  0002    never printed (0)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The fallbacks are applied in exactly one place each:
//! `QuoteDetails::from_parts` for the gross total and the `COALESCE` in
//! `QuoteRepository::increment_print_count` for the counter.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use orca_core::report::{ClientRef, ReportItem, ReportQuote};
use orca_core::{
    Client, ClientId, DetailItem, Money, Product, ProductGroup, ProductGroupId, ProductId, Quote,
    QuoteId,
};

/// `clientes` row.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: i64,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: ClientId(row.id),
            name: row.nome,
            email: row.email,
            phone: row.telefone,
        }
    }
}

/// `grupos_produtos` row.
#[derive(Debug, Clone, FromRow)]
pub struct ProductGroupRow {
    pub id: i64,
    pub nome: String,
}

impl From<ProductGroupRow> for ProductGroup {
    fn from(row: ProductGroupRow) -> Self {
        ProductGroup {
            id: ProductGroupId(row.id),
            name: row.nome,
        }
    }
}

/// `produtos` row.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub nome: String,
    pub preco: i64,
    pub grupo_id: Option<i64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            name: row.nome,
            price: Money::from_cents(row.preco),
            group_id: row.grupo_id.map(ProductGroupId),
        }
    }
}

/// `orcamentos` row, including the optional 0002 columns.
#[derive(Debug, Clone, FromRow)]
pub struct QuoteRow {
    pub id: i64,
    pub cliente_id: i64,
    pub created_at: DateTime<Utc>,
    pub observacoes: Option<String>,
    pub desconto: f64,
    pub valor_total: i64,
    pub valor_bruto: Option<i64>,
    pub print_count: Option<i64>,
}

impl From<QuoteRow> for Quote {
    fn from(row: QuoteRow) -> Self {
        Quote {
            id: QuoteId(row.id),
            client_id: ClientId(row.cliente_id),
            created_at: row.created_at,
            notes: row.observacoes,
            discount_percent: row.desconto,
            net_total: Money::from_cents(row.valor_total),
            gross_total: row.valor_bruto.map(Money::from_cents),
            print_count: row.print_count,
        }
    }
}

/// `orcamento_itens` joined with `produtos.nome`.
#[derive(Debug, Clone, FromRow)]
pub struct DetailItemRow {
    pub produto_id: i64,
    pub produto_nome: String,
    pub quantidade: i64,
    pub valor_unitario: i64,
}

impl From<DetailItemRow> for DetailItem {
    fn from(row: DetailItemRow) -> Self {
        DetailItem::new(
            ProductId(row.produto_id),
            row.produto_nome,
            row.quantidade,
            Money::from_cents(row.valor_unitario),
        )
    }
}

// =============================================================================
// Report rows
// =============================================================================

/// One row of the flattened report query: a quote with at most one item.
///
/// The item columns are NULL for a quote without items.
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub orcamento_id: i64,
    pub created_at: DateTime<Utc>,
    pub valor_total: i64,
    pub desconto: f64,
    pub cliente_id: i64,
    pub cliente_nome: String,
    pub produto_id: Option<i64>,
    pub produto_nome: Option<String>,
    pub quantidade: Option<i64>,
    pub grupo_id: Option<i64>,
    pub grupo_nome: Option<String>,
}

impl ReportRow {
    fn header(&self) -> ReportQuote {
        ReportQuote {
            id: QuoteId(self.orcamento_id),
            created_at: self.created_at,
            net_total: Money::from_cents(self.valor_total),
            discount_percent: self.desconto,
            client: ClientRef {
                id: ClientId(self.cliente_id),
                name: self.cliente_nome.clone(),
            },
            items: Vec::new(),
        }
    }

    fn item(self) -> Option<ReportItem> {
        let product_id = self.produto_id?;
        let group = match (self.grupo_id, self.grupo_nome) {
            (Some(id), Some(name)) => Some(ProductGroup {
                id: ProductGroupId(id),
                name,
            }),
            _ => None,
        };

        Some(ReportItem {
            quantity: self.quantidade.unwrap_or(0),
            product_id: ProductId(product_id),
            product_name: self.produto_nome.unwrap_or_default(),
            group,
        })
    }
}

/// Folds rows ordered by quote into quotes with their items.
///
/// Rows of one quote must be adjacent; the query orders by quote first.
pub fn fold_report_rows(rows: Vec<ReportRow>) -> Vec<ReportQuote> {
    let mut quotes: Vec<ReportQuote> = Vec::new();

    for row in rows {
        let same_quote = quotes
            .last()
            .is_some_and(|q| q.id == QuoteId(row.orcamento_id));
        if !same_quote {
            quotes.push(row.header());
        }

        if let (Some(item), Some(quote)) = (row.item(), quotes.last_mut()) {
            quote.items.push(item);
        }
    }

    quotes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(quote: i64, product: Option<i64>, group: Option<i64>) -> ReportRow {
        ReportRow {
            orcamento_id: quote,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            valor_total: 1000,
            desconto: 0.0,
            cliente_id: 1,
            cliente_nome: "Ana".to_string(),
            produto_id: product,
            produto_nome: product.map(|p| format!("P{}", p)),
            quantidade: product.map(|_| 2),
            grupo_id: group,
            grupo_nome: group.map(|g| format!("G{}", g)),
        }
    }

    #[test]
    fn test_fold_groups_adjacent_rows() {
        let quotes = fold_report_rows(vec![
            row(1, Some(10), Some(1)),
            row(1, Some(11), None),
            row(2, None, None),
        ]);

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].items.len(), 2);
        assert_eq!(quotes[0].items[0].group.as_ref().map(|g| g.name.as_str()), Some("G1"));
        assert!(quotes[0].items[1].group.is_none());
        assert!(quotes[1].items.is_empty());
    }

    #[test]
    fn test_quote_row_optional_columns() {
        let quote: Quote = QuoteRow {
            id: 3,
            cliente_id: 1,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            observacoes: None,
            desconto: 0.0,
            valor_total: 500,
            valor_bruto: None,
            print_count: None,
        }
        .into();

        assert_eq!(quote.gross_total, None);
        assert_eq!(quote.print_count, None);
    }
}
