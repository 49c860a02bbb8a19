//! # Domain Types
//!
//! Core domain types used throughout Orca.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Client      │   │      Quote      │   │  QuoteLineItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  client_id      │◄──│  quote_id       │       │
//! │  │  name           │   │  created_at     │   │  product_id ────┼──┐    │
//! │  │  email / phone  │   │  discount %     │   │  quantity       │  │    │
//! │  └─────────────────┘   │  net_total      │   │  unit_price     │  │    │
//! │                        └─────────────────┘   └─────────────────┘  │    │
//! │  ┌─────────────────┐   ┌─────────────────┐                        │    │
//! │  │  ProductGroup   │◄──│     Product     │◄───────────────────────┘    │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity id is assigned by storage (integer primary keys) and wrapped
//! in a newtype so a client id can never be passed where a product id is
//! expected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[serde(transparent)]
        #[ts(export)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw storage key.
            #[inline]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                $name(raw)
            }
        }
    };
}

entity_id!(
    /// Identifier of a client (`clientes.id`).
    ClientId
);
entity_id!(
    /// Identifier of a product (`produtos.id`).
    ProductId
);
entity_id!(
    /// Identifier of a product group (`grupos_produtos.id`).
    ProductGroupId
);
entity_id!(
    /// Identifier of a stored quote (`orcamentos.id`).
    QuoteId
);

// =============================================================================
// Client
// =============================================================================

/// A customer that quotes are addressed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Product Group
// =============================================================================

/// A categorization of products used for report grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductGroup {
    pub id: ProductGroupId,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be added to a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Current list price. Quotes snapshot it when the line is added.
    pub price: Money,
    pub group_id: Option<ProductGroupId>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One product line of a quote being composed.
///
/// ## Snapshot Pattern
/// `name` and `unit_price` are frozen when the product is added; later
/// price changes in the catalogue do not touch an open draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// Always `quantity × unit_price`.
    pub subtotal: Money,
}

impl LineItem {
    /// Creates a line with quantity 1 from the current product data.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            product_id: product.id,
            name: product.name.clone(),
            quantity: 1,
            unit_price: product.price,
            subtotal: product.price,
        }
    }

    /// Sets the quantity and recomputes the subtotal.
    ///
    /// Callers validate the quantity first.
    pub(crate) fn apply_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.subtotal = self.unit_price.multiply_quantity(quantity);
    }
}

// =============================================================================
// Persisted Quote
// =============================================================================

/// Header row to be written to `orcamentos`.
///
/// The discount is persisted as a percentage only; its entry mode is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuote {
    pub client_id: ClientId,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    /// Percentage in `[0, 100]`.
    pub discount_percent: f64,
    pub net_total: Money,
    pub gross_total: Money,
}

/// Row to be written to `orcamento_itens`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuoteItem {
    pub quote_id: QuoteId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
}

/// A stored quote header.
///
/// `gross_total` and `print_count` only exist in the second schema variant;
/// they are `None` when the column is absent or NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    pub id: QuoteId,
    pub client_id: ClientId,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub discount_percent: f64,
    pub net_total: Money,
    pub gross_total: Option<Money>,
    pub print_count: Option<i64>,
}

// =============================================================================
// Quote Details (read model for the details page)
// =============================================================================

/// A stored line item joined with its product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DetailItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

impl DetailItem {
    /// Builds a detail line; the subtotal is derived, never read from storage.
    pub fn new(product_id: ProductId, product_name: String, quantity: i64, unit_price: Money) -> Self {
        DetailItem {
            product_id,
            product_name,
            quantity,
            unit_price,
            subtotal: unit_price.multiply_quantity(quantity),
        }
    }
}

/// Everything the quote details page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteDetails {
    pub id: QuoteId,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub client: Client,
    pub items: Vec<DetailItem>,
    /// Stored gross total, or the sum of item subtotals when not stored.
    pub gross_total: Money,
    pub discount_percent: f64,
    pub has_discount: bool,
    pub net_total: Money,
    pub print_count: Option<i64>,
}

impl QuoteDetails {
    /// Assembles the details view, applying the gross total fallback.
    pub fn from_parts(quote: Quote, client: Client, items: Vec<DetailItem>) -> Self {
        let gross_total = quote
            .gross_total
            .unwrap_or_else(|| items.iter().map(|i| i.subtotal).sum());

        QuoteDetails {
            id: quote.id,
            created_at: quote.created_at,
            notes: quote.notes,
            client,
            items,
            gross_total,
            discount_percent: quote.discount_percent,
            has_discount: quote.discount_percent > 0.0,
            net_total: quote.net_total,
            print_count: quote.print_count,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(id: i64, price_cents: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Produto {}", id),
            price: Money::from_cents(price_cents),
            group_id: None,
        }
    }

    fn stored_quote(gross_total: Option<Money>) -> Quote {
        Quote {
            id: QuoteId(12),
            client_id: ClientId(3),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            notes: None,
            discount_percent: 10.0,
            net_total: Money::from_cents(22500),
            gross_total,
            print_count: None,
        }
    }

    fn client() -> Client {
        Client {
            id: ClientId(3),
            name: "Maria".to_string(),
            email: None,
            phone: Some("11 5555-0000".to_string()),
        }
    }

    #[test]
    fn test_line_item_snapshots_product() {
        let mut p = product(1, 1999);
        let item = LineItem::from_product(&p);

        p.price = Money::from_cents(2999);

        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price.cents(), 1999);
        assert_eq!(item.subtotal.cents(), 1999);
    }

    #[test]
    fn test_line_item_quantity_recomputes_subtotal() {
        let mut item = LineItem::from_product(&product(1, 250));
        item.apply_quantity(4);
        assert_eq!(item.subtotal.cents(), 1000);
    }

    #[test]
    fn test_details_recomputes_missing_gross() {
        let items = vec![
            DetailItem::new(ProductId(1), "A".into(), 2, Money::from_cents(10000)),
            DetailItem::new(ProductId(2), "B".into(), 1, Money::from_cents(5000)),
        ];
        let details = QuoteDetails::from_parts(stored_quote(None), client(), items);

        assert_eq!(details.gross_total.cents(), 25000);
        assert!(details.has_discount);
    }

    #[test]
    fn test_details_prefers_stored_gross() {
        let details = QuoteDetails::from_parts(
            stored_quote(Some(Money::from_cents(26000))),
            client(),
            Vec::new(),
        );
        assert_eq!(details.gross_total.cents(), 26000);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&QuoteId(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(QuoteId::from(42).to_string(), "42");
    }
}
