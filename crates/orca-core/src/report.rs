//! # Report Aggregation Engine
//!
//! Groups already-filtered quotes by a dimension and totals each group.
//!
//! ## Grouping Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GroupKey       Key of a quote                   Label                  │
//! │  ────────       ──────────────                   ─────                  │
//! │  None           "general"                        "General"              │
//! │  Client         client id                        client name            │
//! │  Date           YYYY-MM-DD of created_at         DD/MM/YYYY             │
//! │  ProductGroup   group id of the FIRST item       group name             │
//! │                 ("no-group" when unavailable)    ("No Group")           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A quote spanning several product groups is filed entirely under the group
//! of its first item.
//!
//! Groups appear in the order their key is first met while scanning the
//! quotes in the order given; they are never sorted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::submission::quote_timestamp;
use crate::types::{ClientId, ProductGroup, ProductGroupId, ProductId, QuoteId};

const GENERAL_KEY: &str = "general";
const GENERAL_LABEL: &str = "General";
const NO_GROUP_KEY: &str = "no-group";
const NO_GROUP_LABEL: &str = "No Group";

// =============================================================================
// Input
// =============================================================================

/// Dimension a report is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GroupKey {
    #[default]
    None,
    Client,
    Date,
    ProductGroup,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::None => write!(f, "none"),
            GroupKey::Client => write!(f, "client"),
            GroupKey::Date => write!(f, "date"),
            GroupKey::ProductGroup => write!(f, "product_group"),
        }
    }
}

impl FromStr for GroupKey {
    type Err = String;

    /// Accepts the English names and the values of the report form select.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "nenhum" => Ok(GroupKey::None),
            "client" | "cliente" => Ok(GroupKey::Client),
            "date" | "data" => Ok(GroupKey::Date),
            "product_group" | "grupo_produto" => Ok(GroupKey::ProductGroup),
            other => Err(format!(
                "Invalid grouping: {}. Use none, client, date, or product_group",
                other
            )),
        }
    }
}

/// Narrows the quotes a report covers. Every field is optional.
///
/// Dates are inclusive calendar days. A product group keeps only quotes with
/// at least one item in that group, and only those items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportFilter {
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
    pub client_id: Option<ClientId>,
    pub product_group_id: Option<ProductGroupId>,
}

impl ReportFilter {
    /// Half-open timestamp range `[from, until)` covering the date filters.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use orca_core::report::ReportFilter;
    ///
    /// let day = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
    /// let filter = ReportFilter { end_date: Some(day), ..Default::default() };
    /// let (from, until) = filter.time_range();
    /// assert!(from.is_none());
    /// assert_eq!(until.unwrap().to_rfc3339(), "2026-04-01T00:00:00+00:00");
    /// ```
    pub fn time_range(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let from = self.start_date.map(quote_timestamp);
        let until = self
            .end_date
            .and_then(|d| d.succ_opt())
            .map(quote_timestamp);
        (from, until)
    }
}

/// The client of a report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientRef {
    pub id: ClientId,
    pub name: String,
}

/// One line of a quote as seen by reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportItem {
    pub quantity: i64,
    pub product_id: ProductId,
    pub product_name: String,
    pub group: Option<ProductGroup>,
}

/// A stored quote with its client and items, in storage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportQuote {
    pub id: QuoteId,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub net_total: Money,
    pub discount_percent: f64,
    pub client: ClientRef,
    pub items: Vec<ReportItem>,
}

impl ReportQuote {
    /// Key and label of this quote under `group_by`.
    fn group_of(&self, group_by: GroupKey) -> (String, String) {
        match group_by {
            GroupKey::None => (GENERAL_KEY.to_string(), GENERAL_LABEL.to_string()),
            GroupKey::Client => (self.client.id.to_string(), self.client.name.clone()),
            GroupKey::Date => {
                let day = self.created_at.date_naive();
                (day.format("%Y-%m-%d").to_string(), day.format("%d/%m/%Y").to_string())
            }
            // ungrouped products are skipped, so the first grouped item decides
            GroupKey::ProductGroup => match self.items.iter().find_map(|i| i.group.as_ref()) {
                Some(group) => (group.id.to_string(), group.name.clone()),
                None => (NO_GROUP_KEY.to_string(), NO_GROUP_LABEL.to_string()),
            },
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// One group of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportGroup {
    pub key: String,
    pub label: String,
    pub quotes: Vec<ReportQuote>,
    /// Σ net_total of `quotes`.
    pub subtotal: Money,
}

/// A grouped report ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportModel {
    pub group_by: GroupKey,
    pub groups: Vec<ReportGroup>,
    pub grand_total: Money,
    pub quote_count: usize,
}

impl ReportModel {
    pub fn is_empty(&self) -> bool {
        self.quote_count == 0
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Groups `quotes` by `group_by`, keeping first-seen group order.
pub fn aggregate(quotes: Vec<ReportQuote>, group_by: GroupKey) -> ReportModel {
    let quote_count = quotes.len();
    let mut grand_total = Money::zero();
    let mut groups: Vec<ReportGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for quote in quotes {
        let (key, label) = quote.group_of(group_by);
        grand_total += quote.net_total;

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(ReportGroup {
                key,
                label,
                quotes: Vec::new(),
                subtotal: Money::zero(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.subtotal += quote.net_total;
        group.quotes.push(quote);
    }

    ReportModel {
        group_by,
        groups,
        grand_total,
        quote_count,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
