//! # Quote Pricing Engine
//!
//! Gross total, discount and net total of a quote, plus the line-item
//! mutation rules.
//!
//! ## Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► gross = Σ subtotal                                           │
//! │                 │                                                       │
//! │  DiscountSpec ──┤                                                       │
//! │   Percent(bps)  │  amount = gross × clamp(bps, 0, 10000) / 10000        │
//! │   Absolute(¢)   │  amount = clamp(cents, 0, gross)                      │
//! │                 ▼                                                       │
//! │           amount = clamp(amount, 0, gross)   (mode switches reuse       │
//! │                 │                             stale input)              │
//! │                 ▼                                                       │
//! │           net = gross − amount                                          │
//! │           percent_equivalent = amount / gross × 100   (0 if gross = 0)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The percent equivalent is what gets stored, so a discount entered in
//! either mode is always persisted as a percentage.
//!
//! ## Example
//! ```rust
//! use orca_core::money::Money;
//! use orca_core::pricing::{compute_totals, DiscountSpec};
//! use orca_core::types::{LineItem, ProductId};
//!
//! let items = vec![LineItem {
//!     product_id: ProductId(1),
//!     name: "Cadeira".into(),
//!     quantity: 2,
//!     unit_price: Money::from_cents(10000),
//!     subtotal: Money::from_cents(20000),
//! }];
//!
//! let totals = compute_totals(&items, &DiscountSpec::percent_bps(1000));
//! assert_eq!(totals.net_total.cents(), 18000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{parse_hundredths, Money, BPS_PER_WHOLE};
use crate::types::{LineItem, Product, ProductId};
use crate::validation::{validate_item_capacity, validate_quantity};

// =============================================================================
// Discount Specification
// =============================================================================

/// How the user entered the discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiscountMode {
    /// Raw value is in basis points (1000 = 10%).
    #[default]
    Percent,
    /// Raw value is an amount in cents.
    Absolute,
}

impl fmt::Display for DiscountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountMode::Percent => write!(f, "percent"),
            DiscountMode::Absolute => write!(f, "absolute"),
        }
    }
}

impl FromStr for DiscountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percent" | "percentual" | "%" => Ok(DiscountMode::Percent),
            "absolute" | "valor" | "fixed" => Ok(DiscountMode::Absolute),
            other => Err(format!(
                "Invalid discount mode: {}. Use percent or absolute",
                other
            )),
        }
    }
}

/// The discount mode and the value entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountSpec {
    pub mode: DiscountMode,
    /// Basis points for `Percent`, cents for `Absolute`. Not yet clamped.
    pub raw_value: i64,
}

impl DiscountSpec {
    /// No discount.
    pub const fn none() -> Self {
        DiscountSpec {
            mode: DiscountMode::Percent,
            raw_value: 0,
        }
    }

    /// Percent discount in basis points (1000 = 10%).
    pub const fn percent_bps(bps: i64) -> Self {
        DiscountSpec {
            mode: DiscountMode::Percent,
            raw_value: bps,
        }
    }

    /// Fixed discount amount.
    pub const fn absolute(amount: Money) -> Self {
        DiscountSpec {
            mode: DiscountMode::Absolute,
            raw_value: amount.cents(),
        }
    }

    /// Builds a spec from the text of the discount input.
    ///
    /// Unparseable text counts as zero, like an empty field.
    ///
    /// ```rust
    /// use orca_core::pricing::{DiscountMode, DiscountSpec};
    ///
    /// assert_eq!(DiscountSpec::from_input(DiscountMode::Percent, "12,5").raw_value, 1250);
    /// assert_eq!(DiscountSpec::from_input(DiscountMode::Absolute, "300").raw_value, 30000);
    /// assert_eq!(DiscountSpec::from_input(DiscountMode::Percent, "").raw_value, 0);
    /// ```
    pub fn from_input(mode: DiscountMode, input: &str) -> Self {
        DiscountSpec {
            mode,
            raw_value: parse_hundredths(input).unwrap_or(0),
        }
    }

    /// Upper bound of the raw value for the given gross total.
    fn upper_bound(&self, gross: Money) -> i64 {
        match self.mode {
            DiscountMode::Percent => BPS_PER_WHOLE,
            DiscountMode::Absolute => gross.cents().max(0),
        }
    }

    /// Returns the raw value clamped to its valid range.
    pub fn clamped_value(&self, gross: Money) -> i64 {
        self.raw_value.clamp(0, self.upper_bound(gross))
    }

    /// The discount amount this spec yields on `gross`, before the final clamp.
    fn amount_on(&self, gross: Money) -> Money {
        let value = self.clamped_value(gross);
        match self.mode {
            DiscountMode::Percent => gross.percentage(value),
            DiscountMode::Absolute => Money::from_cents(value),
        }
    }
}

// =============================================================================
// Clamp Outcome (UI synchronization)
// =============================================================================

/// Tells the UI whether the discount input must be overwritten.
///
/// The pure computation never touches the input itself; the rendering layer
/// replaces the displayed value with `clamped_display_value` when
/// `was_clamped` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClampOutcome {
    pub mode: DiscountMode,
    pub was_clamped: bool,
    /// Same unit as the raw value (basis points or cents).
    pub clamped_display_value: i64,
}

/// Clamps a discount against the gross total and reports whether it changed.
pub fn clamp_discount(discount: &DiscountSpec, gross: Money) -> ClampOutcome {
    let clamped = discount.clamped_value(gross);
    ClampOutcome {
        mode: discount.mode,
        was_clamped: clamped != discount.raw_value,
        clamped_display_value: clamped,
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived totals of a quote. Never stored as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteTotals {
    pub gross_total: Money,
    pub discount_amount: Money,
    pub net_total: Money,
    /// `discount_amount / gross_total × 100`, or 0 for an empty quote.
    pub discount_percent_equivalent: f64,
}

/// Sum of all line subtotals (zero for no items).
pub fn gross_total(items: &[LineItem]) -> Money {
    items.iter().map(|i| i.subtotal).sum()
}

/// Computes gross, discount, net and the percent equivalent.
pub fn compute_totals(items: &[LineItem], discount: &DiscountSpec) -> QuoteTotals {
    let gross = gross_total(items);
    let discount_amount = discount.amount_on(gross).clamp_to(Money::zero(), gross);
    let net_total = gross - discount_amount;

    let discount_percent_equivalent = if gross.is_positive() {
        discount_amount.cents() as f64 / gross.cents() as f64 * 100.0
    } else {
        0.0
    };

    QuoteTotals {
        gross_total: gross,
        discount_amount,
        net_total,
        discount_percent_equivalent,
    }
}

// =============================================================================
// Line Item Mutation Rules
// =============================================================================

/// Appends a line for `product` with quantity 1.
///
/// ## Errors
/// - `DuplicateItem` when the product already has a line (list unchanged)
/// - `TooManyItems` when the quote is full
pub fn add_item(items: &mut Vec<LineItem>, product: &Product) -> CoreResult<()> {
    if items.iter().any(|i| i.product_id == product.id) {
        return Err(CoreError::DuplicateItem {
            product_id: product.id,
        });
    }

    validate_item_capacity(items.len()).map_err(|_| CoreError::TooManyItems {
        max: crate::MAX_QUOTE_ITEMS,
    })?;

    items.push(LineItem::from_product(product));
    Ok(())
}

/// Updates the quantity of a line and recomputes its subtotal.
///
/// ## Errors
/// - `InvalidQuantity` when `qty < 1`
/// - `Validation` when `qty` exceeds the per-line maximum
/// - `ItemNotFound` when no line has `product_id`
pub fn set_quantity(items: &mut [LineItem], product_id: ProductId, qty: i64) -> CoreResult<()> {
    if qty < 1 {
        return Err(CoreError::InvalidQuantity { quantity: qty });
    }
    validate_quantity(qty)?;

    let item = items
        .iter_mut()
        .find(|i| i.product_id == product_id)
        .ok_or(CoreError::ItemNotFound { product_id })?;

    item.apply_quantity(qty);
    Ok(())
}

/// Removes the line for `product_id`. Absent ids are ignored.
pub fn remove_item(items: &mut Vec<LineItem>, product_id: ProductId) {
    items.retain(|i| i.product_id != product_id);
}

// =============================================================================
// Unit Tests
// =============================================================================
