//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  A quote of 3 × R$ 0,10 must total exactly R$ 0,30, and a 10%           │
//! │  discount on R$ 250,00 must leave exactly R$ 225,00.                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is a count of centavos; rounding happens in exactly     │
//! │    one place (percentage application) and is half-up.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orca_core::money::Money;
//!
//! let price = Money::from_cents(1099); // R$ 10,99
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.cents(), 2198);
//!
//! let parsed = Money::parse("1.234,56").unwrap();
//! assert_eq!(parsed.cents(), 123456);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in 100%.
pub const BPS_PER_WHOLE: i64 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► LineItem.unit_price ──► LineItem.subtotal
///                                                │
///                         QuoteTotals.gross_total ◄┘
///                                │
///             discount_amount ───┤
///                                ▼
///                      QuoteTotals.net_total ──► orcamentos.valor_total
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// ```rust
    /// use orca_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses user-entered decimal text into Money.
    ///
    /// Either `,` or `.` may be the decimal separator; when both appear the
    /// last one is the decimal separator and the other groups thousands.
    /// A third fractional digit rounds half-up.
    ///
    /// ```rust
    /// use orca_core::money::Money;
    ///
    /// assert_eq!(Money::parse("300").unwrap().cents(), 30000);
    /// assert_eq!(Money::parse("12,5").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse("1,234.56").unwrap().cents(), 123456);
    /// assert!(Money::parse("abc").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        parse_hundredths(input).map(Money)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use orca_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `bps` basis points of this amount, rounded half-up to the cent.
    ///
    /// ```rust
    /// use orca_core::money::Money;
    ///
    /// let gross = Money::from_cents(25000);
    /// assert_eq!(gross.percentage(1000).cents(), 2500); // 10%
    /// assert_eq!(Money::from_cents(1000).percentage(825).cents(), 83);
    /// ```
    pub fn percentage(&self, bps: i64) -> Money {
        // i128 keeps large quotes from overflowing before the division
        let scaled = self.0 as i128 * bps as i128 + (BPS_PER_WHOLE as i128 / 2);
        Money((scaled / BPS_PER_WHOLE as i128) as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ```rust
    /// use orca_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(10000);
    /// assert_eq!(subtotal.apply_percentage_discount(1000).cents(), 9000);
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: i64) -> Money {
        *self - self.percentage(discount_bps)
    }

    /// Restricts the value to `[min, max]`.
    ///
    /// Unlike `Ord::clamp` this never panics: if `max < min` the result is `min`.
    #[inline]
    pub fn clamp_to(self, min: Money, max: Money) -> Money {
        if self > max {
            if max < min {
                min
            } else {
                max
            }
        } else if self < min {
            min
        } else {
            self
        }
    }

    /// Renders the amount with the given symbol and separators.
    ///
    /// ```rust
    /// use orca_core::money::Money;
    ///
    /// let amount = Money::from_cents(123456);
    /// assert_eq!(amount.format_with("R$", ',', '.'), "R$ 1.234,56");
    /// assert_eq!(amount.format_with("$", '.', ','), "$ 1,234.56");
    /// ```
    pub fn format_with(&self, symbol: &str, decimal_separator: char, thousands_separator: char) -> String {
        let digits = self.major().abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(thousands_separator);
            }
            grouped.push(ch);
        }

        format!(
            "{}{} {}{}{:02}",
            if self.is_negative() { "-" } else { "" },
            symbol,
            grouped,
            decimal_separator,
            self.cents_part()
        )
    }
}

/// Parses decimal text into hundredths (cents, or basis points of a percent).
///
/// Returns `None` for empty input, stray characters, or overflow.
pub(crate) fn parse_hundredths(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }

    let decimal_at = body.rfind(&[',', '.'][..]);
    let (whole, fraction) = match decimal_at {
        Some(pos) => (&body[..pos], &body[pos + 1..]),
        None => (body, ""),
    };

    // Any separator left in the whole part only groups thousands
    let whole_digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    if whole_digits.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole_value: i64 = if whole_digits.is_empty() {
        0
    } else {
        whole_digits.parse().ok()?
    };

    let mut frac = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = frac.next().unwrap_or(0);
    let hundredths = frac.next().unwrap_or(0);
    let round_up = frac.next().map(|d| d >= 5).unwrap_or(false);

    let value = whole_value
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;

    Some(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the Brazilian real format; the front end may re-format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("R$", ',', '.'))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$ 10,99");
        assert_eq!(Money::from_cents(0).to_string(), "R$ 0,00");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::from_cents(123456789).to_string(), "R$ 1.234.567,89");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 10% of R$ 250,00
        assert_eq!(Money::from_cents(25000).percentage(1000).cents(), 2500);
        // 33.33% of R$ 0,10 = 3.333 cents -> 3
        assert_eq!(Money::from_cents(10).percentage(3333).cents(), 3);
        // 5% of R$ 0,10 = 0.5 cents -> 1
        assert_eq!(Money::from_cents(10).percentage(500).cents(), 1);
        assert_eq!(Money::from_cents(999).percentage(BPS_PER_WHOLE).cents(), 999);
    }

    #[test]
    fn test_clamp_to() {
        let zero = Money::zero();
        let cap = Money::from_cents(25000);

        assert_eq!(Money::from_cents(30000).clamp_to(zero, cap), cap);
        assert_eq!(Money::from_cents(-1).clamp_to(zero, cap), zero);
        assert_eq!(Money::from_cents(100).clamp_to(zero, cap).cents(), 100);
        // Inverted bounds collapse to the lower bound
        assert_eq!(Money::from_cents(5).clamp_to(zero, Money::from_cents(-5)), zero);
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(parse_hundredths("0"), Some(0));
        assert_eq!(parse_hundredths("  42 "), Some(4200));
        assert_eq!(parse_hundredths("10.5"), Some(1050));
        assert_eq!(parse_hundredths("10,55"), Some(1055));
        assert_eq!(parse_hundredths("10,555"), Some(1056));
        assert_eq!(parse_hundredths("10,554"), Some(1055));
        assert_eq!(parse_hundredths(",5"), Some(50));
        assert_eq!(parse_hundredths("1.234,56"), Some(123456));
        assert_eq!(parse_hundredths("-3"), Some(-300));
        assert_eq!(parse_hundredths(""), None);
        assert_eq!(parse_hundredths("R$ 3"), None);
        assert_eq!(parse_hundredths("."), None);
        assert_eq!(parse_hundredths("12a"), None);
    }
}
