//! Order Pricing

use rusty_money::{Money, MoneyError, iso};
use thiserror::Error;

/// Currency every price in the store is held in.
pub const STORE_CURRENCY: &iso::Currency = iso::USD;

/// Lowercase ISO code of [`STORE_CURRENCY`], as payment gateways expect it.
pub const STORE_CURRENCY_CODE: &str = "usd";

/// Flat shipping charge, in minor units, added whenever the subtotal is positive.
pub const SHIPPING_SURCHARGE: i64 = 10_00;

/// Errors that can occur while calculating order totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// A line or running total does not fit in the supported range.
    #[error("order total overflows")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A unit price in minor units and how many units were ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// Unit price in minor units
    pub unit_price: u64,

    /// Number of units
    pub quantity: u32,
}

impl PricedLine {
    /// Price of the whole line.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the line total does not fit.
    pub fn total<'a>(&self) -> Result<Money<'a, iso::Currency>, TotalPriceError> {
        let minor = self
            .unit_price
            .checked_mul(u64::from(self.quantity))
            .and_then(|minor| i64::try_from(minor).ok())
            .ok_or(TotalPriceError::Overflow)?;

        Ok(Money::from_minor(minor, STORE_CURRENCY))
    }
}

/// Subtotal, shipping and grand total of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals<'a> {
    subtotal: Money<'a, iso::Currency>,
    shipping: Money<'a, iso::Currency>,
    total: Money<'a, iso::Currency>,
}

impl<'a> OrderTotals<'a> {
    /// Sum of every line.
    pub fn subtotal(&self) -> &Money<'a, iso::Currency> {
        &self.subtotal
    }

    /// Shipping charge.
    pub fn shipping(&self) -> &Money<'a, iso::Currency> {
        &self.shipping
    }

    /// Amount the customer pays.
    pub fn total(&self) -> &Money<'a, iso::Currency> {
        &self.total
    }

    /// Subtotal in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the amount is negative or out of range.
    pub fn subtotal_minor(&self) -> Result<u64, TotalPriceError> {
        to_unsigned_minor(&self.subtotal)
    }

    /// Shipping in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the amount is negative or out of range.
    pub fn shipping_minor(&self) -> Result<u64, TotalPriceError> {
        to_unsigned_minor(&self.shipping)
    }

    /// Grand total in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the amount is negative or out of range.
    pub fn total_minor(&self) -> Result<u64, TotalPriceError> {
        to_unsigned_minor(&self.total)
    }
}

fn to_unsigned_minor(money: &Money<'_, iso::Currency>) -> Result<u64, TotalPriceError> {
    u64::try_from(money.to_minor_units()).map_err(|_negative| TotalPriceError::Overflow)
}

/// Shipping charge for a given subtotal.
pub fn shipping_for<'a>(subtotal: &Money<'a, iso::Currency>) -> Money<'a, iso::Currency> {
    if subtotal.is_positive() {
        Money::from_minor(SHIPPING_SURCHARGE, STORE_CURRENCY)
    } else {
        Money::from_minor(0, STORE_CURRENCY)
    }
}

/// Calculates subtotal, shipping and total for a list of priced lines.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line or the running total does not fit.
/// - [`TotalPriceError::Money`]: Wrapped money arithmetic error.
pub fn order_totals<'a>(lines: &[PricedLine]) -> Result<OrderTotals<'a>, TotalPriceError> {
    let subtotal = lines
        .iter()
        .try_fold(Money::from_minor(0, STORE_CURRENCY), |acc, line| {
            let line_total = line.total()?;

            if acc.to_minor_units().checked_add(line_total.to_minor_units()).is_none() {
                return Err(TotalPriceError::Overflow);
            }

            Ok(acc.add(line_total)?)
        })?;

    let shipping = shipping_for(&subtotal);

    if subtotal.to_minor_units().checked_add(shipping.to_minor_units()).is_none() {
        return Err(TotalPriceError::Overflow);
    }

    let total = subtotal.add(shipping)?;

    Ok(OrderTotals {
        subtotal,
        shipping,
        total,
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_totals_include_shipping() -> TestResult {
        let lines = [
            PricedLine {
                unit_price: 2_50,
                quantity: 4,
            },
            PricedLine {
                unit_price: 1_99,
                quantity: 1,
            },
        ];

        let totals = order_totals(&lines)?;

        assert_eq!(totals.subtotal_minor()?, 11_99);
        assert_eq!(totals.shipping(), &Money::from_minor(SHIPPING_SURCHARGE, iso::USD));
        assert_eq!(totals.total_minor()?, 21_99);

        Ok(())
    }

    #[test]
    fn test_zero_subtotal_has_no_shipping() -> TestResult {
        let lines = [PricedLine {
            unit_price: 0,
            quantity: 3,
        }];

        let totals = order_totals(&lines)?;

        assert_eq!(totals.subtotal_minor()?, 0);
        assert_eq!(totals.shipping_minor()?, 0);
        assert_eq!(totals.total_minor()?, 0);

        Ok(())
    }

    #[test]
    fn test_empty_lines_total_zero() -> TestResult {
        let totals = order_totals(&[])?;

        assert_eq!(totals.total(), &Money::from_minor(0, iso::USD));

        Ok(())
    }

    #[test]
    fn test_line_overflow() {
        let lines = [PricedLine {
            unit_price: u64::MAX,
            quantity: 2,
        }];

        assert_eq!(order_totals(&lines), Err(TotalPriceError::Overflow));
    }

    #[test]
    fn test_running_total_overflow() {
        let lines = [
            PricedLine {
                unit_price: i64::MAX.unsigned_abs(),
                quantity: 1,
            },
            PricedLine {
                unit_price: 1,
                quantity: 1,
            },
        ];

        assert_eq!(order_totals(&lines), Err(TotalPriceError::Overflow));
    }
}
