//! Cart Records

use jiff::Timestamp;

use crate::{auth::UserUuid, domain::products::records::ProductUuid};

/// A user's cart with each line priced at the current catalog price.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub user: UserUuid,
    pub lines: Vec<CartLineRecord>,
}

impl CartRecord {
    #[must_use]
    pub fn empty(user: UserUuid) -> Self {
        Self {
            user,
            lines: Vec::new(),
        }
    }

    /// Sum of `price × quantity` across lines, or `None` on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<u64> {
        self.lines.iter().try_fold(0_u64, |acc, line| {
            line.price
                .checked_mul(u64::from(line.quantity))
                .and_then(|line_total| acc.checked_add(line_total))
        })
    }
}

/// Cart Line Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineRecord {
    pub product: ProductUuid,
    pub quantity: u32,
    pub name: String,
    pub price: u64,
    pub image_url: String,
    pub stock: u32,
    pub added_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: u64, quantity: u32) -> CartLineRecord {
        CartLineRecord {
            product: ProductUuid::new(),
            quantity,
            name: "Oat Milk".to_string(),
            price,
            image_url: "https://images.example.com/oat-milk.jpg".to_string(),
            stock: 10,
            added_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let cart = CartRecord {
            user: UserUuid::new(),
            lines: vec![line(2_25, 2), line(1_00, 3)],
        };

        assert_eq!(cart.subtotal(), Some(7_50));
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        assert_eq!(CartRecord::empty(UserUuid::new()).subtotal(), Some(0));
    }

    #[test]
    fn test_subtotal_overflow_is_none() {
        let cart = CartRecord {
            user: UserUuid::new(),
            lines: vec![line(u64::MAX, 2)],
        };

        assert_eq!(cart.subtotal(), None);
    }
}
