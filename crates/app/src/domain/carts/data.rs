//! Carts Data

use crate::domain::products::records::ProductUuid;

/// New Cart Item Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product: ProductUuid,
    pub quantity: u32,
}
