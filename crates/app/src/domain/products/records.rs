//! Product Records

use jiff::Timestamp;
use pantry::categories::Category;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,

    /// Unit price in minor currency units
    pub price: u64,

    pub category: Category,

    /// Sellable units on hand
    pub stock: u32,

    pub image_url: String,
    pub is_organic: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    /// Stock was reduced; this many units remain.
    Decremented { remaining: u32 },

    /// Not enough stock; nothing changed.
    Insufficient { available: u32 },

    /// The product does not exist or has been deleted.
    NotFound,
}
