//! Product Categories

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name a known category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Catalog category a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Fresh fruit
    Fruits,

    /// Fresh vegetables
    Vegetables,

    /// Milk, cheese, eggs and similar
    Dairy,

    /// Meat and poultry
    Meat,

    /// Bread, rice, pasta and cereals
    Grains,

    /// Drinks
    Beverages,

    /// Snacks and treats
    Snacks,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Fruits,
        Category::Vegetables,
        Category::Dairy,
        Category::Meat,
        Category::Grains,
        Category::Beverages,
        Category::Snacks,
    ];

    /// Stable lowercase name, used for storage and the wire format.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fruits => "fruits",
            Category::Vegetables => "vegetables",
            Category::Dairy => "dairy",
            Category::Meat => "meat",
            Category::Grains => "grains",
            Category::Beverages => "beverages",
            Category::Snacks => "snacks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
