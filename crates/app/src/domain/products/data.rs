//! Products Data

use pantry::categories::Category;
use reqwest::Url;

use crate::domain::products::{errors::ProductsServiceError, records::ProductUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub category: Category,
    pub stock: u32,
    pub image_url: String,
    pub is_organic: bool,
    pub is_featured: bool,
}

impl NewProduct {
    /// Check the free-text fields before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::ValidationFailed`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ProductsServiceError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        require_image_url(&self.image_url)
    }
}

/// Product Update Data
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub category: Option<Category>,
    pub stock: Option<u32>,
    pub image_url: Option<String>,
    pub is_organic: Option<bool>,
    pub is_featured: Option<bool>,
}

impl ProductUpdate {
    /// Check whichever free-text fields are being changed.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::ValidationFailed`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ProductsServiceError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }

        if let Some(description) = &self.description {
            require_text("description", description)?;
        }

        if let Some(image_url) = &self.image_url {
            require_image_url(image_url)?;
        }

        Ok(())
    }
}

/// Catalog listing filter. Unset fields do not constrain the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub is_organic: Option<bool>,
    pub is_featured: Option<bool>,
}

fn require_text(field: &'static str, value: &str) -> Result<(), ProductsServiceError> {
    if value.trim().is_empty() {
        return Err(ProductsServiceError::ValidationFailed { field });
    }

    Ok(())
}

fn require_image_url(value: &str) -> Result<(), ProductsServiceError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ProductsServiceError::ValidationFailed { field: "imageUrl" }),
    }
}
