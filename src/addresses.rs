//! Shipping Addresses

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A required address field was blank.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("shipping address field `{field}` is required")]
pub struct MissingAddressField {
    /// Name of the blank field
    pub field: &'static str,
}

/// Where an order is delivered. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Person receiving the parcel
    pub recipient_name: String,

    /// Street and house number
    pub street: String,

    /// City or town
    pub city: String,

    /// State, county or province
    pub region: String,

    /// Postal or ZIP code
    pub postal_code: String,

    /// Contact phone number
    pub phone: String,
}

impl ShippingAddress {
    /// Check every field is present, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`MissingAddressField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), MissingAddressField> {
        let fields = [
            ("recipientName", &self.recipient_name),
            ("street", &self.street),
            ("city", &self.city),
            ("region", &self.region),
            ("postalCode", &self.postal_code),
            ("phone", &self.phone),
        ];

        match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(MissingAddressField { field }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            recipient_name: "Ada Lovelace".to_string(),
            street: "12 St James's Square".to_string(),
            city: "London".to_string(),
            region: "Greater London".to_string(),
            postal_code: "SW1Y 4JH".to_string(),
            phone: "+44 20 7946 0000".to_string(),
        }
    }

    #[test]
    fn test_complete_address_is_valid() {
        assert_eq!(address().validate(), Ok(()));
    }

    #[test]
    fn test_blank_field_is_reported() {
        let mut address = address();
        address.city = "   ".to_string();

        assert_eq!(
            address.validate(),
            Err(MissingAddressField { field: "city" })
        );
    }

    #[test]
    fn test_first_blank_field_wins() {
        let mut address = address();
        address.postal_code = String::new();
        address.recipient_name = String::new();

        assert_eq!(
            address.validate(),
            Err(MissingAddressField {
                field: "recipientName"
            })
        );
    }
}
