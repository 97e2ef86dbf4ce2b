//! Pantry
//!
//! Pantry is a storefront core: catalog categories, order lifecycle rules, payment methods,
//! shipping address validation and order total arithmetic, free of any I/O.

pub mod addresses;
pub mod categories;
pub mod payment_methods;
pub mod pricing;
pub mod status;
