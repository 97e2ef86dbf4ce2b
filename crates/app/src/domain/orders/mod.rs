//! Orders
//!
//! Placing an order reads availability and prices from the catalog, authorizes payment with
//! no locks held, then decrements stock, writes the order and clears the cart in a single
//! transaction. A commit that fails after authorization cancels the payment intent.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;
pub mod store;

pub use errors::{OrdersServiceError, OrdersStoreError};
pub use service::*;
pub use store::*;
