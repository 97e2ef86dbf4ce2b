//! Shared test support.

mod db;

pub(crate) use context::{TestContext, new_product};
