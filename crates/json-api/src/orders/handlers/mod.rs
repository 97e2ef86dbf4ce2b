//! Order Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod mine;
pub(crate) mod update_status;
