pub mod customer;

use std::error::Error;

use thiserror::Error;

/// Failures surfaced by a customer store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn Error + Send + Sync>),
    #[error("customer not found")]
    NotFound,
}
