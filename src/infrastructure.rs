pub mod customer;

use crate::domain::StoreError;

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Unavailable(Box::new(other)),
        }
    }
}
