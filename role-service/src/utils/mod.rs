//! Request extraction and parsing of raw list-query parameters.

pub mod extract;
pub mod number;
pub mod search;
pub mod sort;

pub use extract::{AppJson, AppPath};
pub use number::coerce_number;
pub use search::{Search, SearchFilter};
pub use sort::{Sort, SortDirection, SortField};

use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Invalid sort '{0}': expected field:asc|desc[,field:asc|desc]")]
    InvalidSort(String),

    #[error("Invalid search '{0}': expected field:value[|value][,field:value]")]
    InvalidSearch(String),
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

fn is_field_name(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
