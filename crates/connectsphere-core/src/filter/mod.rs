mod parser;
mod params;

use thiserror::Error;

pub use params::{SortDirection, SortField, ViewParams};
pub use parser::parse_view_query;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("empty tag token")]
    EmptyTag,
    #[error("only one tag filter is supported, got {0} and {1}")]
    MultipleTags(String, String),
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    #[error("invalid sort field: {0}")]
    InvalidSortField(String),
    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),
}
