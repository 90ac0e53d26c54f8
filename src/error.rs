use reqwest::StatusCode;
use thiserror::Error;

/// Failed to retrieve one page from the modem. The page is skipped for
/// this poll; the next scheduled poll is the retry mechanism.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid page url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("fetching {page} failed: HTTP status {status}")]
    Status { page: String, status: StatusCode },
}

/// The page parsed, but the tables a scheme expects are missing or shorter
/// than the header rows it skips. The whole page is skipped and counted as
/// one parse failure; partial tables are never partially decoded.
#[derive(Debug, Error)]
#[error("{page}: expected table {table} is missing or too short")]
pub struct StructuralError {
    pub page: &'static str,
    pub table: usize,
}

/// A single cell failed its decode rule. Only that observation is dropped;
/// sibling columns and subsequent rows continue.
#[derive(Debug, Error)]
pub enum CellError {
    #[error("not an integer: {0:?}")]
    Int(String),
    #[error("not a number: {0:?}")]
    Float(String),
    #[error("expected \"<value> <unit>\": {0:?}")]
    Tokens(String),
    #[error("unrecognized unit: {0:?}")]
    Unit(String),
}
