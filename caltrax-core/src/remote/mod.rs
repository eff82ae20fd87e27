//! Remote record store.
//!
//! [`RemoteService`] is the abstract query/insert contract the sync engine
//! depends on. [`RestClient`] implements it against a PostgREST-style HTTP
//! API; tests substitute an in-memory fake.

#[cfg(test)]
pub(crate) mod fake;
mod rest;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::normalize::RemoteRow;

pub use rest::RestClient;

/// Column holding the owning user's id in every remote table.
pub const OWNER_COLUMN: &str = "clerk_user_id";

/// Query and insert operations against the remote store.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Fetches the rows matching `query`, in the order it requests.
    async fn query(&self, query: &RemoteQuery) -> Result<Vec<RemoteRow>, RemoteError>;

    /// Inserts one row. Returns the stored row when the server echoes it.
    async fn insert(&self, table: &str, row: RemoteRow) -> Result<Option<RemoteRow>, RemoteError>;
}

/// Errors that can occur talking to the remote store.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Inclusive date filter on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub column: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// A filtered, ordered select over one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    pub table: String,
    pub owner_column: String,
    pub owner_id: String,
    pub date_range: Option<DateRange>,
    pub order_by: Option<String>,
    pub descending: bool,
}

impl RemoteQuery {
    /// Selects every row of `table` owned by `owner_id`.
    pub fn new(table: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            owner_column: OWNER_COLUMN.to_string(),
            owner_id: owner_id.into(),
            date_range: None,
            order_by: None,
            descending: false,
        }
    }

    /// Restricts `column` to `[from, to]`, both ends inclusive.
    pub fn with_date_range(mut self, column: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_range = Some(DateRange {
            column: column.into(),
            from,
            to,
        });
        self
    }

    /// Orders by `column`, newest first.
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self.descending = true;
        self
    }
}
