//! # Remote store interface
//!
//! The hosted backend exposes row access over named tables. Everything the portfolio
//! reads or writes goes through the [`RemoteStore`] trait, so the same record logic
//! runs against the hosted REST API ([`crate::RestStore`]) and the in-memory backend
//! used in tests ([`crate::MemoryStore`]).
//!
//! Rows travel as JSON objects ([`Row`]); typed records are decoded from them with
//! [`decode_rows`]. Filtering is equality only.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A table row as a JSON object.
pub type Row = Map<String, Value>;

/// Column holding the owning user's id on collection tables.
pub const OWNER_COLUMN: &str = "user_id";

/// Column used for newest-first ordering.
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Equality filter: `column = value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Parameters of a `select`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.into(),
            direction,
        });
        self
    }

    /// Order by `created_at`, most recent first.
    pub fn newest_first(self) -> Self {
        self.order_by(CREATED_AT_COLUMN, Direction::Descending)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Async access to the hosted row store.
pub trait RemoteStore {
    fn select(
        &self,
        table: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Row>, StoreError>>;

    /// Insert a row and return it as stored, including its assigned `id`.
    fn insert(
        &self,
        table: &str,
        row: Row,
    ) -> impl Future<Output = Result<Row, StoreError>>;

    /// Merge `patch` into every row matching all `filters`.
    fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> impl Future<Output = Result<(), StoreError>>;

    /// Insert the row, or merge it into the existing row with the same `id`.
    fn upsert(
        &self,
        table: &str,
        row: Row,
    ) -> impl Future<Output = Result<Row, StoreError>>;

    fn delete(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> impl Future<Output = Result<(), StoreError>>;
}

/// Decode fetched rows into typed records.
pub fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Row>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row)).map_err(|source| StoreError::Decode {
                table: table.to_string(),
                source,
            })
        })
        .collect()
}

/// Encode a value that serializes to a JSON object (drafts, patches) as a [`Row`].
pub fn encode_row<T: Serialize>(table: &str, value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(_) => Err(StoreError::Decode {
            table: table.to_string(),
            source: serde::ser::Error::custom("payload is not a JSON object"),
        }),
        Err(source) => Err(StoreError::Decode {
            table: table.to_string(),
            source,
        }),
    }
}

/// Mutations must be scoped.
pub(crate) fn require_filters(
    op: &'static str,
    table: &str,
    filters: &[Filter],
) -> Result<(), StoreError> {
    if filters.is_empty() {
        Err(StoreError::Unfiltered {
            op,
            table: table.to_string(),
        })
    } else {
        Ok(())
    }
}
