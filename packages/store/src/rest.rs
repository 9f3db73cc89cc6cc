//! # REST store — the hosted row API
//!
//! [`RestStore`] is the [`RemoteStore`] used by the running site. It speaks the
//! PostgREST dialect served under `<project url>/rest/v1/`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `select` | `GET /rest/v1/{table}?select=*&col=eq.val&order=col.desc&limit=n` |
//! | `insert` | `POST /rest/v1/{table}` with `Prefer: return=representation` |
//! | `update` | `PATCH /rest/v1/{table}?col=eq.val` |
//! | `upsert` | `POST /rest/v1/{table}` with `Prefer: resolution=merge-duplicates,return=representation` |
//! | `delete` | `DELETE /rest/v1/{table}?col=eq.val` |
//!
//! Every request carries the project's anon key as `apikey`. The bearer token is the
//! signed-in user's access token when there is one (row-level security scopes the
//! rows to their owner) and the anon key otherwise.
//!
//! ## Error handling
//!
//! Non-success statuses become [`StoreError::Rejected`], using the `message` field of
//! the PostgREST error body when it parses and the raw body otherwise.

use std::sync::{Arc, RwLock};

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::config::RemoteConfig;
use crate::error::StoreError;
use crate::remote::{require_filters, Direction, Filter, Query, RemoteStore, Row};

/// PostgREST-backed store.
#[derive(Clone, Debug)]
pub struct RestStore {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl RestStore {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Use the signed-in user's token for subsequent requests, or fall back to
    /// the anon key with `None`.
    pub fn set_access_token(&self, token: Option<String>) {
        let mut slot = self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = token;
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn bearer(&self) -> String {
        let token = self
            .access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        token.clone().unwrap_or_else(|| self.anon_key.clone())
    }

    fn request(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    async fn check(table: &str, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);
        tracing::warn!(table, status = status.as_u16(), %message, "remote store rejected request");
        Err(StoreError::Rejected {
            table: table.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn first_row(table: &str, response: Response) -> Result<Row, StoreError> {
        let rows: Vec<Row> = response.json().await?;
        rows.into_iter().next().ok_or_else(|| StoreError::Rejected {
            table: table.to_string(),
            status: 200,
            message: "write returned no representation".to_string(),
        })
    }
}

/// Render a filter value in PostgREST's `eq.` operand syntax.
fn operand(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Query-string pairs for filters.
pub(crate) fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column.clone(), format!("eq.{}", operand(&f.value))))
        .collect()
}

/// Query-string pairs for a full `select`.
pub(crate) fn select_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];
    pairs.extend(filter_pairs(&query.filters));
    if let Some(order) = &query.order {
        let dir = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        pairs.push(("order".to_string(), format!("{}.{}", order.column, dir)));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit".to_string(), limit.to_string()));
    }
    pairs
}

impl RemoteStore for RestStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        tracing::debug!(table, ?query, "select");
        let response = self
            .request(reqwest::Method::GET, table)
            .query(&select_pairs(query))
            .send()
            .await?;
        let response = Self::check(table, response).await?;
        Ok(response.json().await?)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        tracing::debug!(table, "insert");
        let response = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;
        let response = Self::check(table, response).await?;
        Self::first_row(table, response).await
    }

    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<(), StoreError> {
        require_filters("update", table, filters)?;
        tracing::debug!(table, ?filters, "update");
        let response = self
            .request(reqwest::Method::PATCH, table)
            .query(&filter_pairs(filters))
            .json(&patch)
            .send()
            .await?;
        Self::check(table, response).await?;
        Ok(())
    }

    async fn upsert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        tracing::debug!(table, "upsert");
        let response = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[row])
            .send()
            .await?;
        let response = Self::check(table, response).await?;
        Self::first_row(table, response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        require_filters("delete", table, filters)?;
        tracing::debug!(table, ?filters, "delete");
        let response = self
            .request(reqwest::Method::DELETE, table)
            .query(&filter_pairs(filters))
            .send()
            .await?;
        Self::check(table, response).await?;
        Ok(())
    }
}
