use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::StoreError;
use crate::remote::{require_filters, Direction, Filter, Query, RemoteStore, Row, CREATED_AT_COLUMN};

/// In-memory RemoteStore for testing and offline previews.
///
/// Behaves like the hosted store where the record logic can observe it: ids and
/// `created_at` are assigned on insert, and `created_at` is strictly increasing so
/// newest-first ordering is deterministic.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
    failing: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<String, Vec<Row>>,
    last_created: Option<DateTime<Utc>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, AtomicOrdering::SeqCst);
    }

    /// Number of rows currently in `table`.
    pub fn len(&self, table: &str) -> usize {
        self.tables().rows.get(table).map_or(0, Vec::len)
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.failing.load(AtomicOrdering::SeqCst) {
            Err(StoreError::Unavailable("writes are disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Tables {
    fn stamp(&mut self, row: &mut Row) {
        if !row.contains_key("id") {
            row.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
        }
        if !row.contains_key(CREATED_AT_COLUMN) {
            let mut now = Utc::now();
            if let Some(last) = self.last_created {
                if now <= last {
                    now = last + Duration::microseconds(1);
                }
            }
            self.last_created = Some(now);
            row.insert(
                CREATED_AT_COLUMN.into(),
                Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
    }
}

fn matches(row: &Row, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| row.get(&f.column).unwrap_or(&Value::Null) == &f.value)
}

/// Order JSON scalars the way the store's columns would: nulls first, then
/// booleans, numbers, and strings (RFC 3339 timestamps sort lexically).
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

impl RemoteStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        let tables = self.tables();
        let mut rows: Vec<Row> = tables
            .rows
            .get(table)
            .into_iter()
            .flatten()
            .filter(|row| matches(row, &query.filters))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare(a.get(&order.column), b.get(&order.column));
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables();
        tables.stamp(&mut row);
        tables
            .rows
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<(), StoreError> {
        require_filters("update", table, filters)?;
        self.check_writable()?;
        let mut tables = self.tables();
        for row in tables.rows.entry(table.to_string()).or_default() {
            if matches(row, filters) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn upsert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        self.check_writable()?;
        let mut tables = self.tables();
        let id = row.get("id").cloned();
        if let Some(id) = id {
            let existing = tables
                .rows
                .entry(table.to_string())
                .or_default()
                .iter_mut()
                .find(|r| r.get("id") == Some(&id));
            if let Some(existing) = existing {
                for (column, value) in row {
                    existing.insert(column, value);
                }
                return Ok(existing.clone());
            }
        }
        tables.stamp(&mut row);
        tables
            .rows
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        require_filters("delete", table, filters)?;
        self.check_writable()?;
        let mut tables = self.tables();
        if let Some(rows) = tables.rows.get_mut(table) {
            rows.retain(|row| !matches(row, filters));
        }
        Ok(())
    }
}
