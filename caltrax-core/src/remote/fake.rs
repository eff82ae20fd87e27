//! Scripted in-memory remote used by tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use super::{RemoteError, RemoteQuery, RemoteService};
use crate::normalize::RemoteRow;

#[derive(Debug, Default)]
pub(crate) struct FakeRemote {
    rows: Mutex<HashMap<String, Vec<RemoteRow>>>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    fail_inserts: bool,
    queries: Mutex<Vec<RemoteQuery>>,
    inserts: Mutex<Vec<(String, RemoteRow)>>,
    next_id: AtomicI64,
}

impl FakeRemote {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            ..Self::default()
        }
    }

    pub(crate) fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                other => panic!("fake row must be an object, got {other}"),
            })
            .collect();
        self.rows
            .lock()
            .unwrap()
            .insert(table.to_string(), rows);
        self
    }

    pub(crate) fn failing(mut self, table: &str) -> Self {
        self.failing.insert(table.to_string());
        self
    }

    pub(crate) fn panicking(mut self, table: &str) -> Self {
        self.panicking.insert(table.to_string());
        self
    }

    pub(crate) fn failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    pub(crate) fn queries(&self) -> Vec<RemoteQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn inserts(&self) -> Vec<(String, RemoteRow)> {
        self.inserts.lock().unwrap().clone()
    }

    fn matches(query: &RemoteQuery, row: &RemoteRow) -> bool {
        if row.get(&query.owner_column).and_then(Value::as_str) != Some(query.owner_id.as_str()) {
            return false;
        }
        match &query.date_range {
            Some(range) => row
                .get(&range.column)
                .and_then(Value::as_str)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .is_some_and(|d| range.contains(d)),
            None => true,
        }
    }
}

#[async_trait]
impl RemoteService for FakeRemote {
    async fn query(&self, query: &RemoteQuery) -> Result<Vec<RemoteRow>, RemoteError> {
        self.queries.lock().unwrap().push(query.clone());

        if self.panicking.contains(&query.table) {
            panic!("fake remote blew up on {}", query.table);
        }
        if self.failing.contains(&query.table) {
            return Err(RemoteError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }

        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| Self::matches(query, row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, mut row: RemoteRow) -> Result<Option<RemoteRow>, RemoteError> {
        if self.fail_inserts {
            return Err(RemoteError::Http("connection refused".to_string()));
        }

        self.inserts
            .lock()
            .unwrap()
            .push((table.to_string(), row.clone()));

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        row.insert("id".to_string(), Value::from(id));
        self.rows
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(Some(row))
    }
}
