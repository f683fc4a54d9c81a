use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use daygroup::{
    model::{IndexPath, TimelineRecord, UpdateType},
    DataSourceClient,
};
use eyre::{eyre, Context, Result};
use serde::Deserialize;

/// One line of the replayed timeline. Entries are the same entry when their ids match.
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl TimelineRecord for Entry {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

pub fn parse_entries(json: &str) -> Result<Vec<Entry>> {
    serde_json::from_str(json).wrap_err("records file must be a JSON array of entries")
}

/// Parses `section:row`
pub fn parse_index_path(s: &str) -> Result<IndexPath> {
    let (section, row) = s
        .split_once(':')
        .ok_or_else(|| eyre!("expected section:row, got '{}'", s))?;
    Ok(IndexPath::new(
        section.trim().parse::<usize>().wrap_err("invalid section")?,
        row.trim().parse::<usize>().wrap_err("invalid row")?,
    ))
}

/// Logs every notification it receives
#[derive(Debug, Default)]
pub struct LoggingClient {
    received: AtomicUsize,
}

impl LoggingClient {
    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }
}

impl DataSourceClient for LoggingClient {
    fn update(&self, update: UpdateType) {
        let n = self.received.fetch_add(1, Ordering::SeqCst) + 1;
        match update {
            UpdateType::Reload => tracing::info!(n, "reload"),
            UpdateType::Update(update) => tracing::info!(
                n,
                sections_inserted = ?update.sections_inserted,
                sections_deleted = ?update.sections_deleted,
                sections_updated = ?update.sections_updated,
                rows_inserted = update.rows_inserted.len(),
                rows_deleted = update.rows_deleted.len(),
                rows_updated = update.rows_updated.len(),
                "update"
            ),
        }
    }
}

pub fn new_client() -> Arc<LoggingClient> {
    Arc::new(LoggingClient::default())
}
