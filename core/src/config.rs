use std::str::FromStr;

use camino::Utf8Path as Path;
use chrono::{FixedOffset, Offset, Utc};
use color_eyre::eyre::{eyre, Context, Result};
use serde::Deserialize;

use crate::model::{BucketZone, SortOrder};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlStore {
    pub time_zone: Option<String>,
    pub bucket_zone: Option<BucketZone>,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlConfig {
    #[serde(rename = "Store")]
    pub store: Option<TomlStore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Zone reported alongside section days, and used for bucketing with
    /// [`BucketZone::Configured`]
    pub time_zone: FixedOffset,
    pub bucket_zone: BucketZone,
    pub ascending: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            time_zone: Utc.fix(),
            bucket_zone: BucketZone::default(),
            ascending: SortOrder::default().is_ascending(),
        }
    }
}

pub async fn read_config(path: &Path) -> Result<StoreConfig> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .context(format!("Error reading config file {}", path))?;
    parse_config(&toml_str)
}

pub fn parse_config(toml_str: &str) -> Result<StoreConfig> {
    let toml_config: TomlConfig = toml::from_str(toml_str).context("Error parsing config file")?;
    let defaults = StoreConfig::default();
    let Some(store) = toml_config.store else {
        return Ok(defaults);
    };
    let time_zone = match store.time_zone {
        Some(tz) => parse_time_zone(&tz)?,
        None => defaults.time_zone,
    };
    Ok(StoreConfig {
        time_zone,
        bucket_zone: store.bucket_zone.unwrap_or(defaults.bucket_zone),
        ascending: store
            .order
            .map_or(defaults.ascending, SortOrder::is_ascending),
    })
}

/// Accepts `UTC`, `Z` or an offset like `+03:00`
fn parse_time_zone(s: &str) -> Result<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("utc") || s == "Z" {
        return Ok(Utc.fix());
    }
    FixedOffset::from_str(s).map_err(|err| eyre!("invalid time zone offset '{}': {}", s, err))
}
