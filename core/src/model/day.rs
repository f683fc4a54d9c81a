use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;

/// Which calendar decides the day a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketZone {
    /// UTC day of the timestamp, whatever time zone the store is configured with
    #[default]
    Utc,
    /// Day of the timestamp in the store's configured time zone
    Configured,
}

/// Truncates `timestamp` to the day of the section it belongs to
pub fn bucket_day(
    timestamp: DateTime<Utc>,
    bucket_zone: BucketZone,
    time_zone: &FixedOffset,
) -> NaiveDate {
    match bucket_zone {
        BucketZone::Utc => timestamp.date_naive(),
        BucketZone::Configured => timestamp.with_timezone(time_zone).date_naive(),
    }
}
