use chrono::{DateTime, Utc};

/// Anything that can be placed on the timeline.
///
/// The store only looks at the timestamp (to pick the day section and the position inside it)
/// and at equality (to find rows again for updates and lookups). Equality does not have to
/// cover every field: `update_models` relies on two records comparing equal while carrying
/// different payloads.
pub trait TimelineRecord: Clone + PartialEq + Send + Sync + 'static {
    fn timestamp(&self) -> DateTime<Utc>;
}
