use std::cmp::Ordering;

use serde::Deserialize;

/// Direction shared by the section order and the row order inside every section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    /// Newest day first, newest record first
    #[default]
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortOrder::Ascending
    }

    /// Descending is the reversed ascending comparison, so equal keys compare `Equal` in both
    /// directions and a stable sort keeps them in arrival order.
    pub fn compare<K: Ord + ?Sized>(self, lhs: &K, rhs: &K) -> Ordering {
        match self {
            SortOrder::Ascending => lhs.cmp(rhs),
            SortOrder::Descending => rhs.cmp(lhs),
        }
    }
}
