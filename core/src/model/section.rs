use chrono::NaiveDate;

use super::{SortOrder, TimelineRecord};

/// All rows whose timestamp falls on one calendar day.
///
/// Cloning copies the row list, which is how the store prepares a candidate section list
/// without touching the published one.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySection<T> {
    day: NaiveDate,
    rows: Vec<T>,
}

impl<T: TimelineRecord> DailySection<T> {
    pub fn new(day: NaiveDate) -> Self {
        DailySection {
            day,
            rows: Vec::default(),
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<T> {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    /// Stable sort by timestamp in `order`
    pub fn sort(&mut self, order: SortOrder) {
        self.rows
            .sort_by(|lhs, rhs| order.compare(&lhs.timestamp(), &rhs.timestamp()));
    }

    /// Index of the first row equal to `row`
    pub fn position(&self, row: &T) -> Option<usize> {
        self.rows.iter().position(|r| r == row)
    }
}
