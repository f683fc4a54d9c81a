//! Pure computations behind every store mutation: each function takes the current sections
//! (already cloned) and a batch, and returns the sections to publish together with the
//! changes to report.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use itertools::Itertools;

use crate::model::{
    bucket_day, BucketZone, DailySection, IndexPath, SortOrder, TableUpdate, TimelineRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingOptions {
    pub order: SortOrder,
    pub bucket_zone: BucketZone,
    pub time_zone: FixedOffset,
}

impl GroupingOptions {
    pub fn day_of(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        bucket_day(timestamp, self.bucket_zone, &self.time_zone)
    }
}

impl Default for GroupingOptions {
    fn default() -> Self {
        GroupingOptions {
            order: SortOrder::default(),
            bucket_zone: BucketZone::default(),
            time_zone: Utc.fix(),
        }
    }
}

/// Adds `models` to `sections`, creating sections for days not seen yet.
///
/// Sections created here are reported in `sections_inserted` only; rows that went into them are
/// not listed in `rows_inserted`, since inserting the section already shows them.
pub fn merge_models<T: TimelineRecord>(
    mut sections: Vec<DailySection<T>>,
    models: Vec<T>,
    opts: &GroupingOptions,
) -> (Vec<DailySection<T>>, TableUpdate) {
    let mut section_by_day: HashMap<NaiveDate, usize> = sections
        .iter()
        .enumerate()
        .map(|(idx, section)| (section.day(), idx))
        .collect();
    let mut inserted_days: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut tracked: Vec<(NaiveDate, T)> = Vec::default();

    let sorted_models = models
        .into_iter()
        .sorted_by(|lhs, rhs| opts.order.compare(&lhs.timestamp(), &rhs.timestamp()));
    for model in sorted_models {
        let day = opts.day_of(model.timestamp());
        match section_by_day.get(&day) {
            Some(&idx) => {
                if !inserted_days.contains(&day) {
                    tracked.push((day, model.clone()));
                }
                sections[idx].push(model);
            }
            None => {
                let mut section = DailySection::new(day);
                section.push(model);
                section_by_day.insert(day, sections.len());
                sections.push(section);
                inserted_days.insert(day);
            }
        }
    }

    sort_sections(&mut sections, opts.order);

    let section_by_day: HashMap<NaiveDate, usize> = sections
        .iter()
        .enumerate()
        .map(|(idx, section)| (section.day(), idx))
        .collect();
    let sections_inserted: BTreeSet<usize> = inserted_days
        .iter()
        .filter_map(|day| section_by_day.get(day).copied())
        .collect();
    let rows_inserted: Vec<IndexPath> = tracked
        .iter()
        .filter_map(|(day, model)| {
            let section = *section_by_day.get(day)?;
            let row = sections[section].position(model)?;
            Some(IndexPath::new(section, row))
        })
        .collect();

    let update = TableUpdate {
        sections_inserted,
        rows_inserted,
        ..Default::default()
    };
    (sections, update)
}

/// Overwrites rows equal to each model in place.
///
/// Rows never move to another section here, even if the new timestamp falls on another day.
/// A model without a matching row is reported at `(0, 0)` and listed in `unmatched`.
pub fn update_models<T: TimelineRecord>(
    mut sections: Vec<DailySection<T>>,
    models: Vec<T>,
) -> (Vec<DailySection<T>>, TableUpdate) {
    let mut update = TableUpdate::default();
    for (position, model) in models.into_iter().enumerate() {
        for section in sections.iter_mut() {
            if let Some(row) = section.position(&model) {
                section.rows_mut()[row] = model.clone();
            }
        }
        let index_path = match find_index_path(&sections, &model) {
            Some(index_path) => index_path,
            None => {
                tracing::warn!(position, "updated record matches no row, reporting (0, 0)");
                update.unmatched.push(position);
                IndexPath::ZERO
            }
        };
        update.rows_updated.push(index_path);
        update.sections_updated.insert(index_path.section);
    }
    (sections, update)
}

/// Removes the rows at `index_paths` and every section left empty.
///
/// Positions outside the table are skipped and repeated positions count once. Deleted section
/// indexes refer to the list before the removal.
pub fn delete_models<T: TimelineRecord>(
    mut sections: Vec<DailySection<T>>,
    index_paths: &[IndexPath],
) -> (Vec<DailySection<T>>, TableUpdate) {
    let mut update = TableUpdate::default();
    let mut resolved: BTreeSet<IndexPath> = BTreeSet::new();
    for index_path in index_paths {
        let in_table = sections
            .get(index_path.section)
            .is_some_and(|section| index_path.row < section.len());
        if !in_table {
            tracing::warn!(%index_path, "ignoring deletion outside of the table");
            continue;
        }
        if resolved.insert(*index_path) {
            update.rows_deleted.push(*index_path);
        }
    }

    // back to front so that pending positions stay valid
    for index_path in resolved.iter().rev() {
        sections[index_path.section]
            .rows_mut()
            .remove(index_path.row);
    }

    let mut idx = 0;
    sections.retain(|section| {
        let keep = !section.is_empty();
        if !keep {
            update.sections_deleted.insert(idx);
        }
        idx += 1;
        keep
    });
    (sections, update)
}

/// Sorts the rows of every section, then the sections by day
pub fn sort_sections<T: TimelineRecord>(sections: &mut [DailySection<T>], order: SortOrder) {
    for section in sections.iter_mut() {
        section.sort(order);
    }
    sections.sort_by(|lhs, rhs| order.compare(&lhs.day(), &rhs.day()));
}

/// First position holding a row equal to `model`, scanning sections in order
pub fn find_index_path<T: TimelineRecord>(
    sections: &[DailySection<T>],
    model: &T,
) -> Option<IndexPath> {
    sections
        .iter()
        .enumerate()
        .find_map(|(section_idx, section)| {
            section
                .position(model)
                .map(|row| IndexPath::new(section_idx, row))
        })
}

pub fn flatten<T: TimelineRecord>(sections: &[DailySection<T>]) -> Vec<T> {
    sections
        .iter()
        .flat_map(|section| section.rows().iter().cloned())
        .collect()
}
