use std::collections::BTreeSet;

use chrono::{FixedOffset, NaiveDate};
use pretty_assertions::assert_eq;

use crate::{
    model::{BucketZone, DailySection, IndexPath, SortOrder, TableUpdate},
    store::grouping::{
        delete_models, find_index_path, flatten, merge_models, update_models, GroupingOptions,
    },
};

use super::util::*;

fn descending() -> GroupingOptions {
    GroupingOptions::default()
}

fn ascending() -> GroupingOptions {
    GroupingOptions {
        order: SortOrder::Ascending,
        ..GroupingOptions::default()
    }
}

fn six_sections() -> Vec<DailySection<TestRecord>> {
    merge_models(Vec::default(), six_records(), &descending()).0
}

#[test]
fn groups_by_day_newest_first() {
    let (sections, update) = merge_models(Vec::default(), six_records(), &descending());
    assert_eq!(
        sections.iter().map(DailySection::day).collect::<Vec<_>>(),
        vec![day(1), day(0)]
    );
    assert_eq!(ids(&sections), vec![vec![3, 6, 2], vec![4, 1, 5]]);
    assert_eq!(
        update,
        TableUpdate {
            sections_inserted: BTreeSet::from([0, 1]),
            ..Default::default()
        }
    );
}

#[test]
fn groups_by_day_oldest_first() {
    let (sections, _) = merge_models(Vec::default(), six_records(), &ascending());
    assert_eq!(ids(&sections), vec![vec![5, 1, 4], vec![2, 6, 3]]);
}

#[test]
fn rows_in_new_sections_are_not_reported() {
    let (sections, update) = merge_models(
        six_sections(),
        vec![record(7, 0, 3), record(8, 2, 5), record(9, 2, 1)],
        &descending(),
    );
    assert_eq!(ids(&sections), vec![vec![8, 9], vec![3, 6, 2], vec![7, 4, 1, 5]]);
    assert_eq!(update.sections_inserted, BTreeSet::from([0]));
    assert_eq!(update.rows_inserted, vec![IndexPath::new(2, 0)]);
    assert!(update.rows_deleted.is_empty());
    assert!(update.sections_deleted.is_empty());
}

#[test]
fn insert_does_not_deduplicate() {
    let (sections, update) = merge_models(six_sections(), six_records(), &descending());
    assert_eq!(
        sections.iter().map(DailySection::len).collect::<Vec<_>>(),
        vec![6, 6]
    );
    assert!(update.sections_inserted.is_empty());
    // equal records resolve to the first matching row
    assert_eq!(update.rows_inserted.len(), 6);
    assert!(update
        .rows_inserted
        .iter()
        .all(|ip| ip.section < 2 && ip.row < 6));
}

#[test]
fn update_overwrites_matching_rows() {
    let edited = TestRecord {
        label: "edited",
        ..record(4, 0, 2)
    };
    let (sections, update) = update_models(six_sections(), vec![edited]);
    assert_eq!(sections[1].rows()[0].label, "edited");
    assert_eq!(ids(&sections), vec![vec![3, 6, 2], vec![4, 1, 5]]);
    assert_eq!(
        update,
        TableUpdate {
            sections_updated: BTreeSet::from([1]),
            rows_updated: vec![IndexPath::new(1, 0)],
            ..Default::default()
        }
    );
}

#[test]
fn update_without_match_falls_back_to_zero() {
    let (sections, update) =
        update_models(six_sections(), vec![record(6, 1, 1), record(99, 0, 0)]);
    assert_eq!(ids(&sections), vec![vec![3, 6, 2], vec![4, 1, 5]]);
    assert_eq!(
        update.rows_updated,
        vec![IndexPath::new(0, 1), IndexPath::ZERO]
    );
    assert_eq!(update.sections_updated, BTreeSet::from([0]));
    assert_eq!(update.unmatched, vec![1]);
}

#[test]
fn update_keeps_row_in_its_section() {
    // record 3 moves to day 0 but stays where it was found
    let moved = record(3, 0, 5);
    let (sections, update) = update_models(six_sections(), vec![moved.clone()]);
    assert_eq!(ids(&sections), vec![vec![3, 6, 2], vec![4, 1, 5]]);
    assert_eq!(sections[0].rows()[0].timestamp, moved.timestamp);
    assert_eq!(update.rows_updated, vec![IndexPath::ZERO]);
}

#[test]
fn deleting_every_row_removes_section() {
    let (sections, update) = delete_models(
        six_sections(),
        &[
            IndexPath::new(0, 0),
            IndexPath::new(0, 1),
            IndexPath::new(0, 2),
            IndexPath::new(5, 0),
            IndexPath::new(0, 1),
        ],
    );
    assert_eq!(ids(&sections), vec![vec![4, 1, 5]]);
    assert_eq!(sections[0].day(), day(0));
    assert_eq!(
        update,
        TableUpdate {
            sections_deleted: BTreeSet::from([0]),
            rows_deleted: vec![
                IndexPath::new(0, 0),
                IndexPath::new(0, 1),
                IndexPath::new(0, 2)
            ],
            ..Default::default()
        }
    );
}

#[test]
fn deletes_rows_across_sections() {
    let (sections, update) = delete_models(
        six_sections(),
        &[IndexPath::new(1, 2), IndexPath::new(0, 0), IndexPath::new(1, 7)],
    );
    assert_eq!(ids(&sections), vec![vec![6, 2], vec![4, 1]]);
    assert_eq!(
        update.rows_deleted,
        vec![IndexPath::new(1, 2), IndexPath::new(0, 0)]
    );
    assert!(update.sections_deleted.is_empty());
}

#[test]
fn deleted_section_indexes_refer_to_old_list() {
    let three_days = merge_models(
        Vec::default(),
        vec![record(1, 0, 0), record(2, 1, 0), record(3, 2, 0)],
        &descending(),
    )
    .0;
    let (sections, update) = delete_models(
        three_days,
        &[IndexPath::new(0, 0), IndexPath::new(2, 0)],
    );
    assert_eq!(ids(&sections), vec![vec![2]]);
    assert_eq!(update.sections_deleted, BTreeSet::from([0, 2]));
}

#[test]
fn deleting_outside_the_table_changes_nothing() {
    let (sections, update) = delete_models(
        six_sections(),
        &[IndexPath::new(4, 0), IndexPath::new(0, 9)],
    );
    assert_eq!(sections, six_sections());
    assert!(update.is_empty());
}

#[test]
fn buckets_in_configured_zone() {
    let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
    let models = vec![record(1, 0, 22), record(2, 1, 1)];
    let utc = merge_models(Vec::default(), models.clone(), &descending()).0;
    assert_eq!(utc.len(), 2);

    let local = merge_models(
        Vec::default(),
        models,
        &GroupingOptions {
            bucket_zone: BucketZone::Configured,
            time_zone: plus_three,
            ..GroupingOptions::default()
        },
    )
    .0;
    assert_eq!(ids(&local), vec![vec![2, 1]]);
    assert_eq!(local[0].day(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
}

#[test]
fn lookups() {
    let sections = six_sections();
    assert_eq!(
        find_index_path(&sections, &record(1, 0, 0)),
        Some(IndexPath::new(1, 1))
    );
    assert_eq!(find_index_path(&sections, &record(42, 0, 0)), None);
    assert_eq!(
        flatten(&sections).iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![3, 6, 2, 4, 1, 5]
    );
}
