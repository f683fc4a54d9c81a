use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::{
    model::{DailySection, TimelineRecord, UpdateType},
    store::{client::DataSourceClient, Completion},
};

/// Equal by `id` only, so a record with the same id and another label or timestamp is an
/// update of the first one
#[derive(Debug, Clone)]
pub struct TestRecord {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    pub label: &'static str,
}

impl PartialEq for TestRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl TimelineRecord for TestRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

pub fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

pub fn day(days_offset: i64) -> NaiveDate {
    (base_date() + Duration::days(days_offset)).date_naive()
}

pub fn record(id: u32, days_offset: i64, hours_offset: i64) -> TestRecord {
    TestRecord {
        id,
        timestamp: base_date() + Duration::days(days_offset) + Duration::hours(hours_offset),
        label: "",
    }
}

/// Two days, three records each, submitted out of order
pub fn six_records() -> Vec<TestRecord> {
    vec![
        record(1, 0, 1),
        record(2, 1, 0),
        record(3, 1, 2),
        record(4, 0, 2),
        record(5, 0, 0),
        record(6, 1, 1),
    ]
}

pub fn ids(sections: &[DailySection<TestRecord>]) -> Vec<Vec<u32>> {
    sections
        .iter()
        .map(|section| section.rows().iter().map(|r| r.id).collect())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Notified(UpdateType),
    Completed(usize),
}

#[derive(Debug, Default)]
pub struct RecordingClient {
    pub events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingClient {
    pub fn updates(&self) -> Vec<UpdateType> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Notified(update) => Some(update.clone()),
                Event::Completed(_) => None,
            })
            .collect()
    }

    pub fn last_update(&self) -> Option<UpdateType> {
        self.updates().pop()
    }
}

impl DataSourceClient for RecordingClient {
    fn update(&self, update: UpdateType) {
        self.events.lock().push(Event::Notified(update));
    }
}

/// Completion that logs `tag` into `events`
pub fn logging_completion(events: &Arc<Mutex<Vec<Event>>>, tag: usize) -> Option<Completion> {
    let events = Arc::clone(events);
    Some(Box::new(move || events.lock().push(Event::Completed(tag))))
}

/// Completion plus a receiver that resolves when it has run
pub fn completion() -> (Option<Completion>, oneshot::Receiver<()>) {
    let (send, recv) = oneshot::channel();
    let completion: Completion = Box::new(move || {
        let _ = send.send(());
    });
    (Some(completion), recv)
}
