use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
};

use chrono::{FixedOffset, NaiveDate};
use parking_lot::{Mutex, RwLock};

use crate::{
    actor::{Actor, MainContext, SerialQueueHandle},
    config::StoreConfig,
    error::StoreError,
    model::{BucketZone, DailySection, IndexPath, SortOrder, TimelineRecord, UpdateType},
};

use self::{client::DataSourceClient, grouping::GroupingOptions};

pub mod client;
pub mod grouping;

#[cfg(test)]
mod test;

/// Called on the main context once the client has been notified
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

enum StoreTask<T> {
    Process {
        models: Vec<T>,
        /// Order in effect when the batch was submitted
        order: SortOrder,
        replace: bool,
        animated: bool,
        on_complete: Option<Completion>,
    },
    Update {
        models: Vec<T>,
        animated: bool,
        on_complete: Option<Completion>,
    },
    Delete {
        index_paths: Vec<IndexPath>,
        animated: bool,
        on_complete: Option<Completion>,
    },
    /// Rebuild all sections in the new order
    Reorder(SortOrder),
}

impl<T> Debug for StoreTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreTask::Process {
                models,
                order,
                replace,
                animated,
                ..
            } => f
                .debug_struct("Process")
                .field("models", &models.len())
                .field("order", order)
                .field("replace", replace)
                .field("animated", animated)
                .finish(),
            StoreTask::Update {
                models, animated, ..
            } => f
                .debug_struct("Update")
                .field("models", &models.len())
                .field("animated", animated)
                .finish(),
            StoreTask::Delete {
                index_paths,
                animated,
                ..
            } => f
                .debug_struct("Delete")
                .field("index_paths", index_paths)
                .field("animated", animated)
                .finish(),
            StoreTask::Reorder(order) => f.debug_tuple("Reorder").field(order).finish(),
        }
    }
}

struct Shared<T> {
    sections: RwLock<Vec<DailySection<T>>>,
    ascending: AtomicBool,
    client: Mutex<Option<Weak<dyn DataSourceClient>>>,
    time_zone: FixedOffset,
    bucket_zone: BucketZone,
}

impl<T: TimelineRecord> Shared<T> {
    fn order(&self) -> SortOrder {
        SortOrder::from_ascending(self.ascending.load(Ordering::SeqCst))
    }

    fn grouping_options(&self, order: SortOrder) -> GroupingOptions {
        GroupingOptions {
            order,
            bucket_zone: self.bucket_zone,
            time_zone: self.time_zone,
        }
    }

    fn notify(&self, update: UpdateType) {
        let client = self.client.lock().as_ref().and_then(Weak::upgrade);
        match client {
            Some(client) => client.update(update),
            None => tracing::debug!("no client attached, dropping notification"),
        }
    }
}

struct StoreWorker<T> {
    shared: Arc<Shared<T>>,
    main: MainContext,
}

impl<T: TimelineRecord> StoreWorker<T> {
    /// Swaps in `sections` (if any), notifies the client and runs `on_complete`, all on the
    /// main context. Returns once that has happened.
    async fn publish(
        &self,
        sections: Option<Vec<DailySection<T>>>,
        update: UpdateType,
        on_complete: Option<Completion>,
    ) {
        tracing::debug!(?update, "publishing");
        let shared = Arc::clone(&self.shared);
        let result = self
            .main
            .run_sync(move || {
                if let Some(sections) = sections {
                    *shared.sections.write() = sections;
                }
                shared.notify(update);
                if let Some(on_complete) = on_complete {
                    on_complete();
                }
            })
            .await;
        if let Err(err) = result {
            tracing::error!(%err, "could not publish sections");
        }
    }

    fn current_sections(&self) -> Vec<DailySection<T>> {
        self.shared.sections.read().clone()
    }
}

impl<T: TimelineRecord> Actor<StoreTask<T>> for StoreWorker<T> {
    async fn run_task(&mut self, task: StoreTask<T>) {
        match task {
            StoreTask::Process {
                models,
                order,
                replace,
                animated,
                on_complete,
            } => {
                if models.is_empty() {
                    tracing::debug!("empty batch, reloading without changes");
                    self.publish(None, UpdateType::Reload, on_complete).await;
                    return;
                }
                let current = if replace {
                    Vec::default()
                } else {
                    self.current_sections()
                };
                let opts = self.shared.grouping_options(order);
                let (sections, update) = grouping::merge_models(current, models, &opts);
                self.publish(
                    Some(sections),
                    UpdateType::animated_or_reload(animated, update),
                    on_complete,
                )
                .await;
            }
            StoreTask::Update {
                models,
                animated,
                on_complete,
            } => {
                let (sections, update) = grouping::update_models(self.current_sections(), models);
                self.publish(
                    Some(sections),
                    UpdateType::animated_or_reload(animated, update),
                    on_complete,
                )
                .await;
            }
            StoreTask::Delete {
                index_paths,
                animated,
                on_complete,
            } => {
                let (sections, update) =
                    grouping::delete_models(self.current_sections(), &index_paths);
                self.publish(
                    Some(sections),
                    UpdateType::animated_or_reload(animated, update),
                    on_complete,
                )
                .await;
            }
            StoreTask::Reorder(order) => {
                let models = grouping::flatten(&self.shared.sections.read());
                if models.is_empty() {
                    return;
                }
                let (sections, _) = grouping::merge_models(
                    Vec::default(),
                    models,
                    &self.shared.grouping_options(order),
                );
                self.publish(Some(sections), UpdateType::Reload, None).await;
            }
        }
    }
}

/// Records grouped into one section per calendar day.
///
/// Mutations are queued and computed one at a time on a background worker; each returns as
/// soon as it is queued. When a mutation is done the new sections are published on the main
/// context, the client is notified, then the optional completion runs. Reads are not queued:
/// they see the last published state, so a caller that wants to observe a mutation should read
/// from the client notification, the completion, or after `flush`.
///
/// Must be created inside a tokio runtime.
pub struct DailyDataSource<T: TimelineRecord> {
    shared: Arc<Shared<T>>,
    queue: SerialQueueHandle<StoreTask<T>>,
}

impl<T: TimelineRecord> DailyDataSource<T> {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_main_context(config, MainContext::new())
    }

    /// Publishes on `main`, which may be shared with other stores.
    pub fn with_main_context(config: &StoreConfig, main: MainContext) -> Self {
        let shared = Arc::new(Shared {
            sections: RwLock::new(Vec::default()),
            ascending: AtomicBool::new(config.ascending),
            client: Mutex::new(None),
            time_zone: config.time_zone,
            bucket_zone: config.bucket_zone,
        });
        let worker = StoreWorker {
            shared: Arc::clone(&shared),
            main,
        };
        let queue = SerialQueueHandle::new(
            worker,
            tracing::info_span!("daily_data_source", time_zone = %config.time_zone),
        );
        DailyDataSource { shared, queue }
    }

    pub fn set_client<C: DataSourceClient + 'static>(&self, client: &Arc<C>) {
        let client: Weak<C> = Arc::downgrade(client);
        let client: Weak<dyn DataSourceClient> = client;
        *self.shared.client.lock() = Some(client);
    }

    pub fn clear_client(&self) {
        *self.shared.client.lock() = None;
    }

    #[tracing::instrument(skip(self, models, on_complete), fields(count = models.len()))]
    pub fn insert_models(
        &self,
        models: Vec<T>,
        animated: bool,
        on_complete: Option<Completion>,
    ) -> Result<(), StoreError> {
        self.queue.msg_do_task(StoreTask::Process {
            models,
            order: self.shared.order(),
            replace: false,
            animated,
            on_complete,
        })
    }

    #[tracing::instrument(skip(self, models, on_complete), fields(count = models.len()))]
    pub fn update_models(
        &self,
        models: Vec<T>,
        animated: bool,
        on_complete: Option<Completion>,
    ) -> Result<(), StoreError> {
        self.queue.msg_do_task(StoreTask::Update {
            models,
            animated,
            on_complete,
        })
    }

    /// Drops every section and groups `models` from scratch. Always reloads.
    ///
    /// An empty batch reloads without clearing the store.
    #[tracing::instrument(skip(self, models, on_complete), fields(count = models.len()))]
    pub fn replace_models(
        &self,
        models: Vec<T>,
        on_complete: Option<Completion>,
    ) -> Result<(), StoreError> {
        self.queue.msg_do_task(StoreTask::Process {
            models,
            order: self.shared.order(),
            replace: true,
            animated: false,
            on_complete,
        })
    }

    /// Removes the rows found at `index_paths` when the deletion runs.
    #[tracing::instrument(skip(self, on_complete))]
    pub fn delete_models(
        &self,
        index_paths: Vec<IndexPath>,
        animated: bool,
        on_complete: Option<Completion>,
    ) -> Result<(), StoreError> {
        self.queue.msg_do_task(StoreTask::Delete {
            index_paths,
            animated,
            on_complete,
        })
    }

    /// Switches the sort order. When it actually changes, all sections are rebuilt after the
    /// mutations already queued and the client gets a reload. Those earlier mutations still
    /// run in the old order, so their reported changes match what the client shows. An empty
    /// store only records the new order.
    #[tracing::instrument(skip(self))]
    pub fn set_order_ascending(&self, ascending: bool) -> Result<(), StoreError> {
        if self.shared.ascending.swap(ascending, Ordering::SeqCst) == ascending {
            return Ok(());
        }
        self.queue
            .msg_do_task(StoreTask::Reorder(SortOrder::from_ascending(ascending)))
    }

    pub fn is_order_ascending(&self) -> bool {
        self.shared.ascending.load(Ordering::SeqCst)
    }

    pub fn time_zone(&self) -> FixedOffset {
        self.shared.time_zone
    }

    pub fn number_of_sections(&self) -> usize {
        self.shared.sections.read().len()
    }

    /// Zero for a section that does not exist
    pub fn number_of_rows_in_section(&self, section: usize) -> usize {
        self.shared
            .sections
            .read()
            .get(section)
            .map_or(0, DailySection::len)
    }

    pub fn model_at(&self, index_path: IndexPath) -> Option<T> {
        self.shared
            .sections
            .read()
            .get(index_path.section)
            .and_then(|section| section.rows().get(index_path.row))
            .cloned()
    }

    pub fn index_path_for(&self, model: &T) -> Option<IndexPath> {
        grouping::find_index_path(&self.shared.sections.read(), model)
    }

    pub fn day_for_section(&self, section: usize) -> Option<(NaiveDate, FixedOffset)> {
        self.shared
            .sections
            .read()
            .get(section)
            .map(|section| (section.day(), self.shared.time_zone))
    }

    /// Copy of the published sections
    pub fn sections(&self) -> Vec<DailySection<T>> {
        self.shared.sections.read().clone()
    }

    /// Waits until every mutation queued so far has been published.
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.queue.barrier().await
    }

    /// Finishes queued mutations and stops the worker. Later mutations fail with
    /// [`StoreError::WorkerStopped`].
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.queue.shutdown().await
    }
}
