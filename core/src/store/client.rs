use crate::model::UpdateType;

/// Receiver of change notifications.
///
/// `update` is called on the main context after the store has published the new sections, so
/// reads made from inside it already see the new state. The store only keeps a weak reference
/// to its client.
pub trait DataSourceClient: Send + Sync {
    fn update(&self, update: UpdateType);
}
