use std::collections::BTreeSet;

use super::IndexPath;

/// Changes between two published section lists, expressed in the indexes a table view needs
/// to animate them.
///
/// Deleted positions refer to the list before the change, inserted and updated positions to
/// the list after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableUpdate {
    pub sections_inserted: BTreeSet<usize>,
    pub sections_deleted: BTreeSet<usize>,
    pub sections_updated: BTreeSet<usize>,
    pub rows_inserted: Vec<IndexPath>,
    pub rows_deleted: Vec<IndexPath>,
    pub rows_updated: Vec<IndexPath>,
    /// Positions in an update batch whose record matched no row. Their entry in
    /// `rows_updated` is the `(0, 0)` placeholder.
    pub unmatched: Vec<usize>,
}

impl TableUpdate {
    pub fn is_empty(&self) -> bool {
        self.sections_inserted.is_empty()
            && self.sections_deleted.is_empty()
            && self.sections_updated.is_empty()
            && self.rows_inserted.is_empty()
            && self.rows_deleted.is_empty()
            && self.rows_updated.is_empty()
            && self.unmatched.is_empty()
    }
}

/// What a client has to do after a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateType {
    /// Throw away everything and redraw from the store
    Reload,
    /// Apply the listed changes
    Update(TableUpdate),
}

impl UpdateType {
    pub fn animated_or_reload(animated: bool, update: TableUpdate) -> Self {
        if animated {
            UpdateType::Update(update)
        } else {
            UpdateType::Reload
        }
    }

    pub fn is_reload(&self) -> bool {
        matches!(self, UpdateType::Reload)
    }

    pub fn as_update(&self) -> Option<&TableUpdate> {
        match self {
            UpdateType::Reload => None,
            UpdateType::Update(update) => Some(update),
        }
    }
}
