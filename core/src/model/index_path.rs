use std::fmt::Display;

/// Position of a row in the sectioned table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub const ZERO: IndexPath = IndexPath { section: 0, row: 0 };

    pub fn new(section: usize, row: usize) -> Self {
        IndexPath { section, row }
    }
}

impl Display for IndexPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("IndexPath({}, {})", self.section, self.row))
    }
}
