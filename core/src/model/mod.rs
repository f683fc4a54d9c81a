mod day;
mod index_path;
mod ordering;
mod record;
mod section;
mod update;
pub use day::*;
pub use index_path::*;
pub use ordering::*;
pub use record::*;
pub use section::*;
pub use update::*;
