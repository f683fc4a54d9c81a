pub mod actor;
pub mod config;
pub mod error;
pub mod model;
pub mod store;

pub use error::StoreError;
pub use store::{client::DataSourceClient, Completion, DailyDataSource};
