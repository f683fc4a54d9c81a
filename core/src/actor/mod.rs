mod main_context;
mod serial_queue;

pub use main_context::MainContext;
pub use serial_queue::{Actor, SerialQueueHandle};
