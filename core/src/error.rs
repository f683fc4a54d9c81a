#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store worker has stopped")]
    WorkerStopped,
    #[error("main context has stopped")]
    MainContextStopped,
}
