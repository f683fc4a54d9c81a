use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use crate::error::StoreError;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct MainJob {
    job: Job,
    done: oneshot::Sender<()>,
}

/// Fixed execution context for publishing results.
///
/// Jobs run one after the other on a single task, so two jobs never interleave, no matter how
/// many stores share the context. Cloning the handle shares the context.
#[derive(Debug, Clone)]
pub struct MainContext {
    send: mpsc::UnboundedSender<MainJob>,
}

impl MainContext {
    /// Spawns the context on the current tokio runtime.
    pub fn new() -> Self {
        let (send, mut recv) = mpsc::unbounded_channel::<MainJob>();
        tokio::task::spawn(
            async move {
                while let Some(MainJob { job, done }) = recv.recv().await {
                    job();
                    let _ = done.send(());
                }
                tracing::debug!("main context stopped");
            }
            .instrument(tracing::debug_span!("main_context")),
        );
        MainContext { send }
    }

    /// Runs `job` on the main context and waits until it has returned.
    pub async fn run_sync<F>(&self, job: F) -> Result<(), StoreError>
    where
        F: FnOnce() + Send + 'static,
    {
        let (done, done_recv) = oneshot::channel();
        self.send
            .send(MainJob {
                job: Box::new(job),
                done,
            })
            .map_err(|_| StoreError::MainContextStopped)?;
        done_recv
            .await
            .map_err(|_| StoreError::MainContextStopped)
    }
}

impl Default for MainContext {
    fn default() -> Self {
        Self::new()
    }
}
