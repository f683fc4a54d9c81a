use std::{fmt::Debug, future::Future};

use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use crate::error::StoreError;

#[derive(Debug)]
pub enum MsgTo<T: Debug> {
    DoTask(T),
    /// Answered once every task sent before it has finished
    Barrier(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Runs tasks one at a time, in the order they were sent.
pub struct SerialQueueHandle<T: Debug + Send> {
    send: mpsc::UnboundedSender<MsgTo<T>>,
}

impl<T: Debug + Send> Clone for SerialQueueHandle<T> {
    fn clone(&self) -> Self {
        SerialQueueHandle {
            send: self.send.clone(),
        }
    }
}

impl<T: Debug + Send> Debug for SerialQueueHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueueHandle")
            .field("closed", &self.send.is_closed())
            .finish()
    }
}

impl<Task: Debug + Send + 'static> SerialQueueHandle<Task> {
    /// Spawns the queue on the current tokio runtime.
    pub fn new<A: Actor<Task> + 'static>(actor: A, span: tracing::Span) -> Self {
        let (send, recv) = mpsc::unbounded_channel::<MsgTo<Task>>();
        tokio::task::spawn(
            async move {
                run_actor(recv, actor).await;
            }
            .instrument(span),
        );
        SerialQueueHandle { send }
    }

    pub fn msg_do_task(&self, task: Task) -> Result<(), StoreError> {
        self.send
            .send(MsgTo::DoTask(task))
            .map_err(|_| StoreError::WorkerStopped)
    }

    pub async fn barrier(&self) -> Result<(), StoreError> {
        let (done_send, done_recv) = oneshot::channel();
        self.send
            .send(MsgTo::Barrier(done_send))
            .map_err(|_| StoreError::WorkerStopped)?;
        done_recv.await.map_err(|_| StoreError::WorkerStopped)
    }

    /// Finishes the tasks sent so far, then stops. Tasks sent afterwards are rejected.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        let (did_shutdown_send, did_shutdown_recv) = oneshot::channel();
        self.send
            .send(MsgTo::Shutdown(did_shutdown_send))
            .map_err(|_| StoreError::WorkerStopped)?;
        did_shutdown_recv
            .await
            .map_err(|_| StoreError::WorkerStopped)
    }
}

pub trait Actor<Task: Debug + Send>: Send {
    fn run_task(&mut self, task: Task) -> impl Future<Output = ()> + Send;
}

#[tracing::instrument(skip_all)]
async fn run_actor<Task: Debug + Send, A: Actor<Task>>(
    mut actor_recv: mpsc::UnboundedReceiver<MsgTo<Task>>,
    mut actor: A,
) {
    let mut finished_tasks: usize = 0;
    while let Some(msg) = actor_recv.recv().await {
        match msg {
            MsgTo::DoTask(task) => {
                tracing::trace!(?task, "running task");
                actor.run_task(task).await;
                finished_tasks += 1;
            }
            MsgTo::Barrier(done_send) => {
                // caller may have stopped waiting
                let _ = done_send.send(());
            }
            MsgTo::Shutdown(did_shutdown_send) => {
                tracing::info!(finished_tasks, "shutting down");
                actor_recv.close();
                let _ = did_shutdown_send.send(());
                return;
            }
        }
    }
    tracing::debug!(finished_tasks, "all handles dropped, stopping");
}
