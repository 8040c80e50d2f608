//! Bounded unfurl work queue.
//!
//! The webhook handler must ack immediately, so enqueueing never blocks:
//! a full queue drops the job and the drop is logged with its event
//! context. The worker processes jobs sequentially; per-job failures are
//! the handler's to log and never stop the loop.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

/// One unfurl task: the links one message shared, plus enough context to
/// attach the result.
#[derive(Debug)]
pub struct UnfurlJob {
    pub team_id: String,
    pub channel: String,
    pub message_ts: String,
    pub links: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UnfurlQueue {
    sender: mpsc::Sender<UnfurlJob>,
}

impl UnfurlQueue {
    /// Spawn the worker task and hand back the enqueue side.
    pub fn spawn<F, Fut>(depth: usize, handler: F) -> Self
    where
        F: Fn(UnfurlJob) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::channel(depth);
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                handler(job).await;
            }
        });
        Self { sender }
    }

    pub fn enqueue(&self, job: UnfurlJob) {
        match self.sender.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                warn!(
                    channel = %job.channel,
                    message_ts = %job.message_ts,
                    links = job.links.len(),
                    "unfurl queue full, dropping event"
                );
            }
            Err(TrySendError::Closed(job)) => {
                warn!(
                    channel = %job.channel,
                    message_ts = %job.message_ts,
                    "unfurl worker gone, dropping event"
                );
            }
        }
    }
}
