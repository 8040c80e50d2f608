use crate::queue::{UnfurlJob, UnfurlQueue};

#[derive(Clone)]
pub struct AppState {
    queue: UnfurlQueue,
}

impl AppState {
    pub fn new(queue: UnfurlQueue) -> Self {
        Self { queue }
    }

    pub fn enqueue(&self, job: UnfurlJob) {
        self.queue.enqueue(job);
    }
}
