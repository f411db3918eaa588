use tokio::sync::{mpsc, oneshot};

use crate::domain::{BatchId, BatchStatus, ResponseId, ResponseStatus};

/// Work the transcription worker knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerJob {
    Batch(BatchId),
    Response(ResponseId),
}

/// Final report of a job, delivered through its [`JobHandle`].
#[derive(Debug, Clone, PartialEq)]
pub enum JobReport {
    Batch {
        batch_id: BatchId,
        status: BatchStatus,
        completed: u32,
        failed: u32,
    },
    Response {
        response_id: ResponseId,
        status: ResponseStatus,
    },
    Aborted {
        job: WorkerJob,
        error: String,
    },
}

pub struct WorkerMessage {
    pub job: WorkerJob,
    pub reply: oneshot::Sender<JobReport>,
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue is full")]
    Full,
    #[error("worker has shut down")]
    Closed,
}

/// Observes a submitted job. Dropping it detaches the job; the worker keeps going.
#[derive(Debug)]
pub struct JobHandle {
    receiver: oneshot::Receiver<JobReport>,
}

impl JobHandle {
    /// Waits for the worker's report. `None` if the worker went away first.
    pub async fn outcome(self) -> Option<JobReport> {
        self.receiver.await.ok()
    }
}

/// Bounded submission side of the transcription worker.
#[derive(Clone)]
pub struct TranscriptionQueue {
    sender: mpsc::Sender<WorkerMessage>,
}

/// A reserved queue slot; submitting through it cannot fail.
pub struct QueueSlot<'a> {
    permit: mpsc::Permit<'a, WorkerMessage>,
}

impl TranscriptionQueue {
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<WorkerMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Claims capacity without waiting, so callers can commit state changes knowing
    /// the job will be accepted.
    pub fn reserve(&self) -> Result<QueueSlot<'_>, QueueError> {
        self.sender
            .try_reserve()
            .map(|permit| QueueSlot { permit })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(()) => QueueError::Full,
                mpsc::error::TrySendError::Closed(()) => QueueError::Closed,
            })
    }
}

impl QueueSlot<'_> {
    pub fn submit(self, job: WorkerJob) -> JobHandle {
        let (reply, receiver) = oneshot::channel();
        self.permit.send(WorkerMessage { job, reply });
        tracing::debug!(job = ?job, "Job enqueued");
        JobHandle { receiver }
    }
}
