use crate::common::MaskSource;
use crate::error::BatchProcessingError;
use crate::pipeline::domain::{AnalysisResult, Batch};
use crate::pipeline::orchestration::BatchAnalyzer;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing uploaded yet.
    Idle,
    Processing,
    Ready,
    Failed { message: String },
}

/// Identifies one upload. Only the most recent ticket may publish its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(Uuid);

impl UploadTicket {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

#[derive(Debug)]
pub enum UploadOutcome {
    Ready(Batch),
    Failed(BatchProcessingError),
    /// A newer upload started before this one finished; its results were discarded.
    Superseded,
}

struct SessionInner {
    state: SessionState,
    batch: Option<Batch>,
    latest: Option<UploadTicket>,
}

/// One in-memory analysis session holding the current batch.
pub struct Session {
    analyzer: BatchAnalyzer,
    inner: Mutex<SessionInner>,
}

impl Session {
    pub fn new(analyzer: BatchAnalyzer) -> Self {
        Self {
            analyzer,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                batch: None,
                latest: None,
            }),
        }
    }

    pub fn analyzer(&self) -> &BatchAnalyzer {
        &self.analyzer
    }

    // Never held across an await.
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn current_batch(&self) -> Option<Batch> {
        self.lock().batch.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        match &self.lock().state {
            SessionState::Failed { message } => Some(message.clone()),
            _ => None,
        }
    }

    /// Enters `Processing` and makes the returned ticket the only one allowed
    /// to publish.
    pub fn begin_upload(&self) -> UploadTicket {
        let ticket = UploadTicket(Uuid::new_v4());
        let mut inner = self.lock();
        if inner.state == SessionState::Processing {
            debug!("Upload {} supersedes an in-flight batch", ticket.id());
        }
        inner.state = SessionState::Processing;
        inner.latest = Some(ticket);
        ticket
    }

    /// Publishes the outcome of `ticket` unless a newer upload has begun.
    pub fn complete_upload(
        &self,
        ticket: UploadTicket,
        outcome: Result<Vec<AnalysisResult>, BatchProcessingError>,
    ) -> UploadOutcome {
        let mut inner = self.lock();
        if inner.latest != Some(ticket) {
            debug!("Discarding superseded upload {}", ticket.id());
            return UploadOutcome::Superseded;
        }
        inner.latest = None;

        match outcome {
            Ok(results) => {
                let batch = Batch::with_id(ticket.id(), results);
                info!("Batch {} ready with {} results", batch.id(), batch.len());
                inner.batch = Some(batch.clone());
                inner.state = SessionState::Ready;
                UploadOutcome::Ready(batch)
            }
            Err(e) => {
                warn!(
                    "Batch {} failed, keeping previous results ({} files failed)",
                    ticket.id(),
                    e.failures().len()
                );
                inner.state = SessionState::Failed {
                    message: e.to_string(),
                };
                UploadOutcome::Failed(e)
            }
        }
    }

    /// Withdraws `ticket` without publishing anything. If it was the latest
    /// upload the session falls back to `Ready` (a batch is held) or `Idle`.
    pub fn abandon_upload(&self, ticket: UploadTicket) {
        let mut inner = self.lock();
        if inner.latest != Some(ticket) {
            return;
        }
        debug!("Upload {} abandoned before completion", ticket.id());
        inner.latest = None;
        inner.state = if inner.batch.is_some() {
            SessionState::Ready
        } else {
            SessionState::Idle
        };
    }

    /// Runs a whole upload: analyze every source, then publish.
    ///
    /// Dropping the returned future before it resolves abandons the upload.
    pub async fn upload(&self, sources: Vec<Arc<dyn MaskSource>>) -> UploadOutcome {
        let mut pending = PendingUpload {
            session: self,
            ticket: self.begin_upload(),
            armed: true,
        };
        let outcome = self.analyzer.analyze(sources).await;
        pending.armed = false;
        self.complete_upload(pending.ticket, outcome)
    }
}

struct PendingUpload<'a> {
    session: &'a Session,
    ticket: UploadTicket,
    armed: bool,
}

impl Drop for PendingUpload<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.abandon_upload(self.ticket);
        }
    }
}
