// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition orchestrator. Runs one pipeline request at a time on tokio's
// blocking pool and hands exactly one result per accepted request to the
// registered callback.
//
// The OCR session moves into the background task together with the request
// and travels back with the result over a oneshot channel, so nothing is
// shared between the two sides while a request runs.

use chrono::{DateTime, Utc};
use glyphcap_core::config::{EmptyTextPolicy, ScanConfig};
use glyphcap_core::error::{GlyphcapError, Result};
use glyphcap_core::types::{OrchestratorState, RecognitionResult, RequestId};
use glyphcap_scan::{OcrSession, PipelineRequest, PreprocessPipeline, RecognitionBackend};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{error, info, instrument, warn};

type Reply<B> = (OcrSession<B>, Result<String>);

struct InFlight<B> {
    id: RequestId,
    submitted_at: DateTime<Utc>,
    reply: oneshot::Receiver<Reply<B>>,
}

/// Drives [`PreprocessPipeline`] requests without blocking the caller.
///
/// Lifecycle: `Idle → Running → Completed | Failed`, and from either terminal
/// state back to `Running` on the next submission. Results are delivered when
/// the owner calls [`dispatch`](Self::dispatch) or
/// [`try_dispatch`](Self::try_dispatch), so the callback always runs on the
/// owner's context.
pub struct Orchestrator<B: RecognitionBackend + 'static> {
    runtime: Handle,
    pipeline: PreprocessPipeline,
    make_backend: Box<dyn Fn() -> B + Send + Sync>,
    empty_text: EmptyTextPolicy,
    /// Idle session, `None` while a request holds it or after a worker died.
    session: Option<OcrSession<B>>,
    in_flight: Option<InFlight<B>>,
    state: OrchestratorState,
    on_result: Box<dyn FnMut(RecognitionResult) + Send>,
}

impl<B: RecognitionBackend + 'static> Orchestrator<B> {
    /// `make_backend` is called whenever a fresh session is needed: on the
    /// first submission and after a background task was lost.
    pub fn new(
        runtime: Handle,
        pipeline: PreprocessPipeline,
        make_backend: impl Fn() -> B + Send + Sync + 'static,
        on_result: impl FnMut(RecognitionResult) + Send + 'static,
    ) -> Self {
        Self {
            runtime,
            pipeline,
            make_backend: Box::new(make_backend),
            empty_text: EmptyTextPolicy::default(),
            session: None,
            in_flight: None,
            state: OrchestratorState::Idle,
            on_result: Box::new(on_result),
        }
    }

    /// Build an orchestrator whose pipeline and empty-text policy follow
    /// `config`.
    pub fn from_config(
        runtime: Handle,
        config: &ScanConfig,
        make_backend: impl Fn() -> B + Send + Sync + 'static,
        on_result: impl FnMut(RecognitionResult) + Send + 'static,
    ) -> Self {
        Self::new(
            runtime,
            PreprocessPipeline::from_config(config),
            make_backend,
            on_result,
        )
        .with_empty_text_policy(config.empty_text)
    }

    pub fn with_empty_text_policy(mut self, policy: EmptyTextPolicy) -> Self {
        self.empty_text = policy;
        if let Some(session) = self.session.take() {
            self.session = Some(session.with_empty_text_policy(policy));
        }
        self
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        !self.state.accepts_submission()
    }

    /// Id of the request currently running, if any.
    pub fn in_flight_id(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|job| job.id)
    }

    /// Start `request` in the background and return immediately.
    ///
    /// While another request is running this returns [`GlyphcapError::Busy`]
    /// and leaves the running request (and its pending callback) untouched.
    #[instrument(skip_all, fields(request_id = %request.id))]
    pub fn submit(&mut self, request: PipelineRequest) -> Result<RequestId> {
        if !self.state.accepts_submission() {
            warn!(
                running = ?self.in_flight_id().map(|id| id.to_string()),
                "Rejected submission, a request is already in flight"
            );
            return Err(GlyphcapError::Busy);
        }

        let mut session = match self.session.take() {
            Some(session) => session,
            None => {
                info!("Creating OCR session");
                OcrSession::new((self.make_backend)()).with_empty_text_policy(self.empty_text)
            }
        };

        let id = request.id;
        let submitted_at = request.submitted_at;
        let pipeline = self.pipeline.clone();
        let (tx, rx) = oneshot::channel();

        self.runtime.spawn_blocking(move || {
            let outcome = pipeline.run(&mut session, &request);
            // The receiver is gone only if the orchestrator itself was dropped.
            let _ = tx.send((session, outcome));
        });

        self.in_flight = Some(InFlight {
            id,
            submitted_at,
            reply: rx,
        });
        self.state = OrchestratorState::Running;
        info!("Request submitted");
        Ok(id)
    }

    /// Wait for the running request and deliver its result.
    ///
    /// Returns the new terminal state, or `None` if nothing was running.
    pub async fn dispatch(&mut self) -> Option<OrchestratorState> {
        let in_flight = self.in_flight.as_mut()?;
        let reply = (&mut in_flight.reply).await.ok();
        Some(self.finish(reply))
    }

    /// Deliver the running request's result if it is ready.
    ///
    /// Returns `None` when nothing is running or the request is still going.
    pub fn try_dispatch(&mut self) -> Option<OrchestratorState> {
        let in_flight = self.in_flight.as_mut()?;
        let reply = match in_flight.reply.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => None,
        };
        Some(self.finish(reply))
    }

    fn finish(&mut self, reply: Option<Reply<B>>) -> OrchestratorState {
        let in_flight = self.in_flight.take();

        let outcome = match reply {
            Some((session, outcome)) => {
                self.session = Some(session);
                outcome
            }
            None => {
                // Sender dropped without a reply: the task panicked.
                error!("Recognition worker terminated unexpectedly");
                self.session = None;
                Err(GlyphcapError::Recognition(
                    "recognition worker terminated unexpectedly".into(),
                ))
            }
        };

        let result = RecognitionResult::from(outcome);
        self.state = if result.is_text() {
            OrchestratorState::Completed
        } else {
            OrchestratorState::Failed
        };

        if let Some(job) = in_flight {
            let turnaround_ms = (Utc::now() - job.submitted_at).num_milliseconds();
            info!(
                request_id = %job.id,
                state = ?self.state,
                turnaround_ms,
                "Delivering recognition result"
            );
        }

        (self.on_result)(result);
        self.state
    }
}
