//! Analysis lifecycle state machine.
//!
//! ```text
//! Idle ──select──▶ ReadyToSubmit ──submit──▶ Submitting ──▶ Displaying
//!                        ▲                       │     └──▶ Rejected
//!                        └───────select──────────┘     └──▶ Failed
//! ```
//!
//! Every selection and every submission takes a fresh [`Generation`]. A
//! response is applied only if it carries the current generation and the
//! machine is still waiting for it; anything else is stale and dropped.

use chrono::{DateTime, Utc};
use clariscan_core::{AnalysisReport, AnalysisResult, DocumentUpload, GateDecision, admit};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Shown for any transport or service failure.
pub const FAILURE_MESSAGE: &str = "Failed to analyze contract. Please try again.";

/// Local validation failures. No request is sent when one of these occurs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please select a PDF file.")]
    NoFileSelected,
    #[error("The selected file is empty.")]
    EmptyFile,
}

/// Monotonic tag for selections and submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// An admitted contract held for display. Only the built report is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Displayed {
    pub file_name: String,
    pub report: AnalysisReport,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    ReadyToSubmit,
    Submitting {
        generation: Generation,
    },
    Displaying(Box<Displayed>),
    Rejected {
        message: String,
    },
    Failed {
        message: String,
    },
}

impl LifecycleState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ReadyToSubmit => "ready_to_submit",
            Self::Submitting { .. } => "submitting",
            Self::Displaying(_) => "displaying",
            Self::Rejected { .. } => "rejected",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

/// A request the caller must now send, tagged with its generation.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub generation: Generation,
    pub upload: DocumentUpload,
}

/// Whether a response changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
pub struct AnalysisLifecycle {
    state: LifecycleState,
    selection: Option<DocumentUpload>,
    current: Generation,
    notice: Option<SubmitError>,
}

impl AnalysisLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn selection(&self) -> Option<&DocumentUpload> {
        self.selection.as_ref()
    }

    /// The last local validation failure, until the next selection or
    /// accepted submission.
    pub fn notice(&self) -> Option<SubmitError> {
        self.notice
    }

    pub fn generation(&self) -> Generation {
        self.current
    }

    /// Choose a file. Drops any held result and orphans any in-flight request.
    pub fn select(&mut self, upload: DocumentUpload) {
        self.current = self.current.next();
        info!(
            file = %upload.file_name,
            bytes = upload.len(),
            generation = self.current.value(),
            "file selected"
        );
        self.selection = Some(upload);
        self.state = LifecycleState::ReadyToSubmit;
        self.notice = None;
    }

    /// Forget the selection and return to `Idle`.
    pub fn clear_selection(&mut self) {
        self.current = self.current.next();
        self.selection = None;
        self.state = LifecycleState::Idle;
        self.notice = None;
    }

    /// Validate the selection and move to `Submitting`.
    ///
    /// A submission while one is already in flight replaces it: the earlier
    /// response will be stale when it arrives.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        let check = match &self.selection {
            None => Err(SubmitError::NoFileSelected),
            Some(upload) if upload.is_empty() => Err(SubmitError::EmptyFile),
            Some(upload) => Ok(upload.clone()),
        };
        let upload = match check {
            Ok(upload) => upload,
            Err(err) => {
                debug!(error = %err, "submission rejected locally");
                self.notice = Some(err);
                return Err(err);
            }
        };

        if let LifecycleState::Submitting { generation } = self.state {
            debug!(
                superseded = generation.value(),
                "replacing in-flight submission"
            );
        }
        self.current = self.current.next();
        self.state = LifecycleState::Submitting {
            generation: self.current,
        };
        self.notice = None;
        Ok(PendingSubmission {
            generation: self.current,
            upload,
        })
    }

    /// Apply a service response for `generation`, routing it through the
    /// document gate. Stale responses leave the state untouched.
    pub fn complete<E>(
        &mut self,
        generation: Generation,
        outcome: Result<AnalysisResult, E>,
    ) -> Completion
    where
        E: std::error::Error,
    {
        let awaiting = matches!(
            self.state,
            LifecycleState::Submitting { generation: g } if g == generation
        );
        if !awaiting {
            warn!(
                generation = generation.value(),
                current = self.current.value(),
                "discarding stale analysis response"
            );
            return Completion::Stale;
        }

        self.state = match outcome {
            Ok(result) => match admit(result) {
                GateDecision::Admitted(result) => {
                    let report = AnalysisReport::build(&result);
                    info!(
                        clauses = report.clauses.len(),
                        overall = report.overview.overall.as_str(),
                        "analysis displayed"
                    );
                    LifecycleState::Displaying(Box::new(Displayed {
                        file_name: self
                            .selection
                            .as_ref()
                            .map(|upload| upload.file_name.clone())
                            .unwrap_or_default(),
                        report,
                        completed_at: Utc::now(),
                    }))
                }
                GateDecision::Rejected(message) => LifecycleState::Rejected { message },
            },
            Err(err) => {
                warn!(error = %err, "analysis request failed");
                LifecycleState::Failed {
                    message: FAILURE_MESSAGE.to_string(),
                }
            }
        };
        Completion::Applied
    }
}
