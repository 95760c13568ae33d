//! Submission lifecycle: file selection, in-flight tracking, terminal states.

pub mod lifecycle;
mod session;

pub use lifecycle::{
    AnalysisLifecycle, Completion, Displayed, FAILURE_MESSAGE, Generation, LifecycleState,
    PendingSubmission, SubmitError,
};
pub use session::Session;
