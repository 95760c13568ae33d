//! Contract analysis model: what the service returns and how it is presented.

pub mod chain;
pub mod deserializers;
pub mod gate;
pub mod must_know;
pub mod payload;
pub mod report;
pub mod risk;
pub mod service;
pub mod upload;

pub use chain::{StructuredConsequence, render, render_structured};
pub use gate::{DEFAULT_REJECTION, GateDecision, admit};
pub use must_know::{
    Condition, ConsequenceNarrative, ConsequenceRecord, Deadline, Percentage, normalize,
};
pub use payload::{AnalysisResult, Clause, ClauseAnalysis, DocumentClass, PayloadError};
pub use report::{AnalysisReport, ClauseView, DISCLAIMER, MustKnowView};
pub use risk::{PresentationCategory, RiskLevel, RiskOverview, classify};
pub use service::AnalysisClient;
pub use upload::DocumentUpload;
