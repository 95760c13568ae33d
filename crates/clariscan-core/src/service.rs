//! The seam to the external analysis service.

use async_trait::async_trait;

use crate::payload::AnalysisResult;
use crate::upload::DocumentUpload;

/// Anything that can turn an uploaded document into an [`AnalysisResult`].
///
/// Every error is treated alike by callers: a generic failure.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn analyze(&self, upload: &DocumentUpload) -> Result<AnalysisResult, Self::Error>;
}
