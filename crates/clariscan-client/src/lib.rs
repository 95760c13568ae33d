//! Transport to the analysis service: multipart upload over HTTP.

mod config;
pub use config::ClientConfig;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ClientError, HealthStatus, HttpAnalysisClient};
