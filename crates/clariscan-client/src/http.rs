//! HTTP client for the analysis service's `/analyze` and health endpoints.

use async_trait::async_trait;
use clariscan_core::{AnalysisClient, AnalysisResult, DocumentUpload, PayloadError};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::ClientConfig;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("unusable analysis payload: {0}")]
    Payload(#[from] PayloadError),
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub engine: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

pub struct HttpAnalysisClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpAnalysisClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Probe the service root.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.config.health_url();
        info!(url = %url, "checking analysis service health");
        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json().await?)
    }

    /// Upload one document as the multipart field `file`.
    pub async fn upload(&self, upload: &DocumentUpload) -> Result<AnalysisResult, ClientError> {
        let url = self.config.analyze_url();
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("file", part);

        info!(url = %url, file = %upload.file_name, bytes = upload.len(), "uploading document");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = ensure_success(resp).await?;

        let body = resp.bytes().await?;
        let result = AnalysisResult::from_slice(&body)?;
        info!(
            document_type = result.document_type.as_str(),
            clauses = result.clauses.len(),
            "analysis received"
        );
        Ok(result)
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    type Error = ClientError;

    async fn analyze(&self, upload: &DocumentUpload) -> Result<AnalysisResult, ClientError> {
        self.upload(upload).await
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Server {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clariscan_core::DocumentClass;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(base_url: &str) -> HttpAnalysisClient {
        HttpAnalysisClient::new(ClientConfig::new(base_url)).unwrap()
    }

    #[tokio::test]
    async fn analyze_posts_multipart_and_parses_body() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"document_type":"contract","clauses":[{"clause_text":"1. Fees","analysis":{"risk_level":"High"}}]}"#,
        )
        .await;

        let upload = DocumentUpload::new("lease.pdf", b"%PDF-1.7".to_vec());
        let result = client(&base).analyze(&upload).await.unwrap();
        assert_eq!(result.document_type, DocumentClass::Contract);
        assert_eq!(result.clauses.len(), 1);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /analyze "));
        assert!(request.contains("multipart/form-data"));
        assert!(request.contains(r#"name="file"; filename="lease.pdf""#));
        assert!(request.contains("Content-Type: application/pdf"));
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let upload = DocumentUpload::new("lease.pdf", b"%PDF".to_vec());
        let err = client(&base).analyze(&upload).await.unwrap_err();
        match err {
            ClientError::Server { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected server error, got {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unparseable_body_is_payload_error() {
        let (base, server) = serve_once("200 OK", "[1, 2, 3]").await;
        let upload = DocumentUpload::new("lease.pdf", b"%PDF".to_vec());
        let err = client(&base).analyze(&upload).await.unwrap_err();
        assert!(matches!(err, ClientError::Payload(PayloadError::NotAnObject)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn health_probe() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"status":"ok","service":"ClariScan AI","engine":"deterministic-rule-engine"}"#,
        )
        .await;
        let health = client(&base).health().await.unwrap();
        assert!(health.is_ok());
        assert_eq!(health.service, "ClariScan AI");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET / "));
    }

    #[test]
    fn health_status_tolerates_missing_fields() {
        let health: HealthStatus = serde_json::from_str(r#"{"status":"degraded"}"#).unwrap();
        assert!(!health.is_ok());
        assert!(health.engine.is_empty());
    }
}
