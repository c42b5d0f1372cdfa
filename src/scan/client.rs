// src/scan/client.rs
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ThreatScopeError, ThreatScopeResult};
use crate::utils::HttpClient;
use super::model::{DeepScanResult, ScanCategory, ScanRequest, ScanResult};

/// Remote scanning API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanApi: Send + Sync {
    /// Run a single-category scan
    async fn scan_primary(&self, target: &str, scan_type: ScanCategory) -> ThreatScopeResult<ScanResult>;

    /// Run a multi-category deep scan
    async fn scan_deep(&self, target: &str, scan_types: &[ScanCategory]) -> ThreatScopeResult<DeepScanResult>;
}

/// HTTP implementation of [`ScanApi`]. One POST per call, no retries.
#[derive(Clone)]
pub struct ScanClient {
    http: HttpClient,
    base_url: Url,
}

impl ScanClient {
    pub fn new(http: HttpClient, base_url: &str) -> ThreatScopeResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ThreatScopeError::ConfigError(format!("Invalid API base URL {}: {}", base_url, e)))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ThreatScopeError::ConfigError(
                format!("Unsupported API URL scheme: {}", base_url.scheme())
            ));
        }

        Ok(Self { http, base_url })
    }

    /// Build a client from the `[api]` configuration section
    pub fn from_config(api: &ApiConfig) -> ThreatScopeResult<Self> {
        let http = HttpClient::new(api.user_agent.clone(), Some(api.timeout_seconds))?;
        Self::new(http, &api.base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for a request
    pub fn endpoint(&self, request: &ScanRequest) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), request.path())
    }

    async fn execute<T: DeserializeOwned>(&self, request: &ScanRequest) -> ThreatScopeResult<T> {
        let url = self.endpoint(request);
        debug!("Sending scan request for {} to {}", request.target(), url);

        let response = self.http.post_json(&url, &request.body()).await
            .map_err(|e| ThreatScopeError::request(format!("{:#}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThreatScopeError::request(format!("{} returned {}", url, status)));
        }

        let body = response.json::<Value>().await
            .map_err(|e| ThreatScopeError::request(format!("Invalid response from {}: {}", url, e)))?;

        decode_body(&url, body)
    }
}

/// Only a JSON object is a scan payload; arrays would otherwise fill fields by position
fn decode_body<T: DeserializeOwned>(url: &str, body: Value) -> ThreatScopeResult<T> {
    if !body.is_object() {
        return Err(ThreatScopeError::request(format!("Response from {} is not a JSON object", url)));
    }

    serde_json::from_value(body)
        .map_err(|e| ThreatScopeError::request(format!("Invalid response from {}: {}", url, e)))
}

#[async_trait]
impl ScanApi for ScanClient {
    async fn scan_primary(&self, target: &str, scan_type: ScanCategory) -> ThreatScopeResult<ScanResult> {
        let request = ScanRequest::Primary {
            target: target.to_string(),
            scan_type,
        };
        self.execute(&request).await
    }

    async fn scan_deep(&self, target: &str, scan_types: &[ScanCategory]) -> ThreatScopeResult<DeepScanResult> {
        let request = ScanRequest::Deep {
            target: target.to_string(),
            scan_types: scan_types.to_vec(),
        };
        self.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn client(base_url: &str) -> ScanClient {
        let http = HttpClient::new(None, Some(2)).unwrap();
        ScanClient::new(http, base_url).unwrap()
    }

    #[test]
    fn test_endpoints_join_base_url() {
        let primary = ScanRequest::Primary {
            target: "example.com".to_string(),
            scan_type: ScanCategory::Threat,
        };
        let deep = ScanRequest::Deep {
            target: "example.com".to_string(),
            scan_types: vec![ScanCategory::Domain],
        };

        let local = client("http://localhost:5000/api");
        assert_eq!(local.endpoint(&primary), "http://localhost:5000/api/scan/threat");
        assert_eq!(local.endpoint(&deep), "http://localhost:5000/api/deep-scan");

        let trailing = client("https://scanner.example.org/api/");
        assert_eq!(trailing.endpoint(&primary), "https://scanner.example.org/api/scan/threat");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let http = HttpClient::new(None, None).unwrap();
        assert!(matches!(
            ScanClient::new(http.clone(), "not a url"),
            Err(ThreatScopeError::ConfigError(_))
        ));
        assert!(matches!(
            ScanClient::new(http, "ftp://example.com/api"),
            Err(ThreatScopeError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let client = client("http://127.0.0.1:9/api");
        let result = client.scan_primary("example.com", ScanCategory::Threat).await;
        assert!(matches!(result, Err(ThreatScopeError::RequestError(Some(_)))));
    }

    #[test]
    fn test_array_bodies_are_rejected() {
        let url = "http://localhost:5000/api/scan/threat";

        let empty = decode_body::<ScanResult>(url, json!([]));
        assert!(matches!(empty, Err(ThreatScopeError::RequestError(Some(_)))));

        let positional = decode_body::<ScanResult>(url, json!(["high", 87, "x"]));
        assert!(matches!(positional, Err(ThreatScopeError::RequestError(Some(_)))));

        let deep = decode_body::<DeepScanResult>(url, json!([]));
        assert!(matches!(deep, Err(ThreatScopeError::RequestError(Some(_)))));

        let object = decode_body::<ScanResult>(url, json!({"threatLevel": "high"})).unwrap();
        assert_eq!(object.threat_level.as_deref(), Some("high"));
    }

    /// Answers a single HTTP request with a canned response and hands back the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (format!("http://{}/api", addr), rx)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..head_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        text.len() >= head_end + 4 + length
    }

    fn request_body(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_error_status_is_request_error() {
        let (base_url, request) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let result = client(&base_url).scan_primary("example.com", ScanCategory::Threat).await;
        match result {
            Err(ThreatScopeError::RequestError(Some(message))) => assert!(message.contains("500")),
            other => panic!("expected request error, got {:?}", other),
        }

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /api/scan/threat "));
        assert_eq!(request_body(&request), json!({"target": "example.com"}));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_request_error() {
        let (base_url, request) = serve_once("200 OK", "definitely not json").await;

        let result = client(&base_url)
            .scan_deep("a@example.com", &[ScanCategory::Email, ScanCategory::Breach])
            .await;
        assert!(matches!(result, Err(ThreatScopeError::RequestError(Some(_)))));

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /api/deep-scan "));
        assert_eq!(
            request_body(&request),
            json!({"target": "a@example.com", "scan_types": ["email", "breach"]})
        );
    }

    #[tokio::test]
    async fn test_array_response_is_request_error() {
        let (base_url, _request) = serve_once("200 OK", "[]").await;

        let result = client(&base_url).scan_deep("example.com", &[ScanCategory::Domain]).await;
        assert!(matches!(result, Err(ThreatScopeError::RequestError(Some(_)))));
    }

    #[tokio::test]
    async fn test_object_response_is_parsed() {
        let (base_url, _request) = serve_once("200 OK", r#"{"threatLevel":"medium","confidence":64}"#).await;

        let result = client(&base_url).scan_primary("example.com", ScanCategory::Threat).await.unwrap();
        assert_eq!(result.threat_level.as_deref(), Some("medium"));
        assert_eq!(result.confidence, Some(64.0));
    }
}
