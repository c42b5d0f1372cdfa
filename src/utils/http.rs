// src/utils/http.rs
use std::time::Duration;
use anyhow::{Result, Context};
use reqwest::{Client, Response, header};
use serde::Serialize;
use tracing::debug;

/// HTTP client for making requests
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(user_agent: Option<String>, timeout_secs: Option<u64>) -> Result<Self> {
        let user_agent = user_agent
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or_else(|| format!("threatscope/{}", env!("CARGO_PKG_VERSION")));
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(30));
        
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .context("Failed to create HTTP client")?;
        
        Ok(Self { client, user_agent })
    }
    
    /// Make a POST request with JSON body
    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, data: &T) -> Result<Response> {
        debug!("POST {}", url);
        
        self.client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(data)
            .send()
            .await
            .context(format!("Failed to POST to {}", url))
    }
    
    /// Get the user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
