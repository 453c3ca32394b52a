// HTTP implementation of the agent bridge transport

use async_trait::async_trait;
use colloquy_types::{ClearHistoryResponse, HealthReport, HistorySnapshot};
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::traits::{AgentClient, ByteStream, ChatRequest};

/// Agent bridge client (plain HTTP, chunked responses)
pub struct HttpAgentClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAgentClient {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        if config.normalized_base_url().is_empty() {
            return Err(AgentError::Config("agent base_url is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: config.normalized_base_url().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(AgentError::Status { status, body })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn chat_stream(&self, thread_id: &str, request: &ChatRequest) -> Result<ByteStream> {
        let response = self
            .http_client
            .post(self.url(&format!("/chat_agent/{}/stream", thread_id)))
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(AgentError::from));
        Ok(Box::pin(body))
    }

    async fn history(&self, thread_id: &str, limit: u32) -> Result<HistorySnapshot> {
        let response = self
            .http_client
            .get(self.url(&format!("/chat_agent/{}/history", thread_id)))
            .query(&[("limit", limit)])
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn clear_history(&self, thread_id: &str) -> Result<ClearHistoryResponse> {
        let response = self
            .http_client
            .delete(self.url(&format!("/threads/{}", thread_id)))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthReport> {
        let response = self.http_client.get(self.url("/health")).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_base_url() {
        let result = HttpAgentClient::new(&AgentConfig::new("/"));
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_url_join_strips_trailing_slash() {
        let client = HttpAgentClient::new(&AgentConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(
            client.url("/chat_agent/1_abc/stream"),
            "http://localhost:8000/chat_agent/1_abc/stream"
        );
    }
}
