//! HTTP client for NVIDIA's OpenAI-compatible endpoints.

use crate::error::{ApiError, ApiResult};
use crate::types::*;
use bscforge_config::ApiConfig;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Client for the hosted embedding and chat-completion endpoints.
#[derive(Clone)]
pub struct NvidiaClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl NvidiaClient {
    /// Create a new client from configuration. A missing API key is not an
    /// error here; it surfaces as a 401 on the first call.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        })
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(url);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.trim());
        }
        builder
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection {
                host: self.base_url.clone(),
            }
        } else if e.is_timeout() {
            ApiError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            ApiError::Http(e)
        }
    }

    /// Check if the API is reachable with the configured credentials.
    /// Sends a minimal embedding request and reports success.
    pub async fn is_available(&self, embedding_model: &str) -> bool {
        self.embed(embedding_model, "ping").await.is_ok()
    }

    /// Generate an embedding for one text.
    pub async fn embed(&self, model: &str, text: &str) -> ApiResult<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);
        debug!("Embedding {} chars with model {}", text.len(), model);

        let request = EmbeddingRequest {
            model: model.to_string(),
            input: vec![text.to_string()],
        };

        let response = self
            .request(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await?;
        let embedding = embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ApiError::ParseError("empty embeddings response".to_string()))?;

        info!("Generated embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }

    /// Start a streaming chat completion.
    ///
    /// Returns a channel receiver that yields [`StreamEvent`]s. The stream
    /// ends when the sender closes; a [`StreamEvent::Failed`] is the last
    /// event on mid-stream failure. Dropping the receiver cancels the
    /// stream.
    pub async fn chat_stream(&self, request: ChatRequest) -> ApiResult<mpsc::Receiver<StreamEvent>> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Starting streaming generation with model {}", request.model);

        let request = request.with_stream(true);

        let response = self
            .request(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let (tx, rx) = mpsc::channel(100);

        // Read the SSE body on a separate task; events drain through the channel.
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut line_buf = String::new();

            while let Some(chunk_result) = stream.next().await {
                match chunk_result {
                    Ok(bytes) => {
                        line_buf.push_str(&String::from_utf8_lossy(&bytes));

                        // SSE lines may split across network chunks; only
                        // process lines that are complete.
                        while let Some(pos) = line_buf.find('\n') {
                            let line: String = line_buf.drain(..=pos).collect();
                            match parse_sse_line(line.trim_end()) {
                                Some(SseLine::Done) => return,
                                Some(SseLine::Chunk(chunk)) => {
                                    for event in chunk_events(chunk) {
                                        if tx.send(event).await.is_err() {
                                            return; // Receiver dropped
                                        }
                                    }
                                }
                                None => {}
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Stream error: {}", e);
                        let _ = tx.send(StreamEvent::Failed(e.to_string())).await;
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }
}

/// A parsed server-sent-events line.
enum SseLine {
    Done,
    Chunk(ChatStreamChunk),
}

/// Parse one SSE line into its payload. Non-data lines and unparseable
/// payloads yield `None`.
fn parse_sse_line(line: &str) -> Option<SseLine> {
    let data = line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:"))?;
    let data = data.trim();

    if data.is_empty() {
        return None;
    }
    if data == "[DONE]" {
        return Some(SseLine::Done);
    }

    match serde_json::from_str::<ChatStreamChunk>(data) {
        Ok(chunk) => Some(SseLine::Chunk(chunk)),
        Err(e) => {
            warn!("Failed to parse stream chunk: {}", e);
            None
        }
    }
}

/// Extract stream events from a parsed chunk. Reasoning precedes content
/// when both appear in one delta.
fn chunk_events(chunk: ChatStreamChunk) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    for choice in chunk.choices {
        if let Some(reasoning) = choice.delta.reasoning_content {
            if !reasoning.is_empty() {
                events.push(StreamEvent::Reasoning(reasoning));
            }
        }
        if let Some(content) = choice.delta.content {
            if !content.is_empty() {
                events.push(StreamEvent::Content(content));
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ApiConfig::default();
        let client = NvidiaClient::from_config(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_chat_request_builder() {
        let request = ChatRequest::new("deepseek-ai/deepseek-v3.1", "Model this protocol.")
            .with_temperature(0.2)
            .with_top_p(0.7)
            .with_max_tokens(8192)
            .with_thinking();

        assert_eq!(request.model, "deepseek-ai/deepseek-v3.1");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert_eq!(request.temperature, Some(0.2));
        assert!(request.chat_template_kwargs.is_some());
    }

    #[test]
    fn test_parse_sse_done() {
        assert!(matches!(parse_sse_line("data: [DONE]"), Some(SseLine::Done)));
        assert!(parse_sse_line(": keep-alive comment").is_none());
        assert!(parse_sse_line("").is_none());
    }

    #[test]
    fn test_parse_sse_content_chunk() {
        let line = r#"data: {"choices":[{"delta":{"content":"val x"},"finish_reason":null}]}"#;
        match parse_sse_line(line) {
            Some(SseLine::Chunk(chunk)) => {
                let events = chunk_events(chunk);
                assert_eq!(events, vec![StreamEvent::Content("val x".to_string())]);
            }
            _ => panic!("expected a chunk"),
        }
    }

    #[test]
    fn test_parse_sse_reasoning_chunk() {
        let line = r#"data: {"choices":[{"delta":{"reasoning_content":"thinking about agents"}}]}"#;
        match parse_sse_line(line) {
            Some(SseLine::Chunk(chunk)) => {
                let events = chunk_events(chunk);
                assert_eq!(
                    events,
                    vec![StreamEvent::Reasoning("thinking about agents".to_string())]
                );
            }
            _ => panic!("expected a chunk"),
        }
    }

    #[test]
    fn test_reasoning_precedes_content_in_one_delta() {
        let line =
            r#"data: {"choices":[{"delta":{"content":"object ","reasoning_content":"done"}}]}"#;
        match parse_sse_line(line) {
            Some(SseLine::Chunk(chunk)) => {
                let events = chunk_events(chunk);
                assert_eq!(
                    events,
                    vec![
                        StreamEvent::Reasoning("done".to_string()),
                        StreamEvent::Content("object ".to_string()),
                    ]
                );
            }
            _ => panic!("expected a chunk"),
        }
    }
}
