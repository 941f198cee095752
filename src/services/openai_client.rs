use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{Result, TravelError};
use crate::services::model::{LanguageModel, ModelRequest, TokenStream};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat-completions client for OpenAI-compatible endpoints.
///
/// Requests are sent once; failures go straight back to the caller.
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: build_http(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bounds connection setup for every call and the whole exchange for
    /// non-streaming calls. Streams may run longer once connected.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.http = build_http(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(&self, request: &ModelRequest, stream: bool) -> Value {
        let mut body = ChatCompletionRequest::new(&self.model, request.wire_messages())
            .with_temperature(request.temperature)
            .with_stream(stream);
        if let Some(format) = request.response_format.to_wire() {
            body = body.with_response_format(format);
        }
        body.into_value()
    }

    async fn send(&self, body: &Value, stream: bool) -> Result<Response> {
        let mut builder = self
            .http
            .post(build_chat_url(&self.base_url))
            .bearer_auth(&self.api_key)
            .json(body);
        if !stream {
            builder = builder.timeout(self.timeout);
        }

        let response = builder.send().await.map_err(|err| transport_error(err, self.timeout))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(TravelError::RateLimit { retry_after });
        }

        let text = response.text().await.unwrap_or_default();
        Err(TravelError::Api {
            status: status.as_u16(),
            message: api_error_message(&text),
        })
    }
}

fn build_http(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> TravelError {
    if err.is_timeout() {
        TravelError::Timeout(format!("no response from model within {timeout:?}"))
    } else {
        TravelError::Http(err)
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl LanguageModel for OpenAIClient {
    async fn complete(&self, request: ModelRequest) -> Result<String> {
        let body = self.request_body(&request, false);
        debug!(target: "voyage::model", model = %self.model, messages = request.messages.len(), "chat completion");

        let response = self.send(&body, false).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| transport_error(err, self.timeout))?;
        let json: Value = serde_json::from_str(&text)?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(TravelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(json
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    async fn stream(&self, request: ModelRequest) -> Result<TokenStream> {
        let body = self.request_body(&request, true);
        debug!(target: "voyage::model", model = %self.model, messages = request.messages.len(), "streaming chat completion");

        let response = self.send(&body, true).await?;
        Ok(sse_deltas(response))
    }
}

/// Content deltas from a chat-completions SSE body.
fn sse_deltas(response: Response) -> TokenStream {
    let deltas = async_stream::stream! {
        let mut bytes = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    yield Err(TravelError::StreamTransport(err.to_string()));
                    return;
                }
            };
            buffer.extend_from_slice(&chunk);

            // Split on raw bytes so multi-byte characters spanning chunks stay intact.
            while let Some(newline) = buffer.iter().position(|byte| *byte == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                match parse_sse_line(String::from_utf8_lossy(&line).trim()) {
                    SseLine::Skip => {}
                    SseLine::Done => return,
                    SseLine::Delta(delta) => yield Ok(delta),
                    SseLine::Error(message) => {
                        yield Err(TravelError::StreamTransport(message));
                        return;
                    }
                }
            }
        }

        if let SseLine::Delta(delta) = parse_sse_line(String::from_utf8_lossy(&buffer).trim()) {
            yield Ok(delta);
        }
    };
    deltas.boxed()
}

#[derive(Debug, PartialEq)]
enum SseLine {
    Skip,
    Done,
    Delta(String),
    Error(String),
}

fn parse_sse_line(line: &str) -> SseLine {
    let Some(data) = line.strip_prefix("data:").map(str::trim) else {
        return SseLine::Skip;
    };
    if data == "[DONE]" {
        return SseLine::Done;
    }

    let event: Value = match serde_json::from_str(data) {
        Ok(event) => event,
        Err(err) => {
            warn!(target: "voyage::model", error = %err, "skipping unreadable stream event");
            return SseLine::Skip;
        }
    };

    if let Some(error) = event.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return SseLine::Error(message);
    }

    match event
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
    {
        Some(delta) if !delta.is_empty() => SseLine::Delta(delta.to_string()),
        _ => SseLine::Skip,
    }
}

pub(crate) fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    temperature: Option<f32>,
    response_format: Option<Value>,
    stream: bool,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            response_format: None,
            stream: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        if self.stream {
            body["stream"] = json!(true);
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_is_appended_once() {
        assert_eq!(
            build_chat_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("http://localhost:1234/chat/completions"),
            "http://localhost:1234/chat/completions"
        );
    }

    #[test]
    fn request_body_reflects_format_and_stream() {
        let client = OpenAIClient::new("key").with_model("gpt-test");
        let request = ModelRequest::new("sys").json().with_temperature(0.2);

        let body = client.request_body(&request, false);
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body.get("stream").is_none());

        let streaming = client.request_body(&ModelRequest::new("sys"), true);
        assert_eq!(streaming["stream"], true);
        assert!(streaming.get("response_format").is_none());
    }

    #[test]
    fn sse_lines_are_classified() {
        assert_eq!(
            parse_sse_line(r#"data: {"choices":[{"delta":{"content":"Hi"}}]}"#),
            SseLine::Delta("Hi".to_string())
        );
        assert_eq!(
            parse_sse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            SseLine::Skip
        );
        assert_eq!(parse_sse_line("data: [DONE]"), SseLine::Done);
        assert_eq!(parse_sse_line(": keep-alive"), SseLine::Skip);
        assert_eq!(parse_sse_line("data: {not json"), SseLine::Skip);
        assert_eq!(
            parse_sse_line(r#"data: {"error":{"message":"overloaded"}}"#),
            SseLine::Error("overloaded".to_string())
        );
    }

    #[test]
    fn api_error_message_prefers_structured_message() {
        assert_eq!(
            api_error_message(r#"{"error":{"message":"bad key"}}"#),
            "bad key"
        );
        assert_eq!(api_error_message("gateway down"), "gateway down");
    }
}
