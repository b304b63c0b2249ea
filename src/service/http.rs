//! reqwest-backed client for the agent service REST API.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use async_trait::async_trait;

use super::types::{
    Agent, AgentDefinition, CreateMessageRequest, MessageList, MessageRole, Run,
    SubmitToolOutputsRequest, Thread, ThreadMessage, ToolOutput,
};
use super::AgentsService;
use crate::config::{AgentConfig, Credential};
use crate::error::{AgentError, ErrorCode, ErrorDetails, Result};
use crate::util::retry::RetryPolicy;

const MESSAGE_PAGE_SIZE: &str = "100";

/// HTTP client for one project endpoint.
///
/// Owns its connection pool and credential; drop it to release both.
pub struct AgentsClient {
    http: reqwest::Client,
    endpoint: String,
    api_version: String,
    headers: HeaderMap,
    retry: RetryPolicy,
}

impl std::fmt::Debug for AgentsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentsClient")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl AgentsClient {
    /// Validate `config`, resolve its credential and build the client.
    pub fn new(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        let credential = config.resolve_credential()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            headers: auth_headers(&credential)?,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy used for idempotent requests.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.endpoint, path);
        debug!(%method, %url, "agent service request");
        self.http
            .request(method, url)
            .headers(self.headers.clone())
            .query(&[("api-version", self.api_version.as_str())])
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = check_status(request.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(self.request(reqwest::Method::POST, path).json(body))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        self.retry
            .execute(|| self.send_json(self.request(reqwest::Method::GET, path).query(query)))
            .await
    }
}

fn auth_headers(credential: &Credential) -> Result<HeaderMap> {
    let (name, value) = credential.header();
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let mut value = HeaderValue::from_str(&value).map_err(|_| {
        AgentError::Configuration("Credential contains characters not allowed in a header".into())
    })?;
    value.set_sensitive(true);
    headers.insert(HeaderName::from_static(name), value);
    Ok(headers)
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let retry_after = retry_after_ms(resp.headers());
    let body = resp.text().await.unwrap_or_default();
    Err(status_to_error(status.as_u16(), &body, retry_after))
}

/// `Retry-After` in milliseconds. Values too large to represent are ignored.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .and_then(|secs| secs.checked_mul(1000))
}

/// Map a non-success HTTP status and body to an error.
pub fn status_to_error(status: u16, body: &str, retry_after_ms: Option<u64>) -> AgentError {
    let parsed = parse_error_body(body);
    let message = parsed
        .as_ref()
        .map(|(message, _)| message.clone())
        .unwrap_or_else(|| body.to_string());
    match status {
        401 | 403 => AgentError::Authentication(message),
        429 => AgentError::RateLimited { retry_after_ms },
        _ => match parsed {
            Some((message, details)) => AgentError::api_with_details(status, message, details),
            None => AgentError::api(status, message),
        },
    }
}

fn parse_error_body(body: &str) -> Option<(String, ErrorDetails)> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    let message = error.get("message")?.as_str()?.to_string();
    let service_code = error
        .get("code")
        .and_then(|c| c.as_str())
        .map(str::to_string);
    let code = service_code
        .as_deref()
        .and_then(|c| serde_json::from_value::<ErrorCode>(serde_json::json!(c.to_ascii_lowercase())).ok());
    Some((
        message,
        ErrorDetails {
            code,
            service_code,
            param: error
                .get("param")
                .and_then(|p| p.as_str())
                .map(str::to_string),
            request_id: None,
        },
    ))
}

#[async_trait]
impl AgentsService for AgentsClient {
    async fn create_agent(&self, definition: &AgentDefinition) -> Result<Agent> {
        self.post("assistants", definition).await
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        let path = format!("assistants/{agent_id}");
        let path = path.as_str();
        self.retry
            .execute(|| async move {
                check_status(
                    self.request(reqwest::Method::DELETE, path)
                        .send()
                        .await?,
                )
                .await?;
                Ok::<_, AgentError>(())
            })
            .await
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.post("threads", &serde_json::json!({})).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage> {
        self.post(
            &format!("threads/{thread_id}/messages"),
            &CreateMessageRequest { role, content },
        )
        .await
    }

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        self.post(
            &format!("threads/{thread_id}/runs"),
            &serde_json::json!({ "assistant_id": agent_id }),
        )
        .await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get(&format!("threads/{thread_id}/runs/{run_id}"), &[])
            .await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.post(
            &format!("threads/{thread_id}/runs/{run_id}/cancel"),
            &serde_json::json!({}),
        )
        .await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        self.post(
            &format!("threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
            &SubmitToolOutputsRequest {
                tool_outputs: outputs,
            },
        )
        .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let path = format!("threads/{thread_id}/messages");
        let mut messages = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let mut query = vec![("order", "asc"), ("limit", MESSAGE_PAGE_SIZE)];
            if let Some(cursor) = after.as_deref() {
                query.push(("after", cursor));
            }
            let page: MessageList = self.get(&path, &query).await?;
            let next = page
                .last_id
                .clone()
                .or_else(|| page.data.last().map(|m| m.id.clone()));
            messages.extend(page.data);
            match next {
                Some(cursor) if page.has_more => {
                    if after.as_deref() == Some(cursor.as_str()) {
                        warn!(thread_id, cursor = %cursor, "Message cursor did not advance");
                        break;
                    }
                    after = Some(cursor);
                }
                _ => break,
            }
        }
        Ok(messages)
    }

    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>> {
        let path = format!("files/{file_id}/content");
        let path = path.as_str();
        self.retry
            .execute(|| async move {
                let resp = check_status(
                    self.request(reqwest::Method::GET, path)
                        .send()
                        .await?,
                )
                .await?;
                Ok::<_, AgentError>(resp.bytes().await?.to_vec())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication_with_service_message() {
        let body = r#"{"error":{"code":"PermissionDenied","message":"Principal lacks access"}}"#;

        let err = status_to_error(401, body, None);

        assert!(matches!(err, AgentError::Authentication(msg) if msg == "Principal lacks access"));
    }

    #[test]
    fn too_many_requests_keeps_retry_after() {
        let err = status_to_error(429, "slow down", Some(3000));

        assert!(matches!(
            err,
            AgentError::RateLimited {
                retry_after_ms: Some(3000)
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn retry_after_header_is_converted_to_millis() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static(" 7 "));

        assert_eq!(retry_after_ms(&headers), Some(7000));
    }

    #[test]
    fn oversized_retry_after_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("18446744073709552"));

        assert_eq!(retry_after_ms(&headers), None);
    }

    #[test]
    fn non_numeric_retry_after_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );

        assert_eq!(retry_after_ms(&headers), None);
    }

    #[test]
    fn structured_body_populates_details() {
        let body = r#"{"error":{"code":"not_found","message":"No assistant found","param":"assistant_id"}}"#;

        let err = status_to_error(404, body, None);

        match err {
            AgentError::Api {
                status,
                message,
                details: Some(details),
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "No assistant found");
                assert_eq!(details.code, Some(ErrorCode::NotFound));
                assert_eq!(details.param.as_deref(), Some("assistant_id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_body_is_kept_verbatim() {
        let err = status_to_error(502, "Bad Gateway", None);

        assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");
        assert!(err.is_retryable());
    }
}
