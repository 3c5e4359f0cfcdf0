use std::time::Duration;

use biapp_core::api_paths;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ureq::http::Response;
use ureq::{Agent, Body};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://biapp-production.up.railway.app/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// AI runs call out to external models and take much longer.
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(120);

const BODY_EXCERPT_CHARS: usize = 300;

/// Connection settings, passed in explicitly by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub ai_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            ai_timeout: DEFAULT_AI_TIMEOUT,
        }
    }
}

/// Shared handle to the backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: Agent,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();

        ApiClient {
            agent: Agent::new_with_config(agent_config),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        api_paths::join(&self.config.base_url, path)
    }

    pub(crate) fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.agent.get(self.url(path));
        for (key, value) in query {
            request = request.query(*key, value);
        }
        let body = read_body("GET", path, request.call())?;
        decode(path, &body)
    }

    pub(crate) fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let result = self.agent.post(self.url(path)).send_json(payload);
        let body = read_body("POST", path, result)?;
        decode(path, &body)
    }

    pub(crate) fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let result = self.agent.put(self.url(path)).send_json(payload);
        let body = read_body("PUT", path, result)?;
        decode(path, &body)
    }

    /// POST without a body. `timeout` replaces the agent's default for this
    /// request only.
    pub(crate) fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        let mut request = self.agent.post(self.url(path));
        if let Some(timeout) = timeout {
            request = request.config().timeout_global(Some(timeout)).build();
        }
        let body = read_body("POST", path, request.send_empty())?;
        decode(path, &body)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<(), ApiError> {
        read_body("DELETE", path, self.agent.delete(self.url(path)).call())?;
        Ok(())
    }
}

fn read_body(
    method: &str,
    path: &str,
    result: Result<Response<Body>, ureq::Error>,
) -> Result<String, ApiError> {
    let transport = |source: ureq::Error| ApiError::Transport {
        path: path.to_string(),
        source,
    };

    let mut response = result.map_err(transport)?;
    let status = response.status();
    let body = response.body_mut().read_to_string().map_err(transport)?;
    debug!(method, path, status = status.as_u16(), "api response");

    if !status.is_success() {
        warn!(method, path, status = status.as_u16(), "api request rejected");
        return Err(ApiError::Status {
            path: path.to_string(),
            code: status.as_u16(),
            body: excerpt(&body),
        });
    }
    Ok(body)
}

/// Decode a response body. An empty body reads as JSON `null`, so callers
/// expecting `()` or `Option<_>` accept `204 No Content`.
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
