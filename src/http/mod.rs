// src/http/mod.rs

//! The REST half of the client: one authenticated request executor.
//!
//! Entity helpers on [`Client`](crate::client::Client) build an [`ApiRequest`]
//! and hand it here; this module owns auth, the JSON codec, and error mapping
//! and nothing else. There is no retry or rate-limit layer.

use crate::config::ClientConfig;
use crate::errors::ParlanceError;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Sent on every request so the platform can attribute traffic.
const USER_AGENT: &str = concat!("parlance/", env!("CARGO_PKG_VERSION"));

/// One REST call: method, path relative to the API base, optional query
/// pairs, optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ParlanceError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The platform's error body shape for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Authenticated request executor bound to one API base URL.
#[derive(Debug, Clone)]
pub struct Http {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl Http {
    pub fn new(config: &ClientConfig) -> Result<Self, ParlanceError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Executes a request and decodes the JSON response body.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ParlanceError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Executes a request whose success response carries no body.
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<(), ParlanceError> {
        self.send(request).await.map(drop)
    }

    async fn send(&self, request: ApiRequest) -> Result<reqwest::Response, ParlanceError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            request.path.trim_start_matches('/')
        );
        debug!(method = %request.method, %url, "api request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .bearer_auth(&self.token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }
}

/// Maps a non-2xx response to [`ParlanceError::Api`], salvaging the
/// platform's structured error body when one is present.
fn api_error(status: StatusCode, body: &str) -> ParlanceError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.code.is_empty() || !parsed.message.is_empty() => {
            ParlanceError::Api {
                status: status.as_u16(),
                code: parsed.code,
                message: parsed.message,
            }
        }
        _ => ParlanceError::Api {
            status: status.as_u16(),
            code: String::new(),
            message: body.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_error_body_keeps_code_and_message() {
        let error = api_error(
            StatusCode::FORBIDDEN,
            r#"{"code":"ForbiddenError","message":"missing permission"}"#,
        );
        assert_eq!(
            error,
            ParlanceError::Api {
                status: 403,
                code: "ForbiddenError".to_string(),
                message: "missing permission".to_string(),
            }
        );
    }

    #[test]
    fn unstructured_error_body_becomes_the_message() {
        let error = api_error(StatusCode::BAD_GATEWAY, "upstream unavailable\n");
        assert_eq!(
            error,
            ParlanceError::Api {
                status: 502,
                code: String::new(),
                message: "upstream unavailable".to_string(),
            }
        );
    }

    #[test]
    fn request_builder_collects_query_pairs() {
        let request = ApiRequest::get("servers/abc/members")
            .query("limit", "10")
            .query("after", "xyz");
        assert_eq!(request.path(), "servers/abc/members");
        assert_eq!(request.query.len(), 2);
    }
}
