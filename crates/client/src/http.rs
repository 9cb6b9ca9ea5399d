//! Generic request primitive: one request in, one response out.
//!
//! A backend reports every HTTP status as `Ok`; only failures to obtain a
//! response at all (connection refused, DNS, body read) are errors. Status
//! classification happens in [`ApiResponse::error_for_status`].

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::endpoints;
use crate::error::ApiError;

/// One outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `/api/lessons/`.
    pub path: String,
    pub body: Option<Value>,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether this request targets the credential-renewal endpoint.
    pub fn is_refresh(&self) -> bool {
        self.path.ends_with(endpoints::TOKEN_REFRESH)
    }

    /// Whether this request has already been re-issued after a refresh.
    pub fn retried(&self) -> bool {
        self.retried
    }

    /// Same target, method and body, marked as the one allowed retry.
    pub(crate) fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }
}

/// A response as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub path: String,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            path: path.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Turn non-2xx statuses into errors; 401 becomes [`ApiError::Unauthorized`].
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            return Ok(self);
        }

        if self.status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized { path: self.path });
        }

        Err(ApiError::Status {
            status: self.status.as_u16(),
            body: self.text(),
            path: self.path,
        })
    }
}

/// The request primitive the authenticated transport wraps.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// `reqwest` backend with a cookie jar holding the session credential.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    api_url: String,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.api_url, request.path);
        let mut req = self.client.request(request.method.clone(), &url);

        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(ApiResponse::new(status, request.path.clone(), body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_endpoint_is_recognised_by_suffix() {
        assert!(ApiRequest::post("/api/token/refresh/").is_refresh());
        assert!(ApiRequest::post("http://localhost/api/token/refresh/").is_refresh());
        assert!(!ApiRequest::get("/api/lessons/").is_refresh());
        assert!(!ApiRequest::post("/api/token/login/").is_refresh());
    }

    #[test]
    fn retry_keeps_target_method_and_body() {
        let original = ApiRequest::patch("/api/user/me/").with_json(serde_json::json!({"username": "x"}));
        let retry = original.clone().into_retry();
        assert!(retry.retried());
        assert!(!original.retried());
        assert_eq!(retry.method, original.method);
        assert_eq!(retry.path, original.path);
        assert_eq!(retry.body, original.body);
    }

    #[test]
    fn statuses_are_classified() {
        let ok = ApiResponse::new(StatusCode::OK, "/a/", b"{}".to_vec());
        assert!(ok.error_for_status().is_ok());

        let unauthorized = ApiResponse::new(StatusCode::UNAUTHORIZED, "/a/", Vec::new());
        assert_eq!(
            unauthorized.error_for_status(),
            Err(ApiError::Unauthorized { path: "/a/".to_string() })
        );

        let missing = ApiResponse::new(StatusCode::NOT_FOUND, "/a/", b"gone".to_vec());
        assert_eq!(
            missing.error_for_status(),
            Err(ApiError::Status {
                status: 404,
                path: "/a/".to_string(),
                body: "gone".to_string()
            })
        );
    }

    #[test]
    fn json_body_decodes() {
        let resp = ApiResponse::new(StatusCode::OK, "/api/lessons/", br#"{"items": []}"#.to_vec());
        let value: Value = resp.json().unwrap();
        assert_eq!(value, serde_json::json!({"items": []}));
    }
}
