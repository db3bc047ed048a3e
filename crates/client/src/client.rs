use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use landacq_auth::LoginGrant;
use landacq_core::DomainError;

use crate::{ClientConfig, ClientError};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const UNREAD_MESSAGES_PATH: &str = "/api/messages/unread-count";
pub const UNREAD_NOTIFICATIONS_PATH: &str = "/api/notifications/unread/count";
pub const PENDING_USERS_PATH: &str = "/api/auth/users/pending";
pub const PENDING_PROJECTS_PATH: &str = "/api/projects/pending";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Backend HTTP client.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl BackendClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// The one place requests are built. A token, when present, is always
    /// sent as `Authorization: Bearer`.
    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let req = self.http.request(method, url);
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Exchange credentials for a session grant.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ClientError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(DomainError::validation("email is required").into());
        }
        if password.is_empty() {
            return Err(DomainError::validation("password is required").into());
        }

        let req = self
            .request(Method::POST, LOGIN_PATH, None)
            .json(&Credentials { email, password });
        let grant: LoginGrant = self.send(req).await?;

        if grant.token.trim().is_empty() {
            return Err(ClientError::Parse("login response carried an empty token".to_string()));
        }
        tracing::info!(role = grant.role.as_deref().unwrap_or("<none>"), "login accepted");
        Ok(grant)
    }

    pub async fn unread_messages(&self, token: &str) -> Result<u32, ClientError> {
        self.get_count(UNREAD_MESSAGES_PATH, token, |body| count_field(body, "unreadCount"))
            .await
    }

    pub async fn unread_notifications(&self, token: &str) -> Result<u32, ClientError> {
        self.get_count(UNREAD_NOTIFICATIONS_PATH, token, |body| count_field(body, "count"))
            .await
    }

    pub async fn pending_users(&self, token: &str) -> Result<u32, ClientError> {
        self.get_count(PENDING_USERS_PATH, token, listing_len).await
    }

    pub async fn pending_projects(&self, token: &str) -> Result<u32, ClientError> {
        self.get_count(PENDING_PROJECTS_PATH, token, listing_len).await
    }

    async fn get_count(
        &self,
        path: &str,
        token: &str,
        extract: impl FnOnce(&Value) -> u32,
    ) -> Result<u32, ClientError> {
        let body: Value = self.send(self.request(Method::GET, path, Some(token))).await?;
        let count = extract(&body);
        tracing::debug!(path, count, "fetched count");
        Ok(count)
    }
}

async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api(status.as_u16(), body))
}

/// Numeric field of a count payload; absent or non-numeric counts as zero.
fn count_field(body: &Value, field: &str) -> u32 {
    body.get(field)
        .and_then(Value::as_u64)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Length of a listing payload. Accepts a bare array or a `{ "count": n }`
/// summary; anything else counts as zero.
fn listing_len(body: &Value) -> u32 {
    match body {
        Value::Array(items) => u32::try_from(items.len()).unwrap_or(u32::MAX),
        other => count_field(other, "count"),
    }
}
