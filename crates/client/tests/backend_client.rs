use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use landacq_auth::{Role, decode_claims};
use landacq_client::{BackendClient, ClientConfig, ClientError, UnreadCountSource};
use landacq_navigation::BadgeKind;

const SECRET: &str = "test-secret";

#[derive(Debug, Serialize, Deserialize)]
struct BackendClaims {
    id: u64,
    role: String,
    iat: i64,
    exp: i64,
}

fn mint_jwt(role: Role) -> String {
    let now = Utc::now();
    let claims = BackendClaims {
        id: 17,
        role: role.as_str().to_string(),
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Rejects requests without a verifiable bearer token.
fn authorize(headers: &HeaderMap) -> Result<BackendClaims, (StatusCode, Json<Value>)> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or((StatusCode::UNAUTHORIZED, Json(json!({ "error": "missing token" }))))?;
    jsonwebtoken::decode::<BackendClaims>(
        token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid token" }))))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "ce@landacq.test" && body["password"] == "hunter2" {
        let token = mint_jwt(Role::ChiefEngineer);
        (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful",
                "token": token,
                "role": "chief_engineer",
                "user": { "id": 17, "firstName": "Nimal", "lastName": "Perera", "email": "ce@landacq.test" }
            })),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid credentials" })))
    }
}

async fn unread_messages(headers: HeaderMap) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    authorize(&headers)?;
    Ok(Json(json!({ "unreadCount": 4 })))
}

async fn unread_notifications(headers: HeaderMap) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    authorize(&headers)?;
    // Some deployments omit the field when there is nothing unread.
    Ok(Json(json!({})))
}

async fn pending_users(headers: HeaderMap) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let claims = authorize(&headers)?;
    if claims.role != "chief_engineer" {
        return Err((StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" }))));
    }
    Ok(Json(json!([{ "id": 1 }, { "id": 2 }])))
}

async fn pending_projects(headers: HeaderMap) -> Result<&'static str, (StatusCode, Json<Value>)> {
    authorize(&headers)?;
    Ok("not json")
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/messages/unread-count", get(unread_messages))
            .route("/api/notifications/unread/count", get(unread_notifications))
            .route("/api/auth/users/pending", get(pending_users))
            .route("/api/projects/pending", get(pending_projects));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn client(&self) -> BackendClient {
        BackendClient::new(ClientConfig::new(&self.base_url)).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn login_returns_a_decodable_grant() {
    let server = TestServer::spawn().await;
    let grant = server.client().login("ce@landacq.test", "hunter2").await.unwrap();

    assert_eq!(grant.role.as_deref(), Some("chief_engineer"));
    assert_eq!(grant.user.as_ref().map(|u| u.display_name()), Some("Nimal Perera".to_string()));

    let claims = decode_claims(&grant.token).unwrap();
    assert_eq!(claims.role, Some(Role::ChiefEngineer));
    assert!(!claims.is_expired(Utc::now()));
}

#[tokio::test]
async fn rejected_login_surfaces_status() {
    let server = TestServer::spawn().await;
    let err = server.client().login("ce@landacq.test", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn blank_credentials_fail_before_any_request() {
    // Nothing listens here; a request would be a network error.
    let client = BackendClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
    let err = client.login("   ", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)), "{err:?}");
}

#[tokio::test]
async fn counts_are_read_with_the_bearer_token() {
    let server = TestServer::spawn().await;
    let client = server.client();
    let token = mint_jwt(Role::ChiefEngineer);

    assert_eq!(client.unread_messages(&token).await.unwrap(), 4);
    assert_eq!(client.unread_notifications(&token).await.unwrap(), 0);
    assert_eq!(client.pending_users(&token).await.unwrap(), 2);
}

#[tokio::test]
async fn count_source_maps_badge_kinds_to_endpoints() {
    let server = TestServer::spawn().await;
    let client = server.client();
    let token = mint_jwt(Role::ChiefEngineer);

    assert_eq!(client.fetch_count(BadgeKind::UnreadMessages, &token).await.unwrap(), 4);
    assert_eq!(client.fetch_count(BadgeKind::PendingUsers, &token).await.unwrap(), 2);
    assert_eq!(client.fetch_count(BadgeKind::Notifications, &token).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_token_is_an_api_error() {
    let server = TestServer::spawn().await;
    let err = server.client().unread_messages("not-a-jwt").await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let officer = mint_jwt(Role::LandOfficer);
    let err = server.client().pending_users(&officer).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = TestServer::spawn().await;
    let token = mint_jwt(Role::ChiefEngineer);
    let err = server.client().pending_projects(&token).await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(format!("http://{addr}")).with_timeout(Duration::from_secs(2));
    let client = BackendClient::new(config).unwrap();
    let err = client.unread_messages("token").await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "{err:?}");
}
