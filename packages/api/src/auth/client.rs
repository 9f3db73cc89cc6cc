//! # Hosted auth client
//!
//! [`AuthClient`] talks to the GoTrue-style auth API served under
//! `<project url>/auth/v1/` and publishes every resulting session change through
//! its [`SessionHub`].
//!
//! ## Flow
//!
//! 1. **[`sign_in_with_password`](AuthClient::sign_in_with_password)** —
//!    `POST /auth/v1/token?grant_type=password` with the email and password. The token
//!    response becomes a [`Session`] and is published as [`SessionEvent::SignedIn`].
//! 2. **[`refresh`](AuthClient::refresh)** — `grant_type=refresh_token` with the
//!    current refresh token; published as [`SessionEvent::TokenRefreshed`].
//!    [`ensure_fresh`](AuthClient::ensure_fresh) calls it before a backend request
//!    when the access token is within [`REFRESH_MARGIN_SECS`] of expiring. A
//!    session that cannot be renewed is signed out.
//! 3. **[`sign_out`](SessionProvider::sign_out)** — `POST /auth/v1/logout` with the
//!    access token. The local session is cleared whether or not the remote call
//!    succeeds; the remote error, if any, is still returned.

use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use store::RemoteConfig;

use super::session::{Session, SessionEvent, SessionHub, SessionProvider, Subscription};
use super::AuthError;
use crate::models::UserInfo;

/// How close to expiry a token may get before requests renew it first.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Token endpoint payload.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserInfo,
}

/// The auth API reports errors in a few shapes depending on the endpoint.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        Session {
            user: self.user,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
        }
    }
}

/// Client for the hosted auth service.
#[derive(Clone, Debug)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
    hub: SessionHub,
}

impl AuthClient {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            hub: SessionHub::new(),
        }
    }

    /// The hub this client publishes session changes to.
    pub fn hub(&self) -> &SessionHub {
        &self.hub
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let email = email.trim();
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;
        tracing::info!(user = %session.user_id(), "signed in");
        self.hub.publish(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// Exchange the current refresh token for a new session.
    pub async fn refresh(&self) -> Result<Session, AuthError> {
        let refresh_token = self
            .hub
            .current()
            .and_then(|s| s.refresh_token)
            .ok_or(AuthError::NoSession)?;
        let session = self
            .token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await?;
        self.hub.publish(SessionEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    /// Renew the session if its access token expires within
    /// [`REFRESH_MARGIN_SECS`] of `now`. Does nothing without a session or when
    /// the token is still good. When renewal fails the session is dropped and
    /// [`SessionEvent::SignedOut`] published, since the old token is unusable.
    pub async fn ensure_fresh(&self, now: DateTime<Utc>) -> Result<(), AuthError> {
        let Some(session) = self.hub.current() else {
            return Ok(());
        };
        if !session.is_expired(now + Duration::seconds(REFRESH_MARGIN_SECS)) {
            return Ok(());
        }
        match self.refresh().await {
            Ok(_) => {
                tracing::debug!(user = %session.user_id(), "access token refreshed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("token refresh failed, signing out: {e}");
                self.hub.publish(SessionEvent::SignedOut);
                Err(e)
            }
        }
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;
        let response = check(response).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.into_session(Utc::now()))
    }
}

async fn check(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or(body);
    Err(AuthError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl SessionProvider for AuthClient {
    fn current_session(&self) -> Option<Session> {
        self.hub.current()
    }

    fn on_session_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.hub.subscribe(callback)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.hub.current() else {
            return Ok(());
        };

        let remote: Result<(), AuthError> = async {
            let response = self
                .client
                .post(self.endpoint("logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await?;
            check(response).await.map(|_| ())
        }
        .await;

        self.hub.publish(SessionEvent::SignedOut);
        if let Err(e) = &remote {
            tracing::warn!("remote sign-out failed: {e}");
        }
        remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> RemoteConfig {
        RemoteConfig {
            url: url.to_string(),
            anon_key: "anon".to_string(),
        }
    }

    #[test]
    fn test_token_response_into_session() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": { "id": "u1", "email": "ada@example.com", "aud": "authenticated" },
        }))
        .unwrap();

        let now = Utc::now();
        let session = token.into_session(now);
        assert_eq!(session.user_id(), "u1");
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert_eq!(session.expires_at, Some(now + Duration::seconds(3600)));
    }

    #[test]
    fn test_absolute_expiry_wins() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "expires_in": 3600,
            "expires_at": 1_700_000_000,
            "user": { "id": "u1" },
        }))
        .unwrap();
        let session = token.into_session(Utc::now());
        assert_eq!(session.expires_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));

        let body: ErrorBody = serde_json::from_str(r#"{"code":400,"msg":"Email not confirmed"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Email not confirmed"));
    }

    #[test]
    fn test_endpoint() {
        let client = AuthClient::new(&config("https://demo.example.co/"));
        assert_eq!(client.endpoint("token"), "https://demo.example.co/auth/v1/token");
    }

    fn session(refresh_token: Option<&str>, expires_at: Option<DateTime<Utc>>) -> Session {
        Session {
            user: UserInfo {
                id: "u1".to_string(),
                email: None,
            },
            access_token: "old-jwt".to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at,
        }
    }

    /// Serve one HTTP request on a local port, answering with `body` as JSON.
    /// Resolves to the request line and headers that were received.
    async fn serve_once(body: serde_json::Value) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            // Headers, then as many body bytes as Content-Length names.
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let payload = body.to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                payload.len(),
                payload
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).to_string()
        });
        (url, handle)
    }

    #[tokio::test]
    async fn test_refresh_publishes_token_refreshed() {
        let (url, server) = serve_once(json!({
            "access_token": "new-jwt",
            "refresh_token": "r2",
            "expires_in": 3600,
            "user": { "id": "u1" },
        }))
        .await;
        let client = AuthClient::new(&config(&url));
        client
            .hub()
            .publish(SessionEvent::SignedIn(session(Some("r1"), None)));

        let events = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let _sub = client.hub().subscribe({
            let events = events.clone();
            move |e| events.lock().unwrap().push(e.clone())
        });

        let refreshed = client.refresh().await.unwrap();
        assert_eq!(refreshed.access_token, "new-jwt");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /auth/v1/token?grant_type=refresh_token"));
        assert!(request.contains(r#""refresh_token":"r1""#));

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], SessionEvent::TokenRefreshed(s) if s.access_token == "new-jwt"));
        assert_eq!(client.current_session().unwrap().refresh_token.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_ensure_fresh_renews_a_token_about_to_expire() {
        let (url, server) = serve_once(json!({
            "access_token": "new-jwt",
            "refresh_token": "r2",
            "expires_in": 3600,
            "user": { "id": "u1" },
        }))
        .await;
        let client = AuthClient::new(&config(&url));
        let now = Utc::now();
        client.hub().publish(SessionEvent::SignedIn(session(
            Some("r1"),
            Some(now + Duration::seconds(10)),
        )));

        client.ensure_fresh(now).await.unwrap();
        server.await.unwrap();
        assert_eq!(client.current_session().unwrap().access_token, "new-jwt");
    }

    #[tokio::test]
    async fn test_ensure_fresh_leaves_a_good_token_alone() {
        // Nothing listens here; a request would fail.
        let client = AuthClient::new(&config("http://127.0.0.1:9"));
        let now = Utc::now();
        client.hub().publish(SessionEvent::SignedIn(session(
            Some("r1"),
            Some(now + Duration::hours(1)),
        )));

        assert!(client.ensure_fresh(now).await.is_ok());
        assert_eq!(client.current_session().unwrap().access_token, "old-jwt");

        let anonymous = AuthClient::new(&config("http://127.0.0.1:9"));
        assert!(anonymous.ensure_fresh(now).await.is_ok());
    }

    #[tokio::test]
    async fn test_ensure_fresh_signs_out_when_renewal_is_impossible() {
        let client = AuthClient::new(&config("http://127.0.0.1:9"));
        let now = Utc::now();
        client.hub().publish(SessionEvent::SignedIn(session(
            None,
            Some(now - Duration::seconds(1)),
        )));

        let signed_out = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let _sub = client.hub().subscribe({
            let signed_out = signed_out.clone();
            move |e| {
                if *e == SessionEvent::SignedOut {
                    signed_out.store(true, std::sync::atomic::Ordering::SeqCst);
                }
            }
        });

        assert!(matches!(client.ensure_fresh(now).await, Err(AuthError::NoSession)));
        assert!(client.current_session().is_none());
        assert!(signed_out.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_refresh_without_session() {
        let client = AuthClient::new(&config("http://127.0.0.1:9"));
        assert!(matches!(client.refresh().await, Err(AuthError::NoSession)));
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_a_no_op() {
        let client = AuthClient::new(&config("http://127.0.0.1:9"));
        assert!(client.sign_out().await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_out_clears_local_session_when_remote_fails() {
        // Port 9 (discard) is not listening; the remote call fails.
        let client = AuthClient::new(&config("http://127.0.0.1:9"));
        client.hub().publish(SessionEvent::SignedIn(Session {
            user: UserInfo {
                id: "u1".to_string(),
                email: None,
            },
            access_token: "jwt".to_string(),
            refresh_token: None,
            expires_at: None,
        }));

        let result = client.sign_out().await;
        assert!(result.is_err());
        assert!(client.current_session().is_none());
    }
}
