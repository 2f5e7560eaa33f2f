//! HTTP client for the scheduling backend.

use std::path::Path;

use reqwest::{RequestBuilder, Response, StatusCode, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::Backend;
use crate::error::{EventlyError, EventlyResult};
use crate::event::{Event, EventPayload};
use crate::notification::Notification;
use crate::profile::{Credentials, LoginResponse, ProfileUpdate, Registration, UserProfile};
use crate::session::Session;

/// HTTP client for the scheduling backend
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Error body returned by the backend. `message` is a string or a list of strings.
#[derive(Deserialize)]
struct ErrorResponse {
    message: serde_json::Value,
}

/// The unread count comes back either bare or wrapped.
#[derive(Deserialize)]
#[serde(untagged)]
enum UnreadCount {
    Bare(u64),
    Wrapped { count: u64 },
}

impl ApiClient {
    pub fn new(base_url: &str) -> EventlyResult<Self> {
        url::Url::parse(base_url)
            .map_err(|e| EventlyError::Config(format!("Invalid api_url '{base_url}': {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder, session: &Session) -> RequestBuilder {
        req.bearer_auth(session.token())
    }

    /// Absolute URL of the profile picture, if the profile has one.
    pub fn picture_url(&self, profile: &UserProfile) -> Option<String> {
        profile.picture.as_deref().map(|p| self.url(p))
    }

    /// POST /users/login — returns the bearer token
    pub async fn login(&self, credentials: &Credentials) -> EventlyResult<String> {
        tracing::debug!(email = %credentials.email, "signing in");
        let resp = self
            .http
            .post(self.url("/users/login"))
            .json(credentials)
            .send()
            .await?;
        let body: LoginResponse = parse(resp).await?;
        Ok(body.token)
    }

    /// POST /auth/register (multipart)
    pub async fn register(&self, registration: &Registration) -> EventlyResult<()> {
        let mut form = multipart::Form::new()
            .text("username", registration.username.clone())
            .text("email", registration.email.clone())
            .text("password", registration.password.clone());

        if let Some(path) = &registration.picture {
            form = form.part("picture", file_part(path).await?);
        }

        let resp = self
            .http
            .post(self.url("/auth/register"))
            .multipart(form)
            .send()
            .await?;
        expect_success(resp).await
    }

    /// POST /auth/logout
    pub async fn logout(&self, session: &Session) -> EventlyResult<()> {
        let resp = self
            .authed(self.http.post(self.url("/auth/logout")), session)
            .send()
            .await?;
        expect_success(resp).await
    }

    /// GET /users/profile/me
    pub async fn profile_me(&self, session: &Session) -> EventlyResult<UserProfile> {
        let resp = self
            .authed(self.http.get(self.url("/users/profile/me")), session)
            .send()
            .await?;
        parse(resp).await
    }

    /// PUT /users/profile/update
    pub async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> EventlyResult<()> {
        let resp = self
            .authed(self.http.put(self.url("/users/profile/update")), session)
            .json(update)
            .send()
            .await?;
        expect_success(resp).await
    }

    /// POST /users/profile/upload-picture (multipart)
    pub async fn upload_picture(&self, session: &Session, path: &Path) -> EventlyResult<()> {
        let form = multipart::Form::new().part("profilePicture", file_part(path).await?);
        let resp = self
            .authed(self.http.post(self.url("/users/profile/upload-picture")), session)
            .multipart(form)
            .send()
            .await?;
        expect_success(resp).await
    }

    /// GET /events/past-participated?userEmail=
    pub async fn past_participation(&self, session: &Session) -> EventlyResult<Vec<Event>> {
        let resp = self
            .authed(self.http.get(self.url("/events/past-participated")), session)
            .query(&[("userEmail", session.email())])
            .send()
            .await?;
        parse(resp).await
    }

    /// GET /users/emails?query=
    pub async fn suggest_participants(
        &self,
        session: &Session,
        query: &str,
    ) -> EventlyResult<Vec<String>> {
        let resp = self
            .authed(self.http.get(self.url("/users/emails")), session)
            .query(&[("query", query)])
            .send()
            .await?;
        parse(resp).await
    }
}

impl Backend for ApiClient {
    async fn profile(&self, session: &Session) -> EventlyResult<UserProfile> {
        let resp = self
            .authed(self.http.get(self.url("/auth/profile")), session)
            .send()
            .await?;
        parse(resp).await
    }

    async fn list_events(&self, session: &Session) -> EventlyResult<Vec<Event>> {
        let resp = self.authed(self.http.get(self.url("/events")), session).send().await?;
        parse(resp).await
    }

    async fn search_events(&self, session: &Session, query: &str) -> EventlyResult<Vec<Event>> {
        tracing::debug!(query, "searching events");
        let resp = self
            .authed(self.http.get(self.url("/events/search")), session)
            .query(&[("query", query)])
            .send()
            .await?;
        parse(resp).await
    }

    async fn create_event(
        &self,
        session: &Session,
        payload: &EventPayload,
    ) -> EventlyResult<Event> {
        let resp = self
            .authed(self.http.post(self.url("/events/create")), session)
            .json(payload)
            .send()
            .await?;
        parse(resp).await
    }

    async fn update_event(
        &self,
        session: &Session,
        id: &str,
        payload: &EventPayload,
    ) -> EventlyResult<Event> {
        let resp = self
            .authed(self.http.put(self.url(&format!("/events/update/{id}"))), session)
            .json(payload)
            .send()
            .await?;
        parse(resp).await
    }

    async fn delete_event(&self, session: &Session, id: &str) -> EventlyResult<()> {
        let resp = self
            .authed(self.http.delete(self.url(&format!("/events/delete/{id}"))), session)
            .send()
            .await?;
        expect_success(resp).await
    }

    async fn categories(&self) -> EventlyResult<Vec<String>> {
        let resp = self.http.get(self.url("/events/categories")).send().await?;
        parse(resp).await
    }

    async fn notifications(&self, session: &Session) -> EventlyResult<Vec<Notification>> {
        let resp = self
            .authed(self.http.get(self.url("/notifications")), session)
            .query(&[("userEmail", session.email())])
            .send()
            .await?;
        parse(resp).await
    }

    async fn unread_count(&self, session: &Session) -> EventlyResult<u64> {
        let resp = self
            .authed(self.http.get(self.url("/notifications/unread-count")), session)
            .query(&[("userEmail", session.email())])
            .send()
            .await?;
        let count: UnreadCount = parse(resp).await?;
        Ok(match count {
            UnreadCount::Bare(n) | UnreadCount::Wrapped { count: n } => n,
        })
    }

    async fn mark_read(&self, session: &Session, notification_id: &str) -> EventlyResult<()> {
        let url = self.url(&format!("/notifications/{notification_id}/read"));
        let resp = self.authed(self.http.patch(url), session).send().await?;
        expect_success(resp).await
    }

    async fn decline(&self, session: &Session, event_id: &str) -> EventlyResult<()> {
        let url = self.url(&format!("/notifications/events/{event_id}/remove-participant"));
        let resp = self
            .authed(self.http.patch(url), session)
            .json(&json!({ "userEmail": session.email() }))
            .send()
            .await?;
        expect_success(resp).await
    }
}

async fn file_part(path: &Path) -> EventlyResult<multipart::Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(multipart::Part::bytes(bytes).file_name(file_name))
}

/// Deserialize a successful response body, or turn the failure into an error.
async fn parse<T: DeserializeOwned>(resp: Response) -> EventlyResult<T> {
    let resp = check_status(resp).await?;
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| EventlyError::Serialization(e.to_string()))
}

async fn expect_success(resp: Response) -> EventlyResult<()> {
    check_status(resp).await.map(|_| ())
}

async fn check_status(resp: Response) -> EventlyResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(EventlyError::Unauthorized);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), body = %body, "request failed");
    Err(EventlyError::Server {
        status: status.as_u16(),
        message: error_message(&body, status),
    })
}

fn error_message(body: &str, status: StatusCode) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };

    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            message: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorResponse {
            message: serde_json::Value::Array(items),
        }) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ if !body.trim().is_empty() && body.len() < 200 => body.trim().to_string(),
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::session_for;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// What the client put on the wire.
    struct Captured {
        request_line: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl Captured {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    /// Answer a single request with `status` and a JSON `reply`.
    async fn serve_once(
        status: &'static str,
        reply: &'static str,
    ) -> (ApiClient, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).await.unwrap();

            let mut headers = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    headers.push((k.trim().to_string(), v.trim().to_string()));
                }
            }

            let len = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(0);
            let mut body = vec![0; len];
            reader.read_exact(&mut body).await.unwrap();

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{reply}",
                reply.len()
            );
            reader.get_mut().write_all(response.as_bytes()).await.unwrap();

            Captured {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8(body).unwrap(),
            }
        });

        let client = ApiClient {
            http: reqwest::Client::builder().no_proxy().build().unwrap(),
            base_url: format!("http://{addr}"),
        };
        (client, handle)
    }

    #[tokio::test]
    async fn notifications_carry_bearer_and_user_email() {
        let (client, server) = serve_once("200 OK", "[]").await;
        let session = session_for("b@x.com");

        assert!(client.notifications(&session).await.unwrap().is_empty());

        let sent = server.await.unwrap();
        assert_eq!(sent.request_line, "GET /notifications?userEmail=b%40x.com HTTP/1.1");
        let bearer = format!("Bearer {}", session.token());
        assert_eq!(sent.header("authorization"), Some(bearer.as_str()));
    }

    #[tokio::test]
    async fn unread_count_accepts_wrapped_form() {
        let (client, server) = serve_once("200 OK", r#"{"count":2}"#).await;

        assert_eq!(client.unread_count(&session_for("b@x.com")).await.unwrap(), 2);

        let sent = server.await.unwrap();
        let expected = "GET /notifications/unread-count?userEmail=b%40x.com ";
        assert!(sent.request_line.starts_with(expected));
    }

    #[tokio::test]
    async fn decline_sends_user_email_body() {
        let (client, server) = serve_once("200 OK", "{}").await;

        client.decline(&session_for("b@x.com"), "e1").await.unwrap();

        let sent = server.await.unwrap();
        let expected = "PATCH /notifications/events/e1/remove-participant ";
        assert!(sent.request_line.starts_with(expected));
        assert_eq!(sent.json(), json!({ "userEmail": "b@x.com" }));
    }

    #[tokio::test]
    async fn create_posts_camel_case_payload() {
        let reply = r#"{"_id":"e9","title":"Lunch","startDate":"2024-01-10T12:00:00.000Z",
            "endDate":"2024-01-10T13:00:00.000Z","creator":"a@x.com"}"#;
        let (client, server) = serve_once("201 Created", reply).await;
        let payload = EventPayload::from(&crate::testing::standup());

        let created = client.create_event(&session_for("a@x.com"), &payload).await.unwrap();
        assert_eq!(created.id, "e9");

        let sent = server.await.unwrap();
        assert!(sent.request_line.starts_with("POST /events/create "));
        assert_eq!(sent.json()["startDate"], "2024-01-10T09:00:00.000Z");
        assert_eq!(sent.json()["participants"], json!(["b@x.com"]));
    }

    #[tokio::test]
    async fn unauthorized_status_is_its_own_error() {
        let (client, server) = serve_once("401 Unauthorized", r#"{"message":"jwt expired"}"#).await;

        let err = client.list_events(&session_for("a@x.com")).await.unwrap_err();
        assert!(matches!(err, EventlyError::Unauthorized));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn other_failures_keep_status_and_message() {
        let reply = r#"{"message":"Event not found"}"#;
        let (client, server) = serve_once("404 Not Found", reply).await;

        let err = client.delete_event(&session_for("a@x.com"), "e1").await.unwrap_err();
        match err {
            EventlyError::Server { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Event not found");
            }
            other => panic!("expected a server error, got {other:?}"),
        }

        let sent = server.await.unwrap();
        assert!(sent.request_line.starts_with("DELETE /events/delete/e1 "));
    }

    #[tokio::test]
    async fn categories_need_no_session() {
        let (client, server) = serve_once("200 OK", r#"["Meeting"]"#).await;

        assert_eq!(client.categories().await.unwrap(), vec!["Meeting"]);

        let sent = server.await.unwrap();
        assert_eq!(sent.header("authorization"), None);
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(EventlyError::Config(_))));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.url("/events"), "http://localhost:3000/events");
    }

    #[test]
    fn picture_url_is_absolute() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        let profile = UserProfile {
            email: "a@x.com".into(),
            username: "alice".into(),
            picture: Some("/uploads/a.png".into()),
            role: None,
        };
        assert_eq!(
            client.picture_url(&profile).as_deref(),
            Some("http://localhost:3000/uploads/a.png")
        );
    }

    #[test]
    fn error_message_shapes() {
        let bad = StatusCode::BAD_REQUEST;
        assert_eq!(error_message(r#"{"message":"User not found"}"#, bad), "User not found");
        assert_eq!(
            error_message(r#"{"message":["title is empty","bad date"]}"#, bad),
            "title is empty, bad date"
        );
        assert_eq!(error_message("", bad), "Bad Request");
        assert_eq!(error_message("plain text", bad), "plain text");
    }

    #[test]
    fn unread_count_forms() {
        let bare: UnreadCount = serde_json::from_str("3").unwrap();
        let wrapped: UnreadCount = serde_json::from_str(r#"{"count":4}"#).unwrap();
        assert!(matches!(bare, UnreadCount::Bare(3)));
        assert!(matches!(wrapped, UnreadCount::Wrapped { count: 4 }));
    }
}
