//! Thin HTTP layer over the SiPeka REST API.
//!
//! [`ApiClient`] owns the `reqwest` client and the injected [`Session`].
//! Authenticated calls read the token before building the request, so a
//! logged-out client never touches the network.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{multipart, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sipeka_shared::constants::DEFAULT_FILE_MIME;
use sipeka_shared::multipart::{MultipartPlan, PartBody};
use sipeka_shared::Session;

use crate::config::ClientConfig;
use crate::error::{AuthFailure, ClientError, Result};

/// Whether a call carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Public,
    Bearer,
}

pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Arc<dyn Session>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<dyn Session>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T> {
        let value = self.get_value(path, auth).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// GET returning the raw JSON body, for endpoints with more than one shape.
    pub async fn get_value(&self, path: &str, auth: Auth) -> Result<serde_json::Value> {
        let request = self.request(Method::GET, path, auth)?;
        let response = self.send(request, auth).await?;
        read_value(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B, auth: Auth) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, auth)?.json(body);
        let response = self.send(request, auth).await?;
        Ok(serde_json::from_value(read_value(response).await?)?)
    }

    /// POST a multipart body, reading local files from disk first.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        plan: &MultipartPlan,
        auth: Auth,
    ) -> Result<T> {
        let form = encode_plan(plan).await?;
        let request = self.request(Method::POST, path, auth)?.multipart(form);
        let response = self.send(request, auth).await?;
        Ok(serde_json::from_value(read_value(response).await?)?)
    }

    pub async fn delete(&self, path: &str) -> Result<serde_json::Value> {
        let request = self.request(Method::DELETE, path, Auth::Bearer)?;
        let response = self.send(request, Auth::Bearer).await?;
        read_value(response).await
    }

    pub async fn patch(&self, path: &str) -> Result<serde_json::Value> {
        let request = self.request(Method::PATCH, path, Auth::Bearer)?;
        let response = self.send(request, Auth::Bearer).await?;
        read_value(response).await
    }

    /// Authenticated GET of a binary body, sent with the given `Accept` type.
    pub async fn get_bytes(&self, path: &str, accept: &'static str) -> Result<Bytes> {
        let request = self
            .request(Method::GET, path, Auth::Bearer)?
            .header(ACCEPT, HeaderValue::from_static(accept));
        let response = self.send(request, Auth::Bearer).await?;
        response.bytes().await.map_err(ClientError::Network)
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> Result<RequestBuilder> {
        let url = self.config.endpoint(path)?;
        let mut request = self.http.request(method.clone(), url);
        if auth == Auth::Bearer {
            let token = self.session.token()?.ok_or(AuthFailure::MissingToken)?;
            request = request.bearer_auth(token);
        }
        tracing::debug!(%method, path, "sending request");
        Ok(request)
    }

    async fn send(&self, request: RequestBuilder, auth: Auth) -> Result<Response> {
        let response = request.send().await.map_err(ClientError::Network)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && auth == Auth::Bearer {
            tracing::warn!("token rejected by server, clearing session");
            self.session.clear()?;
            return Err(AuthFailure::Expired.into());
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = rejection_message(&body);
        tracing::debug!(status = status.as_u16(), message = ?message, "request rejected");
        Err(ClientError::ServerRejection {
            status: status.as_u16(),
            message,
        })
    }
}

async fn read_value(response: Response) -> Result<serde_json::Value> {
    let body = response.bytes().await.map_err(ClientError::Network)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_slice(&body)?)
}

/// The `message` field of an error body, if it is JSON and has one.
fn rejection_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}

async fn encode_plan(plan: &MultipartPlan) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in &plan.parts {
        form = match &part.body {
            PartBody::Text { value } => form.text(part.name.clone(), value.clone()),
            PartBody::File { file, file_name } => {
                let bytes = Bytes::from(tokio::fs::read(&file.path).await.map_err(|e| {
                    let path = file.path.display();
                    tracing::warn!(%path, error = %e, "cannot read attachment");
                    e
                })?);
                form.part(part.name.clone(), file_part(bytes, file_name, file.mime_or_default()))
            }
        };
    }
    Ok(form)
}

fn file_part(bytes: Bytes, file_name: &str, mime: &str) -> multipart::Part {
    let part = || multipart::Part::stream(bytes.clone()).file_name(file_name.to_string());
    part()
        .mime_str(mime)
        .or_else(|_| part().mime_str(DEFAULT_FILE_MIME))
        .unwrap_or_else(|_| part())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sipeka_shared::MemorySession;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer, session: Arc<dyn Session>) -> ApiClient {
        let config = ClientConfig::for_api_url(&format!("{}/api", server.uri())).unwrap();
        ApiClient::new(config, session).unwrap()
    }

    #[tokio::test]
    async fn bearer_token_and_accept_header_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .and(header("authorization", "Bearer 7|secret"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemorySession::with_token("7|secret"))).await;
        let body = api.get_value("user", Auth::Bearer).await.unwrap();
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn missing_token_sends_nothing() {
        let server = MockServer::start().await;
        let api = client_for(&server, Arc::new(MemorySession::new())).await;

        let err = api.get_value("user", Auth::Bearer).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(AuthFailure::MissingToken)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_clears_the_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pengajuan"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Unauthenticated."})),
            )
            .mount(&server)
            .await;

        let session = Arc::new(MemorySession::with_token("old"));
        let api = client_for(&server, session.clone()).await;

        let err = api.get_value("pengajuan", Auth::Bearer).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(AuthFailure::Expired)));
        assert_eq!(session.token().unwrap(), None);
    }

    #[tokio::test]
    async fn rejection_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Email atau password salah"})),
            )
            .mount(&server)
            .await;

        let session = Arc::new(MemorySession::new());
        let api = client_for(&server, session).await;
        let err = api
            .post_json::<_, serde_json::Value>("login", &serde_json::json!({}), Auth::Public)
            .await
            .unwrap_err();
        match err {
            ClientError::ServerRejection { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Email atau password salah"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let config = ClientConfig::for_api_url("http://127.0.0.1:9/api").unwrap();
        let api = ApiClient::new(config, Arc::new(MemorySession::new())).unwrap();
        let err = api.get_value("getFieldSurat/1", Auth::Public).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[test]
    fn rejection_message_needs_json() {
        assert_eq!(rejection_message(b"<html>oops</html>"), None);
        assert_eq!(rejection_message(br#"{"message": "  "}"#), None);
        assert_eq!(rejection_message(br#"{"message":"Ditolak"}"#).as_deref(), Some("Ditolak"));
    }
}
