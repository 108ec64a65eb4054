use gamelink_domain::GameLinkError;
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use tracing::debug;

use crate::errors::RequestFailure;

/// Status and fully buffered body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// HTTP transport that always sends credentials.
///
/// Performs exactly one attempt per call; retries belong to the caller.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, GameLinkError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send the request once and buffer the response.
    ///
    /// A 5xx response is returned as [`RequestFailure::HttpStatus`] so the
    /// retry policy can see it; every other status is a [`RawResponse`]. A
    /// body that fails to read is reported as empty.
    pub async fn send_once(&self, builder: RequestBuilder) -> Result<RawResponse, RequestFailure> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            RequestFailure::from(err)
        })?;

        // The server answered once headers arrive. A body that cannot be read
        // is an absent payload, never a transport failure to retry.
        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                debug!(%method, %url, %status, error = %err, "failed to read HTTP response body");
                Vec::new()
            }
        };
        debug!(%method, %url, %status, bytes = body.len(), "received HTTP response");

        if status.is_server_error() {
            return Err(RequestFailure::HttpStatus { status, body });
        }

        Ok(RawResponse { status, body })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl HttpClientBuilder {
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    ///
    /// Returns `GameLinkError::Internal` if reqwest rejects the settings
    pub fn build(self) -> Result<HttpClient, GameLinkError> {
        let mut builder = ReqwestClient::builder().cookie_store(true).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| GameLinkError::Internal(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::header::HeaderValue;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn returns_successful_response_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        let response =
            client.send_once(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"ok".to_vec());
    }

    #[tokio::test]
    async fn server_error_is_a_failure_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        let err = client.send_once(client.request(Method::GET, server.uri())).await.unwrap_err();

        match err {
            RequestFailure::HttpStatus { status, body } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, b"bad gateway".to_vec());
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn client_error_is_returned_as_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        let response =
            client.send_once(client.request(Method::DELETE, server.uri())).await.expect("response");

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn refused_connection_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new().expect("http client");
        let err = client
            .send_once(client.request(Method::GET, format!("http://{addr}/")))
            .await
            .unwrap_err();

        assert!(matches!(err, RequestFailure::Transport { .. }));
    }

    #[tokio::test]
    async fn sends_configured_user_agent_and_default_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("user-agent", "gamelink-tests/1.0"))
            .and(header("x-client", "desktop"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-client", HeaderValue::from_static("desktop"));
        let client = HttpClient::builder()
            .user_agent("gamelink-tests/1.0")
            .default_headers(headers)
            .build()
            .expect("http client");

        let response = client
            .send_once(client.request(Method::GET, format!("{}/ping", server.uri())))
            .await
            .expect("response");

        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn cookies_are_sent_back_on_later_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "session=abc123; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("cookie", "session=abc123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        client
            .send_once(client.request(Method::POST, format!("{}/login", server.uri())))
            .await
            .expect("login");
        let response = client
            .send_once(client.request(Method::GET, format!("{}/me", server.uri())))
            .await
            .expect("me");

        assert_eq!(response.status, StatusCode::OK);
    }

    #[test]
    fn rejected_settings_are_internal_errors() {
        let err = HttpClient::builder().user_agent("gamelink\nbroken").build().unwrap_err();

        assert!(matches!(err, GameLinkError::Internal(msg) if msg.contains("Failed to build HTTP client")));
    }
}
