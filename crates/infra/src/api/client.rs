//! API client with retry and envelope validation
//!
//! Every call goes through the same pipeline:
//! 1. build the URL from the base URL, the path and the query string
//! 2. per attempt: read the bearer token, set headers, send once
//! 3. retry transport failures and 5xx responses with exponential backoff
//! 4. validate the response envelope and return its `data`

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use gamelink_common::resilience::policies::ClassifiedRetry;
use gamelink_common::resilience::{RetryConfig, RetryExecutor, RetryObserver, Sleeper, TokioSleeper};
use gamelink_domain::{ApiConfig, ApiError, Envelope, GameLinkError, PageQuery, PageResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::auth::{NoTokenProvider, TokenProvider};
use super::query::QueryParams;
use super::request::ApiRequest;
use crate::config::retry_config;
use crate::errors::RequestFailure;
use crate::http::{HttpClient, RawResponse};

/// Client for the GameLink REST API
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    retry: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Create a client from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns `GameLinkError::Config` if the retry settings are invalid and
    /// `GameLinkError::Internal` if the HTTP client cannot be built
    pub fn from_config(
        config: &ApiConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, GameLinkError> {
        let mut builder = Self::builder()
            .base_url(config.base_url.as_str())
            .tokens(tokens)
            .retry_config(retry_config(&config.retry)?);

        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }

        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Execute a request and return the envelope's `data`
    ///
    /// # Errors
    ///
    /// - network failures after all retries: code `0`
    /// - 5xx after all retries, or any response without a valid envelope:
    ///   the HTTP status with message `HTTP <status>`
    /// - a failure envelope: its own `code` and `message`
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        debug!(url = %url, "API request");

        let executor = RetryExecutor::new(self.retry.clone(), ClassifiedRetry)
            .with_observer(RetryLogger { path: request.path() })
            .with_sleeper(Arc::clone(&self.sleeper));

        let client = self;
        let request_ref = &request;
        let url_ref = url.as_str();
        let response = match executor.execute(move || client.attempt(request_ref, url_ref)).await {
            Ok(response) => response,
            // Retries are over; the body may still carry a failure envelope
            Err(RequestFailure::HttpStatus { status, body }) => RawResponse { status, body },
            Err(failure) => return Err(failure.into()),
        };

        Self::unwrap_envelope(response)
    }

    async fn attempt(&self, request: &ApiRequest, url: &str) -> Result<RawResponse, RequestFailure> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(request.headers().clone());

        // Read on every attempt so a token change between retries is honoured
        if let Some(token) = self.tokens.bearer_token().await {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
                RequestFailure::invalid_request(format!("invalid bearer token: {err}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self.http.request(request.method().clone(), url).headers(headers);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        self.http.send_once(builder).await
    }

    fn unwrap_envelope<T: DeserializeOwned>(response: RawResponse) -> Result<T, ApiError> {
        let status = response.status;

        match Envelope::<T>::parse(&response.body) {
            Ok(Envelope::Success { data, code, .. }) => {
                debug!(status = status.as_u16(), code, "API request successful");
                Ok(data)
            }
            Ok(Envelope::Failure { code, message, details }) => {
                debug!(status = status.as_u16(), code, message = %message, "API returned failure envelope");
                Err(RequestFailure::Application { code, message, details }.into())
            }
            Err(err) => {
                debug!(status = status.as_u16(), error = %err, "response body is not a valid envelope");
                Err(RequestFailure::EnvelopeParse { status }.into())
            }
        }
    }

    /// Execute a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(ApiRequest::get(path)).await
    }

    /// Execute a GET request with query parameters
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: QueryParams,
    ) -> Result<T, ApiError> {
        self.request(ApiRequest::get(path).query(query)).await
    }

    /// Fetch one page of a list endpoint
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &PageQuery,
    ) -> Result<PageResult<T>, ApiError> {
        self.get_with(path, QueryParams::from(query)).await
    }

    /// Execute a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(ApiRequest::post(path).json(body)?).await
    }

    /// Execute a PUT request with a JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(ApiRequest::put(path).json(body)?).await
    }

    /// Execute a PATCH request with a JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(ApiRequest::patch(path).json(body)?).await
    }

    /// Execute a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(ApiRequest::delete(path)).await
    }
}

/// Logs every scheduled retry of one request
struct RetryLogger<'a> {
    path: &'a str,
}

impl RetryObserver<RequestFailure> for RetryLogger<'_> {
    fn on_retry(&self, error: &RequestFailure, attempt: u32, delay: Duration) {
        warn!(
            path = self.path,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "API request failed, retrying"
        );
    }
}

/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    retry: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
    http: Option<HttpClient>,
    user_agent: Option<String>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: gamelink_domain::config::DEFAULT_BASE_URL.to_string(),
            tokens: Arc::new(NoTokenProvider),
            retry: RetryConfig::http_default(),
            sleeper: Arc::new(TokioSleeper),
            http: None,
            user_agent: None,
        }
    }
}

impl ApiClientBuilder {
    /// Origin prepended to every path; a trailing `/` is dropped
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn tokens(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn token_provider(self, provider: impl TokenProvider + 'static) -> Self {
        self.tokens(Arc::new(provider))
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the backoff delay primitive
    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Use a preconfigured transport; `user_agent` is then ignored
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns `GameLinkError::Internal` if the HTTP client cannot be built
    pub fn build(self) -> Result<ApiClient, GameLinkError> {
        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = HttpClient::builder();
                if let Some(agent) = self.user_agent {
                    builder = builder.user_agent(agent);
                }
                builder.build()?
            }
        };

        Ok(ApiClient {
            http,
            base_url: self.base_url,
            tokens: self.tokens,
            retry: self.retry,
            sleeper: self.sleeper,
        })
    }
}
