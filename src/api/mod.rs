//! HTTP client for the EMS REST API. Every request goes to one backend origin,
//! carries the stored bearer token when there is one, and fails after a fixed
//! timeout. Responses are unwrapped so callers receive the decoded body.
//!
//! A `401` from any endpoint clears the token store before the error is
//! returned; there is no refresh flow and no automatic retry. Transport
//! failures (timeout, connection refused) never touch the store.

mod error;
pub use self::error::ApiError;

use crate::{config::ClientConfig, token::TokenStore};
use reqwest::{multipart::Form, Client, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};
use ulid::Ulid;
use url::Url;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Request dispatcher bound to one backend origin and one token store.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            tokens,
        })
    }

    /// The token store shared with the session layer.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an undecodable body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.get(self.endpoint(path)?);
        self.send("GET", path, request).await
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an undecodable body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.endpoint(path)?).json(body);
        self.send("POST", path, request).await
    }

    /// Posts JSON and discards whatever the server answers on success.
    ///
    /// # Errors
    /// Returns an error on transport failure or non-2xx status.
    pub async fn post_json_empty<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.post_json::<B, IgnoredAny>(path, body).await.map(|_| ())
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an undecodable body.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.put(self.endpoint(path)?).json(body);
        self.send("PUT", path, request).await
    }

    /// Posts without a body and discards the response body.
    ///
    /// # Errors
    /// Returns an error on transport failure or non-2xx status.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let request = self.http.post(self.endpoint(path)?);
        self.send::<IgnoredAny>("POST", path, request)
            .await
            .map(|_| ())
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an undecodable body.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self.http.post(self.endpoint(path)?).multipart(form);
        self.send("POST", path, request).await
    }

    /// Joins the base URL and `path`, keeping any path prefix of the base.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let url = build_url(self.base_url.as_str(), path);
        Url::parse(&url).map_err(|err| ApiError::Config(format!("Invalid request URL {url}: {err}")))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let request_id = Ulid::new().to_string();
        let span = info_span!(
            "api.request",
            http.method = method,
            path = %path,
            request_id = %request_id
        );

        async {
            let mut request = request.header(REQUEST_ID_HEADER, request_id.as_str());
            if let Some(token) = self.tokens.get() {
                request = request.bearer_auth(token.expose_secret());
            }

            let response = request.send().await.map_err(map_request_error)?;
            debug!(status = response.status().as_u16(), "response received");
            self.handle_response(response).await
        }
        .instrument(span)
        .await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            if let Err(err) = self.tokens.clear() {
                warn!("Failed to clear token after 401: {err}");
            } else {
                debug!("token cleared after 401");
            }
            return Err(ApiError::Unauthorized(error_message(
                &body,
                "Unauthorized. Please sign in again.",
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_message(&body, "Request failed."),
            });
        }

        let body = response.bytes().await.map_err(map_request_error)?;
        decode_body(&body)
    }
}

/// Builds a URL from a base URL and the provided path.
fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');
    format!("{base}/{path}")
}

/// Decodes a JSON body; an empty body decodes as `null`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

/// Maps transport errors into timeout or network variants.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_decode() {
        ApiError::Parse(format!("Failed to decode response: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Extracts a user-facing message from an error body.
///
/// JSON bodies contribute their `message` or `error` field (a string, or the
/// first string of an array); anything else is used as trimmed text.
fn error_message(body: &str, fallback: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["message", "error"]
            .iter()
            .find_map(|key| match value.get(key) {
                Some(Value::String(message)) => Some(message.clone()),
                Some(Value::Array(items)) => items.iter().find_map(Value::as_str).map(str::to_string),
                _ => None,
            })
    });

    let message = from_json.unwrap_or_else(|| body.to_string());
    sanitize(&message, fallback)
}

/// Trims and truncates a message, falling back when nothing is left.
fn sanitize(message: &str, fallback: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
