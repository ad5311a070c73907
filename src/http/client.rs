//! JSON RPC client for the listing and tail APIs
//!
//! Every operation is a `POST` to the service endpoint, named by the
//! `X-Amz-Target` header, with a JSON request and response body. The bucket
//! service is the exception: a `GET` with query parameters returning XML.
//! Failed calls are classified but never retried.

use crate::error::{Error, Result};
use crate::http::xml;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Content type of the log service protocol
pub const LOGS_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Content type of the table service protocol
pub const TABLES_CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// Content type accepted from the bucket service
pub const REST_XML_CONTENT_TYPE: &str = "application/xml";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Service endpoint URL
    pub endpoint: String,
    /// Request timeout (not applied to streaming calls)
    pub timeout: Duration,
    /// Content type sent with every request
    pub content_type: String,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4566".to_string(),
            timeout: Duration::from_secs(30),
            content_type: LOGS_CONTENT_TYPE.to_string(),
            default_headers: HashMap::new(),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl ApiClientConfig {
    /// Create a new config builder
    pub fn builder() -> ApiClientConfigBuilder {
        ApiClientConfigBuilder::default()
    }
}

/// Builder for API client config
#[derive(Default)]
pub struct ApiClientConfigBuilder {
    config: ApiClientConfig,
}

impl ApiClientConfigBuilder {
    /// Set the endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the content type
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_type = content_type.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ApiClientConfig {
        self.config
    }
}

/// Error body returned by the services
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

/// Client for one service endpoint
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a client with the given configuration
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self { client, config })
    }

    /// Call an operation and decode its JSON response
    pub async fn call<I, O>(&self, target: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let response = self.send(target, input, Some(self.config.timeout)).await?;
        let body = response.text().await?;
        let output = serde_json::from_str(&body)?;
        Ok(output)
    }

    /// Call an operation whose response body is a long-lived stream
    pub async fn call_streaming<I>(&self, target: &str, input: &I) -> Result<Response>
    where
        I: Serialize + ?Sized,
    {
        self.send(target, input, None).await
    }

    /// `GET` the endpoint root with query parameters and return the raw body
    pub async fn get_text(&self, query: &[(&str, String)]) -> Result<String> {
        let mut req = self
            .client
            .get(&self.config.endpoint)
            .query(query)
            .header("Accept", self.config.content_type.as_str())
            .timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = check_status(req.send().await?, "GET").await?;
        Ok(response.text().await?)
    }

    async fn send<I>(&self, target: &str, input: &I, timeout: Option<Duration>) -> Result<Response>
    where
        I: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(input)?;

        let mut req = self
            .client
            .post(&self.config.endpoint)
            .header("X-Amz-Target", target)
            .header("Content-Type", self.config.content_type.as_str());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(timeout) = timeout {
            req = req.timeout(timeout);
        }

        let response = req.body(body).send().await?;
        check_status(response, target).await
    }
}

/// Turn a non-success response into an API error
async fn check_status(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(parse_api_error(status.as_u16(), &body));
    }

    debug!(target = %operation, status = status.as_u16(), "Request succeeded");
    Ok(response)
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Build an API error from a failed response body
pub(crate) fn parse_api_error(status: u16, body: &str) -> Error {
    // REST-XML services answer with <Error><Code/><Message/></Error>
    if body.trim_start().starts_with('<') {
        let kind = xml::element_text(body, "Code").unwrap_or_else(|| "UnknownError".to_string());
        let message = xml::element_text(body, "Message").unwrap_or_default();
        return Error::api(status, kind, message);
    }

    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => {
            // Types may be namespaced, e.g. "com.amazonaws.logs#ResourceNotFoundException"
            let kind = parsed
                .kind
                .as_deref()
                .map(|k| k.rsplit('#').next().unwrap_or(k).to_string())
                .unwrap_or_else(|| "UnknownError".to_string());
            Error::api(status, kind, parsed.message.unwrap_or_default())
        }
        Err(_) => Error::api(status, "UnknownError", body.trim()),
    }
}
