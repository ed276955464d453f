//! Asynchronous WAF version client implementation.

use crate::models::{
    ListAllWafVersionsInput, ListWafVersionsInput, UpdateWafVersionInput, WafVersion,
    WafVersionKey, WAF_VERSION_TYPE,
};
use crate::Result;
use async_trait::async_trait;
use fastly_core::client::{ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder};
use fastly_core::config::FastlyClientConfig;
use fastly_core::id::WafId;
use fastly_core::jsonapi::{self, JSONAPI_MEDIA_TYPE};
use fastly_core::pagination::{collect_all_pages, Page, PageCursor, PageSource};
use fastly_core::query::ListFilters;
use fastly_core::types::ApiArea;
use fastly_core::{Error, RequiredField, DEFAULT_PAGE_SIZE};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::info;
use url::Url;

const USER_AGENT: &str = concat!("fastly-waf/", env!("CARGO_PKG_VERSION"));

/// Builder for [`WafClient`].
#[derive(Debug, Clone)]
pub struct WafClientBuilder {
    inner: ServiceClientBuilder,
    page_size: u32,
}

impl WafClientBuilder {
    /// Create a builder for the specified base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder =
            ServiceClientBuilder::new(ApiArea::Waf, base_url, ApiArea::Waf.default_timeout())?
                .with_user_agent(USER_AGENT);

        Ok(Self {
            inner: builder,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Create a builder from a shared client configuration.
    pub fn from_config(config: &FastlyClientConfig) -> Result<Self> {
        let mut builder = Self::new(&config.api_url)?
            .with_timeout(config.timeout())
            .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries))
            .with_tls_verify(config.tls_verify)
            .with_page_size(config.page_size);
        if let Some(api_key) = &config.api_key {
            builder = builder.with_api_key(api_key.clone());
        }
        Ok(builder)
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    /// Configure the API token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.inner = self.inner.with_api_key(api_key);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.inner = self.inner.with_tls_verify(verify);
        self
    }

    /// Page size used by [`WafClient::list_all_waf_versions`] (defaults to 20).
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<WafClient> {
        let inner = self.inner.build()?;
        Ok(WafClient {
            inner,
            page_size: self.page_size,
        })
    }
}

/// Asynchronous client for WAF firewall versions.
#[derive(Clone)]
pub struct WafClient {
    inner: ServiceClient,
    page_size: u32,
}

impl WafClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        WafClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a shared client configuration.
    pub fn from_config(config: &FastlyClientConfig) -> Result<Self> {
        WafClientBuilder::from_config(config)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Page size used when listing every version.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// List one page of versions of a firewall.
    pub async fn list_waf_versions(
        &self,
        input: &ListWafVersionsInput,
    ) -> Result<Page<WafVersion>> {
        if input.waf_id.is_empty() {
            return Err(Error::MissingRequiredField(RequiredField::WafId));
        }

        let path = versions_path(&input.waf_id);
        let params = input.format_filters();
        let body = self
            .send_jsonapi(Method::GET, &path, None, params.as_pairs(), Delivery::Retry)
            .await?;
        let (items, info) = jsonapi::decode_many::<WafVersion>(&body)?;
        Ok(Page::new(items, info))
    }

    /// List every version of a firewall, following pages until the last one.
    pub async fn list_all_waf_versions(
        &self,
        input: &ListAllWafVersionsInput,
    ) -> Result<Page<WafVersion>> {
        if input.waf_id.is_empty() {
            return Err(Error::MissingRequiredField(RequiredField::WafId));
        }

        let pages = WafVersionPages {
            client: self,
            input,
        };
        collect_all_pages(&pages, self.page_size).await
    }

    /// Fetch a single version.
    pub async fn get_waf_version(&self, key: &WafVersionKey) -> Result<WafVersion> {
        key.validate()?;
        let body = self
            .send_jsonapi(Method::GET, &key.path(), None, &[], Delivery::Retry)
            .await?;
        jsonapi::decode_one(&body)
    }

    /// Update the attributes of a version.
    pub async fn update_waf_version(&self, input: &UpdateWafVersionInput) -> Result<WafVersion> {
        input.validate()?;
        let document = jsonapi::encode_one(
            WAF_VERSION_TYPE,
            Some(input.waf_version_id.as_str()),
            input,
            Vec::new(),
        )?;
        let body = self
            .send_jsonapi(
                Method::PATCH,
                &input.key().path(),
                Some(&document),
                &[],
                Delivery::Retry,
            )
            .await?;
        jsonapi::decode_one(&body)
    }

    /// Lock a version against further edits.
    pub async fn lock_waf_version(&self, key: &WafVersionKey) -> Result<WafVersion> {
        key.validate()?;
        let path = format!("{}/lock", key.path());
        let body = self
            .send_jsonapi(Method::PUT, &path, None, &[], Delivery::Retry)
            .await?;
        jsonapi::decode_one(&body)
    }

    /// Clone a version into a new, editable version.
    pub async fn clone_waf_version(&self, key: &WafVersionKey) -> Result<WafVersion> {
        key.validate()?;
        let path = format!("{}/clone", key.path());
        let body = self
            .send_jsonapi(Method::PUT, &path, None, &[], Delivery::Once)
            .await?;
        jsonapi::decode_one(&body)
    }

    /// Deploy a version to the firewall.
    pub async fn deploy_waf_version(&self, key: &WafVersionKey) -> Result<()> {
        key.validate()?;
        info!(
            waf_id = %key.waf_id,
            version = key.waf_version_number,
            "Deploying WAF version"
        );
        self.send_jsonapi(Method::POST, &key.path(), None, &[], Delivery::Retry)
            .await
            .map(|_| ())
    }

    async fn send_jsonapi(
        &self,
        method: Method,
        path: &str,
        document: Option<&Value>,
        params: &[(&'static str, String)],
        delivery: Delivery,
    ) -> Result<Vec<u8>> {
        let customize = |mut request: RequestBuilder| {
            request = request.header(ACCEPT, JSONAPI_MEDIA_TYPE);
            if let Some(payload) = document {
                request = request
                    .header(CONTENT_TYPE, JSONAPI_MEDIA_TYPE)
                    .body(payload.to_string());
            }
            request
        };
        let response = match delivery {
            Delivery::Retry => {
                self.inner
                    .execute_with_retry(method, path, params, customize, map_status_to_error)
                    .await?
            }
            Delivery::Once => {
                self.inner
                    .execute_once(method, path, params, customize, map_status_to_error)
                    .await?
            }
        };

        let body = response.bytes().await.map_err(Error::from)?;
        Ok(body.to_vec())
    }
}

/// Whether a failed request may be re-sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    /// Retried per the client's retry policy (POST and PATCH are never retried).
    Retry,
    /// Sent exactly once; the endpoint creates a resource on every call.
    Once,
}

fn versions_path(waf_id: &WafId) -> String {
    format!("waf/firewalls/{waf_id}/versions")
}

struct WafVersionPages<'a> {
    client: &'a WafClient,
    input: &'a ListAllWafVersionsInput,
}

#[async_trait]
impl PageSource for WafVersionPages<'_> {
    type Item = WafVersion;

    async fn fetch_page(&self, cursor: PageCursor) -> Result<Page<WafVersion>> {
        let input = self.input.page(cursor.number, cursor.size);
        self.client.list_waf_versions(&input).await
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("WAF API authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("WAF API temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("WAF API server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("WAF API error {status}: {text}")),
    }
}
