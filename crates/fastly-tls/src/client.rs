//! Asynchronous TLS client implementation.

use crate::models::{
    CreateTlsSubscriptionInput, CustomTlsDomain, DeleteTlsSubscriptionInput,
    GetTlsSubscriptionInput, ListAllTlsDomainsInput, ListAllTlsSubscriptionsInput,
    ListTlsDomainsInput, ListTlsSubscriptionsInput, TlsSubscription, TLS_SUBSCRIPTION_TYPE,
};
use crate::Result;
use async_trait::async_trait;
use fastly_core::client::{ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder};
use fastly_core::config::FastlyClientConfig;
use fastly_core::jsonapi::{self, JSONAPI_MEDIA_TYPE};
use fastly_core::pagination::{collect_all_pages, Page, PageCursor, PageSource};
use fastly_core::query::ListFilters;
use fastly_core::types::ApiArea;
use fastly_core::{Error, RequiredField, DEFAULT_PAGE_SIZE};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::info;
use url::Url;

const USER_AGENT: &str = concat!("fastly-tls/", env!("CARGO_PKG_VERSION"));
const SUBSCRIPTIONS_PATH: &str = "tls/subscriptions";
const DOMAINS_PATH: &str = "tls/domains";

/// Builder for [`TlsClient`].
#[derive(Debug, Clone)]
pub struct TlsClientBuilder {
    inner: ServiceClientBuilder,
    page_size: u32,
}

impl TlsClientBuilder {
    /// Create a builder for the specified base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder =
            ServiceClientBuilder::new(ApiArea::Tls, base_url, ApiArea::Tls.default_timeout())?
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
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
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

    /// Page size used by the `list_all_*` operations (defaults to 20).
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TlsClient> {
        let inner = self.inner.build()?;
        Ok(TlsClient {
            inner,
            page_size: self.page_size,
        })
    }
}

/// Asynchronous client for TLS subscriptions and custom TLS domains.
#[derive(Clone)]
pub struct TlsClient {
    inner: ServiceClient,
    page_size: u32,
}

impl TlsClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        TlsClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a shared client configuration.
    pub fn from_config(config: &FastlyClientConfig) -> Result<Self> {
        TlsClientBuilder::from_config(config)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Page size used when listing every page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// List one page of TLS subscriptions.
    pub async fn list_tls_subscriptions(
        &self,
        input: &ListTlsSubscriptionsInput,
    ) -> Result<Page<TlsSubscription>> {
        let params = input.format_filters();
        let body = self
            .send_jsonapi(Method::GET, SUBSCRIPTIONS_PATH, None, params.as_pairs())
            .await?;
        let (items, info) = jsonapi::decode_many::<TlsSubscription>(&body)?;
        Ok(Page::new(items, info))
    }

    /// List every TLS subscription, following pages until the last one.
    pub async fn list_all_tls_subscriptions(
        &self,
        input: &ListAllTlsSubscriptionsInput,
    ) -> Result<Page<TlsSubscription>> {
        let pages = SubscriptionPages {
            client: self,
            input,
        };
        collect_all_pages(&pages, self.page_size).await
    }

    /// Request a new TLS subscription for one or more domains.
    pub async fn create_tls_subscription(
        &self,
        input: &CreateTlsSubscriptionInput,
    ) -> Result<TlsSubscription> {
        input.validate()?;
        let document = jsonapi::encode_one(
            TLS_SUBSCRIPTION_TYPE,
            None,
            &input.attributes(),
            input.relationships(),
        )?;
        let body = self
            .send_jsonapi(Method::POST, SUBSCRIPTIONS_PATH, Some(&document), &[])
            .await?;
        let subscription: TlsSubscription = jsonapi::decode_one(&body)?;
        info!(
            subscription_id = %subscription.id,
            domains = input.domains.len(),
            "Created TLS subscription"
        );
        Ok(subscription)
    }

    /// Fetch a TLS subscription, optionally side-loading related resources.
    pub async fn get_tls_subscription(
        &self,
        input: &GetTlsSubscriptionInput,
    ) -> Result<TlsSubscription> {
        if input.id.is_empty() {
            return Err(Error::MissingRequiredField(RequiredField::Id));
        }

        let path = format!("{SUBSCRIPTIONS_PATH}/{}", input.id);
        let params: Vec<(&'static str, String)> = input
            .include
            .iter()
            .map(|include| ("include", include.clone()))
            .collect();
        let body = self
            .send_jsonapi(Method::GET, &path, None, &params)
            .await?;
        jsonapi::decode_one(&body)
    }

    /// Delete a TLS subscription.
    pub async fn delete_tls_subscription(&self, input: &DeleteTlsSubscriptionInput) -> Result<()> {
        if input.id.is_empty() {
            return Err(Error::MissingRequiredField(RequiredField::Id));
        }

        let path = format!("{SUBSCRIPTIONS_PATH}/{}", input.id);
        self.send_jsonapi(Method::DELETE, &path, None, &[]).await?;
        info!(subscription_id = %input.id, "Deleted TLS subscription");
        Ok(())
    }

    /// List one page of custom TLS domains.
    pub async fn list_tls_domains(
        &self,
        input: &ListTlsDomainsInput,
    ) -> Result<Page<CustomTlsDomain>> {
        let params = input.format_filters();
        let body = self
            .send_jsonapi(Method::GET, DOMAINS_PATH, None, params.as_pairs())
            .await?;
        let (items, info) = jsonapi::decode_many::<CustomTlsDomain>(&body)?;
        Ok(Page::new(items, info))
    }

    /// List every custom TLS domain, following pages until the last one.
    pub async fn list_all_tls_domains(
        &self,
        input: &ListAllTlsDomainsInput,
    ) -> Result<Page<CustomTlsDomain>> {
        let pages = DomainPages {
            client: self,
            input,
        };
        collect_all_pages(&pages, self.page_size).await
    }

    async fn send_jsonapi(
        &self,
        method: Method,
        path: &str,
        document: Option<&Value>,
        params: &[(&'static str, String)],
    ) -> Result<Vec<u8>> {
        let response = self
            .inner
            .execute_with_retry(
                method,
                path,
                params,
                |mut request| {
                    request = request.header(ACCEPT, JSONAPI_MEDIA_TYPE);
                    if let Some(payload) = document {
                        request = request
                            .header(CONTENT_TYPE, JSONAPI_MEDIA_TYPE)
                            .body(payload.to_string());
                    }
                    request
                },
                map_status_to_error,
            )
            .await?;

        let body = response.bytes().await.map_err(Error::from)?;
        Ok(body.to_vec())
    }
}

struct SubscriptionPages<'a> {
    client: &'a TlsClient,
    input: &'a ListAllTlsSubscriptionsInput,
}

#[async_trait]
impl PageSource for SubscriptionPages<'_> {
    type Item = TlsSubscription;

    async fn fetch_page(&self, cursor: PageCursor) -> Result<Page<TlsSubscription>> {
        let input = self.input.page(cursor.number, cursor.size);
        self.client.list_tls_subscriptions(&input).await
    }
}

struct DomainPages<'a> {
    client: &'a TlsClient,
    input: &'a ListAllTlsDomainsInput,
}

#[async_trait]
impl PageSource for DomainPages<'_> {
    type Item = CustomTlsDomain;

    async fn fetch_page(&self, cursor: PageCursor) -> Result<Page<CustomTlsDomain>> {
        let input = self.input.page(cursor.number, cursor.size);
        self.client.list_tls_domains(&input).await
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("TLS API authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("TLS API temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("TLS API server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("TLS API error {status}: {text}")),
    }
}
