//! DNS-over-HTTPS backend (JSON API).

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ResolverError, ResolverResult};
use crate::name::clean_txt_value;
use crate::TxtResolver;

/// Google Public DNS JSON endpoint
pub const GOOGLE_DOH_URL: &str = "https://dns.google/resolve";

/// Cloudflare JSON endpoint
pub const CLOUDFLARE_DOH_URL: &str = "https://cloudflare-dns.com/dns-query";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

const DNS_JSON: &str = "application/dns-json";
const RR_TYPE_TXT: u16 = 16;
const RCODE_NOERROR: u16 = 0;
const RCODE_NXDOMAIN: u16 = 3;

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: u16,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    #[serde(default)]
    data: String,
}

/// Resolver backed by a public DoH provider
#[derive(Clone)]
pub struct DohResolver {
    inner: Arc<DohInner>,
}

struct DohInner {
    http: HttpClient,
    name: String,
    endpoint: Url,
}

impl DohResolver {
    /// Create a builder for a custom endpoint
    #[must_use]
    pub fn builder(name: impl Into<String>, endpoint: impl Into<String>) -> DohResolverBuilder {
        DohResolverBuilder::new(name, endpoint)
    }

    /// Google Public DNS with default settings
    pub fn google() -> ResolverResult<Self> {
        Self::builder("google", GOOGLE_DOH_URL).build()
    }

    /// Cloudflare DNS with default settings
    pub fn cloudflare() -> ResolverResult<Self> {
        Self::builder("cloudflare", CLOUDFLARE_DOH_URL).build()
    }

    /// Endpoint this resolver talks to
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    fn query_url(&self, host: &str) -> Url {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", host)
            .append_pair("type", "TXT");
        url
    }
}

#[async_trait]
impl TxtResolver for DohResolver {
    fn name(&self) -> &str {
        &self.inner.name
    }

    #[instrument(skip(self), fields(resolver = %self.inner.name))]
    async fn query_txt(&self, host: &str) -> ResolverResult<Vec<String>> {
        let url = self.query_url(host);
        debug!(url = %url, "DoH request");

        let response = self
            .inner
            .http
            .get(url)
            .header(ACCEPT, DNS_JSON)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        let parsed: DohResponse =
            serde_json::from_str(&body).map_err(|e| ResolverError::Malformed(e.to_string()))?;

        match parsed.status {
            RCODE_NOERROR => Ok(parsed
                .answer
                .iter()
                // CNAME chains show up in Answer too
                .filter(|a| a.record_type == RR_TYPE_TXT)
                .map(|a| clean_txt_value(&a.data))
                .collect()),
            RCODE_NXDOMAIN => Ok(Vec::new()),
            rcode => Err(ResolverError::DnsStatus(rcode)),
        }
    }
}

fn transport_error(err: reqwest::Error) -> ResolverError {
    if err.is_timeout() {
        ResolverError::Timeout
    } else {
        ResolverError::Http(err.to_string())
    }
}

/// Builder for configuring a [`DohResolver`]
pub struct DohResolverBuilder {
    name: String,
    endpoint: String,
    timeout: Duration,
    user_agent: String,
}

impl DohResolverBuilder {
    /// Create a new builder for the given endpoint
    #[must_use]
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("domverify/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the resolver
    pub fn build(self) -> ResolverResult<DohResolver> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| ResolverError::Config(format!("invalid DoH url {}: {e}", self.endpoint)))?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ResolverError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(DohResolver {
            inner: Arc::new(DohInner {
                http,
                name: self.name,
                endpoint,
            }),
        })
    }
}
