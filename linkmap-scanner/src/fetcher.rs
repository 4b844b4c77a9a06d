use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Linkmap/0.1 (https://github.com/trapdoorsec/linkmap)";

/// Retrieves page bodies for the crawler.
///
/// Any non-2xx status, timeout or transport problem is a [`FetchError`];
/// the crawler treats every variant the same way.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

/// Whether the HTTP fetcher follows redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Redirect responses are returned as-is (and so count as failures).
    None,
    /// Follow at most this many hops.
    Limited(usize),
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        RedirectPolicy::Limited(5)
    }
}

impl From<RedirectPolicy> for reqwest::redirect::Policy {
    fn from(policy: RedirectPolicy) -> Self {
        match policy {
            RedirectPolicy::None => reqwest::redirect::Policy::none(),
            RedirectPolicy::Limited(max) => reqwest::redirect::Policy::limited(max),
        }
    }
}

/// [`Fetcher`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_TIMEOUT_SECS, RedirectPolicy::default())
    }

    pub fn with_settings(timeout_secs: u64, redirects: RedirectPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(redirects.into())
            .build()?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}
