//! HTTP access to the FxTwitter API and to image hosts.

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::Post;

use super::fxtwitter::parse_response;
use super::{MediaFetcher, PostSource};

/// Settings for [`FxTwitterClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub user_agent: String,
    /// Timeout of API requests
    pub timeout: Duration,
    /// Timeout of image downloads
    pub media_timeout: Duration,
    /// Minimum gap between two API requests
    pub request_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.fxtwitter.com".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout: Duration::from_secs(30),
            media_timeout: Duration::from_secs(60),
            request_delay: Duration::from_millis(500),
        }
    }
}

/// Blocking client for `GET <api_base>/i/status/<id>`.
///
/// Consecutive API requests are spaced by `request_delay`; the thread walk issues them
/// back to back otherwise.
pub struct FxTwitterClient {
    http: Client,
    config: ClientConfig,
    last_request: Cell<Option<Instant>>,
}

impl FxTwitterClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            config,
            last_request: Cell::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.config.request_delay {
                thread::sleep(self.config.request_delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    fn status_url(&self, id: &str) -> String {
        format!(
            "{}/i/status/{}",
            self.config.api_base.trim_end_matches('/'),
            id
        )
    }
}

impl PostSource for FxTwitterClient {
    fn fetch_post(&self, id: &str) -> Result<Post> {
        self.throttle();
        let url = self.status_url(id);
        info!(%url, "fetching post");

        let response = self.http.get(&url).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(Error::NotFound(id.to_string())),
            status if !status.is_success() => {
                return Err(Error::Api(format!("HTTP {status} for {url}")));
            }
            _ => {}
        }

        let body = response.text()?;
        parse_response(&body)
    }
}

impl MediaFetcher for FxTwitterClient {
    fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!(%url, "downloading image");
        let response = self
            .http
            .get(url)
            .timeout(self.config.media_timeout)
            .send()?
            .error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
