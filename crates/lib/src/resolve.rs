//! Canonical URL resolution.
//!
//! Applications are registered under the URL their configured address finally
//! redirects to. Resolution is best-effort: any failure falls back to the
//! configured URL.

use std::future::Future;

use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::debug;

use crate::consts::{RESOLVE_USER_AGENT, URL_RESOLVE_MAX_REDIRECTS, URL_RESOLVE_TIMEOUT};

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("timed out resolving {url}")]
  Timeout { url: String },

  #[error("request to {url} failed: {message}")]
  Request { url: String, message: String },

  #[error("failed to build HTTP client: {0}")]
  Client(String),
}

/// Maps a configured URL to the URL an application should be registered under.
pub trait UrlResolver {
  fn resolve(&self, url: &str) -> impl Future<Output = Result<String, ResolveError>>;
}

/// Follows redirects with a `HEAD` request.
#[derive(Debug, Clone)]
pub struct HttpResolver {
  client: reqwest::Client,
}

impl HttpResolver {
  pub fn new() -> Result<Self, ResolveError> {
    let client = reqwest::Client::builder()
      .redirect(Policy::limited(URL_RESOLVE_MAX_REDIRECTS))
      .timeout(URL_RESOLVE_TIMEOUT)
      .user_agent(RESOLVE_USER_AGENT)
      .build()
      .map_err(|e| ResolveError::Client(e.to_string()))?;
    Ok(Self { client })
  }
}

impl UrlResolver for HttpResolver {
  async fn resolve(&self, url: &str) -> Result<String, ResolveError> {
    let response = self.client.head(url).send().await.map_err(|e| {
      if e.is_timeout() {
        ResolveError::Timeout { url: url.to_string() }
      } else {
        ResolveError::Request {
          url: url.to_string(),
          message: e.to_string(),
        }
      }
    })?;

    // The final URL is what we want, whatever status the site answers a
    // HEAD request with.
    Ok(response.url().to_string())
  }
}

/// Leaves every URL as configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl UrlResolver for Passthrough {
  async fn resolve(&self, url: &str) -> Result<String, ResolveError> {
    Ok(url.to_string())
  }
}

/// Resolve `url`, falling back to it unchanged on any error.
pub async fn resolve_or_fallback<R: UrlResolver>(resolver: &R, url: &str) -> String {
  match resolver.resolve(url).await {
    Ok(resolved) => {
      if resolved != url {
        debug!(from = %url, to = %resolved, "resolved redirect");
      }
      resolved
    }
    Err(e) => {
      debug!(url = %url, error = %e, "URL resolution failed, using configured URL");
      url.to_string()
    }
  }
}
