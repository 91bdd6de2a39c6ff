//! Async HTTP client wrapping the Teledok JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};

/// Connection settings for the Teledok API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
  pub base_url:    String,
  /// Major API version used in request paths.
  pub api_version: u8,
}

/// Async HTTP client for the Teledok JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api/v{}{}",
      self.config.base_url.trim_end_matches('/'),
      self.config.api_version,
      path
    )
  }

  async fn send(&self, method: Method, path: &str, req: RequestBuilder) -> Result<Response> {
    tracing::debug!(%method, url = %self.url(path), "sending request");
    let resp = req.send().await.with_context(|| format!("{method} {path} failed"))?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(anyhow!("{method} {path} → {status}: {body}"));
    }
    Ok(resp)
  }

  /// `GET /api/v{n}{path}`
  pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let req = self.client.get(self.url(path));
    let resp = self.send(Method::GET, path, req).await?;
    resp.json().await.with_context(|| format!("deserialising response of GET {path}"))
  }

  /// `POST` a create command; returns the new id.
  pub async fn create<B: Serialize>(&self, path: &str, body: &B) -> Result<i64> {
    let req = self.client.post(self.url(path)).json(body);
    let resp = self.send(Method::POST, path, req).await?;
    resp.json().await.context("deserialising new id")
  }

  /// `PUT` an update command.
  pub async fn update<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
    let req = self.client.put(self.url(path)).json(body);
    self.send(Method::PUT, path, req).await?;
    Ok(())
  }

  pub async fn delete(&self, path: &str) -> Result<()> {
    let req = self.client.delete(self.url(path));
    self.send(Method::DELETE, path, req).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_base_version_and_path() {
    let client = ApiClient::new(ApiConfig {
      base_url:    "http://localhost:5000/".into(),
      api_version: 2,
    })
    .unwrap();
    assert_eq!(client.url("/Person/3"), "http://localhost:5000/api/v2/Person/3");
  }
}
