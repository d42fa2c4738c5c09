use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::HttpConfig;
use crate::error::AppError;
use crate::search::PAGE_SIZE;

/// Remote repository lookup. Implemented by [`SearchClient`]; tests swap in
/// scripted fakes.
#[async_trait]
pub trait RepoSearch: Send + Sync {
    /// Returns the raw JSON body of a successful search.
    ///
    /// Transport and HTTP failures come back as an [`AppError`] inside the
    /// `anyhow::Error`; anything else (an undecodable body) is unexpected.
    async fn search(&self, query: &str) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct SearchClient {
    pub base_url: String,
    inner: reqwest::Client,
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>, http: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&http.user_agent).context("invalid user agent")?,
        );
        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_millis(http.connect_timeout_ms))
            .timeout(Duration::from_millis(http.request_timeout_ms))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: base_url.into(),
            inner,
        })
    }

    pub(crate) fn endpoint(&self) -> String {
        format!(
            "{}/search/repositories",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl RepoSearch for SearchClient {
    async fn search(&self, query: &str) -> Result<Value> {
        let url = self.endpoint();
        let per_page = PAGE_SIZE.to_string();
        debug!(endpoint=%url, query=%query, "searching repositories");

        let resp = match self
            .inner
            .get(&url)
            .query(&[("q", query), ("per_page", per_page.as_str())])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                error!(err=%e, "search request failed to send");
                return Err(anyhow::anyhow!(AppError::Offline));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            error!(status=%status.as_u16(), "search returned non-success status");
            return Err(anyhow::anyhow!(AppError::server(status.as_u16())));
        }

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                error!(err=%e, "search response body read failed");
                return Err(anyhow::anyhow!(AppError::Offline));
            }
        };

        let body: Value = serde_json::from_str(&text).context("decode search response")?;
        info!(query=%query, "search completed");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};

    fn client_for(server: &Server) -> SearchClient {
        SearchClient::new(server.url_str(""), &HttpConfig::default()).unwrap()
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = SearchClient::new("https://api.github.com/", &HttpConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.github.com/search/repositories"
        );
    }

    #[tokio::test]
    async fn search_happy_path() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/search/repositories"),
                request::query(url_decoded(contains(("q", "react native")))),
                request::query(url_decoded(contains(("per_page", "5")))),
                request::headers(contains(key("user-agent"))),
            ])
            .respond_with(json_encoded(serde_json::json!({
                "total_count": 1,
                "items": [
                    {"name": "react-native", "owner": {"login": "facebook"}, "stargazers_count": 120000}
                ]
            }))),
        );

        let body = client_for(&server).search("react native").await.unwrap();
        assert_eq!(body["items"][0]["name"], "react-native");
    }

    #[tokio::test]
    async fn search_maps_server_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/search/repositories"))
                .respond_with(status_code(503).body("unavailable")),
        );

        let err = client_for(&server).search("react").await.unwrap_err();
        assert_eq!(err.downcast_ref::<AppError>(), Some(&AppError::server(503)));
    }

    #[tokio::test]
    async fn search_maps_client_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/search/repositories"))
                .respond_with(status_code(422)),
        );

        let err = client_for(&server).search("react").await.unwrap_err();
        let app = err.downcast_ref::<AppError>().unwrap();
        assert_eq!(app.status(), Some(422));
        assert_eq!(format!("{app}"), "HTTP request failed, status code: 422");
    }

    #[tokio::test]
    async fn search_without_network_is_offline() {
        let url = {
            let server = Server::run();
            server.url_str("")
        };
        // The server is gone, so the connection is refused.
        let client = SearchClient::new(url, &HttpConfig::default()).unwrap();
        let err = client.search("react").await.unwrap_err();
        assert_eq!(err.downcast_ref::<AppError>(), Some(&AppError::Offline));
    }

    #[tokio::test]
    async fn undecodable_body_is_not_a_taxonomy_error() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/search/repositories"))
                .respond_with(status_code(200).body("<html>oops</html>")),
        );

        let err = client_for(&server).search("react").await.unwrap_err();
        assert!(err.downcast_ref::<AppError>().is_none());
        assert!(format!("{err}").contains("decode search response"));
    }
}
