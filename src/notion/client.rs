use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{DocumentStore, Page, PageUpdate, PropertyMap, StoreError};
use crate::config::NotionConfig;

/// Error object returned by the Notion API on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Page>,
}

/// Notion REST client
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: Url,
    api_key: String,
    api_version: String,
}

impl NotionClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        // Normalise to a trailing slash; endpoint() pops the empty segment again
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        let base_url = Url::parse(&base)?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            api_version: api_version.into(),
        })
    }

    pub fn from_config(config: &NotionConfig) -> Result<Self, StoreError> {
        Self::new(
            &config.api_base,
            config.api_key.clone().unwrap_or_default(),
            config.api_version.clone(),
            config.timeout(),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL. Each segment is percent-encoded
    /// on its own, so `/`, `?` and `#` inside an id stay part of that id.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut target = self.base_url.clone();
        target
            .path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(target)
    }

    async fn send(&self, method: Method, segments: &[&str], body: Option<Value>) -> Result<Value, StoreError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "notion request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.api_version)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::warn!(error = %e, "notion request timed out");
            }
            StoreError::Http(e)
        })?;

        Self::read_body(response).await
    }

    async fn read_body(response: Response) -> Result<Value, StoreError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => (body.code, body.message),
                Err(_) => (String::new(), text),
            };
            return Err(StoreError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Ids are opaque, but empty and dot segments would address a different resource
fn object_id(id: &str) -> Result<&str, StoreError> {
    match id.trim() {
        "" | "." | ".." => Err(StoreError::InvalidId(id.to_string())),
        _ => Ok(id),
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn query(&self, database_id: &str) -> Result<Vec<Page>, StoreError> {
        let body = self
            .send(Method::POST, &["databases", object_id(database_id)?, "query"], Some(json!({})))
            .await?;
        let response: QueryResponse = serde_json::from_value(body)?;
        Ok(response.results)
    }

    async fn create(&self, database_id: &str, properties: PropertyMap) -> Result<Page, StoreError> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        let page = self.send(Method::POST, &["pages"], Some(body)).await?;
        Ok(serde_json::from_value(page)?)
    }

    async fn update(&self, page_id: &str, update: PageUpdate) -> Result<(), StoreError> {
        self.send(Method::PATCH, &["pages", object_id(page_id)?], Some(update.to_body()))
            .await?;
        Ok(())
    }

    async fn retrieve(&self, page_id: &str) -> Result<Page, StoreError> {
        let page = self.send(Method::GET, &["pages", object_id(page_id)?], None).await?;
        Ok(serde_json::from_value(page)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = NotionClient::new("https://api.notion.com/v1", "k", "2022-06-28", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.notion.com/v1/");
        assert_eq!(
            client.endpoint(&["pages", "abc"]).unwrap().as_str(),
            "https://api.notion.com/v1/pages/abc"
        );
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let client = NotionClient::new("https://api.notion.com/v1/", "k", "v", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(&["pages", "../databases/db1"]).unwrap().as_str(),
            "https://api.notion.com/v1/pages/..%2Fdatabases%2Fdb1"
        );
        assert_eq!(
            client.endpoint(&["pages", "abc?filter=1#x"]).unwrap().path(),
            "/v1/pages/abc%3Ffilter=1%23x"
        );
        assert_eq!(client.endpoint(&["pages", "abc"]).unwrap().query(), None);
    }

    #[test]
    fn dot_and_empty_ids_are_rejected() {
        for id in ["", " ", ".", ".."] {
            assert!(matches!(object_id(id), Err(StoreError::InvalidId(_))), "accepted {:?}", id);
        }
        assert_eq!(object_id("59833787-2cf9-4fdf-8782-e53db20768a5").unwrap(), "59833787-2cf9-4fdf-8782-e53db20768a5");
    }

    #[test]
    fn non_hierarchical_base_is_rejected() {
        let err = NotionClient::new("mailto:ops@example.com", "k", "v", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidUrl(_)));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = NotionClient::new("not a url", "k", "v", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidUrl(_)));
    }
}
