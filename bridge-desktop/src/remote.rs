//! Resource store over a static HTTP host

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpRequest},
    storage::ResourceStore,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

/// Fetches `<base_url>/<name>` through an injected [`HttpClient`].
///
/// A 404 maps to `BridgeError::NotFound`; any other non-2xx status is an
/// operation failure carrying the status code.
pub struct HttpResourceStore {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl HttpResourceStore {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }
}

#[async_trait]
impl ResourceStore for HttpResourceStore {
    async fn fetch(&self, name: &str) -> Result<Bytes> {
        let url = self.url_for(name);
        let response = self
            .client
            .execute(HttpRequest::get(&url).accept_json())
            .await?;

        if response.is_not_found() {
            return Err(BridgeError::NotFound(name.to_string()));
        }

        if !response.is_success() {
            return Err(BridgeError::OperationFailed(format!(
                "HTTP {} fetching {}",
                response.status, url
            )));
        }

        debug!(url = %url, size = response.body.len(), "Fetched resource");
        Ok(response.body)
    }

    fn describe(&self) -> String {
        format!("http {}", self.base_url)
    }
}
