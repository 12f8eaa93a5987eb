use anyhow::Context;
use common::locator;
use common::Metadata;
use reqwest::StatusCode;
use std::time::Duration;

use crate::error::FetchError;

/// Fetches metadata documents, routing `ipfs://` locators through a gateway.
pub struct MetadataClient {
    client: reqwest::Client,
    gateway: String,
}

impl MetadataClient {
    pub fn new(gateway: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build metadata http client")?;

        Ok(Self {
            client,
            gateway: gateway.to_string(),
        })
    }

    pub fn resolve(&self, locator: &str) -> String {
        locator::resolve_locator(locator, &self.gateway)
    }

    /// GET `url` and parse the body as a metadata document. Only a 200 counts.
    pub async fn fetch(&self, url: &str) -> Result<Metadata, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;
        Metadata::from_value(value).ok_or_else(|| FetchError::Parse("expected a JSON object".into()))
    }

    /// Resolve and fetch a token locator, logging instead of returning the error.
    pub async fn fetch_locator(&self, locator: &str) -> Option<Metadata> {
        let url = self.resolve(locator);
        match self.fetch(&url).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::error!("Failed to fetch metadata from {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::extract::Path;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn gateway() -> Router {
        Router::new()
            .route(
                "/ipfs/{cid}",
                get(|Path(cid): Path<String>| async move {
                    match cid.as_str() {
                        "QmTest" => Json(json!({
                            "name": "Mibera #1",
                            "attributes": [{"trait_type": "Background", "value": "Blue"}]
                        }))
                        .into_response(),
                        "QmList" => Json(json!([1, 2, 3])).into_response(),
                        "QmBroken" => "{not json".into_response(),
                        _ => StatusCode::NOT_FOUND.into_response(),
                    }
                }),
            )
            .route("/direct.json", get(|| async { Json(json!({"name": "direct"})) }))
    }

    async fn client(timeout: Duration) -> (MetadataClient, String) {
        let base = test_support::serve(gateway()).await;
        let client = MetadataClient::new(&format!("{base}/ipfs/"), timeout).unwrap();
        (client, base)
    }

    #[tokio::test]
    async fn fetches_ipfs_locator_through_gateway() {
        let (client, base) = client(Duration::from_secs(5)).await;
        assert_eq!(client.resolve("ipfs://QmTest"), format!("{base}/ipfs/QmTest"));

        let metadata = client.fetch_locator("ipfs://QmTest").await.unwrap();
        assert_eq!(metadata.get("name"), Some(&json!("Mibera #1")));
    }

    #[tokio::test]
    async fn fetches_http_locator_directly() {
        let (client, base) = client(Duration::from_secs(5)).await;
        let metadata = client.fetch_locator(&format!("{base}/direct.json")).await.unwrap();
        assert_eq!(metadata.get("name"), Some(&json!("direct")));
    }

    #[tokio::test]
    async fn not_found_is_a_failure() {
        let (client, base) = client(Duration::from_secs(5)).await;
        assert!(matches!(
            client.fetch(&format!("{base}/ipfs/QmMissing")).await,
            Err(FetchError::Status(status)) if status == StatusCode::NOT_FOUND
        ));
        assert!(client.fetch_locator("ipfs://QmMissing").await.is_none());
    }

    #[tokio::test]
    async fn unparseable_or_non_object_body_is_a_failure() {
        let (client, _) = client(Duration::from_secs(5)).await;
        assert!(matches!(
            client.fetch(&client.resolve("ipfs://QmBroken")).await,
            Err(FetchError::Parse(_))
        ));
        assert!(matches!(
            client.fetch(&client.resolve("ipfs://QmList")).await,
            Err(FetchError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn timeout_is_a_failure() {
        let base = test_support::serve(test_support::stalled()).await;
        let client = MetadataClient::new(&format!("{base}/ipfs/"), Duration::from_millis(200)).unwrap();

        let err = client.fetch(&client.resolve("ipfs://QmTest")).await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
        assert!(client.fetch_locator("ipfs://QmTest").await.is_none());
    }
}
