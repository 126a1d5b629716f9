//! Notion record-keeping client
//!
//! Each awarded bounty becomes a page in a configured Notion database:
//! title = winner's GitHub login, number = bounty amount.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::RelayError;
use crate::webhook::BountyRecorder;

const NOTION_API_BASE: &str = "https://api.notion.com";
const NOTION_VERSION: &str = "2022-06-28";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NotionClient {
    api_key: String,
    database_id: String,
    base_url: String,
    http: reqwest::Client,
}

impl NotionClient {
    pub fn new(api_key: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            database_id: database_id.into(),
            base_url: NOTION_API_BASE.to_string(),
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Point API calls at a different base URL (for tests).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }

    /// Create the bounty record page.
    pub async fn create_bounty_record(
        &self,
        username: &str,
        amount: f64,
    ) -> Result<(), RelayError> {
        debug!("recording bounty for {username}: ${amount}");

        let body = serde_json::json!({
            "parent": { "database_id": self.database_id },
            "properties": {
                "Name": {
                    "title": [ { "text": { "content": username } } ]
                },
                "Amount": { "number": amount },
            }
        });

        let response = self
            .http
            .post(format!("{}/v1/pages", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(RelayError::Downstream {
                service: "notion",
                detail: format!("{status}: {detail}"),
            });
        }

        info!("bounty recorded in notion: {username} / ${amount}");
        Ok(())
    }
}

#[async_trait]
impl BountyRecorder for NotionClient {
    async fn record_bounty(&self, username: &str, amount: f64) -> Result<(), RelayError> {
        self.create_bounty_record(username, amount).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_creates_database_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .and(header("authorization", "Bearer notion-key"))
            .and(header("Notion-Version", NOTION_VERSION))
            .and(body_string_contains("db-id"))
            .and(body_string_contains("alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "page", "id": "page-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NotionClient::new("notion-key", "db-id").with_base_url(server.uri());
        client.create_bounty_record("alice", 50.0).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_is_downstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "validation_error"})),
            )
            .mount(&server)
            .await;

        let client = NotionClient::new("notion-key", "db-id").with_base_url(server.uri());
        let err = client.create_bounty_record("alice", 50.0).await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::Downstream {
                service: "notion",
                ..
            }
        ));
    }
}
