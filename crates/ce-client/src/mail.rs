//! Mail draft creation.

use crate::error::ClientResult;
use crate::http::{check, json_body};
use ce_reconcile::EmailDraft;
use reqwest::Client;

/// Creates drafts through a Graph-compatible `messages` endpoint.
#[derive(Debug, Clone)]
pub struct MailClient {
    client: Client,
    messages_url: String,
}

impl MailClient {
    pub fn new(messages_url: &str) -> Self {
        Self {
            client: Client::new(),
            messages_url: messages_url.to_string(),
        }
    }

    /// POST the draft; returns the created message as the endpoint reports it.
    pub async fn create_draft(
        &self,
        access_token: &str,
        draft: &EmailDraft,
    ) -> ClientResult<serde_json::Value> {
        log::debug!(
            "Creating draft '{}' for {} recipient(s)",
            draft.subject,
            draft.to.len()
        );
        let response = self
            .client
            .post(&self.messages_url)
            .bearer_auth(access_token)
            .json(&draft.to_graph_payload())
            .send()
            .await?;
        json_body(check(response).await?).await
    }
}
