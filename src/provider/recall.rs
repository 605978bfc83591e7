use super::{check_response, ProviderError, RecallStore, Result};
use crate::memory::Role;
use async_trait::async_trait;
use serde::Serialize;

/// HTTP client for an external long-term memory service.
///
/// The service keeps one ordered list of `{role, content}` pairs per
/// chat and answers similarity queries over it; all vector math lives
/// on the other side of this boundary. The relevance threshold is a
/// tunable, not a constant: when set it travels with the query and the
/// service filters matches below it.
pub struct RecallClient {
    base_url: String,
    score_threshold: Option<f32>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct StoredMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl RecallClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            score_threshold: None,
            client: reqwest::Client::new(),
        }
    }

    /// Drop query matches scoring below `threshold`
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    fn build_query_body(&self, text: &str, k: usize) -> serde_json::Value {
        let mut body = serde_json::json!({
            "text": text,
            "k": k,
        });
        if let Some(threshold) = self.score_threshold {
            body["min_score"] = serde_json::json!(threshold);
        }
        body
    }
}

#[async_trait]
impl RecallStore for RecallClient {
    async fn store(&self, chat_id: &str, role: Role, content: &str) -> Result<()> {
        let payload = serde_json::json!({
            "messages": [StoredMessage { role: role.as_str(), content }],
        });

        let response = self
            .client
            .post(format!("{}/memory/{}", self.base_url, chat_id))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        check_response(response).await?;
        Ok(())
    }

    async fn query(&self, chat_id: &str, text: &str, k: usize) -> Result<Vec<String>> {
        let response = self
            .client
            .post(format!("{}/memory/{}/search", self.base_url, chat_id))
            .json(&self.build_query_body(text, k))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let response = check_response(response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let memories = json["memory"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(chat_id = %chat_id, count = k, "long-term memory query completed");
        Ok(memories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_body_omits_threshold_by_default() {
        let client = RecallClient::new("http://localhost:3001");
        let body = client.build_query_body("what is my name", 3);
        assert_eq!(body["text"], "what is my name");
        assert_eq!(body["k"], 3);
        assert!(body.get("min_score").is_none());
    }

    #[test]
    fn query_body_carries_configured_threshold() {
        let client = RecallClient::new("http://localhost:3001").with_score_threshold(0.65);
        let body = client.build_query_body("q", 5);
        assert!((body["min_score"].as_f64().unwrap() - 0.65).abs() < 1e-6);
    }
}
