use super::{check_response, CompletionProvider, ProviderError, Result};
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completion client.
///
/// The relay sends the whole assembled prompt as one user message; the
/// conversation shape lives in the prompt text, not in the request.
pub struct ChatCompletionClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl ChatCompletionClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a compatible non-OpenAI endpoint
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": &self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                }
            ],
        })
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.model, chars = prompt.chars().count(), "sending chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let response = check_response(response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::ParseError("response has no message content".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_wraps_prompt_as_single_user_message() {
        let client = ChatCompletionClient::new("key", "gpt-4.1-mini");
        let body = client.build_request_body("hello there");

        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello there");
    }

    #[test]
    fn base_url_is_overridable() {
        let client =
            ChatCompletionClient::new("key", "m").with_base_url("http://localhost:8080/v1");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
        assert_eq!(client.model(), "m");
    }
}
