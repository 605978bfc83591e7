use super::{check_response, ImageProvider, ProviderError, Result};
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Combine prior conversation context with the user's image request
/// into a single generation prompt.
pub fn compose_image_prompt(context: &str, request: &str) -> String {
    if context.is_empty() {
        request.to_string()
    } else {
        format!("Earlier context: {}\n\nRequest: {}", context, request)
    }
}

/// OpenAI-compatible image generation client (DALL-E style endpoint).
pub struct ImageGenerationClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl ImageGenerationClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": &self.model,
            "prompt": prompt,
        })
    }
}

#[async_trait]
impl ImageProvider for ImageGenerationClient {
    fn name(&self) -> &str {
        "openai-images"
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.model, "sending image generation request");

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
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

        let url = json["data"][0]["url"].as_str().ok_or_else(|| {
            ProviderError::ParseError("response has no image url".to_string())
        })?;

        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_composition_includes_context_when_present() {
        let prompt = compose_image_prompt("we talked about cats", "draw one");
        assert!(prompt.contains("we talked about cats"));
        assert!(prompt.contains("draw one"));
    }

    #[test]
    fn prompt_composition_is_plain_request_without_context() {
        assert_eq!(compose_image_prompt("", "draw a cat"), "draw a cat");
    }

    #[test]
    fn request_body_carries_model_and_prompt() {
        let client = ImageGenerationClient::new("key", "dall-e-3");
        let body = client.build_request_body("a red fox");
        assert_eq!(body["model"], "dall-e-3");
        assert_eq!(body["prompt"], "a red fox");
    }
}
