use async_trait::async_trait;

/// Gateway 错误类型
#[derive(Debug)]
pub enum GatewayError {
    /// 请求失败
    RequestFailed(String),
    /// Gateway rejected the request
    Rejected { status: u16, body: String },
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            Self::Rejected { status, body } => {
                write!(f, "Gateway rejected request ({}): {}", status, body)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Outbound side of the messaging gateway.
///
/// The gateway owns all WhatsApp protocol work; this crate only posts
/// text and image replies back to it.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<()>;

    async fn send_image(&self, chat_id: &str, image_url: &str) -> Result<()>;
}

/// HTTP client for a WAHA-style WhatsApp gateway.
pub struct WahaGateway {
    base_url: String,
    api_key: Option<String>,
    session: String,
    client: reqwest::Client,
}

impl WahaGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            session: "default".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    async fn post(&self, endpoint: &str, payload: serde_json::Value) -> Result<()> {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected { status: status.as_u16(), body });
        }

        tracing::debug!(endpoint = %endpoint, status = status.as_u16(), "gateway request completed");
        Ok(())
    }
}

#[async_trait]
impl Gateway for WahaGateway {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<()> {
        self.post(
            "/api/sendText",
            serde_json::json!({
                "chatId": chat_id,
                "text": text,
                "session": &self.session,
            }),
        )
        .await
    }

    async fn send_image(&self, chat_id: &str, image_url: &str) -> Result<()> {
        self.post(
            "/api/sendImage",
            serde_json::json!({
                "chatId": chat_id,
                "file": { "url": image_url },
                "session": &self.session,
            }),
        )
        .await
    }
}
