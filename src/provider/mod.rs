mod chat;
mod image;
mod recall;

pub use chat::ChatCompletionClient;
pub use image::{compose_image_prompt, ImageGenerationClient};
pub use recall::RecallClient;

use crate::memory::Role;
use async_trait::async_trait;

/// Provider 错误类型
#[derive(Debug)]
pub enum ProviderError {
    /// API 请求失败
    RequestFailed(String),
    /// 认证失败
    AuthenticationFailed,
    /// 速率限制
    RateLimited { retry_after: Option<u64> },
    /// 响应解析失败
    ParseError(String),
    /// 其他错误
    Other(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            Self::AuthenticationFailed => write!(f, "Authentication failed"),
            Self::RateLimited { retry_after } => {
                write!(f, "Rate limited")?;
                if let Some(secs) = retry_after {
                    write!(f, ", retry after {} seconds", secs)?;
                }
                Ok(())
            }
            Self::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// 文本补全 Provider trait
///
/// 定义了与补全服务交互的统一接口
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// 返回 provider 名称
    fn name(&self) -> &str;

    /// 返回当前使用的模型
    fn model(&self) -> &str;

    /// 用给定的 prompt 生成一条回复
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// 图片生成 Provider trait
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Generate an image for the prompt, returning its URL
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

/// Long-term memory collaborator.
///
/// Consulted only to augment the short-term context window, never to
/// replace it. Implementations are expected to be similarity-searchable
/// stores; this crate does no vector math of its own.
#[async_trait]
pub trait RecallStore: Send + Sync {
    /// Persist one turn for later recall.
    async fn store(&self, chat_id: &str, role: Role, content: &str) -> Result<()>;

    /// Return up to `k` stored texts relevant to `text`.
    async fn query(&self, chat_id: &str, text: &str, k: usize) -> Result<Vec<String>>;
}

/// Map provider-side HTTP failures onto the error taxonomy.
pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::AuthenticationFailed);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        return Err(ProviderError::RateLimited { retry_after });
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ProviderError::RequestFailed(format!("{}: {}", status, text)));
    }
    Ok(response)
}
