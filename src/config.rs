use std::env;

/// Relay configuration: routing prefixes, context budget, retention,
/// and the endpoints of the external collaborators.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Command prefix routing to the completion provider
    pub chat_prefix: String,
    /// Command prefix routing to the image provider
    pub image_prefix: String,
    /// Character budget for the assembled context window
    pub max_context_chars: usize,
    /// Trimmed-content prefixes excluded from context assembly
    pub excluded_prefixes: Vec<String>,
    /// Raw entries retained per chat; `None` keeps everything
    pub history_capacity: Option<usize>,
    /// How many long-term memory snippets to ask for per turn
    pub recall_top_k: usize,
    pub waha_url: String,
    pub waha_api_key: Option<String>,
    pub waha_session: String,
    pub openai_api_key: Option<String>,
    pub chat_model: String,
    pub image_model: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chat_prefix: "!ai".to_string(),
            image_prefix: "!img".to_string(),
            max_context_chars: 2_000,
            excluded_prefixes: Vec::new(),
            history_capacity: None,
            recall_top_k: 3,
            waha_url: "http://localhost:3000".to_string(),
            waha_api_key: None,
            waha_session: "default".to_string(),
            openai_api_key: None,
            chat_model: "gpt-4.1-mini".to_string(),
            image_model: "dall-e-3".to_string(),
        }
    }
}

impl RelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chat_prefix: env_or("CHAT_PREFIX", defaults.chat_prefix),
            image_prefix: env_or("DALLE_PREFIX", defaults.image_prefix),
            max_context_chars: env::var("MAX_CONTEXT_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_context_chars),
            excluded_prefixes: env::var("EXCLUDED_PREFIXES")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            history_capacity: env::var("HISTORY_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok()),
            recall_top_k: env::var("RECALL_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.recall_top_k),
            waha_url: env_or("WAHA_API_URL", defaults.waha_url),
            waha_api_key: env::var("WAHA_API_KEY").ok(),
            waha_session: env_or("WAHA_SESSION", defaults.waha_session),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            chat_model: env_or("OPENAI_MODEL", defaults.chat_model),
            image_model: env_or("DALLE_MODEL", defaults.image_model),
        }
    }

    pub fn with_chat_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.chat_prefix = prefix.into();
        self
    }

    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = prefix.into();
        self
    }

    pub fn with_max_context_chars(mut self, max_chars: usize) -> Self {
        self.max_context_chars = max_chars;
        self
    }

    pub fn with_excluded_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_prefixes.push(prefix.into());
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    pub fn with_recall_top_k(mut self, k: usize) -> Self {
        self.recall_top_k = k;
        self
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}
