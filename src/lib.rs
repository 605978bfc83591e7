pub mod config;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod message;
pub mod provider;
pub mod relay;

pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use gateway::{Gateway, WahaGateway};
pub use memory::{
    ChatLog, ContextWindowBuilder, ContextWindowConfig, Entry, MemoryRegistry, Role,
};
pub use message::{InboundMessage, Route};
pub use provider::{
    ChatCompletionClient, CompletionProvider, ImageGenerationClient, ImageProvider, RecallClient,
    RecallStore,
};
pub use relay::{Outcome, Relay};
