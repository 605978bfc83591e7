use crate::config::RelayConfig;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::memory::{
    render_context, ContextWindowBuilder, ContextWindowConfig, MemoryError, MemoryRegistry, Role,
};
use crate::message::{InboundMessage, Route};
use crate::provider::{CompletionProvider, ImageProvider, RecallStore};
use std::sync::Arc;

/// What the relay did with an inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Completion reply sent back through the gateway
    Replied,
    /// Generated image sent back through the gateway
    ImageSent,
    /// No command prefix matched; the turn was remembered only
    Remembered,
    /// Nothing to do (no textual content)
    Ignored,
}

/// The webhook-to-gateway pipeline: look up the chat's log, append the
/// inbound turn, assemble a bounded context window, call the matching
/// provider, remember the reply, and send it back out.
///
/// One event is processed under the chat's log lock from first append
/// to reply append, so concurrent deliveries for the same chat
/// serialize and turn order in the log matches delivery order.
/// Different chats proceed in parallel.
pub struct Relay<C, I, G>
where
    C: CompletionProvider,
    I: ImageProvider,
    G: Gateway,
{
    config: RelayConfig,
    registry: MemoryRegistry,
    window: ContextWindowBuilder,
    gateway: G,
    completion: C,
    image: I,
    recall: Option<Arc<dyn RecallStore>>,
}

impl<C, I, G> Relay<C, I, G>
where
    C: CompletionProvider,
    I: ImageProvider,
    G: Gateway,
{
    pub fn new(config: RelayConfig, gateway: G, completion: C, image: I) -> Self {
        let registry = match config.history_capacity {
            Some(capacity) => MemoryRegistry::with_capacity(capacity),
            None => MemoryRegistry::new(),
        };

        let mut window_config = ContextWindowConfig::new(config.max_context_chars);
        window_config.excluded_prefixes = config.excluded_prefixes.clone();
        let window = ContextWindowBuilder::new(window_config);

        Self {
            config,
            registry,
            window,
            gateway,
            completion,
            image,
            recall: None,
        }
    }

    /// Attach an optional long-term memory collaborator. Recall only
    /// augments the short-term window; recall failures degrade to an
    /// empty snippet list and never block the turn.
    pub fn with_recall(mut self, recall: Arc<dyn RecallStore>) -> Self {
        self.recall = Some(recall);
        self
    }

    pub fn registry(&self) -> &MemoryRegistry {
        &self.registry
    }

    /// Process one inbound webhook event.
    pub async fn handle(&self, msg: &InboundMessage) -> Result<Outcome> {
        let Some(text) = msg.text() else {
            tracing::debug!(chat_id = %msg.chat_id, "no textual content, skipping");
            return Ok(Outcome::Ignored);
        };

        let log = self.registry.get_or_create(&msg.chat_id).await?;
        let mut log = log.lock().await;

        match log.append(Role::User, text) {
            Ok(()) => {}
            Err(MemoryError::InvalidEntry(_)) => return Ok(Outcome::Ignored),
            Err(err) => return Err(err.into()),
        }
        self.remember_long_term(&msg.chat_id, Role::User, text).await;

        match msg.route(&self.config.chat_prefix, &self.config.image_prefix) {
            Route::Ignored => {
                tracing::debug!(chat_id = %msg.chat_id, "no matching route, turn remembered");
                Ok(Outcome::Remembered)
            }
            Route::Chat => {
                let question = msg.command_text(&self.config.chat_prefix).to_string();
                let prompt = self.build_chat_prompt(&msg.chat_id, &question, &log).await;

                let reply = self.completion.complete(&prompt).await?;
                if let Err(err) = log.append(Role::Assistant, &reply) {
                    tracing::debug!(error = %err, "reply not remembered");
                } else {
                    self.remember_long_term(&msg.chat_id, Role::Assistant, &reply)
                        .await;
                }
                drop(log);

                self.gateway.send_text(&msg.chat_id, &reply).await?;
                tracing::info!(chat_id = %msg.chat_id, "completion reply sent");
                Ok(Outcome::Replied)
            }
            Route::Image => {
                let request = msg.command_text(&self.config.image_prefix).to_string();

                // All entries but the one just appended are candidate context.
                let entries = log.all_entries();
                let prior = &entries[..entries.len().saturating_sub(1)];
                let context = render_context(&self.window.build(prior));
                drop(log);

                let prompt = crate::provider::compose_image_prompt(&context, &request);
                let image_url = self.image.generate_image(&prompt).await?;

                self.gateway.send_image(&msg.chat_id, &image_url).await?;
                tracing::info!(chat_id = %msg.chat_id, "generated image sent");
                Ok(Outcome::ImageSent)
            }
        }
    }

    async fn build_chat_prompt(
        &self,
        chat_id: &str,
        question: &str,
        log: &crate::memory::ChatLog,
    ) -> String {
        let mut prompt = String::new();

        if let Some(recall) = &self.recall {
            match recall
                .query(chat_id, question, self.config.recall_top_k)
                .await
            {
                Ok(snippets) if !snippets.is_empty() => {
                    prompt.push_str("Remembered from earlier conversations:\n");
                    for snippet in &snippets {
                        prompt.push_str(snippet);
                        prompt.push('\n');
                    }
                    prompt.push('\n');
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "long-term recall failed, continuing without it");
                }
            }
        }

        let entries = log.all_entries();
        let prior = &entries[..entries.len().saturating_sub(1)];
        let context = render_context(&self.window.build(prior));
        if !context.is_empty() {
            prompt.push_str(&context);
            prompt.push('\n');
        }
        prompt.push_str(question);

        prompt
    }

    async fn remember_long_term(&self, chat_id: &str, role: Role, content: &str) {
        if let Some(recall) = &self.recall {
            if let Err(err) = recall.store(chat_id, role, content).await {
                tracing::warn!(error = %err, "long-term store failed");
            }
        }
    }
}
