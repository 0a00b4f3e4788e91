//! The bot run loop — routes inbound messages to the conversation engine
//! or the top-level command handlers.

use std::sync::Arc;

use futures::StreamExt;

use crate::channels::{Channel, IncomingMessage, Keyboard, OutgoingResponse};
use crate::dialog::{DialogEngine, prompts};
use crate::error::Error;
use crate::export;
use crate::stats;
use crate::store::EntryStore;

/// Coordinates the channel, the conversation engine and the record store.
pub struct Bot {
    engine: DialogEngine,
    store: Arc<dyn EntryStore>,
    channel: Box<dyn Channel>,
}

impl Bot {
    pub fn new(store: Arc<dyn EntryStore>, channel: Box<dyn Channel>) -> Self {
        Self {
            engine: DialogEngine::new(Arc::clone(&store)),
            store,
            channel,
        }
    }

    /// Run the main message loop until Ctrl-C or stream end.
    pub async fn run(self) -> Result<(), Error> {
        let mut message_stream = self.channel.start().await?;

        tracing::info!(channel = %self.channel.name(), "Bot ready and listening");

        loop {
            let message = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received, shutting down...");
                    break;
                }
                msg = message_stream.next() => {
                    match msg {
                        Some(m) => m,
                        None => {
                            tracing::info!("Channel stream ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            // Messages are handled sequentially; combined with the
            // engine's per-user slot lock this keeps same-user inputs
            // strictly ordered.
            match self.handle_message(&message).await {
                Ok(response) => {
                    if let Err(e) = self.channel.respond(&message, response).await {
                        tracing::error!("Failed to respond: {e}");
                    }
                }
                Err(e) => {
                    // One user's failure never takes the process down.
                    tracing::error!(user = %message.user_id, "Error handling message: {e}");
                    let _ = self
                        .channel
                        .respond(
                            &message,
                            OutgoingResponse::text(prompts::GENERIC_FAILURE, Keyboard::Main),
                        )
                        .await;
                }
            }
        }

        tracing::info!("Bot shutting down...");
        self.channel.shutdown().await?;
        Ok(())
    }

    /// Route one message: active sessions go to the engine, everything
    /// else to the top-level command handlers.
    async fn handle_message(&self, message: &IncomingMessage) -> Result<OutgoingResponse, Error> {
        let text = message.content.trim();
        let username = message
            .user_name
            .clone()
            .unwrap_or_else(|| message.user_id.clone());

        if let Some(reply) = self.engine.handle(&message.user_id, &username, text).await {
            return Ok(reply);
        }

        // No active session and not the begin-entry command.
        match text {
            "/start" => Ok(OutgoingResponse::text(
                prompts::greeting(&username),
                Keyboard::Main,
            )),
            "/help" | prompts::HELP => {
                Ok(OutgoingResponse::text(prompts::help_text(), Keyboard::Main))
            }
            prompts::SHOW_STATS => self.show_stats(&message.user_id).await,
            prompts::EXPORT_DATA => self.export_data(&message.user_id).await,
            _ => Ok(OutgoingResponse::text(
                prompts::UNKNOWN_COMMAND,
                Keyboard::Main,
            )),
        }
    }

    async fn show_stats(&self, user_id: &str) -> Result<OutgoingResponse, Error> {
        let stats = self.store.stats_by_user(user_id).await?;
        if stats.is_empty() {
            return Ok(OutgoingResponse::text(prompts::NO_RECORDS, Keyboard::Main));
        }
        let total = self.store.total_by_user(user_id).await?;
        Ok(OutgoingResponse::text(
            stats::format_stats(&stats, total),
            Keyboard::Main,
        ))
    }

    async fn export_data(&self, user_id: &str) -> Result<OutgoingResponse, Error> {
        let history = self.store.history_by_user(user_id).await?;
        if history.is_empty() {
            return Ok(OutgoingResponse::text(
                prompts::NO_EXPORT_DATA,
                Keyboard::Main,
            ));
        }
        Ok(OutgoingResponse::document(
            export::export_file_name(user_id),
            export::to_csv(&history),
            prompts::EXPORT_CAPTION,
        ))
    }
}
