//! Telegram channel — long-polls the Bot API for updates.
//!
//! Renders the engine's `Keyboard` vocabulary as Telegram reply
//! keyboards and delivers CSV exports with `sendDocument` straight from
//! memory.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::catalogue;
use crate::channels::{Channel, IncomingMessage, Keyboard, MessageStream, OutgoingResponse};
use crate::dialog::prompts;
use crate::error::ChannelError;

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Telegram channel — connects to the Bot API via long-polling.
pub struct TelegramChannel {
    bot_token: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.bot_token)
    }

    /// Send a text message with a reply keyboard. Splits messages that
    /// exceed Telegram's 4096 char limit; the keyboard rides on the last
    /// chunk.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), ChannelError> {
        let chunks = split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            if i == last {
                body["reply_markup"] = reply_markup(keyboard);
            }

            let resp = self
                .client
                .post(self.api_url("sendMessage"))
                .json(&body)
                .send()
                .await
                .map_err(|e| ChannelError::SendFailed {
                    name: "telegram".into(),
                    reason: e.to_string(),
                })?;

            if !resp.status().is_success() {
                let status = resp.status();
                let err = resp.text().await.unwrap_or_default();
                return Err(ChannelError::SendFailed {
                    name: "telegram".into(),
                    reason: format!("sendMessage returned {status}: {err}"),
                });
            }
        }
        Ok(())
    }

    /// Send a document from in-memory bytes.
    async fn send_document_bytes(
        &self,
        chat_id: &str,
        file_bytes: Vec<u8>,
        file_name: &str,
        caption: &str,
    ) -> Result<(), ChannelError> {
        let part = Part::bytes(file_bytes).file_name(file_name.to_string());

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", part);

        let resp = self
            .client
            .post(self.api_url("sendDocument"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "telegram".into(),
                reason: format!("sendDocument failed: {err}"),
            });
        }

        tracing::info!("Telegram document sent to {chat_id}: {file_name}");
        Ok(())
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let bot_token = self.bot_token.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for messages...");

            loop {
                let url = format!("https://api.telegram.org/bot{bot_token}/getUpdates");
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": 30,
                    "allowed_updates": ["message"]
                });

                let resp = match client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let data: serde_json::Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                if let Some(results) = data.get("result").and_then(serde_json::Value::as_array) {
                    for update in results {
                        if let Some(uid) =
                            update.get("update_id").and_then(serde_json::Value::as_i64)
                        {
                            offset = uid + 1;
                        }

                        let Some(message) = update.get("message") else {
                            continue;
                        };

                        let Some(text) = message.get("text").and_then(serde_json::Value::as_str)
                        else {
                            continue;
                        };

                        let from = message.get("from");
                        let Some(user_id) = from
                            .and_then(|f| f.get("id"))
                            .and_then(serde_json::Value::as_i64)
                        else {
                            continue;
                        };
                        let user_id = user_id.to_string();

                        let username = from
                            .and_then(|f| f.get("username"))
                            .and_then(|u| u.as_str());
                        let first_name = from
                            .and_then(|f| f.get("first_name"))
                            .and_then(|n| n.as_str());

                        let chat_id = message
                            .get("chat")
                            .and_then(|c| c.get("id"))
                            .and_then(serde_json::Value::as_i64)
                            .map(|id| id.to_string())
                            .unwrap_or_default();

                        let mut incoming = IncomingMessage::new("telegram", &user_id, text)
                            .with_metadata(serde_json::json!({ "chat_id": chat_id }));
                        // Username snapshot: @username, falling back to
                        // first name, as the original bot records it.
                        if let Some(name) = username.or(first_name) {
                            incoming = incoming.with_user_name(name);
                        }

                        if tx.send(incoming).is_err() {
                            tracing::info!("Telegram listener channel closed");
                            return;
                        }
                    }
                }
            }
        });

        let stream =
            futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|msg| (msg, rx)) });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let chat_id = msg
            .metadata
            .get("chat_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: "No chat_id in message metadata".into(),
            })?;

        match response {
            OutgoingResponse::Text { text, keyboard } => {
                self.send_message(chat_id, &text, keyboard).await
            }
            OutgoingResponse::Document {
                file_name,
                bytes,
                caption,
            } => {
                self.send_document_bytes(chat_id, bytes, &file_name, &caption)
                    .await
            }
        }
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        tracing::info!("Telegram channel shutting down");
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Render a `Keyboard` as a Telegram `reply_markup` object.
fn reply_markup(keyboard: Keyboard) -> serde_json::Value {
    let rows: Vec<Vec<&str>> = match keyboard {
        Keyboard::Main => vec![
            vec![prompts::ADD_ENTRY, prompts::SHOW_STATS],
            vec![prompts::EXPORT_DATA, prompts::HELP],
        ],
        Keyboard::Emotions => {
            let labels: Vec<&str> = catalogue::labels().collect();
            let mut rows: Vec<Vec<&str>> =
                labels.chunks(2).map(|pair| pair.to_vec()).collect();
            rows.push(vec![prompts::BACK]);
            rows
        }
        Keyboard::Intensity => {
            let mut rows: Vec<Vec<&str>> = vec![
                vec!["0", "10", "20", "30", "40"],
                vec!["50", "60", "70", "80", "90"],
                vec!["100"],
            ];
            rows.push(vec![prompts::BACK]);
            rows
        }
        Keyboard::Skip => vec![vec![prompts::SKIP, prompts::BACK]],
    };

    let keyboard_rows: Vec<Vec<serde_json::Value>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|text| serde_json::json!({ "text": text }))
                .collect()
        })
        .collect();

    serde_json::json!({
        "keyboard": keyboard_rows,
        "resize_keyboard": true,
    })
}

/// Split a message into chunks that fit Telegram's character limit.
/// Tries to split on newlines, then spaces, then hard-cuts.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        // Back off to a char boundary before slicing (Cyrillic text is
        // multi-byte).
        let mut cut = max_len;
        while !remaining.is_char_boundary(cut) {
            cut -= 1;
        }

        let chunk = &remaining[..cut];
        let split_at = chunk
            .rfind('\n')
            .or_else(|| chunk.rfind(' '))
            .unwrap_or(cut);

        // Don't split at position 0 (infinite loop guard)
        let split_at = if split_at == 0 { cut } else { split_at };

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    chunks
}

// ── Tests ───────────────────────────────────────────────────────────
