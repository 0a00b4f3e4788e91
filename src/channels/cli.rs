//! CLI channel — stdin/stdout REPL for local testing.
//!
//! Keyboards are printed as hint lines; exports are written to a file in
//! the working directory (the CLI's equivalent of a download).

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::catalogue;
use crate::channels::{Channel, IncomingMessage, Keyboard, MessageStream, OutgoingResponse};
use crate::dialog::prompts;
use crate::error::ChannelError;

/// A simple CLI channel that reads from stdin and writes to stdout.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            eprint!("> ");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim().to_string();
                        if line.is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        let msg = IncomingMessage::new("cli", "local-user", &line)
                            .with_user_name("local-user");
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let stream =
            stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|msg| (msg, rx)) });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        match response {
            OutgoingResponse::Text { text, keyboard } => {
                println!("\n{text}\n");
                println!("{}", keyboard_hint(keyboard));
            }
            OutgoingResponse::Document {
                file_name, bytes, ..
            } => {
                std::fs::write(&file_name, bytes).map_err(|e| ChannelError::SendFailed {
                    name: "cli".into(),
                    reason: e.to_string(),
                })?;
                println!("\n💾 Збережено: {file_name}\n");
            }
        }
        eprint!("> ");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

/// One-line rendition of the choices a button keyboard would offer.
fn keyboard_hint(keyboard: Keyboard) -> String {
    match keyboard {
        Keyboard::Main => format!(
            "[{} | {} | {} | {}]",
            prompts::ADD_ENTRY,
            prompts::SHOW_STATS,
            prompts::EXPORT_DATA,
            prompts::HELP
        ),
        Keyboard::Emotions => {
            let labels: Vec<&str> = catalogue::labels().collect();
            format!("[{} | {}]", labels.join(" | "), prompts::BACK)
        }
        Keyboard::Intensity => format!("[0 10 20 … 100 | {}]", prompts::BACK),
        Keyboard::Skip => format!("[{} | {}]", prompts::SKIP, prompts::BACK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_channel_name() {
        assert_eq!(CliChannel::new().name(), "cli");
    }

    #[test]
    fn keyboard_hints_list_choices() {
        assert!(keyboard_hint(Keyboard::Main).contains(prompts::ADD_ENTRY));
        assert!(keyboard_hint(Keyboard::Emotions).contains("😡 Гнів"));
        assert!(keyboard_hint(Keyboard::Skip).contains(prompts::SKIP));
        assert!(keyboard_hint(Keyboard::Intensity).contains(prompts::BACK));
    }
}
