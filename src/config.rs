//! Configuration — sourced from process environment.

use crate::error::ConfigError;

/// Which transport the bot runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKind {
    /// Telegram Bot API long-polling. Needs `BOT_TOKEN`.
    Telegram { bot_token: String },
    /// Local stdin/stdout REPL, no credentials.
    Cli,
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub channel: ChannelKind,
    /// Path to the SQLite database file.
    pub db_path: String,
}

impl BotConfig {
    /// Build the configuration from environment variables.
    ///
    /// `EMOLOG_CHANNEL` selects the transport (`telegram` by default,
    /// `cli` for a local REPL). The Telegram channel requires `BOT_TOKEN`.
    /// `EMOLOG_DB_PATH` overrides the database location.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::env::var("EMOLOG_CHANNEL").ok(),
            std::env::var("BOT_TOKEN").ok(),
            std::env::var("EMOLOG_DB_PATH").ok(),
        )
    }

    fn from_parts(
        channel_name: Option<String>,
        bot_token: Option<String>,
        db_path: Option<String>,
    ) -> Result<Self, ConfigError> {
        let channel_name = channel_name.unwrap_or_else(|| "telegram".to_string());

        let channel = match channel_name.as_str() {
            "cli" => ChannelKind::Cli,
            "telegram" => {
                let bot_token =
                    bot_token.ok_or_else(|| ConfigError::MissingEnvVar("BOT_TOKEN".to_string()))?;
                ChannelKind::Telegram { bot_token }
            }
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "EMOLOG_CHANNEL".to_string(),
                    message: format!("unknown channel: {other}"),
                });
            }
        };

        let db_path = db_path.unwrap_or_else(|| "./data/emolog.db".to_string());

        Ok(Self { channel, db_path })
    }
}
