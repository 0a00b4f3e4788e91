use std::sync::Arc;

use emolog::bot::Bot;
use emolog::channels::{Channel, CliChannel, TelegramChannel};
use emolog::config::{BotConfig, ChannelKind};
use emolog::store::{EntryStore, LibSqlBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export BOT_TOKEN=123456:ABC-...");
        std::process::exit(1);
    });

    eprintln!("📝 emolog v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path);

    let db_path = std::path::Path::new(&config.db_path);
    let store: Arc<dyn EntryStore> =
        Arc::new(LibSqlBackend::new_local(db_path).await.unwrap_or_else(|e| {
            eprintln!("Error: Failed to open database at {}: {e}", config.db_path);
            std::process::exit(1);
        }));

    let channel: Box<dyn Channel> = match config.channel {
        ChannelKind::Telegram { bot_token } => {
            let channel = TelegramChannel::new(bot_token);
            if let Err(e) = channel.health_check().await {
                eprintln!("Error: Telegram health check failed: {e}");
                std::process::exit(1);
            }
            eprintln!("   Channel: telegram\n");
            Box::new(channel)
        }
        ChannelKind::Cli => {
            eprintln!("   Channel: cli (local REPL)\n");
            Box::new(CliChannel::new())
        }
    };

    let bot = Bot::new(store, channel);
    bot.run().await?;

    Ok(())
}
