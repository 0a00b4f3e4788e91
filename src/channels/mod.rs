//! Channel abstraction for message I/O.

pub mod channel;
pub mod cli;
pub mod telegram;

pub use channel::{Channel, IncomingMessage, Keyboard, MessageStream, OutgoingResponse};
pub use cli::CliChannel;
pub use telegram::TelegramChannel;
