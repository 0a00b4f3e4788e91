//! emolog — Telegram emotion-diary bot (DBT-style emotion logs).

pub mod bot;
pub mod catalogue;
pub mod channels;
pub mod config;
pub mod dialog;
pub mod error;
pub mod export;
pub mod stats;
pub mod store;
