// src/telegram/mod.rs
// Thin Bot API client: long polling, sending text, fetching uploads.

pub mod client;
pub mod types;

pub use client::BotClient;
pub use types::{ApiResponse, Chat, Document, Message, TgFile, Update, User};
