use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::session::Event;

static COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/([A-Za-z0-9_]+)(?:@[A-Za-z0-9_]+)?(?:\s|$)").expect("command regex is valid")
});

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(anyhow!("bot api returned ok without a result")),
            (false, _) => Err(anyhow!(
                "bot api error {}: {}",
                self.error_code.unwrap_or_default(),
                self.description.as_deref().unwrap_or("no description")
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// Result of `getFile`; `file_path` is what the download URL is built from.
#[derive(Debug, Clone, Deserialize)]
pub struct TgFile {
    pub file_id: String,
    pub file_path: Option<String>,
    pub file_size: Option<u64>,
}

impl Message {
    pub fn first_name(&self) -> Option<String> {
        self.chat
            .first_name
            .clone()
            .or_else(|| self.from.as_ref().map(|u| u.first_name.clone()))
    }

    pub fn username(&self) -> Option<&str> {
        self.chat
            .username
            .as_deref()
            .or_else(|| self.from.as_ref().and_then(|u| u.username.as_deref()))
    }

    /// Classify the message for the session state machine. Messages with
    /// neither text nor a document (stickers, photos, ...) yield `None`.
    pub fn to_event(&self) -> Option<Event> {
        if let Some(doc) = &self.document {
            return Some(Event::Document {
                file_id: doc.file_id.clone(),
                mime_type: doc.mime_type.clone(),
                file_name: doc.file_name.clone(),
            });
        }

        let text = self.text.as_ref()?;
        let command = COMMAND
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        Some(match command {
            Some("start") => Event::Start {
                first_name: self.first_name(),
            },
            Some("update_nodes_file") => Event::UpdateFileCommand,
            _ => Event::Text(text.clone()),
        })
    }
}
