use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::types::{ApiResponse, TgFile, Update};

const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Extra time on top of the long-poll timeout before giving up on a request.
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct BotClient {
    client: Client,
    base: Url,
    token: String,
}

impl BotClient {
    pub fn new(token: impl Into<String>, api_url: &str) -> Result<Self> {
        let mut base = Url::parse(api_url).with_context(|| format!("invalid api url {}", api_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
            token: token.into(),
        })
    }

    // tokens contain ':', so they cannot go through `Url::join` as a
    // relative reference
    fn method_url(&self, method: &str) -> Result<Url> {
        Url::parse(&format!("{}bot{}/{}", self.base, self.token, method))
            .context("building method url")
    }

    fn file_url(&self, file_path: &str) -> Result<Url> {
        Url::parse(&format!("{}file/bot{}/{}", self.base, self.token, file_path))
            .context("building file url")
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
        timeout: Duration,
    ) -> Result<T> {
        let resp = self
            .client
            .post(self.method_url(method)?)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            // the url carries the token
            .map_err(|e| anyhow!("{} request failed: {}", method, e.without_url()))?;
        let envelope: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| anyhow!("{} response unreadable: {}", method, e.without_url()))?;
        envelope.into_result().with_context(|| format!("calling {}", method))
    }

    /// Long-poll for updates after `offset`, retrying transport failures.
    pub async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .call::<Vec<Update>>("getUpdates", body.clone(), timeout + POLL_GRACE)
                .await
            {
                Ok(updates) => {
                    debug!(count = updates.len(), offset, "polled updates");
                    return Ok(updates);
                }
                Err(e) if attempt < MAX_RETRIES => {
                    warn!(attempt, "getUpdates failed: {:#}", e);
                    sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let body = json!({ "chat_id": chat_id, "text": text });
        self.call::<serde_json::Value>("sendMessage", body, POLL_GRACE)
            .await
            .map(|_| ())
    }

    pub async fn get_file(&self, file_id: &str) -> Result<TgFile> {
        self.call("getFile", json!({ "file_id": file_id }), POLL_GRACE)
            .await
    }

    /// Download the content behind a `getFile` path.
    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(self.file_url(file_path)?)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| anyhow!("file download failed: {}", e.without_url()))?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| anyhow!("file download interrupted: {}", e.without_url()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let c = BotClient::new("123:abc", "https://api.telegram.org").unwrap();
        assert_eq!(
            c.method_url("getUpdates").unwrap().as_str(),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
        assert_eq!(
            c.file_url("documents/file_7.xlsx").unwrap().as_str(),
            "https://api.telegram.org/file/bot123:abc/documents/file_7.xlsx"
        );
    }

    #[test]
    fn test_urls_keep_base_path() {
        let c = BotClient::new("t", "http://localhost:8081/tg").unwrap();
        assert_eq!(
            c.method_url("sendMessage").unwrap().as_str(),
            "http://localhost:8081/tg/bott/sendMessage"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        assert!(BotClient::new("t", "not a url").is_err());
    }
}
