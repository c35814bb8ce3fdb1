//! Thin typed client for the Telegram Bot API
//!
//! Plain reqwest against `api.telegram.org`: every method is a POST with a
//! JSON payload wrapped in [`ApiResponse`], except sticker upload
//! (multipart) and file download (plain GET). Long polling gets a per-call
//! timeout wider than the poll window so the connection is not cut
//! mid-poll.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::telegram::types::{
    ApiResponse, ChatAction, FileInfo, InlineKeyboardMarkup, Message, Update, UserProfilePhotos,
};

const API_BASE: &str = "https://api.telegram.org";

/// Seconds Telegram holds a `getUpdates` call open.
pub const POLL_WINDOW_SECS: u64 = 30;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-call timeout for long polls: the poll window plus slack.
const POLL_TIMEOUT: Duration = Duration::from_secs(POLL_WINDOW_SECS + 10);

/// Telegram Bot API client.
pub struct BotApi {
    http: reqwest::Client,
    token: String,
    base: String,
}

impl BotApi {
    /// Create a client for the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base(token, API_BASE)
    }

    /// Create a client against a non-default API host (tests).
    pub fn with_base(token: impl Into<String>, base: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            token: token.into(),
            base: base.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base, self.token, method)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let mut request = self.http.post(self.method_url(method)).json(payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.ok {
            return Err(Error::api(
                method,
                envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            ));
        }
        envelope
            .result
            .ok_or_else(|| Error::api(method, "ok response without result"))
    }

    /// Long-poll for updates. `offset` is the first update id to return.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": POLL_WINDOW_SECS,
                "allowed_updates": ["message", "callback_query"],
            }),
            Some(POLL_TIMEOUT),
        )
        .await
    }

    /// Send an HTML-formatted message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = serde_json::to_value(keyboard)?;
        }
        self.call("sendMessage", &payload, None).await
    }

    /// Edit a previously sent message in place.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        let mut payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = serde_json::to_value(keyboard)?;
        }
        // Telegram answers with the edited Message or `true`; neither is
        // needed here.
        let _: serde_json::Value = self.call("editMessageText", &payload, None).await?;
        Ok(())
    }

    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "deleteMessage",
                &json!({"chat_id": chat_id, "message_id": message_id}),
                None,
            )
            .await?;
        Ok(())
    }

    /// Upload and send a WebP sticker.
    pub async fn send_sticker(&self, chat_id: i64, webp: Vec<u8>) -> Result<()> {
        let part = reqwest::multipart::Part::bytes(webp)
            .file_name("sticker.webp")
            .mime_str("image/webp")
            .map_err(|e| Error::api("sendSticker", e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("sticker", part);

        let response = self
            .http
            .post(self.method_url("sendSticker"))
            .multipart(form)
            .send()
            .await?;
        let envelope: ApiResponse<serde_json::Value> = response.json().await?;
        if !envelope.ok {
            return Err(Error::api(
                "sendSticker",
                envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            ));
        }
        Ok(())
    }

    pub async fn send_chat_action(&self, chat_id: i64, action: ChatAction) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "sendChatAction",
                &json!({"chat_id": chat_id, "action": action.as_str()}),
                None,
            )
            .await?;
        Ok(())
    }

    /// Acknowledge a callback query, optionally with a toast text.
    pub async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let mut payload = json!({"callback_query_id": callback_id});
        if let Some(text) = text {
            payload["text"] = json!(text);
        }
        let _: serde_json::Value = self.call("answerCallbackQuery", &payload, None).await?;
        Ok(())
    }

    pub async fn get_user_profile_photos(&self, user_id: i64) -> Result<UserProfilePhotos> {
        self.call(
            "getUserProfilePhotos",
            &json!({"user_id": user_id, "limit": 1}),
            None,
        )
        .await
    }

    pub async fn get_file(&self, file_id: &str) -> Result<FileInfo> {
        self.call("getFile", &json!({"file_id": file_id}), None).await
    }

    /// Download a file previously resolved with [`BotApi::get_file`].
    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        let url = format!("{}/file/bot{}/{}", self.base, self.token, file_path);
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::api(
                "download",
                format!("file download returned {}", response.status()),
            ));
        }
        let bytes = response.bytes().await?;
        debug!(len = bytes.len(), "downloaded file");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url_embeds_token() {
        let api = BotApi::new("123:abc");
        assert_eq!(
            api.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_with_base_overrides_host() {
        let api = BotApi::with_base("t", "http://localhost:9999");
        assert_eq!(
            api.method_url("getUpdates"),
            "http://localhost:9999/bott/getUpdates"
        );
    }

    #[test]
    fn test_poll_timeout_exceeds_poll_window() {
        assert!(POLL_TIMEOUT.as_secs() > POLL_WINDOW_SECS);
    }
}
