//! Messenger and media-fetch capabilities
//!
//! The dispatch layer and render pipeline talk to chat through these traits
//! rather than the concrete API client, so tests can drive the whole bot
//! with in-process fakes. The Telegram implementations degrade on the known
//! failure modes: stale message handles make edits fall back to
//! delete-and-resend, and media fetches collapse to `None`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Result;
use crate::state::{ChatId, MessageId};
use crate::telegram::{BotApi, ChatAction, InlineKeyboardMarkup};

/// Outbound chat operations.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageId>;

    async fn edit_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()>;

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<()>;

    async fn send_sticker(&self, chat: ChatId, webp: Vec<u8>) -> Result<()>;

    async fn send_chat_action(&self, chat: ChatId, action: ChatAction) -> Result<()>;

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}

/// Inbound media fetches. All failures degrade to `None`: a missing avatar
/// or content image is never fatal to a session.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Latest profile photo of a user, if any.
    async fn profile_avatar(&self, user_id: i64) -> Option<Vec<u8>>;

    /// Raw bytes of an uploaded file.
    async fn file_bytes(&self, file_id: &str) -> Option<Vec<u8>>;
}

#[async_trait]
impl Messenger for BotApi {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageId> {
        let message = self.send_message(chat, text, keyboard).await?;
        Ok(message.message_id)
    }

    async fn edit_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.edit_message_text(chat, message, text, keyboard).await
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<()> {
        BotApi::delete_message(self, chat, message).await
    }

    async fn send_sticker(&self, chat: ChatId, webp: Vec<u8>) -> Result<()> {
        BotApi::send_sticker(self, chat, webp).await
    }

    async fn send_chat_action(&self, chat: ChatId, action: ChatAction) -> Result<()> {
        BotApi::send_chat_action(self, chat, action).await
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.answer_callback_query(callback_id, text).await
    }
}

#[async_trait]
impl MediaFetcher for BotApi {
    async fn profile_avatar(&self, user_id: i64) -> Option<Vec<u8>> {
        let photos = match self.get_user_profile_photos(user_id).await {
            Ok(photos) => photos,
            Err(err) => {
                warn!(user_id, %err, "profile photo lookup failed");
                return None;
            }
        };
        let file_id = photos
            .photos
            .first()
            .and_then(|sizes| sizes.last())
            .map(|size| size.file_id.clone())?;
        self.file_bytes(&file_id).await
    }

    async fn file_bytes(&self, file_id: &str) -> Option<Vec<u8>> {
        let info = match self.get_file(file_id).await {
            Ok(info) => info,
            Err(err) => {
                warn!(file_id, %err, "getFile failed");
                return None;
            }
        };
        let path = info.file_path?;
        match self.download_file(&path).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(file_id, %err, "file download failed");
                None
            }
        }
    }
}

/// Delete a message, swallowing failures (already deleted, too old, never
/// existed).
pub async fn delete_quiet(messenger: &dyn Messenger, chat: ChatId, message: MessageId) {
    if let Err(err) = messenger.delete_message(chat, message).await {
        debug!(chat, message, %err, "delete failed, ignoring");
    }
}

/// Edit a message in place; when the handle is stale, delete it and send a
/// replacement instead. Returns the id of the message now showing `text`.
pub async fn edit_or_resend(
    messenger: &dyn Messenger,
    chat: ChatId,
    message: MessageId,
    text: &str,
    keyboard: Option<&InlineKeyboardMarkup>,
) -> Result<MessageId> {
    match messenger.edit_text(chat, message, text, keyboard).await {
        Ok(()) => Ok(message),
        Err(err) => {
            debug!(chat, message, %err, "edit failed, falling back to resend");
            delete_quiet(messenger, chat, message).await;
            messenger.send_text(chat, text, keyboard).await
        }
    }
}

/// Send a transient notice that deletes itself after `ttl`.
pub async fn transient_notice(
    messenger: Arc<dyn Messenger>,
    chat: ChatId,
    text: &str,
    ttl: Duration,
) {
    let message = match messenger.send_text(chat, text, None).await {
        Ok(id) => id,
        Err(err) => {
            warn!(chat, %err, "failed to send notice");
            return;
        }
    };
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        delete_quiet(messenger.as_ref(), chat, message).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Minimal scripted messenger: records calls, fails edits on demand.
    struct RecordingMessenger {
        fail_edits: bool,
        log: Mutex<Vec<String>>,
        next_id: Mutex<MessageId>,
    }

    impl RecordingMessenger {
        fn new(fail_edits: bool) -> Self {
            Self {
                fail_edits,
                log: Mutex::new(Vec::new()),
                next_id: Mutex::new(100),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.log.lock().clone()
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_text(
            &self,
            _chat: ChatId,
            text: &str,
            _keyboard: Option<&InlineKeyboardMarkup>,
        ) -> Result<MessageId> {
            self.log.lock().push(format!("send:{text}"));
            let mut id = self.next_id.lock();
            *id += 1;
            Ok(*id)
        }

        async fn edit_text(
            &self,
            _chat: ChatId,
            message: MessageId,
            text: &str,
            _keyboard: Option<&InlineKeyboardMarkup>,
        ) -> Result<()> {
            if self.fail_edits {
                return Err(crate::error::Error::api("editMessageText", "stale"));
            }
            self.log.lock().push(format!("edit:{message}:{text}"));
            Ok(())
        }

        async fn delete_message(&self, _chat: ChatId, message: MessageId) -> Result<()> {
            self.log.lock().push(format!("delete:{message}"));
            Ok(())
        }

        async fn send_sticker(&self, _chat: ChatId, _webp: Vec<u8>) -> Result<()> {
            self.log.lock().push("sticker".to_string());
            Ok(())
        }

        async fn send_chat_action(&self, _chat: ChatId, _action: ChatAction) -> Result<()> {
            Ok(())
        }

        async fn answer_callback(&self, _callback_id: &str, _text: Option<&str>) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_edit_or_resend_edits_in_place() {
        let messenger = RecordingMessenger::new(false);
        let id = edit_or_resend(&messenger, 1, 55, "hello", None).await.unwrap();
        assert_eq!(id, 55);
        assert_eq!(messenger.calls(), vec!["edit:55:hello"]);
    }

    #[tokio::test]
    async fn test_edit_or_resend_falls_back_on_stale_handle() {
        let messenger = RecordingMessenger::new(true);
        let id = edit_or_resend(&messenger, 1, 55, "hello", None).await.unwrap();
        assert_ne!(id, 55);
        assert_eq!(messenger.calls(), vec!["delete:55", "send:hello"]);
    }
}
