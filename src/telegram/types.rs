//! Telegram Bot API wire types
//!
//! Only the subset of the API surface this bot touches. Inputs derive
//! `Deserialize`, keyboard payloads derive `Serialize`; unknown fields are
//! ignored everywhere.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// Display name: first name plus last name when present.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Chat {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Available sizes, smallest first; the last entry is the original.
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default)]
    pub document: Option<Document>,
    #[serde(default)]
    pub forward_origin: Option<ForwardOrigin>,
}

impl Message {
    /// File id of the largest available photo size.
    pub fn largest_photo(&self) -> Option<&PhotoSize> {
        self.photo.as_ref().and_then(|sizes| sizes.last())
    }

    /// Whether this message carries a photo.
    pub fn has_photo(&self) -> bool {
        self.photo.as_ref().is_some_and(|sizes| !sizes.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Original author of a forwarded message.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForwardOrigin {
    /// Forwarded from a user account.
    User { sender_user: User },
    /// Forwarded from a user who hides their account behind a name string.
    HiddenUser { sender_user_name: String },
    /// Forwarded on behalf of a chat (anonymous group admins).
    Chat { sender_chat: Chat },
    /// Forwarded from a channel post.
    Channel { chat: Chat },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfilePhotos {
    pub total_count: i64,
    /// Outer: photos; inner: sizes of one photo, smallest first.
    pub photos: Vec<Vec<PhotoSize>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub file_id: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// Inline keyboard attached to a message.
#[derive(Debug, Clone, Serialize, Default)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Chat action shown while the bot is working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
    ChooseSticker,
}

impl ChatAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatAction::Typing => "typing",
            ChatAction::ChooseSticker => "choose_sticker",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_with_text_message_parses() {
        let json = r#"{
            "update_id": 10,
            "message": {
                "message_id": 1,
                "chat": {"id": 42, "type": "private"},
                "from": {"id": 7, "first_name": "Alice", "last_name": "K"},
                "text": "hello"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("hello"));
        assert_eq!(message.from.unwrap().full_name(), "Alice K");
    }

    #[test]
    fn test_forward_origin_user_parses() {
        let json = r#"{
            "type": "user",
            "date": 1700000000,
            "sender_user": {"id": 99, "first_name": "Orig"}
        }"#;
        let origin: ForwardOrigin = serde_json::from_str(json).unwrap();
        match origin {
            ForwardOrigin::User { sender_user } => assert_eq!(sender_user.id, 99),
            other => panic!("unexpected origin: {other:?}"),
        }
    }

    #[test]
    fn test_forward_origin_hidden_user_parses() {
        let json = r#"{"type": "hidden_user", "sender_user_name": "Ghost"}"#;
        let origin: ForwardOrigin = serde_json::from_str(json).unwrap();
        assert_eq!(
            origin,
            ForwardOrigin::HiddenUser {
                sender_user_name: "Ghost".to_string()
            }
        );
    }

    #[test]
    fn test_forward_origin_channel_parses() {
        let json = r#"{
            "type": "channel",
            "chat": {"id": -100123, "type": "channel", "title": "News"},
            "message_id": 5
        }"#;
        let origin: ForwardOrigin = serde_json::from_str(json).unwrap();
        match origin {
            ForwardOrigin::Channel { chat } => {
                assert_eq!(chat.id, -100123);
                assert_eq!(chat.title.as_deref(), Some("News"));
            }
            other => panic!("unexpected origin: {other:?}"),
        }
    }

    #[test]
    fn test_forward_origin_future_kind_is_unknown() {
        let json = r#"{"type": "hologram"}"#;
        let origin: ForwardOrigin = serde_json::from_str(json).unwrap();
        assert_eq!(origin, ForwardOrigin::Unknown);
    }

    #[test]
    fn test_largest_photo_is_last_entry() {
        let json = r#"{
            "message_id": 2,
            "chat": {"id": 1, "type": "private"},
            "photo": [
                {"file_id": "small", "width": 90, "height": 90},
                {"file_id": "big", "width": 800, "height": 800}
            ]
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert!(message.has_photo());
        assert_eq!(message.largest_photo().unwrap().file_id, "big");
    }

    #[test]
    fn test_api_response_error_shape() {
        let json = r#"{"ok": false, "description": "Bad Request: chat not found"}"#;
        let response: ApiResponse<Message> = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(
            response.description.as_deref(),
            Some("Bad Request: chat not found")
        );
    }

    #[test]
    fn test_keyboard_serializes_to_expected_shape() {
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::new(
            "Create",
            "make_quote",
        )]]);
        let json = serde_json::to_value(&keyboard).unwrap();
        assert_eq!(
            json["inline_keyboard"][0][0]["callback_data"],
            "make_quote"
        );
    }

    #[test]
    fn test_chat_action_names() {
        assert_eq!(ChatAction::Typing.as_str(), "typing");
        assert_eq!(ChatAction::ChooseSticker.as_str(), "choose_sticker");
    }
}
