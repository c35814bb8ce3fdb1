//! Telegram Bot API integration: wire types and a thin typed client.

pub mod api;
pub mod types;

pub use api::BotApi;
pub use types::{
    ApiResponse, CallbackQuery, Chat, ChatAction, Document, FileInfo, ForwardOrigin,
    InlineKeyboardButton, InlineKeyboardMarkup, Message, PhotoSize, Update, User,
    UserProfilePhotos,
};
