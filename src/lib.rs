//! # Quotesmith
//!
//! Telegram bot that turns messages into quote-bubble stickers. Users send
//! or forward text and photos; an inline editor session lets them adjust
//! the quote text, author name, avatar and accent color; the final bubble
//! is rasterized in a headless browser, downscaled to sticker size and
//! delivered as lossless WebP.
//!
//! ## Architecture
//!
//! - [`telegram`] — thin typed client for the Bot API (long poll, messages,
//!   stickers, files).
//! - [`dispatch`] — routes updates into the session machine; per-chat FIFO,
//!   cross-chat interleaving.
//! - [`session`] + [`state`] — the edit-session state machine and its typed
//!   per-chat store. Preferences survive a composition; compositions do not
//!   survive the process.
//! - [`render`] — markup assembly, shared headless-browser rasterization,
//!   Lanczos downscale and WebP encode.
//! - [`color`], [`layout`] — pure helpers: palette resolution and the
//!   font/width band tables.
//! - [`health`] — the keep-alive HTTP endpoint.

pub mod color;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod keyboards;
pub mod layout;
pub mod messenger;
pub mod render;
pub mod session;
pub mod state;
pub mod telegram;
pub mod texts;

pub use config::Config;
pub use error::{Error, Result};
