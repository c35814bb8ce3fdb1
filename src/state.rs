//! Session state
//!
//! One [`Session`] per chat: the in-progress [`Composition`] (if any) plus
//! [`Preferences`] that outlive it. Everything lives in process memory for
//! the process lifetime; a restart loses in-progress compositions and
//! preferences alike.
//!
//! The [`SessionStore`] hands out access through a closure run under a
//! non-async mutex, so every state transition is a single suspend-free
//! critical section and per-chat updates can never interleave mid-mutation.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::color::{ColorKey, ColorSelector};
use crate::texts::Lang;

/// Telegram chat identifier.
pub type ChatId = i64;

/// Telegram message identifier within a chat.
pub type MessageId = i64;

/// Sticker background theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// `(bubble_background, text_color)` CSS pair for this theme.
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            Theme::Dark => ("#212121", "#ffffff"),
            Theme::Light => ("#ffffff", "#000000"),
        }
    }

    /// Parse a theme name; anything unknown is dark.
    pub fn from_code(code: &str) -> Theme {
        match code {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Per-chat preferences; survive composition clear, cancel and completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preferences {
    pub language: Lang,
    pub theme: Theme,
    /// Explicit default accent color; `None` means derive automatically.
    pub default_color: Option<ColorKey>,
}

/// Which input the editor expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// Editor menu is shown; waiting for a button press.
    Menu,
    /// Waiting for replacement text (or a photo with optional caption).
    Text,
    /// Waiting for a new author name (text only).
    Name,
    /// Waiting for a new avatar (photo only).
    Avatar,
    /// Color picker is shown; waiting for a color button.
    Color,
}

/// The in-progress quote for one chat.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Quote body; may be empty only when `content_image` is present.
    pub quote_text: String,
    /// Author display name; non-empty.
    pub author_name: String,
    /// Accent color selection; never unset while the composition lives.
    pub color: ColorSelector,
    /// Raw avatar bytes; `None` renders the fallback glyph.
    pub avatar: Option<Vec<u8>>,
    /// True once the user explicitly uploaded an avatar.
    pub custom_avatar: bool,
    /// Inline photo shown inside the bubble, distinct from the avatar.
    pub content_image: Option<Vec<u8>>,
    /// Numeric identity backing the automatic color.
    pub origin_seed: i64,
    /// Handle of the currently shown editor message, for edit-in-place.
    pub editor_message: Option<MessageId>,
    pub phase: EditPhase,
}

/// Everything the bot remembers about one chat.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub composition: Option<Composition>,
    pub prefs: Preferences,
}

impl Session {
    /// Current edit phase, if a composition is live.
    pub fn phase(&self) -> Option<EditPhase> {
        self.composition.as_ref().map(|c| c.phase)
    }
}

/// Typed, process-local map of chat id to session.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<ChatId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the chat's session (created default-empty on first
    /// touch) inside one critical section. `f` must not block.
    pub fn with_session<T>(&self, chat: ChatId, f: impl FnOnce(&mut Session) -> T) -> T {
        let mut map = self.inner.lock();
        f(map.entry(chat).or_default())
    }

    /// Copy of the chat's preferences (defaults if the chat is unknown).
    pub fn prefs(&self, chat: ChatId) -> Preferences {
        self.with_session(chat, |session| session.prefs)
    }

    /// Number of chats with a live composition. Diagnostic only.
    pub fn active_compositions(&self) -> usize {
        let map = self.inner.lock();
        map.values().filter(|s| s.composition.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_colors() {
        assert_eq!(Theme::Dark.colors(), ("#212121", "#ffffff"));
        assert_eq!(Theme::Light.colors(), ("#ffffff", "#000000"));
    }

    #[test]
    fn test_theme_from_code_defaults_dark() {
        assert_eq!(Theme::from_code("light"), Theme::Light);
        assert_eq!(Theme::from_code("dark"), Theme::Dark);
        assert_eq!(Theme::from_code("sepia"), Theme::Dark);
    }

    #[test]
    fn test_store_creates_session_on_first_touch() {
        let store = SessionStore::new();
        let phase = store.with_session(7, |session| {
            assert!(session.composition.is_none());
            session.phase()
        });
        assert_eq!(phase, None);
        assert_eq!(store.active_compositions(), 0);
    }

    #[test]
    fn test_store_keeps_sessions_per_chat() {
        let store = SessionStore::new();
        store.with_session(1, |s| s.prefs.theme = Theme::Light);
        store.with_session(2, |s| s.prefs.language = Lang::En);

        assert_eq!(store.prefs(1).theme, Theme::Light);
        assert_eq!(store.prefs(1).language, Lang::Ua);
        assert_eq!(store.prefs(2).theme, Theme::Dark);
        assert_eq!(store.prefs(2).language, Lang::En);
    }

    #[test]
    fn test_prefs_default_shape() {
        let prefs = Preferences::default();
        assert_eq!(prefs.language, Lang::Ua);
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.default_color.is_none());
    }

    #[test]
    fn test_default_color_preference_is_copyable() {
        let mut prefs = Preferences::default();
        prefs.default_color = Some(ColorKey::Blue);
        let copy = prefs;
        assert_eq!(copy.default_color, Some(ColorKey::Blue));
    }
}
