//! Update dispatch
//!
//! Routes long-poll updates into the session machine and the render
//! pipeline. Updates for one chat are serialized through a per-chat guard
//! (arrival order preserved), while different chats interleave freely
//! during I/O waits. No session lock is ever held across an await; the
//! machine transitions run inside the store's critical section and the
//! slow work (downloads, rendering, delivery) happens around them.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::color::ColorKey;
use crate::error::Result;
use crate::keyboards;
use crate::messenger::{delete_quiet, edit_or_resend, transient_notice, MediaFetcher, Messenger};
use crate::render::RenderPipeline;
use crate::session::{
    self, ColorChoice, ContentOrigin, EditInput, EditRejection, EditTarget, IncomingContent,
    SessionNotice,
};
use crate::state::{ChatId, Composition, EditPhase, MessageId, SessionStore, Theme};
use crate::telegram::{
    BotApi, CallbackQuery, ChatAction, ForwardOrigin, Message, Update,
};
use crate::texts::{self, Key, Lang, MenuHeader};

/// Backoff after a failed poll before retrying.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Menu preview keeps at most this many characters of the quote.
const PREVIEW_CHARS: usize = 50;

/// Demo palette: every named key, alias included, like the color wheel the
/// demo spins.
const DEMO_COLORS: [ColorKey; 8] = [
    ColorKey::Red,
    ColorKey::Orange,
    ColorKey::Purple,
    ColorKey::Green,
    ColorKey::Cyan,
    ColorKey::Blue,
    ColorKey::Pink,
    ColorKey::Gold,
];

/// Routes updates to handlers; owns the per-chat ordering guards.
pub struct Dispatcher {
    messenger: Arc<dyn Messenger>,
    fetcher: Arc<dyn MediaFetcher>,
    pipeline: Arc<RenderPipeline>,
    sessions: Arc<SessionStore>,
    chat_guards: DashMap<ChatId, Arc<Mutex<()>>>,
}

impl Dispatcher {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        fetcher: Arc<dyn MediaFetcher>,
        pipeline: Arc<RenderPipeline>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            messenger,
            fetcher,
            pipeline,
            sessions,
            chat_guards: DashMap::new(),
        }
    }

    /// Handle one update to completion, holding the chat's FIFO guard.
    pub async fn handle_update(self: Arc<Self>, update: Update) {
        let chat = match chat_of(&update) {
            Some(chat) => chat,
            None => {
                // Callback without a message (expired inline view): just ack.
                if let Some(callback) = &update.callback_query {
                    let _ = self.messenger.answer_callback(&callback.id, None).await;
                }
                return;
            }
        };

        let guard = self.chat_guards.entry(chat).or_default().value().clone();
        let _serialized = guard.lock().await;

        if let Some(message) = update.message {
            self.handle_message(message).await;
        } else if let Some(callback) = update.callback_query {
            self.handle_callback(callback).await;
        }
    }

    async fn handle_message(&self, message: Message) {
        if let Some(text) = message.text.as_deref() {
            if text.starts_with('/') {
                self.handle_command(text.to_string(), message).await;
                return;
            }
        }
        // Only content-shaped messages reach the machine; stickers, voice
        // notes and the like are not handled at all.
        let has_content = message.text.is_some()
            || message.caption.is_some()
            || message.has_photo()
            || message.document.is_some();
        if has_content {
            self.handle_content(message).await;
        }
    }

    async fn handle_command(&self, text: String, message: Message) {
        let command = text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let chat = message.chat.id;
        let lang = self.sessions.prefs(chat).language;

        debug!(chat, %command, "command");
        match command.as_str() {
            "/start" => self.cmd_start(chat, &message).await,
            "/help" => {
                let _ = self
                    .messenger
                    .send_text(
                        chat,
                        texts::text(lang, Key::Help),
                        Some(&keyboards::close_only(lang)),
                    )
                    .await;
            }
            "/info" | "/i" => {
                let _ = self
                    .messenger
                    .send_text(
                        chat,
                        texts::text(lang, Key::Info),
                        Some(&keyboards::close_only(lang)),
                    )
                    .await;
            }
            "/settings" | "/s" => {
                let _ = self
                    .messenger
                    .send_text(
                        chat,
                        texts::text(lang, Key::SettingsHeader),
                        Some(&keyboards::settings_menu(lang)),
                    )
                    .await;
            }
            "/theme" | "/t" => {
                let _ = self
                    .messenger
                    .send_text(
                        chat,
                        texts::text(lang, Key::ThemeSelectHeader),
                        Some(&keyboards::theme_menu(lang, true)),
                    )
                    .await;
            }
            "/lang" | "/l" => {
                let _ = self
                    .messenger
                    .send_text(
                        chat,
                        &texts::lang_select_header(lang),
                        Some(&keyboards::lang_menu(lang, false)),
                    )
                    .await;
            }
            "/cancel" | "/c" => self.cmd_cancel(chat, lang).await,
            "/q" | "/create" => self.cmd_demo(chat, &message).await,
            _ => {}
        }
    }

    async fn cmd_start(&self, chat: ChatId, message: &Message) {
        // Restart drops the composition and the language choice; theme and
        // default color stay.
        self.sessions.with_session(chat, |session| {
            session.composition = None;
            session.prefs.language = Lang::default();
        });
        delete_quiet(self.messenger.as_ref(), chat, message.message_id).await;
        let _ = self
            .messenger
            .send_text(
                chat,
                "👋 <b>Welcome! / Привіт!</b>\n\n🇺🇦 Будь ласка, обери мову:",
                Some(&keyboards::start_lang_menu()),
            )
            .await;
    }

    async fn cmd_cancel(&self, chat: ChatId, lang: Lang) {
        let canceled = self.sessions.with_session(chat, session::cancel);
        match canceled {
            Ok(editor_message) => {
                if let Some(editor_message) = editor_message {
                    delete_quiet(self.messenger.as_ref(), chat, editor_message).await;
                }
                transient_notice(
                    self.messenger.clone(),
                    chat,
                    texts::text(lang, Key::MsgQuoteCanceled),
                    Duration::from_secs(2),
                )
                .await;
            }
            Err(notice) => self.notice(chat, lang, notice).await,
        }
    }

    async fn cmd_demo(&self, chat: ChatId, message: &Message) {
        let sender = match &message.from {
            Some(sender) => sender.clone(),
            None => return,
        };
        self.chat_action(chat, ChatAction::Typing).await;

        let lang = self.sessions.prefs(chat).language;
        let avatar = self.fetcher.profile_avatar(sender.id).await;
        let color = *DEMO_COLORS
            .choose(&mut rand::thread_rng())
            .unwrap_or(&ColorKey::Red);

        self.sessions.with_session(chat, |session| {
            session::ingest_demo(
                session,
                texts::text(lang, Key::DemoText).to_string(),
                sender.full_name(),
                color,
                avatar,
                sender.id,
            );
        });
        self.show_menu(chat, true).await;
    }

    async fn handle_content(&self, message: Message) {
        let chat = message.chat.id;
        let phase = self.sessions.with_session(chat, |session| session.phase());
        let lang = self.sessions.prefs(chat).language;

        match phase {
            None => {
                // Only text, media or a forward can open a session; a bare
                // document (no caption) is not a qualifying trigger.
                let qualifies = message.text.is_some()
                    || message.caption.is_some()
                    || message.has_photo()
                    || message.forward_origin.is_some();
                if qualifies {
                    self.ingest_content(chat, lang, message).await;
                }
            }
            Some(EditPhase::Menu) => {
                self.notice(chat, lang, SessionNotice::EditorMenuMissing).await;
            }
            Some(EditPhase::Color) => {
                self.notice(chat, lang, SessionNotice::ColorMenuMissing).await;
            }
            Some(EditPhase::Text) => self.apply_text_edit(chat, lang, message).await,
            Some(EditPhase::Name) => self.apply_name_edit(chat, lang, message).await,
            Some(EditPhase::Avatar) => self.apply_avatar_edit(chat, lang, message).await,
        }
    }

    async fn ingest_content(&self, chat: ChatId, lang: Lang, message: Message) {
        self.chat_action(chat, ChatAction::Typing).await;

        let text = message.text.clone().or_else(|| message.caption.clone());
        let photo = match message.largest_photo() {
            Some(size) => self.fetcher.file_bytes(&size.file_id).await,
            None => None,
        };

        if text.as_deref().unwrap_or_default().is_empty() && photo.is_none() {
            self.notice(chat, lang, SessionNotice::MissingContent).await;
            return;
        }

        let origin = origin_of(&message);
        let avatar = match origin.avatar_user() {
            Some(user_id) => self.fetcher.profile_avatar(user_id).await,
            None => None,
        };

        let ingested = self.sessions.with_session(chat, |session| {
            session::ingest(
                session,
                IncomingContent {
                    text,
                    photo,
                    origin,
                },
                avatar,
            )
        });

        match ingested {
            Ok(()) => self.show_menu(chat, true).await,
            Err(notice) => self.notice(chat, lang, notice).await,
        }
    }

    async fn apply_text_edit(&self, chat: ChatId, lang: Lang, message: Message) {
        let input = if let Some(size) = message.largest_photo() {
            EditInput::Photo {
                bytes: self.fetcher.file_bytes(&size.file_id).await,
                caption: message.caption.clone(),
            }
        } else if let Some(text) = message.text.clone() {
            EditInput::Text(text)
        } else if message.document.is_some() {
            EditInput::Document {
                caption: message.caption.clone(),
            }
        } else {
            return;
        };
        self.apply_edit(chat, lang, input).await;
    }

    async fn apply_name_edit(&self, chat: ChatId, lang: Lang, message: Message) {
        let input = if let Some(text) = message.text.clone() {
            EditInput::Text(text)
        } else if message.has_photo() {
            // The machine rejects this by shape; no point downloading.
            EditInput::Photo {
                bytes: None,
                caption: message.caption.clone(),
            }
        } else if message.document.is_some() {
            EditInput::Document {
                caption: message.caption.clone(),
            }
        } else {
            return;
        };
        self.apply_edit(chat, lang, input).await;
    }

    async fn apply_avatar_edit(&self, chat: ChatId, lang: Lang, message: Message) {
        let input = if let Some(size) = message.largest_photo() {
            // The uploaded photo disappears from the chat; the sticker is
            // the only place it shows up.
            delete_quiet(self.messenger.as_ref(), chat, message.message_id).await;
            EditInput::Photo {
                bytes: self.fetcher.file_bytes(&size.file_id).await,
                caption: None,
            }
        } else if let Some(text) = message.text.clone() {
            EditInput::Text(text)
        } else if message.document.is_some() {
            EditInput::Document {
                caption: message.caption.clone(),
            }
        } else {
            return;
        };
        self.apply_edit(chat, lang, input).await;
    }

    async fn apply_edit(&self, chat: ChatId, lang: Lang, input: EditInput) {
        let editor_message = self.editor_message(chat);
        let applied = self
            .sessions
            .with_session(chat, |session| session::apply_edit(session, input));

        match applied {
            Ok(_) => {
                if let Some(editor_message) = editor_message {
                    delete_quiet(self.messenger.as_ref(), chat, editor_message).await;
                }
                self.show_menu(chat, true).await;
            }
            Err(EditRejection::Mismatch(notice)) => self.notice(chat, lang, notice).await,
            Err(EditRejection::Ignored) => {}
        }
    }

    async fn handle_callback(&self, callback: CallbackQuery) {
        let (chat, menu_message) = match &callback.message {
            Some(message) => (message.chat.id, message.message_id),
            None => {
                let _ = self.messenger.answer_callback(&callback.id, None).await;
                return;
            }
        };
        let data = callback.data.clone().unwrap_or_default();
        let lang = self.sessions.prefs(chat).language;
        debug!(chat, %data, "callback");

        match data.as_str() {
            "make_quote" => self.cb_generate(chat, &callback, menu_message).await,
            "cancel_inline" => {
                let _ = self.sessions.with_session(chat, session::cancel);
                delete_quiet(self.messenger.as_ref(), chat, menu_message).await;
                self.toast(&callback, texts::text(lang, Key::ToastCanceled)).await;
            }
            "cancel_edit" => {
                self.toast(&callback, texts::text(lang, Key::ToastCanceled)).await;
                if self.sessions.with_session(chat, session::back_to_menu) {
                    self.show_menu(chat, false).await;
                }
            }
            "back_to_menu" => {
                self.ack(&callback).await;
                if self.sessions.with_session(chat, session::back_to_menu) {
                    self.show_menu(chat, false).await;
                }
            }
            "edit_text" => {
                self.start_editing(chat, &callback, menu_message, EditTarget::Text).await;
            }
            "edit_name" => {
                self.start_editing(chat, &callback, menu_message, EditTarget::Name).await;
            }
            "edit_avatar" => {
                self.start_editing(chat, &callback, menu_message, EditTarget::Avatar).await;
            }
            "edit_color" => {
                self.start_editing(chat, &callback, menu_message, EditTarget::Color).await;
            }
            "delete_msg" => {
                self.ack(&callback).await;
                delete_quiet(self.messenger.as_ref(), chat, menu_message).await;
            }
            "back_to_settings" => {
                self.ack(&callback).await;
                self.show_settings(chat, lang, menu_message).await;
            }
            "open_lang_menu" => {
                self.ack(&callback).await;
                let _ = edit_or_resend(
                    self.messenger.as_ref(),
                    chat,
                    menu_message,
                    &texts::lang_select_header(lang),
                    Some(&keyboards::lang_menu(lang, true)),
                )
                .await;
            }
            "open_theme_menu" => {
                self.ack(&callback).await;
                let _ = edit_or_resend(
                    self.messenger.as_ref(),
                    chat,
                    menu_message,
                    texts::text(lang, Key::ThemeSelectHeader),
                    Some(&keyboards::theme_menu(lang, false)),
                )
                .await;
            }
            "open_def_color_menu" => {
                self.ack(&callback).await;
                let _ = edit_or_resend(
                    self.messenger.as_ref(),
                    chat,
                    menu_message,
                    texts::text(lang, Key::DefColorHeader),
                    Some(&keyboards::default_color_menu(lang)),
                )
                .await;
            }
            "open_help_from_settings" => {
                self.ack(&callback).await;
                let _ = edit_or_resend(
                    self.messenger.as_ref(),
                    chat,
                    menu_message,
                    texts::text(lang, Key::Help),
                    Some(&keyboards::back_only(lang)),
                )
                .await;
            }
            "open_info_from_settings" => {
                self.ack(&callback).await;
                let _ = edit_or_resend(
                    self.messenger.as_ref(),
                    chat,
                    menu_message,
                    texts::text(lang, Key::Info),
                    Some(&keyboards::back_only(lang)),
                )
                .await;
            }
            _ => {
                if let Some(code) = data.strip_prefix("start_lang_") {
                    self.cb_start_lang(chat, &callback, menu_message, code).await;
                } else if let Some(rest) = data.strip_prefix("set_lang_") {
                    self.cb_set_lang(chat, &callback, menu_message, rest).await;
                } else if let Some(rest) = data.strip_prefix("set_theme_") {
                    self.cb_set_theme(chat, &callback, menu_message, rest).await;
                } else if let Some(choice) = data.strip_prefix("set_def_color_") {
                    self.cb_set_default_color(chat, &callback, menu_message, choice).await;
                } else if let Some(choice) = data.strip_prefix("set_color_") {
                    self.cb_set_color(chat, &callback, choice).await;
                } else {
                    self.ack(&callback).await;
                }
            }
        }
    }

    /// Terminal generate: clear the session first, then render and deliver.
    /// Failures after the clear surface as one generic notice; the
    /// composition is gone and cannot be retried.
    async fn cb_generate(&self, chat: ChatId, callback: &CallbackQuery, menu_message: MessageId) {
        let prefs = self.sessions.prefs(chat);
        let composition = self.sessions.with_session(chat, session::take_for_render);
        let composition = match composition {
            Some(composition) => composition,
            None => {
                // Stale button: no live composition in menu state.
                self.ack(callback).await;
                return;
            }
        };

        self.toast(callback, texts::text(prefs.language, Key::ToastGenerating)).await;
        self.chat_action(chat, ChatAction::ChooseSticker).await;
        delete_quiet(self.messenger.as_ref(), chat, menu_message).await;

        let delivered = self.render_and_deliver(chat, &composition, prefs.theme).await;
        if let Err(err) = delivered {
            warn!(chat, %err, "sticker generation failed");
            let _ = self
                .messenger
                .send_text(chat, texts::text(prefs.language, Key::RenderFailed), None)
                .await;
        }
    }

    async fn render_and_deliver(
        &self,
        chat: ChatId,
        composition: &Composition,
        theme: Theme,
    ) -> Result<()> {
        let sticker = self.pipeline.render(composition, theme).await?;
        self.messenger.send_sticker(chat, sticker.webp).await?;
        info!(chat, "sticker delivered");
        Ok(())
    }

    async fn start_editing(
        &self,
        chat: ChatId,
        callback: &CallbackQuery,
        menu_message: MessageId,
        target: EditTarget,
    ) {
        self.ack(callback).await;
        if !self
            .sessions
            .with_session(chat, |session| session::begin_edit(session, target))
        {
            return;
        }
        let lang = self.sessions.prefs(chat).language;
        let (prompt, keyboard) = match target {
            EditTarget::Text => (Key::AskText, keyboards::cancel_edit(lang)),
            EditTarget::Name => (Key::AskName, keyboards::cancel_edit(lang)),
            EditTarget::Avatar => (Key::AskAvatar, keyboards::cancel_edit(lang)),
            EditTarget::Color => (Key::AskColor, keyboards::color_picker(lang)),
        };
        let shown = edit_or_resend(
            self.messenger.as_ref(),
            chat,
            menu_message,
            texts::text(lang, prompt),
            Some(&keyboard),
        )
        .await;
        if let Ok(message_id) = shown {
            self.set_editor_message(chat, message_id);
        }
    }

    async fn cb_set_color(&self, chat: ChatId, callback: &CallbackQuery, choice: &str) {
        let choice = match choice {
            "auto" => ColorChoice::Auto,
            key => ColorChoice::Key(ColorKey::parse(key)),
        };
        let lang = self.sessions.prefs(chat).language;
        let applied = self
            .sessions
            .with_session(chat, |session| session::apply_color(session, choice));

        match applied {
            Some(selector) => {
                let toast = if selector.is_auto() {
                    Key::ToastAutoColor
                } else {
                    Key::ToastColorChanged
                };
                self.toast(callback, texts::text(lang, toast)).await;
                self.show_menu(chat, false).await;
            }
            None => self.ack(callback).await,
        }
    }

    async fn cb_start_lang(
        &self,
        chat: ChatId,
        callback: &CallbackQuery,
        menu_message: MessageId,
        code: &str,
    ) {
        let lang = Lang::from_code(code);
        self.sessions
            .with_session(chat, |session| session.prefs.language = lang);
        self.toast(callback, texts::text(lang, Key::ToastLangChanged)).await;
        let _ = self
            .messenger
            .send_text(chat, texts::text(lang, Key::Welcome), None)
            .await;
        delete_quiet(self.messenger.as_ref(), chat, menu_message).await;
    }

    async fn cb_set_lang(
        &self,
        chat: ChatId,
        callback: &CallbackQuery,
        menu_message: MessageId,
        rest: &str,
    ) {
        // Payload shape: "<code>_<from_settings>".
        let (code, from_settings) = match rest.rsplit_once('_') {
            Some((code, flag)) => (code, flag == "true"),
            None => (rest, false),
        };
        let lang = Lang::from_code(code);
        self.sessions
            .with_session(chat, |session| session.prefs.language = lang);
        self.toast(callback, texts::text(lang, Key::ToastLangChanged)).await;

        if from_settings {
            self.show_settings(chat, lang, menu_message).await;
        } else {
            let _ = edit_or_resend(
                self.messenger.as_ref(),
                chat,
                menu_message,
                &texts::lang_select_header(lang),
                Some(&keyboards::lang_menu(lang, false)),
            )
            .await;
        }
    }

    async fn cb_set_theme(
        &self,
        chat: ChatId,
        callback: &CallbackQuery,
        menu_message: MessageId,
        rest: &str,
    ) {
        // Payload shape: "<theme>_<quick>".
        let (code, quick) = match rest.rsplit_once('_') {
            Some((code, flag)) => (code, flag == "true"),
            None => (rest, true),
        };
        let theme = Theme::from_code(code);
        let lang = self.sessions.with_session(chat, |session| {
            session.prefs.theme = theme;
            session.prefs.language
        });
        self.toast(callback, texts::text(lang, Key::ToastThemeChanged)).await;

        if quick {
            delete_quiet(self.messenger.as_ref(), chat, menu_message).await;
        } else {
            self.show_settings(chat, lang, menu_message).await;
        }
    }

    async fn cb_set_default_color(
        &self,
        chat: ChatId,
        callback: &CallbackQuery,
        menu_message: MessageId,
        choice: &str,
    ) {
        let default_color = match choice {
            "auto" => None,
            key => Some(ColorKey::parse(key)),
        };
        let lang = self.sessions.with_session(chat, |session| {
            session.prefs.default_color = default_color;
            session.prefs.language
        });
        self.toast(callback, texts::text(lang, Key::ToastColorChanged)).await;
        self.show_settings(chat, lang, menu_message).await;
    }

    async fn show_settings(&self, chat: ChatId, lang: Lang, menu_message: MessageId) {
        let _ = edit_or_resend(
            self.messenger.as_ref(),
            chat,
            menu_message,
            texts::text(lang, Key::SettingsHeader),
            Some(&keyboards::settings_menu(lang)),
        )
        .await;
    }

    /// Render the editor menu from current state. `fresh` sends a new
    /// message; otherwise the existing editor message is edited in place
    /// (failures ignored: the user may have deleted it).
    async fn show_menu(&self, chat: ChatId, fresh: bool) {
        let view = self.sessions.with_session(chat, |session| {
            session.composition.as_ref().map(|composition| {
                let lang = session.prefs.language;
                let theme_key = match session.prefs.theme {
                    Theme::Dark => Key::ThemeDarkShort,
                    Theme::Light => Key::ThemeLightShort,
                };
                let mut preview = preview_of(&composition.quote_text);
                if composition.content_image.is_some() {
                    preview = format!("{} {preview}", texts::text(lang, Key::TagPhoto));
                }
                let color_label = match composition.color {
                    crate::color::ColorSelector::Auto(_) => {
                        texts::text(lang, Key::BtnAutoColor).to_string()
                    }
                    crate::color::ColorSelector::Named(key) => {
                        texts::color_name(lang, key).to_string()
                    }
                };
                let avatar_line = if composition.custom_avatar {
                    format!(
                        "🖼 <b>{}</b>: {}\n",
                        texts::text(lang, Key::LblAvatar),
                        texts::text(lang, Key::AvaCustom)
                    )
                } else {
                    String::new()
                };
                let header = texts::menu_header(&MenuHeader {
                    lang,
                    theme_label: texts::text(lang, theme_key),
                    text_preview: &preview,
                    author_name: &composition.author_name,
                    color_label: &color_label,
                    avatar_line: &avatar_line,
                });
                (header, lang, composition.editor_message)
            })
        });

        let (header, lang, editor_message) = match view {
            Some(view) => view,
            None => return,
        };
        let keyboard = keyboards::editor_menu(lang);

        if fresh {
            if let Ok(message_id) = self
                .messenger
                .send_text(chat, &header, Some(&keyboard))
                .await
            {
                self.set_editor_message(chat, message_id);
            }
        } else {
            match editor_message {
                Some(editor_message) => {
                    if let Err(err) = self
                        .messenger
                        .edit_text(chat, editor_message, &header, Some(&keyboard))
                        .await
                    {
                        debug!(chat, %err, "menu edit failed, leaving as is");
                    }
                }
                None => {
                    if let Ok(message_id) = self
                        .messenger
                        .send_text(chat, &header, Some(&keyboard))
                        .await
                    {
                        self.set_editor_message(chat, message_id);
                    }
                }
            }
        }
    }

    fn editor_message(&self, chat: ChatId) -> Option<MessageId> {
        self.sessions.with_session(chat, |session| {
            session
                .composition
                .as_ref()
                .and_then(|composition| composition.editor_message)
        })
    }

    fn set_editor_message(&self, chat: ChatId, message_id: MessageId) {
        self.sessions.with_session(chat, |session| {
            if let Some(composition) = session.composition.as_mut() {
                composition.editor_message = Some(message_id);
            }
        });
    }

    async fn notice(&self, chat: ChatId, lang: Lang, notice: SessionNotice) {
        transient_notice(
            self.messenger.clone(),
            chat,
            texts::text(lang, notice.text_key()),
            Duration::from_secs(notice.display_secs()),
        )
        .await;
    }

    async fn toast(&self, callback: &CallbackQuery, text: &str) {
        if let Err(err) = self.messenger.answer_callback(&callback.id, Some(text)).await {
            debug!(%err, "callback answer failed");
        }
    }

    async fn ack(&self, callback: &CallbackQuery) {
        if let Err(err) = self.messenger.answer_callback(&callback.id, None).await {
            debug!(%err, "callback ack failed");
        }
    }

    async fn chat_action(&self, chat: ChatId, action: ChatAction) {
        if let Err(err) = self.messenger.send_chat_action(chat, action).await {
            debug!(chat, %err, "chat action failed");
        }
    }
}

/// Long-poll loop: fetch updates, fan them out, advance the offset. Poll
/// failures back off and retry; the loop only ends with the process.
pub async fn run_polling(api: Arc<BotApi>, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let mut offset = 0i64;
    info!("polling for updates");
    loop {
        match api.get_updates(offset).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let dispatcher = dispatcher.clone();
                    tokio::spawn(dispatcher.handle_update(update));
                }
            }
            Err(err) => {
                warn!(%err, "getUpdates failed, backing off");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
            }
        }
    }
}

fn chat_of(update: &Update) -> Option<ChatId> {
    if let Some(message) = &update.message {
        return Some(message.chat.id);
    }
    update
        .callback_query
        .as_ref()
        .and_then(|callback| callback.message.as_ref())
        .map(|message| message.chat.id)
}

/// Quote preview for the menu: first characters, ellipsis when truncated.
fn preview_of(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Map forward metadata to a content origin, in priority order: forwarded
/// user, hidden sender name, forwarded chat/channel, direct sender.
fn origin_of(message: &Message) -> ContentOrigin {
    match &message.forward_origin {
        Some(ForwardOrigin::User { sender_user }) => ContentOrigin::ForwardedUser {
            name: sender_user.full_name(),
            id: sender_user.id,
        },
        Some(ForwardOrigin::HiddenUser { sender_user_name }) => ContentOrigin::HiddenSender {
            name: sender_user_name.clone(),
        },
        Some(ForwardOrigin::Chat { sender_chat }) => ContentOrigin::ForwardedChat {
            title: sender_chat
                .title
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            id: sender_chat.id,
        },
        Some(ForwardOrigin::Channel { chat }) => ContentOrigin::ForwardedChat {
            title: chat.title.clone().unwrap_or_else(|| "Unknown".to_string()),
            id: chat.id,
        },
        Some(ForwardOrigin::Unknown) | None => match &message.from {
            Some(sender) => ContentOrigin::Direct {
                name: sender.full_name(),
                id: sender.id,
            },
            None => ContentOrigin::Direct {
                name: "Unknown".to_string(),
                id: 0,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_at_fifty_chars() {
        let short = "hello";
        assert_eq!(preview_of(short), "hello");

        let long = "x".repeat(60);
        let preview = preview_of(&long);
        assert_eq!(preview.chars().count(), 53);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let cyrillic = "ц".repeat(50);
        assert_eq!(preview_of(&cyrillic), cyrillic);
    }

    #[test]
    fn test_origin_priority_forwarded_user_wins() {
        let json = r#"{
            "message_id": 1,
            "chat": {"id": 5, "type": "private"},
            "from": {"id": 10, "first_name": "Sender"},
            "forward_origin": {"type": "user", "sender_user": {"id": 77, "first_name": "Orig"}},
            "text": "q"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        let origin = origin_of(&message);
        assert_eq!(
            origin,
            ContentOrigin::ForwardedUser {
                name: "Orig".to_string(),
                id: 77
            }
        );
    }

    #[test]
    fn test_origin_hidden_sender() {
        let json = r#"{
            "message_id": 1,
            "chat": {"id": 5, "type": "private"},
            "from": {"id": 10, "first_name": "Sender"},
            "forward_origin": {"type": "hidden_user", "sender_user_name": "Ghost"},
            "text": "q"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(
            origin_of(&message),
            ContentOrigin::HiddenSender {
                name: "Ghost".to_string()
            }
        );
    }

    #[test]
    fn test_origin_falls_back_to_direct_sender() {
        let json = r#"{
            "message_id": 1,
            "chat": {"id": 5, "type": "private"},
            "from": {"id": 10, "first_name": "Sender"},
            "text": "q"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(
            origin_of(&message),
            ContentOrigin::Direct {
                name: "Sender".to_string(),
                id: 10
            }
        );
    }

    #[test]
    fn test_chat_of_prefers_message_then_callback() {
        let message_update: Update = serde_json::from_str(
            r#"{"update_id": 1, "message": {"message_id": 2, "chat": {"id": 9}}}"#,
        )
        .unwrap();
        assert_eq!(chat_of(&message_update), Some(9));

        let bare: Update = serde_json::from_str(r#"{"update_id": 3}"#).unwrap();
        assert_eq!(chat_of(&bare), None);
    }
}
