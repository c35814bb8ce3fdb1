//! Edit-session state machine
//!
//! Transitions for one chat's quote composition: ingest of new content,
//! entering/leaving the edit sub-states, applying edits, color selection,
//! and the terminal generate/cancel paths. Every function here mutates a
//! [`Session`] synchronously; callers run them inside
//! [`SessionStore::with_session`](crate::state::SessionStore::with_session)
//! so a transition can never interleave with another event for the same
//! chat.
//!
//! Mismatched input never changes state: it comes back as a typed
//! [`SessionNotice`] that the transport turns into a transient,
//! self-deleting message.

use crate::color::{ColorKey, ColorSelector};
use crate::state::{Composition, EditPhase, MessageId, Session};
use crate::texts::Key;

/// Where a piece of inbound content originally came from.
///
/// Forward metadata outranks the direct sender, so quoting a forwarded
/// message attributes it to its original author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Forwarded from a visible user account.
    ForwardedUser { name: String, id: i64 },
    /// Forwarded from a user who hides their account; only a display name
    /// string is available.
    HiddenSender { name: String },
    /// Forwarded from a channel or group.
    ForwardedChat { title: String, id: i64 },
    /// Written directly by the sender.
    Direct { name: String, id: i64 },
}

impl ContentOrigin {
    /// Author display name for the quote.
    pub fn author_name(&self) -> &str {
        match self {
            ContentOrigin::ForwardedUser { name, .. } => name,
            ContentOrigin::HiddenSender { name } => name,
            ContentOrigin::ForwardedChat { title, .. } => title,
            ContentOrigin::Direct { name, .. } => name,
        }
    }

    /// Numeric identity used to derive the automatic accent color.
    ///
    /// Hidden senders have no id, so the seed is the sum of the name's
    /// character codes. Anagrams collide; the scheme is kept because the
    /// derived color only needs to be stable, not unique.
    pub fn seed(&self) -> i64 {
        match self {
            ContentOrigin::ForwardedUser { id, .. } => *id,
            ContentOrigin::HiddenSender { name } => name_seed(name),
            ContentOrigin::ForwardedChat { id, .. } => *id,
            ContentOrigin::Direct { id, .. } => *id,
        }
    }

    /// User whose profile photo should seed the avatar, when one exists.
    pub fn avatar_user(&self) -> Option<i64> {
        match self {
            ContentOrigin::ForwardedUser { id, .. } => Some(*id),
            ContentOrigin::HiddenSender { .. } => None,
            ContentOrigin::ForwardedChat { id, .. } => Some(*id),
            ContentOrigin::Direct { id, .. } => Some(*id),
        }
    }
}

/// Character-code sum of a display name.
pub fn name_seed(name: &str) -> i64 {
    name.chars().map(|c| c as i64).sum()
}

/// Content that can start a composition.
#[derive(Debug, Clone)]
pub struct IncomingContent {
    pub text: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub origin: ContentOrigin,
}

/// A recoverable, user-visible event: shown as a transient notice and
/// deleted after a few seconds. State is never changed by these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotice {
    /// Session start with neither text nor image.
    MissingContent,
    /// Non-text input while the name editor is open.
    WrongInputForName,
    /// Non-photo input while the avatar editor is open.
    WrongInputForAvatar,
    /// Plain content while the editor menu is the expected input.
    EditorMenuMissing,
    /// Plain content while the color picker is the expected input.
    ColorMenuMissing,
    /// `/cancel` with no live composition.
    NothingToCancel,
}

impl SessionNotice {
    /// Localization key for the notice body.
    pub fn text_key(self) -> Key {
        match self {
            SessionNotice::MissingContent => Key::ErrorNoText,
            SessionNotice::WrongInputForName => Key::ErrorNameWrongType,
            SessionNotice::WrongInputForAvatar => Key::ErrorAvatarWrongType,
            SessionNotice::EditorMenuMissing => Key::ErrorMenuDeleted,
            SessionNotice::ColorMenuMissing => Key::ErrorColorMenuDeleted,
            SessionNotice::NothingToCancel => Key::ErrorNothingToCancel,
        }
    }

    /// How long the notice stays on screen before self-deleting.
    pub fn display_secs(self) -> u64 {
        match self {
            SessionNotice::MissingContent | SessionNotice::NothingToCancel => 2,
            _ => 4,
        }
    }
}

/// Which editor a menu button opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Text,
    Name,
    Avatar,
    Color,
}

impl EditTarget {
    fn phase(self) -> EditPhase {
        match self {
            EditTarget::Text => EditPhase::Text,
            EditTarget::Name => EditPhase::Name,
            EditTarget::Avatar => EditPhase::Avatar,
            EditTarget::Color => EditPhase::Color,
        }
    }
}

/// Inbound content while an editor is open.
#[derive(Debug, Clone)]
pub enum EditInput {
    Text(String),
    /// A photo message. `bytes` is `None` when the download failed; the
    /// edit still applies and clears the previous image, keeping the
    /// stored state in step with what the user last sent.
    Photo {
        bytes: Option<Vec<u8>>,
        caption: Option<String>,
    },
    Document {
        caption: Option<String>,
    },
}

/// Result of a successful edit application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Updated,
    /// Input was accepted by shape but carried nothing to apply (e.g. a
    /// captionless field change); editor still returns to the menu.
    NoChange,
}

/// Why an edit input was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRejection {
    /// Wrong input type for the open editor; show a notice, keep state.
    Mismatch(SessionNotice),
    /// Input the machine does not react to at all (no notice).
    Ignored,
}

/// Color-picker selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// Re-derive from the originating identity.
    Auto,
    Key(ColorKey),
}

/// Start a composition from inbound content. `avatar` is the prefetched
/// profile photo of the originating identity, if any.
///
/// Rejects with [`SessionNotice::MissingContent`] when the content has
/// neither text nor image, and with the menu notices when a composition is
/// already live (content is then the wrong input type, not a new session).
pub fn ingest(
    session: &mut Session,
    content: IncomingContent,
    avatar: Option<Vec<u8>>,
) -> Result<(), SessionNotice> {
    if let Some(phase) = session.phase() {
        return Err(match phase {
            EditPhase::Color => SessionNotice::ColorMenuMissing,
            _ => SessionNotice::EditorMenuMissing,
        });
    }

    let text = content.text.unwrap_or_default();
    if text.is_empty() && content.photo.is_none() {
        return Err(SessionNotice::MissingContent);
    }

    let seed = content.origin.seed();
    let color = match session.prefs.default_color {
        Some(key) => ColorSelector::Named(key),
        None => ColorSelector::Auto(seed),
    };

    session.composition = Some(Composition {
        quote_text: text,
        author_name: content.origin.author_name().to_string(),
        color,
        avatar,
        custom_avatar: false,
        content_image: content.photo,
        origin_seed: seed,
        editor_message: None,
        phase: EditPhase::Menu,
    });
    Ok(())
}

/// Start the demo composition (`/q`). Overwrites any live composition; the
/// old editor message is abandoned, matching the command's "start fresh"
/// intent.
pub fn ingest_demo(
    session: &mut Session,
    quote_text: String,
    author_name: String,
    color: ColorKey,
    avatar: Option<Vec<u8>>,
    seed: i64,
) {
    session.composition = Some(Composition {
        quote_text,
        author_name,
        color: ColorSelector::Named(color),
        avatar,
        custom_avatar: false,
        content_image: None,
        origin_seed: seed,
        editor_message: None,
        phase: EditPhase::Menu,
    });
}

/// Open an editor. Succeeds whenever a composition is live, regardless of
/// the current phase, so a stale menu button still lands somewhere sane.
/// Returns `false` (stale action) when nothing is being composed.
pub fn begin_edit(session: &mut Session, target: EditTarget) -> bool {
    match session.composition.as_mut() {
        Some(composition) => {
            composition.phase = target.phase();
            true
        }
        None => false,
    }
}

/// Return to the editor menu (e.g. "back" from the color picker).
pub fn back_to_menu(session: &mut Session) -> bool {
    match session.composition.as_mut() {
        Some(composition) => {
            composition.phase = EditPhase::Menu;
            true
        }
        None => false,
    }
}

/// Apply inbound content against the open editor.
///
/// Only the input type matching the current phase is accepted; anything
/// else is rejected without touching the composition.
pub fn apply_edit(session: &mut Session, input: EditInput) -> Result<ApplyOutcome, EditRejection> {
    let composition = match session.composition.as_mut() {
        Some(composition) => composition,
        None => return Err(EditRejection::Ignored),
    };

    match composition.phase {
        EditPhase::Menu => Err(EditRejection::Mismatch(SessionNotice::EditorMenuMissing)),
        EditPhase::Color => Err(EditRejection::Mismatch(SessionNotice::ColorMenuMissing)),
        EditPhase::Text => match input {
            EditInput::Text(text) => {
                composition.quote_text = text;
                composition.phase = EditPhase::Menu;
                Ok(ApplyOutcome::Updated)
            }
            EditInput::Photo { bytes, caption } => {
                composition.content_image = bytes;
                if let Some(caption) = caption {
                    composition.quote_text = caption;
                }
                composition.phase = EditPhase::Menu;
                Ok(ApplyOutcome::Updated)
            }
            // A captioned document reaches the text editor but carries no
            // usable body; the editor just closes.
            EditInput::Document { caption: Some(_) } => {
                composition.phase = EditPhase::Menu;
                Ok(ApplyOutcome::NoChange)
            }
            EditInput::Document { caption: None } => Err(EditRejection::Ignored),
        },
        EditPhase::Name => match input {
            EditInput::Text(name) => {
                composition.author_name = name;
                composition.phase = EditPhase::Menu;
                Ok(ApplyOutcome::Updated)
            }
            EditInput::Photo { .. } | EditInput::Document { .. } => {
                Err(EditRejection::Mismatch(SessionNotice::WrongInputForName))
            }
        },
        EditPhase::Avatar => match input {
            EditInput::Photo { bytes, .. } => {
                composition.avatar = bytes;
                composition.custom_avatar = true;
                composition.phase = EditPhase::Menu;
                Ok(ApplyOutcome::Updated)
            }
            EditInput::Text(_) | EditInput::Document { .. } => {
                Err(EditRejection::Mismatch(SessionNotice::WrongInputForAvatar))
            }
        },
    }
}

/// Apply a color-picker choice and return to the menu. Returns the applied
/// selector (for the toast), or `None` for a stale picker.
pub fn apply_color(session: &mut Session, choice: ColorChoice) -> Option<ColorSelector> {
    let composition = session.composition.as_mut()?;
    composition.color = match choice {
        ColorChoice::Auto => ColorSelector::Auto(composition.origin_seed),
        ColorChoice::Key(key) => ColorSelector::Named(key),
    };
    composition.phase = EditPhase::Menu;
    Some(composition.color)
}

/// Terminal "create" transition: move the composition out for rendering.
///
/// Only valid from the menu; the session is cleared immediately, so a
/// render failure after this point cannot retry the same composition.
/// Preferences are untouched.
pub fn take_for_render(session: &mut Session) -> Option<Composition> {
    match session.phase() {
        Some(EditPhase::Menu) => session.composition.take(),
        _ => None,
    }
}

/// Cancel from any state. Returns the abandoned editor message handle when
/// a composition was live; `Err` when there was nothing to cancel (which
/// makes a second cancel a recognizable no-op). Preferences survive.
pub fn cancel(session: &mut Session) -> Result<Option<MessageId>, SessionNotice> {
    match session.composition.take() {
        Some(composition) => Ok(composition.editor_message),
        None => Err(SessionNotice::NothingToCancel),
    }
}
