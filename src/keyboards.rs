//! Inline keyboard layouts
//!
//! Builders for every menu the bot shows. Callback data strings are the
//! routing keys consumed by [`crate::dispatch`].

use crate::color::ColorKey;
use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::texts::{self, Key, Lang};

fn btn(lang: Lang, key: Key, data: &str) -> InlineKeyboardButton {
    InlineKeyboardButton::new(texts::text(lang, key), data)
}

/// Main editor menu: create, edit fields, close.
pub fn editor_menu(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![btn(lang, Key::BtnCreate, "make_quote")],
        vec![
            btn(lang, Key::BtnEditName, "edit_name"),
            btn(lang, Key::BtnEditText, "edit_text"),
        ],
        vec![
            btn(lang, Key::BtnEditAvatar, "edit_avatar"),
            btn(lang, Key::BtnEditColor, "edit_color"),
        ],
        vec![btn(lang, Key::BtnCancelAll, "cancel_inline")],
    ])
}

/// Single cancel button shown under edit prompts.
pub fn cancel_edit(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![btn(lang, Key::BtnCancelAction, "cancel_edit")]])
}

/// Color picker: auto on top, palette keys two per row, back at the bottom.
pub fn color_picker(lang: Lang) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![btn(lang, Key::BtnAutoColor, "set_color_auto")]];
    let mut row = Vec::new();
    for key in ColorKey::MENU {
        row.push(InlineKeyboardButton::new(
            texts::color_name(lang, key),
            format!("set_color_{}", key.as_str()),
        ));
        if row.len() == 2 {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows.push(vec![InlineKeyboardButton::new("⬅️", "back_to_menu")]);
    InlineKeyboardMarkup::new(rows)
}

/// Settings hub.
pub fn settings_menu(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![btn(lang, Key::BtnSettingsLang, "open_lang_menu")],
        vec![btn(lang, Key::BtnSettingsTheme, "open_theme_menu")],
        vec![btn(lang, Key::BtnSettingsDefColor, "open_def_color_menu")],
        vec![
            btn(lang, Key::BtnSettingsHelp, "open_help_from_settings"),
            btn(lang, Key::BtnSettingsInfo, "open_info_from_settings"),
        ],
        vec![btn(lang, Key::BtnClose, "delete_msg")],
    ])
}

/// Theme choice. Quick menus (from `/theme`) close; settings menus go back.
pub fn theme_menu(lang: Lang, quick: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![
        InlineKeyboardButton::new(
            texts::text(lang, Key::ThemeDark),
            format!("set_theme_dark_{quick}"),
        ),
        InlineKeyboardButton::new(
            texts::text(lang, Key::ThemeLight),
            format!("set_theme_light_{quick}"),
        ),
    ]];
    if quick {
        rows.push(vec![btn(lang, Key::BtnClose, "delete_msg")]);
    } else {
        rows.push(vec![btn(lang, Key::BtnBack, "back_to_settings")]);
    }
    InlineKeyboardMarkup::new(rows)
}

/// Language choice, one row per language.
pub fn lang_menu(lang: Lang, from_settings: bool) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Lang::ALL
        .iter()
        .map(|choice| {
            vec![InlineKeyboardButton::new(
                choice.label(),
                format!("set_lang_{}_{from_settings}", choice.code()),
            )]
        })
        .collect();
    if from_settings {
        rows.push(vec![btn(lang, Key::BtnBack, "back_to_settings")]);
    } else {
        rows.push(vec![btn(lang, Key::BtnClose, "delete_msg")]);
    }
    InlineKeyboardMarkup::new(rows)
}

/// Default accent color for new compositions: automatic or a fixed key.
pub fn default_color_menu(lang: Lang) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![btn(lang, Key::DefColorAuto, "set_def_color_auto")]];
    let mut row = Vec::new();
    for key in ColorKey::MENU {
        row.push(InlineKeyboardButton::new(
            texts::color_name(lang, key),
            format!("set_def_color_{}", key.as_str()),
        ));
        if row.len() == 2 {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows.push(vec![btn(lang, Key::BtnBack, "back_to_settings")]);
    InlineKeyboardMarkup::new(rows)
}

/// First-contact language chooser shown by `/start`.
pub fn start_lang_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        Lang::ALL
            .iter()
            .map(|choice| {
                vec![InlineKeyboardButton::new(
                    choice.label(),
                    format!("start_lang_{}", choice.code()),
                )]
            })
            .collect(),
    )
}

/// Single close button.
pub fn close_only(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![btn(lang, Key::BtnClose, "delete_msg")]])
}

/// Single back-to-settings button.
pub fn back_only(lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![btn(lang, Key::BtnBack, "back_to_settings")]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(markup: &InlineKeyboardMarkup) -> Vec<&str> {
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
            .collect()
    }

    #[test]
    fn test_editor_menu_routes() {
        let menu = editor_menu(Lang::En);
        let data = flatten(&menu);
        assert_eq!(
            data,
            vec![
                "make_quote",
                "edit_name",
                "edit_text",
                "edit_avatar",
                "edit_color",
                "cancel_inline"
            ]
        );
    }

    #[test]
    fn test_color_picker_has_auto_seven_keys_and_back() {
        let menu = color_picker(Lang::Ua);
        let data = flatten(&menu);
        assert_eq!(data.first(), Some(&"set_color_auto"));
        assert_eq!(data.last(), Some(&"back_to_menu"));
        assert_eq!(data.len(), 9);
        assert!(!data.contains(&"set_color_gold"));
    }

    #[test]
    fn test_theme_menu_quick_vs_settings() {
        let quick_menu = theme_menu(Lang::En, true);
        let quick = flatten(&quick_menu);
        assert!(quick.contains(&"set_theme_dark_true"));
        assert!(quick.contains(&"delete_msg"));

        let settings_menu = theme_menu(Lang::En, false);
        let settings = flatten(&settings_menu);
        assert!(settings.contains(&"set_theme_light_false"));
        assert!(settings.contains(&"back_to_settings"));
    }

    #[test]
    fn test_lang_menu_encodes_origin() {
        let menu = lang_menu(Lang::Ua, true);
        let data = flatten(&menu);
        assert!(data.contains(&"set_lang_ua_true"));
        assert!(data.contains(&"set_lang_en_true"));
        assert_eq!(data.last(), Some(&"back_to_settings"));
    }

    #[test]
    fn test_default_color_menu_offers_auto() {
        let menu = default_color_menu(Lang::En);
        let data = flatten(&menu);
        assert_eq!(data.first(), Some(&"set_def_color_auto"));
        assert!(data.contains(&"set_def_color_pink"));
    }
}
