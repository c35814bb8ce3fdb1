//! Localization tables
//!
//! Two languages, Ukrainian first (it is also the fallback). Strings are
//! addressed through [`Key`] and resolved with an exhaustive match per
//! language, so a missing translation is a compile error rather than a
//! runtime "Text Error".

use crate::color::ColorKey;

/// Bot UI language. Unknown codes fall back to Ukrainian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Ua,
    En,
}

impl Lang {
    /// All selectable languages, in menu order.
    pub const ALL: [Lang; 2] = [Lang::Ua, Lang::En];

    /// Stable code used in callback data.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Ua => "ua",
            Lang::En => "en",
        }
    }

    /// Parse a language code, falling back to Ukrainian.
    pub fn from_code(code: &str) -> Lang {
        match code {
            "en" => Lang::En,
            _ => Lang::Ua,
        }
    }

    /// Flag + native name, as shown in the language menu.
    pub fn label(self) -> &'static str {
        match self {
            Lang::Ua => "🇺🇦 Українська",
            Lang::En => "🇺🇸 English",
        }
    }

    /// Just the flag, for the editor header.
    pub fn flag(self) -> &'static str {
        match self {
            Lang::Ua => "🇺🇦",
            Lang::En => "🇺🇸",
        }
    }
}

/// A localizable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Welcome,
    Help,
    Info,
    SettingsHeader,
    BtnSettingsLang,
    BtnSettingsTheme,
    BtnSettingsDefColor,
    BtnSettingsHelp,
    BtnSettingsInfo,
    BtnBack,
    ThemeSelectHeader,
    ThemeDark,
    ThemeLight,
    ThemeDarkShort,
    ThemeLightShort,
    DefColorHeader,
    DefColorAuto,
    ToastLangChanged,
    ToastThemeChanged,
    ToastColorChanged,
    ToastCanceled,
    ToastGenerating,
    ToastAutoColor,
    MsgQuoteCanceled,
    ErrorNothingToCancel,
    BtnCreate,
    BtnEditName,
    BtnEditText,
    BtnEditAvatar,
    BtnEditColor,
    BtnCancelAll,
    BtnCancelAction,
    BtnClose,
    BtnAutoColor,
    AskText,
    AskName,
    AskAvatar,
    AskColor,
    ErrorNoText,
    ErrorNameWrongType,
    ErrorAvatarWrongType,
    ErrorMenuDeleted,
    ErrorColorMenuDeleted,
    LblAvatar,
    AvaCustom,
    TagPhoto,
    DemoText,
    RenderFailed,
}

/// Resolve a string for a language.
pub fn text(lang: Lang, key: Key) -> &'static str {
    match lang {
        Lang::Ua => ua(key),
        Lang::En => en(key),
    }
}

/// Human label for a palette key, as shown in menus.
pub fn color_name(lang: Lang, key: ColorKey) -> &'static str {
    match lang {
        Lang::Ua => match key {
            ColorKey::Red => "❤️ Червоний",
            ColorKey::Orange => "🧡 Помаранчевий",
            ColorKey::Purple => "💜 Фіолетовий",
            ColorKey::Green => "💚 Зелений",
            ColorKey::Cyan => "🩵 Бірюзовий",
            ColorKey::Blue => "💙 Блакитний",
            ColorKey::Pink => "🩷 Рожевий",
            ColorKey::Gold => "💛 Золотий",
        },
        Lang::En => match key {
            ColorKey::Red => "❤️ Red",
            ColorKey::Orange => "🧡 Orange",
            ColorKey::Purple => "💜 Purple",
            ColorKey::Green => "💚 Green",
            ColorKey::Cyan => "🩵 Cyan",
            ColorKey::Blue => "💙 Blue",
            ColorKey::Pink => "🩷 Pink",
            ColorKey::Gold => "💛 Gold",
        },
    }
}

/// Arguments for the editor menu header.
pub struct MenuHeader<'a> {
    pub lang: Lang,
    pub theme_label: &'a str,
    pub text_preview: &'a str,
    pub author_name: &'a str,
    pub color_label: &'a str,
    pub avatar_line: &'a str,
}

/// Render the editor menu header.
pub fn menu_header(args: &MenuHeader<'_>) -> String {
    match args.lang {
        Lang::Ua => format!(
            "🌍 Мова: {flag} | 🌗 Тема: {theme}\n\
             ➖➖➖➖➖➖➖\n\
             📝 <b>Цитата:</b> {text}\n\
             👤 <b>Ім'я автора:</b> {name}\n\
             🎨 <b>Колір імені:</b> {color}\n\
             {avatar}\n\
             👇 <b>Редактор:</b>",
            flag = args.lang.flag(),
            theme = args.theme_label,
            text = args.text_preview,
            name = args.author_name,
            color = args.color_label,
            avatar = args.avatar_line,
        ),
        Lang::En => format!(
            "🌍 Lang: {flag} | 🌗 Theme: {theme}\n\
             ➖➖➖➖➖➖➖\n\
             📝 <b>Quote:</b> {text}\n\
             👤 <b>Author Name:</b> {name}\n\
             🎨 <b>Name Color:</b> {color}\n\
             {avatar}\n\
             👇 <b>Editor:</b>",
            flag = args.lang.flag(),
            theme = args.theme_label,
            text = args.text_preview,
            name = args.author_name,
            color = args.color_label,
            avatar = args.avatar_line,
        ),
    }
}

/// Render the language-menu header with the current language name.
pub fn lang_select_header(lang: Lang) -> String {
    match lang {
        Lang::Ua => format!(
            "🌍 <b>Поточна мова:</b> {}\nОбери нову:",
            lang.label()
        ),
        Lang::En => format!(
            "🌍 <b>Current Language:</b> {}\nSelect new:",
            lang.label()
        ),
    }
}

fn ua(key: Key) -> &'static str {
    match key {
        Key::Welcome => {
            "👋 <b>Привіт!</b>\n\
             🔹 Напиши або перешли з групи текст/фото, з якого ти хочеш зробити цитату.\n\
             🔹 Введи <b>/q</b> для демонстрації роботи бота\n\
             🔹 <b>/help</b> - довідка.\n\
             🔹 <b>/settings</b> - налаштування.\n"
        }
        Key::Help => {
            "📚 <b>Довідка:</b>\n\n\
             1. Для створення цитати просто напиши її в бота або перешли з групи текст/фото.\n\
             2. <b>Команди:</b>\n   \
             /q - Демонстрація роботи\n   \
             /theme (/t) - Змінити тему\n   \
             /lang (/l) - Змінити мову\n   \
             /cancel (/c) - Скасувати створення цитати\n   \
             /info (/i) - Інформація про бота\n   \
             /settings (/s) - Налаштування\n"
        }
        Key::Info => {
            "🌊 <b>Quotesmith - створюю круті цитати! 💬</b>\n\n\
             🔹 Цей бот зроблений для створення красивих цитат, які містять текст і/або фото. \
             Можна змінювати саму цитату, фон, аватарку, ім'я та колір імені.\n"
        }
        Key::SettingsHeader => {
            "⚙ <b>Налаштування:</b>\n\nТут ти можеш змінити параметри за замовчуванням."
        }
        Key::BtnSettingsLang => "🌍 Мова / Language",
        Key::BtnSettingsTheme => "🌗 Тема (Фон цитати)",
        Key::BtnSettingsDefColor => "🎨 Колір імені",
        Key::BtnSettingsHelp => "📚 Довідка",
        Key::BtnSettingsInfo => "ℹ Інфо",
        Key::BtnBack => "⬅️ Назад",
        Key::ThemeSelectHeader => "🌗 Обери тему(фон) для стікера:",
        Key::ThemeDark => "🌚 Темна",
        Key::ThemeLight => "☀️ Світла",
        Key::ThemeDarkShort => "🌑",
        Key::ThemeLightShort => "☀",
        Key::DefColorHeader => "🎨 Обери колір імені, який буде ставитись автоматично:",
        Key::DefColorAuto => "🎲 Автоматично (Рандом)",
        Key::ToastLangChanged => "✅ Мову змінено!",
        Key::ToastThemeChanged => "✅ Тему змінено!",
        Key::ToastColorChanged => "✅ Дефолтний колір змінено!",
        Key::ToastCanceled => "✅ Редагування скасовано",
        Key::ToastGenerating => "🎨 Створюю стікер...",
        Key::ToastAutoColor => "🎲 Встановлено авто-колір!",
        Key::MsgQuoteCanceled => "✅ Створення цитати cкасовано",
        Key::ErrorNothingToCancel => "ℹ️ Немає активної цитати для скасування.",
        Key::BtnCreate => "✅ Створити стікер",
        Key::BtnEditName => "✏ Ім'я",
        Key::BtnEditText => "📝 Цитата",
        Key::BtnEditAvatar => "🖼 Ава",
        Key::BtnEditColor => "🎨 Колір",
        Key::BtnCancelAll => "❌ Закрити",
        Key::BtnCancelAction => "❌ Скасувати",
        Key::BtnClose => "❌ Закрити",
        Key::BtnAutoColor => "🎲 Авто",
        Key::AskText => "📝 Надішли новий <b>текст</b>:",
        Key::AskName => "👤 Введи нове <b>ім'я</b>:",
        Key::AskAvatar => "📸 Надішли <b>фото</b> або файл:",
        Key::AskColor => "🎨 Обери колір:",
        Key::ErrorNoText => "⚠️ Це не текст.",
        Key::ErrorNameWrongType => {
            "⚠️ <b>Помилка:</b> Для зміни імені потрібно надіслати текст, а не фото чи файл.\n\n\
             💡 Якщо хочеш скасувати створення цитати, введи команду <b>/cancel</b> (або <b>/c</b>)"
        }
        Key::ErrorAvatarWrongType => {
            "⚠️ <b>Помилка:</b> Для зміни аватарки потрібно надіслати фото, а не текст чи інший файл.\n\n\
             💡 Якщо хочеш скасувати створення цитати, введи команду <b>/cancel</b> (або <b>/c</b>)"
        }
        Key::ErrorMenuDeleted => {
            "⚠️ <b>Помилка:</b> Схоже, ти видалив інлайн меню редактора.\n\n\
             💡 Якщо хочеш скасувати створення поточної цитати, введи команду <b>/cancel</b> (або <b>/c</b>)"
        }
        Key::ErrorColorMenuDeleted => {
            "⚠️ <b>Помилка:</b> Схоже, ти видалив меню вибору кольору.\n\n\
             💡 Якщо хочеш скасувати створення поточної цитати, введи команду <b>/cancel</b> (або <b>/c</b>)"
        }
        Key::LblAvatar => "Аватарка",
        Key::AvaCustom => "Власна",
        Key::TagPhoto => "[Фото]",
        Key::DemoText => {
            "Це демонстраційна цитата! Надішли мені будь-який текст/фото, щоб створити власну 😎"
        }
        Key::RenderFailed => "⚠️ Не вдалося створити стікер. Спробуй ще раз.",
    }
}

fn en(key: Key) -> &'static str {
    match key {
        Key::Welcome => {
            "👋 <b>Hello!</b>\n\
             🔹 Write here or forward text/photo to turn it into a sticker.\n\
             🔹 Type <b>/q</b> to demo the bot\n\
             🔹 <b>/help</b> - help.\n\
             🔹 <b>/settings</b> - settings.\n"
        }
        Key::Help => {
            "📚 <b>Help:</b>\n\n\
             1. To create a quote, just write it to the bot or forward text/photo.\n\
             2. <b>Commands:</b>\n   \
             /q - Demo Quote\n   \
             /theme (/t) - Change theme\n   \
             /lang (/l) - Change language\n   \
             /cancel (/c) - Cancel quote creation\n   \
             /info (/i) - Bot Info\n   \
             /settings (/s) - Settings\n"
        }
        Key::Info => {
            "🌊 <b>Quotesmith - I create cool quotes! 💬</b>\n\n\
             🔹 This bot is made to create beautiful quotes that contain text and/or photos. \
             You can change the quote itself, the background, the avatar, the name and the name color.\n"
        }
        Key::SettingsHeader => "⚙ <b>Settings:</b>\n\nCustomize your defaults here.",
        Key::BtnSettingsLang => "🌍 Language / Мова",
        Key::BtnSettingsTheme => "🌗 Theme (Quote Background)",
        Key::BtnSettingsDefColor => "🎨 Name Color",
        Key::BtnSettingsHelp => "📚 Bot Help",
        Key::BtnSettingsInfo => "ℹ Info",
        Key::BtnBack => "⬅️ Back",
        Key::ThemeSelectHeader => "🌗 Choose sticker theme (background):",
        Key::ThemeDark => "🌑 Dark",
        Key::ThemeLight => "☀️ Light",
        Key::ThemeDarkShort => "🌑",
        Key::ThemeLightShort => "☀️",
        Key::DefColorHeader => "🎨 Choose automatic name color:",
        Key::DefColorAuto => "🎲 Automatic (Random)",
        Key::ToastLangChanged => "✅ Language changed!",
        Key::ToastThemeChanged => "✅ Theme changed!",
        Key::ToastColorChanged => "✅ Default color changed!",
        Key::ToastCanceled => "✅ Edit canceled",
        Key::ToastGenerating => "🎨 Creating sticker...",
        Key::ToastAutoColor => "🎲 Auto color set!",
        Key::MsgQuoteCanceled => "✅ Quote creation canceled",
        Key::ErrorNothingToCancel => "ℹ️ No active quote to cancel.",
        Key::BtnCreate => "✅ Create Sticker",
        Key::BtnEditName => "✏ Name",
        Key::BtnEditText => "📝 Quote",
        Key::BtnEditAvatar => "🖼 Avatar",
        Key::BtnEditColor => "🎨 Color",
        Key::BtnCancelAll => "❌ Close",
        Key::BtnCancelAction => "❌ Cancel",
        Key::BtnClose => "❌ Close",
        Key::BtnAutoColor => "🎲 Auto",
        Key::AskText => "📝 Send new <b>text</b>:",
        Key::AskName => "👤 Enter new <b>name</b>:",
        Key::AskAvatar => "📸 Send <b>photo</b> or file:",
        Key::AskColor => "🎨 Pick a color:",
        Key::ErrorNoText => "⚠️ Not a text.",
        Key::ErrorNameWrongType => {
            "⚠️ <b>Error:</b> To change the name, you need to send text, not a photo or file.\n\n\
             💡 If you want to cancel quote creation, type <b>/cancel</b> (or <b>/c</b>)"
        }
        Key::ErrorAvatarWrongType => {
            "⚠️ <b>Error:</b> To change the avatar, you need to send a photo, not text or another file.\n\n\
             💡 If you want to cancel quote creation, type <b>/cancel</b> (or <b>/c</b>)"
        }
        Key::ErrorMenuDeleted => {
            "⚠️ <b>Error:</b> It seems you deleted the inline editor menu.\n\n\
             💡 If you want to cancel current quote creation, type <b>/cancel</b> (or <b>/c</b>)"
        }
        Key::ErrorColorMenuDeleted => {
            "⚠️ <b>Error:</b> It seems you deleted the color selection menu.\n\n\
             💡 If you want to cancel current quote creation, type <b>/cancel</b> (or <b>/c</b>)"
        }
        Key::LblAvatar => "Avatar",
        Key::AvaCustom => "Custom",
        Key::TagPhoto => "[Photo]",
        Key::DemoText => "This is a demo quote! Send me any text/photo to create your own. 😎",
        Key::RenderFailed => "⚠️ Could not create the sticker. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_code_falls_back_to_ukrainian() {
        assert_eq!(Lang::from_code("de"), Lang::Ua);
        assert_eq!(Lang::from_code(""), Lang::Ua);
    }

    #[test]
    fn test_codes_roundtrip() {
        for lang in Lang::ALL {
            assert_eq!(Lang::from_code(lang.code()), lang);
        }
    }

    #[test]
    fn test_every_key_resolves_in_both_languages() {
        for key in [
            Key::Welcome,
            Key::Help,
            Key::Info,
            Key::ErrorMenuDeleted,
            Key::DemoText,
            Key::RenderFailed,
        ] {
            assert!(!text(Lang::Ua, key).is_empty());
            assert!(!text(Lang::En, key).is_empty());
        }
    }

    #[test]
    fn test_menu_header_interpolates_fields() {
        let header = menu_header(&MenuHeader {
            lang: Lang::En,
            theme_label: "🌑",
            text_preview: "hello",
            author_name: "Alice",
            color_label: "❤️ Red",
            avatar_line: "",
        });
        assert!(header.contains("hello"));
        assert!(header.contains("Alice"));
        assert!(header.contains("❤️ Red"));
    }

    #[test]
    fn test_color_names_cover_all_keys() {
        for key in ColorKey::MENU {
            assert!(!color_name(Lang::Ua, key).is_empty());
            assert!(!color_name(Lang::En, key).is_empty());
        }
        assert!(color_name(Lang::En, ColorKey::Gold).contains("Gold"));
    }
}
