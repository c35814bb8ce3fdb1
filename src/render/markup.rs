//! Bubble markup assembly
//!
//! Builds the HTML handed to the rasterizer: avatar circle next to a
//! rounded bubble with the name label, optional inline photo and the quote
//! text. Layout numbers come from [`crate::layout`]; the template itself is
//! compiled once per pipeline.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tera::{Context, Tera};

use crate::error::Result;
use crate::layout;
use crate::state::{Composition, Theme};

/// Name the bubble template is registered under. The `.html` suffix keeps
/// tera's autoescaping on for the user-supplied name and text.
pub const TEMPLATE_NAME: &str = "bubble.html";

const TEMPLATE: &str = include_str!("bubble.html");

/// Compile the template set for the pipeline.
pub fn templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
    Ok(tera)
}

/// Template context for one composition.
pub fn bubble_context(composition: &Composition, theme: Theme) -> Context {
    let (bubble_bg, text_color) = theme.colors();
    let accent = composition.color.resolve();

    // Lengths are in characters so non-ASCII quotes band the same way.
    let text_len = composition.quote_text.chars().count();
    let name_len = composition.author_name.chars().count();
    let (name_size, text_size) = layout::font_sizes(text_len, name_len);
    let bubble_max_width = layout::bubble_width(text_len, name_len);

    let (avatar_bg, avatar_text) = match &composition.avatar {
        Some(bytes) => (
            format!("url('data:image/jpeg;base64,{}')", BASE64.encode(bytes)),
            String::new(),
        ),
        None => (accent.to_string(), fallback_glyph(&composition.author_name)),
    };

    let mut context = Context::new();
    context.insert("avatar_bg", &avatar_bg);
    context.insert("fallback_color", accent);
    context.insert("avatar_text", &avatar_text);
    context.insert("bubble_bg", bubble_bg);
    context.insert("text_color", text_color);
    context.insert("name_color", accent);
    context.insert("name_size", &name_size);
    context.insert("text_size", &text_size);
    context.insert("name", &composition.author_name);
    context.insert("text", &composition.quote_text);
    context.insert("bubble_max_width", &bubble_max_width);
    context.insert(
        "content_image",
        &composition.content_image.as_ref().map(|bytes| BASE64.encode(bytes)),
    );
    context
}

/// First character of the name, uppercased; `?` when the name is empty.
fn fallback_glyph(name: &str) -> String {
    match name.chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorKey, ColorSelector};
    use crate::state::EditPhase;

    fn composition(text: &str, name: &str) -> Composition {
        Composition {
            quote_text: text.to_string(),
            author_name: name.to_string(),
            color: ColorSelector::Named(ColorKey::Blue),
            avatar: None,
            custom_avatar: false,
            content_image: None,
            origin_seed: 1,
            editor_message: None,
            phase: EditPhase::Menu,
        }
    }

    fn render(composition: &Composition, theme: Theme) -> String {
        templates()
            .unwrap()
            .render(TEMPLATE_NAME, &bubble_context(composition, theme))
            .unwrap()
    }

    #[test]
    fn test_glyph_fallback_uses_first_char_uppercased() {
        assert_eq!(fallback_glyph("alice"), "A");
        assert_eq!(fallback_glyph("Ørjan"), "Ø");
        assert_eq!(fallback_glyph("котик"), "К");
        assert_eq!(fallback_glyph(""), "?");
    }

    #[test]
    fn test_markup_contains_accent_and_glyph_without_avatar() {
        let html = render(&composition("hello", "alice"), Theme::Dark);
        assert!(html.contains("#55a6f0"), "accent color missing");
        assert!(html.contains(">A</div>"), "fallback glyph missing");
        assert!(html.contains("#212121"), "dark bubble background missing");
    }

    #[test]
    fn test_markup_embeds_avatar_as_data_url() {
        let mut c = composition("hello", "alice");
        c.avatar = Some(vec![0xFF, 0xD8, 0xFF]);
        let html = render(&c, Theme::Dark);
        assert!(html.contains("url('data:image/jpeg;base64,"));
        // Glyph is suppressed when a photo fills the circle.
        assert!(html.contains(r#"<div class="avatar"></div>"#));
    }

    #[test]
    fn test_markup_light_theme_colors() {
        let html = render(&composition("hello", "alice"), Theme::Light);
        assert!(html.contains("background-color: #ffffff"));
        assert!(html.contains("color: #000000"));
    }

    #[test]
    fn test_markup_escapes_user_html() {
        let html = render(&composition("<script>alert(1)</script>", "<b>x</b>"), Theme::Dark);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_markup_inline_image_block_is_conditional() {
        let plain = render(&composition("hello", "alice"), Theme::Dark);
        assert!(!plain.contains("content-image\" /"));

        let mut c = composition("hello", "alice");
        c.content_image = Some(vec![1, 2, 3]);
        let with_image = render(&c, Theme::Dark);
        assert!(with_image.contains(r#"class="content-image""#));
    }

    #[test]
    fn test_markup_band_values_flow_into_css() {
        let html = render(&composition("Hi", "Al"), Theme::Dark);
        assert!(html.contains("font-size: 46px"));
        assert!(html.contains("font-size: 42px"));
        assert!(html.contains("max-width: 250px"));
    }
}
