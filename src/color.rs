//! Accent color palette and selector resolution
//!
//! Names (and the avatar fill when no photo is set) are tinted from a fixed
//! seven-entry palette. A color is chosen either by an explicit key from the
//! color menu, or derived automatically from the numeric identity of whoever
//! authored the quoted message, so the same author always lands on the same
//! color.

/// The fixed accent palette, addressable by index 0-6.
pub const PALETTE: [&str; 7] = [
    "#f17055", // red
    "#fcae53", // orange
    "#a88bf4", // purple
    "#83cb5b", // green
    "#4cb8dd", // cyan
    "#55a6f0", // blue
    "#f3799a", // pink
];

/// A named palette entry.
///
/// `Gold` is an alias kept for backwards compatibility with older saved
/// defaults; it maps onto the orange slot and is hidden from the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKey {
    Red,
    Orange,
    Purple,
    Green,
    Cyan,
    Blue,
    Pink,
    Gold,
}

impl ColorKey {
    /// Keys shown in the color picker, in menu order. `Gold` is excluded.
    pub const MENU: [ColorKey; 7] = [
        ColorKey::Red,
        ColorKey::Orange,
        ColorKey::Purple,
        ColorKey::Green,
        ColorKey::Cyan,
        ColorKey::Blue,
        ColorKey::Pink,
    ];

    /// Palette index for this key.
    pub fn index(self) -> usize {
        match self {
            ColorKey::Red => 0,
            ColorKey::Orange | ColorKey::Gold => 1,
            ColorKey::Purple => 2,
            ColorKey::Green => 3,
            ColorKey::Cyan => 4,
            ColorKey::Blue => 5,
            ColorKey::Pink => 6,
        }
    }

    /// Stable identifier used in callback data and saved preferences.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorKey::Red => "red",
            ColorKey::Orange => "orange",
            ColorKey::Purple => "purple",
            ColorKey::Green => "green",
            ColorKey::Cyan => "cyan",
            ColorKey::Blue => "blue",
            ColorKey::Pink => "pink",
            ColorKey::Gold => "gold",
        }
    }

    /// Parse a key name. Unknown names resolve to the first palette entry;
    /// there is no error path by design.
    pub fn parse(name: &str) -> ColorKey {
        match name {
            "red" => ColorKey::Red,
            "orange" => ColorKey::Orange,
            "purple" => ColorKey::Purple,
            "green" => ColorKey::Green,
            "cyan" => ColorKey::Cyan,
            "blue" => ColorKey::Blue,
            "pink" => ColorKey::Pink,
            "gold" => ColorKey::Gold,
            _ => ColorKey::Red,
        }
    }
}

/// How the accent color for a composition is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSelector {
    /// An explicit palette key picked by the user.
    Named(ColorKey),
    /// Derived from a numeric identity; stable for a given seed.
    Auto(i64),
}

impl ColorSelector {
    /// Resolve to a CSS hex color. Total: every selector maps to a palette
    /// entry.
    pub fn resolve(self) -> &'static str {
        match self {
            ColorSelector::Named(key) => PALETTE[key.index()],
            ColorSelector::Auto(seed) => {
                PALETTE[(seed.unsigned_abs() % PALETTE.len() as u64) as usize]
            }
        }
    }

    /// Whether this selector is the automatic (seed-derived) kind.
    pub fn is_auto(self) -> bool {
        matches!(self, ColorSelector::Auto(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys_resolve_to_their_slots() {
        assert_eq!(ColorSelector::Named(ColorKey::Red).resolve(), "#f17055");
        assert_eq!(ColorSelector::Named(ColorKey::Orange).resolve(), "#fcae53");
        assert_eq!(ColorSelector::Named(ColorKey::Purple).resolve(), "#a88bf4");
        assert_eq!(ColorSelector::Named(ColorKey::Green).resolve(), "#83cb5b");
        assert_eq!(ColorSelector::Named(ColorKey::Cyan).resolve(), "#4cb8dd");
        assert_eq!(ColorSelector::Named(ColorKey::Blue).resolve(), "#55a6f0");
        assert_eq!(ColorSelector::Named(ColorKey::Pink).resolve(), "#f3799a");
    }

    #[test]
    fn test_gold_aliases_orange() {
        assert_eq!(
            ColorSelector::Named(ColorKey::Gold).resolve(),
            ColorSelector::Named(ColorKey::Orange).resolve()
        );
    }

    #[test]
    fn test_auto_is_periodic_mod_seven() {
        for seed in [0i64, 1, 5, 123, 1_000_003, 987_654_321] {
            for k in 1..5 {
                assert_eq!(
                    ColorSelector::Auto(seed).resolve(),
                    ColorSelector::Auto(seed + 7 * k).resolve(),
                    "seed {seed} must match seed {}",
                    seed + 7 * k
                );
            }
        }
    }

    #[test]
    fn test_auto_uses_absolute_value() {
        for seed in [1i64, 6, 42, 1337] {
            assert_eq!(
                ColorSelector::Auto(seed).resolve(),
                ColorSelector::Auto(-seed).resolve()
            );
        }
    }

    #[test]
    fn test_auto_extreme_seeds_do_not_panic() {
        // i64::MIN has no positive counterpart; unsigned_abs still maps it.
        let _ = ColorSelector::Auto(i64::MIN).resolve();
        let _ = ColorSelector::Auto(i64::MAX).resolve();
    }

    #[test]
    fn test_auto_same_seed_same_color() {
        assert_eq!(
            ColorSelector::Auto(424_242).resolve(),
            ColorSelector::Auto(424_242).resolve()
        );
    }

    #[test]
    fn test_unknown_key_falls_back_to_first_entry() {
        assert_eq!(ColorKey::parse("chartreuse"), ColorKey::Red);
        assert_eq!(
            ColorSelector::Named(ColorKey::parse("")).resolve(),
            PALETTE[0]
        );
    }

    #[test]
    fn test_parse_roundtrip_for_menu_keys() {
        for key in ColorKey::MENU {
            assert_eq!(ColorKey::parse(key.as_str()), key);
        }
    }

    #[test]
    fn test_menu_has_no_gold_and_no_duplicates() {
        assert!(!ColorKey::MENU.contains(&ColorKey::Gold));
        let mut indices: Vec<usize> = ColorKey::MENU.iter().map(|k| k.index()).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 7);
    }
}
