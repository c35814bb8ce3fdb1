//! Bubble layout heuristics
//!
//! Font sizes and bubble width are step functions of the text and author
//! name lengths, kept as lookup tables so the bands can be eyeballed (and
//! tested) in one place. Lengths are counted in characters, not bytes, so
//! Cyrillic and emoji-heavy quotes land in the same bands as ASCII ones.

/// One font-size band. A band applies when `text_len < max_text` and
/// `name_len < max_name`.
struct FontBand {
    max_text: usize,
    max_name: usize,
    name_px: u32,
    text_px: u32,
}

/// Font-size bands, largest type first. The two top bands only apply when
/// the author name is short as well, so a long name never renders oversized
/// next to a short quote.
const FONT_BANDS: [FontBand; 7] = [
    FontBand { max_text: 10, max_name: 10, name_px: 42, text_px: 46 },
    FontBand { max_text: 20, max_name: 20, name_px: 36, text_px: 36 },
    FontBand { max_text: 40, max_name: usize::MAX, name_px: 34, text_px: 34 },
    FontBand { max_text: 80, max_name: usize::MAX, name_px: 32, text_px: 32 },
    FontBand { max_text: 120, max_name: usize::MAX, name_px: 31, text_px: 31 },
    FontBand { max_text: 180, max_name: usize::MAX, name_px: 29, text_px: 29 },
    FontBand { max_text: usize::MAX, max_name: usize::MAX, name_px: 27, text_px: 27 },
];

/// Bubble width bands keyed on `max(text_len, name_len)`.
const WIDTH_BANDS: [(usize, u32); 6] = [
    (10, 250),
    (15, 250),
    (25, 280),
    (40, 340),
    (70, 390),
    (120, 440),
];

/// Bubble width for anything longer than the last band.
const WIDTH_MAX: u32 = 480;

/// Font sizes `(name_px, text_px)` for a quote of `text_len` characters
/// with an author name of `name_len` characters.
pub fn font_sizes(text_len: usize, name_len: usize) -> (u32, u32) {
    for band in &FONT_BANDS {
        if text_len < band.max_text && name_len < band.max_name {
            return (band.name_px, band.text_px);
        }
    }
    // The last band accepts all lengths below usize::MAX.
    let last = &FONT_BANDS[FONT_BANDS.len() - 1];
    (last.name_px, last.text_px)
}

/// Maximum bubble width in logical pixels. Depends only on the longer of
/// the two lengths.
pub fn bubble_width(text_len: usize, name_len: usize) -> u32 {
    let longest = text_len.max(name_len);
    for &(limit, width) in &WIDTH_BANDS {
        if longest < limit {
            return width;
        }
    }
    WIDTH_MAX
}
