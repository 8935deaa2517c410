//! Glyph metrics for the two built-in faces the report uses.
//!
//! Widths come from the Adobe Helvetica / Helvetica-Bold AFM files and are
//! expressed in 1/1000 em. Only printable ASCII is tabulated; anything else
//! falls back to an average advance.

use std::sync::OnceLock;

const FIRST_CHAR: u32 = 0x20;
const LAST_CHAR: u32 = 0x7E;
const ASCII_GLYPHS: usize = (LAST_CHAR - FIRST_CHAR + 1) as usize;

/// Extra leading applied on top of the ascender/descender span.
const LEADING: f32 = 1.2;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; ASCII_GLYPHS] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; ASCII_GLYPHS] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[derive(Debug, Clone)]
pub struct FontMetrics {
    widths: &'static [u16; ASCII_GLYPHS],
    default_width: u16,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
}

impl FontMetrics {
    /// Advance of a character in em units
    pub fn char_width(&self, c: char) -> u16 {
        let code = c as u32;
        if (FIRST_CHAR..=LAST_CHAR).contains(&code) {
            self.widths[(code - FIRST_CHAR) as usize]
        } else {
            self.default_width
        }
    }

    /// Width of a string in points
    pub fn string_width(&self, text: &str, font_size: f32) -> f32 {
        let total_units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        (total_units as f32 / self.units_per_em as f32) * font_size
    }

    /// Distance from the top of a line box to the glyph baseline.
    pub fn baseline_offset(&self, font_size: f32) -> f32 {
        self.ascender as f32 / self.units_per_em as f32 * font_size
    }

    /// Height of one line set in this face, derived from the ascender and
    /// descender rather than a guessed multiplier.
    pub fn line_height(&self, font_size: f32) -> f32 {
        let span = (self.ascender - self.descender) as f32 / self.units_per_em as f32;
        span * font_size * LEADING
    }
}

static HELVETICA: OnceLock<FontMetrics> = OnceLock::new();
static HELVETICA_BOLD: OnceLock<FontMetrics> = OnceLock::new();

pub fn helvetica() -> &'static FontMetrics {
    HELVETICA.get_or_init(|| FontMetrics {
        widths: &HELVETICA_WIDTHS,
        default_width: 556,
        units_per_em: 1000,
        ascender: 718,
        descender: -207,
    })
}

pub fn helvetica_bold() -> &'static FontMetrics {
    HELVETICA_BOLD.get_or_init(|| FontMetrics {
        widths: &HELVETICA_BOLD_WIDTHS,
        default_width: 611,
        units_per_em: 1000,
        ascender: 718,
        descender: -207,
    })
}
