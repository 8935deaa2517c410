use std::borrow::Cow;

use crate::font_metrics::FontMetrics;

const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_chars` characters, ending in an ellipsis
/// when anything was cut. Text already within the limit is returned as is.
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    let count = text.chars().count();
    if count <= max_chars {
        return Cow::Borrowed(text);
    }

    let ellipsis_len = ELLIPSIS.chars().count();
    if max_chars <= ellipsis_len {
        return Cow::Owned(text.chars().take(max_chars).collect());
    }

    let kept: String = text.chars().take(max_chars - ellipsis_len).collect();
    Cow::Owned(format!("{}{}", kept.trim_end(), ELLIPSIS))
}

/// X offset that centers `text` inside a box of `box_width`.
pub fn centered_x(text: &str, size: f32, metrics: &FontMetrics, box_width: f32) -> f32 {
    ((box_width - metrics.string_width(text, size)) / 2.0).max(0.0)
}

/// X offset that right-aligns `text` against the end of a box of `box_width`.
pub fn right_aligned_x(text: &str, size: f32, metrics: &FontMetrics, box_width: f32) -> f32 {
    (box_width - metrics.string_width(text, size)).max(0.0)
}
