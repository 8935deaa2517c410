//! Page geometry, palette and block dimensions.
//!
//! All coordinates in the engine are PDF points measured from the top-left
//! corner of the page. Conversion to bottom-up PDF space happens only when
//! the finished document is serialized.

// ============================================================================
// PAGE
// ============================================================================

/// A4 portrait
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const PT_TO_MM: f32 = 0.352_777_78;

pub const MARGIN: f32 = 36.0;
/// Band above the bottom margin kept free for the footer rule and page stamp.
pub const FOOTER_RESERVE: f32 = 28.0;

pub const CONTENT_LEFT: f32 = MARGIN;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub const CONTENT_TOP: f32 = MARGIN;
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN - FOOTER_RESERVE;
pub const CONTENT_HEIGHT: f32 = CONTENT_BOTTOM - CONTENT_TOP;

// ============================================================================
// TYPOGRAPHY
// ============================================================================

pub const TITLE_SIZE: f32 = 16.0;
pub const HEADING_SIZE: f32 = 11.0;
pub const CARD_TITLE_SIZE: f32 = 10.0;
pub const BODY_SIZE: f32 = 8.5;
pub const SMALL_SIZE: f32 = 7.0;
pub const STAT_SIZE: f32 = 14.0;
pub const BRAND_MARK_SIZE: f32 = 14.0;

// ============================================================================
// BLOCK GEOMETRY
// ============================================================================

pub const HEADER_BRAND_ROW: f32 = 34.0;
pub const HEADER_META_GAP: f32 = 8.0;
pub const HEADER_META_ROW: f32 = 14.0;
/// Client, date and job details, two per row.
pub const HEADER_META_ROWS: usize = 3;
pub const HEADER_HEIGHT: f32 = HEADER_BRAND_ROW
    + HEADER_META_GAP
    + HEADER_META_ROWS as f32 * HEADER_META_ROW
    + 2.0 * BLOCK_GAP;
pub const LOGO_MAX_WIDTH: f32 = 96.0;
pub const LOGO_MAX_HEIGHT: f32 = 28.0;

pub const SUMMARY_CELL_HEIGHT: f32 = 50.0;
pub const SUMMARY_CELL_GAP: f32 = 8.0;
pub const SUMMARY_CELLS: usize = 4;
pub const SUMMARY_HEIGHT: f32 = SUMMARY_CELL_HEIGHT + BLOCK_GAP;

/// Trailing space under every card-like block.
pub const BLOCK_GAP: f32 = 10.0;

pub const ROOM_TITLE_BAR: f32 = 20.0;
pub const ROOM_PADDING: f32 = 4.0;
pub const ROOM_BASE_HEIGHT: f32 = ROOM_TITLE_BAR + 2.0 * ROOM_PADDING + BLOCK_GAP;
pub const ROOM_INNER_INSET: f32 = 8.0;
pub const ITEM_ROW_HEIGHT: f32 = 14.0;
pub const ITEM_COLUMNS: usize = 2;
pub const CHECKBOX_SIZE: f32 = 7.0;
pub const ITEM_LABEL_MAX_CHARS: usize = 44;

pub const PHOTO_PAIR_LABEL: f32 = 12.0;
pub const PHOTO_PAIR_IMAGE: f32 = 110.0;
/// Horizontal gap between the before and after halves.
pub const PHOTO_PAIR_GAP: f32 = 10.0;
pub const PHOTO_PAIR_HEIGHT: f32 = PHOTO_PAIR_LABEL + PHOTO_PAIR_IMAGE + 2.0 * ROOM_PADDING;

pub const DAMAGE_HEADER_HEIGHT: f32 = 20.0;
pub const DAMAGE_ROW_HEIGHT: f32 = 36.0;
pub const DAMAGE_THUMB: f32 = 30.0;
pub const DAMAGE_DESC_MAX_CHARS: usize = 90;
pub const BADGE_HEIGHT: f32 = 12.0;
pub const BADGE_PADDING: f32 = 5.0;

pub const SECTION_HEADER_HEIGHT: f32 = 24.0;

pub const GRID_COLUMNS: usize = 3;
pub const GRID_COLUMN_GAP: f32 = 8.0;
pub const GRID_IMAGE_HEIGHT: f32 = 110.0;
pub const GRID_CAPTION_HEIGHT: f32 = 12.0;
/// Image plus caption.
pub const GRID_PHOTO_HEIGHT: f32 = GRID_IMAGE_HEIGHT + GRID_CAPTION_HEIGHT;
pub const GRID_ROW_GAP: f32 = 8.0;
pub const CAPTION_MAX_CHARS: usize = 30;

pub const INVENTORY_PANEL_TITLE: f32 = 14.0;
pub const INVENTORY_ROW_HEIGHT: f32 = 13.0;
pub const INVENTORY_MAX_ROWS: usize = 8;
pub const INVENTORY_PANEL_GAP: f32 = 12.0;

pub const LOST_FOUND_ROW_HEIGHT: f32 = 40.0;
pub const LOST_FOUND_THUMB: f32 = 32.0;
pub const LOST_FOUND_DESC_MAX_CHARS: usize = 70;

pub const FOOTER_LABEL_ROW: f32 = 12.0;
pub const FOOTER_NAME_ROW: f32 = 14.0;
pub const SIGNATURE_WIDTH: f32 = 200.0;
pub const SIGNATURE_HEIGHT: f32 = 52.0;
pub const FOOTER_BLOCK_HEIGHT: f32 = SECTION_HEADER_HEIGHT
    + FOOTER_LABEL_ROW
    + SIGNATURE_HEIGHT
    + FOOTER_NAME_ROW
    + BLOCK_GAP;
pub const VERIFIED_BADGE_WIDTH: f32 = 128.0;
pub const VERIFIED_BADGE_HEIGHT: f32 = 40.0;

// ============================================================================
// COLOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Components scaled to 0.0..=1.0 for the PDF colour operators.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const INK: Color = Color::rgb(31, 41, 55);
pub const MUTED: Color = Color::rgb(107, 114, 128);
pub const RULE: Color = Color::rgb(229, 231, 235);
pub const SURFACE: Color = Color::rgb(243, 244, 246);
pub const PRIMARY: Color = Color::rgb(13, 148, 136);
pub const SUCCESS: Color = Color::rgb(22, 163, 74);
pub const WARNING: Color = Color::rgb(217, 119, 6);
pub const DANGER: Color = Color::rgb(220, 38, 38);
pub const PLACEHOLDER_FILL: Color = Color::rgb(230, 230, 230);
pub const PLACEHOLDER_STROKE: Color = Color::rgb(179, 179, 179);
