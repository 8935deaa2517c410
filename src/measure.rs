//! Height Estimator.
//!
//! Pure functions giving the exact vertical space each block type occupies.
//! Renderers lay their content out with the same constants, and the composer
//! checks every rendered height against these figures.

use crate::style::*;

fn rows(count: usize, per_row: usize) -> usize {
    count.div_ceil(per_row)
}

pub fn header_height() -> f32 {
    HEADER_HEIGHT
}

pub fn summary_height() -> f32 {
    SUMMARY_HEIGHT
}

pub fn footer_height() -> f32 {
    FOOTER_BLOCK_HEIGHT
}

/// Room card: title bar plus checklist rows, optional before/after pair and
/// optional damage list. Empty sub-blocks take no space.
pub fn room_card_height(item_count: usize, has_photo_pair: bool, damage_count: usize) -> f32 {
    let mut height = ROOM_BASE_HEIGHT + rows(item_count, ITEM_COLUMNS) as f32 * ITEM_ROW_HEIGHT;
    if has_photo_pair {
        height += PHOTO_PAIR_HEIGHT;
    }
    if damage_count > 0 {
        height += damage_block_height(damage_count);
    }
    height
}

pub fn damage_block_height(damage_count: usize) -> f32 {
    DAMAGE_HEADER_HEIGHT + damage_count as f32 * DAMAGE_ROW_HEIGHT
}

pub fn grid_row_pitch() -> f32 {
    GRID_PHOTO_HEIGHT + GRID_ROW_GAP
}

pub fn photo_grid_height(photo_count: usize) -> f32 {
    SECTION_HEADER_HEIGHT + rows(photo_count, GRID_COLUMNS) as f32 * grid_row_pitch()
}

/// Rows shown in the inventory block: the taller of the two capped panels,
/// at least one so an empty panel can say so.
pub fn inventory_rows(outgoing: usize, low_stock: usize) -> usize {
    outgoing
        .min(INVENTORY_MAX_ROWS)
        .max(low_stock.min(INVENTORY_MAX_ROWS))
        .max(1)
}

pub fn inventory_height(outgoing: usize, low_stock: usize) -> f32 {
    SECTION_HEADER_HEIGHT
        + INVENTORY_PANEL_TITLE
        + inventory_rows(outgoing, low_stock) as f32 * INVENTORY_ROW_HEIGHT
        + BLOCK_GAP
}

pub fn lost_found_height(count: usize) -> f32 {
    SECTION_HEADER_HEIGHT + count as f32 * LOST_FOUND_ROW_HEIGHT + BLOCK_GAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_room_card_is_base_header_only() {
        assert_eq!(room_card_height(0, false, 0), ROOM_BASE_HEIGHT);
    }

    #[test]
    fn room_card_rows_round_up() {
        assert_eq!(room_card_height(1, false, 0), ROOM_BASE_HEIGHT + ITEM_ROW_HEIGHT);
        assert_eq!(room_card_height(2, false, 0), ROOM_BASE_HEIGHT + ITEM_ROW_HEIGHT);
        assert_eq!(room_card_height(5, false, 0), ROOM_BASE_HEIGHT + 3.0 * ITEM_ROW_HEIGHT);
    }

    #[test]
    fn room_card_optional_parts() {
        let base = room_card_height(4, false, 0);
        assert_eq!(room_card_height(4, true, 0), base + PHOTO_PAIR_HEIGHT);
        assert_eq!(
            room_card_height(4, false, 2),
            base + DAMAGE_HEADER_HEIGHT + 2.0 * DAMAGE_ROW_HEIGHT
        );
    }

    #[test]
    fn photo_grid_rows() {
        assert_eq!(photo_grid_height(0), SECTION_HEADER_HEIGHT);
        assert_eq!(photo_grid_height(3), SECTION_HEADER_HEIGHT + grid_row_pitch());
        assert_eq!(photo_grid_height(4), SECTION_HEADER_HEIGHT + 2.0 * grid_row_pitch());
    }

    #[test]
    fn inventory_is_capped() {
        assert_eq!(inventory_rows(0, 0), 1);
        assert_eq!(inventory_rows(3, 5), 5);
        assert_eq!(inventory_rows(40, 2), INVENTORY_MAX_ROWS);
        assert_eq!(inventory_height(40, 40), inventory_height(8, 8));
    }

    #[test]
    fn fixed_blocks_fit_a_page() {
        for h in [header_height(), summary_height(), footer_height()] {
            assert!(h < CONTENT_HEIGHT);
        }
        assert!(header_height() + summary_height() + footer_height() < CONTENT_HEIGHT);
    }
}
