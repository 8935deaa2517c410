//! Semantic blocks of a report, in document order.
//!
//! `build_blocks` turns a `ReportData` into an immutable list of blocks. Each
//! block knows its height (`measure`) and how to draw itself (`render`); the
//! composer only moves them onto pages.

use std::fmt;

use crate::canvas::Frame;
use crate::measure;
use crate::render::{self, RenderContext};
use crate::report::{
    DamageRecord, ImagePayload, Item, LostFoundItem, LowStockEntry, OutgoingEntry, ReportData,
    SummaryStats,
};
use crate::style::{CONTENT_HEIGHT, GRID_COLUMNS, ITEM_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Header,
    Summary,
    RoomCard,
    PhotoGrid,
    Inventory,
    LostFound,
    Footer,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Header => "header",
            BlockKind::Summary => "summary",
            BlockKind::RoomCard => "room card",
            BlockKind::PhotoGrid => "photo grid",
            BlockKind::Inventory => "inventory",
            BlockKind::LostFound => "lost and found",
            BlockKind::Footer => "footer",
        };
        f.write_str(name)
    }
}

// ============================================================================
// BLOCK CONTENT
// ============================================================================

#[derive(Debug, Clone)]
pub struct HeaderBlock<'r> {
    pub report: &'r ReportData,
}

#[derive(Debug, Clone)]
pub struct SummaryBlock {
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, Copy)]
pub struct PhotoPair<'r> {
    pub before: Option<&'r ImagePayload>,
    pub after: Option<&'r ImagePayload>,
}

#[derive(Debug, Clone)]
pub struct RoomCardBlock<'r> {
    pub title: String,
    pub continued: bool,
    /// Progress of the whole section, not just this part.
    pub completed: usize,
    pub total: usize,
    pub items: &'r [Item],
    pub photos: Option<PhotoPair<'r>>,
    pub damages: Vec<&'r DamageRecord>,
}

impl RoomCardBlock<'_> {
    fn is_empty(&self) -> bool {
        self.items.is_empty() && self.photos.is_none() && self.damages.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct GridPhoto<'r> {
    pub caption: String,
    pub payload: &'r ImagePayload,
}

#[derive(Debug, Clone)]
pub struct PhotoGridBlock<'r> {
    pub photos: Vec<GridPhoto<'r>>,
    pub total: usize,
    pub continued: bool,
}

#[derive(Debug, Clone)]
pub struct InventoryBlock {
    pub outgoing: Vec<OutgoingEntry>,
    pub low_stock: Vec<LowStockEntry>,
}

#[derive(Debug, Clone)]
pub struct LostFoundBlock<'r> {
    pub items: &'r [LostFoundItem],
    pub total: usize,
    pub continued: bool,
}

#[derive(Debug, Clone)]
pub struct FooterBlock<'r> {
    pub report: &'r ReportData,
}

#[derive(Debug, Clone)]
pub enum LayoutBlock<'r> {
    Header(HeaderBlock<'r>),
    Summary(SummaryBlock),
    RoomCard(RoomCardBlock<'r>),
    PhotoGrid(PhotoGridBlock<'r>),
    Inventory(InventoryBlock),
    LostFound(LostFoundBlock<'r>),
    Footer(FooterBlock<'r>),
}

impl<'r> LayoutBlock<'r> {
    pub fn kind(&self) -> BlockKind {
        match self {
            LayoutBlock::Header(_) => BlockKind::Header,
            LayoutBlock::Summary(_) => BlockKind::Summary,
            LayoutBlock::RoomCard(_) => BlockKind::RoomCard,
            LayoutBlock::PhotoGrid(_) => BlockKind::PhotoGrid,
            LayoutBlock::Inventory(_) => BlockKind::Inventory,
            LayoutBlock::LostFound(_) => BlockKind::LostFound,
            LayoutBlock::Footer(_) => BlockKind::Footer,
        }
    }

    pub fn measure(&self) -> f32 {
        match self {
            LayoutBlock::Header(_) => measure::header_height(),
            LayoutBlock::Summary(_) => measure::summary_height(),
            LayoutBlock::RoomCard(card) => measure::room_card_height(
                card.items.len(),
                card.photos.is_some(),
                card.damages.len(),
            ),
            LayoutBlock::PhotoGrid(grid) => measure::photo_grid_height(grid.photos.len()),
            LayoutBlock::Inventory(inv) => {
                measure::inventory_height(inv.outgoing.len(), inv.low_stock.len())
            }
            LayoutBlock::LostFound(lf) => measure::lost_found_height(lf.items.len()),
            LayoutBlock::Footer(_) => measure::footer_height(),
        }
    }

    /// Draw at the frame origin; returns the height actually used.
    pub fn render(&self, frame: &mut Frame<'_>, ctx: &mut RenderContext<'_>) -> f32 {
        match self {
            LayoutBlock::Header(b) => render::header(b, frame, ctx),
            LayoutBlock::Summary(b) => render::summary(b, frame),
            LayoutBlock::RoomCard(b) => render::room_card(b, frame, ctx),
            LayoutBlock::PhotoGrid(b) => render::photo_grid(b, frame, ctx),
            LayoutBlock::Inventory(b) => render::inventory(b, frame),
            LayoutBlock::LostFound(b) => render::lost_found(b, frame, ctx),
            LayoutBlock::Footer(b) => render::footer(b, frame, ctx),
        }
    }
}

// ============================================================================
// BUILD
// ============================================================================

/// Ordered block list: header, summary, one card per section, photo grid,
/// inventory, lost and found, footer. Content too tall for one page is split
/// into continuation blocks.
pub fn build_blocks(report: &ReportData) -> Vec<LayoutBlock<'_>> {
    let mut blocks = vec![
        LayoutBlock::Header(HeaderBlock { report }),
        LayoutBlock::Summary(SummaryBlock {
            stats: report.summary(),
        }),
    ];

    let damages = report.damages_by_section();
    for (index, section) in report.sections.iter().enumerate() {
        let before = report.before_photo(index);
        let after = report.after_photo(index);
        let photos = (before.is_some() || after.is_some()).then_some(PhotoPair { before, after });
        let card = RoomCardBlock {
            title: section.title.clone(),
            continued: false,
            completed: section.completed_count(),
            total: section.items.len(),
            items: &section.items,
            photos,
            damages: damages[index].clone(),
        };
        blocks.extend(split_room_card(card).into_iter().map(LayoutBlock::RoomCard));
    }

    let photos = collect_grid_photos(report);
    if !photos.is_empty() {
        blocks.extend(split_photo_grid(photos).into_iter().map(LayoutBlock::PhotoGrid));
    }

    if !report.inventory.is_empty() || !report.inventory_usage.is_empty() {
        blocks.push(LayoutBlock::Inventory(InventoryBlock {
            outgoing: report.outgoing(),
            low_stock: report.low_stock(),
        }));
    }

    if !report.lost_found.is_empty() {
        blocks.extend(split_lost_found(&report.lost_found).into_iter().map(LayoutBlock::LostFound));
    }

    blocks.push(LayoutBlock::Footer(FooterBlock { report }));
    blocks
}

/// Every photo shown in the aggregate grid, in section order: before, after,
/// extra room photos, then task photos.
pub fn collect_grid_photos(report: &ReportData) -> Vec<GridPhoto<'_>> {
    let mut photos = Vec::new();
    for (index, section) in report.sections.iter().enumerate() {
        if let Some(payload) = report.before_photo(index) {
            photos.push(GridPhoto {
                caption: format!("Before - {}", section.title),
                payload,
            });
        }
        if let Some(payload) = report.after_photo(index) {
            photos.push(GridPhoto {
                caption: format!("After - {}", section.title),
                payload,
            });
        }
        for (n, payload) in section.photos.iter().enumerate() {
            photos.push(GridPhoto {
                caption: format!("{} #{}", section.title, n + 1),
                payload,
            });
        }
        for item in &section.items {
            if let Some(payload) = &item.photo_url {
                photos.push(GridPhoto {
                    caption: item.label.clone(),
                    payload,
                });
            }
        }
    }
    photos
}

fn fits(card: &RoomCardBlock<'_>) -> bool {
    measure::room_card_height(card.items.len(), card.photos.is_some(), card.damages.len())
        <= CONTENT_HEIGHT
}

/// Greedy split of a room card: checklist rows first, then the photo pair,
/// then damage rows. Each part stays within one content area.
fn split_room_card(card: RoomCardBlock<'_>) -> Vec<RoomCardBlock<'_>> {
    if fits(&card) {
        return vec![card];
    }

    let RoomCardBlock {
        title,
        completed,
        total,
        items,
        photos,
        damages,
        ..
    } = card;

    let empty = |continued: bool| RoomCardBlock {
        title: title.clone(),
        continued,
        completed,
        total,
        items: &[],
        photos: None,
        damages: Vec::new(),
    };

    let mut parts = Vec::new();
    let mut current = empty(false);
    let mut start = 0;

    while start < items.len() {
        let end = (start + current.items.len() + ITEM_COLUMNS).min(items.len());
        let candidate_items = &items[start..end];
        let candidate = RoomCardBlock {
            items: candidate_items,
            ..current.clone()
        };
        if fits(&candidate) {
            current = candidate;
            if end == items.len() {
                start = end;
            }
        } else {
            start += current.items.len();
            parts.push(current);
            current = empty(true);
        }
    }

    if let Some(pair) = photos {
        let candidate = RoomCardBlock {
            photos: Some(pair),
            ..current.clone()
        };
        if fits(&candidate) {
            current = candidate;
        } else {
            parts.push(current);
            current = RoomCardBlock {
                photos: Some(pair),
                ..empty(true)
            };
        }
    }

    for damage in damages {
        let mut candidate = current.clone();
        candidate.damages.push(damage);
        if fits(&candidate) {
            current = candidate;
        } else {
            if !current.is_empty() {
                parts.push(current);
            }
            current = empty(true);
            current.damages.push(damage);
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn split_photo_grid(photos: Vec<GridPhoto<'_>>) -> Vec<PhotoGridBlock<'_>> {
    let total = photos.len();
    let rows_per_block = (((CONTENT_HEIGHT - measure::photo_grid_height(0))
        / measure::grid_row_pitch())
    .floor() as usize)
        .max(1);
    let per_block = rows_per_block * GRID_COLUMNS;

    photos
        .chunks(per_block)
        .enumerate()
        .map(|(index, chunk)| PhotoGridBlock {
            photos: chunk.to_vec(),
            total,
            continued: index > 0,
        })
        .collect()
}

fn split_lost_found(items: &[LostFoundItem]) -> Vec<LostFoundBlock<'_>> {
    let per_block = (((CONTENT_HEIGHT - measure::lost_found_height(0))
        / crate::style::LOST_FOUND_ROW_HEIGHT)
        .floor() as usize)
        .max(1);

    items
        .chunks(per_block)
        .enumerate()
        .map(|(index, chunk)| LostFoundBlock {
            items: chunk,
            total: items.len(),
            continued: index > 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_embed::samples;
    use crate::report::fixtures::*;
    use crate::report::Severity;
    use pretty_assertions::assert_eq;

    fn kinds(blocks: &[LayoutBlock<'_>]) -> Vec<BlockKind> {
        blocks.iter().map(LayoutBlock::kind).collect()
    }

    #[test]
    fn minimal_report_block_order() {
        let r = report(vec![section("Kitchen", 5, 2)]);
        let blocks = build_blocks(&r);
        assert_eq!(
            kinds(&blocks),
            vec![BlockKind::Header, BlockKind::Summary, BlockKind::RoomCard, BlockKind::Footer]
        );
    }

    #[test]
    fn optional_blocks_follow_rooms_in_order() {
        let mut r = report(vec![section("Kitchen", 2, 0), section("Bath", 2, 0)]);
        r.before_photos = vec![Some(samples::png()), None];
        r.inventory = vec![stock("spray", 5.0, 2.0)];
        r.lost_found = vec![LostFoundItem {
            description: "Earring".into(),
            location: "Bath sink".into(),
            photo: None,
            date: r.date,
        }];
        let blocks = build_blocks(&r);
        assert_eq!(
            kinds(&blocks),
            vec![
                BlockKind::Header,
                BlockKind::Summary,
                BlockKind::RoomCard,
                BlockKind::RoomCard,
                BlockKind::PhotoGrid,
                BlockKind::Inventory,
                BlockKind::LostFound,
                BlockKind::Footer,
            ]
        );
        match &blocks[2] {
            LayoutBlock::RoomCard(card) => assert!(card.photos.is_some()),
            _ => unreachable!(),
        }
        match &blocks[3] {
            LayoutBlock::RoomCard(card) => assert!(card.photos.is_none()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn grid_collects_every_room_photo_with_captions() {
        let mut r = report(vec![section("Kitchen", 2, 0)]);
        r.before_photos = vec![Some(samples::png())];
        r.after_photos = vec![Some(samples::jpeg())];
        r.sections[0].photos = vec![samples::png()];
        r.sections[0].items[1].photo_url = Some(samples::png());
        let captions: Vec<String> = collect_grid_photos(&r).into_iter().map(|p| p.caption).collect();
        assert_eq!(
            captions,
            vec!["Before - Kitchen", "After - Kitchen", "Kitchen #1", "Kitchen task 2"]
        );
    }

    #[test]
    fn damages_are_attached_to_matching_cards() {
        let mut r = report(vec![section("Kitchen", 1, 0), section("Living Room", 1, 0)]);
        r.damages = vec![damage("Red wine on living room sofa", Severity::High)];
        let blocks = build_blocks(&r);
        let cards: Vec<&RoomCardBlock<'_>> = blocks
            .iter()
            .filter_map(|b| match b {
                LayoutBlock::RoomCard(c) => Some(c),
                _ => None,
            })
            .collect();
        assert!(cards[0].damages.is_empty());
        assert_eq!(cards[1].damages.len(), 1);
    }

    #[test]
    fn oversized_room_card_is_split_without_losing_content() {
        let mut r = report(vec![section("Warehouse", 140, 70)]);
        r.before_photos = vec![Some(samples::png())];
        r.damages = (0..30).map(|i| damage(&format!("warehouse dent {}", i), Severity::Low)).collect();
        let blocks = build_blocks(&r);
        let cards: Vec<&RoomCardBlock<'_>> = blocks
            .iter()
            .filter_map(|b| match b {
                LayoutBlock::RoomCard(c) => Some(c),
                _ => None,
            })
            .collect();

        assert!(cards.len() > 1);
        assert!(!cards[0].continued);
        assert!(cards[1..].iter().all(|c| c.continued));
        assert_eq!(cards.iter().map(|c| c.items.len()).sum::<usize>(), 140);
        assert_eq!(cards.iter().filter(|c| c.photos.is_some()).count(), 1);
        assert_eq!(cards.iter().map(|c| c.damages.len()).sum::<usize>(), 30);
        for card in &cards {
            assert!(card.total == 140 && card.completed == 70);
        }
        for block in &blocks {
            assert!(block.measure() <= CONTENT_HEIGHT);
        }
    }

    #[test]
    fn split_keeps_item_order() {
        let r = report(vec![section("Hall", 121, 0)]);
        let blocks = build_blocks(&r);
        let labels: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                LayoutBlock::RoomCard(c) => Some(c.items),
                _ => None,
            })
            .flatten()
            .map(|i| i.label.as_str())
            .collect();
        let expected: Vec<String> = (1..=121).map(|i| format!("Hall task {}", i)).collect();
        assert_eq!(labels, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn large_photo_sets_span_several_grid_blocks() {
        let mut r = report(vec![section("Kitchen", 1, 0)]);
        r.sections[0].photos = (0..40).map(|_| samples::png()).collect();
        let blocks = build_blocks(&r);
        let grids: Vec<&PhotoGridBlock<'_>> = blocks
            .iter()
            .filter_map(|b| match b {
                LayoutBlock::PhotoGrid(g) => Some(g),
                _ => None,
            })
            .collect();
        assert!(grids.len() > 1);
        assert_eq!(grids.iter().map(|g| g.photos.len()).sum::<usize>(), 40);
        assert!(grids.iter().all(|g| g.total == 40));
        assert!(grids.iter().all(|g| measure::photo_grid_height(g.photos.len()) <= CONTENT_HEIGHT));
    }

    #[test]
    fn kind_names() {
        assert_eq!(BlockKind::LostFound.to_string(), "lost and found");
        assert_eq!(BlockKind::RoomCard.to_string(), "room card");
    }
}
