//! Block Renderers.
//!
//! One function per block type. Each draws at the frame origin, walks its own
//! local `y` down through the same constants the Height Estimator uses, and
//! returns the height it consumed.

use chrono::Duration;

use crate::assets::Branding;
use crate::blocks::{
    FooterBlock, HeaderBlock, InventoryBlock, LostFoundBlock, PhotoGridBlock, PhotoPair,
    RoomCardBlock, SummaryBlock,
};
use crate::canvas::{FontFace, Frame, Rect};
use crate::error::Diagnostic;
use crate::image_embed::{self, embed};
use crate::measure;
use crate::report::{DamageRecord, Item, Severity};
use crate::style::*;
use crate::text::{centered_x, right_aligned_x, truncate};

/// Shared state handed to every renderer of one run.
pub struct RenderContext<'a> {
    pub diagnostics: &'a mut Vec<Diagnostic>,
    pub branding: &'a Branding,
}

// ============================================================================
// HELPERS
// ============================================================================

/// Top of a line of text vertically centered in a row.
fn line_top(row_top: f32, row_height: f32, size: f32, face: FontFace) -> f32 {
    row_top + ((row_height - face.metrics().line_height(size)) / 2.0).max(0.0)
}

fn section_heading(frame: &mut Frame<'_>, title: &str, top: f32) -> f32 {
    let width = frame.width();
    frame.text(
        0.0,
        line_top(top, SECTION_HEADER_HEIGHT - 4.0, HEADING_SIZE, FontFace::Bold),
        title,
        HEADING_SIZE,
        FontFace::Bold,
        INK,
    );
    frame.hline(0.0, width, top + SECTION_HEADER_HEIGHT - 4.0, PRIMARY, 1.0);
    SECTION_HEADER_HEIGHT
}

fn continued(title: &str, is_continuation: bool) -> String {
    if is_continuation {
        format!("{} (cont.)", title)
    } else {
        title.to_string()
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => PRIMARY,
        Severity::Medium => WARNING,
        Severity::High => DANGER,
    }
}

fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

fn format_quantity(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

// ============================================================================
// HEADER / SUMMARY
// ============================================================================

pub fn header(block: &HeaderBlock<'_>, frame: &mut Frame<'_>, ctx: &mut RenderContext<'_>) -> f32 {
    let report = block.report;
    let width = frame.width();
    let mut y = 0.0;

    match &ctx.branding.logo {
        Some(logo) => {
            let slot = Rect::new(
                0.0,
                (HEADER_BRAND_ROW - LOGO_MAX_HEIGHT) / 2.0,
                LOGO_MAX_WIDTH,
                LOGO_MAX_HEIGHT,
            );
            image_embed::place(frame, logo.clone(), slot);
        }
        None => frame.text(
            0.0,
            line_top(0.0, HEADER_BRAND_ROW, BRAND_MARK_SIZE, FontFace::Bold),
            &ctx.branding.name,
            BRAND_MARK_SIZE,
            FontFace::Bold,
            PRIMARY,
        ),
    }

    let title = "Cleaning Report";
    let bold = FontFace::Bold.metrics();
    frame.text(
        right_aligned_x(title, TITLE_SIZE, bold, width),
        2.0,
        title,
        TITLE_SIZE,
        FontFace::Bold,
        INK,
    );
    let issued = report.date.format("%d %B %Y").to_string();
    frame.text(
        right_aligned_x(&issued, SMALL_SIZE, FontFace::Regular.metrics(), width),
        22.0,
        &issued,
        SMALL_SIZE,
        FontFace::Regular,
        MUTED,
    );
    y += HEADER_BRAND_ROW;
    frame.hline(0.0, width, y, PRIMARY, 1.0);
    y += HEADER_META_GAP;

    let duration = report
        .duration()
        .map(format_duration)
        .unwrap_or_else(|| "-".to_string());
    let meta = [
        ("Client", report.client_name.clone()),
        ("Address", or_dash(&report.address).to_string()),
        ("Date", report.date.format("%Y-%m-%d").to_string()),
        ("Duration", duration),
        ("Reference", or_dash(report.reference.as_deref().unwrap_or("")).to_string()),
        ("Responsible", or_dash(&report.responsible_name).to_string()),
    ];

    let column = width / 2.0;
    for row in meta.chunks(2) {
        for (index, (label, value)) in row.iter().enumerate() {
            let x = index as f32 * column;
            frame.text(
                x,
                line_top(y, HEADER_META_ROW, SMALL_SIZE, FontFace::Bold),
                label,
                SMALL_SIZE,
                FontFace::Bold,
                MUTED,
            );
            frame.text(
                x + 60.0,
                line_top(y, HEADER_META_ROW, BODY_SIZE, FontFace::Regular),
                &truncate(value, ITEM_LABEL_MAX_CHARS),
                BODY_SIZE,
                FontFace::Regular,
                INK,
            );
        }
        y += HEADER_META_ROW;
    }

    y += BLOCK_GAP;
    frame.hline(0.0, width, y, RULE, 0.5);
    y += BLOCK_GAP;
    y
}

pub fn summary(block: &SummaryBlock, frame: &mut Frame<'_>) -> f32 {
    let stats = block.stats;
    let cells = [
        (
            format!("{}/{}", stats.tasks_completed, stats.tasks_total),
            "Tasks completed",
            PRIMARY,
        ),
        (
            stats.damages.to_string(),
            "Damages",
            if stats.damages > 0 { DANGER } else { PRIMARY },
        ),
        (stats.lost_found.to_string(), "Lost & found", PRIMARY),
        (stats.photos.to_string(), "Photos", PRIMARY),
    ];

    let gap_total = (SUMMARY_CELLS - 1) as f32 * SUMMARY_CELL_GAP;
    let cell_width = (frame.width() - gap_total) / SUMMARY_CELLS as f32;
    let bold = FontFace::Bold.metrics();
    let regular = FontFace::Regular.metrics();

    for (index, (value, label, color)) in cells.iter().enumerate() {
        let x = index as f32 * (cell_width + SUMMARY_CELL_GAP);
        frame.box_rect(Rect::new(x, 0.0, cell_width, SUMMARY_CELL_HEIGHT), SURFACE, RULE);
        frame.text(
            x + centered_x(value, STAT_SIZE, bold, cell_width),
            9.0,
            value,
            STAT_SIZE,
            FontFace::Bold,
            *color,
        );
        frame.text(
            x + centered_x(label, SMALL_SIZE, regular, cell_width),
            32.0,
            label,
            SMALL_SIZE,
            FontFace::Regular,
            MUTED,
        );
    }

    SUMMARY_CELL_HEIGHT + BLOCK_GAP
}

// ============================================================================
// ROOM CARD
// ============================================================================

pub fn room_card(
    block: &RoomCardBlock<'_>,
    frame: &mut Frame<'_>,
    ctx: &mut RenderContext<'_>,
) -> f32 {
    let width = frame.width();
    let inner = width - 2.0 * ROOM_INNER_INSET;
    let mut y = 0.0;

    frame.fill_rect(Rect::new(0.0, 0.0, width, ROOM_TITLE_BAR), PRIMARY);
    let title = continued(&block.title, block.continued);
    frame.text(
        ROOM_INNER_INSET,
        line_top(0.0, ROOM_TITLE_BAR, CARD_TITLE_SIZE, FontFace::Bold),
        &truncate(&title, ITEM_LABEL_MAX_CHARS),
        CARD_TITLE_SIZE,
        FontFace::Bold,
        WHITE,
    );
    let progress = format!("{}/{} done", block.completed, block.total);
    frame.text(
        ROOM_INNER_INSET + right_aligned_x(&progress, SMALL_SIZE, FontFace::Regular.metrics(), inner),
        line_top(0.0, ROOM_TITLE_BAR, SMALL_SIZE, FontFace::Regular),
        &progress,
        SMALL_SIZE,
        FontFace::Regular,
        WHITE,
    );
    y += ROOM_TITLE_BAR;
    y += ROOM_PADDING;

    let column = inner / ITEM_COLUMNS as f32;
    for row in block.items.chunks(ITEM_COLUMNS) {
        for (index, item) in row.iter().enumerate() {
            checklist_item(frame, item, ROOM_INNER_INSET + index as f32 * column, y);
        }
        y += ITEM_ROW_HEIGHT;
    }

    if let Some(pair) = block.photos {
        photo_pair(frame, ctx, &block.title, pair, y);
        y += PHOTO_PAIR_HEIGHT;
    }

    if !block.damages.is_empty() {
        y += damage_list(frame, ctx, &block.title, &block.damages, y);
    }

    y += ROOM_PADDING;
    frame.stroke_rect(Rect::new(0.0, 0.0, width, y), RULE, 0.75);
    y += BLOCK_GAP;
    y
}

fn checklist_item(frame: &mut Frame<'_>, item: &Item, x: f32, top: f32) {
    let check = Rect::new(x, top + (ITEM_ROW_HEIGHT - CHECKBOX_SIZE) / 2.0, CHECKBOX_SIZE, CHECKBOX_SIZE);
    if item.completed {
        frame.box_rect(check, SUCCESS, SUCCESS);
    } else {
        frame.stroke_rect(check, MUTED, 0.75);
    }

    let missing_photo = item.photo_required && item.photo_url.is_none();
    let color = if missing_photo { DANGER } else { INK };
    frame.text(
        x + CHECKBOX_SIZE + 5.0,
        line_top(top, ITEM_ROW_HEIGHT, BODY_SIZE, FontFace::Regular),
        &truncate(&item.label, ITEM_LABEL_MAX_CHARS),
        BODY_SIZE,
        FontFace::Regular,
        color,
    );
}

fn photo_pair(
    frame: &mut Frame<'_>,
    ctx: &mut RenderContext<'_>,
    room: &str,
    pair: PhotoPair<'_>,
    top: f32,
) {
    let inner = frame.width() - 2.0 * ROOM_INNER_INSET;
    let half = (inner - PHOTO_PAIR_GAP) / 2.0;
    let regular = FontFace::Regular.metrics();

    for (index, (label, payload)) in [("Before", pair.before), ("After", pair.after)]
        .into_iter()
        .enumerate()
    {
        let x = ROOM_INNER_INSET + index as f32 * (half + PHOTO_PAIR_GAP);
        frame.text(x, top + ROOM_PADDING, label, SMALL_SIZE, FontFace::Bold, MUTED);

        let slot = Rect::new(x, top + ROOM_PADDING + PHOTO_PAIR_LABEL, half, PHOTO_PAIR_IMAGE);
        match payload {
            Some(payload) => {
                let context = format!("{} {}", room, label.to_lowercase());
                embed(frame, payload, slot, &context, ctx.diagnostics);
            }
            None => {
                frame.placeholder(slot);
                let text = "No photo";
                frame.text(
                    x + centered_x(text, SMALL_SIZE, regular, half),
                    line_top(slot.y, PHOTO_PAIR_IMAGE, SMALL_SIZE, FontFace::Regular),
                    text,
                    SMALL_SIZE,
                    FontFace::Regular,
                    MUTED,
                );
            }
        }
    }
}

/// Damage sub-block of a room card. Returns its height.
fn damage_list(
    frame: &mut Frame<'_>,
    ctx: &mut RenderContext<'_>,
    room: &str,
    damages: &[&DamageRecord],
    top: f32,
) -> f32 {
    let width = frame.width();
    let mut y = top;

    frame.hline(ROOM_INNER_INSET, width - ROOM_INNER_INSET, y + 2.0, RULE, 0.5);
    frame.text(
        ROOM_INNER_INSET,
        line_top(y, DAMAGE_HEADER_HEIGHT, BODY_SIZE, FontFace::Bold),
        &format!("Damages ({})", damages.len()),
        BODY_SIZE,
        FontFace::Bold,
        DANGER,
    );

    // One badge per card, sized by its text and anchored to the card edge.
    if let Some(severity) = damages.iter().map(|d| d.severity).max() {
        let label = severity.label();
        let badge_width = FontFace::Bold.metrics().string_width(label, SMALL_SIZE) + 2.0 * BADGE_PADDING;
        let badge = Rect::new(
            width - ROOM_INNER_INSET - badge_width,
            y + (DAMAGE_HEADER_HEIGHT - BADGE_HEIGHT) / 2.0,
            badge_width,
            BADGE_HEIGHT,
        );
        frame.fill_rect(badge, severity_color(severity));
        frame.text(
            badge.x + BADGE_PADDING,
            line_top(badge.y, BADGE_HEIGHT, SMALL_SIZE, FontFace::Bold),
            label,
            SMALL_SIZE,
            FontFace::Bold,
            WHITE,
        );
    }
    y += DAMAGE_HEADER_HEIGHT;

    let line = FontFace::Bold.metrics().line_height(BODY_SIZE);
    for (index, damage) in damages.iter().enumerate() {
        let mut text_x = ROOM_INNER_INSET;
        if let Some(photo) = &damage.photo {
            let thumb = Rect::new(
                ROOM_INNER_INSET,
                y + (DAMAGE_ROW_HEIGHT - DAMAGE_THUMB) / 2.0,
                DAMAGE_THUMB,
                DAMAGE_THUMB,
            );
            let context = format!("{} damage {}", room, index + 1);
            embed(frame, photo, thumb, &context, ctx.diagnostics);
            text_x += DAMAGE_THUMB + 6.0;
        }
        frame.text(
            text_x,
            y + 4.0,
            &format!("{} - {}", damage.kind.label(), damage.severity.label()),
            BODY_SIZE,
            FontFace::Bold,
            severity_color(damage.severity),
        );
        frame.text(
            text_x,
            y + 4.0 + line,
            &truncate(&damage.description, DAMAGE_DESC_MAX_CHARS),
            SMALL_SIZE,
            FontFace::Regular,
            INK,
        );
        y += DAMAGE_ROW_HEIGHT;
    }

    y - top
}

// ============================================================================
// PHOTO GRID
// ============================================================================

pub fn photo_grid(
    block: &PhotoGridBlock<'_>,
    frame: &mut Frame<'_>,
    ctx: &mut RenderContext<'_>,
) -> f32 {
    let width = frame.width();
    let title = continued(&format!("Photos ({})", block.total), block.continued);
    let mut y = section_heading(frame, &title, 0.0);

    let gaps = (GRID_COLUMNS - 1) as f32 * GRID_COLUMN_GAP;
    let cell = (width - gaps) / GRID_COLUMNS as f32;
    let regular = FontFace::Regular.metrics();

    for row in block.photos.chunks(GRID_COLUMNS) {
        for (column, photo) in row.iter().enumerate() {
            let x = column as f32 * (cell + GRID_COLUMN_GAP);
            let slot = Rect::new(x, y, cell, GRID_IMAGE_HEIGHT);
            embed(frame, photo.payload, slot, &photo.caption, ctx.diagnostics);

            let caption = truncate(&photo.caption, CAPTION_MAX_CHARS);
            frame.text(
                x + centered_x(&caption, SMALL_SIZE, regular, cell),
                line_top(y + GRID_IMAGE_HEIGHT, GRID_CAPTION_HEIGHT, SMALL_SIZE, FontFace::Regular),
                &caption,
                SMALL_SIZE,
                FontFace::Regular,
                MUTED,
            );
        }
        y += measure::grid_row_pitch();
    }

    y
}

// ============================================================================
// INVENTORY / LOST AND FOUND
// ============================================================================

struct PanelRow {
    name: String,
    amount: String,
    color: Color,
}

fn inventory_panel(frame: &mut Frame<'_>, x: f32, top: f32, width: f32, title: &str, rows: &[PanelRow]) {
    frame.text(
        x,
        line_top(top, INVENTORY_PANEL_TITLE, BODY_SIZE, FontFace::Bold),
        title,
        BODY_SIZE,
        FontFace::Bold,
        INK,
    );
    let mut y = top + INVENTORY_PANEL_TITLE;

    if rows.is_empty() {
        frame.text(
            x,
            line_top(y, INVENTORY_ROW_HEIGHT, BODY_SIZE, FontFace::Regular),
            "None",
            BODY_SIZE,
            FontFace::Regular,
            MUTED,
        );
        return;
    }

    let regular = FontFace::Regular.metrics();
    for row in rows.iter().take(INVENTORY_MAX_ROWS) {
        let text_top = line_top(y, INVENTORY_ROW_HEIGHT, BODY_SIZE, FontFace::Regular);
        frame.text(x, text_top, &truncate(&row.name, 32), BODY_SIZE, FontFace::Regular, INK);
        frame.text(
            x + right_aligned_x(&row.amount, BODY_SIZE, regular, width),
            text_top,
            &row.amount,
            BODY_SIZE,
            FontFace::Regular,
            row.color,
        );
        frame.hline(x, x + width, y + INVENTORY_ROW_HEIGHT, RULE, 0.5);
        y += INVENTORY_ROW_HEIGHT;
    }
}

pub fn inventory(block: &InventoryBlock, frame: &mut Frame<'_>) -> f32 {
    let mut y = section_heading(frame, "Inventory", 0.0);
    let panel = (frame.width() - INVENTORY_PANEL_GAP) / 2.0;

    let outgoing: Vec<PanelRow> = block
        .outgoing
        .iter()
        .map(|entry| PanelRow {
            name: entry.name.clone(),
            amount: format!("{} {}", format_quantity(entry.used), entry.unit).trim_end().to_string(),
            color: INK,
        })
        .collect();
    let low_stock: Vec<PanelRow> = block
        .low_stock
        .iter()
        .map(|entry| PanelRow {
            name: entry.name.clone(),
            amount: format!(
                "{} / {} {}",
                format_quantity(entry.remaining),
                format_quantity(entry.threshold),
                entry.unit
            )
            .trim_end()
            .to_string(),
            color: if entry.remaining <= 0.0 { DANGER } else { WARNING },
        })
        .collect();

    inventory_panel(frame, 0.0, y, panel, "Outgoing", &outgoing);
    inventory_panel(frame, panel + INVENTORY_PANEL_GAP, y, panel, "Low stock", &low_stock);

    let rows = measure::inventory_rows(outgoing.len(), low_stock.len());
    y += INVENTORY_PANEL_TITLE;
    y += rows as f32 * INVENTORY_ROW_HEIGHT;
    y += BLOCK_GAP;
    y
}

pub fn lost_found(
    block: &LostFoundBlock<'_>,
    frame: &mut Frame<'_>,
    ctx: &mut RenderContext<'_>,
) -> f32 {
    let width = frame.width();
    let title = continued(&format!("Lost & found ({})", block.total), block.continued);
    let mut y = section_heading(frame, &title, 0.0);
    let text_x = LOST_FOUND_THUMB + 8.0;
    let line = FontFace::Bold.metrics().line_height(BODY_SIZE);

    for item in block.items {
        if let Some(photo) = &item.photo {
            let thumb = Rect::new(
                0.0,
                y + (LOST_FOUND_ROW_HEIGHT - LOST_FOUND_THUMB) / 2.0,
                LOST_FOUND_THUMB,
                LOST_FOUND_THUMB,
            );
            let context = format!("Lost item: {}", truncate(&item.description, CAPTION_MAX_CHARS));
            embed(frame, photo, thumb, &context, ctx.diagnostics);
        }

        frame.text(
            text_x,
            y + 8.0,
            &truncate(&item.description, LOST_FOUND_DESC_MAX_CHARS),
            BODY_SIZE,
            FontFace::Bold,
            INK,
        );
        let date = item.date.format("%Y-%m-%d");
        let found = if item.location.trim().is_empty() {
            format!("Found on {}", date)
        } else {
            format!("Found in {} on {}", item.location, date)
        };
        frame.text(text_x, y + 8.0 + line, &found, SMALL_SIZE, FontFace::Regular, MUTED);
        frame.hline(0.0, width, y + LOST_FOUND_ROW_HEIGHT, RULE, 0.5);
        y += LOST_FOUND_ROW_HEIGHT;
    }

    y += BLOCK_GAP;
    y
}

// ============================================================================
// FOOTER / SIGNATURE
// ============================================================================

pub fn footer(block: &FooterBlock<'_>, frame: &mut Frame<'_>, ctx: &mut RenderContext<'_>) -> f32 {
    let report = block.report;
    let width = frame.width();
    let mut y = section_heading(frame, "Sign-off", 0.0);

    frame.text(
        0.0,
        line_top(y, FOOTER_LABEL_ROW, SMALL_SIZE, FontFace::Bold),
        "Responsible",
        SMALL_SIZE,
        FontFace::Bold,
        MUTED,
    );
    y += FOOTER_LABEL_ROW;

    let signature = Rect::new(0.0, y, SIGNATURE_WIDTH, SIGNATURE_HEIGHT);
    frame.box_rect(signature, WHITE, RULE);
    match &report.signature {
        Some(payload) => {
            let slot = Rect::new(
                signature.x + 4.0,
                signature.y + 4.0,
                signature.width - 8.0,
                signature.height - 8.0,
            );
            embed(frame, payload, slot, "Signature", ctx.diagnostics);
        }
        None => {
            let text = "Not signed";
            frame.text(
                centered_x(text, SMALL_SIZE, FontFace::Regular.metrics(), SIGNATURE_WIDTH),
                line_top(y, SIGNATURE_HEIGHT, SMALL_SIZE, FontFace::Regular),
                text,
                SMALL_SIZE,
                FontFace::Regular,
                MUTED,
            );
        }
    }

    let badge = Rect::new(
        width - VERIFIED_BADGE_WIDTH,
        y + (SIGNATURE_HEIGHT - VERIFIED_BADGE_HEIGHT) / 2.0,
        VERIFIED_BADGE_WIDTH,
        VERIFIED_BADGE_HEIGHT,
    );
    frame.box_rect(badge, SURFACE, SUCCESS);
    let verified = "VERIFIED";
    frame.text(
        badge.x + centered_x(verified, BODY_SIZE, FontFace::Bold.metrics(), badge.width),
        badge.y + 8.0,
        verified,
        BODY_SIZE,
        FontFace::Bold,
        SUCCESS,
    );
    let completed_on = report
        .finished_at
        .map(|t| t.date_naive())
        .unwrap_or(report.date);
    let completed = format!("Completed {}", completed_on.format("%Y-%m-%d"));
    frame.text(
        badge.x + centered_x(&completed, SMALL_SIZE, FontFace::Regular.metrics(), badge.width),
        badge.y + 22.0,
        &completed,
        SMALL_SIZE,
        FontFace::Regular,
        MUTED,
    );
    y += SIGNATURE_HEIGHT;

    frame.text(
        0.0,
        line_top(y, FOOTER_NAME_ROW, BODY_SIZE, FontFace::Regular),
        or_dash(&report.responsible_name),
        BODY_SIZE,
        FontFace::Regular,
        INK,
    );
    y += FOOTER_NAME_ROW;
    y += BLOCK_GAP;
    y
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::blocks::{build_blocks, BlockKind, LayoutBlock};
    use crate::canvas::DrawOp;
    use crate::image_embed::{samples, RasterImage};
    use crate::page::Page;
    use crate::report::fixtures::*;
    use crate::report::{LostFoundItem, ReportData};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn render_one(block: &LayoutBlock<'_>, branding: &Branding) -> (f32, Page, Vec<Diagnostic>) {
        let mut page = Page::new(1);
        let mut diagnostics = Vec::new();
        let consumed = {
            let mut frame = Frame::new(&mut page, CONTENT_LEFT, CONTENT_TOP, CONTENT_WIDTH);
            let mut ctx = RenderContext {
                diagnostics: &mut diagnostics,
                branding,
            };
            block.render(&mut frame, &mut ctx)
        };
        (consumed, page, diagnostics)
    }

    fn render(block: &LayoutBlock<'_>) -> (f32, Page, Vec<Diagnostic>) {
        render_one(block, &Branding::text("Sweep"))
    }

    fn find(blocks: &[LayoutBlock<'_>], kind: BlockKind) -> usize {
        blocks.iter().position(|b| b.kind() == kind).unwrap()
    }

    fn full_report() -> ReportData {
        let mut r = report(vec![section("Kitchen", 7, 3), section("Living Room", 4, 4)]);
        r.address = "12 Harbour Street".into();
        r.reference = Some("JOB-118".into());
        r.started_at = Some(chrono::Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap());
        r.finished_at = Some(chrono::Utc.with_ymd_and_hms(2026, 3, 14, 11, 45, 0).unwrap());
        r.before_photos = vec![Some(samples::png()), None];
        r.after_photos = vec![None, Some(samples::jpeg())];
        r.sections[0].photos = vec![samples::png()];
        r.sections[1].items[0].photo_required = true;
        let mut stain = damage("Stain on living room rug", Severity::Medium);
        stain.photo = Some(samples::png());
        r.damages = vec![stain, damage("Chipped kitchen tile", Severity::High)];
        r.lost_found = vec![LostFoundItem {
            description: "Silver earring".into(),
            location: "Bathroom sink".into(),
            photo: Some(samples::jpeg()),
            date: r.date,
        }];
        r.inventory = vec![stock("spray", 5.0, 2.0), stock("cloth", 10.0, 1.0)];
        r.inventory_usage = vec![usage("spray", 4.0), usage("cloth", 1.0)];
        r.signature = Some(samples::png());
        r
    }

    #[test]
    fn every_block_consumes_its_measured_height() {
        let r = full_report();
        let blocks = build_blocks(&r);
        assert_eq!(blocks.len(), 8);
        for block in &blocks {
            let (consumed, _, diagnostics) = render(block);
            assert_eq!(consumed, block.measure(), "{} block", block.kind());
            assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        }
    }

    #[test]
    fn summary_shows_task_ratio() {
        let r = report(vec![section("Kitchen", 5, 2)]);
        let blocks = build_blocks(&r);
        let (_, page, _) = render(&blocks[find(&blocks, BlockKind::Summary)]);
        assert!(page.contains_text("2/5"));
        assert!(page.contains_text("Tasks completed"));
    }

    #[test]
    fn long_labels_are_truncated() {
        let mut r = report(vec![section("Kitchen", 1, 0)]);
        r.sections[0].items[0].label = "Wipe down every single cabinet door inside and out, including hinges".into();
        let blocks = build_blocks(&r);
        let (_, page, _) = render(&blocks[find(&blocks, BlockKind::RoomCard)]);
        let label = page.texts().find(|t| t.starts_with("Wipe down")).unwrap();
        assert!(label.ends_with("..."));
        assert!(label.chars().count() <= ITEM_LABEL_MAX_CHARS);
    }

    #[test]
    fn missing_required_photo_is_flagged() {
        let mut r = report(vec![section("Bath", 2, 0)]);
        r.sections[0].items[0].photo_required = true;
        let blocks = build_blocks(&r);
        let (_, page, _) = render(&blocks[find(&blocks, BlockKind::RoomCard)]);
        let color_of = |needle: &str| {
            page.ops().iter().find_map(|op| match op {
                DrawOp::Text { text, color, .. } if text == needle => Some(*color),
                _ => None,
            })
        };
        assert_eq!(color_of("Bath task 1"), Some(DANGER));
        assert_eq!(color_of("Bath task 2"), Some(INK));
    }

    #[test]
    fn one_severity_badge_per_card() {
        let mut r = report(vec![section("Kitchen", 1, 0)]);
        r.damages = vec![
            damage("kitchen scratch", Severity::Low),
            damage("kitchen burn", Severity::High),
            damage("kitchen chip", Severity::Medium),
        ];
        let blocks = build_blocks(&r);
        let (consumed, page, _) = render(&blocks[find(&blocks, BlockKind::RoomCard)]);
        assert_eq!(page.texts().filter(|t| *t == "HIGH").count(), 1);
        assert!(page.contains_text("Damages (3)"));
        assert_eq!(consumed, measure::room_card_height(1, false, 3));
    }

    #[test]
    fn photo_pair_with_one_side_missing_uses_placeholder() {
        let mut r = report(vec![section("Kitchen", 2, 0)]);
        r.after_photos = vec![Some(samples::png())];
        let blocks = build_blocks(&r);
        let (consumed, page, diagnostics) = render(&blocks[find(&blocks, BlockKind::RoomCard)]);
        assert_eq!(page.image_count(), 1);
        assert_eq!(page.placeholder_count(), 1);
        assert!(page.contains_text("No photo"));
        assert!(diagnostics.is_empty());
        assert_eq!(consumed, measure::room_card_height(2, true, 0));
    }

    #[test]
    fn broken_grid_photo_spares_the_others() {
        let mut r = report(vec![section("Kitchen", 1, 0)]);
        r.sections[0].photos = vec![samples::png(), samples::broken(), samples::jpeg(), samples::png()];
        let blocks = build_blocks(&r);
        let (consumed, page, diagnostics) = render(&blocks[find(&blocks, BlockKind::PhotoGrid)]);
        assert_eq!(page.image_count(), 3);
        assert_eq!(page.placeholder_count(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_image_failure());
        assert_eq!(consumed, measure::photo_grid_height(4));
    }

    #[test]
    fn empty_inventory_panel_says_none() {
        let mut r = report(vec![section("Kitchen", 1, 0)]);
        r.inventory = vec![stock("spray", 5.0, 2.0)];
        r.inventory_usage = vec![usage("spray", 4.0)];
        let blocks = build_blocks(&r);
        let (_, page, _) = render(&blocks[find(&blocks, BlockKind::Inventory)]);
        assert!(page.contains_text("spray refill"));
        assert!(page.contains_text("1 / 2 bottle"));

        r.inventory_usage.clear();
        let blocks = build_blocks(&r);
        let (consumed, page, _) = render(&blocks[find(&blocks, BlockKind::Inventory)]);
        assert_eq!(page.texts().filter(|t| *t == "None").count(), 2);
        assert_eq!(consumed, measure::inventory_height(0, 0));
    }

    #[test]
    fn header_uses_logo_when_loaded() {
        let r = full_report();
        let blocks = build_blocks(&r);
        let logo = Arc::new(RasterImage {
            width: 4,
            height: 2,
            rgb: vec![0; 24],
        });
        let branding = Branding {
            name: "Sweep".into(),
            logo: Some(logo),
        };
        let (_, page, _) = render_one(&blocks[0], &branding);
        assert_eq!(page.image_count(), 1);
        assert!(!page.contains_text("Sweep"));

        let (_, page, _) = render(&blocks[0]);
        assert_eq!(page.image_count(), 0);
        assert!(page.contains_text("Sweep"));
        assert!(page.contains_text("JOB-118"));
    }

    #[test]
    fn header_shows_duration() {
        let r = full_report();
        let blocks = build_blocks(&r);
        let (_, page, _) = render(&blocks[0]);
        assert!(page.contains_text("2h 45m"));
    }

    #[test]
    fn footer_badge_is_inside_block_width() {
        let r = full_report();
        let blocks = build_blocks(&r);
        let (_, page, _) = render(&blocks[find(&blocks, BlockKind::Footer)]);
        assert!(page.contains_text("Completed 2026-03-14"));
        assert!(page.contains_text("Alex Smith"));
        for op in page.ops() {
            if let DrawOp::Rect { rect, .. } = op {
                assert!(rect.x + rect.width <= CONTENT_LEFT + CONTENT_WIDTH + 0.01);
            }
        }
    }

    proptest! {
        #[test]
        fn room_card_render_matches_measure(items in 0usize..30, photos in any::<bool>(), damages in 0usize..6) {
            let mut r = report(vec![section("Kitchen", items, items / 2)]);
            if photos {
                r.before_photos = vec![Some(samples::png())];
            }
            r.damages = (0..damages).map(|i| damage(&format!("kitchen mark {}", i), Severity::Low)).collect();
            let blocks = build_blocks(&r);
            let card = &blocks[find(&blocks, BlockKind::RoomCard)];
            let (consumed, _, _) = render(card);
            prop_assert_eq!(consumed, card.measure());
            prop_assert_eq!(consumed, measure::room_card_height(items, photos, damages));
        }
    }
}
