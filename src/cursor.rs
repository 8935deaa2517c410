//! Page Cursor / Break Manager.
//!
//! Owns the pages of a run and the vertical write position on the newest one.
//! All vertical placement goes through `request_space` and `advance`; no
//! other code moves the offset.

use tracing::debug;

use crate::blocks::BlockKind;
use crate::canvas::{FontFace, Frame};
use crate::error::{GenerationError, Result};
use crate::page::{Page, Placement};
use crate::style::*;
use crate::text;

/// Slack allowed when comparing accumulated float offsets.
pub const LAYOUT_EPSILON: f32 = 0.01;

/// Text repeated in the margins of every page.
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub running_title: String,
    pub brand: String,
}

pub struct PageCursor {
    pages: Vec<Page>,
    offset: f32,
    chrome: PageChrome,
}

impl PageCursor {
    pub fn new(chrome: PageChrome) -> Self {
        let mut cursor = PageCursor {
            pages: Vec::new(),
            offset: CONTENT_TOP,
            chrome,
        };
        cursor.open_page();
        cursor
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based number of the page currently written to.
    pub fn page_number(&self) -> usize {
        self.pages.len()
    }

    /// Make room for a block of `height`, breaking to a new page when the
    /// current one cannot take it. Returns the page number the block goes on.
    pub fn request_space(&mut self, kind: BlockKind, height: f32) -> Result<usize> {
        if height > CONTENT_HEIGHT + LAYOUT_EPSILON {
            return Err(GenerationError::Geometry {
                block: kind,
                height,
                available: CONTENT_HEIGHT,
            });
        }
        if self.offset + height > CONTENT_BOTTOM + LAYOUT_EPSILON {
            debug!(
                page = self.page_number(),
                offset = self.offset,
                height,
                block = %kind,
                "page break"
            );
            self.close_page();
            self.open_page();
        }
        Ok(self.page_number())
    }

    /// Drawing surface at the current position, spanning the content width.
    pub fn frame(&mut self) -> Frame<'_> {
        let top = self.offset;
        let page = self.current_page();
        Frame::new(page, CONTENT_LEFT, top, CONTENT_WIDTH)
    }

    /// Record a drawn block and move below it.
    pub fn advance(&mut self, kind: BlockKind, height: f32) {
        let top = self.offset;
        self.current_page().record(Placement { kind, top, height });
        self.offset += height;
    }

    /// Close the last page and hand over all pages.
    pub fn finish(mut self) -> Vec<Page> {
        self.close_page();
        self.pages
    }

    fn current_page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn open_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number));
        self.offset = CONTENT_TOP;

        let title = self.chrome.running_title.clone();
        let mut frame = Frame::new(self.current_page(), CONTENT_LEFT, 0.0, CONTENT_WIDTH);
        let metrics = FontFace::Regular.metrics();
        let x = text::right_aligned_x(&title, SMALL_SIZE, metrics, CONTENT_WIDTH);
        frame.text(x, MARGIN - 20.0, &title, SMALL_SIZE, FontFace::Regular, MUTED);
        frame.hline(0.0, CONTENT_WIDTH, MARGIN - 8.0, RULE, 0.5);
    }

    fn close_page(&mut self) {
        let brand = format!("{} | cleaning report", self.chrome.brand);
        let mut frame = Frame::new(self.current_page(), CONTENT_LEFT, CONTENT_BOTTOM, CONTENT_WIDTH);
        frame.hline(0.0, CONTENT_WIDTH, 8.0, RULE, 0.5);
        frame.text(0.0, 14.0, &brand, SMALL_SIZE, FontFace::Regular, MUTED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> PageCursor {
        PageCursor::new(PageChrome {
            running_title: "Jane Doe - 2026-03-14".into(),
            brand: "Sweep".into(),
        })
    }

    #[test]
    fn starts_at_top_of_first_page() {
        let c = cursor();
        assert_eq!(c.page_count(), 1);
        assert_eq!(c.offset(), CONTENT_TOP);
    }

    #[test]
    fn fits_without_break() {
        let mut c = cursor();
        assert_eq!(c.request_space(BlockKind::Header, 100.0).unwrap(), 1);
        c.advance(BlockKind::Header, 100.0);
        assert_eq!(c.offset(), CONTENT_TOP + 100.0);
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn breaks_when_block_would_cross_footer_reserve() {
        let mut c = cursor();
        c.request_space(BlockKind::RoomCard, 700.0).unwrap();
        c.advance(BlockKind::RoomCard, 700.0);
        assert_eq!(c.request_space(BlockKind::RoomCard, 50.0).unwrap(), 2);
        assert_eq!(c.offset(), CONTENT_TOP);
        c.advance(BlockKind::RoomCard, 50.0);

        let pages = c.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].consumed_height(), 700.0);
        assert_eq!(pages[1].placements()[0].top, CONTENT_TOP);
    }

    #[test]
    fn exact_fit_does_not_break() {
        let mut c = cursor();
        c.request_space(BlockKind::RoomCard, CONTENT_HEIGHT).unwrap();
        c.advance(BlockKind::RoomCard, CONTENT_HEIGHT);
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn oversize_block_is_a_geometry_error() {
        let mut c = cursor();
        let err = c.request_space(BlockKind::PhotoGrid, CONTENT_HEIGHT + 1.0).unwrap_err();
        assert!(matches!(err, GenerationError::Geometry { block: BlockKind::PhotoGrid, .. }));
    }

    #[test]
    fn chrome_is_drawn_in_margins() {
        let mut c = cursor();
        c.request_space(BlockKind::Summary, 10.0).unwrap();
        let pages = c.finish();
        assert!(pages[0].contains_text("Jane Doe - 2026-03-14"));
        assert!(pages[0].contains_text("Sweep | cleaning report"));
        assert_eq!(pages[0].consumed_height(), 0.0);
    }
}
