//! Post-layout pass. Runs once the page count is known and is the only code
//! that revisits a closed page.

use crate::canvas::{FontFace, Frame};
use crate::page::{Page, PageStamp};
use crate::style::{CONTENT_BOTTOM, CONTENT_LEFT, CONTENT_WIDTH, MUTED, SMALL_SIZE};
use crate::text::right_aligned_x;

/// Offset of the stamp line below the content area, level with the brand line.
const STAMP_TOP: f32 = 14.0;

/// Stamp "i / N" into the footer reserve of every page.
pub fn stamp_page_numbers(pages: &mut [Page]) {
    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        let stamp = PageStamp {
            number: index + 1,
            total,
        };
        let label = stamp.label();
        let x = right_aligned_x(&label, SMALL_SIZE, FontFace::Regular.metrics(), CONTENT_WIDTH);

        let mut frame = Frame::new(page, CONTENT_LEFT, CONTENT_BOTTOM, CONTENT_WIDTH);
        frame.text(x, STAMP_TOP, &label, SMALL_SIZE, FontFace::Regular, MUTED);
        page.set_stamp(stamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::canvas::DrawOp;
    use crate::page::Placement;
    use pretty_assertions::assert_eq;

    fn pages(n: usize) -> Vec<Page> {
        (1..=n)
            .map(|number| {
                let mut page = Page::new(number);
                page.record(Placement {
                    kind: BlockKind::RoomCard,
                    top: 36.0,
                    height: 200.0,
                });
                page
            })
            .collect()
    }

    #[test]
    fn stamps_are_contiguous() {
        let mut pages = pages(4);
        stamp_page_numbers(&mut pages);
        let labels: Vec<String> = pages.iter().map(|p| p.stamp().unwrap().label()).collect();
        assert_eq!(labels, vec!["1 / 4", "2 / 4", "3 / 4", "4 / 4"]);
        for page in &pages {
            assert_eq!(page.stamp().unwrap().number, page.number());
            assert!(page.contains_text(&page.stamp().unwrap().label()));
        }
    }

    #[test]
    fn only_adds_the_stamp() {
        let mut pages = pages(2);
        stamp_page_numbers(&mut pages);
        for page in &pages {
            assert_eq!(page.ops().len(), 1);
            assert_eq!(page.consumed_height(), 200.0);
            match &page.ops()[0] {
                DrawOp::Text { y, .. } => assert!(*y > CONTENT_BOTTOM),
                other => panic!("unexpected op {:?}", other),
            }
        }
    }
}
