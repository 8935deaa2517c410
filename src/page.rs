use crate::blocks::BlockKind;
use crate::canvas::DrawOp;

/// Where a block landed on its page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: BlockKind,
    pub top: f32,
    pub height: f32,
}

/// "page i of N", written by the finalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStamp {
    pub number: usize,
    pub total: usize,
}

impl PageStamp {
    pub fn label(&self) -> String {
        format!("{} / {}", self.number, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    number: usize,
    ops: Vec<DrawOp>,
    placements: Vec<Placement>,
    stamp: Option<PageStamp>,
}

impl Page {
    /// `number` is 1-based.
    pub fn new(number: usize) -> Self {
        Page {
            number,
            ops: Vec::new(),
            placements: Vec::new(),
            stamp: None,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn stamp(&self) -> Option<PageStamp> {
        self.stamp
    }

    pub(crate) fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub(crate) fn record(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    pub(crate) fn set_stamp(&mut self, stamp: PageStamp) {
        self.stamp = Some(stamp);
    }

    /// Sum of the heights of all blocks placed here.
    pub fn consumed_height(&self) -> f32 {
        self.placements.iter().map(|p| p.height).sum()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }

    pub fn placeholder_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Placeholder { .. }))
            .count()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// Laid-out pages of one run, in order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn blocks_of(&self, kind: BlockKind) -> impl Iterator<Item = (usize, &Placement)> {
        self.pages.iter().flat_map(move |page| {
            page.placements
                .iter()
                .filter(move |p| p.kind == kind)
                .map(move |p| (page.number, p))
        })
    }
}
