//! Recorded drawing operations.
//!
//! Renderers never talk to the PDF backend directly. They push `DrawOp`s into
//! a `Page` through a `Frame`, which translates block-local coordinates to
//! page coordinates. The PDF writer replays the ops once layout is final.

use std::sync::Arc;

use crate::font_metrics::{self, FontMetrics};
use crate::image_embed::RasterImage;
use crate::page::Page;
use crate::style::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Largest rect with the given aspect ratio that fits inside, centered.
    pub fn fit_contain(&self, source_width: f32, source_height: f32) -> Rect {
        if source_width <= 0.0 || source_height <= 0.0 || self.height <= 0.0 {
            return *self;
        }
        let source_aspect = source_width / source_height;
        let (w, h) = if source_aspect > self.width / self.height {
            (self.width, self.width / source_aspect)
        } else {
            (self.height * source_aspect, self.height)
        };
        Rect::new(
            self.x + (self.width - w) / 2.0,
            self.y + (self.height - h) / 2.0,
            w,
            h,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    pub fn metrics(self) -> &'static FontMetrics {
        match self {
            FontFace::Regular => font_metrics::helvetica(),
            FontFace::Bold => font_metrics::helvetica_bold(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DrawOp {
    Rect {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<Color>,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        width: f32,
    },
    /// `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        face: FontFace,
        color: Color,
    },
    Image {
        rect: Rect,
        image: Arc<RasterImage>,
    },
    /// Empty box standing in for an image.
    Placeholder { rect: Rect },
}

/// Block-local view onto a page.
pub struct Frame<'p> {
    page: &'p mut Page,
    left: f32,
    top: f32,
    width: f32,
}

impl<'p> Frame<'p> {
    pub fn new(page: &'p mut Page, left: f32, top: f32, width: f32) -> Self {
        Frame {
            page,
            left,
            top,
            width,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Convert a block-local rect into page coordinates.
    pub fn to_page(&self, rect: Rect) -> Rect {
        rect.translate(self.left, self.top)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.to_page(rect);
        self.page.push(DrawOp::Rect {
            rect,
            fill: Some(color),
            stroke: None,
            line_width: 0.0,
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        let rect = self.to_page(rect);
        self.page.push(DrawOp::Rect {
            rect,
            fill: None,
            stroke: Some(color),
            line_width,
        });
    }

    pub fn box_rect(&mut self, rect: Rect, fill: Color, stroke: Color) {
        let rect = self.to_page(rect);
        self.page.push(DrawOp::Rect {
            rect,
            fill: Some(fill),
            stroke: Some(stroke),
            line_width: 0.75,
        });
    }

    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, color: Color, width: f32) {
        self.page.push(DrawOp::Line {
            x1: self.left + x1,
            y1: self.top + y,
            x2: self.left + x2,
            y2: self.top + y,
            color,
            width,
        });
    }

    /// Draw one line of text whose line box starts at `top`.
    pub fn text(&mut self, x: f32, top: f32, text: &str, size: f32, face: FontFace, color: Color) {
        if text.is_empty() {
            return;
        }
        let baseline = self.top + top + face.metrics().baseline_offset(size);
        self.page.push(DrawOp::Text {
            x: self.left + x,
            y: baseline,
            text: text.to_string(),
            size,
            face,
            color,
        });
    }

    pub fn image(&mut self, rect: Rect, image: Arc<RasterImage>) {
        let rect = self.to_page(rect);
        self.page.push(DrawOp::Image { rect, image });
    }

    pub fn placeholder(&mut self, rect: Rect) {
        let rect = self.to_page(rect);
        self.page.push(DrawOp::Placeholder { rect });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::INK;

    #[test]
    fn contain_fit_keeps_aspect_and_centers() {
        let cell = Rect::new(0.0, 0.0, 100.0, 50.0);
        let wide = cell.fit_contain(400.0, 100.0);
        assert_eq!(wide, Rect::new(0.0, 12.5, 100.0, 25.0));
        let tall = cell.fit_contain(100.0, 100.0);
        assert_eq!(tall, Rect::new(25.0, 0.0, 50.0, 50.0));
        assert_eq!(cell.fit_contain(0.0, 10.0), cell);
    }

    #[test]
    fn frame_translates_to_page_space() {
        let mut page = Page::new(1);
        {
            let mut frame = Frame::new(&mut page, 36.0, 100.0, 500.0);
            frame.fill_rect(Rect::new(4.0, 6.0, 10.0, 10.0), INK);
            frame.text(0.0, 0.0, "Kitchen", 10.0, FontFace::Bold, INK);
            frame.text(0.0, 0.0, "", 10.0, FontFace::Bold, INK);
        }
        assert_eq!(page.ops().len(), 2);
        match &page.ops()[0] {
            DrawOp::Rect { rect, .. } => assert_eq!(*rect, Rect::new(40.0, 106.0, 10.0, 10.0)),
            other => panic!("unexpected op {:?}", other),
        }
        match &page.ops()[1] {
            DrawOp::Text { x, y, .. } => {
                assert_eq!(*x, 36.0);
                assert!((*y - 107.18).abs() < 0.001);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }
}
