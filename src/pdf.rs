use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::io::{BufWriter, Cursor};

use crate::canvas::{DrawOp, FontFace, Rect};
use crate::error::{GenerationError, Result};
use crate::image_embed::RasterImage;
use crate::page::{Document, Page};
use crate::style::{
    Color, PAGE_HEIGHT, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PLACEHOLDER_FILL, PLACEHOLDER_STROKE,
    PT_TO_MM,
};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Serialize laid-out pages. Replays every recorded draw op in order; layout
/// decisions are never revisited here.
pub fn write_pdf(document: &Document, title: &str) -> Result<Vec<u8>> {
    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(GenerationError::pdf)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(GenerationError::pdf)?,
    };

    for (i, page) in document.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (new_page, new_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(new_page).get_layer(new_layer)
        };

        draw_page(page, &layer, &fonts);
    }

    let mut buf = Vec::new();
    {
        let cursor = Cursor::new(&mut buf);
        let mut writer = BufWriter::new(cursor);
        doc.save(&mut writer).map_err(GenerationError::pdf)?;
    }

    Ok(buf)
}

// ============================================================================
// FONTS
// ============================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }
}

// ============================================================================
// DRAWING
// ============================================================================

fn draw_page(page: &Page, layer: &PdfLayerReference, fonts: &Fonts) {
    for op in page.ops() {
        match op {
            DrawOp::Rect {
                rect,
                fill,
                stroke,
                line_width,
            } => draw_rect(layer, rect, *fill, *stroke, *line_width),
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                set_stroke_color(layer, *color);
                layer.set_outline_thickness(*width);
                draw_line(layer, *x1, *y1, *x2, *y2);
            }
            DrawOp::Text {
                x,
                y,
                text,
                size,
                face,
                color,
            } => {
                set_fill_color(layer, *color);
                layer.use_text(
                    text.clone(),
                    *size,
                    Mm(x * PT_TO_MM),
                    Mm(flip(*y) * PT_TO_MM),
                    fonts.get(*face),
                );
            }
            DrawOp::Image { rect, image } => draw_image(layer, rect, image),
            DrawOp::Placeholder { rect } => {
                draw_rect(layer, rect, Some(PLACEHOLDER_FILL), Some(PLACEHOLDER_STROKE), 1.0)
            }
        }
    }
}

/// Top-down page y to PDF's bottom-up y.
fn flip(y: f32) -> f32 {
    PAGE_HEIGHT - y
}

fn corner_points(rect: &Rect) -> Vec<(Point, bool)> {
    let x = rect.x;
    let y = flip(rect.bottom());
    let w = rect.width;
    let h = rect.height;
    vec![
        (Point::new(Mm(x * PT_TO_MM), Mm(y * PT_TO_MM)), false),
        (Point::new(Mm((x + w) * PT_TO_MM), Mm(y * PT_TO_MM)), false),
        (Point::new(Mm((x + w) * PT_TO_MM), Mm((y + h) * PT_TO_MM)), false),
        (Point::new(Mm(x * PT_TO_MM), Mm((y + h) * PT_TO_MM)), false),
    ]
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(Mm(x1 * PT_TO_MM), Mm(flip(y1) * PT_TO_MM)), false),
        (Point::new(Mm(x2 * PT_TO_MM), Mm(flip(y2) * PT_TO_MM)), false),
    ];
    let line = Line {
        points,
        is_closed: false,
    };
    layer.add_line(line);
}

fn draw_rect(
    layer: &PdfLayerReference,
    rect: &Rect,
    fill: Option<Color>,
    stroke: Option<Color>,
    line_width: f32,
) {
    let points = corner_points(rect);

    if let Some(stroke) = stroke {
        set_stroke_color(layer, stroke);
        layer.set_outline_thickness(line_width);
    }

    match fill {
        Some(fill) => {
            set_fill_color(layer, fill);
            let polygon = Polygon {
                rings: vec![points],
                mode: if stroke.is_some() {
                    PaintMode::FillStroke
                } else {
                    PaintMode::Fill
                },
                winding_order: WindingOrder::NonZero,
            };
            layer.add_polygon(polygon);
        }
        None if stroke.is_some() => {
            let line = Line {
                points,
                is_closed: true,
            };
            layer.add_line(line);
        }
        None => {}
    }
}

fn draw_image(layer: &PdfLayerReference, rect: &Rect, raster: &RasterImage) {
    let image = printpdf::Image::from(printpdf::ImageXObject {
        width: Px(raster.width as usize),
        height: Px(raster.height as usize),
        color_space: printpdf::ColorSpace::Rgb,
        bits_per_component: printpdf::ColorBits::Bit8,
        interpolate: true,
        image_data: raster.rgb.clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // At 72 DPI one pixel is one point, so the scale is the rendered size in
    // points over the pixel size.
    image.add_to_layer(
        layer.clone(),
        printpdf::ImageTransform {
            translate_x: Some(Mm(rect.x * PT_TO_MM)),
            translate_y: Some(Mm(flip(rect.bottom()) * PT_TO_MM)),
            scale_x: Some(rect.width / raster.width as f32),
            scale_y: Some(rect.height / raster.height as f32),
            dpi: Some(72.0),
            ..Default::default()
        },
    );
}

// ============================================================================
// COLOR HELPERS
// ============================================================================

fn set_fill_color(layer: &PdfLayerReference, color: Color) {
    let (r, g, b) = color.unit();
    layer.set_fill_color(printpdf::Color::Rgb(Rgb::new(r, g, b, None)));
}

fn set_stroke_color(layer: &PdfLayerReference, color: Color) {
    let (r, g, b) = color.unit();
    layer.set_outline_color(printpdf::Color::Rgb(Rgb::new(r, g, b, None)));
}
