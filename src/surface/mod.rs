//! # Drawing Surface
//!
//! The seam between the layout engine and whatever produces the final
//! output. The engine only ever talks to a [`DrawingSurface`]; it never
//! knows whether it's writing PDF operators or filling a display list.
//!
//! Coordinates are in points with the origin at the top-left of the page,
//! x growing right and y growing down. Surfaces that use a different
//! convention (PDF is bottom-up) flip internally.

use serde::{Deserialize, Serialize};

use crate::error::FolioError;
use crate::font::FontKey;
use crate::style::{Color, TextAlign};

/// An axis-aligned rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Placement options for a text run.
///
/// Without a width the run starts at `x`. With a width, `align` positions
/// the run inside `[x, x + width]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOptions {
    pub width: Option<f64>,
    pub align: TextAlign,
}

impl TextOptions {
    pub fn width(width: f64) -> Self {
        Self {
            width: Some(width),
            align: TextAlign::Left,
        }
    }

    pub fn right(width: f64) -> Self {
        Self {
            width: Some(width),
            align: TextAlign::Right,
        }
    }

    pub fn center(width: f64) -> Self {
        Self {
            width: Some(width),
            align: TextAlign::Center,
        }
    }
}

/// X position of a run of `text_width` placed with `options` at `x`.
pub fn aligned_x(x: f64, text_width: f64, options: &TextOptions) -> f64 {
    match (options.width, options.align) {
        (Some(w), TextAlign::Right) => x + w - text_width,
        (Some(w), TextAlign::Center) => x + (w - text_width) / 2.0,
        _ => x,
    }
}

/// A stateful canvas for one fixed-size page.
///
/// Font and colors are current-state, like a graphics context: they apply
/// to every following draw call until changed. Text uses the fill color.
pub trait DrawingSurface {
    /// What `finish` produces.
    type Output;

    /// Page (width, height) in points.
    fn page_size(&self) -> (f64, f64);

    fn set_font(&mut self, font: FontKey, size: f64);
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);

    /// Draw a single-line text run whose line box starts at `y`.
    fn draw_text(&mut self, content: &str, x: f64, y: f64, options: TextOptions);

    fn fill_rect(&mut self, rect: Rect);
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64);
    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Place an image resource scaled into `rect`. A resource that fails to
    /// load draws nothing and reports why.
    fn draw_image(&mut self, resource: &str, rect: Rect) -> Result<(), FolioError>;

    /// Complete the document. Consumes the surface.
    fn finish(self) -> Result<Self::Output, FolioError>;
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    SetFont { font: FontKey, size: f64 },
    SetFillColor { color: Color },
    SetStrokeColor { color: Color },
    Text {
        content: String,
        x: f64,
        y: f64,
        options: TextOptions,
    },
    Rect { rect: Rect },
    RoundedRect { rect: Rect, radius: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Image { resource: String, rect: Rect },
}

/// A surface that keeps every call as a [`DrawOp`].
///
/// `finish` hands back the display list. Images are recorded without being
/// decoded, so a recording never fails.
pub struct RecordingSurface {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
}

impl DrawingSurface for RecordingSurface {
    type Output = Vec<DrawOp>;

    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_font(&mut self, font: FontKey, size: f64) {
        self.ops.push(DrawOp::SetFont { font, size });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(DrawOp::SetFillColor { color });
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(DrawOp::SetStrokeColor { color });
    }

    fn draw_text(&mut self, content: &str, x: f64, y: f64, options: TextOptions) {
        self.ops.push(DrawOp::Text {
            content: content.to_string(),
            x,
            y,
            options,
        });
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Rect { rect });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64) {
        self.ops.push(DrawOp::RoundedRect { rect, radius });
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    fn draw_image(&mut self, resource: &str, rect: Rect) -> Result<(), FolioError> {
        self.ops.push(DrawOp::Image {
            resource: resource.to_string(),
            rect,
        });
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, FolioError> {
        Ok(self.ops)
    }
}
