//! # Style Tokens
//!
//! Colors and text alignment shared by the layout engine and the surfaces.
//! The invoice template has a fixed palette; every color it paints with is
//! a named token here.

use serde::{Deserialize, Serialize};

/// An RGB color with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`. Malformed components read as 0.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }
}

/// The invoice palette.
pub mod palette {
    use super::Color;

    /// Dark navy used for body ink, bars and the TOTAL box.
    pub fn ink() -> Color {
        Color::hex("#111827")
    }

    /// Gray for secondary text (invoice id, totals labels).
    pub fn muted() -> Color {
        Color::hex("#6b7280")
    }

    /// Text painted on dark bars.
    pub fn on_dark() -> Color {
        Color::WHITE
    }

    /// Hairline separators.
    pub fn border() -> Color {
        Color::hex("#e6e6e6")
    }

    /// Notes box tint.
    pub fn notes_background() -> Color {
        Color::hex("#f5f7f8")
    }

    /// Notes body and footer text.
    pub fn soft_ink() -> Color {
        Color::hex("#444444")
    }

    pub fn status_paid() -> Color {
        Color::hex("#22bb33")
    }

    pub fn status_pending() -> Color {
        Color::hex("#f0ad4e")
    }

    pub fn status_overdue() -> Color {
        Color::hex("#d9534f")
    }

    pub fn status_neutral() -> Color {
        Color::hex("#666")
    }
}

/// Horizontal alignment of a text run inside its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}
