//! # Font Management
//!
//! The invoice is set entirely in the standard Helvetica faces, which every
//! PDF reader ships, so nothing is embedded. This module resolves a requested
//! family/weight/style to one of those faces and measures text with its AFM
//! widths.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use serde::{Deserialize, Serialize};

/// A requested font: family name, CSS-style weight, italic flag.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    pub fn helvetica() -> Self {
        Self {
            family: "Helvetica".to_string(),
            weight: 400,
            italic: false,
        }
    }

    pub fn helvetica_bold() -> Self {
        Self {
            weight: 700,
            ..Self::helvetica()
        }
    }

    pub fn helvetica_oblique() -> Self {
        Self {
            italic: true,
            ..Self::helvetica()
        }
    }

    fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

impl Default for FontKey {
    fn default() -> Self {
        Self::helvetica()
    }
}

/// The standard Helvetica faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &metrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &metrics::HELVETICA_BOLD,
        }
    }

    /// Ascender height in 1/1000 em, used to turn a line-box top into a
    /// baseline.
    pub fn ascender(&self) -> f64 {
        718.0
    }
}

/// Text measurement against the standard faces.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontContext;

impl FontContext {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a key to a standard face. Unknown families fall back to
    /// Helvetica; weights snap to regular or bold at 600.
    pub fn resolve(&self, key: &FontKey) -> StandardFont {
        match (key.is_bold(), key.italic) {
            (false, false) => StandardFont::Helvetica,
            (true, false) => StandardFont::HelveticaBold,
            (false, true) => StandardFont::HelveticaOblique,
            (true, true) => StandardFont::HelveticaBoldOblique,
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, key: &FontKey, font_size: f64) -> f64 {
        self.resolve(key).metrics().char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, key: &FontKey, font_size: f64) -> f64 {
        self.resolve(key).metrics().measure_string(text, font_size)
    }

    /// The longest prefix of `text` that fits in `max_width`.
    pub fn clip_to_width<'a>(
        &self,
        text: &'a str,
        key: &FontKey,
        font_size: f64,
        max_width: f64,
    ) -> &'a str {
        let metrics = self.resolve(key).metrics();
        let mut width = 0.0;
        for (idx, ch) in text.char_indices() {
            width += metrics.char_width(ch, font_size);
            if width > max_width {
                return &text[..idx];
            }
        }
        text
    }
}
