//! # PDF Surface
//!
//! A [`DrawingSurface`] that writes a single-page PDF 1.7 file.
//!
//! We write the raw bytes ourselves. The subset an invoice needs is small:
//! the standard Helvetica faces (no embedding), filled paths, stroked lines
//! and at most one image.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, images, content, page
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Draw calls append operators to one content stream as they arrive. Fonts
//! and images are numbered in first-use order, and nothing time- or
//! randomness-dependent is written, so the same calls always produce the
//! same bytes.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::FolioError;
use crate::font::{FontContext, FontKey, StandardFont};
use crate::image_loader::{load_image, ImagePixelData, JpegColorSpace, LoadedImage};
use crate::model::PageSize;
use crate::style::Color;
use crate::surface::{aligned_x, DrawingSurface, Rect, TextOptions};

/// Bezier control-point factor for quarter circles.
const KAPPA: f64 = 0.5522847498;

/// Writes draw calls into a one-page PDF.
pub struct PdfSurface {
    width: f64,
    height: f64,
    title: Option<String>,
    font_context: FontContext,
    font: FontKey,
    font_size: f64,
    fill: Color,
    stroke: Color,
    /// Standard fonts in first-use order; index N is `/FN`.
    fonts: Vec<StandardFont>,
    /// Decoded images in draw order; index N is `/ImN`.
    images: Vec<LoadedImage>,
    stream: String,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfSurface {
    pub fn new(page_size: PageSize) -> Self {
        let (width, height) = page_size.dimensions();
        Self {
            width,
            height,
            title: None,
            font_context: FontContext::new(),
            font: FontKey::helvetica(),
            font_size: 12.0,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            fonts: Vec::new(),
            images: Vec::new(),
            stream: String::new(),
        }
    }

    /// Set the document `/Title` in the Info dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Resource index for a font, registering it on first use.
    fn font_index(&mut self, font: StandardFont) -> usize {
        match self.fonts.iter().position(|f| *f == font) {
            Some(idx) => idx,
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        }
    }

    /// Flip a top-down y to PDF's bottom-up space.
    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }

    fn write_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        let k = r * KAPPA;
        let s = &mut self.stream;

        let _ = writeln!(s, "{:.2} {:.2} m", x + r, y);
        let _ = writeln!(s, "{:.2} {:.2} l", x + w - r, y);
        let _ = writeln!(
            s,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + w - r + k, y,
            x + w, y + r - k,
            x + w, y + r
        );
        let _ = writeln!(s, "{:.2} {:.2} l", x + w, y + h - r);
        let _ = writeln!(
            s,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + w, y + h - r + k,
            x + w - r + k, y + h,
            x + w - r, y + h
        );
        let _ = writeln!(s, "{:.2} {:.2} l", x + r, y + h);
        let _ = writeln!(
            s,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + r - k, y + h,
            x, y + h - r + k,
            x, y + h - r
        );
        let _ = writeln!(s, "{:.2} {:.2} l", x, y + r);
        let _ = writeln!(
            s,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x, y + r - k,
            x + r - k, y,
            x + r, y
        );
        let _ = writeln!(s, "h");
    }

    /// Write a single image as one or two XObject PDF objects.
    /// Returns the main XObject ID.
    fn write_image_xobject(objects: &mut Vec<PdfObject>, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space_str = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };
                let dict = format!(
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>",
                    image.width_px,
                    image.height_px,
                    color_space_str,
                    data.len()
                );
                push_stream(objects, &dict, data)
            }
            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_ref = alpha
                    .as_ref()
                    .map(|alpha_data| {
                        let compressed = compress_to_vec_zlib(alpha_data, 6);
                        let dict = format!(
                            "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                             /ColorSpace /DeviceGray /BitsPerComponent 8 \
                             /Filter /FlateDecode /Length {} >>",
                            image.width_px,
                            image.height_px,
                            compressed.len()
                        );
                        let id = push_stream(objects, &dict, &compressed);
                        format!(" /SMask {} 0 R", id)
                    })
                    .unwrap_or_default();

                let compressed = compress_to_vec_zlib(rgb, 6);
                let dict = format!(
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceRGB /BitsPerComponent 8 \
                     /Filter /FlateDecode /Length {}{} >>",
                    image.width_px,
                    image.height_px,
                    compressed.len(),
                    smask_ref
                );
                push_stream(objects, &dict, &compressed)
            }
        }
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Encode text as a WinAnsi PDF string literal body.
    fn encode_text(content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        for ch in content.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// holds smart quotes, bullets, dashes and the euro sign.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(objects: &[PdfObject], info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", objects.len());
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}

/// Append a stream object and return its ID.
fn push_stream(objects: &mut Vec<PdfObject>, dict: &str, payload: &[u8]) -> usize {
    let id = objects.len();
    let mut data: Vec<u8> = Vec::with_capacity(dict.len() + payload.len() + 20);
    data.extend_from_slice(dict.as_bytes());
    data.extend_from_slice(b"\nstream\n");
    data.extend_from_slice(payload);
    data.extend_from_slice(b"\nendstream");
    objects.push(PdfObject { data });
    id
}

fn push_object(objects: &mut Vec<PdfObject>, data: String) -> usize {
    let id = objects.len();
    objects.push(PdfObject {
        data: data.into_bytes(),
    });
    id
}

impl DrawingSurface for PdfSurface {
    type Output = Vec<u8>;

    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_font(&mut self, font: FontKey, size: f64) {
        self.font = font;
        self.font_size = size;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn draw_text(&mut self, content: &str, x: f64, y: f64, options: TextOptions) {
        if content.is_empty() {
            return;
        }
        let std_font = self.font_context.resolve(&self.font);
        let idx = self.font_index(std_font);
        let text_width = std_font.metrics().measure_string(content, self.font_size);
        let x = aligned_x(x, text_width, &options);
        let baseline = y + std_font.ascender() / 1000.0 * self.font_size;
        let pdf_y = self.flip(baseline);
        let c = self.fill;

        let _ = write!(
            self.stream,
            "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            c.r,
            c.g,
            c.b,
            idx,
            self.font_size,
            x,
            pdf_y,
            Self::encode_text(content)
        );
    }

    fn fill_rect(&mut self, rect: Rect) {
        let c = self.fill;
        let y = self.flip(rect.bottom());
        let _ = write!(
            self.stream,
            "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
            c.r, c.g, c.b, rect.x, y, rect.width, rect.height
        );
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64) {
        let c = self.fill;
        let y = self.flip(rect.bottom());
        let _ = write!(self.stream, "q\n{:.3} {:.3} {:.3} rg\n", c.r, c.g, c.b);
        self.write_rounded_rect(rect.x, y, rect.width, rect.height, radius);
        let _ = write!(self.stream, "f\nQ\n");
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let c = self.stroke;
        let (y1, y2) = (self.flip(y1), self.flip(y2));
        let _ = write!(
            self.stream,
            "q\n{:.3} {:.3} {:.3} RG\n1 w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
            c.r, c.g, c.b, x1, y1, x2, y2
        );
    }

    fn draw_image(&mut self, resource: &str, rect: Rect) -> Result<(), FolioError> {
        let image = load_image(resource)?;
        let idx = self.images.len();
        self.images.push(image);
        let y = self.flip(rect.bottom());
        let _ = write!(
            self.stream,
            "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
            rect.width, rect.height, rect.x, y, idx
        );
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, FolioError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(FolioError::Render(format!(
                "invalid page size {}x{}",
                self.width, self.height
            )));
        }

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, images, content stream, page, info
        let mut objects: Vec<PdfObject> = Vec::new();
        objects.push(PdfObject { data: vec![] });
        objects.push(PdfObject {
            data: b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        });
        objects.push(PdfObject { data: vec![] });

        let mut fonts = self.fonts.clone();
        if fonts.is_empty() {
            fonts.push(StandardFont::Helvetica);
        }
        let font_resources = fonts
            .iter()
            .enumerate()
            .map(|(i, font)| {
                let id = push_object(
                    &mut objects,
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        font.pdf_name()
                    ),
                );
                format!("/F{} {} 0 R", i, id)
            })
            .collect::<Vec<_>>()
            .join(" ");

        let xobject_resources = self
            .images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                let id = Self::write_image_xobject(&mut objects, image);
                format!("/Im{} {} 0 R", i, id)
            })
            .collect::<Vec<_>>()
            .join(" ");

        let compressed = compress_to_vec_zlib(self.stream.as_bytes(), 6);
        let content_dict = format!("<< /Length {} /Filter /FlateDecode >>", compressed.len());
        let content_obj_id = push_stream(&mut objects, &content_dict, &compressed);

        let resources = if xobject_resources.is_empty() {
            format!("/Font << {} >>", font_resources)
        } else {
            format!(
                "/Font << {} >> /XObject << {} >>",
                font_resources, xobject_resources
            )
        };
        let page_obj_id = push_object(
            &mut objects,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                self.width, self.height, content_obj_id, resources
            ),
        );

        objects[2].data = format!(
            "<< /Type /Pages /Kids [{} 0 R] /Count 1 >>",
            page_obj_id
        )
        .into_bytes();

        let mut info = String::from("<< ");
        if let Some(ref title) = self.title {
            let _ = write!(info, "/Title ({}) ", Self::escape_pdf_string(title));
        }
        info.push_str("/Producer (Folio) /Creator (Folio) >>");
        let info_obj_id = push_object(&mut objects, info);

        Ok(Self::serialize(&objects, Some(info_obj_id)))
    }
}
