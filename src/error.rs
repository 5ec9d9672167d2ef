//! Structured error types for the Folio layout engine.
//!
//! Only two failures matter to a render: a logo that can't be loaded (which
//! the engine swallows) and a surface that can't finish its output (which is
//! propagated). Parse and I/O variants cover the JSON and CLI edges.

use thiserror::Error;

use crate::image_loader::ImageError;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as an invoice or company profile.
    #[error("Failed to parse input: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// An image resource could not be loaded or decoded.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),
    /// The drawing surface could not produce its output.
    #[error("Render error: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the invoice schema. Check field names (camelCase) and date formats (YYYY-MM-DD).".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_carries_hint() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse input"));
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn test_render_error_display() {
        let err = FolioError::Render("stream closed".to_string());
        assert_eq!(err.to_string(), "Render error: stream closed");
    }

    #[test]
    fn test_parse_error_exposes_source() {
        use std::error::Error;
        let err: FolioError = serde_json::from_str::<serde_json::Value>("[1,")
            .unwrap_err()
            .into();
        assert!(err.source().is_some());
    }
}
