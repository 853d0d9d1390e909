//! Plain text decoding.

use crate::error::Result;
use crate::model::ExtractionResult;
use crate::options::ExtractOptions;

use super::TextExtractor;

/// Warning emitted for empty or whitespace-only files.
pub const EMPTY_WARNING: &str = "File was empty.";

/// Decode a plain text buffer as UTF-8.
///
/// Invalid sequences become U+FFFD, a leading byte order mark is dropped
/// and surrounding whitespace is trimmed. Never fails.
pub fn extract_txt(data: &[u8]) -> ExtractionResult {
    let decoded = String::from_utf8_lossy(data);
    let text = decoded.trim_start_matches('\u{FEFF}').trim();

    let mut result = ExtractionResult::new(text, "txt");
    if result.text.is_empty() {
        result.push_warning(EMPTY_WARNING);
    }
    result
}

/// Plain text extractor.
#[derive(Debug, Clone, Default)]
pub struct TxtExtractor {
    _private: (),
}

impl TxtExtractor {
    /// Create a new plain text extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for TxtExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn name(&self) -> &str {
        "txt"
    }

    fn extract(&self, bytes: &[u8], _options: &ExtractOptions) -> Result<ExtractionResult> {
        Ok(extract_txt(bytes))
    }
}
