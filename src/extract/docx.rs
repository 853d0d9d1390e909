//! DOCX text extraction.
//!
//! A DOCX file is a ZIP container; the body lives in `word/document.xml`.
//! Text sits in `<w:t>` run elements grouped into `<w:p>` paragraphs.

use crate::detect::is_zip_bytes;
use crate::error::Result;
use crate::model::ExtractionResult;
use crate::normalize::{decode_xml_entities, normalize_text};
use crate::options::ExtractOptions;
use crate::zip;
use regex::Regex;
use std::sync::OnceLock;

use super::TextExtractor;

/// Archive entry holding the document body.
pub const DOCX_ENTRY: &str = "word/document.xml";

/// Warning emitted when the body holds no text.
pub const NO_TEXT_WARNING: &str = "No text extracted from DOCX.";

/// Warning emitted when the archive has no document body.
pub const NOT_FOUND_WARNING: &str = "DOCX content not found.";

fn paragraph_boundary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?w:p(?:\s[^>]*)?/?>").unwrap())
}

fn run_content_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // A self-closing `<w:t .../>` is empty and must not open a run.
        Regex::new(r"(?s)<w:t(?:\s(?:[^>]*[^/>])?)?>(.*?)</w:t>|<w:(tab|br|cr)(?:\s[^>]*)?/>")
            .unwrap()
    })
}

/// Paragraph texts of a WordprocessingML document, in order.
///
/// Paragraphs without any run text are skipped. Run texts are decoded and
/// concatenated without separators; `<w:tab/>` becomes a tab and
/// `<w:br/>`/`<w:cr/>` a newline.
pub fn docx_paragraphs(xml: &str) -> Vec<String> {
    paragraph_boundary_regex()
        .split(xml)
        .filter_map(|chunk| {
            let mut text = String::new();
            let mut has_runs = false;
            for caps in run_content_regex().captures_iter(chunk) {
                has_runs = true;
                if let Some(content) = caps.get(1) {
                    text.push_str(&decode_xml_entities(content.as_str()));
                } else if let Some(tag) = caps.get(2) {
                    text.push(if tag.as_str() == "tab" { '\t' } else { '\n' });
                }
            }
            has_runs.then_some(text)
        })
        .collect()
}

/// Extract text from a DOCX buffer.
///
/// A missing `word/document.xml` is a reported outcome, not an error.
/// Unsupported compression or an oversized/corrupt entry is an error.
pub fn extract_docx(data: &[u8], options: &ExtractOptions) -> Result<ExtractionResult> {
    if !is_zip_bytes(data) {
        log::debug!("DOCX upload does not start with a ZIP local header");
    }
    let Some(entry) = zip::find_entry(data, DOCX_ENTRY) else {
        log::debug!("{} not found in archive of {} bytes", DOCX_ENTRY, data.len());
        return Ok(ExtractionResult::failed("docx", NOT_FOUND_WARNING));
    };

    let xml_bytes = entry.decompress(options.max_decompressed_bytes)?;
    let xml = String::from_utf8_lossy(&xml_bytes);
    let paragraphs = docx_paragraphs(&xml);
    let text = normalize_text(&paragraphs.join("\n"));

    let paragraph_count = paragraphs.iter().filter(|p| !p.trim().is_empty()).count();
    let mut result = ExtractionResult::new(text, "docx")
        .with_meta("paragraph_count", paragraph_count)
        .with_meta("compression", entry.compression_name());

    if result.text.is_empty() {
        result.push_warning(NO_TEXT_WARNING);
    }
    Ok(result)
}

/// DOCX text extractor.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    _private: (),
}

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for DocxExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, bytes: &[u8], options: &ExtractOptions) -> Result<ExtractionResult> {
        extract_docx(bytes, options)
    }
}
