//! OpenDocument text extraction.
//!
//! The body of an `.odt` lives in `content.xml`. Paragraphs and headings
//! are `<text:p>` and `<text:h>`; their text is mixed content with inline
//! spans, so every tag inside a paragraph is dropped except the few that
//! stand for whitespace.

use crate::error::Result;
use crate::model::ExtractionResult;
use crate::normalize::{decode_xml_entities, normalize_text};
use crate::options::ExtractOptions;
use crate::zip;
use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::TextExtractor;

/// Archive entry holding the document body.
pub const ODT_ENTRY: &str = "content.xml";

/// Warning emitted when the body holds no text.
pub const NO_TEXT_WARNING: &str = "No text extracted from ODT.";

/// Warning emitted when the archive has no document body.
pub const NOT_FOUND_WARNING: &str = "ODT content not found.";

fn paragraph_boundary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(/?)text:(?:p|h)(?:\s[^>]*?)?(/?)>").unwrap())
}

fn inline_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(/?)([A-Za-z0-9_:.-]+)([^>]*)>").unwrap())
}

fn space_count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"text:c\s*=\s*"(\d+)""#).unwrap())
}

fn inline_replacement(caps: &Captures<'_>) -> String {
    if !caps[1].is_empty() {
        return String::new();
    }
    match &caps[2] {
        "text:s" => {
            let count = space_count_regex()
                .captures(&caps[3])
                .and_then(|c| c[1].parse::<usize>().ok())
                .unwrap_or(1);
            " ".repeat(count.min(1024))
        }
        "text:tab" => "\t".to_string(),
        "text:line-break" => "\n".to_string(),
        _ => String::new(),
    }
}

fn segment_text(segment: &str) -> String {
    let plain = inline_tag_regex().replace_all(segment, inline_replacement);
    decode_xml_entities(&plain)
}

/// Paragraph and heading texts of an ODF `content.xml`, in order.
///
/// Text outside any paragraph is ignored. When a paragraph holds a nested
/// one, the text before, inside and after the nested paragraph comes out
/// as separate entries. Entries with no visible text are skipped.
pub fn odt_paragraphs(xml: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut depth = 0usize;
    let mut last = 0;

    for caps in paragraph_boundary_regex().captures_iter(xml) {
        let Some(tag) = caps.get(0) else {
            continue;
        };
        if depth > 0 {
            let text = segment_text(&xml[last..tag.start()]);
            if !text.trim().is_empty() {
                paragraphs.push(text);
            }
        }
        if !caps[1].is_empty() {
            depth = depth.saturating_sub(1);
        } else if caps[2].is_empty() {
            depth += 1;
        }
        last = tag.end();
    }
    paragraphs
}

/// Extract text from an ODT buffer.
pub fn extract_odt(data: &[u8], options: &ExtractOptions) -> Result<ExtractionResult> {
    let Some(entry) = zip::find_entry(data, ODT_ENTRY) else {
        return Ok(ExtractionResult::failed("odt", NOT_FOUND_WARNING));
    };

    let xml_bytes = entry.decompress(options.max_decompressed_bytes)?;
    let xml = String::from_utf8_lossy(&xml_bytes);
    let paragraphs = odt_paragraphs(&xml);
    let text = normalize_text(&paragraphs.join("\n"));

    let paragraph_count = paragraphs.iter().filter(|p| !p.trim().is_empty()).count();
    let mut result = ExtractionResult::new(text, "odt")
        .with_meta("paragraph_count", paragraph_count)
        .with_meta("compression", entry.compression_name());

    if result.text.is_empty() {
        result.push_warning(NO_TEXT_WARNING);
    }
    Ok(result)
}

/// OpenDocument text extractor.
#[derive(Debug, Clone, Default)]
pub struct OdtExtractor {
    _private: (),
}

impl OdtExtractor {
    /// Create a new ODT extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for OdtExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["odt"]
    }

    fn name(&self) -> &str {
        "odt"
    }

    fn extract(&self, bytes: &[u8], options: &ExtractOptions) -> Result<ExtractionResult> {
        extract_odt(bytes, options)
    }
}
