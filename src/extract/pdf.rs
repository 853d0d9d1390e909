//! PDF text extraction by scanning for text-showing operators.
//!
//! This is not a PDF object-graph parser. The buffer is read as Latin-1
//! and searched for `(...) Tj` and `[...] TJ` invocations; the string
//! literals they carry are decoded and concatenated in order. Fonts with
//! custom encodings or ToUnicode maps are not decoded, so such documents
//! may come out garbled.
//!
//! Content streams compressed with `/FlateDecode` are inflated and scanned
//! as well (see [`ExtractOptions::inflate_pdf_streams`]).

use crate::detect::{detect_pdf_version, is_pdf_bytes};
use crate::error::Result;
use crate::model::ExtractionResult;
use crate::normalize::normalize_text;
use crate::options::ExtractOptions;
use crate::zip::read_bounded;
use flate2::read::ZlibDecoder;
use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use super::TextExtractor;

/// Warning emitted when no show operator produced text.
pub const NO_TEXT_WARNING: &str =
    "No text extracted from PDF. Consider enabling an external OCR service.";

/// Stream dictionary markers for streams that never hold page text.
const NON_TEXT_STREAM_MARKERS: &[&[u8]] = &[
    b"/Image",
    b"/XRef",
    b"/ObjStm",
    b"/FontFile",
    b"/Length1",
    b"/Type1C",
    b"/CIDFontType0C",
    b"/OpenType",
    b"/Metadata",
];

fn show_operator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)(\[(?:\\.|[^\]])*\]|\((?:\\.|[^\\])*?\))\s*(TJ|Tj)").unwrap()
    })
}

fn string_literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\((?:\\.|[^\\])*?\)").unwrap())
}

fn page_object_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/Type\s*/Page\b").unwrap())
}

fn stream_keyword_regex() -> &'static BytesRegex {
    static RE: OnceLock<BytesRegex> = OnceLock::new();
    RE.get_or_init(|| BytesRegex::new(r"(?-u)\bstream\r?\n").unwrap())
}

/// Text-showing operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOperator {
    /// `Tj`: show a single string
    ShowText,
    /// `TJ`: show an array of strings and kerning adjustments
    ShowTextArray,
}

impl ShowOperator {
    fn parse(op: &str) -> Self {
        if op == "TJ" {
            Self::ShowTextArray
        } else {
            Self::ShowText
        }
    }

    /// Operator name as written in the content stream.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowText => "Tj",
            Self::ShowTextArray => "TJ",
        }
    }
}

/// One operator invocation found in a content stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowToken<'a> {
    /// The operator
    pub operator: ShowOperator,
    /// Operand as written: `(literal)` or `[array]`
    pub payload: &'a str,
}

impl ShowToken<'_> {
    /// Decoded strings carried by this invocation, in order.
    ///
    /// Arrays yield only their string literals; kerning numbers are
    /// dropped. A lone literal is only shown by `Tj`.
    pub fn strings(&self) -> Vec<String> {
        if self.payload.starts_with('[') {
            string_literal_regex()
                .find_iter(self.payload)
                .map(|m| decode_pdf_string(strip_parens(m.as_str())))
                .collect()
        } else if self.operator == ShowOperator::ShowText {
            vec![decode_pdf_string(strip_parens(self.payload))]
        } else {
            Vec::new()
        }
    }
}

fn strip_parens(literal: &str) -> &str {
    // Both delimiters are single ASCII bytes.
    &literal[1..literal.len() - 1]
}

/// Find every `Tj`/`TJ` invocation in `content`, in order.
pub fn scan_show_operators(content: &str) -> Vec<ShowToken<'_>> {
    show_operator_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let payload = caps.get(1)?.as_str();
            let operator = ShowOperator::parse(caps.get(2)?.as_str());
            Some(ShowToken { operator, payload })
        })
        .collect()
}

/// Decode the body of a PDF string literal (without the parentheses).
///
/// Handles `\n \r \t \b \f \( \) \\`, one to three digit octal codes and
/// backslash line continuations. Any other escaped character stands for
/// itself.
pub fn decode_pdf_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            '(' | ')' | '\\' => out.push(next),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' => {}
            '0'..='7' => {
                let mut code = next as u32 - '0' as u32;
                for _ in 0..2 {
                    match chars.peek() {
                        Some(&d @ '0'..='7') => {
                            code = code * 8 + (d as u32 - '0' as u32);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if let Some(decoded) = char::from_u32(code) {
                    out.push(decoded);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Decode bytes one-to-one as Latin-1.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Byte ranges of FlateDecode stream bodies that may carry page content.
fn flate_streams(data: &[u8]) -> Vec<Range<usize>> {
    let mut streams = Vec::new();
    let mut search_from = 0;

    while let Some(m) = stream_keyword_regex().find_at(data, search_from) {
        let body_start = m.end();
        let Some(len) = find_bytes(&data[body_start..], b"endstream") else {
            break;
        };
        let body_end = body_start + len;
        search_from = body_end + b"endstream".len();

        let dict_start = rfind_bytes(&data[..m.start()], b"obj").unwrap_or(0);
        let dict = &data[dict_start..m.start()];
        if find_bytes(dict, b"/FlateDecode").is_none()
            || NON_TEXT_STREAM_MARKERS
                .iter()
                .any(|marker| find_bytes(dict, marker).is_some())
        {
            continue;
        }

        // The zlib decoder stops at its own end marker, so the EOL before
        // `endstream` can stay.
        streams.push(body_start..body_end);
    }
    streams
}

/// Inflate one FlateDecode stream body; `None` if it is corrupt or too large.
fn inflate_stream(body: &[u8], index: usize, limit: usize) -> Option<String> {
    let entry = format!("content stream {}", index);
    match read_bounded(ZlibDecoder::new(body), limit, &entry) {
        Ok(inflated) => Some(latin1(&inflated)),
        Err(e) => {
            log::warn!("Skipping PDF {}: {}", entry, e);
            None
        }
    }
}

/// Scannable slice of a PDF buffer.
enum Segment {
    Raw(String),
    Inflated(String),
}

impl Segment {
    fn text(&self) -> &str {
        match self {
            Self::Raw(text) | Self::Inflated(text) => text,
        }
    }
}

/// Split the buffer into scannable text in file order.
///
/// Bytes outside FlateDecode streams are read as Latin-1. Stream bodies are
/// replaced by their inflated content, or dropped when inflation is off or
/// fails, so a body is never scanned as raw bytes.
fn content_segments(data: &[u8], options: &ExtractOptions) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for (index, range) in flate_streams(data).into_iter().enumerate() {
        segments.push(Segment::Raw(latin1(&data[cursor..range.start])));
        if options.inflate_pdf_streams {
            if let Some(content) =
                inflate_stream(&data[range.clone()], index, options.max_decompressed_bytes)
            {
                segments.push(Segment::Inflated(content));
            }
        }
        cursor = range.end;
    }
    segments.push(Segment::Raw(latin1(&data[cursor..])));
    segments
}

/// Extract text from a PDF buffer. Never fails.
pub fn extract_pdf(data: &[u8], options: &ExtractOptions) -> ExtractionResult {
    if !is_pdf_bytes(data) {
        log::debug!("no %PDF header, scanning {} bytes anyway", data.len());
    }
    let segments = content_segments(data, options);

    let mut parts: Vec<String> = Vec::new();
    let mut operator_count = 0usize;
    let mut inflated_count = 0usize;
    let mut page_count = 0usize;
    for segment in &segments {
        match segment {
            Segment::Raw(raw) => page_count += page_object_regex().find_iter(raw).count(),
            Segment::Inflated(_) => inflated_count += 1,
        }
        for token in scan_show_operators(segment.text()) {
            operator_count += 1;
            parts.extend(token.strings());
        }
    }
    log::debug!(
        "PDF scan: {} show operators, {} inflated streams",
        operator_count,
        inflated_count
    );

    let text = normalize_text(&parts.concat());
    let mut result = ExtractionResult::new(text, "pdf")
        .with_meta("show_operators", operator_count)
        .with_meta("inflated_streams", inflated_count);

    if let Some(version) = detect_pdf_version(data) {
        result = result.with_meta("pdf_version", version);
    }
    if page_count > 0 {
        result = result.with_meta("page_count", page_count);
    }

    if result.text.is_empty() {
        result.push_warning(NO_TEXT_WARNING);
    }
    result
}

/// PDF text extractor.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    _private: (),
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, bytes: &[u8], options: &ExtractOptions) -> Result<ExtractionResult> {
        Ok(extract_pdf(bytes, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn extract(data: &[u8]) -> ExtractionResult {
        extract_pdf(data, &ExtractOptions::default())
    }

    #[test]
    fn test_single_show() {
        let result = extract(b"BT /F1 12 Tf (Hello) Tj ET");
        assert_eq!(result.text, "Hello");
        assert_eq!(result.detected_type(), Some("pdf"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_array_show_drops_kerning() {
        let result = extract(b"BT [(Hel)-20(lo)] TJ ET");
        assert_eq!(result.text, "Hello");
    }

    #[test]
    fn test_parts_join_without_separator() {
        let result = extract(b"(Jane) Tj\n(Doe) Tj\n[(Eng) 120 (ineer)] TJ");
        assert_eq!(result.text, "JaneDoeEngineer");
        assert_eq!(result.meta["show_operators"], 3);
    }

    #[test]
    fn test_operator_across_newline() {
        let result = extract(b"(Wrapped)\n  Tj");
        assert_eq!(result.text, "Wrapped");
    }

    #[test]
    fn test_literal_with_tj_array_operator_is_ignored() {
        let result = extract(b"(ignored) TJ");
        assert_eq!(result.text, "");
    }

    #[test]
    fn test_escape_newline() {
        let result = extract(br"(Line1\nLine2) Tj");
        assert_eq!(result.text, "Line1\nLine2");
    }

    #[test]
    fn test_escaped_parens_in_literal() {
        let result = extract(br"(f\(x\) = y) Tj");
        assert_eq!(result.text, "f(x) = y");
    }

    #[test]
    fn test_decode_pdf_string_escapes() {
        assert_eq!(decode_pdf_string(r"a\tb"), "a\tb");
        assert_eq!(decode_pdf_string(r"a\\b"), "a\\b");
        assert_eq!(decode_pdf_string(r"\b\f"), "\u{08}\u{0C}");
        assert_eq!(decode_pdf_string(r"\101\102C"), "ABC");
        assert_eq!(decode_pdf_string(r"\0537"), "+7");
        assert_eq!(decode_pdf_string(r"\7"), "\u{07}");
        assert_eq!(decode_pdf_string(r"\q"), "q");
        assert_eq!(decode_pdf_string("trailing\\"), "trailing\\");
        assert_eq!(decode_pdf_string("line\\\ncontinued"), "linecontinued");
        assert_eq!(decode_pdf_string("line\\\r\ncontinued"), "linecontinued");
    }

    #[test]
    fn test_latin1_bytes() {
        let result = extract(b"(Caf\xe9) Tj");
        assert_eq!(result.text, "Café");
    }

    #[test]
    fn test_empty_pdf_warns() {
        let result = extract(b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF");
        assert_eq!(result.text, "");
        assert_eq!(result.warnings, vec![NO_TEXT_WARNING]);
        assert_eq!(result.meta["pdf_version"], "1.4");
    }

    #[test]
    fn test_garbage_input_does_not_fail() {
        let result = extract(&[0xff, 0x00, b'(', b'[', 0x80, b'\\']);
        assert_eq!(result.text, "");
        assert!(result.has_warning("No text extracted from PDF"));
    }

    #[test]
    fn test_whitespace_normalized() {
        let result = extract(b"(  Senior    Developer  ) Tj (\\n\\n\\n\\nSkills) Tj");
        assert_eq!(result.text, "Senior Developer \n\nSkills");
    }

    #[test]
    fn test_page_count() {
        let data = b"%PDF-1.7\n2 0 obj << /Type /Pages /Count 2 >> endobj\n\
            3 0 obj << /Type /Page >> endobj\n4 0 obj << /Type/Page >> endobj\n(x) Tj";
        let result = extract(data);
        assert_eq!(result.meta["page_count"], 2);
    }

    fn flate_pdf(content: &str) -> Vec<u8> {
        flate_pdf_with(content, Compression::default())
    }

    fn flate_pdf_with(content: &str, level: Compression) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), level);
        encoder.write_all(content.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut pdf = Vec::new();
        pdf.extend_from_slice(b"%PDF-1.5\n4 0 obj\n<< /Length ");
        pdf.extend_from_slice(compressed.len().to_string().as_bytes());
        pdf.extend_from_slice(b" /Filter /FlateDecode >>\nstream\n");
        pdf.extend_from_slice(&compressed);
        pdf.extend_from_slice(b"\nendstream\nendobj\n%%EOF\n");
        pdf
    }

    #[test]
    fn test_flate_stream_inflated() {
        let pdf = flate_pdf("BT /F1 11 Tf 72 700 Td (Compressed) Tj [( te)5(xt)] TJ ET");
        let result = extract(&pdf);
        assert_eq!(result.text, "Compressed text");
        assert_eq!(result.meta["inflated_streams"], 1);
    }

    #[test]
    fn test_stored_block_stream_scanned_once() {
        let pdf = flate_pdf_with("BT (Jane Doe) Tj ET", Compression::none());
        let result = extract(&pdf);
        assert_eq!(result.text, "Jane Doe");
        assert_eq!(result.meta["show_operators"], 1);
        assert_eq!(result.meta["inflated_streams"], 1);
    }

    #[test]
    fn test_stored_block_stream_not_scanned_when_inflation_disabled() {
        let pdf = flate_pdf_with("BT (Jane Doe) Tj ET", Compression::none());
        let options = ExtractOptions::new().with_pdf_stream_inflation(false);
        let result = extract_pdf(&pdf, &options);
        assert_eq!(result.text, "");
        assert_eq!(result.meta["show_operators"], 0);
    }

    #[test]
    fn test_raw_and_inflated_text_keep_file_order() {
        let mut pdf = b"(Before ) Tj\n".to_vec();
        pdf.extend_from_slice(&flate_pdf_with("(Inside) Tj", Compression::none()));
        pdf.extend_from_slice(b"( After) Tj\n");
        let result = extract(&pdf);
        assert_eq!(result.text, "Before Inside After");
        assert_eq!(result.meta["show_operators"], 3);
    }

    #[test]
    fn test_flate_stream_inflation_disabled() {
        let pdf = flate_pdf("BT (Compressed) Tj ET");
        let options = ExtractOptions::new().with_pdf_stream_inflation(false);
        let result = extract_pdf(&pdf, &options);
        assert_eq!(result.meta["inflated_streams"], 0);
        assert!(result.has_warning("No text extracted from PDF"));
    }

    #[test]
    fn test_image_streams_skipped() {
        let pdf = b"5 0 obj << /Subtype /Image /Filter /FlateDecode >>\nstream\n\x78\x9c\nendstream";
        assert!(flate_streams(pdf).is_empty());
    }

    #[test]
    fn test_flate_stream_ranges() {
        let pdf = b"4 0 obj << /Filter /FlateDecode >>\nstream\nBODY\nendstream";
        let ranges = flate_streams(pdf);
        assert_eq!(ranges.len(), 1);
        assert_eq!(&pdf[ranges[0].clone()], b"BODY\n");
    }

    #[test]
    fn test_scan_tokens() {
        let tokens = scan_show_operators("(a) Tj [(b) 3 (c)] TJ");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].operator, ShowOperator::ShowText);
        assert_eq!(tokens[0].payload, "(a)");
        assert_eq!(tokens[1].operator.as_str(), "TJ");
        assert_eq!(tokens[1].strings(), vec!["b", "c"]);
    }
}
