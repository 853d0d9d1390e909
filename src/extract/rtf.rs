//! Rich Text Format extraction.
//!
//! A single pass over the bytes tracks group nesting. Groups that hold
//! no body text (font tables, stylesheets, pictures, `\*` destinations)
//! are skipped; paragraph and tab control words become whitespace and hex
//! and Unicode escapes are decoded.
//!
//! `\'hh` escapes are decoded through the document code page: `\ansi`
//! means Windows-1252 and `\ansicpgN` selects any single-byte Windows code
//! page. Without either, bytes are read as Latin-1.

use crate::error::Result;
use crate::model::ExtractionResult;
use crate::normalize::normalize_text;
use crate::options::ExtractOptions;
use encoding_rs::{Encoding, WINDOWS_1252};

use super::TextExtractor;

/// Warning emitted when no text was recovered.
pub const NO_TEXT_WARNING: &str = "No text extracted from RTF.";

/// Warning emitted when the buffer lacks the `{\rtf` header.
pub const NOT_RTF_WARNING: &str = "File does not look like RTF.";

/// Destinations whose content is never body text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
    "listtable",
    "listoverridetable",
    "revtbl",
    "rsidtbl",
    "generator",
    "xmlnstbl",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "filetbl",
];

#[derive(Debug, Clone, Copy)]
struct GroupState {
    skip: bool,
    unicode_skip: usize,
}

struct RtfReader<'a> {
    data: &'a [u8],
    pos: usize,
    out: String,
    state: GroupState,
    stack: Vec<GroupState>,
    /// Fallback characters still to drop after a `\u` escape.
    pending_skip: usize,
    /// Code page for `\'hh` escapes; `None` reads them as Latin-1.
    codepage: Option<&'static Encoding>,
}

impl<'a> RtfReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            out: String::new(),
            state: GroupState {
                skip: false,
                unicode_skip: 1,
            },
            stack: Vec::new(),
            pending_skip: 0,
            codepage: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn emit(&mut self, ch: char) {
        if self.pending_skip > 0 {
            self.pending_skip -= 1;
            return;
        }
        if !self.state.skip {
            self.out.push(ch);
        }
    }

    fn emit_control(&mut self, text: &str) {
        self.pending_skip = 0;
        if !self.state.skip {
            self.out.push_str(text);
        }
    }

    fn run(mut self) -> String {
        while let Some(byte) = self.peek() {
            self.pos += 1;
            match byte {
                b'{' => {
                    self.stack.push(self.state);
                    self.pending_skip = 0;
                }
                b'}' => {
                    if let Some(state) = self.stack.pop() {
                        self.state = state;
                    }
                    self.pending_skip = 0;
                }
                b'\\' => self.control(),
                b'\r' | b'\n' => {}
                _ => self.emit(byte as char),
            }
        }
        self.out
    }

    fn at_group_start(&self) -> bool {
        // Position just past the backslash; the group opened right before it.
        self.pos >= 2 && self.data[self.pos - 2] == b'{'
    }

    fn control(&mut self) {
        let Some(next) = self.peek() else {
            return;
        };

        if !next.is_ascii_alphabetic() {
            self.pos += 1;
            match next {
                b'\\' | b'{' | b'}' => self.emit(next as char),
                b'\'' => self.hex_escape(),
                b'*' => self.state.skip = true,
                b'~' => self.emit('\u{A0}'),
                b'-' => {}
                b'_' => self.emit('-'),
                b'\r' | b'\n' => self.emit_control("\n"),
                _ => {}
            }
            return;
        }

        let group_start = self.at_group_start();
        let word_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let word = String::from_utf8_lossy(&self.data[word_start..self.pos]).into_owned();

        let param_start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let param = std::str::from_utf8(&self.data[param_start..self.pos])
            .ok()
            .and_then(|s| s.parse::<i64>().ok());
        if self.peek() == Some(b' ') {
            self.pos += 1;
        }

        match word.as_str() {
            "par" | "line" | "sect" | "page" | "row" => self.emit_control("\n"),
            "tab" | "cell" => self.emit_control("\t"),
            "emdash" => self.emit('\u{2014}'),
            "endash" => self.emit('\u{2013}'),
            "bullet" => self.emit('\u{2022}'),
            "lquote" => self.emit('\u{2018}'),
            "rquote" => self.emit('\u{2019}'),
            "ldblquote" => self.emit('\u{201C}'),
            "rdblquote" => self.emit('\u{201D}'),
            "ansi" => self.codepage = Some(WINDOWS_1252),
            "mac" | "pc" | "pca" => self.codepage = None,
            "ansicpg" => self.codepage = param.and_then(windows_codepage),
            "uc" => {
                self.state.unicode_skip = param.unwrap_or(1).clamp(0, 16) as usize;
            }
            "u" => {
                if let Some(value) = param {
                    // Negative values encode code units above 0x7FFF.
                    let code = if value < 0 { value + 65536 } else { value };
                    let ch = u32::try_from(code)
                        .ok()
                        .and_then(char::from_u32)
                        .unwrap_or('\u{FFFD}');
                    self.pending_skip = 0;
                    self.emit(ch);
                    self.pending_skip = self.state.unicode_skip;
                }
            }
            _ => {
                if group_start && SKIPPED_DESTINATIONS.contains(&word.as_str()) {
                    self.state.skip = true;
                }
            }
        }
    }

    fn hex_escape(&mut self) {
        let end = (self.pos + 2).min(self.data.len());
        let hex = &self.data[self.pos..end];
        let value = std::str::from_utf8(hex)
            .ok()
            .and_then(|s| u8::from_str_radix(s, 16).ok());
        if let Some(value) = value {
            self.pos = end;
            let ch = self.decode_byte(value);
            self.emit(ch);
        }
    }

    fn decode_byte(&self, byte: u8) -> char {
        let Some(encoding) = self.codepage else {
            return byte as char;
        };
        let bytes = [byte];
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes);
        decoded.chars().next().unwrap_or(byte as char)
    }
}

/// Single-byte Windows code page for an `\ansicpg` number.
fn windows_codepage(number: i64) -> Option<&'static Encoding> {
    let label = format!("windows-{}", number);
    Encoding::for_label(label.as_bytes()).filter(|encoding| encoding.is_single_byte())
}

/// Convert RTF source to plain text (not yet normalized).
pub fn rtf_to_text(data: &[u8]) -> String {
    RtfReader::new(data).run()
}

/// Extract text from an RTF buffer. Never fails.
pub fn extract_rtf(data: &[u8]) -> ExtractionResult {
    let text = normalize_text(&rtf_to_text(data));
    let mut result = ExtractionResult::new(text, "rtf");

    if !data.starts_with(b"{\\rtf") {
        result.push_warning(NOT_RTF_WARNING);
    }
    if result.text.is_empty() {
        result.push_warning(NO_TEXT_WARNING);
    }
    result
}

/// RTF text extractor.
#[derive(Debug, Clone, Default)]
pub struct RtfExtractor {
    _private: (),
}

impl RtfExtractor {
    /// Create a new RTF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for RtfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["rtf"]
    }

    fn name(&self) -> &str {
        "rtf"
    }

    fn extract(&self, bytes: &[u8], _options: &ExtractOptions) -> Result<ExtractionResult> {
        Ok(extract_rtf(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = br"{\rtf1\ansi\deff0{\fonttbl{\f0\froman Times New Roman;}}
{\colortbl;\red0\green0\blue0;}
{\*\generator Riched20 10.0;}\viewkind4\uc1
\pard\b Jane Doe\b0\par
Caf\'e9 owner \endash  10 years\par
{\info{\title Resume}}Skills:\tab Rust\par
}";

    #[test]
    fn test_rtf_to_text() {
        let result = extract_rtf(SAMPLE);
        assert_eq!(
            result.text,
            "Jane Doe\nCafé owner \u{2013} 10 years\nSkills: Rust"
        );
        assert!(result.warnings.is_empty());
        assert_eq!(result.detected_type(), Some("rtf"));
    }

    #[test]
    fn test_unicode_escape_skips_fallback() {
        let text = rtf_to_text(br"{\rtf1\uc1 Z\u252?rich\par}");
        assert_eq!(text, "Zürich\n");
    }

    #[test]
    fn test_negative_unicode_escape() {
        let text = rtf_to_text(br"{\rtf1\uc1 \u-3913?}");
        assert_eq!(text, "\u{F0B7}");
    }

    #[test]
    fn test_cp1252_hex_escapes() {
        let text = rtf_to_text(br"{\rtf1\ansi\ansicpg1252 \'93Lead\'94 \'96 Rust\'85}");
        assert_eq!(text, "\u{201C}Lead\u{201D} \u{2013} Rust\u{2026}");
    }

    #[test]
    fn test_ansi_without_codepage_is_cp1252() {
        assert_eq!(rtf_to_text(br"{\rtf1\ansi \'80\'e9}"), "\u{20AC}\u{E9}");
    }

    #[test]
    fn test_other_single_byte_codepage() {
        let text = rtf_to_text(br"{\rtf1\ansi\ansicpg1251 \'c8\'e2\'e0\'ed}");
        assert_eq!(text, "\u{418}\u{432}\u{430}\u{43D}");
    }

    #[test]
    fn test_hex_escape_without_charset_is_latin1() {
        assert_eq!(rtf_to_text(br"{\rtf1 \'93}"), "\u{93}");
    }

    #[test]
    fn test_escaped_braces_and_backslash() {
        let text = rtf_to_text(br"{\rtf1 a\{b\}c\\d}");
        assert_eq!(text, "a{b}c\\d");
    }

    #[test]
    fn test_not_rtf_still_extracts() {
        let result = extract_rtf(b"just some text");
        assert_eq!(result.text, "just some text");
        assert_eq!(result.warnings, vec![NOT_RTF_WARNING]);
    }

    #[test]
    fn test_empty_rtf() {
        let result = extract_rtf(br"{\rtf1{\fonttbl{\f0 Arial;}}}");
        assert_eq!(result.text, "");
        assert_eq!(result.warnings, vec![NO_TEXT_WARNING]);
    }

    #[test]
    fn test_unbalanced_braces_do_not_panic() {
        let text = rtf_to_text(br"}}}{\rtf1 text\");
        assert_eq!(text, "text");
    }
}
