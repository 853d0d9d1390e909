//! Format detection from filenames and magic bytes.

use std::fmt;

/// Document format selected from a filename extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Portable Document Format
    Pdf,
    /// Office Open XML word processing document
    Docx,
    /// Plain text
    Txt,
    /// OpenDocument text
    Odt,
    /// Rich Text Format
    Rtf,
    /// Any other extension, lowercased, without the leading dot
    Other(String),
    /// No extension at all
    Unknown,
}

impl DocumentFormat {
    /// Select a format from a filename.
    ///
    /// # Example
    /// ```
    /// use unresume::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_filename("CV.PDF"), DocumentFormat::Pdf);
    /// assert_eq!(DocumentFormat::from_filename("resume"), DocumentFormat::Unknown);
    /// ```
    pub fn from_filename(filename: &str) -> Self {
        match file_extension(filename) {
            Some(ext) => Self::from_extension(&ext),
            None => Self::Unknown,
        }
    }

    /// Select a format from an extension (with or without the leading dot).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "" => Self::Unknown,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" => Self::Txt,
            "odt" => Self::Odt,
            "rtf" => Self::Rtf,
            _ => Self::Other(ext),
        }
    }

    /// Value reported as `meta.detected_type`.
    pub fn detected_type(&self) -> &str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
            Self::Odt => "odt",
            Self::Rtf => "rtf",
            Self::Other(ext) => ext,
            Self::Unknown => "unknown",
        }
    }

    /// Extension used for extractor lookup, if any.
    pub fn extension(&self) -> Option<&str> {
        match self {
            Self::Unknown => None,
            _ => Some(self.detected_type()),
        }
    }

    /// Whether one of the built-in extractors handles this format.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_) | Self::Unknown)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.detected_type())
    }
}

/// Lowercased extension of the last path component, without the dot.
///
/// Both `/` and `\` separate components since upload filenames may come
/// from any client OS. Dotfiles (`.docx`) and trailing dots (`cv.`) have
/// no extension.
pub fn file_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        return None;
    }
    Some(name[dot + 1..].to_lowercase())
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Read the PDF version from a `%PDF-x.y` header.
///
/// Returns `None` when the header is missing or malformed. The header is
/// informational only; extraction never depends on it.
pub fn detect_pdf_version(data: &[u8]) -> Option<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return None;
    }

    let version = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    if is_valid_version(version) {
        Some(String::from_utf8_lossy(version).into_owned())
    } else {
        None
    }
}

fn is_valid_version(version: &[u8]) -> bool {
    version.len() == 3
        && version[0].is_ascii_digit()
        && version[1] == b'.'
        && version[2].is_ascii_digit()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_pdf_version(data).is_some()
}

/// Check if bytes start with a ZIP local file header.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}
