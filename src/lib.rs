//! # unresume
//!
//! Dependency-light text extraction for uploaded resumes.
//!
//! Given the raw bytes of an upload and its filename, this library returns
//! the plain text, a small metadata map and a list of quality warnings. It
//! never calls out to external services and never fails on bad input:
//! malformed or unsupported files produce empty text plus warnings.
//!
//! ## Quick Start
//!
//! ```
//! use unresume::extract_document;
//!
//! let result = extract_document(b"BT (Jane Doe) Tj ET", "cv.pdf");
//! assert_eq!(result.text, "Jane Doe");
//! assert_eq!(result.detected_type(), Some("pdf"));
//! assert!(result.has_warning("Very short extraction"));
//! ```
//!
//! ## Features
//!
//! - **PDF**: text show operators (`Tj`, `TJ`), including FlateDecode streams
//! - **DOCX / ODT**: body XML read straight out of the ZIP container
//! - **RTF**: control words and groups stripped, escapes decoded
//! - **TXT**: lossy UTF-8 decoding
//! - **Quality warnings**: short text, low alphabetic ratio, symbol noise
//! - **Parallel batches**: Uses Rayon for many uploads at once

pub mod assemble;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod options;
pub mod quality;
pub mod render;
pub mod zip;

// Re-export commonly used types
pub use assemble::Extractor;
pub use detect::DocumentFormat;
pub use error::{Error, Result};
pub use extract::{ExtractorRegistry, TextExtractor};
pub use model::{ExtractionResult, InputDocument, Meta};
pub use options::ExtractOptions;
pub use quality::QualityAnalyzer;
pub use render::{to_json, JsonFormat};

use std::path::Path;

/// Extract text from an upload with default options.
///
/// # Arguments
///
/// * `bytes` - File content
/// * `filename` - Original filename; only its extension is used
///
/// # Example
///
/// ```
/// use unresume::extract_document;
///
/// let result = extract_document(b"", "photo.png");
/// assert_eq!(result.text, "");
/// assert_eq!(result.warnings[0], "Unsupported file type: .png");
/// ```
pub fn extract_document(bytes: &[u8], filename: &str) -> ExtractionResult {
    Extractor::new().extract(bytes, filename)
}

/// Extract text from an upload with custom options.
///
/// # Example
///
/// ```
/// use unresume::{extract_document_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new().with_short_text_threshold(5);
/// let result = extract_document_with_options(b"Jane Doe, engineer", "cv.txt", options);
/// assert!(result.warnings.is_empty());
/// ```
pub fn extract_document_with_options(
    bytes: &[u8],
    filename: &str,
    options: ExtractOptions,
) -> ExtractionResult {
    Extractor::new().with_options(options).extract(bytes, filename)
}

/// Read a file from disk and extract its text.
///
/// Only reading the file can fail; extraction problems become warnings.
///
/// # Example
///
/// ```no_run
/// use unresume::extract_file;
///
/// let result = extract_file("resume.docx")?;
/// println!("{}", result.text);
/// # Ok::<(), unresume::Error>(())
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ExtractionResult> {
    let input = InputDocument::from_path(path)?;
    Ok(Extractor::new().extract_input(&input))
}

/// Extract several uploads in parallel; results keep input order.
pub fn extract_batch(inputs: &[InputDocument]) -> Vec<ExtractionResult> {
    Extractor::new().extract_batch(inputs)
}
