//! Format extractors and the registry that dispatches to them.
//!
//! Each supported format implements [`TextExtractor`]. The
//! [`ExtractorRegistry`] maps lowercase file extensions to extractors so
//! callers can plug in additional formats.
//!
//! # Example
//!
//! ```
//! use unresume::extract::{ExtractorRegistry, TextExtractor};
//! use unresume::ExtractOptions;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let txt = registry.get_by_extension("TXT").unwrap();
//! let result = txt.extract(b"  Jane Doe  ", &ExtractOptions::default())?;
//! assert_eq!(result.text, "Jane Doe");
//! # Ok::<(), unresume::Error>(())
//! ```

pub mod docx;
pub mod odt;
pub mod pdf;
pub mod rtf;
pub mod txt;

pub use docx::{docx_paragraphs, extract_docx, DocxExtractor, DOCX_ENTRY};
pub use odt::{extract_odt, odt_paragraphs, OdtExtractor, ODT_ENTRY};
pub use pdf::{
    decode_pdf_string, extract_pdf, scan_show_operators, PdfExtractor, ShowOperator, ShowToken,
};
pub use rtf::{extract_rtf, rtf_to_text, RtfExtractor};
pub use txt::{extract_txt, TxtExtractor};

use crate::error::Result;
use crate::model::ExtractionResult;
use crate::options::ExtractOptions;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for format extractors.
///
/// Implement this trait to add support for a new document format.
/// Implementations may return `Err` for structural failures; the
/// [`crate::Extractor`] turns those into warnings.
pub trait TextExtractor: Send + Sync {
    /// Get the supported file extensions for this extractor.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// Extract text from raw file bytes.
    fn extract(&self, bytes: &[u8], options: &ExtractOptions) -> Result<ExtractionResult>;

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for format extractors.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
    by_name: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in extractors (PDF, DOCX, ODT, RTF, TXT).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExtractor::new()));
        registry.register(Arc::new(DocxExtractor::new()));
        registry.register(Arc::new(OdtExtractor::new()));
        registry.register(Arc::new(RtfExtractor::new()));
        registry.register(Arc::new(TxtExtractor::new()));
        registry
    }

    /// Register an extractor for all its supported extensions.
    ///
    /// A later registration replaces an earlier one for the same extension.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        for ext in extractor.supported_extensions() {
            self.extractors.insert(ext.to_lowercase(), extractor.clone());
        }
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get an extractor by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn TextExtractor>> {
        self.extractors.get(&ext.to_lowercase()).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.extractors.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extractors.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extensions", &self.supported_extensions())
            .finish()
    }
}
