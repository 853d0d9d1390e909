//! Dispatch to format extractors and assemble the final result.

use crate::detect::DocumentFormat;
use crate::extract::{ExtractorRegistry, TextExtractor};
use crate::model::{ExtractionResult, InputDocument};
use crate::options::ExtractOptions;
use crate::quality::{merge_warnings, QualityAnalyzer};
use rayon::prelude::*;
use std::sync::Arc;

/// Warning for filenames without an extension.
pub const UNSUPPORTED_GENERIC_WARNING: &str =
    "Unsupported file type. Please upload PDF, DOCX or TXT resumes.";

/// Extracts text from uploads of any registered format.
///
/// [`Extractor::extract`] never fails: unsupported formats and extractor
/// errors come back as warnings on an otherwise well-formed result.
///
/// # Example
///
/// ```
/// use unresume::Extractor;
///
/// let result = Extractor::new().extract(b"(Hello) Tj", "cv.pdf");
/// assert_eq!(result.text, "Hello");
/// assert_eq!(result.detected_type(), Some("pdf"));
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    registry: ExtractorRegistry,
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with the built-in formats and default options.
    pub fn new() -> Self {
        Self {
            registry: ExtractorRegistry::with_defaults(),
            options: ExtractOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register an additional format extractor.
    pub fn register(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.registry.register(extractor);
        self
    }

    /// Set the short-text threshold.
    pub fn with_short_text_threshold(mut self, chars: usize) -> Self {
        self.options = self.options.with_short_text_threshold(chars);
        self
    }

    /// Set the decompression limit in bytes.
    pub fn with_max_decompressed_bytes(mut self, bytes: usize) -> Self {
        self.options = self.options.with_max_decompressed_bytes(bytes);
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Current options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Current registry.
    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Extract text from raw bytes, selecting the format by filename.
    pub fn extract(&self, bytes: &[u8], filename: &str) -> ExtractionResult {
        let format = DocumentFormat::from_filename(filename);
        let mut result = self.dispatch(bytes, &format);

        let quality = QualityAnalyzer::from_options(&self.options).analyze(&result.text);
        merge_warnings(&mut result.warnings, quality);
        result.count_text();
        result
    }

    /// Extract text from an [`InputDocument`].
    pub fn extract_input(&self, input: &InputDocument) -> ExtractionResult {
        self.extract(&input.bytes, &input.filename)
    }

    /// Extract several documents; results are in input order.
    pub fn extract_batch(&self, inputs: &[InputDocument]) -> Vec<ExtractionResult> {
        if self.options.parallel {
            inputs.par_iter().map(|input| self.extract_input(input)).collect()
        } else {
            inputs.iter().map(|input| self.extract_input(input)).collect()
        }
    }

    fn dispatch(&self, bytes: &[u8], format: &DocumentFormat) -> ExtractionResult {
        let detected_type = format.detected_type();
        let extractor = format
            .extension()
            .and_then(|ext| self.registry.get_by_extension(ext));

        let Some(extractor) = extractor else {
            let warning = match format.extension() {
                Some(ext) => format!("Unsupported file type: .{}", ext),
                None => UNSUPPORTED_GENERIC_WARNING.to_string(),
            };
            log::debug!("no extractor for {}", detected_type);
            return ExtractionResult::failed(detected_type, warning);
        };

        log::debug!(
            "extracting {} bytes as {} with {}",
            bytes.len(),
            detected_type,
            extractor.name()
        );
        match extractor.extract(bytes, &self.options) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("{} extraction failed: {}", detected_type, e);
                ExtractionResult::failed(detected_type, format!("Extraction error: {}", e))
            }
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
