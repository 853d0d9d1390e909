//! Integration tests for the extractor registry.

use std::sync::Arc;
use unresume::error::Result;
use unresume::extract::{PdfExtractor, TxtExtractor};
use unresume::{ExtractOptions, ExtractionResult, Extractor, ExtractorRegistry, TextExtractor};

/// Mock extractor for testing.
struct MockExtractor {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockExtractor {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }
}

impl TextExtractor for MockExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn extract(&self, bytes: &[u8], _options: &ExtractOptions) -> Result<ExtractionResult> {
        Ok(ExtractionResult::new(
            format!("Extracted {} bytes by {}", bytes.len(), self.name),
            self.name,
        ))
    }
}

#[test]
fn test_registry_new() {
    let registry = ExtractorRegistry::new();

    // Empty registry should support nothing
    assert!(!registry.supports("pdf"));
    assert!(!registry.supports("docx"));
}

#[test]
fn test_registry_with_defaults() {
    let registry = ExtractorRegistry::with_defaults();

    for ext in ["pdf", "docx", "txt", "odt", "rtf"] {
        assert!(registry.supports(ext), "{}", ext);
    }
    assert!(registry.supports("PDF")); // Case insensitive
    assert!(!registry.supports("doc"));
}

#[test]
fn test_registry_register() {
    let mut registry = ExtractorRegistry::new();
    registry.register(Arc::new(MockExtractor::new(vec!["md", "markdown"], "markdown")));

    assert!(registry.supports("md"));
    assert!(registry.supports("markdown"));
    assert!(registry.supports("MD")); // Case insensitive
}

#[test]
fn test_registry_get_by_name() {
    let registry = ExtractorRegistry::with_defaults();

    assert!(registry.get_by_name("docx").is_some());
    assert!(registry.get_by_name("DOCX").is_some()); // Case insensitive
    assert!(registry.get_by_name("unknown").is_none());
}

#[test]
fn test_registry_later_registration_wins() {
    let mut registry = ExtractorRegistry::with_defaults();
    registry.register(Arc::new(MockExtractor::new(vec!["txt"], "custom-txt")));

    let extractor = registry.get_by_extension("txt").unwrap();
    assert_eq!(extractor.name(), "custom-txt");
}

#[test]
fn test_registry_multiple_extractors() {
    let mut registry = ExtractorRegistry::new();

    registry.register(Arc::new(PdfExtractor::new()));
    registry.register(Arc::new(TxtExtractor::new()));
    registry.register(Arc::new(MockExtractor::new(vec!["doc"], "word97")));

    assert_eq!(registry.supported_extensions(), vec!["doc", "pdf", "txt"]);

    let extractor = registry.get_by_name("word97").unwrap();
    assert!(extractor.supports_extension("DOC"));
    assert!(!extractor.supports_extension("docx"));
}

#[test]
fn test_builtin_extractor_names() {
    let registry = ExtractorRegistry::with_defaults();
    for ext in registry.supported_extensions() {
        let extractor = registry.get_by_extension(ext).unwrap();
        assert_eq!(extractor.name(), ext);
        assert_eq!(extractor.supported_extensions(), &[ext]);
    }
}

#[test]
fn test_custom_extractor_through_assembler() {
    let extractor =
        Extractor::new().register(Arc::new(MockExtractor::new(vec!["md"], "markdown")));

    let result = extractor.extract(b"# Jane", "cv.md");
    assert_eq!(result.text, "Extracted 6 bytes by markdown");
    assert_eq!(result.detected_type(), Some("markdown"));
    // Quality warnings still apply to custom extractors.
    assert!(result.has_warning("Very short extraction"));
    assert_eq!(result.meta["word_count"], 5);
}

#[test]
fn test_assembler_with_empty_registry() {
    let extractor = Extractor::new().with_registry(ExtractorRegistry::new());
    let result = extractor.extract(b"(Hello) Tj", "cv.pdf");
    assert_eq!(result.text, "");
    assert_eq!(result.detected_type(), Some("pdf"));
    assert_eq!(result.warnings[0], "Unsupported file type: .pdf");
}
