//! Input and output records of an extraction call.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Metadata attached to an extraction result.
///
/// A `BTreeMap` keeps key order stable so that identical inputs produce
/// byte-identical serialized results.
pub type Meta = BTreeMap<String, Value>;

/// Raw upload handed to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// File content
    pub bytes: Vec<u8>,
    /// Original filename, used for format selection only
    pub filename: String,
}

impl InputDocument {
    /// Create an input document from bytes and a filename.
    pub fn new(bytes: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
        }
    }

    /// Read a file from disk, keeping its file name for format selection.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { bytes, filename })
    }
}

/// Uniform result of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted, normalized text (may be empty)
    pub text: String,

    /// Structural metadata; always contains `detected_type`
    pub meta: Meta,

    /// Ordered, deduplicated warnings
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Create a result with the given text and detected type.
    pub fn new(text: impl Into<String>, detected_type: &str) -> Self {
        let mut meta = Meta::new();
        meta.insert("detected_type".to_string(), Value::from(detected_type));
        Self {
            text: text.into(),
            meta,
            warnings: Vec::new(),
        }
    }

    /// Create an empty-text result carrying a single warning.
    pub fn failed(detected_type: &str, warning: impl Into<String>) -> Self {
        Self::new(String::new(), detected_type).with_warning(warning)
    }

    /// Append a warning unless it is already present.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.push_warning(warning);
        self
    }

    /// Set a metadata entry.
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }

    /// Append a warning unless it is already present.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    /// The `detected_type` metadata value.
    pub fn detected_type(&self) -> Option<&str> {
        self.meta.get("detected_type").and_then(Value::as_str)
    }

    /// Whether any warning contains the given text.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }

    /// Whether no text was extracted.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Record word and character counts of the current text.
    pub fn count_text(&mut self) {
        // Word count: whitespace-separated tokens
        let words = self.text.split_whitespace().count();
        // Character count: non-whitespace characters
        let chars = self.text.chars().filter(|c| !c.is_whitespace()).count();
        self.meta.insert("word_count".to_string(), Value::from(words));
        self.meta.insert("char_count".to_string(), Value::from(chars));
    }
}
