//! Extraction options and configuration.

/// Default minimum length (in characters) below which a result is flagged as short.
pub const DEFAULT_SHORT_TEXT_THRESHOLD: usize = 300;

/// Default limit for a single decompressed ZIP entry or PDF stream (64 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;

/// Options for extracting text from documents.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Texts shorter than this many characters get a "Very short extraction" warning
    pub short_text_threshold: usize,

    /// Minimum ratio of alphabetic characters before a warning is raised
    pub min_alpha_ratio: f64,

    /// Maximum ratio of symbol characters before a warning is raised
    pub max_symbol_ratio: f64,

    /// Inflate FlateDecode content streams in PDFs and scan them too
    pub inflate_pdf_streams: bool,

    /// Upper bound on bytes produced by a single decompression
    pub max_decompressed_bytes: usize,

    /// Whether batch extraction uses parallel processing
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the short-text threshold.
    pub fn with_short_text_threshold(mut self, chars: usize) -> Self {
        self.short_text_threshold = chars;
        self
    }

    /// Set the minimum alphabetic ratio.
    pub fn with_min_alpha_ratio(mut self, ratio: f64) -> Self {
        self.min_alpha_ratio = ratio;
        self
    }

    /// Set the maximum symbol ratio.
    pub fn with_max_symbol_ratio(mut self, ratio: f64) -> Self {
        self.max_symbol_ratio = ratio;
        self
    }

    /// Enable or disable PDF stream inflation.
    pub fn with_pdf_stream_inflation(mut self, inflate: bool) -> Self {
        self.inflate_pdf_streams = inflate;
        self
    }

    /// Set the decompression limit in bytes.
    pub fn with_max_decompressed_bytes(mut self, bytes: usize) -> Self {
        self.max_decompressed_bytes = bytes;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            short_text_threshold: DEFAULT_SHORT_TEXT_THRESHOLD,
            min_alpha_ratio: 0.5,
            max_symbol_ratio: 0.25,
            inflate_pdf_streams: true,
            max_decompressed_bytes: DEFAULT_MAX_DECOMPRESSED_BYTES,
            parallel: true,
        }
    }
}
