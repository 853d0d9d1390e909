//! Heuristic quality checks over extracted text.

use crate::options::ExtractOptions;

/// Warning emitted when the text is empty.
pub const NO_TEXT_WARNING: &str = "No text extracted.";

/// Warning emitted when few characters are letters.
pub const LOW_ALPHA_WARNING: &str = "Low alphabetic ratio; OCR or encoding issues possible.";

/// Warning emitted when many characters are punctuation or symbols.
pub const HIGH_SYMBOL_WARNING: &str = "High symbol ratio; layout/encoding noise detected.";

/// Flags low-confidence extractions.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityAnalyzer {
    short_text_threshold: usize,
    min_alpha_ratio: f64,
    max_symbol_ratio: f64,
}

impl QualityAnalyzer {
    /// Create an analyzer with explicit thresholds.
    pub fn new(short_text_threshold: usize, min_alpha_ratio: f64, max_symbol_ratio: f64) -> Self {
        Self {
            short_text_threshold,
            min_alpha_ratio,
            max_symbol_ratio,
        }
    }

    /// Create an analyzer from extraction options.
    pub fn from_options(options: &ExtractOptions) -> Self {
        Self::new(
            options.short_text_threshold,
            options.min_alpha_ratio,
            options.max_symbol_ratio,
        )
    }

    /// Warning text for short extractions.
    pub fn short_text_warning(&self) -> String {
        format!(
            "Very short extraction (<{} chars). May be incomplete.",
            self.short_text_threshold
        )
    }

    /// Compute quality warnings for a text.
    ///
    /// Empty text yields only [`NO_TEXT_WARNING`]. Otherwise every check
    /// runs; lengths and ratios count Unicode scalar values of the trimmed
    /// text.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vec![NO_TEXT_WARNING.to_string()];
        }

        let mut warnings = Vec::new();
        let mut total = 0usize;
        let mut alpha = 0usize;
        let mut symbols = 0usize;
        for ch in trimmed.chars() {
            total += 1;
            if ch.is_alphabetic() {
                alpha += 1;
            } else if !(ch.is_alphanumeric() || ch == '_' || ch.is_whitespace()) {
                symbols += 1;
            }
        }

        if total < self.short_text_threshold {
            warnings.push(self.short_text_warning());
        }
        if (alpha as f64) / (total as f64) < self.min_alpha_ratio {
            warnings.push(LOW_ALPHA_WARNING.to_string());
        }
        if (symbols as f64) / (total as f64) > self.max_symbol_ratio {
            warnings.push(HIGH_SYMBOL_WARNING.to_string());
        }
        warnings
    }
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::from_options(&ExtractOptions::default())
    }
}

/// Append `extra` warnings to `warnings`, skipping ones already present.
///
/// Order is first-seen.
pub fn merge_warnings(warnings: &mut Vec<String>, extra: impl IntoIterator<Item = String>) {
    for warning in extra {
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: &str = "Very short extraction (<300 chars). May be incomplete.";

    #[test]
    fn test_empty_text_short_circuits() {
        let analyzer = QualityAnalyzer::default();
        assert_eq!(analyzer.analyze(""), vec![NO_TEXT_WARNING]);
        assert_eq!(analyzer.analyze("  \n\t "), vec![NO_TEXT_WARNING]);
    }

    #[test]
    fn test_short_threshold_boundary() {
        let analyzer = QualityAnalyzer::default();
        assert_eq!(analyzer.analyze(&"a".repeat(299)), vec![SHORT]);
        assert!(analyzer.analyze(&"a".repeat(300)).is_empty());
        assert!(analyzer.analyze(&"a".repeat(301)).is_empty());
    }

    #[test]
    fn test_low_alpha_ratio() {
        let analyzer = QualityAnalyzer::default();
        let text = "1234567890".repeat(40);
        assert_eq!(analyzer.analyze(&text), vec![LOW_ALPHA_WARNING]);
    }

    #[test]
    fn test_high_symbol_ratio_runs_all_checks() {
        let analyzer = QualityAnalyzer::default();
        let warnings = analyzer.analyze("$$$ %%% ###");
        assert_eq!(warnings, vec![SHORT, LOW_ALPHA_WARNING, HIGH_SYMBOL_WARNING]);
    }

    #[test]
    fn test_unicode_letters_count_as_alphabetic() {
        let analyzer = QualityAnalyzer::default();
        let text = "Müller Señor Zoë ".repeat(30);
        assert!(analyzer.analyze(&text).is_empty());
    }

    #[test]
    fn test_custom_threshold_message() {
        let analyzer = QualityAnalyzer::new(50, 0.5, 0.25);
        assert_eq!(
            analyzer.analyze("short words"),
            vec!["Very short extraction (<50 chars). May be incomplete."]
        );
    }

    #[test]
    fn test_merge_warnings_dedup_first_seen() {
        let mut warnings = vec!["b".to_string(), "a".to_string()];
        merge_warnings(
            &mut warnings,
            vec!["a".to_string(), "c".to_string(), "b".to_string(), "c".to_string()],
        );
        assert_eq!(warnings, vec!["b", "a", "c"]);
    }
}
