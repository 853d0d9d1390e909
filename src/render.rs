//! JSON rendering of extraction results.

use crate::error::Result;
use crate::model::ExtractionResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed with indentation
    #[default]
    Pretty,
    /// Compact single-line output
    Compact,
}

/// Render an extraction result as JSON.
pub fn to_json(result: &ExtractionResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result)?,
        JsonFormat::Compact => serde_json::to_string(result)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_compact() {
        let result = ExtractionResult::new("Jane", "txt").with_warning("Very short");
        let json = to_json(&result, JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"text":"Jane","meta":{"detected_type":"txt"},"warnings":["Very short"]}"#
        );
    }

    #[test]
    fn test_to_json_pretty_round_trips() {
        let result = ExtractionResult::new("Jane\nDoe", "pdf").with_meta("page_count", 1);
        let json = to_json(&result, JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        let parsed: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
