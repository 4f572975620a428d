//! Formatting data model and JSON envelope.
//!
//! This module defines the values that flow out of the pipeline:
//! 1) the closed set of recognized styles,
//! 2) position-addressed ranges and their textual tuple encoding,
//! 3) diagnostics and the serializable envelope used by the CLI.
//!
//! Offsets are always counted in Unicode scalar values of a row's plain text.

mod diagnostic;
mod envelope;
mod range;
mod style;

pub use diagnostic::*;
pub use envelope::*;
pub use range::*;
pub use style::*;

/// JSON schema version for [`FormattingFile`].
///
/// Bump this when making non-backwards-compatible changes to the JSON structure.
pub const SCHEMA_VERSION: u32 = 1;

/// The generator name stored in the JSON envelope.
pub const GENERATOR_NAME: &str = "rowfmt";

/// The generator version stored in the JSON envelope.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_file_json_round_trip() {
        let file = FormattingFile {
            schema_version: SCHEMA_VERSION,
            generator: GeneratorInfo::default(),
            offset_unit: OffsetUnit::default(),
            row_count: 2,
            encoded_formatting: "[0, 0, 2, b][1, 0, 2, a, http://x.com/]".to_string(),
            plain_text: "hi\ngo".to_string(),
            rows: vec![
                RowFormatting {
                    index: 0,
                    plain_text: "hi".to_string(),
                    ranges: vec![FormattingRange {
                        row: 0,
                        start: 0,
                        end: 2,
                        styles: vec![FormattingStyle::Bold],
                        href: None,
                    }],
                },
                RowFormatting {
                    index: 1,
                    plain_text: "go".to_string(),
                    ranges: vec![FormattingRange {
                        row: 1,
                        start: 0,
                        end: 2,
                        styles: vec![FormattingStyle::Link],
                        href: Some("http://x.com/".to_string()),
                    }],
                },
            ],
            diagnostics: vec![
                Diagnostic::warning(DiagnosticPhase::Markup, "markup.parse_error", "example")
                    .with_row(1),
            ],
        };

        let json = serde_json::to_string_pretty(&file).expect("serialize");
        assert!(json.contains("\"offset_unit\": \"code_point\""), "{json}");
        assert!(json.contains("\"href\": \"http://x.com/\""), "{json}");

        let back: FormattingFile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(file, back);
    }
}
