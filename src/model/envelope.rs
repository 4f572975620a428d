use crate::model::{Diagnostic, RowFormatting};
use serde::{Deserialize, Serialize};

/// Top-level JSON document printed by `rowfmt parse --json`.
///
/// Wraps the two flat outputs with the structured per-row ranges and the
/// metadata needed to interpret the offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingFile {
    /// Schema version for this JSON payload.
    pub schema_version: u32,

    pub generator: GeneratorInfo,

    /// How to interpret every `start`/`end` offset in `rows`.
    pub offset_unit: OffsetUnit,

    pub row_count: usize,

    pub encoded_formatting: String,

    pub plain_text: String,

    pub rows: Vec<RowFormatting>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Identifies the program that produced the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub version: String,
}

impl Default for GeneratorInfo {
    fn default() -> Self {
        Self {
            name: crate::model::GENERATOR_NAME.to_string(),
            version: crate::model::GENERATOR_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OffsetUnit {
    /// Offsets count Unicode scalar values of the row's plain text.
    #[default]
    CodePoint,
}
