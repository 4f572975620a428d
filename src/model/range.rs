use crate::model::{FormattingStyle, style_code_string};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One formatted character range on a logical row.
///
/// `start` and `end` are offsets into the row's plain text, counted in
/// Unicode scalar values (not bytes, not UTF-16 units).
///
/// Encodes as `[row, start, end, styles]` or, when `href` is present,
/// `[row, start, end, styles, href]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingRange {
    pub row: usize,
    pub start: usize,
    pub end: usize,

    /// Styles applied to the range, in the order their tags were found.
    pub styles: Vec<FormattingStyle>,

    /// Link target; only set when `styles` contains [`FormattingStyle::Link`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl FormattingRange {
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn style_codes(&self) -> String {
        style_code_string(&self.styles)
    }

    pub fn has_style(&self, style: FormattingStyle) -> bool {
        self.styles.contains(&style)
    }
}

impl fmt::Display for FormattingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}",
            self.row,
            self.start,
            self.end,
            self.style_codes()
        )?;
        if let Some(href) = self.href.as_deref().filter(|h| !h.is_empty()) {
            write!(f, ", {}", href)?;
        }
        f.write_str("]")
    }
}

/// The ranges and plain text extracted from one logical row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RowFormatting {
    pub index: usize,
    pub plain_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<FormattingRange>,
}

impl RowFormatting {
    /// The row's ranges concatenated in their textual encoding.
    pub fn encoded(&self) -> String {
        encode_ranges(&self.ranges)
    }
}

/// Concatenates range encodings with no separator.
pub fn encode_ranges<'a>(ranges: impl IntoIterator<Item = &'a FormattingRange>) -> String {
    ranges.into_iter().map(|r| r.to_string()).collect()
}
