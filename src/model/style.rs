use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognized inline formatting tag.
///
/// The set is closed: each variant is identified by the single-character
/// code that is also its (lowercase) HTML tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormattingStyle {
    #[serde(rename = "b")]
    Bold,
    #[serde(rename = "i")]
    Italic,
    #[serde(rename = "u")]
    Underline,
    #[serde(rename = "s")]
    Strike,
    #[serde(rename = "a")]
    Link,
}

impl FormattingStyle {
    pub const ALL: [FormattingStyle; 5] = [
        FormattingStyle::Bold,
        FormattingStyle::Italic,
        FormattingStyle::Underline,
        FormattingStyle::Strike,
        FormattingStyle::Link,
    ];

    #[inline]
    pub fn code(self) -> char {
        match self {
            FormattingStyle::Bold => 'b',
            FormattingStyle::Italic => 'i',
            FormattingStyle::Underline => 'u',
            FormattingStyle::Strike => 's',
            FormattingStyle::Link => 'a',
        }
    }

    /// The lowercase tag name used when rendering this style back to markup.
    #[inline]
    pub fn tag_name(self) -> &'static str {
        match self {
            FormattingStyle::Bold => "b",
            FormattingStyle::Italic => "i",
            FormattingStyle::Underline => "u",
            FormattingStyle::Strike => "s",
            FormattingStyle::Link => "a",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Looks up a style by element name, ignoring ASCII case.
    pub fn from_tag_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.tag_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for FormattingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Case-insensitive membership test against the recognized formatting tags.
pub fn is_node_formatted(tag_name: &str) -> bool {
    FormattingStyle::from_tag_name(tag_name).is_some()
}

/// Concatenates the single-character codes of `styles`, e.g. `bi`.
pub fn style_code_string(styles: &[FormattingStyle]) -> String {
    styles.iter().map(|s| s.code()).collect()
}
