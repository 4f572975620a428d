//! Row segmentation.
//!
//! Splits raw input into logical rows at line-break delimiters and wraps each
//! row in its own block container, so the tree parser yields one top-level
//! node per row.

use once_cell::sync::Lazy;
use regex::Regex;

/// CRLF must precede CR so a Windows line ending counts as one delimiter.
static ROW_BREAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\r|\n|<br>|<br />|<br/>").unwrap());

/// Element name of the block wrapped around each row.
pub const ROW_TAG: &str = "div";

/// Opening tag of the block wrapped around each row.
pub const ROW_OPEN: &str = "<div>";

/// Closing tag of the block wrapped around each row.
pub const ROW_CLOSE: &str = "</div>";

/// A delimiter match, as a byte range into the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBreak {
    pub start: usize,
    pub len: usize,
}

impl RowBreak {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Records every line-break delimiter in one pass, in input order.
pub fn find_row_breaks(input: &str) -> Vec<RowBreak> {
    ROW_BREAK_REGEX
        .find_iter(input)
        .map(|m| RowBreak {
            start: m.start(),
            len: m.len(),
        })
        .collect()
}

/// Returns the raw content of each logical row, delimiters excluded.
///
/// Always returns at least one row; empty input yields a single empty row.
pub fn split_rows(input: &str) -> Vec<&str> {
    let breaks = find_row_breaks(input);
    let mut rows = Vec::with_capacity(breaks.len() + 1);

    // match boundaries always fall on char boundaries, so slicing here
    // never splits a multi-byte character.
    let mut start = 0usize;
    for brk in &breaks {
        rows.push(&input[start..brk.start]);
        start = brk.end();
    }
    rows.push(&input[start..]);
    rows
}

/// Wraps every logical row in a block container and concatenates the result.
///
/// Rows are wrapped as raw text, so the wrappers only become row boundaries
/// where the markup parser honours them. Inside raw-text elements such as
/// `<script>` they are read back as literal text, and content the parser
/// relocates (a `<table>` spanning a break) can merge rows.
pub fn wrap_rows(input: &str) -> String {
    let rows = split_rows(input);
    let extra = rows.len() * (ROW_OPEN.len() + ROW_CLOSE.len());
    let mut out = String::with_capacity(input.len() + extra);
    for row in rows {
        out.push_str(ROW_OPEN);
        out.push_str(row);
        out.push_str(ROW_CLOSE);
    }
    out
}
