//! Plain text + ranges -> markup.
//!
//! The inverse of the formatter for single-level formatting: each range
//! becomes one run of nested tags around its slice of the row.

use crate::model::{FormattingRange, FormattingStyle};
use tracing::warn;

/// Rendering options that control the emitted markup.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Inserted between rows.
    pub line_break: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_break: "<br>".to_string(),
        }
    }
}

pub fn render_markup(plain_text: &str, ranges: &[FormattingRange]) -> String {
    render_markup_with_options(plain_text, ranges, &RenderOptions::default())
}

/// Renders `plain_text` (rows separated by `\n`) with `ranges` applied.
///
/// Ranges are placed in start order per row. A range that overlaps one
/// already placed, or reaches past the end of its row, is skipped.
pub fn render_markup_with_options(
    plain_text: &str,
    ranges: &[FormattingRange],
    opts: &RenderOptions,
) -> String {
    let rows: Vec<&str> = plain_text.split('\n').collect();

    for r in ranges.iter().filter(|r| r.row >= rows.len()) {
        warn!(range = %r, rows = rows.len(), "range refers to a missing row, skipping");
    }

    let mut out = String::with_capacity(plain_text.len());
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            out.push_str(&opts.line_break);
        }
        let mut row_ranges: Vec<&FormattingRange> =
            ranges.iter().filter(|r| r.row == index).collect();
        row_ranges.sort_by_key(|r| r.start);
        render_row(row, &row_ranges, &mut out);
    }
    out
}

fn render_row(row: &str, ranges: &[&FormattingRange], out: &mut String) {
    let chars: Vec<char> = row.chars().collect();
    let mut cursor = 0usize;

    for range in ranges {
        if range.is_empty() {
            continue;
        }
        if range.start < cursor || range.end > chars.len() {
            warn!(%range, row_len = chars.len(), "range does not fit its row, skipping");
            continue;
        }

        push_text(out, &chars[cursor..range.start]);
        for style in &range.styles {
            push_open_tag(out, *style, range.href.as_deref());
        }
        push_text(out, &chars[range.start..range.end]);
        for style in range.styles.iter().rev() {
            out.push_str("</");
            out.push_str(style.tag_name());
            out.push('>');
        }
        cursor = range.end;
    }

    push_text(out, &chars[cursor..]);
}

fn push_text(out: &mut String, chars: &[char]) {
    let text: String = chars.iter().collect();
    out.push_str(&html_escape::encode_text(&text));
}

fn push_open_tag(out: &mut String, style: FormattingStyle, href: Option<&str>) {
    out.push('<');
    out.push_str(style.tag_name());
    if style == FormattingStyle::Link
        && let Some(href) = href.filter(|h| !h.is_empty())
    {
        out.push_str(" href=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(href));
        out.push('"');
    }
    out.push('>');
}
