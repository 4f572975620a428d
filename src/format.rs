//! Markup -> (encoded formatting, plain text).
//!
//! The pipeline is strictly forward: raw input is segmented into rows and
//! wrapped, the wrapped markup is parsed once into a tree, and each top-level
//! node of that tree is formatted independently as one logical row.

use crate::dom::{self, BLANK_BASE, DomNode};
use crate::error::FormatError;
use crate::model::*;
use crate::segment;
use tracing::{debug, trace, warn};
use url::Url;

/// Options controlling how markup is parsed.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Base for resolving anchor targets. Relative targets that cannot be
    /// resolved against it are kept verbatim.
    pub base_url: Url,

    /// If true, any error reported by the markup parser aborts the call with
    /// [`FormatError::Markup`] instead of being recorded as a diagnostic.
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            base_url: (*BLANK_BASE).clone(),
            strict: false,
        }
    }
}

/// The two flat outputs of a parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseResult {
    /// All range encodings, concatenated with no separator.
    pub encoded_formatting: String,

    /// Row plain texts joined with `\n`.
    pub plain_text: String,
}

/// Outcome of [`parse_text_formatting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Formatted(ParseResult),

    /// The markup produced no nodes at all; the input is returned untouched.
    Passthrough(String),
}

impl Parsed {
    pub fn plain_text(&self) -> &str {
        match self {
            Parsed::Formatted(res) => &res.plain_text,
            Parsed::Passthrough(input) => input,
        }
    }

    /// Encoded ranges, or `None` for a passthrough.
    pub fn encoded_formatting(&self) -> Option<&str> {
        match self {
            Parsed::Formatted(res) => Some(&res.encoded_formatting),
            Parsed::Passthrough(_) => None,
        }
    }

    /// Flattens into the one-or-two element form: `[encoded, plain]` or `[input]`.
    pub fn into_parts(self) -> Vec<String> {
        match self {
            Parsed::Formatted(res) => vec![res.encoded_formatting, res.plain_text],
            Parsed::Passthrough(input) => vec![input],
        }
    }
}

/// Full result of a parse: the flat outputs plus the structured rows they
/// were assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingOutput {
    pub parsed: Parsed,
    pub rows: Vec<RowFormatting>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FormattingOutput {
    pub fn ranges(&self) -> impl Iterator<Item = &FormattingRange> {
        self.rows.iter().flat_map(|row| row.ranges.iter())
    }

    /// Wraps the output in the serializable envelope.
    pub fn to_file(&self) -> FormattingFile {
        FormattingFile {
            schema_version: SCHEMA_VERSION,
            generator: GeneratorInfo::default(),
            offset_unit: OffsetUnit::default(),
            row_count: self.rows.len(),
            encoded_formatting: self.parsed.encoded_formatting().unwrap_or_default().to_string(),
            plain_text: self.parsed.plain_text().to_string(),
            rows: self.rows.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Converts rich-text markup into encoded formatting ranges and plain text.
pub fn parse_text_formatting(input: &str) -> Result<Parsed, FormatError> {
    parse_text_formatting_with_options(input, &ParseOptions::default())
}

/// Like [`parse_text_formatting`], but allows callers to customize parsing.
pub fn parse_text_formatting_with_options(
    input: &str,
    opts: &ParseOptions,
) -> Result<Parsed, FormatError> {
    format_text(input, opts).map(|out| out.parsed)
}

/// Runs the whole pipeline and keeps the per-row structure.
pub fn format_text(input: &str, opts: &ParseOptions) -> Result<FormattingOutput, FormatError> {
    // errors are collected from the caller's markup alone; the row wrappers
    // legitimately split tags that span a line break.
    let mut diagnostics = Vec::new();
    for err in dom::markup_errors(input) {
        if opts.strict {
            return Err(FormatError::Markup { message: err });
        }
        warn!(error = %err, "recovered from malformed markup");
        diagnostics.push(Diagnostic::warning(
            DiagnosticPhase::Markup,
            "markup.parse_error",
            err,
        ));
    }

    let markup = segment::wrap_rows(input);
    let html = dom::parse_fragment(&markup);

    let nodes: Vec<DomNode<'_>> = dom::top_level_nodes(&html).collect();
    if nodes.is_empty() {
        debug!("markup produced no nodes, passing input through");
        return Ok(FormattingOutput {
            parsed: Parsed::Passthrough(input.to_string()),
            rows: Vec::new(),
            diagnostics,
        });
    }

    let rows: Vec<RowFormatting> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| format_row(*node, index, &opts.base_url, &mut diagnostics))
        .collect();

    let encoded_formatting: String = rows.iter().map(RowFormatting::encoded).collect();
    let plain_text = rows
        .iter()
        .map(|row| row.plain_text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    debug!(
        rows = rows.len(),
        ranges = rows.iter().map(|r| r.ranges.len()).sum::<usize>(),
        "formatted input"
    );

    Ok(FormattingOutput {
        parsed: Parsed::Formatted(ParseResult {
            encoded_formatting,
            plain_text,
        }),
        rows,
        diagnostics,
    })
}

/// Extracts the formatting ranges and plain text of one row node.
///
/// Only the row's immediate children are inspected. An unrecognized child
/// contributes its full text and no range. A recognized child contributes the
/// text of its leftmost leaf, addressed by a single range whose style codes
/// cover every formatting tag in the child's subtree.
pub fn format_row(
    node: DomNode<'_>,
    row: usize,
    base: &Url,
    diagnostics: &mut Vec<Diagnostic>,
) -> RowFormatting {
    if dom::element_name(node) != Some(segment::ROW_TAG) {
        diagnostics.push(
            Diagnostic::info(
                DiagnosticPhase::Format,
                "format.stray_row",
                "row produced by a node outside the row wrappers",
            )
            .with_row(row),
        );
    }

    if node.value().is_text() {
        return RowFormatting {
            index: row,
            plain_text: dom::text_content(node),
            ranges: Vec::new(),
        };
    }

    let mut plain_text = String::new();
    let mut cursor = 0usize;
    let mut ranges = Vec::new();

    for child in node.children() {
        let formatted = dom::element_name(child).is_some_and(is_node_formatted);
        if !formatted {
            let text = dom::text_content(child);
            cursor += text.chars().count();
            plain_text.push_str(&text);
            continue;
        }

        let leaf = dom::get_text_node(child);
        let leaf_text = dom::text_content(leaf);
        let leaf_len = leaf_text.chars().count();

        // a childless formatting element has no leaf of its own to address.
        let styles = if leaf.id() == child.id() {
            diagnostics.push(
                Diagnostic::info(
                    DiagnosticPhase::Format,
                    "format.empty_tag",
                    format!("<{}> has no content", dom::element_name(child).unwrap_or_default()),
                )
                .with_row(row),
            );
            Vec::new()
        } else {
            dom::style_codes(child, Some(leaf.id()))
        };

        if !styles.is_empty() {
            let href = if styles.contains(&FormattingStyle::Link) {
                dom::find_node_href_with_base(child, base)
            } else {
                None
            };
            let range = FormattingRange {
                row,
                start: cursor,
                end: cursor + leaf_len,
                styles,
                href,
            };
            trace!(%range, "emitted range");
            ranges.push(range);
        }

        plain_text.push_str(&leaf_text);
        cursor += leaf_len;
    }

    if ranges.is_empty()
        && node.has_children()
        && let Some(style) = dom::element_name(node).and_then(FormattingStyle::from_tag_name)
    {
        let full = dom::text_content(node);
        let href = if style == FormattingStyle::Link {
            dom::find_node_href_with_base(node, base)
        } else {
            None
        };
        ranges.push(FormattingRange {
            row,
            start: 0,
            end: full.chars().count(),
            styles: vec![style],
            href,
        });
        plain_text = full;
    }

    RowFormatting {
        index: row,
        plain_text,
        ranges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(input: &str) -> (String, String) {
        match parse_text_formatting(input).expect("parse") {
            Parsed::Formatted(res) => (res.encoded_formatting, res.plain_text),
            other => panic!("expected formatted output, got {other:?}"),
        }
    }

    #[test]
    fn plain_text_has_no_ranges() {
        assert_eq!(parts("hello"), (String::new(), "hello".to_string()));
    }

    #[test]
    fn bold_prefix() {
        assert_eq!(
            parts("<b>hi</b> there"),
            ("[0, 0, 2, b]".to_string(), "hi there".to_string())
        );
    }

    #[test]
    fn link_carries_resolved_href() {
        assert_eq!(
            parts(r#"<a href="http://x.com">go</a>"#),
            ("[0, 0, 2, a, http://x.com/]".to_string(), "go".to_string())
        );
    }

    #[test]
    fn nested_tags_collapse_outer_to_inner() {
        assert_eq!(
            parts("<b><i>hi</i></b>"),
            ("[0, 0, 2, bi]".to_string(), "hi".to_string())
        );
    }

    #[test]
    fn empty_input_is_one_empty_row() {
        let out = format_text("", &ParseOptions::default()).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.parsed.into_parts(), vec![String::new(), String::new()]);
    }

    #[test]
    fn offsets_count_code_points() {
        assert_eq!(
            parts("😀é<u>wörld</u>!"),
            ("[0, 2, 7, u]".to_string(), "😀éwörld!".to_string())
        );
    }

    #[test]
    fn unrecognized_tags_keep_text_and_drop_markup() {
        assert_eq!(
            parts("<span>ab<b>c</b></span><s>d</s>"),
            ("[0, 3, 4, s]".to_string(), "abcd".to_string())
        );
    }

    #[test]
    fn childless_formatting_tag_emits_nothing() {
        assert_eq!(parts("<b></b>x"), (String::new(), "x".to_string()));
    }

    #[test]
    fn only_the_leading_text_run_of_a_formatted_child_is_kept() {
        assert_eq!(
            parts("<b>hi <i>there</i></b>!"),
            ("[0, 0, 3, bi]".to_string(), "hi !".to_string())
        );
    }

    #[test]
    fn link_inside_bold_resolves_href_through_leftmost_child() {
        assert_eq!(
            parts(r#"<b><a href="https://e.com/p?q=1&amp;r=2">x</a></b>"#),
            (
                "[0, 0, 1, ba, https://e.com/p?q=1&r=2]".to_string(),
                "x".to_string()
            )
        );
    }

    #[test]
    fn link_without_target_omits_href() {
        assert_eq!(parts("<a>x</a>"), ("[0, 0, 1, a]".to_string(), "x".to_string()));
    }

    #[test]
    fn relative_href_uses_configured_base() {
        let opts = ParseOptions {
            base_url: Url::parse("https://example.com/notes/").unwrap(),
            ..ParseOptions::default()
        };
        let parsed = parse_text_formatting_with_options(r#"<a href="page">x</a>"#, &opts).unwrap();
        assert_eq!(
            parsed.encoded_formatting(),
            Some("[0, 0, 1, a, https://example.com/notes/page]")
        );
    }

    #[test]
    fn stray_top_level_formatting_covers_whole_row() {
        let out = format_text("a</div><b>x</b>", &ParseOptions::default()).unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.parsed.encoded_formatting(), Some("[1, 0, 1, b]"));
        assert_eq!(out.parsed.plain_text(), "a\nx");
        assert!(out.diagnostics.iter().any(|d| {
            d.code.as_deref() == Some("format.stray_row")
                && d.severity == Severity::Info
                && d.row == Some(1)
        }));
    }

    #[test]
    fn stray_childless_formatting_emits_no_range() {
        let out = format_text("a</div><b></b>", &ParseOptions::default()).unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.parsed.encoded_formatting(), Some(""));
        assert_eq!(out.parsed.plain_text(), "a\n");
    }

    #[test]
    fn stray_top_level_link_resolves_its_href() {
        let out = format_text(r#"a</div><a href="http://x.com">y</a>"#, &ParseOptions::default())
            .unwrap();
        assert_eq!(out.parsed.encoded_formatting(), Some("[1, 0, 1, a, http://x.com/]"));
        assert_eq!(out.parsed.plain_text(), "a\ny");
    }

    #[test]
    fn tags_spanning_line_breaks_are_not_markup_errors() {
        let strict = ParseOptions {
            strict: true,
            ..ParseOptions::default()
        };
        for input in ["<b>a\nb</b>", "<p>a\nb</p>", "<i>x<br/>y</i>"] {
            let out = format_text(input, &strict)
                .unwrap_or_else(|e| panic!("strict parse of {input:?} failed: {e}"));
            assert!(out.diagnostics.is_empty(), "{input:?}: {:?}", out.diagnostics);

            let lenient = format_text(input, &ParseOptions::default()).unwrap();
            assert!(lenient.diagnostics.is_empty(), "{input:?}: {:?}", lenient.diagnostics);
        }
    }

    #[test]
    fn script_content_keeps_the_row_wrappers_as_text() {
        let out = format_text("<script>a\n</script>", &ParseOptions::default()).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.parsed.plain_text(), "a</div><div>");
    }

    #[test]
    fn empty_formatting_child_is_reported_on_its_row() {
        let out = format_text("x\n<b></b>y", &ParseOptions::default()).unwrap();
        assert_eq!(out.parsed.plain_text(), "x\ny");
        let empty: Vec<_> = out
            .diagnostics
            .iter()
            .filter(|d| d.code.as_deref() == Some("format.empty_tag"))
            .collect();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].row, Some(1));
        assert_eq!(empty[0].phase, Some(DiagnosticPhase::Format));
    }

    #[test]
    fn stray_top_level_text_is_its_own_row() {
        let out = format_text("a</div>b", &ParseOptions::default()).unwrap();
        assert_eq!(out.parsed.plain_text(), "a\nb");
    }

    #[test]
    fn strict_mode_rejects_malformed_markup() {
        let opts = ParseOptions {
            strict: true,
            ..ParseOptions::default()
        };
        let err = parse_text_formatting_with_options("a</i>b", &opts).unwrap_err();
        assert!(matches!(err, FormatError::Markup { .. }));

        let lenient = format_text("a</i>b", &ParseOptions::default()).unwrap();
        assert_eq!(lenient.parsed.plain_text(), "ab");
        assert!(
            lenient
                .diagnostics
                .iter()
                .all(|d| d.code.as_deref() == Some("markup.parse_error"))
        );
        assert!(!lenient.diagnostics.is_empty());
    }

    #[test]
    fn passthrough_flattens_to_single_part() {
        let parsed = Parsed::Passthrough("raw".to_string());
        assert_eq!(parsed.plain_text(), "raw");
        assert_eq!(parsed.encoded_formatting(), None);
        assert_eq!(parsed.into_parts(), vec!["raw".to_string()]);
    }

    #[test]
    fn envelope_reports_rows_and_offset_unit() {
        let out = format_text("<b>a</b>\nb", &ParseOptions::default()).unwrap();
        let file = out.to_file();
        assert_eq!(file.row_count, 2);
        assert_eq!(file.encoded_formatting, "[0, 0, 1, b]");
        assert_eq!(file.plain_text, "a\nb");
        assert_eq!(file.offset_unit, OffsetUnit::CodePoint);
    }
}
