pub mod decode;
pub mod dom;
pub mod error;
pub mod format;
pub mod model;
pub mod render;
pub mod segment;

pub use decode::decode_formatting;
pub use dom::{find_node_href, get_text_node};
pub use error::{DecodeError, FormatError};
pub use format::{
    FormattingOutput, ParseOptions, ParseResult, Parsed, format_text, parse_text_formatting,
    parse_text_formatting_with_options,
};
pub use model::{FormattingRange, FormattingStyle, RowFormatting, is_node_formatted};
pub use render::{RenderOptions, render_markup, render_markup_with_options};

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Reads input from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String, Box<dyn Error>> {
    let bytes = match path {
        Some(path) => fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    // if we ever encounter invalid UTF-8, fallback to lossy conversion
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

/// Parse mode: returns the text to print for `input`.
///
/// Without `json`, the encoded formatting is the first line and the plain
/// text follows. A passthrough prints the input alone.
pub fn run_parse(input: &str, json: bool, opts: &ParseOptions) -> Result<String, Box<dyn Error>> {
    let out = format_text(input, opts)?;

    if json {
        // prettify JSON so it's easy to inspect / diff.
        return Ok(serde_json::to_string_pretty(&out.to_file())?);
    }

    Ok(match &out.parsed {
        Parsed::Formatted(res) => format!("{}\n{}", res.encoded_formatting, res.plain_text),
        Parsed::Passthrough(raw) => raw.clone(),
    })
}

/// Render mode: applies `formatting` to the plain text in `input`.
pub fn run_render(
    input: &str,
    formatting: &str,
    opts: &RenderOptions,
) -> Result<String, Box<dyn Error>> {
    let ranges = decode_formatting(formatting)?;
    Ok(render_markup_with_options(input, &ranges, opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_input_falls_back_to_lossy_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.html");
        fs::write(&path, b"<b>a\xFFb</b>").unwrap();
        let text = read_input(Some(&path)).unwrap();
        assert_eq!(text, "<b>a\u{FFFD}b</b>");
    }

    #[test]
    fn run_parse_prints_encoding_then_plain_text() {
        let printed = run_parse("<b>hi</b>\nthere", false, &ParseOptions::default()).unwrap();
        assert_eq!(printed, "[0, 0, 2, b]\nhi\nthere");
    }

    #[test]
    fn run_parse_json_is_an_envelope() {
        let printed = run_parse("<i>x</i>", true, &ParseOptions::default()).unwrap();
        let file: model::FormattingFile = serde_json::from_str(&printed).unwrap();
        assert_eq!(file.schema_version, model::SCHEMA_VERSION);
        assert_eq!(file.encoded_formatting, "[0, 0, 1, i]");
        assert_eq!(file.rows[0].ranges[0].styles, vec![FormattingStyle::Italic]);
    }

    #[test]
    fn run_render_rejects_bad_formatting() {
        assert!(run_render("abc", "[0, 0", &RenderOptions::default()).is_err());
        assert_eq!(
            run_render("abc", "[0, 1, 2, u]", &RenderOptions::default()).unwrap(),
            "a<u>b</u>c"
        );
    }
}
