//! Encoded formatting string -> structured ranges.
//!
//! Tuples are self-delimiting: each starts with `[` and ends at the `]` that
//! balances it. An href field may itself contain balanced brackets.

use crate::error::DecodeError;
use crate::model::{FormattingRange, FormattingStyle};

const FIELD_SEP: &str = ", ";

/// Parses a concatenation of `[row, start, end, styles(, href)?]` tuples.
///
/// Whitespace between tuples is ignored. Empty input yields no ranges.
pub fn decode_formatting(encoded: &str) -> Result<Vec<FormattingRange>, DecodeError> {
    let mut cur = Cursor { src: encoded, pos: 0 };
    let mut out = Vec::new();

    loop {
        cur.skip_whitespace();
        if cur.at_end() {
            break;
        }
        out.push(decode_range(&mut cur)?);
    }

    Ok(out)
}

fn decode_range(cur: &mut Cursor<'_>) -> Result<FormattingRange, DecodeError> {
    let open = cur.pos;
    cur.expect("[", "'['")?;
    let row = cur.number()?;
    cur.expect(FIELD_SEP, "', '")?;
    let start = cur.number()?;
    cur.expect(FIELD_SEP, "', '")?;
    let end = cur.number()?;
    cur.expect(FIELD_SEP, "', '")?;
    let styles = cur.styles()?;

    if start > end {
        return Err(DecodeError::OutOfOrder { offset: open });
    }

    let href = if cur.eat("]") {
        None
    } else {
        cur.expect(FIELD_SEP, "']' or ', '")?;
        Some(cur.href()?)
    };

    Ok(FormattingRange {
        row,
        start,
        end,
        styles,
        href,
    })
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str, expected: &'static str) -> Result<(), DecodeError> {
        if self.eat(token) {
            return Ok(());
        }
        if self.at_end() || token.starts_with(self.rest()) {
            return Err(DecodeError::UnexpectedEnd);
        }
        Err(DecodeError::Expected {
            expected,
            offset: self.pos,
        })
    }

    fn number(&mut self) -> Result<usize, DecodeError> {
        let rest = self.rest();
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            if self.at_end() {
                return Err(DecodeError::UnexpectedEnd);
            }
            return Err(DecodeError::InvalidNumber { offset: self.pos });
        }
        let value = rest[..digits]
            .parse::<usize>()
            .map_err(|_| DecodeError::InvalidNumber { offset: self.pos })?;
        self.pos += digits;
        Ok(value)
    }

    fn styles(&mut self) -> Result<Vec<FormattingStyle>, DecodeError> {
        let start = self.pos;
        let mut styles = Vec::new();
        for (i, ch) in self.rest().char_indices() {
            if ch == ',' || ch == ']' {
                break;
            }
            let style = FormattingStyle::from_code(ch).ok_or(DecodeError::UnknownStyle {
                code: ch,
                offset: start + i,
            })?;
            styles.push(style);
        }
        self.pos += styles.len();
        if self.at_end() {
            return Err(DecodeError::UnexpectedEnd);
        }
        if styles.is_empty() {
            return Err(DecodeError::EmptyStyles { offset: start });
        }
        Ok(styles)
    }

    /// Reads up to (and consumes) the `]` closing the current tuple.
    fn href(&mut self) -> Result<String, DecodeError> {
        let mut depth = 0usize;
        for (i, ch) in self.rest().char_indices() {
            match ch {
                '[' => depth += 1,
                ']' if depth == 0 => {
                    let href = self.rest()[..i].to_string();
                    self.pos += i + 1;
                    return Ok(href);
                }
                ']' => depth -= 1,
                _ => {}
            }
        }
        Err(DecodeError::UnexpectedEnd)
    }
}
