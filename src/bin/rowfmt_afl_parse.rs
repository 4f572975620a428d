//! AFL++ fuzz target for `rowfmt`.
//!
//! This binary is stdin-driven, so it can be used with AFL++.
//! Build and run it via `cargo-afl`:
//!
//! ```bash
//! cargo install cargo-afl
//!
//! cargo afl build --release --features afl_fuzz --bin rowfmt_afl_parse
//!
//! mkdir -p fuzz/afl/out
//!
//! cargo afl fuzz \
//!   -i fuzz/afl/in \
//!   -o fuzz/afl/out \
//!   target/release/rowfmt_afl_parse
//! ```
//!
//! Rust panics normally unwind and exit with a non-crashing status code.
//! AFL++ only treats crashes as signals/aborts. We therefore catch any unwind
//! and turn it into `abort()`.

use std::io::Read;

use rowfmt::model::*;
use rowfmt::{ParseOptions, decode_formatting, format_text, render_markup};

const MAX_INPUT_LEN: usize = 1_000_000; // 1MB guardrail; AFL++ will typically cap this anyway.

fn check_rows(rows: &[RowFormatting]) {
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.index, i, "row index out of sequence");
        let len = row.plain_text.chars().count();
        for r in &row.ranges {
            assert_eq!(r.row, i, "range filed under the wrong row: {r}");
            assert!(r.start <= r.end, "range start > end: {r}");
            assert!(r.end <= len, "range out of bounds (len={len}): {r}");
            assert!(!r.styles.is_empty(), "range without styles: {r}");
            assert!(
                r.href.is_none() || r.has_style(FormattingStyle::Link),
                "href on a non-link range: {r}"
            );
        }
    }
}

fn run_one_input(data: &[u8]) {
    if data.len() > MAX_INPUT_LEN {
        // guardrail: avoid pathological OOM on enormous inputs.
        return;
    }

    // lossy conversion keeps the harness total (no early returns that reduce coverage).
    let src = String::from_utf8_lossy(data).to_string();

    let Ok(out) = format_text(&src, &ParseOptions::default()) else {
        return;
    };

    // invariants that must hold for any input (valid or invalid):
    // - offsets stay inside their row
    // - the encoded string decodes back to the emitted ranges
    check_rows(&out.rows);

    if let Some(encoded) = out.parsed.encoded_formatting() {
        let flat: Vec<FormattingRange> = out.ranges().cloned().collect();
        // hrefs are free text and may contain unbalanced brackets; only
        // bracket-safe encodings are expected to decode.
        if flat
            .iter()
            .all(|r| r.href.as_deref().is_none_or(|h| !h.contains(['[', ']'])))
        {
            let decoded = decode_formatting(encoded).unwrap();
            assert_eq!(decoded, flat);
        }
    }

    // JSON round-trip must never panic.
    let json = serde_json::to_vec(&out.to_file()).unwrap();
    let back: FormattingFile = serde_json::from_slice(&json).unwrap();

    // rendering should never panic.
    let flat: Vec<FormattingRange> = back.rows.iter().flat_map(|r| r.ranges.clone()).collect();
    let _markup = render_markup(&back.plain_text, &flat);
}

fn main() {
    let mut data = Vec::new();
    std::io::stdin().read_to_end(&mut data).unwrap();

    // convert any panic into an abort().
    if std::panic::catch_unwind(|| run_one_input(&data)).is_err() {
        std::process::abort();
    }
}
