//! Row fuzz target.
//!
//! This fuzzer drives a row through arbitrary operation sequences.
//!
//! ## Running
//!
//! ```bash
//! cd crates/trow-core
//! cargo +nightly fuzz run row_ops -- -max_total_time=60
//! ```
//!
//! ## Properties Tested
//!
//! - No operation sequence panics
//! - Glyphs always tile the columns with at least one code unit each
//! - Attribute runs always cover exactly the row width, canonically
//! - Resize and reset restore consistent state from anything

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trow_core::{CellStream, OutputCell, PackedColor, Row, TextAttribute};

/// Operations that can be performed on a row.
#[derive(Debug, Arbitrary)]
enum RowOp {
    /// Write one glyph of the given width.
    Replace { col: u16, width: u16, units: Vec<u16> },
    /// Clear one cell.
    ClearCell { col: u16 },
    /// Bulk-write a text stream.
    WriteText { index: u16, text: String, wrap: Option<bool> },
    /// Bulk-write a legacy sentinel pair.
    WriteSentinelPair { index: u16 },
    /// Overwrite an attribute range.
    ReplaceAttr { begin: u16, end: u16, fg: u8, link: u16 },
    /// Resize to a new width.
    Resize { width: u16 },
    /// Reset with a fill attribute.
    Reset { fg: u8 },
}

fn check_invariants(row: &Row) {
    let mut next_col = 0u16;
    let mut code_units = 0usize;
    for glyph in row.glyphs() {
        assert_eq!(glyph.cols.start, next_col);
        assert!(glyph.cols.end > glyph.cols.start);
        assert!(!glyph.chars.is_empty());
        next_col = glyph.cols.end;
        code_units += glyph.chars.len();
    }
    assert_eq!(next_col, row.width());
    assert_eq!(code_units, row.text_raw().len());

    let attrs = row.attributes();
    assert_eq!(attrs.len(), row.width());
    for pair in attrs.runs().windows(2) {
        assert_ne!(pair[0].value, pair[1].value);
    }
}

fuzz_target!(|ops: Vec<RowOp>| {
    let mut row = Row::new(80, TextAttribute::DEFAULT);

    for op in ops {
        match op {
            RowOp::Replace { col, width, units } => {
                // Cap the unit count so buffer growth stays addressable.
                let units = &units[..units.len().min(8)];
                let _ = row.replace_characters(col, width % 4, units);
            }
            RowOp::ClearCell { col } => {
                let _ = row.clear_cell(col);
            }
            RowOp::WriteText { index, text, wrap } => {
                let text: String = text.chars().take(256).collect();
                let mut cells = CellStream::new(&text, TextAttribute::DEFAULT).peekable();
                let _ = row.write_cells(&mut cells, index, wrap, None);
            }
            RowOp::WriteSentinelPair { index } => {
                let cells = vec![
                    OutputCell::leading("漢", TextAttribute::DEFAULT),
                    OutputCell::trailing_sentinel(TextAttribute::DEFAULT),
                ];
                let mut cells = cells.into_iter().peekable();
                let _ = row.write_cells(&mut cells, index, None, None);
            }
            RowOp::ReplaceAttr { begin, end, fg, link } => {
                let attr = TextAttribute::DEFAULT
                    .with_fg(PackedColor::indexed(fg))
                    .with_hyperlink_id(link);
                row.replace_attr_range(begin, end, attr);
            }
            RowOp::Resize { width } => {
                row.resize((width % 500).max(1));
            }
            RowOp::Reset { fg } => {
                row.reset(TextAttribute::DEFAULT.with_fg(PackedColor::indexed(fg)));
            }
        }
        check_invariants(&row);
    }
});
