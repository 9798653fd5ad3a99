//! Property-based tests for row storage.
//!
//! Uses proptest to drive randomized edit sequences and check the
//! structural invariants the rest of the terminal relies on:
//! monotone indices, glyphs with at least one code unit, attribute runs
//! covering exactly the row, and canonical (coalesced) run form.

use proptest::prelude::*;
use trow_core::{CellStream, PackedColor, Row, Rle, TextAttribute, BLANK};

/// Check every structural invariant a row must uphold.
fn assert_row_invariants(row: &Row) {
    // Glyphs partition the columns and each stores at least one code unit.
    let mut next_col = 0u16;
    let mut code_units = 0usize;
    for glyph in row.glyphs() {
        assert_eq!(glyph.cols.start, next_col, "glyphs must tile the row");
        assert!(glyph.cols.end > glyph.cols.start);
        assert!(!glyph.chars.is_empty(), "glyph without code units");
        next_col = glyph.cols.end;
        code_units += glyph.chars.len();
    }
    assert_eq!(next_col, row.width(), "glyphs must cover every column");
    assert_eq!(
        code_units,
        row.text_raw().len(),
        "glyph lengths must sum to the packed extent"
    );

    // Attribute runs cover exactly the width, canonically.
    let attrs = row.attributes();
    assert_eq!(attrs.len(), row.width());
    let mut total = 0u32;
    for run in attrs.runs() {
        assert!(run.length > 0, "empty attribute run");
        total += u32::from(run.length);
    }
    assert_eq!(total, u32::from(row.width()));
    for pair in attrs.runs().windows(2) {
        assert_ne!(pair[0].value, pair[1].value, "adjacent equal runs");
    }
}

fn arb_attr() -> impl Strategy<Value = TextAttribute> {
    (0u8..4, 0u8..4, 0u16..3).prop_map(|(fg, bg, link)| {
        TextAttribute::DEFAULT
            .with_fg(PackedColor::indexed(fg))
            .with_bg(PackedColor::indexed(bg))
            .with_hyperlink_id(link)
    })
}

/// A glyph for replace_characters: 1-2 columns, 1-3 code units.
fn arb_glyph() -> impl Strategy<Value = (u16, Vec<u16>)> {
    (1u16..=2, prop::collection::vec(0x21u16..0x7F, 1..=3))
}

proptest! {
    /// Arbitrary single-glyph edits keep the row consistent.
    #[test]
    fn replace_characters_upholds_invariants(
        width in 1u16..80,
        edits in prop::collection::vec((0u16..100, arb_glyph()), 0..32),
    ) {
        let mut row = Row::new(width, TextAttribute::DEFAULT);
        for (col, (glyph_width, glyph)) in edits {
            row.replace_characters(col, glyph_width, &glyph).unwrap();
            assert_row_invariants(&row);
        }
    }

    /// Bulk writes keep the row consistent and never lose the stream.
    #[test]
    fn write_cells_upholds_invariants(
        width in 1u16..60,
        index in 0u16..60,
        text in "[ -~漢字é]{0,80}",
    ) {
        let mut row = Row::new(width, TextAttribute::DEFAULT);
        let mut cells = CellStream::new(&text, TextAttribute::DEFAULT).peekable();
        let result = row.write_cells(&mut cells, index, Some(true), None);
        if index < width {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
        assert_row_invariants(&row);
    }

    /// Attribute edits keep runs canonical.
    #[test]
    fn attribute_ops_stay_canonical(
        width in 1u16..80,
        ops in prop::collection::vec((0u16..100, 0u16..100, arb_attr()), 0..24),
    ) {
        let mut row = Row::new(width, TextAttribute::DEFAULT);
        for (begin, end, attr) in ops {
            row.replace_attr_range(begin, end, attr);
            assert_row_invariants(&row);
        }
    }

    /// Hyperlink enumeration matches the hyperlink runs exactly.
    #[test]
    fn hyperlinks_match_runs(
        width in 1u16..80,
        ops in prop::collection::vec((0u16..100, 0u16..100, arb_attr()), 0..24),
    ) {
        let mut row = Row::new(width, TextAttribute::DEFAULT);
        for (begin, end, attr) in ops {
            row.replace_attr_range(begin, end, attr);
        }
        let expected: Vec<u16> = row
            .attributes()
            .runs()
            .iter()
            .filter(|run| run.value.is_hyperlink())
            .map(|run| run.value.hyperlink_id())
            .collect();
        prop_assert_eq!(row.hyperlinks(), expected);
    }

    /// Resizing in any direction keeps the row consistent, and resetting
    /// afterwards matches a freshly constructed row.
    #[test]
    fn resize_upholds_invariants(
        width in 1u16..60,
        new_width in 1u16..60,
        edits in prop::collection::vec((0u16..60, arb_glyph()), 0..16),
    ) {
        let mut row = Row::new(width, TextAttribute::DEFAULT);
        for (col, (glyph_width, glyph)) in edits {
            row.replace_characters(col, glyph_width, &glyph).unwrap();
        }
        row.resize(new_width);
        prop_assert_eq!(row.width(), new_width);
        assert_row_invariants(&row);

        let fill = TextAttribute::DEFAULT.with_fg(PackedColor::indexed(3));
        row.reset(fill);
        let fresh = Row::new(new_width, fill);
        prop_assert_eq!(row.text(), fresh.text());
        prop_assert_eq!(row.attributes(), fresh.attributes());
        for col in 0..new_width {
            prop_assert_eq!(row.glyph_at(col), &[BLANK]);
        }
    }

    /// The RLE container's replace agrees with a naive per-position model.
    #[test]
    fn rle_matches_naive_model(
        len in 1u16..64,
        ops in prop::collection::vec((0u16..80, 0u16..80, 0u8..4), 0..24),
    ) {
        let mut rle = Rle::new(len, 0u8);
        let mut model = vec![0u8; usize::from(len)];
        for (begin, end, value) in ops {
            rle.replace(begin, end, value);
            let begin = usize::from(begin).min(model.len());
            let end = usize::from(end).min(model.len());
            if begin < end {
                model[begin..end].fill(value);
            }
        }
        for (pos, expected) in model.iter().enumerate() {
            prop_assert_eq!(rle.at(pos as u16), Some(*expected));
        }
        for pair in rle.runs().windows(2) {
            prop_assert_ne!(pair[0].value, pair[1].value);
        }
    }
}
