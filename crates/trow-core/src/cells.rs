//! Input cells for bulk row writes.
//!
//! ## Design
//!
//! A row write consumes a stream of cells, one per column. Wide glyphs
//! arrive as a `Leading` cell followed by a `Trailing` cell, both carrying
//! the glyph's code units; the leading cell writes the whole glyph and the
//! trailing cell just advances the column. Legacy DBCS producers instead
//! send the U+FFFF sentinel in the trailing cell, which the row re-pairs
//! with the glyph head in the previous column. Narrow glyphs (including
//! multi-code-unit clusters like `e` + combining acute) arrive as a single
//! `Single` cell.
//!
//! [`CellStream`] is the standard producer: it segments a `&str` into
//! grapheme clusters, measures their display width, and emits the paired
//! cell sequence. Callers with pre-measured content can construct
//! [`OutputCell`]s directly.

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::attr::TextAttribute;

/// The blank code unit used for cleared cells (U+0020).
pub const BLANK: u16 = 0x0020;

/// Sentinel code unit carried by the trailing half of a wide glyph (U+FFFF).
pub const DBCS_TRAILING_SENTINEL: u16 = 0xFFFF;

/// Column role of a cell within a (possibly wide) glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbcsAttr {
    /// A narrow glyph occupying one column.
    #[default]
    Single,
    /// First column of a wide glyph.
    Leading,
    /// Second column of a wide glyph.
    Trailing,
}

impl DbcsAttr {
    /// Check for `Single`.
    #[must_use]
    #[inline]
    pub const fn is_single(self) -> bool {
        matches!(self, Self::Single)
    }

    /// Check for `Leading`.
    #[must_use]
    #[inline]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Leading)
    }

    /// Check for `Trailing`.
    #[must_use]
    #[inline]
    pub const fn is_trailing(self) -> bool {
        matches!(self, Self::Trailing)
    }
}

/// What a cell applies to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttrBehavior {
    /// Apply both text and attribute.
    #[default]
    Normal,
    /// Apply text only; the column keeps whatever attribute it has.
    Current,
    /// Apply attribute only; the column keeps its text.
    StoredOnly,
}

/// One item of a cell stream: code units, column role, attribute, behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCell {
    chars: SmallVec<[u16; 2]>,
    dbcs: DbcsAttr,
    attr: TextAttribute,
    behavior: AttrBehavior,
}

impl OutputCell {
    /// A narrow glyph from a string slice (UTF-16 encoded).
    #[must_use]
    pub fn single(glyph: &str, attr: TextAttribute) -> Self {
        Self::from_units_str(glyph, DbcsAttr::Single, attr)
    }

    /// The leading half of a wide glyph from a string slice.
    #[must_use]
    pub fn leading(glyph: &str, attr: TextAttribute) -> Self {
        Self::from_units_str(glyph, DbcsAttr::Leading, attr)
    }

    /// The trailing half of a wide glyph, carrying the glyph's code units.
    #[must_use]
    pub fn trailing(glyph: &str, attr: TextAttribute) -> Self {
        Self::from_units_str(glyph, DbcsAttr::Trailing, attr)
    }

    /// A legacy DBCS trailing cell: the U+FFFF sentinel.
    ///
    /// Rows re-pair this with the glyph head in the previous column.
    #[must_use]
    pub fn trailing_sentinel(attr: TextAttribute) -> Self {
        Self {
            chars: SmallVec::from_slice(&[DBCS_TRAILING_SENTINEL]),
            dbcs: DbcsAttr::Trailing,
            attr,
            behavior: AttrBehavior::Normal,
        }
    }

    /// A cell from raw UTF-16 code units.
    #[must_use]
    pub fn from_units(units: &[u16], dbcs: DbcsAttr, attr: TextAttribute) -> Self {
        Self {
            chars: SmallVec::from_slice(units),
            dbcs,
            attr,
            behavior: AttrBehavior::Normal,
        }
    }

    /// An attribute-only cell: the column's text is left alone.
    #[must_use]
    pub fn stored_only(attr: TextAttribute) -> Self {
        Self {
            chars: SmallVec::from_slice(&[BLANK]),
            dbcs: DbcsAttr::Single,
            attr,
            behavior: AttrBehavior::StoredOnly,
        }
    }

    /// Return a copy with a different behavior.
    #[must_use]
    pub fn with_behavior(mut self, behavior: AttrBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    fn from_units_str(glyph: &str, dbcs: DbcsAttr, attr: TextAttribute) -> Self {
        let mut chars: SmallVec<[u16; 2]> = glyph.encode_utf16().collect();
        if chars.is_empty() {
            chars.push(BLANK);
        }
        Self {
            chars,
            dbcs,
            attr,
            behavior: AttrBehavior::Normal,
        }
    }

    /// The glyph's code units (or the trailing sentinel).
    #[must_use]
    #[inline]
    pub fn chars(&self) -> &[u16] {
        &self.chars
    }

    /// Column role.
    #[must_use]
    #[inline]
    pub fn dbcs(&self) -> DbcsAttr {
        self.dbcs
    }

    /// The attribute.
    #[must_use]
    #[inline]
    pub fn attr(&self) -> TextAttribute {
        self.attr
    }

    /// What the cell applies.
    #[must_use]
    #[inline]
    pub fn behavior(&self) -> AttrBehavior {
        self.behavior
    }
}

/// Cell stream over a string: one cell per column.
///
/// Grapheme clusters are segmented with UAX #29 and measured with the
/// standard width tables. Wide clusters emit a `Leading` cell followed by a
/// `Trailing` cell repeating the glyph; everything else (including
/// zero-width clusters, which the terminal still has to park somewhere)
/// emits one `Single` cell.
#[derive(Debug, Clone)]
pub struct CellStream<'a> {
    graphemes: unicode_segmentation::Graphemes<'a>,
    attr: TextAttribute,
    behavior: AttrBehavior,
    pending_trailing: Option<OutputCell>,
}

impl<'a> CellStream<'a> {
    /// Create a stream over `text` with a uniform attribute.
    #[must_use]
    pub fn new(text: &'a str, attr: TextAttribute) -> Self {
        Self {
            graphemes: text.graphemes(true),
            attr,
            behavior: AttrBehavior::Normal,
            pending_trailing: None,
        }
    }

    /// Return a copy of this stream with a different behavior.
    #[must_use]
    pub fn with_behavior(mut self, behavior: AttrBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

impl Iterator for CellStream<'_> {
    type Item = OutputCell;

    fn next(&mut self) -> Option<OutputCell> {
        if let Some(trailing) = self.pending_trailing.take() {
            return Some(trailing);
        }
        let grapheme = self.graphemes.next()?;
        let width = grapheme.width().clamp(1, 2);
        let cell = if width == 2 {
            self.pending_trailing =
                Some(OutputCell::trailing(grapheme, self.attr).with_behavior(self.behavior));
            OutputCell::leading(grapheme, self.attr)
        } else {
            OutputCell::single(grapheme, self.attr)
        };
        Some(cell.with_behavior(self.behavior))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_ascii() {
        let cells: Vec<_> = CellStream::new("ab", TextAttribute::DEFAULT).collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].chars(), &[u16::from(b'a')]);
        assert!(cells[0].dbcs().is_single());
        assert_eq!(cells[1].chars(), &[u16::from(b'b')]);
    }

    #[test]
    fn stream_wide_pairs_leading_trailing() {
        let cells: Vec<_> = CellStream::new("漢x", TextAttribute::DEFAULT).collect();
        assert_eq!(cells.len(), 3);
        assert!(cells[0].dbcs().is_leading());
        assert_eq!(cells[0].chars(), &[0x6F22]);
        // The trailing cell repeats the glyph; only legacy producers send
        // the sentinel.
        assert!(cells[1].dbcs().is_trailing());
        assert_eq!(cells[1].chars(), &[0x6F22]);
        assert!(cells[2].dbcs().is_single());
    }

    #[test]
    fn trailing_sentinel_cell() {
        let cell = OutputCell::trailing_sentinel(TextAttribute::DEFAULT);
        assert!(cell.dbcs().is_trailing());
        assert_eq!(cell.chars(), &[DBCS_TRAILING_SENTINEL]);
    }

    #[test]
    fn stream_combining_mark_stays_single() {
        // e + combining acute: one cluster, two code units, one column.
        let cells: Vec<_> = CellStream::new("e\u{0301}", TextAttribute::DEFAULT).collect();
        assert_eq!(cells.len(), 1);
        assert!(cells[0].dbcs().is_single());
        assert_eq!(cells[0].chars(), &[0x0065, 0x0301]);
    }

    #[test]
    fn stream_surrogate_pair() {
        // U+1F600 encodes as a surrogate pair and renders two columns wide.
        let cells: Vec<_> = CellStream::new("\u{1F600}", TextAttribute::DEFAULT).collect();
        assert_eq!(cells.len(), 2);
        assert!(cells[0].dbcs().is_leading());
        assert_eq!(cells[0].chars().len(), 2);
        assert!(cells[1].dbcs().is_trailing());
    }

    #[test]
    fn stored_only_cell() {
        let cell = OutputCell::stored_only(TextAttribute::DEFAULT);
        assert_eq!(cell.behavior(), AttrBehavior::StoredOnly);
        assert_eq!(cell.chars(), &[BLANK]);
    }
}
