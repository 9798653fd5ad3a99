//! Row storage for a terminal screen buffer.
//!
//! ## Design
//!
//! A row is a fixed number of display columns backed by two arrays:
//!
//! ```text
//! chars:   packed UTF-16 code units        "a b 漢 é ..."
//! indices: width+1 offsets into chars      [0, 1, 2, 2, 3, 5, ...]
//! ```
//!
//! `indices[c]` is the offset of the glyph occupying column `c`;
//! `indices[width]` is the total number of stored code units. A glyph
//! spanning several columns repeats its offset, so a wide glyph is two
//! equal entries and a combining cluster is one column whose offset jumps
//! by more than one. Blank columns are single spaces, which keeps a freshly
//! reset row at the identity mapping `indices[c] = c`.
//!
//! Attributes live beside the text as run-length-encoded
//! `(TextAttribute, length)` pairs covering exactly the row width.
//!
//! Edits of arbitrary glyph width grow or shrink the packed buffer in
//! place, shifting the tail and reallocating at 1.5x when capacity runs
//! out. Overwriting any column of a wide glyph blanks the rest of that
//! glyph so no column ever points into half a glyph.

use std::fmt;
use std::iter::Peekable;
use std::ops::Range;

use crate::attr::TextAttribute;
use crate::cells::{AttrBehavior, DbcsAttr, OutputCell, BLANK, DBCS_TRAILING_SENTINEL};
use crate::rle::Rle;

#[inline]
fn u16_from_usize(value: usize) -> u16 {
    u16::try_from(value).expect("value must fit in u16")
}

/// Errors for the bounds-checked row entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// A column argument was past the end of the row.
    #[error("column {column} is out of range for a row of width {width}")]
    ColumnOutOfRange {
        /// The offending column.
        column: u16,
        /// The row's width.
        width: u16,
    },
    /// An edit would push the packed char buffer past the addressable limit.
    #[error("packed character storage would exceed {} code units", u16::MAX)]
    CharsOverflow,
}

bitflags::bitflags! {
    /// Row flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct RowFlags: u8 {
        /// The previous logical line spilled into this row (forced wrap).
        const WRAPPED = 1 << 0;
        /// A trailing column was cleared to pad a wide glyph that did not fit.
        const DOUBLE_BYTE_PADDED = 1 << 1;
        /// Double-width line (DECDWL or DECDHL).
        const DOUBLE_WIDTH = 1 << 2;
        /// Double-height line, top half (DECDHL).
        const DOUBLE_HEIGHT_TOP = 1 << 3;
        /// Double-height line, bottom half (DECDHL).
        const DOUBLE_HEIGHT_BOTTOM = 1 << 4;
    }
}

/// Line rendition (DEC line height/width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineRendition {
    /// Single-width, single-height line (default).
    #[default]
    SingleWidth,
    /// Double-width line (single-height).
    DoubleWidth,
    /// Double-height line, top half (also double-width).
    DoubleHeightTop,
    /// Double-height line, bottom half (also double-width).
    DoubleHeightBottom,
}

/// Word-navigation class of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterClass {
    /// Whitespace and control characters.
    ControlChar,
    /// A caller-designated word delimiter.
    DelimiterChar,
    /// Anything else.
    RegularChar,
}

/// One glyph yielded by [`Row::glyphs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph<'a> {
    /// The columns the glyph occupies (half-open).
    pub cols: Range<u16>,
    /// The glyph's code units.
    pub chars: &'a [u16],
}

/// Forward iterator over a row's glyphs.
#[derive(Debug, Clone)]
pub struct GlyphIter<'a> {
    chars: &'a [u16],
    indices: &'a [u16],
    width: u16,
    col: u16,
}

impl<'a> Iterator for GlyphIter<'a> {
    type Item = Glyph<'a>;

    fn next(&mut self) -> Option<Glyph<'a>> {
        if self.col >= self.width {
            return None;
        }
        let begin_col = self.col;
        let begin = self.indices[usize::from(self.col)];
        let mut col = self.col + 1;
        while col < self.width && self.indices[usize::from(col)] == begin {
            col += 1;
        }
        let end = self.indices[usize::from(col)];
        self.col = col;
        Some(Glyph {
            cols: begin_col..col,
            chars: &self.chars[usize::from(begin)..usize::from(end)],
        })
    }
}

/// A single row of the terminal.
///
/// The width is fixed at construction and changes only through
/// [`Row::resize`]. A row is single-owner mutable; the containing buffer
/// serializes access.
pub struct Row {
    /// Packed UTF-16 code units. `len()` is the allocated extent; the
    /// logical extent is `indices[width]`.
    chars: Vec<u16>,
    /// `width + 1` offsets into `chars`.
    indices: Vec<u16>,
    /// Column count.
    width: u16,
    /// Attribute runs covering exactly `width` columns.
    attr: Rle<TextAttribute>,
    /// Columns forced blank by wide-glyph padding. Lazily allocated.
    dbcs_padded: Option<Box<[bool]>>,
    /// Wrap, padding and rendition flags.
    flags: RowFlags,
}

impl Row {
    /// Create a blank row of `width` columns filled with `fill_attr`.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    #[must_use]
    pub fn new(width: u16, fill_attr: TextAttribute) -> Self {
        assert!(width > 0, "row width must be at least 1");
        Self {
            chars: vec![BLANK; usize::from(width)],
            indices: (0..=width).collect(),
            width,
            attr: Rle::new(width, fill_attr),
            dbcs_padded: None,
            flags: RowFlags::empty(),
        }
    }

    /// The column count.
    #[must_use]
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    // ------------------------------------------------------------------
    // Flags and rendition
    // ------------------------------------------------------------------

    /// Check if the previous logical line wrapped into this row.
    #[must_use]
    #[inline]
    pub fn is_wrapped(&self) -> bool {
        self.flags.contains(RowFlags::WRAPPED)
    }

    /// Set the forced-wrap flag.
    #[inline]
    pub fn set_wrapped(&mut self, wrapped: bool) {
        if wrapped {
            self.flags |= RowFlags::WRAPPED;
        } else {
            self.flags -= RowFlags::WRAPPED;
        }
    }

    /// Check if a trailing column was padded out for a wide glyph.
    #[must_use]
    #[inline]
    pub fn is_double_byte_padded(&self) -> bool {
        self.flags.contains(RowFlags::DOUBLE_BYTE_PADDED)
    }

    /// Set the double-byte-padded flag.
    #[inline]
    pub fn set_double_byte_padded(&mut self, padded: bool) {
        if padded {
            self.flags |= RowFlags::DOUBLE_BYTE_PADDED;
        } else {
            self.flags -= RowFlags::DOUBLE_BYTE_PADDED;
        }
    }

    /// Check if `col` was forced blank by wide-glyph padding.
    #[must_use]
    pub fn is_dbcs_padded(&self, col: u16) -> bool {
        self.dbcs_padded
            .as_ref()
            .is_some_and(|p| p.get(usize::from(col)).copied().unwrap_or(false))
    }

    /// Get the current line rendition.
    #[must_use]
    pub fn line_rendition(&self) -> LineRendition {
        if self.flags.contains(RowFlags::DOUBLE_HEIGHT_TOP) {
            LineRendition::DoubleHeightTop
        } else if self.flags.contains(RowFlags::DOUBLE_HEIGHT_BOTTOM) {
            LineRendition::DoubleHeightBottom
        } else if self.flags.contains(RowFlags::DOUBLE_WIDTH) {
            LineRendition::DoubleWidth
        } else {
            LineRendition::SingleWidth
        }
    }

    /// Set the line rendition.
    pub fn set_line_rendition(&mut self, rendition: LineRendition) {
        self.flags.remove(
            RowFlags::DOUBLE_WIDTH | RowFlags::DOUBLE_HEIGHT_TOP | RowFlags::DOUBLE_HEIGHT_BOTTOM,
        );
        match rendition {
            LineRendition::SingleWidth => {}
            LineRendition::DoubleWidth => {
                self.flags |= RowFlags::DOUBLE_WIDTH;
            }
            LineRendition::DoubleHeightTop => {
                self.flags |= RowFlags::DOUBLE_WIDTH | RowFlags::DOUBLE_HEIGHT_TOP;
            }
            LineRendition::DoubleHeightBottom => {
                self.flags |= RowFlags::DOUBLE_WIDTH | RowFlags::DOUBLE_HEIGHT_BOTTOM;
            }
        }
    }

    // ------------------------------------------------------------------
    // Reset and resize
    // ------------------------------------------------------------------

    /// Reset the row to blanks with a single run of `fill_attr`.
    ///
    /// Releases any char buffer grown past the width baseline and the
    /// padding bitmap, and clears every flag including the rendition.
    pub fn reset(&mut self, fill_attr: TextAttribute) {
        let width = usize::from(self.width);
        if self.chars.len() != width {
            self.chars = vec![BLANK; width];
        } else {
            self.chars.fill(BLANK);
        }
        self.dbcs_padded = None;
        for (i, idx) in self.indices.iter_mut().enumerate() {
            *idx = u16_from_usize(i);
        }
        self.attr = Rle::new(self.width, fill_attr);
        self.flags = RowFlags::empty();
    }

    /// Resize the row to `new_width` columns.
    ///
    /// Widening fills new columns with blanks. Narrowing drops a wide glyph
    /// entirely when its trailing half would fall off the right edge.
    /// Attribute runs are stretched or truncated to the new width; flags
    /// are untouched.
    ///
    /// # Panics
    ///
    /// Panics if `new_width` is zero.
    pub fn resize(&mut self, new_width: u16) {
        assert!(new_width > 0, "row width must be at least 1");

        let mut cols_to_copy = usize::from(self.width.min(new_width));
        let chars_to_copy = usize::from(self.indices[cols_to_copy]);
        // Back off the copy while the last column is mid-glyph: a wide
        // glyph whose trailing half would be cut is dropped whole.
        while cols_to_copy != 0 && usize::from(self.indices[cols_to_copy - 1]) == chars_to_copy {
            cols_to_copy -= 1;
        }

        let trailing_whitespace = usize::from(new_width) - cols_to_copy;
        let chars_len = chars_to_copy + trailing_whitespace;

        let mut chars = vec![BLANK; chars_len.max(usize::from(new_width))];
        chars[..chars_to_copy].copy_from_slice(&self.chars[..chars_to_copy]);

        let mut indices = Vec::with_capacity(usize::from(new_width) + 1);
        indices.extend_from_slice(&self.indices[..cols_to_copy]);
        for i in 0..=trailing_whitespace {
            indices.push(u16_from_usize(chars_to_copy + i));
        }

        let dbcs_padded = self.dbcs_padded.as_ref().map(|old| {
            let mut fresh = vec![false; usize::from(new_width)].into_boxed_slice();
            fresh[..cols_to_copy].copy_from_slice(&old[..cols_to_copy]);
            fresh
        });

        self.chars = chars;
        self.indices = indices;
        self.dbcs_padded = dbcs_padded;
        self.width = new_width;
        self.attr.resize_trailing_extent(new_width);
    }

    // ------------------------------------------------------------------
    // Text storage
    // ------------------------------------------------------------------

    /// Write one glyph occupying `glyph_width` columns starting at `col`.
    ///
    /// Any pre-existing glyph that overlaps the target range is replaced
    /// whole: its other columns become blanks. Out-of-range or degenerate
    /// arguments are a no-op. The only error is an edit that would push the
    /// packed buffer past `u16::MAX` code units, checked before anything
    /// is modified.
    pub fn replace_characters(
        &mut self,
        col: u16,
        glyph_width: u16,
        glyph: &[u16],
    ) -> Result<(), RowError> {
        let col1 = usize::from(col);
        let col2 = usize::from(col).saturating_add(usize::from(glyph_width));
        if col1 >= col2 || col2 > usize::from(self.width) || glyph.is_empty() {
            return Ok(());
        }

        // Expand left across the leading columns of any glyph we land in.
        let mut col0 = col1;
        let ch0 = self.indices[col1];
        while col0 > 0 && self.indices[col0 - 1] == ch0 {
            col0 -= 1;
        }

        // Expand right to cover every column of the glyph headed at col2-1.
        // indices[width] is the total length and every glyph stores at
        // least one code unit, so the scan stops at width at the latest.
        let mut col3 = col2 - 1;
        let ch1;
        {
            let ch1_ref = self.indices[col3];
            loop {
                col3 += 1;
                let next = self.indices[col3];
                if next != ch1_ref {
                    ch1 = next;
                    break;
                }
            }
        }

        let leading_spaces = col1 - col0;
        let trailing_spaces = col3 - col2;
        let inserted = glyph.len() + leading_spaces + trailing_spaces;
        let new_ch1 = usize::from(ch0) + inserted;

        if new_ch1 != usize::from(ch1) {
            self.resize_chars(usize::from(ch0), usize::from(ch1), new_ch1, col3)?;
        }

        // Blanks for the clipped lead-in, the glyph itself, blanks for the
        // clipped tail.
        let mut ch = usize::from(ch0);
        for i in col0..col1 {
            self.chars[ch] = BLANK;
            self.indices[i] = u16_from_usize(ch);
            ch += 1;
        }
        self.chars[ch..ch + glyph.len()].copy_from_slice(glyph);
        let glyph_start = u16_from_usize(ch);
        for i in col1..col2 {
            self.indices[i] = glyph_start;
        }
        ch += glyph.len();
        for i in col2..col3 {
            self.chars[ch] = BLANK;
            self.indices[i] = u16_from_usize(ch);
            ch += 1;
        }

        Ok(())
    }

    /// Shift the tail of `chars` so the replaced region spans
    /// `[ch0, new_ch1)`, growing the buffer at 1.5x when it runs out.
    ///
    /// Allocation happens before any destructive change, so a failed size
    /// check leaves the row untouched.
    fn resize_chars(
        &mut self,
        ch0: usize,
        ch1: usize,
        new_ch1: usize,
        col3: usize,
    ) -> Result<(), RowError> {
        let current_len = usize::from(self.indices[usize::from(self.width)]);
        let tail_len = current_len - ch1;
        let new_len = new_ch1 + tail_len;
        if new_len > usize::from(u16::MAX) {
            return Err(RowError::CharsOverflow);
        }

        if new_len <= self.chars.len() {
            self.chars.copy_within(ch1..current_len, new_ch1);
        } else {
            let min_capacity = self.chars.len() + (self.chars.len() >> 1);
            let new_capacity = new_len.max(min_capacity).min(usize::from(u16::MAX));
            let mut fresh = vec![BLANK; new_capacity];
            fresh[..ch0].copy_from_slice(&self.chars[..ch0]);
            fresh[new_ch1..new_len].copy_from_slice(&self.chars[ch1..current_len]);
            self.chars = fresh;
        }

        for idx in &mut self.indices[col3..] {
            *idx = u16_from_usize(usize::from(*idx) - ch1 + new_ch1);
        }
        Ok(())
    }

    /// Clear one cell to a blank.
    ///
    /// Partial overwrites of a wide glyph blank the rest of it, exactly as
    /// [`Row::replace_characters`] does. Out-of-range columns are a no-op.
    /// Clearing one half of a single-code-unit wide glyph writes two blanks
    /// where one unit was stored, so even a clear can grow the buffer and
    /// hit the packed-extent limit.
    pub fn clear_cell(&mut self, col: u16) -> Result<(), RowError> {
        self.replace_characters(col, 1, &[BLANK])
    }

    /// Bounds-checked [`Row::clear_cell`].
    pub fn clear_column(&mut self, col: u16) -> Result<(), RowError> {
        if col >= self.width {
            return Err(RowError::ColumnOutOfRange {
                column: col,
                width: self.width,
            });
        }
        self.clear_cell(col)
    }

    // ------------------------------------------------------------------
    // Bulk writes
    // ------------------------------------------------------------------

    /// Write a stream of cells into the row starting at `index`.
    ///
    /// Consumes one cell per column written and leaves `cells` positioned
    /// at the first unconsumed cell, so the caller can continue on the next
    /// row. Wide glyphs arrive as a `Leading` cell followed by a `Trailing`
    /// cell, one column each; the leading cell writes the whole glyph.
    ///
    /// - A `Leading` cell that lands on the last writable column is not
    ///   consumed; the column is cleared and the row marked
    ///   double-byte-padded so the next row carries the glyph.
    /// - A `Trailing` cell carrying the legacy U+FFFF sentinel re-pairs
    ///   with the glyph headed in the previous column (or is dropped at
    ///   column 0); any other trailing cell just advances the column.
    /// - `wrap` is applied to the forced-wrap flag only when the last
    ///   writable column received text: `Some(true)` for stream fills,
    ///   `Some(false)` for block fills, `None` to leave it alone.
    /// - `limit_right` is the last writable column (inclusive), defaulting
    ///   to the row's last column.
    ///
    /// Attributes are committed as coalesced runs; cells with
    /// [`AttrBehavior::Current`] keep the column's attribute and cells with
    /// [`AttrBehavior::StoredOnly`] keep its text.
    pub fn write_cells<I>(
        &mut self,
        cells: &mut Peekable<I>,
        index: u16,
        wrap: Option<bool>,
        limit_right: Option<u16>,
    ) -> Result<(), RowError>
    where
        I: Iterator<Item = OutputCell>,
    {
        if index >= self.width {
            return Err(RowError::ColumnOutOfRange {
                column: index,
                width: self.width,
            });
        }
        if let Some(limit) = limit_right {
            if limit >= self.width {
                return Err(RowError::ColumnOutOfRange {
                    column: limit,
                    width: self.width,
                });
            }
        }
        let final_col = limit_right.unwrap_or(self.width - 1);

        let mut current_color = match cells.peek() {
            Some(cell) => cell.attr(),
            None => return Ok(()),
        };
        let mut color_uses: u16 = 0;
        let mut color_starts = index;
        let mut current = index;

        while current <= final_col {
            let Some(cell) = cells.peek() else { break };
            let (dbcs, attr, behavior) = (cell.dbcs(), cell.attr(), cell.behavior());

            if behavior != AttrBehavior::Current {
                if current_color == attr {
                    color_uses += 1;
                } else {
                    // Commit the finished run and open a new one here.
                    self.attr.replace(color_starts, current, current_color);
                    current_color = attr;
                    color_uses = 1;
                    color_starts = current;
                }
            }

            if behavior != AttrBehavior::StoredOnly {
                let filling_last_column = current == final_col;
                match dbcs {
                    DbcsAttr::Single => {
                        if let Some(cell) = cells.next() {
                            self.replace_characters(current, 1, cell.chars())?;
                        }
                    }
                    DbcsAttr::Leading => {
                        if filling_last_column {
                            // A wide glyph cannot start in the last column.
                            // Pad the cell out and leave the glyph for the
                            // next row.
                            self.clear_cell(current)?;
                            self.set_double_byte_padded(true);
                            self.mark_dbcs_padded(current);
                        } else if let Some(cell) = cells.next() {
                            self.replace_characters(current, 2, cell.chars())?;
                        }
                    }
                    DbcsAttr::Trailing => {
                        if let Some(cell) = cells.next() {
                            if matches!(cell.chars(), &[DBCS_TRAILING_SENTINEL]) && current != 0 {
                                let col = current - 1;
                                let head =
                                    self.chars[usize::from(self.indices[usize::from(col)])];
                                self.replace_characters(
                                    col,
                                    2,
                                    &[head, DBCS_TRAILING_SENTINEL],
                                )?;
                            }
                            // A trailing half with no leading column to
                            // pair with is dropped.
                        }
                    }
                }

                if filling_last_column {
                    if let Some(wrap) = wrap {
                        self.set_wrapped(wrap);
                    }
                }
            } else {
                cells.next();
            }

            current += 1;
        }

        if color_uses > 0 {
            self.attr.replace(color_starts, current, current_color);
        }
        Ok(())
    }

    fn mark_dbcs_padded(&mut self, col: u16) {
        let width = usize::from(self.width);
        let padded = self
            .dbcs_padded
            .get_or_insert_with(|| vec![false; width].into_boxed_slice());
        if let Some(slot) = padded.get_mut(usize::from(col)) {
            *slot = true;
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The code units of the glyph occupying `col`.
    ///
    /// Columns past the end are clamped to the last column.
    #[must_use]
    pub fn glyph_at(&self, col: u16) -> &[u16] {
        let mut col = usize::from(col.min(self.width - 1));
        let current = self.indices[col];
        col += 1;
        while col < usize::from(self.width) && self.indices[col] == current {
            col += 1;
        }
        &self.chars[usize::from(current)..usize::from(self.indices[col])]
    }

    /// The column role at `col`: a narrow glyph, or the leading or trailing
    /// half of a wide one. Columns past the end are clamped.
    #[must_use]
    pub fn dbcs_attr_at(&self, col: u16) -> DbcsAttr {
        let col = usize::from(col.min(self.width - 1));
        let idx = self.indices[col];
        if col > 0 && self.indices[col - 1] == idx {
            DbcsAttr::Trailing
        } else if col < usize::from(self.width) && self.indices[col + 1] == idx {
            DbcsAttr::Leading
        } else {
            DbcsAttr::Single
        }
    }

    /// Offset of the first non-blank code unit.
    ///
    /// This is an offset into the packed char buffer, not a column; with
    /// wide or multi-unit glyphs in the row the two disagree.
    #[must_use]
    pub fn measure_left(&self) -> usize {
        let end = self.text_extent();
        self.chars[..end]
            .iter()
            .position(|&c| c != BLANK)
            .unwrap_or(end)
    }

    /// Offset one past the last non-blank code unit.
    ///
    /// Like [`Row::measure_left`], an offset into the packed char buffer.
    #[must_use]
    pub fn measure_right(&self) -> usize {
        let end = self.text_extent();
        self.chars[..end]
            .iter()
            .rposition(|&c| c != BLANK)
            .map_or(0, |p| p + 1)
    }

    /// Check if any stored code unit is not a blank.
    #[must_use]
    pub fn contains_text(&self) -> bool {
        self.chars[..self.text_extent()].iter().any(|&c| c != BLANK)
    }

    /// The packed UTF-16 view of the whole row.
    #[must_use]
    pub fn text_raw(&self) -> &[u16] {
        &self.chars[..self.text_extent()]
    }

    /// The row's text as a `String` (lossy for unpaired surrogates).
    ///
    /// The DBCS trailing sentinel, when present, comes through as U+FFFF.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf16_lossy(self.text_raw())
    }

    /// Classify the glyph at `col` for word navigation.
    ///
    /// `word_delimiters` is the caller's delimiter set as UTF-16 code
    /// units; only the first code unit of the glyph is considered.
    #[must_use]
    pub fn delimiter_class_at(&self, col: u16, word_delimiters: &[u16]) -> DelimiterClass {
        let col = usize::from(col.min(self.width - 1));
        let ch = self.chars[usize::from(self.indices[col])];
        if ch <= BLANK {
            DelimiterClass::ControlChar
        } else if word_delimiters.contains(&ch) {
            DelimiterClass::DelimiterChar
        } else {
            DelimiterClass::RegularChar
        }
    }

    /// Iterate the row's glyphs in column order.
    #[must_use]
    pub fn glyphs(&self) -> GlyphIter<'_> {
        GlyphIter {
            chars: &self.chars,
            indices: &self.indices,
            width: self.width,
            col: 0,
        }
    }

    #[inline]
    fn text_extent(&self) -> usize {
        usize::from(self.indices[usize::from(self.width)])
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// The attribute runs.
    #[must_use]
    #[inline]
    pub fn attributes(&self) -> &Rle<TextAttribute> {
        &self.attr
    }

    /// Replace all attribute runs wholesale, stretched to `new_width`.
    ///
    /// Used by reflow, where the caller has already resized the row.
    pub fn transfer_attributes(&mut self, attr: &Rle<TextAttribute>, new_width: u16) {
        debug_assert_eq!(new_width, self.width);
        self.attr = attr.clone();
        self.attr.resize_trailing_extent(new_width);
    }

    /// The attribute at `col`, or `None` past the end.
    #[must_use]
    pub fn attr_at(&self, col: u16) -> Option<TextAttribute> {
        self.attr.at(col)
    }

    /// Overwrite the attributes of columns `[begin, width)`.
    pub fn set_attr_to_end(&mut self, begin: u16, attr: TextAttribute) {
        let width = self.attr.len();
        self.attr.replace(begin, width, attr);
    }

    /// Overwrite the attributes of columns `[begin, end)`.
    pub fn replace_attr_range(&mut self, begin: u16, end: u16, attr: TextAttribute) {
        self.attr.replace(begin, end, attr);
    }

    /// Rewrite every run holding `old` to hold `new`.
    pub fn replace_attrs(&mut self, old: TextAttribute, new: TextAttribute) {
        self.attr.replace_values(old, new);
    }

    /// Hyperlink ids of the row's hyperlink runs, in run order.
    ///
    /// An id shows up once per run, so a link interrupted by another
    /// attribute appears twice.
    #[must_use]
    pub fn hyperlinks(&self) -> Vec<u16> {
        self.attr
            .runs()
            .iter()
            .filter(|run| run.value.is_hyperlink())
            .map(|run| run.value.hyperlink_id())
            .collect()
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("width", &self.width)
            .field("flags", &self.flags)
            .field("text", &self.text())
            .field("attr_runs", &self.attr.run_count())
            .finish()
    }
}


#[cfg(kani)]
mod proofs {
    /// The expanded replace region stays inside the indices table and its
    /// blank counts never overflow the column arithmetic.
    ///
    /// The expansion scans guarantee `col0 <= col1 < col2 <= col3 <= width`;
    /// everything the write loop does follows from that ordering.
    #[kani::proof]
    fn replace_region_arithmetic_safe() {
        let width: u16 = kani::any();
        let col0: u16 = kani::any();
        let col1: u16 = kani::any();
        let col2: u16 = kani::any();
        let col3: u16 = kani::any();
        kani::assume(width > 0 && width <= 500);
        kani::assume(col0 <= col1 && col1 < col2 && col2 <= col3 && col3 <= width);

        let leading = col1 - col0;
        let trailing = col3 - col2;
        kani::assert(
            u32::from(leading) + u32::from(trailing) <= u32::from(width),
            "blank fill never exceeds the row width",
        );
        kani::assert(
            usize::from(col3) <= usize::from(width),
            "index shift starts inside the table",
        );
    }

    /// Resize's wide-glyph clipping keeps copied columns plus trailing
    /// blanks equal to the new width.
    #[kani::proof]
    fn resize_clip_bounds_safe() {
        let width: u16 = kani::any();
        let new_width: u16 = kani::any();
        let cols_to_copy: u16 = kani::any();
        kani::assume(width > 0 && width <= 500);
        kani::assume(new_width > 0 && new_width <= 500);
        // The clipping loop only ever lowers cols_to_copy from min(W, newW).
        kani::assume(cols_to_copy <= width.min(new_width));

        let trailing = new_width - cols_to_copy;
        kani::assert(
            u32::from(cols_to_copy) + u32::from(trailing) == u32::from(new_width),
            "copied columns plus blanks equal the new width",
        );
        kani::assert(
            cols_to_copy <= width,
            "copy source stays inside the old row",
        );
    }
}
