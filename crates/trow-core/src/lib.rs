//! Column-indexed row storage for terminal screen buffers.
//!
//! ## Design
//!
//! A terminal row must map a fixed grid of display columns onto glyphs of
//! very unequal shapes: a plain ASCII letter is one code unit in one
//! column, an East Asian character is one code unit across two columns, a
//! combining cluster is several code units in one column. This crate
//! stores each row as a packed UTF-16 buffer plus a column-indexed offset
//! table, so the common blank-or-ASCII row costs exactly one code unit per
//! column while arbitrary glyphs remain addressable by column in O(1).
//!
//! - [`Row`] — the storage itself: in-place glyph edits, bulk cell writes,
//!   resize, reset, trims, and glyph iteration.
//! - [`Rle`] — run-length-encoded attribute runs covering the row.
//! - [`TextAttribute`] — colors, flags and hyperlink id, one per run.
//! - [`CellStream`] / [`OutputCell`] — the input protocol for bulk writes,
//!   with wide glyphs split into leading/trailing column pairs.
//!
//! The row is a passive, single-owner data structure: no operation blocks,
//! allocates beyond its documented growth rule, or touches global state.
//! The owning screen buffer is responsible for serializing access.
//!
//! ## Example
//!
//! ```
//! use trow_core::{CellStream, Row, TextAttribute};
//!
//! let mut row = Row::new(20, TextAttribute::DEFAULT);
//! let mut cells = CellStream::new("héllo 世界", TextAttribute::DEFAULT).peekable();
//! row.write_cells(&mut cells, 0, None, None)?;
//!
//! assert_eq!(row.text().trim_end(), "héllo 世界");
//! assert!(row.contains_text());
//! # Ok::<(), trow_core::RowError>(())
//! ```

#![warn(missing_docs)]

pub mod attr;
pub mod cells;
pub mod rle;
pub mod row;

pub use attr::{AttrFlags, PackedColor, TextAttribute};
pub use cells::{
    AttrBehavior, CellStream, DbcsAttr, OutputCell, BLANK, DBCS_TRAILING_SENTINEL,
};
pub use rle::{Rle, Run};
pub use row::{DelimiterClass, Glyph, GlyphIter, LineRendition, Row, RowError, RowFlags};
