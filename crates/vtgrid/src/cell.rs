//! The grid's atomic unit: one character cell.

use smallvec::SmallVec;

use crate::attrs::CellAttributes;
use crate::color::Color;

/// Inline capacity for a cell's glyph bytes. Four bytes covers any single
/// UTF-8 scalar value; a combining-character cluster rarely exceeds this
/// before it spills to the heap.
const GLYPH_INLINE: usize = 8;

pub type GlyphBuf = SmallVec<[u8; GLYPH_INLINE]>;

/// A single character cell: its glyph (UTF-8 bytes), foreground/background
/// color, and SGR attributes.
///
/// An empty cell is equivalent to a space with default colors and no
/// attributes, per [`Cell::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    glyph: GlyphBuf,
    pub fg: Color,
    pub bg: Color,
    pub attrs: CellAttributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

impl Cell {
    /// A blank cell: a single space, default colors, no attributes.
    #[must_use]
    pub fn blank() -> Self {
        let mut glyph = GlyphBuf::new();
        glyph.push(b' ');
        Self {
            glyph,
            fg: Color::Default,
            bg: Color::Default,
            attrs: CellAttributes::empty(),
        }
    }

    /// Build a cell holding `glyph` with the given paint state.
    #[must_use]
    pub fn new(glyph: &[u8], fg: Color, bg: Color, attrs: CellAttributes) -> Self {
        let mut buf = GlyphBuf::new();
        buf.extend_from_slice(glyph);
        Self {
            glyph: buf,
            fg,
            bg,
            attrs,
        }
    }

    /// The cell's glyph as raw UTF-8 bytes.
    #[must_use]
    pub fn glyph(&self) -> &[u8] {
        &self.glyph
    }

    /// Replace the glyph, leaving paint state untouched. Used when a wide
    /// rune overwrites a previously blank cell during printing.
    pub fn set_glyph(&mut self, glyph: &[u8]) {
        self.glyph.clear();
        self.glyph.extend_from_slice(glyph);
    }

    /// True when this cell carries nothing but a space with no paint —
    /// the grid's notion of "never written".
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.glyph.as_slice() == b" "
            && self.fg == Color::Default
            && self.bg == Color::Default
            && self.attrs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_blank() {
        let cell = Cell::default();
        assert!(cell.is_blank());
        assert_eq!(cell.glyph(), b" ");
    }

    #[test]
    fn set_glyph_overwrites_without_touching_paint() {
        let mut cell = Cell::new(b" ", Color::Indexed(1), Color::Default, CellAttributes::BOLD);
        cell.set_glyph("世".as_bytes());
        assert_eq!(cell.glyph(), "世".as_bytes());
        assert_eq!(cell.fg, Color::Indexed(1));
        assert!(cell.attrs.contains(CellAttributes::BOLD));
    }

    #[test]
    fn painted_space_is_not_blank() {
        let cell = Cell::new(b" ", Color::Indexed(2), Color::Default, CellAttributes::empty());
        assert!(!cell.is_blank());
    }
}
