//! Per-cell text attributes and terminal-wide mode flags.

use bitflags::bitflags;

bitflags! {
    /// Named SGR attributes carried by a single cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellAttributes: u8 {
        const BOLD        = 0b0000_0001;
        const FAINT       = 0b0000_0010;
        const ITALIC      = 0b0000_0100;
        const UNDERLINE   = 0b0000_1000;
        const INVERT      = 0b0001_0000;
        const CROSSED_OUT = 0b0010_0000;
    }
}

bitflags! {
    /// Terminal-wide mode flags, one set per [`crate::screen::Screen`].
    ///
    /// These are distinct from [`CellAttributes`]: they describe how the
    /// screen as a whole behaves rather than how one cell is painted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TerminalModes: u16 {
        /// DECAWM: wrap to the next line instead of overwriting the last column.
        const AUTOWRAP          = 0b0000_0001;
        /// DECCKM / cursor keys send `ESC O` instead of `ESC [`.
        const CURSOR_APP_MODE   = 0b0000_0010;
        /// DECSCNM: swap default fg/bg when painting.
        const REVERSE_VIDEO     = 0b0000_0100;
        /// xterm focus-tracking (`CSI I` / `CSI O` reports on focus change).
        const FOCUS_TRACKING    = 0b0000_1000;
        /// xterm bracketed paste (`ESC [200~` / `ESC [201~` wrap pasted text).
        const BRACKETED_PASTE   = 0b0001_0000;
        /// DECTCEM: cursor is visible.
        const CURSOR_VISIBLE    = 0b0010_0000;
        /// Cursor blinks (informational only; no timer is driven here).
        const CURSOR_BLINK      = 0b0100_0000;
        /// DECOM: cursor motion and reporting are relative to the scroll region.
        const ORIGIN_MODE       = 0b1000_0000;
    }
}

impl Default for TerminalModes {
    /// The power-on default: autowrap, cursor blink, and cursor visibility
    /// on, everything else off.
    fn default() -> Self {
        Self::AUTOWRAP | Self::CURSOR_VISIBLE | Self::CURSOR_BLINK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_modes_are_autowrap_visible_and_blinking() {
        let modes = TerminalModes::default();
        assert!(modes.contains(TerminalModes::AUTOWRAP));
        assert!(modes.contains(TerminalModes::CURSOR_VISIBLE));
        assert!(modes.contains(TerminalModes::CURSOR_BLINK));
        assert!(!modes.contains(TerminalModes::REVERSE_VIDEO));
    }

    #[test]
    fn cell_attributes_are_empty_by_default() {
        assert!(CellAttributes::default().is_empty());
    }
}
