//! VT-compatible terminal core.
//!
//! Turns a byte stream from a child process's pseudo-terminal master into a
//! grid of styled glyphs plus cursor state ([`screen::Screen`] mutated via
//! [`dispatch`]), and turns host input events into output bytes for that
//! same pty ([`keymap`]). [`terminal::TerminalCore`] is the orchestrator that
//! ties the byte classifier (`vtgrid-parse`), the primary/alternate screen
//! pair, and the write sink together.
//!
//! pty allocation, child-process spawning, GUI rendering, clipboard
//! integration, and physical-keyboard decoding are all out of scope — those
//! are the host's job; see [`terminal::WriteSink`] and [`keymap`] for the seams.

pub mod attrs;
pub mod cell;
pub mod color;
pub mod dispatch;
pub mod error;
pub mod keymap;
pub mod screen;
pub mod terminal;

pub use crate::dispatch::{Action, ScreenSelect};
pub use crate::error::{CursorError, ResizeError};
pub use crate::terminal::{Snapshot, TerminalCore, WriteSink};
