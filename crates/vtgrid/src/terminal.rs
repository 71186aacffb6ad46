//! `TerminalCore`: the orchestrator that owns the byte classifier, the
//! primary/alternate screen pair, the write sink, and the title/title-stack
//! state that doesn't belong to either screen.

use tracing::debug;
use vtgrid_parse::{ByteClassifier, Token, csi};

use crate::attrs::TerminalModes;
use crate::cell::Cell;
use crate::dispatch::{self, Action, ScreenSelect};
use crate::error::ResizeError;
use crate::keymap::{self, KeyPress};
use crate::screen::{Cursor, Screen, DEFAULT_MAX_SCROLLBACK};

/// Everything the host's write loop needs to forward to the child pty.
///
/// The core never awaits completion; a partial write is the host's problem
/// (it must buffer and retry, e.g. on `EAGAIN`).
pub trait WriteSink {
    fn write(&mut self, bytes: &[u8]);
}

impl<F: FnMut(&[u8])> WriteSink for F {
    fn write(&mut self, bytes: &[u8]) {
        self(bytes);
    }
}

/// A consistent, read-only view of the active screen for a render consumer.
pub struct Snapshot<'a> {
    pub rows: usize,
    pub cols: usize,
    /// Row-major: one slice of cells per visible row.
    pub row_cells: Vec<&'a [Cell]>,
    pub cursor: Cursor,
    pub title: &'a str,
    pub reverse_video: bool,
}

/// Owns the classifier, the primary/alternate screen pair, and the
/// non-per-screen xterm extension state (title, title stack). Generic over
/// the write sink so it is never coupled to a concrete pty handle.
pub struct TerminalCore<W: WriteSink> {
    classifier: ByteClassifier,
    primary: Screen,
    alternate: Screen,
    active: ScreenSelect,
    title: String,
    title_stack: Vec<String>,
    write_sink: W,
}

impl<W: WriteSink> TerminalCore<W> {
    /// `TERM` value this core was designed against (spec §6 "Environment").
    /// Nothing in this crate reads or sets environment variables; process
    /// spawning is out of scope.
    pub const DEFAULT_TERM: &'static str = "rxvt";

    #[must_use]
    pub fn new(rows: usize, cols: usize, write_sink: W) -> Self {
        Self::with_scrollback(rows, cols, DEFAULT_MAX_SCROLLBACK, write_sink)
    }

    #[must_use]
    pub fn with_scrollback(rows: usize, cols: usize, max_scrollback: usize, write_sink: W) -> Self {
        Self {
            classifier: ByteClassifier::new(),
            primary: Screen::with_scrollback(rows, cols, max_scrollback),
            alternate: Screen::with_scrollback(rows, cols, max_scrollback),
            active: ScreenSelect::Primary,
            title: String::new(),
            title_stack: Vec::new(),
            write_sink,
        }
    }

    #[must_use]
    pub fn active_screen(&self) -> &Screen {
        match self.active {
            ScreenSelect::Primary => &self.primary,
            ScreenSelect::Alternate => &self.alternate,
        }
    }

    fn active_screen_mut(&mut self) -> &mut Screen {
        match self.active {
            ScreenSelect::Primary => &mut self.primary,
            ScreenSelect::Alternate => &mut self.alternate,
        }
    }

    /// Feed a slice of child-pty bytes through the classifier, dispatching
    /// each resulting token against the active screen in order. Tokens
    /// produced by this call, and any outbound replies they trigger, are
    /// applied/dispatched in byte order before `feed` returns.
    pub fn feed(&mut self, bytes: &[u8]) {
        let mut actions = Vec::new();
        for &b in bytes {
            let token = self.classifier.classify(b);
            self.handle_token(token, &mut actions);
        }
        self.run_actions(actions);
    }

    fn handle_token(&mut self, token: Token, actions: &mut Vec<Action>) {
        match token {
            Token::Intermediate => {}
            Token::Char(b) => dispatch::dispatch_control(self.active_screen_mut(), b, actions),
            Token::Utf8Rune(rune) => dispatch::dispatch_utf8_rune(self.active_screen_mut(), &rune),
            Token::Csi(payload) => {
                let cmd = csi::parse(&payload);
                dispatch::dispatch_csi(self.active_screen_mut(), &cmd, actions);
            }
            Token::StString(payload) => dispatch::dispatch_st_string(&payload, actions),
            Token::Unknown => debug!("malformed byte sequence dropped"),
        }
    }

    fn run_actions(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Write(bytes) => self.write_sink.write(&bytes),
                Action::Bell => {}
                Action::Switch { to, clear } => {
                    self.active = to;
                    if clear {
                        self.active_screen_mut().clear();
                    }
                }
                Action::SetTitle(title) => self.title = title,
                Action::PushTitle => self.title_stack.push(self.title.clone()),
                Action::PopTitle => {
                    if let Some(title) = self.title_stack.pop() {
                        self.title = title;
                    }
                }
            }
        }
    }

    /// Translate a key press to wire bytes (spec §6 keymap) and forward them
    /// to the write sink. Ordered with respect to other `input_key` calls;
    /// unordered with respect to child output, per the concurrency model.
    pub fn input_key(&mut self, key: KeyPress) {
        let app_mode = self
            .active_screen()
            .modes()
            .contains(TerminalModes::CURSOR_APP_MODE);
        let bytes = keymap::encode_key(key, app_mode);
        self.write_sink.write(&bytes);
    }

    /// Paste clipboard bytes, wrapping them in the bracketed-paste escapes
    /// if that mode is currently active.
    pub fn paste(&mut self, data: &[u8]) {
        let bracketed = self
            .active_screen()
            .modes()
            .contains(TerminalModes::BRACKETED_PASTE);
        let wrapped = keymap::wrap_paste(data, bracketed);
        self.write_sink.write(&wrapped);
    }

    /// Resize both screens. A resize is a boundary: call this only once all
    /// tokens from earlier `feed()` calls have been applied.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), ResizeError> {
        self.primary.resize(rows, cols)?;
        self.alternate.resize(rows, cols)?;
        Ok(())
    }

    /// A consistent read-only view of the active screen for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        let screen = self.active_screen();
        let row_cells = (0..screen.rows())
            .map(|r| screen.row(r).expect("row within screen.rows() always exists"))
            .collect();
        Snapshot {
            rows: screen.rows(),
            cols: screen.cols(),
            row_cells,
            cursor: screen.cursor(),
            title: &self.title,
            reverse_video: screen.modes().contains(TerminalModes::REVERSE_VIDEO),
        }
    }
}
