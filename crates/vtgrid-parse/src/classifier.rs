//! Incremental byte classifier (C1).
//!
//! [`ByteClassifier`] turns a byte stream fed one byte at a time into a
//! sequence of [`Token`]s: plain characters, multi-byte UTF-8 runes, complete
//! CSI payloads, and ST-terminated OSC/DCS string payloads. It never blocks
//! and never panics on adversarial input; malformed leaders simply return the
//! state machine to [`ParserState::Idle`].

use smallvec::SmallVec;

/// Inline capacity for an in-progress CSI or OSC/DCS accumulator.
///
/// Most real sequences are a handful of bytes; this avoids heap allocation
/// for the common case while still growing for pathological input.
const SEQ_INLINE: usize = 32;

pub type SeqBuf = SmallVec<[u8; SEQ_INLINE]>;
pub type Utf8Buf = SmallVec<[u8; 4]>;

/// States of the classifier's internal state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Idle,
    Escape,
    Csi,
    WaitForSt,
    Utf8,
}

/// A classified unit of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A byte was consumed but no complete token was produced yet.
    Intermediate,
    /// A single plain byte (C0/C1 control byte or printable ASCII).
    Char(u8),
    /// A complete multi-byte UTF-8 rune.
    Utf8Rune(Utf8Buf),
    /// A complete CSI payload, final byte included as the last element.
    Csi(SeqBuf),
    /// A complete ST-terminated OSC/DCS payload. The first byte is the
    /// introducer (`]` for OSC, `P` for DCS); the ST itself is not included.
    StString(SeqBuf),
    /// A byte that could not be classified (e.g. a malformed UTF-8 leader).
    Unknown,
}

/// Incremental classifier for a VT-compatible byte stream.
///
/// One byte goes in, one [`Token`] comes out. The classifier owns the
/// accumulator for in-progress sequences so callers can feed bytes from
/// however many `read()` calls they like without losing state across them.
#[derive(Debug)]
pub struct ByteClassifier {
    state: ParserState,
    buffer: SeqBuf,
    utf8_read: u8,
    utf8_expected: u8,
}

impl Default for ByteClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteClassifier {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ParserState::Idle,
            buffer: SmallVec::new_const(),
            utf8_read: 0,
            utf8_expected: 0,
        }
    }

    /// Current parser state, exposed for diagnostics/tests.
    #[must_use]
    pub const fn state(&self) -> ParserState {
        self.state
    }

    /// Classify a single byte, returning the resulting token.
    ///
    /// Total and non-blocking: every byte produces exactly one `Token`.
    pub fn classify(&mut self, b: u8) -> Token {
        match self.state {
            ParserState::Idle => self.idle(b),
            ParserState::Escape => self.escape(b),
            ParserState::Csi => self.csi(b),
            ParserState::WaitForSt => self.wait_for_st(b),
            ParserState::Utf8 => self.utf8(b),
        }
    }

    fn idle(&mut self, b: u8) -> Token {
        match b {
            0x1B => {
                self.state = ParserState::Escape;
                Token::Intermediate
            }
            0xC0..=0xDF => self.start_utf8(b, 2),
            0xE0..=0xEF => self.start_utf8(b, 3),
            0xF0..=0xF7 => self.start_utf8(b, 4),
            _ => Token::Char(b),
        }
    }

    fn start_utf8(&mut self, b: u8, expected: u8) -> Token {
        self.buffer.clear();
        self.buffer.push(b);
        self.utf8_read = 1;
        self.utf8_expected = expected;
        self.state = ParserState::Utf8;
        Token::Intermediate
    }

    fn escape(&mut self, b: u8) -> Token {
        match b {
            b'[' => {
                self.buffer.clear();
                self.state = ParserState::Csi;
                Token::Intermediate
            }
            b'P' | b']' => {
                self.buffer.clear();
                self.buffer.push(b);
                self.state = ParserState::WaitForSt;
                Token::Intermediate
            }
            0x1B => Token::Intermediate,
            _ => {
                self.state = ParserState::Idle;
                Token::Char(b)
            }
        }
    }

    fn csi(&mut self, b: u8) -> Token {
        self.buffer.push(b);
        if is_csi_final(b) {
            self.state = ParserState::Idle;
            Token::Csi(std::mem::take(&mut self.buffer))
        } else {
            Token::Intermediate
        }
    }

    fn wait_for_st(&mut self, b: u8) -> Token {
        match b {
            0x07 | 0x9C => {
                self.state = ParserState::Idle;
                Token::StString(std::mem::take(&mut self.buffer))
            }
            b'\\' if self.buffer.last() == Some(&0x1B) => {
                self.buffer.pop();
                self.state = ParserState::Idle;
                Token::StString(std::mem::take(&mut self.buffer))
            }
            _ => {
                self.buffer.push(b);
                Token::Intermediate
            }
        }
    }

    fn utf8(&mut self, b: u8) -> Token {
        if b & 0xC0 != 0x80 {
            // Not a continuation byte: the leader was malformed.
            self.state = ParserState::Idle;
            self.buffer.clear();
            self.utf8_read = 0;
            return Token::Unknown;
        }
        self.buffer.push(b);
        self.utf8_read += 1;
        if self.utf8_read == self.utf8_expected {
            self.state = ParserState::Idle;
            let mut rune = Utf8Buf::new();
            rune.extend_from_slice(&self.buffer);
            self.buffer.clear();
            Token::Utf8Rune(rune)
        } else {
            Token::Intermediate
        }
    }
}

/// A CSI final byte lies in `0x40..=0x7E`.
#[must_use]
pub const fn is_csi_final(b: u8) -> bool {
    matches!(b, 0x40..=0x7E)
}
