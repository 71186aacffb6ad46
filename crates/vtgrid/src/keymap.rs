//! Host-facing keyboard translation (spec §6): the wire bytes a host keymap
//! is expected to send for a given key press, including the DEC
//! application-cursor-keys variant and the bracketed-paste wrapper.
//!
//! Physical keyboard decoding (scancode → [`KeyCode`]) is the host's job;
//! this module only covers the pure `KeyPress -> bytes` step.

use bitflags::bitflags;
use smallvec::SmallVec;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT   = 0b001;
        const CONTROL = 0b010;
    }
}

/// A key press as delivered by the host, already resolved to a character or
/// named key (the host owns scancode → char/layout resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable character, already shifted by the host if Shift was held
    /// for a symbol key (spec: "Shift + symbol → the standard US-layout
    /// shifted symbol").
    Char(char),
    Backspace,
    Enter,
    Tab,
    Esc,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyPress {
    #[must_use]
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }
}

/// Encode a key press into the bytes to write to the child's pty.
///
/// `cursor_app_mode` is the screen's `CURSOR_APP_MODE` flag (DECCKM): when
/// set, the arrow keys send `ESC O <letter>` (SS3) instead of `ESC [
/// <letter>` (CSI).
#[must_use]
pub fn encode_key(key: KeyPress, cursor_app_mode: bool) -> SmallVec<[u8; 8]> {
    let mut buf = SmallVec::new();
    match key.code {
        KeyCode::Char(c) => {
            if key.mods.contains(KeyModifiers::CONTROL) {
                buf.push(control_code_for(c));
            } else if key.mods.contains(KeyModifiers::SHIFT) && c.is_ascii_lowercase() {
                buf.push(c.to_ascii_uppercase() as u8);
            } else if c.is_ascii() {
                buf.push(c as u8);
            } else {
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
        }
        KeyCode::Backspace => buf.push(0x7F),
        KeyCode::Enter => buf.push(0x0D),
        KeyCode::Tab => buf.push(0x09),
        KeyCode::Esc => buf.push(0x1B),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            buf.push(0x1B);
            buf.push(if cursor_app_mode { b'O' } else { b'[' });
            buf.push(match key.code {
                KeyCode::Up => b'A',
                KeyCode::Down => b'B',
                KeyCode::Right => b'C',
                KeyCode::Left => b'D',
                _ => unreachable!("only arrow keys reach this branch"),
            });
        }
    }
    buf
}

/// Map Ctrl+`c` to its control code: `a..z`/`A..Z` → `0x01..0x1A`, and the
/// four extra Ctrl targets `[`, `\`, `]`, `^`, `_` → `0x1B..0x1F`.
fn control_code_for(c: char) -> u8 {
    match c {
        '[' => 0x1B,
        '\\' => 0x1C,
        ']' => 0x1D,
        '^' => 0x1E,
        '_' => 0x1F,
        c if c.is_ascii_lowercase() => (c as u8) - b'a' + 1,
        c if c.is_ascii_uppercase() => c.to_ascii_lowercase() as u8 - b'a' + 1,
        _ => c as u8,
    }
}

/// Wrap pasted bytes in the bracketed-paste escape sequences, if the mode is
/// active. Uses the correct `ESC [ 2 0 0 ~` / `ESC [ 2 0 1 ~` introducers
/// (spec §9 notes the source's literal `0x01 b` prefix as a bug).
#[must_use]
pub fn wrap_paste(data: &[u8], bracketed: bool) -> Vec<u8> {
    if !bracketed {
        return data.to_vec();
    }
    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend_from_slice(b"\x1b[200~");
    out.extend_from_slice(data);
    out.extend_from_slice(b"\x1b[201~");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_is_passed_through() {
        let bytes = encode_key(KeyPress::new(KeyCode::Char('a'), KeyModifiers::empty()), false);
        assert_eq!(bytes.as_slice(), b"a");
    }

    #[test]
    fn shift_letter_uppercases() {
        let bytes = encode_key(KeyPress::new(KeyCode::Char('a'), KeyModifiers::SHIFT), false);
        assert_eq!(bytes.as_slice(), b"A");
    }

    #[test]
    fn ctrl_a_is_0x01() {
        let bytes = encode_key(KeyPress::new(KeyCode::Char('a'), KeyModifiers::CONTROL), false);
        assert_eq!(bytes.as_slice(), [0x01]);
    }

    #[test]
    fn ctrl_bracket_is_escape() {
        let bytes = encode_key(KeyPress::new(KeyCode::Char('['), KeyModifiers::CONTROL), false);
        assert_eq!(bytes.as_slice(), [0x1B]);
    }

    #[test]
    fn named_keys_map_to_single_bytes() {
        assert_eq!(
            encode_key(KeyPress::new(KeyCode::Backspace, KeyModifiers::empty()), false).as_slice(),
            [0x7F]
        );
        assert_eq!(
            encode_key(KeyPress::new(KeyCode::Enter, KeyModifiers::empty()), false).as_slice(),
            [0x0D]
        );
        assert_eq!(
            encode_key(KeyPress::new(KeyCode::Tab, KeyModifiers::empty()), false).as_slice(),
            [0x09]
        );
        assert_eq!(
            encode_key(KeyPress::new(KeyCode::Esc, KeyModifiers::empty()), false).as_slice(),
            [0x1B]
        );
    }

    #[test]
    fn arrow_key_uses_csi_by_default() {
        let bytes = encode_key(KeyPress::new(KeyCode::Up, KeyModifiers::empty()), false);
        assert_eq!(bytes.as_slice(), b"\x1b[A");
    }

    #[test]
    fn arrow_key_uses_ss3_in_application_mode() {
        let bytes = encode_key(KeyPress::new(KeyCode::Up, KeyModifiers::empty()), true);
        assert_eq!(bytes.as_slice(), b"\x1bOA");
    }

    #[test]
    fn bracketed_paste_wraps_with_correct_escape() {
        let wrapped = wrap_paste(b"pasted", true);
        assert_eq!(wrapped, b"\x1b[200~pasted\x1b[201~");
    }

    #[test]
    fn unbracketed_paste_is_unwrapped() {
        let wrapped = wrap_paste(b"pasted", false);
        assert_eq!(wrapped, b"pasted");
    }
}
