//! CSI/OSC action dispatch (C4).
//!
//! Turns a parsed [`CsiCommand`], an ST-terminated OSC/DCS payload, a UTF-8
//! rune, or a single control byte into mutations on a [`Screen`] plus a list
//! of [`Action`]s the owning [`crate::terminal::TerminalCore`] must carry out
//! (writing reply bytes, switching the active screen, touching the title
//! stack). Dispatch functions never hold a back-pointer to the core; they
//! take the active `Screen` by `&mut` and push whatever else is needed onto
//! an `Action` list, per the "explicit write_sink capability" design note.

use tracing::{debug, warn};
use vtgrid_parse::csi::CsiCommand;

use crate::attrs::TerminalModes;
use crate::screen::Screen;

/// Which of the two screens is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSelect {
    Primary,
    Alternate,
}

/// Something the dispatcher could not do itself because it only has access
/// to the currently active [`Screen`] — a reply to write, a screen switch,
/// or a title-stack operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Bytes to hand to the write sink verbatim (DA/DSR replies).
    Write(Vec<u8>),
    /// BEL received; the renderer may flash. Carries no payload.
    Bell,
    /// Switch the active screen, optionally clearing the destination.
    Switch { to: ScreenSelect, clear: bool },
    /// OSC 0: set the window title.
    SetTitle(String),
    /// XTWINOPS `22;*`: push the current title onto the title stack.
    PushTitle,
    /// XTWINOPS `23;*`: pop the title stack into the current title.
    PopTitle,
}

/// Dispatch a control byte received as `Char(b)` from the classifier's Idle
/// state (everything that wasn't the start of an escape or UTF-8 sequence).
pub fn dispatch_control(screen: &mut Screen, byte: u8, out: &mut Vec<Action>) {
    match byte {
        0x07 => out.push(Action::Bell),
        0x08 => screen.backspace(),
        0x0A | 0x0B | 0x0C => screen.newline(),
        0x0D => screen.carriage_return(),
        0x0E => debug!("SO received: character-set shift unsupported"),
        0x0F => {} // SI: shift in G0, already the only set we support.
        0x7F => {}
        b if b < 0x20 => {}
        b => screen.put_char(&[b]),
    }
}

/// Dispatch a complete UTF-8 rune.
pub fn dispatch_utf8_rune(screen: &mut Screen, rune: &[u8]) {
    screen.put_char(rune);
}

/// Dispatch a parsed CSI command against the active screen.
pub fn dispatch_csi(screen: &mut Screen, cmd: &CsiCommand, out: &mut Vec<Action>) {
    match (cmd.prefix, cmd.final_byte) {
        (None, b'A') => screen.cursor_move(-(cmd.param1() as isize), 0),
        (None, b'B') => screen.cursor_move(cmd.param1() as isize, 0),
        (None, b'C') => screen.cursor_move(0, cmd.param1() as isize),
        (None, b'D') => screen.cursor_move(0, -(cmd.param1() as isize)),
        (None, b'G') => screen.cursor_to_column(cmd.param1() as usize),
        (None, b'H' | b'f') => {
            let row = cmd.param(0, 1) as usize;
            let col = cmd.param(1, 1) as usize;
            if let Err(err) = screen.cursor_to(row, col) {
                warn!(%err, row, col, "CUP/HVP out of range, dropped");
            }
        }
        (None, b'J') => screen.erase_in_display(cmd.param(0, 0)),
        (None, b'K') => screen.erase_in_line(cmd.param(0, 0)),
        (None, b'S') => screen.scroll(-(cmd.param1() as isize)),
        (None, b'T') => screen.scroll(cmd.param1() as isize),
        (None, b'X') => screen.erase_chars(cmd.param1() as usize),
        (None, b'c') => out.push(Action::Write(b"\x1b[?1;2c".to_vec())),
        (Some(b'>'), b'c') => out.push(Action::Write(b"\x1b[>0;95;0c".to_vec())),
        (None, b'd') => screen.cursor_to_row(cmd.param1() as usize),
        (Some(b'?'), b'h') => dec_private_mode(screen, cmd, true, out),
        (Some(b'?'), b'l') => dec_private_mode(screen, cmd, false, out),
        (None, b'h' | b'l') => {
            debug!(final_byte = %(cmd.final_byte as char), "ANSI mode set/reset, no-op");
        }
        (None, b'm') => apply_sgr(screen, cmd),
        (Some(b'>'), b'm') => {} // XTMODKEYS
        (None, b'n') => {
            if cmd.param(0, 0) == 6 {
                let cursor = screen.cursor();
                let reply = format!("\x1b[{};{}R", cursor.row + 1, cursor.col + 1);
                out.push(Action::Write(reply.into_bytes()));
            }
        }
        (Some(b'?'), b'p') => {} // XTSMPOINTER
        (None, b'r') => debug!("DECSTBM accepted, scroll region not honored"),
        (None, b't') => xtwinops(cmd, out),
        _ => warn!(
            prefix = ?cmd.prefix.map(|b| b as char),
            final_byte = %(cmd.final_byte as char),
            params = ?cmd.params.as_slice(),
            "unknown CSI sequence, dropped"
        ),
    }
}

fn dec_private_mode(screen: &mut Screen, cmd: &CsiCommand, enable: bool, out: &mut Vec<Action>) {
    for param in &cmd.params {
        let Some(code) = param else { continue };
        match code {
            1 => screen.set_mode(TerminalModes::CURSOR_APP_MODE, enable),
            3 => screen.clear(),
            5 => screen.set_mode(TerminalModes::REVERSE_VIDEO, enable),
            6 => {
                if enable {
                    debug!("origin mode set is unsupported");
                } else {
                    screen.home_cursor();
                }
            }
            7 => screen.set_mode(TerminalModes::AUTOWRAP, enable),
            12 => screen.set_mode(TerminalModes::CURSOR_BLINK, enable),
            25 => screen.set_mode(TerminalModes::CURSOR_VISIBLE, enable),
            47 | 1049 => out.push(Action::Switch {
                to: if enable {
                    ScreenSelect::Alternate
                } else {
                    ScreenSelect::Primary
                },
                clear: enable,
            }),
            1004 => screen.set_mode(TerminalModes::FOCUS_TRACKING, enable),
            2004 => screen.set_mode(TerminalModes::BRACKETED_PASTE, enable),
            other => debug!(mode = other, enable, "unknown DEC private mode, dropped"),
        }
    }
}

/// Apply every SGR parameter in a CSI `m` command, left to right, handling
/// the `38;5;N` / `48;5;N` extended-color triples specially.
fn apply_sgr(screen: &mut Screen, cmd: &CsiCommand) {
    if cmd.params.is_empty() {
        screen.apply_sgr(0);
        return;
    }
    let mut i = 0;
    while i < cmd.params.len() {
        let code = cmd.params[i].unwrap_or(0);
        let next = cmd.params.get(i + 1).copied().flatten();
        match (code, next) {
            (38, Some(5)) => {
                if let Some(Some(n)) = cmd.params.get(i + 2) {
                    screen.set_fg_indexed(*n as u8);
                }
                i += 3;
            }
            (48, Some(5)) => {
                if let Some(Some(n)) = cmd.params.get(i + 2) {
                    screen.set_bg_indexed(*n as u8);
                }
                i += 3;
            }
            _ => {
                screen.apply_sgr(code);
                i += 1;
            }
        }
    }
}

fn xtwinops(cmd: &CsiCommand, out: &mut Vec<Action>) {
    match cmd.param(0, 0) {
        22 => out.push(Action::PushTitle),
        23 => out.push(Action::PopTitle),
        other => debug!(op = other, "XTWINOPS no-op"),
    }
}

/// Dispatch a complete ST-terminated string (OSC or DCS, introducer byte
/// included, ST itself stripped by the classifier).
pub fn dispatch_st_string(payload: &[u8], out: &mut Vec<Action>) {
    match payload.first() {
        Some(b']') => dispatch_osc(&payload[1..], out),
        Some(b'P') => debug!(len = payload.len(), "DCS payload ignored"),
        _ => warn!(payload = %hexdump(payload), "unrecognized string-terminated payload, dropped"),
    }
}

fn dispatch_osc(body: &[u8], out: &mut Vec<Action>) {
    let mut parts = body.splitn(2, |&b| b == b';');
    let code = parts.next().unwrap_or(b"");
    let rest = parts.next();
    match (code, rest) {
        (b"0", Some(title)) => {
            if let Ok(title) = std::str::from_utf8(title) {
                out.push(Action::SetTitle(title.to_string()));
            }
        }
        _ => debug!(code = %String::from_utf8_lossy(code), "OSC code ignored"),
    }
}

fn hexdump(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use vtgrid_parse::csi;

    #[test]
    fn cup_moves_cursor_absolute() {
        let mut screen = Screen::new(5, 10);
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"2;3H"), &mut actions);
        assert_eq!(screen.cursor().row, 1);
        assert_eq!(screen.cursor().col, 2);
        assert!(actions.is_empty());
    }

    #[test]
    fn cup_single_param_defaults_column_to_one() {
        let mut screen = Screen::new(5, 10);
        screen.cursor_to(1, 5).unwrap();
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"3H"), &mut actions);
        assert_eq!(screen.cursor().row, 2);
        assert_eq!(screen.cursor().col, 0);
    }

    #[test]
    fn dsr_six_replies_with_one_based_position() {
        let mut screen = Screen::new(5, 10);
        screen.cursor_to(3, 4).unwrap();
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"6n"), &mut actions);
        assert_eq!(actions, vec![Action::Write(b"\x1b[3;4R".to_vec())]);
    }

    #[test]
    fn sgr_red_then_reset() {
        let mut screen = Screen::new(1, 5);
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"31m"), &mut actions);
        assert_eq!(screen.cur_fg(), Color::Indexed(1));
        dispatch_csi(&mut screen, &csi::parse(b"0m"), &mut actions);
        assert_eq!(screen.cur_fg(), Color::Default);
        assert!(screen.cur_attrs().is_empty());
    }

    #[test]
    fn sgr_extended_256_color() {
        let mut screen = Screen::new(1, 5);
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"38;5;200m"), &mut actions);
        assert_eq!(screen.cur_fg(), Color::Indexed(200));
    }

    #[test]
    fn alt_screen_mode_emits_switch_action() {
        let mut screen = Screen::new(5, 10);
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"?1049h"), &mut actions);
        assert_eq!(
            actions,
            vec![Action::Switch {
                to: ScreenSelect::Alternate,
                clear: true
            }]
        );
    }

    #[test]
    fn restoring_primary_does_not_request_a_clear() {
        let mut screen = Screen::new(5, 10);
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"?1049l"), &mut actions);
        assert_eq!(
            actions,
            vec![Action::Switch {
                to: ScreenSelect::Primary,
                clear: false
            }]
        );
    }

    #[test]
    fn osc_zero_sets_title() {
        let mut actions = Vec::new();
        dispatch_st_string(b"]0;my title", &mut actions);
        assert_eq!(actions, vec![Action::SetTitle("my title".to_string())]);
    }

    #[test]
    fn dcs_is_ignored() {
        let mut actions = Vec::new();
        dispatch_st_string(b"Pq#0;2;0;0;0", &mut actions);
        assert!(actions.is_empty());
    }

    #[test]
    fn unknown_csi_is_dropped_without_panicking() {
        let mut screen = Screen::new(5, 10);
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"99z"), &mut actions);
        assert!(actions.is_empty());
    }

    #[test]
    fn primary_da_reply() {
        let mut screen = Screen::new(5, 10);
        let mut actions = Vec::new();
        dispatch_csi(&mut screen, &csi::parse(b"c"), &mut actions);
        assert_eq!(actions, vec![Action::Write(b"\x1b[?1;2c".to_vec())]);
    }

    #[test]
    fn xtwinops_title_stack_push_and_pop() {
        let mut actions = Vec::new();
        dispatch_csi(&mut Screen::new(1, 1), &csi::parse(b"22;0t"), &mut actions);
        assert_eq!(actions, vec![Action::PushTitle]);
        actions.clear();
        dispatch_csi(&mut Screen::new(1, 1), &csi::parse(b"23;0t"), &mut actions);
        assert_eq!(actions, vec![Action::PopTitle]);
    }
}
