//! Console key events to terminal bytes.
//!
//! The Windows console reports keys as structured events rather than a byte
//! stream. Re-encoding them as the xterm bytes a POSIX terminal would send
//! lets the same decoder and key names serve both platforms.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Bytes a terminal would send for `key`, or `None` for events that carry
/// no input (releases, modifier-only and unmapped keys).
pub(crate) fn encode(key: &KeyEvent) -> Option<Vec<u8>> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let seq: &[u8] = match key.code {
        KeyCode::Char(c) => return Some(encode_char(c, key.modifiers)),
        KeyCode::F(n) => return function_key(n).map(<[u8]>::to_vec),
        KeyCode::Enter => b"\r",
        KeyCode::Tab => b"\t",
        KeyCode::Backspace => b"\x7f",
        KeyCode::Esc => b"\x1b",
        KeyCode::BackTab => b"\x1b[Z",
        KeyCode::Up => b"\x1b[A",
        KeyCode::Down => b"\x1b[B",
        KeyCode::Right => b"\x1b[C",
        KeyCode::Left => b"\x1b[D",
        KeyCode::Home => b"\x1b[H",
        KeyCode::End => b"\x1b[F",
        KeyCode::Insert => b"\x1b[2~",
        KeyCode::Delete => b"\x1b[3~",
        KeyCode::PageUp => b"\x1b[5~",
        KeyCode::PageDown => b"\x1b[6~",
        _ => return None,
    };
    Some(seq.to_vec())
}

fn encode_char(c: char, modifiers: KeyModifiers) -> Vec<u8> {
    // Ctrl+letter is a C0 control byte, as in raw mode on a tty
    if modifiers.contains(KeyModifiers::CONTROL) && c.is_ascii_alphabetic() {
        return vec![c.to_ascii_lowercase() as u8 & 0x1F];
    }
    let mut buf = [0u8; 4];
    c.encode_utf8(&mut buf).as_bytes().to_vec()
}

fn function_key(n: u8) -> Option<&'static [u8]> {
    Some(match n {
        1 => b"\x1bOP",
        2 => b"\x1bOQ",
        3 => b"\x1bOR",
        4 => b"\x1bOS",
        5 => b"\x1b[15~",
        6 => b"\x1b[17~",
        7 => b"\x1b[18~",
        8 => b"\x1b[19~",
        9 => b"\x1b[20~",
        10 => b"\x1b[21~",
        11 => b"\x1b[23~",
        12 => b"\x1b[24~",
        _ => return None,
    })
}
