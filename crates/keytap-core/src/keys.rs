//! Names for the special keys terminals encode as escape sequences.
//!
//! Covers the sequences emitted by xterm, VT100/VT220, rxvt and the Linux
//! console for cursor, editing and function keys. Sequences carrying modifier
//! parameters (`ESC [ 1 ; 5 A`) are not produced by the decoder and have no
//! name here.

use std::fmt;

/// A named special key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor right.
    Right,
    /// Cursor left.
    Left,
    /// Home.
    Home,
    /// End.
    End,
    /// Insert.
    Insert,
    /// Delete (forward).
    Delete,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key F1 to F12.
    F(u8),
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Right => f.write_str("Right"),
            Self::Left => f.write_str("Left"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::Insert => f.write_str("Insert"),
            Self::Delete => f.write_str("Delete"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
            Self::F(n) => write!(f, "F{n}"),
        }
    }
}

/// Look up the key for a complete escape sequence (ESC included).
pub fn lookup(seq: &str) -> Option<SpecialKey> {
    let body = seq.strip_prefix('\u{1b}')?;

    if let Some(last) = body.strip_prefix('O') {
        return match last {
            "A" => Some(SpecialKey::Up),
            "B" => Some(SpecialKey::Down),
            "C" => Some(SpecialKey::Right),
            "D" => Some(SpecialKey::Left),
            "H" => Some(SpecialKey::Home),
            "F" => Some(SpecialKey::End),
            "P" => Some(SpecialKey::F(1)),
            "Q" => Some(SpecialKey::F(2)),
            "R" => Some(SpecialKey::F(3)),
            "S" => Some(SpecialKey::F(4)),
            _ => None,
        };
    }

    let csi = body.strip_prefix('[')?;
    match csi {
        "A" => return Some(SpecialKey::Up),
        "B" => return Some(SpecialKey::Down),
        "C" => return Some(SpecialKey::Right),
        "D" => return Some(SpecialKey::Left),
        "H" => return Some(SpecialKey::Home),
        "F" => return Some(SpecialKey::End),
        _ => {},
    }

    let param: u16 = csi.strip_suffix('~')?.parse().ok()?;
    match param {
        1 | 7 => Some(SpecialKey::Home),
        2 => Some(SpecialKey::Insert),
        3 => Some(SpecialKey::Delete),
        4 | 8 => Some(SpecialKey::End),
        5 => Some(SpecialKey::PageUp),
        6 => Some(SpecialKey::PageDown),
        11..=15 => Some(SpecialKey::F((param - 10) as u8)),
        17..=21 => Some(SpecialKey::F((param - 11) as u8)),
        23 | 24 => Some(SpecialKey::F((param - 12) as u8)),
        _ => None,
    }
}
