//! Key gestures.
//!
//! Key codes follow the managed framework's key enumeration so a raw
//! `u32` received from the boundary can be mapped with [`Key::from_code`].
//! Modifier bits match its input-modifier set, including the mouse-button
//! flags, which are accepted but dropped before a gesture reaches a menu.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

/// A keyboard key usable as a menu accelerator.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::FromRepr,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[repr(u32)]
pub enum Key {
    None = 0,
    Back = 2,
    Tab = 3,
    #[strum(to_string = "Enter", serialize = "Return")]
    Enter = 6,
    #[strum(to_string = "Escape", serialize = "Esc")]
    Escape = 13,
    Space = 18,
    PageUp = 19,
    PageDown = 20,
    End = 21,
    Home = 22,
    Left = 23,
    Up = 24,
    Right = 25,
    Down = 26,
    Insert = 31,
    #[strum(to_string = "Delete", serialize = "Del")]
    Delete = 32,
    Help = 33,
    #[strum(to_string = "D0", serialize = "0")]
    D0 = 34,
    #[strum(to_string = "D1", serialize = "1")]
    D1 = 35,
    #[strum(to_string = "D2", serialize = "2")]
    D2 = 36,
    #[strum(to_string = "D3", serialize = "3")]
    D3 = 37,
    #[strum(to_string = "D4", serialize = "4")]
    D4 = 38,
    #[strum(to_string = "D5", serialize = "5")]
    D5 = 39,
    #[strum(to_string = "D6", serialize = "6")]
    D6 = 40,
    #[strum(to_string = "D7", serialize = "7")]
    D7 = 41,
    #[strum(to_string = "D8", serialize = "8")]
    D8 = 42,
    #[strum(to_string = "D9", serialize = "9")]
    D9 = 43,
    A = 44,
    B = 45,
    C = 46,
    D = 47,
    E = 48,
    F = 49,
    G = 50,
    H = 51,
    I = 52,
    J = 53,
    K = 54,
    L = 55,
    M = 56,
    N = 57,
    O = 58,
    P = 59,
    Q = 60,
    R = 61,
    S = 62,
    T = 63,
    U = 64,
    V = 65,
    W = 66,
    X = 67,
    Y = 68,
    Z = 69,
    F1 = 90,
    F2 = 91,
    F3 = 92,
    F4 = 93,
    F5 = 94,
    F6 = 95,
    F7 = 96,
    F8 = 97,
    F9 = 98,
    F10 = 99,
    F11 = 100,
    F12 = 101,
    OemSemicolon = 140,
    #[strum(to_string = "OemPlus", serialize = "+")]
    OemPlus = 141,
    #[strum(to_string = "OemComma", serialize = ",")]
    OemComma = 142,
    #[strum(to_string = "OemMinus", serialize = "-")]
    OemMinus = 143,
    #[strum(to_string = "OemPeriod", serialize = ".")]
    OemPeriod = 144,
    OemQuestion = 145,
    OemTilde = 146,
}

impl Key {
    /// Map a boundary key code. Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Key> {
        Key::from_repr(code)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// The printable character this key produces without modifiers, if any.
    pub fn character(self) -> Option<char> {
        let code = self.code();
        match self {
            Key::A
            | Key::B
            | Key::C
            | Key::D
            | Key::E
            | Key::F
            | Key::G
            | Key::H
            | Key::I
            | Key::J
            | Key::K
            | Key::L
            | Key::M
            | Key::N
            | Key::O
            | Key::P
            | Key::Q
            | Key::R
            | Key::S
            | Key::T
            | Key::U
            | Key::V
            | Key::W
            | Key::X
            | Key::Y
            | Key::Z => char::from_u32(u32::from(b'a') + code - Key::A.code()),
            Key::D0
            | Key::D1
            | Key::D2
            | Key::D3
            | Key::D4
            | Key::D5
            | Key::D6
            | Key::D7
            | Key::D8
            | Key::D9 => char::from_u32(u32::from(b'0') + code - Key::D0.code()),
            Key::Space => Some(' '),
            Key::OemSemicolon => Some(';'),
            Key::OemPlus => Some('='),
            Key::OemComma => Some(','),
            Key::OemMinus => Some('-'),
            Key::OemPeriod => Some('.'),
            Key::OemQuestion => Some('/'),
            Key::OemTilde => Some('`'),
            _ => None,
        }
    }

    /// Function key number (1-based) for F1..F12.
    pub fn function_number(self) -> Option<u32> {
        let code = self.code();
        (Key::F1.code()..=Key::F12.code())
            .contains(&code)
            .then(|| code - Key::F1.code() + 1)
    }
}

bitflags! {
    /// Modifier bitset.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u32 {
        const ALT = 1;
        const CONTROL = 2;
        const SHIFT = 4;
        /// Command on macOS, the Windows key elsewhere.
        const META = 8;
        const LEFT_MOUSE_BUTTON = 16;
        const RIGHT_MOUSE_BUTTON = 32;
        const MIDDLE_MOUSE_BUTTON = 64;
    }
}

impl KeyModifiers {
    /// Drop mouse-button flags; they mean nothing for an accelerator.
    pub fn keyboard_only(self) -> Self {
        self & (Self::ALT | Self::CONTROL | Self::SHIFT | Self::META)
    }
}

/// Failure to parse a textual gesture such as `"Ctrl+Shift+N"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureParseError {
    #[error("gesture has no key")]
    MissingKey,

    #[error("unknown key `{0}`")]
    UnknownKey(String),

    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
}

/// A key plus modifiers, e.g. Ctrl+Shift+N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyGesture {
    pub key: Key,
    pub modifiers: KeyModifiers,
}

impl KeyGesture {
    /// Build a gesture; mouse-button modifier flags are discarded.
    pub fn new(key: Key, modifiers: KeyModifiers) -> Self {
        Self {
            key,
            modifiers: modifiers.keyboard_only(),
        }
    }

    /// Parse `Modifier+Modifier+Key`. `"Ctrl++"` and `"Ctrl + +"` are the
    /// plus key with Ctrl, so the text is not simply split on `+`.
    pub fn parse(gesture: &str) -> Result<Self, GestureParseError> {
        let mut modifiers = KeyModifiers::empty();
        let mut key = None;
        let mut start = 0;

        let end = std::iter::once((gesture.len(), '\0'));
        for (pos, ch) in gesture.char_indices().chain(end) {
            let is_last = pos == gesture.len();
            if is_last || (ch == '+' && !gesture[start..pos].trim().is_empty()) {
                let part = gesture[start..pos].trim();
                if is_last {
                    key = Some(parse_key(part)?);
                } else {
                    modifiers |= parse_modifier(part)?;
                }
                start = pos + ch.len_utf8();
            }
        }

        let key = key.ok_or(GestureParseError::MissingKey)?;
        Ok(Self::new(key, modifiers))
    }
}

impl FromStr for KeyGesture {
    type Err = GestureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyGesture::parse(s)
    }
}

impl fmt::Display for KeyGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = [
            (KeyModifiers::CONTROL, "Ctrl"),
            (KeyModifiers::SHIFT, "Shift"),
            (KeyModifiers::ALT, "Alt"),
            (KeyModifiers::META, "Cmd"),
        ];
        for (flag, label) in labels {
            if self.modifiers.contains(flag) {
                write!(f, "{label}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

fn parse_key(part: &str) -> Result<Key, GestureParseError> {
    if part.is_empty() {
        return Err(GestureParseError::MissingKey);
    }
    Key::from_str(part).map_err(|_| GestureParseError::UnknownKey(part.to_string()))
}

fn parse_modifier(part: &str) -> Result<KeyModifiers, GestureParseError> {
    let lower = part.to_ascii_lowercase();
    match lower.as_str() {
        "ctrl" | "control" => Ok(KeyModifiers::CONTROL),
        "shift" => Ok(KeyModifiers::SHIFT),
        "alt" | "option" => Ok(KeyModifiers::ALT),
        "cmd" | "win" | "meta" | "⌘" => Ok(KeyModifiers::META),
        _ => Err(GestureParseError::UnknownModifier(part.to_string())),
    }
}
