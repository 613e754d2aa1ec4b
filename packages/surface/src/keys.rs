//! Platform-independent key representation

use serde::{Deserialize, Serialize};

/// Platform-independent key-down event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character
    Char(char),

    // Navigation
    Left,
    Right,
    Up,
    Down,

    // Special keys
    Enter,
    Backspace,
    Delete,
    Escape,
    Tab,
    Space,
}

/// What the host should do with a key event after interception
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Let the host's default handling proceed
    Default,
    /// Default handling is suppressed (`preventDefault`)
    Suppressed,
}
