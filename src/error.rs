use alloc::string::String;
use core::fmt;

/// Reasons an animation configuration is rejected.
///
/// These are only ever reported when a configuration is supplied, never
/// while an animation is running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{kind} interval must be positive, got {value_ms}ms")]
    InvalidInterval { kind: IntervalKind, value_ms: i64 },
    #[error("delete count must not be negative, got {0}")]
    NegativeDeleteCount(i64),
    #[error("cursor must be exactly one character, got {0:?}")]
    CursorNotSingleChar(String),
    #[error("cursor character {0:?} is a control character")]
    ControlCursor(char),
}

/// Identifies which of the per-phase intervals an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalKind {
    Typing,
    Deleting,
    Blink,
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IntervalKind::Typing => "typing",
            IntervalKind::Deleting => "deleting",
            IntervalKind::Blink => "blink",
        })
    }
}
