use alloc::string::String;
use core::time::Duration;

use crate::{ConfigError, IntervalKind};

/// Cursor glyph used when none is configured.
pub const DEFAULT_CURSOR: char = '|';
pub const DEFAULT_TYPING_INTERVAL: Duration = Duration::from_millis(80);
pub const DEFAULT_DELETING_INTERVAL: Duration = Duration::from_millis(40);
pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(530);

/// Everything a [`crate::TypingMachine`] needs to animate one string.
///
/// Two configurations that differ at most in `None` versus `Some(true)` for
/// the start gate describe the same run, so supplying such a configuration
/// to a machine that is already animating it has no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationConfig {
    /// The text to type.
    pub text: String,
    /// Number of trailing characters to delete once typing is finished.
    pub delete_count: usize,
    /// Whether to append a line break once typing is finished.
    pub line_break: bool,
    pub cursor: char,
    /// Whether the cursor disappears when the animation completes, rather
    /// than blinking indefinitely.
    pub hide_cursor: bool,
    /// External start gate. `Some(false)` holds the animation idle, while
    /// `None` behaves like `Some(true)`.
    pub start: Option<bool>,
    pub typing_interval: Duration,
    pub deleting_interval: Duration,
    pub blink_interval: Duration,
}

impl AnimationConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delete_count: 0,
            line_break: false,
            cursor: DEFAULT_CURSOR,
            hide_cursor: true,
            start: None,
            typing_interval: DEFAULT_TYPING_INTERVAL,
            deleting_interval: DEFAULT_DELETING_INTERVAL,
            blink_interval: DEFAULT_BLINK_INTERVAL,
        }
    }

    pub fn delete_characters(mut self, count: usize) -> Self {
        self.delete_count = count;
        self
    }

    pub fn line_break(mut self, line_break: bool) -> Self {
        self.line_break = line_break;
        self
    }

    pub fn cursor_character(mut self, cursor: char) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn hide_cursor(mut self, hide_cursor: bool) -> Self {
        self.hide_cursor = hide_cursor;
        self
    }

    pub fn start_animation(mut self, start: bool) -> Self {
        self.start = Some(start);
        self
    }

    pub fn typing_speed(mut self, interval: Duration) -> Self {
        self.typing_interval = interval;
        self
    }

    pub fn deleting_speed(mut self, interval: Duration) -> Self {
        self.deleting_interval = interval;
        self
    }

    pub fn blink_speed(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }

    /// Checks the invariants that the type system can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, interval) in [
            (IntervalKind::Typing, self.typing_interval),
            (IntervalKind::Deleting, self.deleting_interval),
            (IntervalKind::Blink, self.blink_interval),
        ] {
            if interval.is_zero() {
                return Err(ConfigError::InvalidInterval { kind, value_ms: 0 });
            }
        }
        if self.cursor.is_control() {
            return Err(ConfigError::ControlCursor(self.cursor));
        }
        Ok(())
    }

    /// Whether the gate is open, treating an absent gate as open.
    #[inline(always)]
    pub fn is_started(&self) -> bool {
        self.start != Some(false)
    }

    /// Whether `other` describes the same run as `self`, treating an absent
    /// start gate as an open one.
    pub(crate) fn same_run(&self, other: &Self) -> bool {
        self.eq_ignoring_start(other) && self.is_started() == other.is_started()
    }

    /// Equality on everything except the start gate.
    pub(crate) fn eq_ignoring_start(&self, other: &Self) -> bool {
        self.text == other.text
            && self.delete_count == other.delete_count
            && self.line_break == other.line_break
            && self.cursor == other.cursor
            && self.hide_cursor == other.hide_cursor
            && self.typing_interval == other.typing_interval
            && self.deleting_interval == other.deleting_interval
            && self.blink_interval == other.blink_interval
    }
}

/// Animation settings as a host UI layer supplies them.
///
/// Numbers are signed milliseconds so that out-of-range values coming from
/// loosely-typed hosts can be reported instead of silently wrapped. Convert
/// into an [`AnimationConfig`] with `try_from`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct TextProps {
    #[cfg_attr(feature = "serde", serde(alias = "text"))]
    pub children: String,
    pub delete_characters: i64,
    pub line_break: bool,
    pub cursor_character: String,
    pub hide_cursor: bool,
    pub start_animation: Option<bool>,
    pub typing_speed: i64,
    pub deleting_speed: i64,
    pub blink_speed: i64,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            children: String::new(),
            delete_characters: 0,
            line_break: false,
            cursor_character: String::from(DEFAULT_CURSOR),
            hide_cursor: true,
            start_animation: None,
            typing_speed: DEFAULT_TYPING_INTERVAL.as_millis() as i64,
            deleting_speed: DEFAULT_DELETING_INTERVAL.as_millis() as i64,
            blink_speed: DEFAULT_BLINK_INTERVAL.as_millis() as i64,
        }
    }
}

impl TryFrom<TextProps> for AnimationConfig {
    type Error = ConfigError;

    fn try_from(props: TextProps) -> Result<Self, ConfigError> {
        let delete_count = usize::try_from(props.delete_characters)
            .map_err(|_| ConfigError::NegativeDeleteCount(props.delete_characters))?;

        let mut chars = props.cursor_character.chars();
        let cursor = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(ConfigError::CursorNotSingleChar(props.cursor_character)),
        };

        let config = AnimationConfig {
            text: props.children,
            delete_count,
            line_break: props.line_break,
            cursor,
            hide_cursor: props.hide_cursor,
            start: props.start_animation,
            typing_interval: interval(IntervalKind::Typing, props.typing_speed)?,
            deleting_interval: interval(IntervalKind::Deleting, props.deleting_speed)?,
            blink_interval: interval(IntervalKind::Blink, props.blink_speed)?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn interval(kind: IntervalKind, value_ms: i64) -> Result<Duration, ConfigError> {
    match u64::try_from(value_ms) {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidInterval { kind, value_ms }),
    }
}
