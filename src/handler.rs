use alloc::string::String;
use core::fmt;

use crate::{Timer, TimerToken, DEFAULT_CURSOR};
use u8char::u8char;

/// Trait for implementations that observe a [`crate::TypingMachine`].
///
/// The machine never sleeps or spawns anything itself. Instead it asks its
/// handler to arm and disarm a timer, and the host calls
/// [`crate::TypingMachine::tick`] with the timer's token each time that timer
/// fires.
///
/// All of the provided method implementations perform no action at all.
pub trait TypingHandler {
    /// Arms a repeating timer.
    ///
    /// The host should call [`crate::TypingMachine::tick`] with `timer.token`
    /// every `timer.interval` until [`TypingHandler::clear_timer`] is called
    /// for the same token. The machine never has more than one timer armed at
    /// a time, and always clears the previous timer before arming another.
    #[inline(always)]
    fn set_timer(&mut self, timer: Timer) {
        let _ = timer;
    }

    /// Disarms a timer previously armed by [`TypingHandler::set_timer`].
    ///
    /// Ticks for a cleared token that the host already queued are harmless:
    /// the machine ignores them.
    #[inline(always)]
    fn clear_timer(&mut self, token: TimerToken) {
        let _ = token;
    }

    /// Reports that one more character of the text became visible.
    #[inline(always)]
    fn typed(&mut self, c: u8char) {
        let _ = c;
    }

    /// Reports that the last visible character was deleted.
    #[inline(always)]
    fn erased(&mut self, c: u8char) {
        let _ = c;
    }

    /// Reports that the line break marker was appended.
    #[inline(always)]
    fn line_break(&mut self) {}

    /// Reports a cursor blink after the animation has settled.
    #[inline(always)]
    fn cursor_blink(&mut self, visible: bool) {
        let _ = visible;
    }

    /// Delivers the full output after every state change.
    ///
    /// Implementations that only care about the incremental events can
    /// ignore this.
    #[inline(always)]
    fn render(&mut self, output: &RenderOutput) {
        let _ = output;
    }

    /// Called exactly once per run, after the final render.
    #[inline(always)]
    fn animation_end(&mut self) {}
}

impl TypingHandler for () {}

/// What a host should currently display for an animation.
///
/// The cursor shows from the moment a run exists, including while it is
/// held idle by its start gate, until the run is done with a hidden cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub visible_text: String,
    pub cursor: char,
    pub cursor_visible: bool,
}

impl Default for RenderOutput {
    fn default() -> Self {
        Self {
            visible_text: String::new(),
            cursor: DEFAULT_CURSOR,
            cursor_visible: false,
        }
    }
}

/// Writes the visible text followed by the cursor, if it's showing.
impl fmt::Display for RenderOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.visible_text)?;
        if self.cursor_visible {
            fmt::Write::write_char(f, self.cursor)?;
        }
        Ok(())
    }
}

/// Represents the calls delivered to a callback through `typing_handler_fn`.
///
/// Each variant corresponds to a method of [`TypingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingEvent {
    SetTimer(Timer),
    ClearTimer(TimerToken),
    Typed(u8char),
    Erased(u8char),
    LineBreak,
    CursorBlink(bool),
    Render(RenderOutput),
    AnimationEnd,
}

/// Returns a [`TypingHandler`] that calls the given function for each
/// event produced by an associated [`crate::TypingMachine`].
///
/// This can be a convenient way to implement `TypingHandler`, but comes at
/// the cost of cloning every [`RenderOutput`], whereas implementing the trait
/// directly receives a reference to it.
pub fn typing_handler_fn(f: impl FnMut(TypingEvent)) -> impl TypingHandler {
    TypingHandlerFn { f }
}

struct TypingHandlerFn<F> {
    f: F,
}

impl<F: FnMut(TypingEvent)> TypingHandler for TypingHandlerFn<F> {
    #[inline(always)]
    fn set_timer(&mut self, timer: Timer) {
        (self.f)(TypingEvent::SetTimer(timer));
    }

    #[inline(always)]
    fn clear_timer(&mut self, token: TimerToken) {
        (self.f)(TypingEvent::ClearTimer(token));
    }

    #[inline(always)]
    fn typed(&mut self, c: u8char) {
        (self.f)(TypingEvent::Typed(c));
    }

    #[inline(always)]
    fn erased(&mut self, c: u8char) {
        (self.f)(TypingEvent::Erased(c));
    }

    #[inline(always)]
    fn line_break(&mut self) {
        (self.f)(TypingEvent::LineBreak);
    }

    #[inline(always)]
    fn cursor_blink(&mut self, visible: bool) {
        (self.f)(TypingEvent::CursorBlink(visible));
    }

    #[inline(always)]
    fn render(&mut self, output: &RenderOutput) {
        (self.f)(TypingEvent::Render(output.clone()));
    }

    #[inline(always)]
    fn animation_end(&mut self) {
        (self.f)(TypingEvent::AnimationEnd);
    }
}
