use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use log::{debug, warn};
use u8char::u8char;

use crate::{
    AnimationConfig, ConfigError, RenderOutput, TickOutcome, Timer, TimerToken, TypingEvent,
    TypingHandler, TypingMachine,
};

/// Types a series of segments one after another.
///
/// Each segment is animated by the same inner [`TypingMachine`]. Once a
/// segment completes, its final text stays in place and the next segment
/// continues after it. The handler sees a single animation: one timer at a
/// time, render output covering every segment so far, and one
/// [`TypingHandler::animation_end`] once the last segment completes.
pub struct TypeMe<H> {
    handler: H,
    machine: TypingMachine<EventQueue>,
    pending: VecDeque<AnimationConfig>,
    settled: String,
    completion_fired: bool,
}

/// Buffers the inner machine's events so that they can be forwarded after
/// the machine call returns.
#[derive(Default)]
struct EventQueue {
    events: Vec<TypingEvent>,
}

impl TypingHandler for EventQueue {
    fn set_timer(&mut self, timer: Timer) {
        self.events.push(TypingEvent::SetTimer(timer));
    }

    fn clear_timer(&mut self, token: TimerToken) {
        self.events.push(TypingEvent::ClearTimer(token));
    }

    fn typed(&mut self, c: u8char) {
        self.events.push(TypingEvent::Typed(c));
    }

    fn erased(&mut self, c: u8char) {
        self.events.push(TypingEvent::Erased(c));
    }

    fn line_break(&mut self) {
        self.events.push(TypingEvent::LineBreak);
    }

    fn cursor_blink(&mut self, visible: bool) {
        self.events.push(TypingEvent::CursorBlink(visible));
    }

    fn render(&mut self, output: &RenderOutput) {
        self.events.push(TypingEvent::Render(output.clone()));
    }

    fn animation_end(&mut self) {
        self.events.push(TypingEvent::AnimationEnd);
    }
}

impl<H> TypeMe<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            machine: TypingMachine::new(EventQueue::default()),
            pending: VecDeque::new(),
            settled: String::new(),
            completion_fired: false,
        }
    }

    #[inline(always)]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    #[inline(always)]
    pub const fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    #[inline(always)]
    pub fn take_handler(self) -> H {
        self.handler
    }

    /// The timer of the active segment, if one is armed.
    #[inline(always)]
    pub fn timer(&self) -> Option<Timer> {
        self.machine.timer()
    }

    /// Whether the last segment has completed.
    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        self.completion_fired
    }

    pub fn render_output(&self) -> RenderOutput {
        self.compose(self.machine.render_output())
    }

    fn compose(&self, output: RenderOutput) -> RenderOutput {
        let mut visible_text = self.settled.clone();
        visible_text.push_str(&output.visible_text);
        RenderOutput {
            visible_text,
            ..output
        }
    }
}

impl<H: TypingHandler> TypeMe<H> {
    /// Replaces whatever is animating with a new series of segments.
    ///
    /// Every segment is validated up front, and if any of them is invalid
    /// nothing changes.
    pub fn start(
        &mut self,
        segments: impl IntoIterator<Item = AnimationConfig>,
    ) -> Result<(), ConfigError> {
        let mut segments: VecDeque<AnimationConfig> = segments.into_iter().collect();
        for segment in &segments {
            if let Err(err) = segment.validate() {
                warn!("rejecting typeme segment: {err}");
                return Err(err);
            }
        }

        debug!("starting typeme with {} segments", segments.len());
        if segments.is_empty() {
            // Behaves like a single empty string: completes on the first tick.
            segments.push_back(AnimationConfig::new(""));
        }
        self.machine.stop();
        self.pending = segments;
        self.settled.clear();
        self.completion_fired = false;
        self.next_segment();
        self.flush();
        Ok(())
    }

    /// Opens or closes the start gate of the active segment.
    pub fn set_start_animation(&mut self, start: bool) -> Result<(), ConfigError> {
        let result = self.machine.set_start_animation(start);
        self.flush();
        result
    }

    pub fn tick(&mut self, token: TimerToken) -> TickOutcome {
        let outcome = self.machine.tick(token);
        self.flush();
        outcome
    }

    pub fn stop(&mut self) {
        self.machine.stop();
        self.flush();
    }

    fn next_segment(&mut self) {
        let Some(segment) = self.pending.pop_front() else {
            return;
        };
        // Stopping first makes an equal segment start over rather than
        // being treated as a re-render of the previous one.
        self.machine.stop();
        if let Err(err) = self.machine.start(segment) {
            warn!("skipping typeme segment: {err}");
        }
    }

    fn segment_complete(&mut self) {
        if !self.pending.is_empty() {
            self.settled
                .push_str(&self.machine.render_output().visible_text);
            self.next_segment();
        } else if !self.completion_fired {
            self.completion_fired = true;
            debug!("typeme complete");
            self.handler.animation_end();
        }
    }

    /// Forwards everything the inner machine reported, moving on to the next
    /// segment whenever the active one completes.
    fn flush(&mut self) {
        loop {
            let events = mem::take(&mut self.machine.handler_mut().events);
            if events.is_empty() {
                return;
            }
            let mut segment_done = false;
            for event in events {
                match event {
                    TypingEvent::SetTimer(timer) => self.handler.set_timer(timer),
                    TypingEvent::ClearTimer(token) => self.handler.clear_timer(token),
                    TypingEvent::Typed(c) => self.handler.typed(c),
                    TypingEvent::Erased(c) => self.handler.erased(c),
                    TypingEvent::LineBreak => self.handler.line_break(),
                    TypingEvent::CursorBlink(visible) => self.handler.cursor_blink(visible),
                    TypingEvent::Render(output) => {
                        let output = self.compose(output);
                        self.handler.render(&output);
                    }
                    TypingEvent::AnimationEnd => segment_done = true,
                }
            }
            if segment_done {
                self.segment_complete();
            }
        }
    }
}
