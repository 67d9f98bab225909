use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use log::{debug, trace, warn};
use u8char::u8char;

use crate::{AnimationConfig, ConfigError, RenderOutput, TypingHandler};

/// Marker appended after the typed text when a line break is requested.
pub const LINE_BREAK: char = '\n';

/// One segment of a typing animation.
///
/// The variants are declared in the order a run passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Idle,
    Typing,
    LineBreakPending,
    Deleting,
    Blinking,
    Done,
}

/// Identifies one armed timer. Tokens are never reused by a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub(crate) u64);

/// A repeating timer the host should run on behalf of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub token: TimerToken,
    pub interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    /// The token did not belong to the armed timer, so nothing happened.
    Stale,
}

pub struct TypingMachine<H> {
    handler: H,
    run: Option<Run>,
    timer: Option<Timer>,
    generation: u64,
    stopped: bool,
}

struct Run {
    config: AnimationConfig,
    chars: Vec<char>,
    phase: Phase,
    revealed: usize,
    line_break_shown: bool,
    cursor_visible: bool,
    completion_fired: bool,
}

impl Run {
    fn new(config: AnimationConfig) -> Self {
        Self {
            chars: config.text.chars().collect(),
            config,
            phase: Phase::Idle,
            revealed: 0,
            line_break_shown: false,
            cursor_visible: true,
            completion_fired: false,
        }
    }

    /// How many characters remain once deletion is finished.
    fn delete_target(&self) -> usize {
        self.chars.len().saturating_sub(self.config.delete_count)
    }

    /// The phase that follows once all of the text has been typed.
    fn next_phase(&self) -> Phase {
        if self.config.line_break && !self.line_break_shown {
            Phase::LineBreakPending
        } else if self.revealed > self.delete_target() {
            Phase::Deleting
        } else if self.config.hide_cursor {
            Phase::Done
        } else {
            Phase::Blinking
        }
    }

    fn output(&self) -> RenderOutput {
        let mut visible_text: String = self.chars[..self.revealed].iter().collect();
        if self.line_break_shown {
            visible_text.push(LINE_BREAK);
        }
        RenderOutput {
            visible_text,
            cursor: self.config.cursor,
            cursor_visible: self.cursor_visible,
        }
    }
}

impl<H> TypingMachine<H> {
    pub const fn new(handler: H) -> Self {
        Self {
            handler,
            run: None,
            timer: None,
            generation: 0,
            stopped: false,
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

    /// The current phase. A machine that has never been started is idle.
    pub fn phase(&self) -> Phase {
        self.run.as_ref().map_or(Phase::Idle, |run| run.phase)
    }

    /// Number of leading characters of the text currently shown.
    pub fn revealed(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.revealed)
    }

    /// The timer that the host is currently expected to be running, if any.
    #[inline(always)]
    pub fn timer(&self) -> Option<Timer> {
        self.timer
    }

    /// Whether the current run has reported its completion.
    pub fn is_complete(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.completion_fired)
    }

    pub fn render_output(&self) -> RenderOutput {
        self.run.as_ref().map(Run::output).unwrap_or_default()
    }
}

impl<H: TypingHandler> TypingMachine<H> {
    /// Supplies the configuration to animate.
    ///
    /// A configuration equal to the current one is ignored, so hosts can call
    /// this on every re-render. Opening the start gate of an idle run begins
    /// typing. Any other change discards the current run, including its
    /// timer, and begins a new one immediately.
    ///
    /// An invalid configuration is rejected before anything changes.
    pub fn start(&mut self, config: AnimationConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            warn!("rejecting typing animation config: {err}");
            return Err(err);
        }

        if !self.stopped {
            if let Some(run) = self.run.as_mut() {
                if run.config.same_run(&config) {
                    trace!("typing animation config unchanged");
                    return Ok(());
                }
                if run.phase == Phase::Idle
                    && config.is_started()
                    && run.config.eq_ignoring_start(&config)
                {
                    run.config.start = config.start;
                    self.enter(Phase::Typing);
                    self.publish();
                    return Ok(());
                }
            }
        }

        self.begin(config);
        Ok(())
    }

    /// Changes only the start gate of the current configuration.
    pub fn set_start_animation(&mut self, start: bool) -> Result<(), ConfigError> {
        let Some(run) = &self.run else {
            return Ok(());
        };
        let mut config = run.config.clone();
        config.start = Some(start);
        self.start(config)
    }

    /// Advances the animation by one step, if `token` belongs to the armed
    /// timer.
    pub fn tick(&mut self, token: TimerToken) -> TickOutcome {
        if self.timer.map(|timer| timer.token) != Some(token) {
            trace!("ignoring stale tick {token:?}");
            return TickOutcome::Stale;
        }
        let Some(run) = self.run.as_mut() else {
            return TickOutcome::Stale;
        };

        match run.phase {
            Phase::Typing => {
                if let Some(&c) = run.chars.get(run.revealed) {
                    run.revealed += 1;
                    self.handler.typed(u8char::from_char(c));
                }
                if run.revealed == run.chars.len() {
                    let next = run.next_phase();
                    self.enter(next);
                }
            }
            Phase::LineBreakPending => {
                let next = run.next_phase();
                self.enter(next);
            }
            Phase::Deleting => {
                let target = run.delete_target();
                if run.revealed > target {
                    run.revealed -= 1;
                    self.handler.erased(u8char::from_char(run.chars[run.revealed]));
                }
                if run.revealed <= target {
                    let next = run.next_phase();
                    self.enter(next);
                }
            }
            Phase::Blinking => {
                run.cursor_visible = !run.cursor_visible;
                self.handler.cursor_blink(run.cursor_visible);
            }
            // No timer is armed in these phases.
            Phase::Idle | Phase::Done => return TickOutcome::Stale,
        }

        self.publish();
        TickOutcome::Advanced
    }

    /// Disarms the timer. Further ticks are ignored, and the next call to
    /// [`TypingMachine::start`] always begins a new run.
    pub fn stop(&mut self) {
        if self.timer.is_some() {
            debug!("stopping typing animation in {:?}", self.phase());
        }
        self.cancel_timer();
        self.stopped = true;
    }

    fn begin(&mut self, config: AnimationConfig) {
        self.cancel_timer();
        self.stopped = false;
        debug!(
            "starting typing animation of {} chars",
            config.text.chars().count()
        );
        let started = config.is_started();
        self.run = Some(Run::new(config));
        if started {
            self.enter(Phase::Typing);
        }
        self.publish();
    }

    fn enter(&mut self, phase: Phase) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        debug!("typing animation {:?} -> {:?}", run.phase, phase);
        run.phase = phase;

        let interval = match phase {
            Phase::Typing | Phase::LineBreakPending => Some(run.config.typing_interval),
            Phase::Deleting => Some(run.config.deleting_interval),
            Phase::Blinking => Some(run.config.blink_interval),
            Phase::Idle | Phase::Done => None,
        };
        match phase {
            Phase::LineBreakPending => {
                run.line_break_shown = true;
                self.handler.line_break();
            }
            Phase::Done => run.cursor_visible = false,
            _ => {}
        }

        match interval {
            Some(interval) => self.schedule(interval),
            None => self.cancel_timer(),
        }
    }

    /// Renders the current state and reports completion the first time the
    /// run settles.
    fn publish(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        self.handler.render(&run.output());
        if matches!(run.phase, Phase::Blinking | Phase::Done) && !run.completion_fired {
            run.completion_fired = true;
            debug!("typing animation complete");
            self.handler.animation_end();
        }
    }

    /// Keeps the armed timer if it already runs at `interval`, and otherwise
    /// replaces it.
    fn schedule(&mut self, interval: Duration) {
        if self.timer.is_some_and(|timer| timer.interval == interval) {
            return;
        }
        self.cancel_timer();
        self.generation += 1;
        let timer = Timer {
            token: TimerToken(self.generation),
            interval,
        };
        self.timer = Some(timer);
        self.handler.set_timer(timer);
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.handler.clear_timer(timer.token);
        }
    }
}
