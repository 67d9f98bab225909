use super::*;

use core::time::Duration;
use pretty_assertions::assert_eq;
use u8char::u8char;

macro_rules! typed {
    ($c:literal) => {
        TypingEvent::Typed(u8char::from_char($c))
    };
}

macro_rules! erased {
    ($c:literal) => {
        TypingEvent::Erased(u8char::from_char($c))
    };
}

#[test]
fn hello() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Hello!")).unwrap();
    drive(&mut m);

    let output = m.render_output();
    assert_eq!(output.visible_text, "Hello!");
    assert!(!output.cursor_visible);
    assert_eq!(output.to_string(), "Hello!");
    assert_eq!(m.phase(), Phase::Done);
    assert_eq!(m.timer(), None);
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn event_log() {
    let mut m = testing_machine();
    m.start(
        AnimationConfig::new("ab")
            .delete_characters(1)
            .hide_cursor(false)
            .typing_speed(Duration::from_millis(10))
            .deleting_speed(Duration::from_millis(5))
            .blink_speed(Duration::from_millis(100)),
    )
    .unwrap();
    for token in [1, 1, 2, 3, 2] {
        m.tick(TimerToken(token));
    }

    let timer = |token, ms| {
        TypingEvent::SetTimer(Timer {
            token: TimerToken(token),
            interval: Duration::from_millis(ms),
        })
    };
    assert_eq!(
        m.handler().log(),
        &[
            timer(1, 10),
            TypingEvent::Render(output("", true)),
            typed!('a'),
            TypingEvent::Render(output("a", true)),
            typed!('b'),
            TypingEvent::ClearTimer(TimerToken(1)),
            timer(2, 5),
            TypingEvent::Render(output("ab", true)),
            erased!('b'),
            TypingEvent::ClearTimer(TimerToken(2)),
            timer(3, 100),
            TypingEvent::Render(output("a", true)),
            TypingEvent::AnimationEnd,
            TypingEvent::CursorBlink(false),
            TypingEvent::Render(output("a", false)),
        ]
    );
}

#[test]
fn typing_takes_one_tick_per_char() {
    for text in ["a", "Hello!", "héllo wörld ✓"] {
        for hide_cursor in [true, false] {
            let mut m = testing_machine();
            m.start(AnimationConfig::new(text).hide_cursor(hide_cursor))
                .unwrap();
            let len = text.chars().count();
            for _ in 0..len {
                let timer = m.timer().unwrap();
                assert_eq!(m.tick(timer.token), TickOutcome::Advanced);
            }
            assert_eq!(m.revealed(), len);
            assert_eq!(m.render_output().visible_text, text);
            let expected = if hide_cursor {
                Phase::Done
            } else {
                Phase::Blinking
            };
            assert_eq!(m.phase(), expected);
            assert_eq!(m.handler().ends(), 1);
        }
    }
}

#[test]
fn delete_characters() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Hello world!").delete_characters(7))
        .unwrap();
    let ticks = drive(&mut m);

    assert_eq!(ticks, 12 + 7);
    assert_eq!(m.render_output().visible_text, "Hello");
    assert_eq!(m.revealed(), 5);
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn delete_more_than_typed() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Hi").delete_characters(10))
        .unwrap();
    drive(&mut m);

    assert_eq!(m.render_output().visible_text, "");
    assert_eq!(m.revealed(), 0);
    let erased: Vec<_> = m
        .handler()
        .log()
        .iter()
        .filter(|event| matches!(event, TypingEvent::Erased(_)))
        .cloned()
        .collect();
    assert_eq!(erased, [erased!('i'), erased!('H')]);
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn empty_text() {
    for delete in [0, 3] {
        let mut m = testing_machine();
        m.start(AnimationConfig::new("").delete_characters(delete))
            .unwrap();
        assert_eq!(m.phase(), Phase::Typing);
        assert_eq!(m.handler().ends(), 0);

        let timer = m.timer().unwrap();
        assert_eq!(m.tick(timer.token), TickOutcome::Advanced);
        assert_eq!(m.phase(), Phase::Done);
        assert_eq!(m.handler().ends(), 1);
        assert_eq!(m.render_output(), output("", false));
        assert!(!m
            .handler()
            .log()
            .iter()
            .any(|event| matches!(event, TypingEvent::Typed(_) | TypingEvent::Erased(_))));
    }
}

#[test]
fn line_break() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Line break?").line_break(true))
        .unwrap();
    for _ in 0.."Line break?".len() {
        let timer = m.timer().unwrap();
        m.tick(timer.token);
    }
    assert_eq!(m.phase(), Phase::LineBreakPending);
    assert_eq!(m.render_output(), output("Line break?\n", true));
    assert_eq!(m.handler().ends(), 0);

    let tail = &m.handler().log()[m.handler().log().len() - 3..];
    assert_eq!(
        tail,
        &[
            typed!('?'),
            TypingEvent::LineBreak,
            TypingEvent::Render(output("Line break?\n", true)),
        ]
    );

    let timer = m.timer().unwrap();
    m.tick(timer.token);
    assert_eq!(m.phase(), Phase::Done);
    assert_eq!(m.render_output().visible_text, "Line break?\n");

    let tail = &m.handler().log()[m.handler().log().len() - 3..];
    assert_eq!(
        tail,
        &[
            TypingEvent::ClearTimer(timer.token),
            TypingEvent::Render(output("Line break?\n", false)),
            TypingEvent::AnimationEnd,
        ]
    );
}

#[test]
fn line_break_then_delete() {
    let mut m = testing_machine();
    m.start(
        AnimationConfig::new("abc")
            .line_break(true)
            .delete_characters(2),
    )
    .unwrap();
    let ticks = drive(&mut m);

    assert_eq!(ticks, 3 + 1 + 2);
    assert_eq!(m.render_output().visible_text, "a\n");
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn keep_cursor_blinking() {
    let mut m = testing_machine();
    m.start(
        AnimationConfig::new("New cursor?")
            .cursor_character('_')
            .hide_cursor(false),
    )
    .unwrap();
    drive(&mut m);

    assert_eq!(m.phase(), Phase::Blinking);
    assert_eq!(m.render_output().to_string(), "New cursor?_");
    let timer = m.timer().unwrap();
    assert_eq!(timer.interval, DEFAULT_BLINK_INTERVAL);

    m.tick(timer.token);
    assert_eq!(m.render_output().to_string(), "New cursor?");
    for _ in 0..5 {
        m.tick(timer.token);
    }
    assert!(m.render_output().cursor_visible);
    assert_eq!(m.phase(), Phase::Blinking);
    assert_eq!(m.revealed(), 11);
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn hide_cursor() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Cursor hidden?").hide_cursor(true))
        .unwrap();
    drive(&mut m);

    assert_eq!(m.phase(), Phase::Done);
    assert_eq!(m.render_output(), output("Cursor hidden?", false));
    assert_eq!(m.timer(), None);
}

#[test]
fn gated_then_replaced() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Nope").start_animation(false))
        .unwrap();
    assert_eq!(m.phase(), Phase::Idle);
    assert_eq!(m.timer(), None);
    assert_eq!(m.tick(TimerToken(1)), TickOutcome::Stale);
    assert_eq!(m.revealed(), 0);

    m.start(AnimationConfig::new("Yes").start_animation(true))
        .unwrap();
    assert_eq!(m.phase(), Phase::Typing);
    drive(&mut m);
    assert_eq!(m.render_output().visible_text, "Yes");
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn gate_opened() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Nope").start_animation(false))
        .unwrap();
    m.set_start_animation(true).unwrap();

    assert_eq!(m.phase(), Phase::Typing);
    assert_eq!(
        m.handler().log(),
        &[
            TypingEvent::Render(output("", true)),
            TypingEvent::SetTimer(Timer {
                token: TimerToken(1),
                interval: DEFAULT_TYPING_INTERVAL,
            }),
            TypingEvent::Render(output("", true)),
        ]
    );
    drive(&mut m);
    assert_eq!(m.render_output().visible_text, "Nope");
}

#[test]
fn reconfigure_mid_run() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Hello")).unwrap();
    let old = m.timer().unwrap();
    m.tick(old.token);
    m.tick(old.token);
    assert_eq!(m.revealed(), 2);

    m.start(AnimationConfig::new("World")).unwrap();
    assert_eq!(m.revealed(), 0);
    assert_ne!(m.timer().unwrap().token, old.token);
    assert!(m
        .handler()
        .log()
        .contains(&TypingEvent::ClearTimer(old.token)));

    // A tick the host queued for the old run changes nothing.
    assert_eq!(m.tick(old.token), TickOutcome::Stale);
    assert_eq!(m.revealed(), 0);

    drive(&mut m);
    assert_eq!(m.render_output().visible_text, "World");
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn same_config_is_ignored() {
    let config = AnimationConfig::new("Hello!");
    let mut m = testing_machine();
    m.start(config.clone()).unwrap();
    let timer = m.timer();
    m.start(config.clone()).unwrap();
    assert_eq!(m.timer(), timer);

    drive(&mut m);
    for _ in 0..3 {
        m.start(config.clone()).unwrap();
    }
    assert_eq!(m.phase(), Phase::Done);
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn open_gate_matches_absent_gate() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Hi")).unwrap();
    drive(&mut m);

    m.start(AnimationConfig::new("Hi").start_animation(true))
        .unwrap();
    assert_eq!(m.phase(), Phase::Done);
    assert_eq!(m.revealed(), 2);
    assert_eq!(m.timer(), None);

    m.start(AnimationConfig::new("Hi")).unwrap();
    assert_eq!(m.phase(), Phase::Done);
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn rejected_config() {
    let mut m = testing_machine();
    let err = m
        .start(AnimationConfig::new("Hello").typing_speed(Duration::ZERO))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidInterval {
            kind: IntervalKind::Typing,
            value_ms: 0,
        }
    );
    assert_eq!(m.phase(), Phase::Idle);
    assert_eq!(m.render_output(), RenderOutput::default());
    assert!(m.handler().log().is_empty());

    // A rejected reconfiguration leaves the running animation alone.
    m.start(AnimationConfig::new("Hello")).unwrap();
    let timer = m.timer().unwrap();
    m.tick(timer.token);
    m.start(AnimationConfig::new("Hello").cursor_character('\t'))
        .unwrap_err();
    assert_eq!(m.timer(), Some(timer));
    assert_eq!(m.revealed(), 1);
    drive(&mut m);
    assert_eq!(m.render_output().visible_text, "Hello");
}

#[test]
fn stop() {
    let mut m = testing_machine();
    m.start(AnimationConfig::new("Hello")).unwrap();
    let timer = m.timer().unwrap();
    m.tick(timer.token);
    m.stop();
    m.stop();

    let clears = m
        .handler()
        .log()
        .iter()
        .filter(|event| matches!(event, TypingEvent::ClearTimer(_)))
        .count();
    assert_eq!(clears, 1);
    assert_eq!(m.timer(), None);
    assert_eq!(m.tick(timer.token), TickOutcome::Stale);
    assert_eq!(m.revealed(), 1);

    // Starting over with the same config is a new run.
    m.start(AnimationConfig::new("Hello")).unwrap();
    assert_eq!(m.revealed(), 0);
    assert_eq!(m.phase(), Phase::Typing);
    drive(&mut m);
    assert_eq!(m.handler().ends(), 1);
}

#[test]
fn timer_kept_when_cadence_unchanged() {
    let mut m = testing_machine();
    m.start(
        AnimationConfig::new("ab")
            .delete_characters(1)
            .typing_speed(Duration::from_millis(10))
            .deleting_speed(Duration::from_millis(10)),
    )
    .unwrap();
    let timer = m.timer().unwrap();
    m.tick(timer.token);
    m.tick(timer.token);
    assert_eq!(m.phase(), Phase::Deleting);
    assert_eq!(m.timer(), Some(timer));

    m.tick(timer.token);
    assert_eq!(m.render_output().visible_text, "a");
    assert_eq!(m.phase(), Phase::Done);
}

/// Ticks the armed timer until the run completes, returning the number of
/// ticks it took.
fn drive<H: TypingHandler>(m: &mut TypingMachine<H>) -> usize {
    let mut ticks = 0;
    while !m.is_complete() {
        let timer = m.timer().expect("incomplete run without a timer");
        assert_eq!(m.tick(timer.token), TickOutcome::Advanced);
        ticks += 1;
        assert!(ticks < 10_000, "animation never completed");
    }
    ticks
}

fn output(text: &str, cursor_visible: bool) -> RenderOutput {
    RenderOutput {
        visible_text: text.into(),
        cursor: DEFAULT_CURSOR,
        cursor_visible,
    }
}

fn testing_machine() -> TypingMachine<LogHandler> {
    TypingMachine::new(LogHandler::new())
}

pub(crate) struct LogHandler {
    log: Vec<TypingEvent>,
}

impl LogHandler {
    pub fn new() -> Self {
        Self { log: Vec::new() }
    }

    pub fn log(&self) -> &[TypingEvent] {
        &self.log
    }

    pub fn ends(&self) -> usize {
        self.log
            .iter()
            .filter(|event| **event == TypingEvent::AnimationEnd)
            .count()
    }
}

impl TypingHandler for LogHandler {
    fn set_timer(&mut self, timer: Timer) {
        self.log.push(TypingEvent::SetTimer(timer));
    }

    fn clear_timer(&mut self, token: TimerToken) {
        self.log.push(TypingEvent::ClearTimer(token));
    }

    fn typed(&mut self, c: u8char) {
        self.log.push(TypingEvent::Typed(c));
    }

    fn erased(&mut self, c: u8char) {
        self.log.push(TypingEvent::Erased(c));
    }

    fn line_break(&mut self) {
        self.log.push(TypingEvent::LineBreak);
    }

    fn cursor_blink(&mut self, visible: bool) {
        self.log.push(TypingEvent::CursorBlink(visible));
    }

    fn render(&mut self, output: &RenderOutput) {
        self.log.push(TypingEvent::Render(output.clone()));
    }

    fn animation_end(&mut self) {
        self.log.push(TypingEvent::AnimationEnd);
    }
}
