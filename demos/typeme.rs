use std::io::{stdout, Write};
use std::thread;

use typeme::{AnimationConfig, ConfigError, RenderOutput, Timer, TimerToken, TypeMe, TypingHandler};

/// Repaints the whole terminal on every render and remembers the one timer
/// the animation asked for.
struct Terminal {
    timer: Option<Timer>,
}

impl TypingHandler for Terminal {
    fn set_timer(&mut self, timer: Timer) {
        self.timer = Some(timer);
    }

    fn clear_timer(&mut self, token: TimerToken) {
        if self.timer.is_some_and(|timer| timer.token == token) {
            self.timer = None;
        }
    }

    fn render(&mut self, output: &RenderOutput) {
        let mut out = stdout().lock();
        // Nothing useful to do if the terminal went away mid-animation.
        let _ = write!(out, "\x1b[2J\x1b[H{output}");
        let _ = out.flush();
    }

    fn animation_end(&mut self) {
        log::info!("animation finished");
    }
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let mut typeme = TypeMe::new(Terminal { timer: None });
    typeme.start([
        AnimationConfig::new("Hello world!").delete_characters(6),
        AnimationConfig::new("there.").line_break(true),
        AnimationConfig::new("This is typeme.").hide_cursor(false),
    ])?;

    // The last segment keeps blinking forever, so give it a few blinks and
    // then stop.
    let mut blinks = 6;
    while let Some(timer) = typeme.handler().timer {
        thread::sleep(timer.interval);
        typeme.tick(timer.token);
        if typeme.is_complete() {
            if blinks == 0 {
                break;
            }
            blinks -= 1;
        }
    }
    typeme.stop();
    println!();
    Ok(())
}
