//! Typing animation state machine.
//!
//! This library decides, one timer tick at a time, how much of a string is
//! visible while it is "typed": characters appear one by one, an optional
//! line break is appended, trailing characters are optionally deleted again,
//! and a cursor either disappears or keeps blinking once everything settles.
//!
//! It doesn't draw anything and doesn't own any timers. The host supplies an
//! implementation of [`TypingHandler`] which is asked to arm and disarm a
//! single repeating timer, and which receives the text to display after each
//! step. The host calls [`TypingMachine::tick`] with the timer's token
//! whenever it fires. Ticks for a timer that has since been replaced are
//! ignored, so a host doesn't need to worry about callbacks it already
//! queued.
//!
//! The main entry point in this crate is [`TypingMachine`], which animates
//! one [`AnimationConfig`]. [`TypeMe`] chains several of them together.
//!
//! ```rust
//! # use typeme::{AnimationConfig, TypingEvent, TypingMachine, typing_handler_fn};
//! # let mut evts: Vec<TypingEvent> = Vec::new();
//! let mut machine = TypingMachine::new(typing_handler_fn(|event| {
//!     println!("{event:?}");
//! #   evts.push(event);
//! }));
//! machine.start(AnimationConfig::new("Hi!")).unwrap();
//! while let Some(timer) = machine.timer() {
//!     // A real host would wait for `timer.interval` here.
//!     machine.tick(timer.token);
//! }
//! assert_eq!(machine.render_output().visible_text, "Hi!");
//! # drop(machine);
//! # assert_eq!(evts.last(), Some(&TypingEvent::AnimationEnd));
//! # assert_eq!(
//! #     evts.iter().filter(|e| matches!(e, TypingEvent::Typed(_))).count(),
//! #     3,
//! # );
//! ```
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod config;
mod error;
mod handler;
mod machine;
mod sequence;

pub use config::{
    AnimationConfig, TextProps, DEFAULT_BLINK_INTERVAL, DEFAULT_CURSOR, DEFAULT_DELETING_INTERVAL,
    DEFAULT_TYPING_INTERVAL,
};
pub use error::{ConfigError, IntervalKind};
pub use handler::{typing_handler_fn, RenderOutput, TypingEvent, TypingHandler};
pub use machine::{Phase, TickOutcome, Timer, TimerToken, TypingMachine, LINE_BREAK};
pub use sequence::TypeMe;

#[cfg(test)]
mod tests;
