#![no_std]

pub extern crate heapless;

#[cfg(feature = "hosted")]
extern crate std;

pub mod config;
pub mod engine;
pub mod error;
pub mod escape;
pub mod grammar;
pub mod history;
pub mod line;
pub mod log;
pub mod splitter;
pub mod terminal;

pub use engine::{ControlFlow, Engine};
pub use error::ShellError;
pub use escape::{EscapeAction, EscapeRecognizer, EscapeStep};
pub use grammar::{ArgTag, ArgType, Expectation, ParsedLine, ParsedToken, TokenEntry, Walker};
pub use history::History;
pub use line::{LineBuffer, PrintSink};
pub use terminal::RawMode;

// Re-exported so the `log!` family of macros can refer to `$crate::log::...` from a
// dependent crate.
pub use log::{log_with_level, LogLevel, UnifiedWriter};
