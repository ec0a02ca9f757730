//! Error taxonomy surfaced by printing, never by panicking.
//!
//! Every variant corresponds to exactly one row of the engine's error table. The engine
//! never returns these to the host; it consumes them internally at the line-submission
//! boundary and writes [`ShellError::message`] to the print sink.

/// A recoverable failure while splitting, matching, or tokenizing a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellError {
    /// A quoted word ran off the end of the line without a closing `"`.
    UnmatchedQuote,
    /// The line split into more than `MAX_WORDS` words.
    TooManyWords,
    /// A word matched neither exactly nor as a unique prefix at the current grammar level.
    InvalidCommand,
    /// An argument word failed to parse as its expected type, or failed a TOKEN match.
    InvalidValue,
    /// The line ended with an argument still pending.
    MissingArgument,
    /// More words followed a grammar entry with no further subtokens.
    TooManyArgs,
}

impl ShellError {
    /// The exact line printed to the sink for this error.
    pub const fn message(self) -> &'static str {
        match self {
            ShellError::UnmatchedQuote => "Unmatched quote.",
            ShellError::TooManyWords => "Too many words.",
            ShellError::InvalidCommand => "Invalid command.",
            ShellError::InvalidValue => "Invalid value.",
            ShellError::MissingArgument => "Missing argument.",
            ShellError::TooManyArgs => "Too many arguments.",
        }
    }
}

impl core::fmt::Display for ShellError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
