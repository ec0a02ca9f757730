//! Capacity constants shared across the crate.
//!
//! There is no on-disk or environment-backed configuration: every tunable here is a
//! `const` baked into the binary, and engines are parameterized over the matching const
//! generics at the call site (see [`crate::engine::Engine`]).

/// Default prompt emitted when the host does not set its own.
pub const PROMPT: &str = "> ";

/// Maximum length of the editable line, including the trailing NUL.
pub const MAX_LINE: usize = 128;

/// Capacity of the history ring, in bytes.
pub const MAX_HIST: usize = 1024;

/// Maximum number of words a single line may split into.
pub const MAX_WORDS: usize = 16;

/// Maximum bytes held while an escape sequence is being accumulated.
pub const MAX_ESCAPE: usize = 8;

/// Maximum depth of the grammar stack (nested token-list levels).
pub const MAX_LEVELS: usize = 8;

/// Capacity of the serialized-argument byte buffer.
pub const ARG_STORAGE: usize = 64;

/// Maximum number of token entries the walker will consider at one grammar level when
/// building a completion candidate list.
pub const MAX_CANDIDATES: usize = 16;
