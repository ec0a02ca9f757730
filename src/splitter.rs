//! Destructive, allocation-free word splitter and its inverse.
//!
//! `split` overwrites the separators inside a line buffer with NULs so each word becomes
//! its own C-style string, recording each word's start offset. `unsplit` walks the same
//! bytes back into a single string, using a single "are we inside a span that was quoted"
//! flag toggled at most once per word so that a leading `"` opens a quoted word exactly
//! once — a second `"` immediately following closes it (yielding an empty quoted word)
//! rather than opening a nested quote.

use crate::config::MAX_WORDS;
use crate::error::ShellError;

pub struct Words {
    pub starts: heapless::Vec<usize, MAX_WORDS>,
    pub count: usize,
}

impl Words {
    const fn new() -> Self {
        Self {
            starts: heapless::Vec::new(),
            count: 0,
        }
    }
}

/// Splits `line[..len]` in place. On success, `line[len] == 0` is preserved logically (the
/// last word's terminator occupies that slot) and `Words` holds one start offset per word.
/// On failure the buffer is restored via [`unsplit`] before returning.
pub fn split(line: &mut [u8], len: usize) -> Result<Words, ShellError> {
    let mut words = Words::new();
    let mut i = 0;
    while i < len {
        if line[i] == b' ' {
            i += 1;
            continue;
        }
        let quoted = line[i] == b'"';
        let start = if quoted { i + 1 } else { i };
        if words.starts.push(start).is_err() {
            unsplit(line, len);
            return Err(ShellError::TooManyWords);
        }
        words.count += 1;

        if quoted {
            i += 1;
            let mut closed = false;
            while i < len {
                if line[i] == b'"' {
                    line[i] = 0;
                    i += 1;
                    closed = true;
                    break;
                }
                i += 1;
            }
            if !closed {
                unsplit(line, len);
                return Err(ShellError::UnmatchedQuote);
            }
        } else {
            while i < len && line[i] != b' ' {
                i += 1;
            }
            if i < len {
                line[i] = 0;
                i += 1;
            }
        }
    }
    Ok(words)
}

/// Inverse of [`split`]: every interior NUL becomes `"` while inside a span that was
/// originally quoted, or a space otherwise. Leaves `line_len` unchanged; the caller is
/// responsible for re-terminating at `len`.
pub fn unsplit(line: &mut [u8], len: usize) {
    let mut in_quotes = false;
    let mut i = 0;
    while i < len {
        if line[i] == 0 {
            if in_quotes {
                line[i] = b'"';
                in_quotes = false;
            } else {
                line[i] = b' ';
            }
        } else if line[i] == b'"' {
            in_quotes = !in_quotes;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prep(s: &[u8]) -> ([u8; 64], usize) {
        let mut buf = [0u8; 64];
        buf[..s.len()].copy_from_slice(s);
        (buf, s.len())
    }

    #[test]
    fn splits_on_plain_spaces() {
        let (mut buf, len) = prep(b"set foo bar");
        let words = split(&mut buf, len).unwrap();
        assert_eq!(words.count, 3);
        assert_eq!(&buf[words.starts[0]..words.starts[0] + 3], b"set");
    }

    #[test]
    fn quoted_span_keeps_embedded_space() {
        let (mut buf, len) = prep(b"name \"hi there\"");
        let words = split(&mut buf, len).unwrap();
        assert_eq!(words.count, 2);
        let start = words.starts[1];
        let word: heapless::Vec<u8, 32> = buf[start..]
            .iter()
            .take_while(|&&b| b != 0)
            .copied()
            .collect();
        assert_eq!(word.as_slice(), b"hi there");
    }

    #[test]
    fn unmatched_quote_restores_original_buffer() {
        let (mut buf, len) = prep(b"foo \"bar");
        let original = buf;
        let err = split(&mut buf, len).unwrap_err();
        assert_eq!(err, ShellError::UnmatchedQuote);
        assert_eq!(&buf[..len], &original[..len]);
    }

    #[test]
    fn split_then_unsplit_is_identity() {
        let (mut buf, len) = prep(b"name \"hi there\" extra");
        let original = buf;
        let _ = split(&mut buf, len).unwrap();
        unsplit(&mut buf, len);
        assert_eq!(&buf[..len], &original[..len]);
    }

    #[test]
    fn too_many_words_is_reported_and_buffer_restored() {
        let mut line = heapless::Vec::<u8, 80>::new();
        for _ in 0..(MAX_WORDS + 2) {
            line.extend_from_slice(b"a ").ok();
        }
        let len = line.len();
        let mut buf = [0u8; 80];
        buf[..len].copy_from_slice(&line);
        let original = buf;
        let err = split(&mut buf, len).unwrap_err();
        assert_eq!(err, ShellError::TooManyWords);
        assert_eq!(&buf[..len], &original[..len]);
    }
}
