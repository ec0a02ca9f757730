//! Accumulates bytes following an `ESC` until a known terminal escape sequence matches,
//! greedily probing at 3 then 4 bytes. Grounded on the same accumulate-then-match shape as
//! a VT100 key-sequence parser, but narrowed to exactly the sequences this editor binds.

use crate::config::MAX_ESCAPE;

/// The editor action an escape sequence resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeAction {
    HistoryPrevious,
    HistoryNext,
    CursorRight,
    CursorLeft,
    Home,
    End,
    DeleteForward,
}

/// Result of feeding one byte into the accumulator.
pub enum EscapeStep {
    /// Still accumulating; no sequence matched yet.
    Pending,
    /// A sequence matched; the escape buffer has been cleared.
    Matched(EscapeAction),
    /// The buffer filled or no sequence could ever match; the escape is abandoned.
    Discarded,
}

pub struct EscapeRecognizer {
    buf: [u8; MAX_ESCAPE],
    len: usize,
}

impl EscapeRecognizer {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MAX_ESCAPE],
            len: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.len > 0
    }

    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Begins a new sequence (called when `ESC` is seen outside an in-progress one).
    pub fn begin(&mut self) {
        self.len = 0;
        self.buf[0] = 0x1B;
        self.len = 1;
    }

    /// Feeds the next byte of an in-progress sequence.
    pub fn feed(&mut self, byte: u8) -> EscapeStep {
        if self.len >= MAX_ESCAPE {
            self.reset();
            return EscapeStep::Discarded;
        }
        self.buf[self.len] = byte;
        self.len += 1;

        if self.len == 3 {
            if let Some(action) = match_three(&self.buf[..3]) {
                self.reset();
                return EscapeStep::Matched(action);
            }
        }
        if self.len == 4 {
            let result = match_four(&self.buf[..4]);
            self.reset();
            return match result {
                Some(action) => EscapeStep::Matched(action),
                None => EscapeStep::Discarded,
            };
        }
        EscapeStep::Pending
    }
}

fn match_three(seq: &[u8]) -> Option<EscapeAction> {
    match seq {
        [0x1B, 0x5B, 0x41] => Some(EscapeAction::HistoryPrevious),
        [0x1B, 0x5B, 0x42] => Some(EscapeAction::HistoryNext),
        [0x1B, 0x5B, 0x43] => Some(EscapeAction::CursorRight),
        [0x1B, 0x5B, 0x44] => Some(EscapeAction::CursorLeft),
        [0x1B, 0x4F, 0x48] => Some(EscapeAction::Home),
        [0x1B, 0x4F, 0x46] => Some(EscapeAction::End),
        _ => None,
    }
}

fn match_four(seq: &[u8]) -> Option<EscapeAction> {
    match seq {
        [0x1B, 0x5B, 0x33, 0x7E] => Some(EscapeAction::DeleteForward),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(bytes: &[u8]) -> EscapeStep {
        let mut r = EscapeRecognizer::new();
        r.begin();
        let mut last = EscapeStep::Pending;
        for &b in bytes {
            last = r.feed(b);
        }
        last
    }

    #[test]
    fn up_arrow_matches_at_three_bytes() {
        assert!(matches!(
            run(&[0x5B, 0x41]),
            EscapeStep::Matched(EscapeAction::HistoryPrevious)
        ));
    }

    #[test]
    fn delete_requires_four_bytes() {
        assert!(matches!(
            run(&[0x5B, 0x33, 0x7E]),
            EscapeStep::Matched(EscapeAction::DeleteForward)
        ));
    }

    #[test]
    fn unknown_sequence_discarded_at_four_bytes() {
        assert!(matches!(run(&[0x5B, 0x39, 0x39]), EscapeStep::Discarded));
    }

    #[test]
    fn discarded_sequence_leaves_recognizer_inactive() {
        let mut r = EscapeRecognizer::new();
        r.begin();
        let _ = r.feed(0x5B);
        let _ = r.feed(0x39);
        let _ = r.feed(0x39);
        assert!(!r.is_active());
    }
}
