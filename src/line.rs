//! The editable line buffer and its echo.
//!
//! `LineBuffer` owns the fixed-capacity byte array, its logical length, and the cursor.
//! Every mutating method also emits the matching ANSI byte sequence to the sink so the
//! terminal's visible state always equals the logical buffer contents. There is no
//! separate "dirty" flag or deferred redraw: each keystroke produces exactly the bytes
//! needed to move from the previous visible state to the new one, never a full
//! clear-and-redraw of the line.

/// A capability that accepts raw output bytes. Implemented for any `FnMut(&[u8])`, so the
/// caller can hand the engine a closure wrapping a UART write, a socket write, or (in
/// tests) a `heapless::Vec` recorder.
pub trait PrintSink {
    fn write(&mut self, bytes: &[u8]);
}

impl<F: FnMut(&[u8])> PrintSink for F {
    fn write(&mut self, bytes: &[u8]) {
        (self)(bytes)
    }
}

const CURSOR_LEFT: &[u8] = b"\x1B[D";
const CURSOR_RIGHT: &[u8] = b"\x1B[C";
const CLEAR_SCREEN_HOME: &[u8] = b"\x1B[2J\x1B[H";

/// Fixed-capacity, NUL-terminated line under construction.
pub struct LineBuffer<const MAX_LINE: usize> {
    buf: [u8; MAX_LINE],
    len: usize,
    cursor: usize,
}

impl<const MAX_LINE: usize> LineBuffer<MAX_LINE> {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MAX_LINE],
            len: 0,
            cursor: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Mutable access to the full backing array, for callers (and tests) that need to
    /// inspect or repair the raw buffer directly rather than through the cursor-aware
    /// editing methods.
    pub fn raw_mut(&mut self) -> &mut [u8; MAX_LINE] {
        &mut self.buf
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Resets to an empty line without touching the sink; the caller is responsible for
    /// re-emitting a prompt afterward.
    pub fn reset(&mut self) {
        for b in self.buf[..self.len].iter_mut() {
            *b = 0;
        }
        self.len = 0;
        self.cursor = 0;
    }

    /// Inserts `ch` at the cursor. Returns `false` (no-op) if the buffer is full.
    pub fn insert(&mut self, ch: u8, sink: &mut impl PrintSink) -> bool {
        if self.len >= MAX_LINE - 1 {
            return false;
        }
        if self.cursor == self.len {
            self.buf[self.cursor] = ch;
            self.len += 1;
            self.cursor += 1;
            self.buf[self.len] = 0;
            sink.write(&[ch]);
        } else {
            let tail_len = self.len - self.cursor;
            for i in (self.cursor..self.len).rev() {
                self.buf[i + 1] = self.buf[i];
            }
            self.buf[self.cursor] = ch;
            self.len += 1;
            self.cursor += 1;
            self.buf[self.len] = 0;
            sink.write(&self.buf[self.cursor - 1..self.len]);
            for _ in 0..tail_len {
                sink.write(CURSOR_LEFT);
            }
        }
        true
    }

    /// Deletes the byte left of the cursor. Returns `false` if the cursor is at the start.
    pub fn backspace(&mut self, sink: &mut impl PrintSink) -> bool {
        if self.cursor == 0 {
            return false;
        }
        if self.cursor == self.len {
            self.len -= 1;
            self.cursor -= 1;
            self.buf[self.len] = 0;
            sink.write(CURSOR_LEFT);
            sink.write(b" ");
            sink.write(CURSOR_LEFT);
        } else {
            for i in self.cursor..self.len {
                self.buf[i - 1] = self.buf[i];
            }
            self.len -= 1;
            self.cursor -= 1;
            self.buf[self.len] = 0;
            sink.write(CURSOR_LEFT);
            let tail_len = self.len - self.cursor;
            sink.write(&self.buf[self.cursor..self.len]);
            sink.write(b" ");
            for _ in 0..tail_len + 1 {
                sink.write(CURSOR_LEFT);
            }
        }
        true
    }

    /// Deletes the byte under the cursor (forward delete). Returns `false` at end-of-line.
    pub fn delete_forward(&mut self, sink: &mut impl PrintSink) -> bool {
        if self.cursor == self.len {
            return false;
        }
        for i in self.cursor..self.len {
            self.buf[i] = self.buf[i + 1];
        }
        self.len -= 1;
        self.buf[self.len] = 0;
        let tail_len = self.len - self.cursor;
        sink.write(&self.buf[self.cursor..self.len]);
        sink.write(b" ");
        for _ in 0..tail_len + 1 {
            sink.write(CURSOR_LEFT);
        }
        true
    }

    pub fn move_left(&mut self, sink: &mut impl PrintSink) {
        if self.cursor > 0 {
            self.cursor -= 1;
            sink.write(CURSOR_LEFT);
        }
    }

    pub fn move_right(&mut self, sink: &mut impl PrintSink) {
        if self.cursor < self.len {
            self.cursor += 1;
            sink.write(CURSOR_RIGHT);
        }
    }

    pub fn move_home(&mut self, sink: &mut impl PrintSink) {
        for _ in 0..self.cursor {
            sink.write(CURSOR_LEFT);
        }
        self.cursor = 0;
    }

    pub fn move_end(&mut self, sink: &mut impl PrintSink) {
        for _ in self.cursor..self.len {
            sink.write(CURSOR_RIGHT);
        }
        self.cursor = self.len;
    }

    /// Ctrl-K: erase from cursor to end of line.
    pub fn kill_to_end(&mut self, sink: &mut impl PrintSink) {
        let tail_len = self.len - self.cursor;
        if tail_len == 0 {
            return;
        }
        for _ in 0..tail_len {
            sink.write(b" ");
        }
        for _ in 0..tail_len {
            sink.write(CURSOR_LEFT);
        }
        self.len = self.cursor;
        self.buf[self.len] = 0;
    }

    /// Ctrl-W: erase the run of trailing whitespace then the word before it.
    pub fn kill_prev_word(&mut self, sink: &mut impl PrintSink) {
        while self.cursor > 0 && self.buf[self.cursor - 1] == b' ' {
            self.backspace(sink);
        }
        while self.cursor > 0 && self.buf[self.cursor - 1] != b' ' {
            self.backspace(sink);
        }
    }

    /// Ctrl-L: clear screen and redraw prompt + current buffer without touching state.
    pub fn clear_screen(&self, prompt: &[u8], sink: &mut impl PrintSink) {
        sink.write(CLEAR_SCREEN_HOME);
        sink.write(prompt);
        sink.write(self.as_bytes());
        let tail_len = self.len - self.cursor;
        for _ in 0..tail_len {
            sink.write(CURSOR_LEFT);
        }
    }
}
