//! Top-level input dispatcher: the single `feed(byte)` entry point that ties the line
//! buffer, escape recognizer, history ring, splitter, and grammar walker together.
//!
//! This is the synchronous, byte-at-a-time driver described by the rest of the crate —
//! there is no task spawning and no suspension point; every call to `feed` runs to
//! completion before the next byte is accepted.

use crate::config::{MAX_HIST, MAX_LINE, MAX_WORDS};
use crate::escape::{EscapeAction, EscapeRecognizer, EscapeStep};
use crate::grammar::{
    filter_candidates, longest_common_prefix, ArgType, Expectation, ParsedLine, ParsedToken,
    TokenEntry, Walker,
};
use crate::history::History;
use crate::line::{LineBuffer, PrintSink};
use crate::splitter::split;

/// Returned by [`Engine::feed`] to tell the host whether to keep driving bytes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

const BS: u8 = 0x08;
const DEL: u8 = 0x7F;
const TAB: u8 = 0x09;
const CR: u8 = 0x0D;
const LF: u8 = 0x0A;
const ESC: u8 = 0x1B;
const CTRL_A: u8 = 0x01;
const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const CTRL_E: u8 = 0x05;
const CTRL_K: u8 = 0x0B;
const CTRL_L: u8 = 0x0C;
const CTRL_N: u8 = 0x0E;
const CTRL_P: u8 = 0x10;
const CTRL_W: u8 = 0x17;

/// A line copied out of the engine's live buffer so that splitting and grammar-walking
/// never hold a borrow of `self` while the engine's own methods are also in use.
struct LineCopy {
    buf: [u8; MAX_LINE],
    len: usize,
}

impl LineCopy {
    fn words(&mut self) -> heapless::Vec<&[u8], MAX_WORDS> {
        let mut out = heapless::Vec::new();
        let words = match split(&mut self.buf[..self.len], self.len) {
            Ok(w) => w,
            Err(_) => return out,
        };
        for &start in words.starts.iter() {
            let mut end = start;
            while end < self.len && self.buf[end] != 0 {
                end += 1;
            }
            let _ = out.push(&self.buf[start..end]);
        }
        out
    }
}

/// The editor engine. `'g` is the lifetime of the borrowed grammar tree; `P` is the print
/// sink capability the engine writes all visible output through.
pub struct Engine<'g, P: PrintSink> {
    line: LineBuffer<MAX_LINE>,
    escape: EscapeRecognizer,
    history: History<MAX_HIST>,
    prompt: &'static str,
    root: &'g [TokenEntry<'g>],
    print: P,
    callback: Option<fn(&ParsedLine<'g>)>,
}

impl<'g, P: PrintSink> Engine<'g, P> {
    pub fn new(root: &'g [TokenEntry<'g>], print: P) -> Self {
        Self {
            line: LineBuffer::new(),
            escape: EscapeRecognizer::new(),
            history: History::new(),
            prompt: crate::config::PROMPT,
            root,
            print,
            callback: None,
        }
    }

    pub fn set_prompt(&mut self, prompt: &'static str) {
        self.prompt = prompt;
        self.print.write(prompt.as_bytes());
    }

    pub fn set_callback(&mut self, callback: fn(&ParsedLine<'g>)) {
        self.callback = Some(callback);
    }

    fn emit_prompt(&mut self) {
        self.print.write(b"\r\n");
        self.print.write(self.prompt.as_bytes());
    }

    fn snapshot_line(&self) -> LineCopy {
        let mut buf = [0u8; MAX_LINE];
        let len = self.line.len();
        buf[..len].copy_from_slice(self.line.as_bytes());
        LineCopy { buf, len }
    }

    /// Drives one input byte through the dispatcher. Returns `ControlFlow::Exit` only on
    /// Ctrl-D with an empty line.
    pub fn feed(&mut self, byte: u8) -> ControlFlow {
        if self.escape.is_active() {
            match self.escape.feed(byte) {
                EscapeStep::Pending => {}
                EscapeStep::Matched(action) => self.run_escape_action(action),
                EscapeStep::Discarded => {}
            }
            return ControlFlow::Continue;
        }

        match byte {
            ESC => self.escape.begin(),
            CR | LF => self.submit(),
            TAB => {
                if self.line.cursor() == self.line.len() {
                    self.complete();
                }
            }
            CTRL_A => self.line.move_home(&mut self.print),
            CTRL_C => {
                self.print.write(b"^C");
                self.line.reset();
                self.escape.reset();
                self.emit_prompt();
            }
            CTRL_D => {
                if self.line.is_empty() {
                    return ControlFlow::Exit;
                }
            }
            CTRL_E => self.line.move_end(&mut self.print),
            BS | DEL => {
                self.line.backspace(&mut self.print);
            }
            CTRL_K => self.line.kill_to_end(&mut self.print),
            CTRL_L => {
                self.line.clear_screen(self.prompt.as_bytes(), &mut self.print);
            }
            CTRL_N => self.history_next(),
            CTRL_P => self.history_previous(),
            CTRL_W => self.line.kill_prev_word(&mut self.print),
            0x20..=0x7E => {
                self.line.insert(byte, &mut self.print);
                self.history.reset_walk();
            }
            _ => {}
        }
        ControlFlow::Continue
    }

    fn run_escape_action(&mut self, action: EscapeAction) {
        match action {
            EscapeAction::HistoryPrevious => self.history_previous(),
            EscapeAction::HistoryNext => self.history_next(),
            EscapeAction::CursorRight => self.line.move_right(&mut self.print),
            EscapeAction::CursorLeft => self.line.move_left(&mut self.print),
            EscapeAction::Home => self.line.move_home(&mut self.print),
            EscapeAction::End => self.line.move_end(&mut self.print),
            EscapeAction::DeleteForward => {
                self.line.delete_forward(&mut self.print);
            }
        }
    }

    fn replace_line_with(&mut self, bytes: &[u8; MAX_LINE], len: usize) {
        while self.line.cursor() < self.line.len() {
            self.line.move_right(&mut self.print);
        }
        while self.line.cursor() > 0 {
            self.line.backspace(&mut self.print);
        }
        for &b in &bytes[..len] {
            self.line.insert(b, &mut self.print);
        }
    }

    fn history_previous(&mut self) {
        let mut out = [0u8; MAX_LINE];
        if let Some(n) = self.history.get_prev_entry(&mut out) {
            self.replace_line_with(&out, n);
        }
    }

    fn history_next(&mut self) {
        let mut out = [0u8; MAX_LINE];
        match self.history.get_next_entry(&mut out) {
            Some(n) => self.replace_line_with(&out, n),
            None => self.replace_line_with(&out, 0),
        }
    }

    fn submit(&mut self) {
        self.print.write(b"\r\n");
        if self.line.is_empty() {
            self.emit_prompt();
            return;
        }

        let snapshot_bytes: heapless::Vec<u8, MAX_LINE> = {
            let mut v = heapless::Vec::new();
            v.extend_from_slice(self.line.as_bytes()).ok();
            v
        };
        self.history.push(&snapshot_bytes);

        let mut copy = self.snapshot_line();
        let words = copy.words();

        if words.len() == 1 && words[0] == b"history" {
            let mut lines: heapless::Vec<heapless::Vec<u8, MAX_LINE>, 64> = heapless::Vec::new();
            self.history.show(|entry| {
                let mut v: heapless::Vec<u8, MAX_LINE> = heapless::Vec::new();
                v.extend_from_slice(entry).ok();
                let _ = lines.push(v);
            });
            // The line just submitted (this "history" invocation itself) was already
            // pushed above and is therefore the newest entry `show` yields; skip it so
            // the command doesn't list itself.
            for entry in lines.iter().skip(1) {
                self.print.write(entry);
                self.print.write(b"\r\n");
            }
        } else if !words.is_empty() && words[0] == b"help" {
            self.run_help(&words);
        } else {
            let walker = Walker::new(self.root);
            let mut out = ParsedLine::new();
            match walker.parse(&words, &mut out) {
                Ok(()) => {
                    if let Some(cb) = self.callback {
                        cb(&out);
                    }
                }
                Err(e) => self.print.write(e.message().as_bytes()),
            }
        }

        self.line.reset();
        self.escape.reset();
        self.emit_prompt();
    }

    fn run_help(&mut self, words: &heapless::Vec<&[u8], MAX_WORDS>) {
        if words.len() == 1 {
            for entry in self.root.iter() {
                self.print.write(b"  ");
                self.print.write(entry.name.as_bytes());
                self.print.write(b"\r\n");
            }
            return;
        }
        let walker = Walker::new(self.root);
        let rest = &words.as_slice()[1..];
        match walker.expect_after(rest) {
            Some(Expectation::TokenList(list)) => {
                for entry in list.iter() {
                    self.print.write(b"  ");
                    self.print.write(entry.name.as_bytes());
                    if let Some(help) = entry.help {
                        self.print.write(b" - ");
                        self.print.write(help.as_bytes());
                    }
                    self.print.write(b"\r\n");
                }
            }
            Some(Expectation::Done(Some(help))) | Some(Expectation::Arg(_, Some(help))) => {
                self.print.write(help.as_bytes());
                self.print.write(b"\r\n");
            }
            _ => {
                self.print.write(b"No help available.\r\n");
            }
        }
    }

    fn complete(&mut self) {
        if self.line.is_empty() {
            self.print.write(b"\r\n");
            for entry in self.root.iter() {
                self.print.write(b"  ");
                self.print.write(entry.name.as_bytes());
                self.print.write(b"\r\n");
            }
            self.print.write(self.prompt.as_bytes());
            self.print.write(self.line.as_bytes());
            return;
        }

        let last_is_space = self.line.as_bytes()[self.line.len() - 1] == b' ';
        let mut copy = self.snapshot_line();
        let words = copy.words();
        if words.is_empty() {
            return;
        }

        if last_is_space {
            let walker = Walker::new(self.root);
            let expectation = walker.expect_after(&words);
            self.print.write(b"\r\n");
            match expectation {
                Some(Expectation::TokenList(list)) => {
                    for entry in list.iter() {
                        self.print.write(b"  ");
                        self.print.write(entry.name.as_bytes());
                        self.print.write(b"\r\n");
                    }
                }
                Some(Expectation::Arg(arg_type, _)) => {
                    let label: &[u8] = match arg_type {
                        ArgType::Integer => b"  <integer>\r\n",
                        ArgType::Float => b"  <float>\r\n",
                        _ => b"  <string>\r\n",
                    };
                    self.print.write(label);
                }
                _ => {}
            }
            self.print.write(self.prompt.as_bytes());
            self.print.write(self.line.as_bytes());
            return;
        }

        let mut partial_buf = [0u8; MAX_LINE];
        let partial_src = *words.last().unwrap();
        let partial_len = partial_src.len();
        partial_buf[..partial_len].copy_from_slice(partial_src);

        let prior_count = words.len() - 1;
        let mut prior: heapless::Vec<&[u8], MAX_WORDS> = heapless::Vec::new();
        for w in words.iter().take(prior_count) {
            let _ = prior.push(*w);
        }

        let walker = Walker::new(self.root);
        let list = match walker.expect_after(&prior) {
            Some(Expectation::TokenList(list)) => list,
            _ => return,
        };
        let candidates = filter_candidates(list, &partial_buf[..partial_len]);

        match candidates.len() {
            0 => {}
            1 => {
                let mut suffix = [0u8; MAX_LINE];
                let name = candidates[0].name.as_bytes();
                let suffix_len = name.len() - partial_len;
                suffix[..suffix_len].copy_from_slice(&name[partial_len..]);
                for &b in &suffix[..suffix_len] {
                    self.line.insert(b, &mut self.print);
                }
                self.line.insert(b' ', &mut self.print);
            }
            _ => {
                // More than one candidate always gets listed, regardless of a shared
                // prefix; a longer common prefix is filled into the line in addition to
                // the listing, never instead of it.
                let lcp = longest_common_prefix(&candidates, partial_len);
                if lcp > partial_len {
                    let mut suffix = [0u8; MAX_LINE];
                    let name = candidates[0].name.as_bytes();
                    let suffix_len = lcp - partial_len;
                    suffix[..suffix_len].copy_from_slice(&name[partial_len..lcp]);
                    for &b in &suffix[..suffix_len] {
                        self.line.insert(b, &mut self.print);
                    }
                }
                self.print.write(b"\r\n");
                for c in candidates.iter() {
                    self.print.write(b"  ");
                    self.print.write(c.name.as_bytes());
                    self.print.write(b"\r\n");
                }
                self.print.write(self.prompt.as_bytes());
                self.print.write(self.line.as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

    fn feed_str(engine: &mut Engine<'_, impl PrintSink>, s: &str) {
        for &b in s.as_bytes() {
            engine.feed(b);
        }
    }

    #[test]
    fn simple_command_invokes_callback() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "show")];
        static SEEN: AtomicU16 = AtomicU16::new(0);
        fn cb(parsed: &ParsedLine) {
            if let ParsedToken::Id(id) = parsed.tokens[0] {
                SEEN.store(id, Ordering::SeqCst);
            }
        }
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                out.extend_from_slice(b).ok();
            });
            engine.set_callback(cb);
            feed_str(&mut engine, "show");
            engine.feed(CR);
        }
        assert_eq!(SEEN.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn typed_integer_argument_parses_hex() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "set").with_arg(ArgType::Integer)];
        static SEEN: core::sync::atomic::AtomicI64 = core::sync::atomic::AtomicI64::new(0);
        fn cb(parsed: &ParsedLine) {
            if let ParsedToken::Arg(crate::grammar::ArgTag::Integer, off, len) = parsed.tokens[1] {
                SEEN.store(parsed.read_integer(off, len), Ordering::SeqCst);
            }
        }
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                out.extend_from_slice(b).ok();
            });
            engine.set_callback(cb);
            feed_str(&mut engine, "set 0x2A");
            engine.feed(CR);
        }
        assert_eq!(SEEN.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn unmatched_quote_recovers_and_accepts_next_line() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "foo")];
        static SEEN: AtomicBool = AtomicBool::new(false);
        fn cb(_: &ParsedLine) {
            SEEN.store(true, Ordering::SeqCst);
        }
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                out.extend_from_slice(b).ok();
            });
            engine.set_callback(cb);
            feed_str(&mut engine, "foo \"bar");
            engine.feed(CR);
            assert!(!SEEN.load(Ordering::SeqCst));
            feed_str(&mut engine, "foo");
            engine.feed(CR);
        }
        assert!(SEEN.load(Ordering::SeqCst));
    }

    #[test]
    fn ctrl_d_on_empty_line_exits() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "show")];
        let mut engine = Engine::new(&G, |_b: &[u8]| {});
        assert_eq!(engine.feed(CTRL_D), ControlFlow::Exit);
    }

    #[test]
    fn ctrl_d_on_nonempty_line_is_ignored() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "show")];
        let mut engine = Engine::new(&G, |_b: &[u8]| {});
        engine.feed(b'a');
        assert_eq!(engine.feed(CTRL_D), ControlFlow::Continue);
    }

    #[test]
    fn history_up_arrow_recalls_last_line() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "show")];
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        let mut engine = Engine::new(&G, |b: &[u8]| {
            out.extend_from_slice(b).ok();
        });
        feed_str(&mut engine, "show");
        engine.feed(CR);
        engine.feed(ESC);
        engine.feed(0x5B);
        engine.feed(0x41);
        assert_eq!(engine.line.as_bytes(), b"show");
    }

    #[test]
    fn typed_float_argument_parses() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "setf").with_arg(ArgType::Float)];
        static SEEN: core::sync::atomic::AtomicU32 = core::sync::atomic::AtomicU32::new(0);
        fn cb(parsed: &ParsedLine) {
            if let ParsedToken::Arg(crate::grammar::ArgTag::Float, off, len) = parsed.tokens[1] {
                let v = parsed.read_float(off, len);
                SEEN.store((v * 100.0).round() as u32, Ordering::SeqCst);
            }
        }
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                out.extend_from_slice(b).ok();
            });
            engine.set_callback(cb);
            feed_str(&mut engine, "setf 3.14");
            engine.feed(CR);
        }
        assert_eq!(SEEN.load(Ordering::SeqCst), 314);
    }

    #[test]
    fn typed_string_argument_strips_quotes() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "say").with_arg(ArgType::String)];
        static SEEN_LEN: AtomicU16 = AtomicU16::new(0);
        fn cb(parsed: &ParsedLine) {
            if let ParsedToken::Arg(crate::grammar::ArgTag::String, off, len) = parsed.tokens[1] {
                let bytes = parsed.read_string(off, len);
                assert_eq!(bytes, b"hello world");
                SEEN_LEN.store(bytes.len() as u16, Ordering::SeqCst);
            }
        }
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                out.extend_from_slice(b).ok();
            });
            engine.set_callback(cb);
            feed_str(&mut engine, "say \"hello world\"");
            engine.feed(CR);
        }
        assert_eq!(SEEN_LEN.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn typed_token_argument_resolves_subtoken_id() {
        const STATES: [TokenEntry; 2] = [TokenEntry::new(100, "on"), TokenEntry::new(101, "off")];
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "led")
            .with_arg(ArgType::Token)
            .with_subtokens(&STATES)];
        static SEEN: AtomicU16 = AtomicU16::new(0);
        fn cb(parsed: &ParsedLine) {
            if let ParsedToken::Id(id) = parsed.tokens[1] {
                SEEN.store(id, Ordering::SeqCst);
            }
        }
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                out.extend_from_slice(b).ok();
            });
            engine.set_callback(cb);
            feed_str(&mut engine, "led on");
            engine.feed(CR);
        }
        assert_eq!(SEEN.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn help_on_leaf_command_prints_its_own_help_text() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "set")
            .with_help("set the counter")
            .with_arg(ArgType::Integer)];
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                out.extend_from_slice(b).ok();
            });
            feed_str(&mut engine, "help set");
            engine.feed(CR);
        }
        let text = core::str::from_utf8(&out).unwrap();
        assert!(text.contains("set the counter"));
        assert!(!text.contains("No help available"));
    }

    #[test]
    fn help_alone_lists_root_commands() {
        const G: [TokenEntry; 2] = [TokenEntry::new(1, "show"), TokenEntry::new(2, "shutdown")];
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                out.extend_from_slice(b).ok();
            });
            feed_str(&mut engine, "help");
            engine.feed(CR);
        }
        let text = core::str::from_utf8(&out).unwrap();
        assert!(text.contains("show"));
        assert!(text.contains("shutdown"));
    }

    #[test]
    fn history_builtin_skips_its_own_just_submitted_entry() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "show")];
        let mut writes: heapless::Vec<heapless::Vec<u8, 64>, 256> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                let mut v: heapless::Vec<u8, 64> = heapless::Vec::new();
                v.extend_from_slice(b).ok();
                writes.push(v).ok();
            });
            feed_str(&mut engine, "show");
            engine.feed(CR);
            feed_str(&mut engine, "history");
            engine.feed(CR);
        }
        assert!(writes.iter().any(|w| w.as_slice() == b"show"));
        assert!(!writes.iter().any(|w| w.as_slice() == b"history"));
    }

    #[test]
    fn tab_completion_lists_all_candidates_even_with_shared_prefix() {
        const G: [TokenEntry; 2] = [TokenEntry::new(1, "show"), TokenEntry::new(2, "shutdown")];
        let mut writes: heapless::Vec<heapless::Vec<u8, 64>, 256> = heapless::Vec::new();
        {
            let mut engine = Engine::new(&G, |b: &[u8]| {
                let mut v: heapless::Vec<u8, 64> = heapless::Vec::new();
                v.extend_from_slice(b).ok();
                writes.push(v).ok();
            });
            feed_str(&mut engine, "s");
            engine.feed(TAB);
            // the shared "sh" prefix is filled into the line in addition to, not instead
            // of, the candidate listing below.
            assert_eq!(engine.line.as_bytes(), b"sh");
        }
        assert!(writes.iter().any(|w| w.as_slice() == b"show"));
        assert!(writes.iter().any(|w| w.as_slice() == b"shutdown"));
    }

    #[test]
    fn tab_completion_single_candidate_inserts_trailing_space() {
        const G: [TokenEntry; 1] = [TokenEntry::new(1, "show")];
        let mut out: heapless::Vec<u8, 512> = heapless::Vec::new();
        let mut engine = Engine::new(&G, |b: &[u8]| {
            out.extend_from_slice(b).ok();
        });
        feed_str(&mut engine, "sh");
        engine.feed(TAB);
        assert_eq!(engine.line.as_bytes(), b"show ");
    }
}
