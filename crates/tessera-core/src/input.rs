//! Reading one user turn: a `TurnSource` seam, and the line-stream reader used
//! for piped stdin and tests.

use std::io::{self, BufRead};

/// Result of asking the user for a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRead {
    /// Complete turn, `prefix` first, every line newline-terminated.
    Line(String),
    /// Input stream closed.
    Closed,
    /// The user hit ctrl-c at the prompt.
    Interrupted,
}

/// Where user turns come from.
pub trait TurnSource {
    /// True when the source draws `prompt` itself (line editors). Otherwise
    /// the session prints it before calling [`TurnSource::next_turn`].
    fn draws_prompt(&self) -> bool {
        false
    }

    /// Block until the user finishes a turn. Lines ending in `\` continue the
    /// turn; the backslash is dropped and a newline kept.
    fn next_turn(&mut self, prompt: &str, prefix: &str) -> io::Result<TurnRead>;
}

/// Plain line stream: piped stdin, files, in-memory buffers.
#[derive(Debug)]
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> TurnSource for LineInput<R> {
    fn next_turn(&mut self, _prompt: &str, prefix: &str) -> io::Result<TurnRead> {
        Ok(match read_turn(&mut self.reader, prefix)? {
            Some(buffer) => TurnRead::Line(buffer),
            None => TurnRead::Closed,
        })
    }
}

/// Read lines until one does not end in `\`. Each line contributes its text
/// (continuation backslash stripped) plus a newline. `prefix` is placed in
/// front of the block. Bytes that are not UTF-8 are replaced, not rejected.
///
/// Returns `Ok(None)` when the stream ends before a line is complete.
pub fn read_turn<R: BufRead>(reader: &mut R, prefix: &str) -> io::Result<Option<String>> {
    let mut buffer = String::from(prefix);
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        trim_line_ending(&mut line);

        let another_line = line.last() == Some(&b'\\');
        if another_line {
            line.pop();
        }
        buffer.push_str(&String::from_utf8_lossy(&line));
        buffer.push('\n');

        if !another_line {
            return Ok(Some(buffer));
        }
    }
}

fn trim_line_ending(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn single_line() {
        let mut r = Cursor::new("hello\n");
        assert_eq!(read_turn(&mut r, "").unwrap().as_deref(), Some("hello\n"));
    }

    #[test]
    fn backslash_continues_onto_next_line() {
        let mut r = Cursor::new("hello\\\nworld\n");
        assert_eq!(
            read_turn(&mut r, "").unwrap().as_deref(),
            Some("hello\nworld\n")
        );
    }

    #[test]
    fn prefix_leads_the_block() {
        let mut r = Cursor::new("there\n");
        assert_eq!(
            read_turn(&mut r, "Hi ").unwrap().as_deref(),
            Some("Hi there\n")
        );
    }

    #[test]
    fn empty_line_is_a_bare_newline() {
        let mut r = Cursor::new("\nnext\n");
        assert_eq!(read_turn(&mut r, "").unwrap().as_deref(), Some("\n"));
        assert_eq!(read_turn(&mut r, "").unwrap().as_deref(), Some("next\n"));
    }

    #[test]
    fn crlf_is_stripped() {
        let mut r = Cursor::new("a\\\r\nb\r\n");
        assert_eq!(read_turn(&mut r, "").unwrap().as_deref(), Some("a\nb\n"));
    }

    #[test]
    fn last_line_without_newline_still_counts() {
        let mut r = Cursor::new("tail");
        assert_eq!(read_turn(&mut r, "").unwrap().as_deref(), Some("tail\n"));
        assert_eq!(read_turn(&mut r, "").unwrap(), None);
    }

    #[test]
    fn eof_mid_continuation_ends_the_stream() {
        let mut r = Cursor::new("more\\\n");
        assert_eq!(read_turn(&mut r, "").unwrap(), None);
    }

    #[test]
    fn latin1_bytes_are_replaced_not_rejected() {
        let mut r = Cursor::new(b"caf\xe9\\\nol\xe9\n".to_vec());
        assert_eq!(
            read_turn(&mut r, "").unwrap().as_deref(),
            Some("caf\u{FFFD}\nol\u{FFFD}\n")
        );
    }

    #[test]
    fn line_input_reports_closed_stream() {
        let mut src = LineInput::new(Cursor::new("hi\n"));
        assert!(!src.draws_prompt());
        assert_eq!(
            src.next_turn("> ", "").unwrap(),
            TurnRead::Line("hi\n".into())
        );
        assert_eq!(src.next_turn("> ", "").unwrap(), TurnRead::Closed);
    }
}
