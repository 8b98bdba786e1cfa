//! String runtime shared by every Trica back end
//!
//! Three primitives make up the whole runtime:
//!
//! - [`Runtime::print`]: write a string verbatim and cache an owned copy
//! - [`Runtime::concat`]: build a new owned string from two inputs
//! - [`Runtime::last_output`]: borrow the cached copy (`""` before any print)
//!
//! The cache is a [`LastOutput`] value owned by the [`Runtime`], so there is
//! never more than one outstanding buffer and nothing lives in a global.
//! Every buffer is allocated fallibly against a per-buffer ceiling; running
//! out is reported as [`PrimitiveError::Allocation`] instead of aborting.

use std::io::{self, BufRead, Read, Write};
use thiserror::Error;

/// Default ceiling for a single runtime string (16 MiB)
pub const DEFAULT_MAX_STRING_BYTES: usize = 16 * 1024 * 1024;

/// Errors raised by the runtime primitives
#[derive(Debug, Error)]
pub enum PrimitiveError {
    #[error("Allocation of {requested} bytes refused (limit is {limit} bytes)")]
    Allocation { requested: usize, limit: usize },

    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),

    #[error("Failed to read input: {0}")]
    Input(#[source] io::Error),
}

/// The most recently printed string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastOutput {
    buffer: Option<String>,
}

impl LastOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached text, or `""` when nothing has been printed
    pub fn get(&self) -> &str {
        self.buffer.as_deref().unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.buffer.as_ref().map_or(0, String::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether anything has been printed yet
    pub fn is_set(&self) -> bool {
        self.buffer.is_some()
    }

    fn replace(&mut self, text: String) {
        // The previous buffer is dropped here
        self.buffer = Some(text);
    }
}

/// Owner of the output sink, the input source and the last output cache
pub struct Runtime<W: Write> {
    writer: W,
    input: Box<dyn BufRead>,
    last_output: LastOutput,
    max_string_bytes: usize,
}

impl<W: Write> Runtime<W> {
    /// Create a runtime writing to `writer` with an empty input source
    pub fn new(writer: W) -> Self {
        Runtime {
            writer,
            input: Box::new(io::empty()),
            last_output: LastOutput::new(),
            max_string_bytes: DEFAULT_MAX_STRING_BYTES,
        }
    }

    /// Set the ceiling for any single runtime string
    pub fn with_max_string_bytes(mut self, max_string_bytes: usize) -> Self {
        self.max_string_bytes = max_string_bytes;
        self
    }

    /// Set the source read by [`read_line`](Self::read_line)
    pub fn with_input(mut self, input: Box<dyn BufRead>) -> Self {
        self.input = input;
        self
    }

    /// Write `text` verbatim, then cache an owned copy of it.
    ///
    /// On an allocation failure the previous cache is kept and nothing is
    /// written. On a write failure the cache is left unchanged.
    pub fn print(&mut self, text: &str) -> Result<(), PrimitiveError> {
        let copy = self.copy(text)?;
        self.writer
            .write_all(text.as_bytes())
            .map_err(PrimitiveError::Output)?;
        self.last_output.replace(copy);
        Ok(())
    }

    /// Return a new string holding `first` followed by `second`
    pub fn concat(&self, first: &str, second: &str) -> Result<String, PrimitiveError> {
        concat(first, second, self.max_string_bytes)
    }

    /// Most recently printed string, or `""` before the first print
    pub fn last_output(&self) -> &str {
        self.last_output.get()
    }

    /// Owned copy of the cached string, allocated like any other runtime string
    pub fn dup_last_output(&self) -> Result<String, PrimitiveError> {
        self.copy(self.last_output.get())
    }

    pub fn last_output_state(&self) -> &LastOutput {
        &self.last_output
    }

    /// Put back a cache captured earlier (history replay)
    pub fn restore_last_output(&mut self, last_output: LastOutput) {
        self.last_output = last_output;
    }

    /// Write `prompt` verbatim and read one line of input.
    ///
    /// The trailing line terminator is stripped; end of input yields `""`.
    /// The last output cache is not touched. At most `max_string_bytes` plus
    /// a `\r\n` terminator is read, so an oversized line is refused without
    /// being buffered whole.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, PrimitiveError> {
        self.writer
            .write_all(prompt.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(PrimitiveError::Output)?;

        let bound = (self.max_string_bytes as u64).saturating_add(2);
        let mut bytes = Vec::new();
        (&mut self.input)
            .take(bound)
            .read_until(b'\n', &mut bytes)
            .map_err(PrimitiveError::Input)?;

        if bytes.ends_with(b"\n") {
            bytes.pop();
            if bytes.ends_with(b"\r") {
                bytes.pop();
            }
        }

        if bytes.len() > self.max_string_bytes {
            tracing::warn!(limit = self.max_string_bytes, "input line exceeds runtime limit");
            return Err(PrimitiveError::Allocation {
                requested: bytes.len(),
                limit: self.max_string_bytes,
            });
        }

        String::from_utf8(bytes)
            .map_err(|e| PrimitiveError::Input(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    pub fn flush(&mut self) -> Result<(), PrimitiveError> {
        self.writer.flush().map_err(PrimitiveError::Output)
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn copy(&self, text: &str) -> Result<String, PrimitiveError> {
        let mut buffer = allocate(text.len(), self.max_string_bytes)?;
        buffer.push_str(text);
        Ok(buffer)
    }
}

/// Concatenate two strings into a new buffer of at most `limit` bytes
pub fn concat(first: &str, second: &str, limit: usize) -> Result<String, PrimitiveError> {
    let requested = first
        .len()
        .checked_add(second.len())
        .ok_or(PrimitiveError::Allocation {
            requested: usize::MAX,
            limit,
        })?;

    let mut buffer = allocate(requested, limit)?;
    buffer.push_str(first);
    buffer.push_str(second);
    Ok(buffer)
}

fn allocate(requested: usize, limit: usize) -> Result<String, PrimitiveError> {
    if requested > limit {
        tracing::warn!(requested, limit, "string exceeds runtime limit");
        return Err(PrimitiveError::Allocation { requested, limit });
    }

    let mut buffer = String::new();
    buffer.try_reserve_exact(requested).map_err(|_| {
        tracing::warn!(requested, "allocator refused string buffer");
        PrimitiveError::Allocation { requested, limit }
    })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn runtime() -> Runtime<Vec<u8>> {
        Runtime::new(Vec::new())
    }

    fn output(rt: &Runtime<Vec<u8>>) -> &str {
        std::str::from_utf8(rt.writer()).unwrap()
    }

    /// Writer that fails every write
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_last_output_empty_before_print() {
        let rt = runtime();
        assert_eq!(rt.last_output(), "");
        assert!(!rt.last_output_state().is_set());
    }

    #[test]
    fn test_print_writes_verbatim_and_caches() {
        let mut rt = runtime();
        rt.print("🌌 Welcome").unwrap();
        rt.print("").unwrap();
        rt.print("Hello\n").unwrap();

        assert_eq!(output(&rt), "🌌 WelcomeHello\n");
        assert_eq!(rt.last_output(), "Hello\n");
        assert_eq!(rt.last_output_state().len(), 6);
    }

    #[test]
    fn test_print_empty_string_sets_cache() {
        let mut rt = runtime();
        rt.print("").unwrap();

        assert!(rt.last_output_state().is_set());
        assert!(rt.last_output_state().is_empty());
    }

    #[test]
    fn test_concat_leaves_inputs_alone() {
        let rt = runtime();
        let first = String::from("Hello");
        let second = String::from(" ");

        let joined = rt.concat(&rt.concat(&first, &second).unwrap(), "Universe!").unwrap();

        assert_eq!(joined, "Hello Universe!");
        assert_eq!(first, "Hello");
        assert_eq!(second, " ");
    }

    #[test]
    fn test_print_over_limit_keeps_previous_cache() {
        let mut rt = runtime().with_max_string_bytes(4);
        rt.print("abcd").unwrap();

        let err = rt.print("abcde").unwrap_err();

        assert!(matches!(
            err,
            PrimitiveError::Allocation {
                requested: 5,
                limit: 4
            }
        ));
        assert_eq!(rt.last_output(), "abcd");
        assert_eq!(output(&rt), "abcd");
    }

    #[test]
    fn test_concat_over_limit() {
        let rt = runtime().with_max_string_bytes(8);
        assert!(rt.concat("1234", "5678").is_ok());
        assert!(matches!(
            rt.concat("12345", "6789"),
            Err(PrimitiveError::Allocation { requested: 9, .. })
        ));
    }

    #[test]
    fn test_write_failure_leaves_cache_unchanged() {
        let mut rt = Runtime::new(BrokenPipe);
        let err = rt.print("lost").unwrap_err();

        assert!(matches!(err, PrimitiveError::Output(_)));
        assert_eq!(rt.last_output(), "");
    }

    #[test]
    fn test_read_line_strips_terminator() {
        let input = io::Cursor::new(b"Ada\r\nGrace\n".to_vec());
        let mut rt = runtime().with_input(Box::new(input));
        rt.print("before").unwrap();

        assert_eq!(rt.read_line("Name? ").unwrap(), "Ada");
        assert_eq!(rt.read_line("Again? ").unwrap(), "Grace");
        assert_eq!(rt.read_line("EOF? ").unwrap(), "");

        assert_eq!(output(&rt), "beforeName? Again? EOF? ");
        assert_eq!(rt.last_output(), "before");
    }

    #[test]
    fn test_read_line_refuses_oversized_input() {
        let input = io::Cursor::new(format!("abcd\r\n{}\n", "x".repeat(1000)).into_bytes());
        let mut rt = runtime().with_max_string_bytes(4).with_input(Box::new(input));

        assert_eq!(rt.read_line("").unwrap(), "abcd");
        let err = rt.read_line("").unwrap_err();

        // Only the bounded prefix was read
        assert!(matches!(
            err,
            PrimitiveError::Allocation {
                requested: 6,
                limit: 4
            }
        ));
    }

    #[test]
    fn test_read_line_rejects_invalid_utf8() {
        let input = io::Cursor::new(vec![0xff, 0xfe, b'\n']);
        let mut rt = runtime().with_input(Box::new(input));

        assert!(matches!(rt.read_line(""), Err(PrimitiveError::Input(_))));
    }

    #[test]
    fn test_restore_last_output() {
        let mut rt = runtime();
        rt.print("one").unwrap();
        let saved = rt.last_output_state().clone();
        rt.print("two").unwrap();

        rt.restore_last_output(saved);
        assert_eq!(rt.last_output(), "one");
        assert_eq!(rt.dup_last_output().unwrap(), "one");
    }

    proptest! {
        #[test]
        fn stdout_is_concatenation_of_prints(texts in proptest::collection::vec(".*", 0..12)) {
            let mut rt = runtime();
            for text in &texts {
                rt.print(text).unwrap();
                prop_assert_eq!(rt.last_output(), text.as_str());
            }
            prop_assert_eq!(output(&rt), texts.concat());
        }

        #[test]
        fn concat_is_first_then_second(a in ".*", b in ".*") {
            let joined = concat(&a, &b, usize::MAX).unwrap();
            prop_assert_eq!(joined.len(), a.len() + b.len());
            prop_assert!(joined.starts_with(&a));
            prop_assert!(joined.ends_with(&b));
        }
    }
}
