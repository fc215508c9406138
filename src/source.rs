//! Line-oriented text sources feeding the reader.
//!
//! The reader only ever asks one question of its input: "give me the next
//! line of text, or tell me none remain". Anything line-oriented satisfies
//! that — a file, an in-memory string, a network buffer. Sources yield
//! decoded text with the line terminator already stripped.

use std::io::BufRead;

use simdutf8::basic::from_utf8;

use crate::error::{ReaderError, Result};

/// A source of decoded text lines.
///
/// Implementors yield one line at a time, without its terminator, and
/// `Ok(None)` once the input is exhausted. Exhaustion is expected to be
/// permanent: after the first `Ok(None)`, every later call returns
/// `Ok(None)` as well.
pub trait LineSource {
    /// Return the next line, or `None` when no lines remain.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// A [`LineSource`] over any buffered byte reader.
///
/// Reads raw bytes up to each `\n`, strips `\n` and `\r\n` terminators,
/// strips a UTF-8 BOM from the first line, and validates every line with
/// SIMD-accelerated UTF-8 checking.
///
/// # Example
///
/// ```
/// use csv_chew::{IoSource, LineSource};
/// use std::io::Cursor;
///
/// let mut source = IoSource::new(Cursor::new("a,b\r\nc,d"));
/// assert_eq!(source.next_line().unwrap(), Some("a,b".to_string()));
/// assert_eq!(source.next_line().unwrap(), Some("c,d".to_string()));
/// assert_eq!(source.next_line().unwrap(), None);
/// ```
pub struct IoSource<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    lines_read: usize,
}

/// The UTF-8 BOM byte sequence: EF BB BF.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

impl<R: BufRead> IoSource<R> {
    /// Create a new source over a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(1024),
            lines_read: 0,
        }
    }
}

impl<R: BufRead> LineSource for IoSource<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        // Strip the terminator: \n, or \r\n as a pair.
        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }

        let mut bytes: &[u8] = &self.buffer;
        if self.lines_read == 0 && bytes.starts_with(&UTF8_BOM) {
            bytes = &bytes[UTF8_BOM.len()..];
        }
        self.lines_read += 1;

        let line = from_utf8(bytes).map_err(|_| ReaderError::InvalidUtf8 {
            line: self.lines_read,
        })?;
        Ok(Some(line.to_owned()))
    }
}
