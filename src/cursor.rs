//! Per-line scan state over a [`LineSource`].
//!
//! The cursor tracks a single current line and a column within it. It never
//! crosses a line boundary on its own; the reader decides when to advance,
//! which keeps the value grammar free of line bookkeeping.

use crate::error::Result;
use crate::source::LineSource;

/// A character cursor over the current line of a [`LineSource`].
///
/// Columns are zero-based character offsets and always stay within
/// `[0, line length]`. The cursor is at end-of-line when the column has
/// reached the line length or no line is loaded, and at end-of-data once
/// the source has reported exhaustion (which is permanent).
pub(crate) struct LineCursor<S: LineSource> {
    source: S,
    /// Current line as characters, or `None` before the first
    /// `advance_line` and after the source is exhausted.
    line: Option<Vec<char>>,
    /// Number of lines loaded so far; doubles as the 1-based number of the
    /// current line.
    lines_read: usize,
    column: usize,
    end_of_data: bool,
}

impl<S: LineSource> LineCursor<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            line: None,
            lines_read: 0,
            column: 0,
            end_of_data: false,
        }
    }

    /// Load the next line from the source and reset the column.
    ///
    /// Latches end-of-data once the source is exhausted; further calls are
    /// no-ops. Source errors (IO, invalid UTF-8) propagate.
    pub(crate) fn advance_line(&mut self) -> Result<()> {
        if self.end_of_data {
            return Ok(());
        }
        match self.source.next_line()? {
            Some(text) => {
                self.line = Some(text.chars().collect());
                self.lines_read += 1;
                self.column = 0;
            }
            None => {
                self.line = None;
                self.column = 0;
                self.end_of_data = true;
            }
        }
        Ok(())
    }

    /// The character at the current column.
    ///
    /// # Panics
    ///
    /// Panics when called at end-of-line. Callers must check
    /// [`end_of_line`](Self::end_of_line) first; this is a contract
    /// violation, not a recoverable condition.
    pub(crate) fn current_char(&self) -> char {
        match self.line.as_ref().and_then(|line| line.get(self.column)) {
            Some(&c) => c,
            None => panic!("current_char called at end of line"),
        }
    }

    /// Advance the column by one character; no-op at end-of-line.
    pub(crate) fn consume_char(&mut self) {
        if !self.end_of_line() {
            self.column += 1;
        }
    }

    /// Advance the column while `predicate` holds, stopping at end-of-line.
    pub(crate) fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while !self.end_of_line() && predicate(self.current_char()) {
            self.column += 1;
        }
    }

    /// Advance the column to end-of-line.
    pub(crate) fn consume_rest(&mut self) {
        if let Some(line) = &self.line {
            self.column = line.len();
        }
    }

    /// The current line's characters from `start` up to the current column.
    pub(crate) fn extract_since(&self, start: usize) -> String {
        match &self.line {
            Some(line) => line[start..self.column].iter().collect(),
            None => String::new(),
        }
    }

    /// True when the column is at or past the line end, or no line is loaded.
    pub(crate) fn end_of_line(&self) -> bool {
        match &self.line {
            Some(line) => self.column >= line.len(),
            None => true,
        }
    }

    /// True once the source has run out of lines.
    pub(crate) fn end_of_data(&self) -> bool {
        self.end_of_data
    }

    /// The current line, if one is loaded.
    pub(crate) fn line(&self) -> Option<&[char]> {
        self.line.as_deref()
    }

    /// Zero-based column within the current line.
    pub(crate) fn column(&self) -> usize {
        self.column
    }

    /// 1-based (line, column) of the cursor, for error construction.
    pub(crate) fn position(&self) -> (usize, usize) {
        (self.lines_read, self.column + 1)
    }
}
