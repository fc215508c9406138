//! Streaming record reader: the value and record grammar.
//!
//! One [`read_record`](Reader::read_record) call skips blank and comment
//! lines, then pulls values off the current line one at a time until the
//! line is exhausted. Quoted values may continue across physical lines;
//! everything else stays within one line.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::cursor::LineCursor;
use crate::dialect::Dialect;
use crate::error::{ReaderError, Result};
use crate::source::{IoSource, LineSource};

/// Streaming CSV record reader.
///
/// Yields one record (a `Vec<String>` of values) per call to
/// [`read_record`](Self::read_record), reading lines on demand from a
/// [`LineSource`]. Delimiters, comment markers and trimming are configured
/// per instance and may be changed between records.
///
/// # Example
///
/// ```
/// use csv_chew::Reader;
///
/// let mut reader = Reader::from_string("a,b\n\"c,d\",e\n");
///
/// let record = reader.read_record().unwrap().unwrap();
/// assert_eq!(record, vec!["a", "b"]);
///
/// let record = reader.read_record().unwrap().unwrap();
/// assert_eq!(record, vec!["c,d", "e"]);
///
/// assert!(reader.read_record().unwrap().is_none());
/// ```
pub struct Reader<S: LineSource> {
    cursor: LineCursor<S>,
    dialect: Dialect,
}

impl Reader<IoSource<BufReader<File>>> {
    /// Open a CSV file at the given path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> Reader<IoSource<R>> {
    /// Read CSV data from any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self::from_source(IoSource::new(reader))
    }
}

impl Reader<IoSource<io::Cursor<String>>> {
    /// Read CSV data from an in-memory string.
    pub fn from_string(data: impl Into<String>) -> Self {
        Self::from_reader(io::Cursor::new(data.into()))
    }
}

impl<S: LineSource> Reader<S> {
    /// Read CSV data from a custom [`LineSource`], with the default dialect.
    pub fn from_source(source: S) -> Self {
        Self {
            cursor: LineCursor::new(source),
            dialect: Dialect::default(),
        }
    }

    /// Read CSV data from a custom [`LineSource`] with a prebuilt dialect.
    pub fn with_dialect(source: S, dialect: Dialect) -> Result<Self> {
        dialect.validate()?;
        Ok(Self {
            cursor: LineCursor::new(source),
            dialect,
        })
    }

    /// The active dialect.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Replace the delimiter set.
    ///
    /// The set must contain at least one character and must not contain
    /// the quote character.
    pub fn set_delimiters(&mut self, delimiters: &[char]) -> Result<&mut Self> {
        let candidate = Dialect {
            delimiters: delimiters.to_vec(),
            ..self.dialect.clone()
        };
        candidate.validate()?;
        self.dialect = candidate;
        Ok(self)
    }

    /// Replace the comment-marker set. An empty set disables comment-line
    /// skipping.
    pub fn set_comment_chars(&mut self, comment_chars: &[char]) -> Result<&mut Self> {
        let candidate = Dialect {
            comment_chars: comment_chars.to_vec(),
            ..self.dialect.clone()
        };
        candidate.validate()?;
        self.dialect = candidate;
        Ok(self)
    }

    /// Trim whitespace from values found inside quotes.
    pub fn trim_quoted_values(&mut self, trim: bool) -> &mut Self {
        self.dialect.trim_quoted = trim;
        self
    }

    /// Trim whitespace from values found outside quotes.
    pub fn trim_unquoted_values(&mut self, trim: bool) -> &mut Self {
        self.dialect.trim_unquoted = trim;
        self
    }

    /// Trim whitespace from both quoted and unquoted values.
    pub fn trim_values(&mut self, trim: bool) -> &mut Self {
        self.dialect.trim_quoted = trim;
        self.dialect.trim_unquoted = trim;
        self
    }

    /// Read the next record.
    ///
    /// Returns `Ok(Some(values))` for the next record, `Ok(None)` once the
    /// source is exhausted (and on every call thereafter), or an error for
    /// malformed input. A record with N delimiters yields exactly N+1
    /// values; consecutive or trailing delimiters produce empty strings.
    ///
    /// Parse errors are fatal to the record being read: the cursor is left
    /// where the failure occurred and the result of further calls is
    /// unspecified.
    pub fn read_record(&mut self) -> Result<Option<Vec<String>>> {
        if !self.advance_to_record()? {
            return Ok(None);
        }
        let mut values = Vec::new();
        loop {
            values.push(self.parse_value()?);
            if self.cursor.end_of_line() {
                return Ok(Some(values));
            }
            // parse_value only ever stops short of end-of-line on a
            // delimiter.
            self.cursor.consume_char();
        }
    }

    /// Iterate over the remaining records.
    ///
    /// The iterator ends at end-of-data; an error is yielded as the last
    /// item before the iterator stops being useful.
    pub fn records(&mut self) -> Records<'_, S> {
        Records { reader: self }
    }

    /// Advance past blank, whitespace-only and comment lines to the next
    /// line holding record data. Returns false at end-of-data.
    fn advance_to_record(&mut self) -> Result<bool> {
        loop {
            self.cursor.advance_line()?;
            if self.cursor.end_of_data() {
                return Ok(false);
            }
            if self.is_skippable_line() {
                self.cursor.consume_rest();
                continue;
            }
            return Ok(true);
        }
    }

    /// A line is skippable when it is empty, all whitespace, or its raw
    /// first character is a comment marker. Trimming plays no part in
    /// comment detection.
    fn is_skippable_line(&self) -> bool {
        match self.cursor.line() {
            Some(line) => {
                line.first().is_some_and(|&c| self.dialect.is_comment(c))
                    || line.iter().all(|c| c.is_whitespace())
            }
            None => false,
        }
    }

    /// Extract one value starting at the current column.
    ///
    /// Leaves the cursor at end-of-line or on the delimiter following the
    /// value.
    fn parse_value(&mut self) -> Result<String> {
        let start = self.cursor.column();
        let dialect = &self.dialect;
        self.cursor
            .consume_while(|c| dialect.is_skippable_whitespace(c));
        if self.cursor.end_of_line() {
            // Trailing delimiter or fully blank tail: an empty value.
            return Ok(String::new());
        }
        if self.cursor.current_char() == Dialect::QUOTE {
            self.parse_quoted_value()
        } else {
            self.parse_unquoted_value(start)
        }
    }

    /// An unquoted value: everything up to the next delimiter or end of
    /// line. A quote character anywhere in the span is an error.
    ///
    /// `start` is the column where the value began, before leading
    /// whitespace was skipped; with trimming off the value is reproduced
    /// verbatim from there.
    fn parse_unquoted_value(&mut self, start: usize) -> Result<String> {
        let content_start = self.cursor.column();
        let dialect = &self.dialect;
        self.cursor.consume_while(|c| !dialect.is_delimiter(c));

        let raw = self.cursor.extract_since(content_start);
        // Trailing whitespace is not part of the span for the quote check.
        let core = raw.trim_end();
        if let Some(offset) = core.chars().position(|c| c == Dialect::QUOTE) {
            let (line, _) = self.cursor.position();
            return Err(ReaderError::QuoteInUnquotedValue {
                line,
                column: content_start + offset + 1,
            });
        }

        if self.dialect.trim_unquoted {
            Ok(core.trim_start().to_string())
        } else {
            Ok(self.cursor.extract_since(start))
        }
    }

    /// A quoted value, possibly spanning several physical lines. Doubled
    /// quotes are literal quote characters; lines are joined with `'\n'`.
    fn parse_quoted_value(&mut self) -> Result<String> {
        let (open_line, open_column) = self.cursor.position();
        let mut literal = String::new();
        let mut span_start = self.cursor.column();
        self.cursor.consume_char();

        loop {
            self.cursor.consume_while(|c| c != Dialect::QUOTE);
            if self.cursor.end_of_line() {
                // No closing quote on this line: the value continues on the
                // next one. Blank and comment-like lines are literal
                // content here, never record separators.
                literal.push_str(&self.cursor.extract_since(span_start));
                literal.push('\n');
                self.cursor.advance_line()?;
                if self.cursor.end_of_data() {
                    return Err(ReaderError::QuoteStartWithoutEnd {
                        line: open_line,
                        column: open_column,
                    });
                }
                span_start = 0;
                continue;
            }
            self.cursor.consume_char();
            if !self.cursor.end_of_line() && self.cursor.current_char() == Dialect::QUOTE {
                // Doubled quote: a literal quote character.
                self.cursor.consume_char();
                continue;
            }
            // Closing quote.
            literal.push_str(&self.cursor.extract_since(span_start));
            break;
        }

        // Whitespace may trail the closing quote; anything else before the
        // next delimiter or end of line is an error.
        let dialect = &self.dialect;
        self.cursor
            .consume_while(|c| dialect.is_skippable_whitespace(c));
        if !self.cursor.end_of_line() && !self.dialect.is_delimiter(self.cursor.current_char()) {
            let (line, column) = self.cursor.position();
            return Err(ReaderError::TextAfterQuotedValue { line, column });
        }

        let value = unescape_quoted(&literal);
        if self.dialect.trim_quoted {
            Ok(value.trim().to_string())
        } else {
            Ok(value)
        }
    }
}

/// Strip the outer quote pair and collapse doubled quotes.
fn unescape_quoted(literal: &str) -> String {
    let mut inner = literal;
    inner = inner.strip_prefix(Dialect::QUOTE).unwrap_or(inner);
    inner = inner.strip_suffix(Dialect::QUOTE).unwrap_or(inner);
    inner.replace("\"\"", "\"")
}

/// Iterator over the records of a [`Reader`].
pub struct Records<'a, S: LineSource> {
    reader: &'a mut Reader<S>,
}

impl<S: LineSource> Iterator for Records<'_, S> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(data: &str) -> Vec<Vec<String>> {
        let mut reader = Reader::from_string(data);
        let mut records = Vec::new();
        while let Some(record) = reader.read_record().unwrap() {
            records.push(record);
        }
        records
    }

    #[test]
    fn test_simple_records() {
        let records = read_all("a,b,c\n1,2,3\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], vec!["a", "b", "c"]);
        assert_eq!(records[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_values_around_delimiters() {
        assert_eq!(read_all(",a\n"), vec![vec!["", "a"]]);
        assert_eq!(read_all("a,\n"), vec![vec!["a", ""]]);
        assert_eq!(read_all(",,\n"), vec![vec!["", "", ""]]);
    }

    #[test]
    fn test_single_value_record() {
        assert_eq!(read_all("hello\n"), vec![vec!["hello"]]);
    }

    #[test]
    fn test_internal_whitespace_untouched() {
        assert_eq!(read_all("a b\tc\n"), vec![vec!["a b\tc"]]);
    }

    #[test]
    fn test_unquoted_whitespace_preserved_by_default() {
        assert_eq!(read_all(" a ,\tb\t\n"), vec![vec![" a ", "\tb\t"]]);
    }

    #[test]
    fn test_trim_unquoted_values() {
        let mut reader = Reader::from_string(" a ,\tb\t\n");
        reader.trim_unquoted_values(true);
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_trim_values_sets_both_flags() {
        let mut reader = Reader::from_string(" a ,\" b \"\n");
        reader.trim_values(true);
        assert!(reader.dialect().trim_quoted);
        assert!(reader.dialect().trim_unquoted);
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_quoted_value_with_delimiter() {
        assert_eq!(read_all("\"a,b\"\n"), vec![vec!["a,b"]]);
    }

    #[test]
    fn test_doubled_quotes_are_literal() {
        assert_eq!(read_all("\"\"\"a\"\"b\"\"\"\n"), vec![vec!["\"a\"b\""]]);
        assert_eq!(read_all("\"\"\n"), vec![vec![""]]);
    }

    #[test]
    fn test_quoted_value_keeps_whitespace_by_default() {
        assert_eq!(read_all("\" a \"\n"), vec![vec![" a "]]);
    }

    #[test]
    fn test_trim_quoted_values() {
        let mut reader = Reader::from_string("\" a \"\n");
        reader.trim_quoted_values(true);
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_whitespace_around_quoted_value() {
        assert_eq!(read_all("  \"a\"  ,b\n"), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_multiline_quoted_value() {
        let records = read_all("\"one\ntwo\",x\n");
        assert_eq!(records, vec![vec!["one\ntwo".to_string(), "x".to_string()]]);
    }

    #[test]
    fn test_multiline_quoted_value_swallows_blank_and_comment_lines() {
        let mut reader = Reader::from_string("\"a\n\n#not a comment\nb\",c\n");
        reader.set_comment_chars(&['#']).unwrap();
        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(record, vec!["a\n\n#not a comment\nb", "c"]);
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_quote_in_unquoted_value() {
        let mut reader = Reader::from_string("x,a\"b\n");
        match reader.read_record() {
            Err(ReaderError::QuoteInUnquotedValue { line, column }) => {
                assert_eq!(line, 1);
                assert_eq!(column, 4);
            }
            other => panic!("expected QuoteInUnquotedValue, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_quote_in_unquoted_value() {
        let mut reader = Reader::from_string("a\"\n");
        assert!(matches!(
            reader.read_record(),
            Err(ReaderError::QuoteInUnquotedValue { line: 1, column: 2 })
        ));
    }

    #[test]
    fn test_text_after_quoted_value() {
        let mut reader = Reader::from_string("\"a\"x\n");
        match reader.read_record() {
            Err(ReaderError::TextAfterQuotedValue { line, column }) => {
                assert_eq!(line, 1);
                assert_eq!(column, 4);
            }
            other => panic!("expected TextAfterQuotedValue, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_after_quoted_value_tolerated() {
        assert_eq!(read_all("\"a\"  ,b\n"), vec![vec!["a", "b"]]);
        assert_eq!(read_all("\"a\"  \n"), vec![vec!["a"]]);
    }

    #[test]
    fn test_unterminated_quote_on_last_line() {
        let mut reader = Reader::from_string("x,\"a");
        match reader.read_record() {
            Err(ReaderError::QuoteStartWithoutEnd { line, column }) => {
                assert_eq!(line, 1);
                assert_eq!(column, 3);
            }
            other => panic!("expected QuoteStartWithoutEnd, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_quote_spanning_lines() {
        let mut reader = Reader::from_string("\"a\nb\nc");
        assert!(matches!(
            reader.read_record(),
            Err(ReaderError::QuoteStartWithoutEnd { line: 1, column: 1 })
        ));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let records = read_all("a\n\n   \n\t\nb\n");
        assert_eq!(records, vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn test_comment_lines_skipped() {
        let mut reader = Reader::from_string("# heading\na,b\n; note\nc,d\n");
        reader.set_comment_chars(&['#', ';']).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["a", "b"]);
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["c", "d"]);
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_comment_marker_only_at_raw_first_character() {
        let mut reader = Reader::from_string(" #data\n");
        reader.set_comment_chars(&['#']).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), vec![" #data"]);
    }

    #[test]
    fn test_comments_disabled_by_default() {
        assert_eq!(read_all("#a,b\n"), vec![vec!["#a", "b"]]);
    }

    #[test]
    fn test_source_of_only_comments_yields_no_records() {
        let mut reader = Reader::from_string("# one\n# two\n");
        reader.set_comment_chars(&['#']).unwrap();
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_end_of_data_is_idempotent() {
        let mut reader = Reader::from_string("a\n");
        assert!(reader.read_record().unwrap().is_some());
        assert!(reader.read_record().unwrap().is_none());
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_empty_source() {
        assert!(read_all("").is_empty());
    }

    #[test]
    fn test_custom_delimiters() {
        let mut reader = Reader::from_string("a:b;c\n");
        reader.set_delimiters(&[':', ';']).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tab_delimiter_not_skipped_as_whitespace() {
        let mut reader = Reader::from_string("a\tb\t\tc\n");
        reader.set_delimiters(&['\t']).unwrap();
        assert_eq!(
            reader.read_record().unwrap().unwrap(),
            vec!["a", "b", "", "c"]
        );
    }

    #[test]
    fn test_empty_delimiter_set_rejected() {
        let mut reader = Reader::from_string("a,b\n");
        assert!(matches!(
            reader.set_delimiters(&[]),
            Err(ReaderError::InvalidConfig(_))
        ));
        // The previous configuration stays in effect.
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_quote_character_rejected_in_configuration() {
        let mut reader = Reader::from_string("a,b\n");
        assert!(reader.set_delimiters(&['"']).is_err());
        assert!(reader.set_comment_chars(&['"']).is_err());
    }

    #[test]
    fn test_configuration_changes_between_records() {
        let mut reader = Reader::from_string("a,b\na;b\n");
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["a", "b"]);
        reader.set_delimiters(&[';']).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_records_differ_in_arity() {
        let records = read_all("a\nb,c,d\ne,f\n");
        assert_eq!(records[0].len(), 1);
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[2].len(), 2);
    }

    #[test]
    fn test_records_iterator() {
        let mut reader = Reader::from_string("a,b\nc,d\n");
        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_records_iterator_yields_error() {
        let mut reader = Reader::from_string("ok\nbad\"\n");
        let mut records = reader.records();
        assert!(records.next().unwrap().is_ok());
        assert!(records.next().unwrap().is_err());
    }

    #[test]
    fn test_with_dialect() {
        let dialect = Dialect {
            delimiters: vec!['|'],
            comment_chars: vec!['#'],
            trim_quoted: false,
            trim_unquoted: true,
        };
        let source = IoSource::new(io::Cursor::new("# c\n x | y \n".to_string()));
        let mut reader = Reader::with_dialect(source, dialect).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_with_dialect_validates() {
        let dialect = Dialect {
            delimiters: Vec::new(),
            ..Dialect::default()
        };
        let source = IoSource::new(io::Cursor::new(String::new()));
        assert!(Reader::with_dialect(source, dialect).is_err());
    }

    #[test]
    fn test_unicode_values_and_delimiters() {
        let mut reader = Reader::from_string("東京؛Москва\n");
        reader.set_delimiters(&['؛']).unwrap();
        assert_eq!(
            reader.read_record().unwrap().unwrap(),
            vec!["東京", "Москва"]
        );
    }

    #[test]
    fn test_unescape_quoted() {
        assert_eq!(unescape_quoted("\"a\""), "a");
        assert_eq!(unescape_quoted("\"a\"\"b\""), "a\"b");
        assert_eq!(unescape_quoted("\"\""), "");
    }
}
