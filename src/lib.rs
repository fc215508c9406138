//! csv-chew: a streaming CSV record reader
//!
//! A dialect-configurable, forward-only CSV parser: it turns any
//! line-oriented text source into a sequence of records (each a sequence of
//! string values), handling quoting, doubled-quote escapes, quoted values
//! that span multiple lines, configurable delimiter and comment-marker
//! sets, and optional whitespace trimming.
//!
//! # Quick Start
//!
//! ```
//! use csv_chew::Reader;
//!
//! let mut reader = Reader::from_string("name,city\nAlice,\"New York, NY\"\n");
//!
//! while let Some(record) = reader.read_record().unwrap() {
//!     println!("{:?}", record);
//! }
//! ```
//!
//! # Dialect configuration
//!
//! Delimiters, comment markers and trimming are per-reader settings and may
//! be changed between records:
//!
//! ```
//! use csv_chew::Reader;
//!
//! let mut reader = Reader::from_string("# exported 2024-01-01\na ; b\n");
//! reader.set_delimiters(&[';']).unwrap();
//! reader.set_comment_chars(&['#']).unwrap();
//! reader.trim_values(true);
//!
//! let record = reader.read_record().unwrap().unwrap();
//! assert_eq!(record, vec!["a", "b"]);
//! ```
//!
//! # Edge-case policy
//!
//! No CSV standard pins down the hard cases, so this crate does:
//!
//! - A record with N delimiters yields exactly N+1 values; consecutive or
//!   trailing delimiters produce empty strings. Records need not share a
//!   value count.
//! - Blank, whitespace-only and comment lines between records are skipped
//!   and never produce empty records. Comment markers count only as the raw
//!   first character of a physical line.
//! - Inside a quoted value, line breaks, blank lines and comment-like lines
//!   are literal content, joined with `'\n'`.
//! - A bare quote inside an unquoted value, text after a closed quote, and
//!   an unterminated quote are hard errors carrying 1-based line/column
//!   positions; malformed input is never silently patched up.

mod cursor;
mod dialect;
mod error;
mod reader;
mod source;

pub use dialect::Dialect;
pub use error::{ReaderError, Result};
pub use reader::{Reader, Records};
pub use source::{IoSource, LineSource};
