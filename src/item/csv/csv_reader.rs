use std::{cell::RefCell, collections::VecDeque, fs::File, io::Read, mem, path::Path};

use log::{debug, error, trace};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::{CsvError, CsvResult},
};

use super::{
    Document, Field, Record,
    automaton::{Action, Match, State, Transition},
    constants::{CR, DEFAULT_QUOTE, DEFAULT_SEPARATOR, LF},
    format::CsvFormat,
    lookahead::Lookahead,
};

/// Default capacity of the read buffer, in bytes.
const DEFAULT_CAPACITY: usize = 8 * 1024;

/// A CSV reader that can stop after a field, a record or the whole stream.
///
/// The reader drives the automaton of the [`automaton`](super::automaton)
/// module over its byte source, one byte at a time, and stops as soon as the
/// requested boundary is reached. Calls to [`read_field`](Self::read_field),
/// [`read_record`](Self::read_record) and [`read_all`](Self::read_all) can be
/// freely interleaved: each one resumes exactly where the previous one
/// stopped.
///
/// Reading is destructive. A field or record handed to the caller is gone
/// from the reader: once the first field of a record has been read with
/// `read_field`, `read_record` only returns the remaining fields.
///
/// # Type Parameters
///
/// - `R`: The type of reader providing the CSV data. Must implement `Read`.
///
/// # Implementation Details
///
/// - Uses a `RefCell` so that reads only need a shared reference, as
///   required by the `ItemReader` trait. The reader is therefore not `Sync`.
/// - Pending fields and records are kept in explicit queues and moved out to
///   the caller.
/// - After a [`CsvError::Parse`] or [`CsvError::Encoding`] error the reader is
///   in an indeterminate state and must be discarded.
///
/// # Examples
///
/// ```
/// use csv_stream::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// let data = "aaa,bbb,ccc\r\nxxx,yyy,zzz";
///
/// let reader = CsvItemReaderBuilder::new().from_reader(data.as_bytes());
///
/// assert_eq!(reader.read_field().unwrap(), Some("aaa".to_string()));
/// assert_eq!(
///     reader.read_record().unwrap(),
///     Some(vec!["bbb".to_string(), "ccc".to_string()])
/// );
/// assert_eq!(
///     reader.read_all().unwrap(),
///     vec![vec!["xxx".to_string(), "yyy".to_string(), "zzz".to_string()]]
/// );
/// assert!(reader.read_all().unwrap().is_empty());
/// ```
pub struct CsvItemReader<R> {
    parser: RefCell<Parser<R>>,
}

impl<R: Read> CsvItemReader<R> {
    /// Reads the next field of the current record.
    ///
    /// Returns `Ok(None)` once after the last field of each record, then
    /// continues with the first field of the next record. After the end of
    /// the stream it always returns `Ok(None)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_stream::item::csv::csv_reader::CsvItemReaderBuilder;
    ///
    /// let reader = CsvItemReaderBuilder::new().from_reader("a,b\r\nc".as_bytes());
    ///
    /// assert_eq!(reader.read_field().unwrap().as_deref(), Some("a"));
    /// assert_eq!(reader.read_field().unwrap().as_deref(), Some("b"));
    /// assert_eq!(reader.read_field().unwrap(), None);
    /// assert_eq!(reader.read_field().unwrap().as_deref(), Some("c"));
    /// assert_eq!(reader.read_field().unwrap(), None);
    /// assert_eq!(reader.read_field().unwrap(), None);
    /// ```
    pub fn read_field(&self) -> CsvResult<Option<Field>> {
        self.parser.borrow_mut().read_field()
    }

    /// Reads the rest of the current record.
    ///
    /// Returns `Ok(None)` after the end of the stream. If `read_field` has
    /// already consumed every field of the current record, the remainder is
    /// an empty record.
    pub fn read_record(&self) -> CsvResult<Option<Record>> {
        self.parser.borrow_mut().read_record()
    }

    /// Reads every remaining record.
    ///
    /// Calling it again after the end of the stream returns an empty
    /// document.
    ///
    /// A stream ending right after a line terminator holds no further
    /// record: `a\r\n` reads as `[["a"]]`, not `[["a"], [""]]`. A document
    /// whose last record is a single empty field therefore does not survive
    /// a write/read round trip.
    pub fn read_all(&self) -> CsvResult<Document> {
        self.parser.borrow_mut().read_all()
    }

    /// Number of bytes consumed from the source so far.
    pub fn position(&self) -> u64 {
        self.parser.borrow().source.offset()
    }
}

impl<R: Read> ItemReader<Record> for CsvItemReader<R> {
    /// Reads the next record. See [`CsvItemReader::read_record`].
    fn read(&self) -> ItemReaderResult<Record> {
        self.read_record()
    }
}

/// The automaton driver and its pending queues.
struct Parser<R> {
    source: Lookahead<R>,
    separator: u8,
    quote: u8,
    state: State,
    /// Field being built.
    field: Vec<u8>,
    pending_fields: VecDeque<Field>,
    pending_records: VecDeque<Record>,
    /// LF of the CR LF pair matched last, if any.
    line_feed_tail: Option<u8>,
    /// `read_field` returned the last field of a record whose end has not
    /// been reported yet.
    record_tail: bool,
}

impl<R: Read> Parser<R> {
    fn read_field(&mut self) -> CsvResult<Option<Field>> {
        if self.record_tail {
            self.record_tail = false;
            return Ok(None);
        }
        if self.state == State::EndFile {
            return Ok(None);
        }

        self.parse(State::EndField)?;

        if self.state.is_record_end() {
            // The field closed its record: hand it out of the saved record.
            return match self.pending_records.pop_back() {
                Some(record) => {
                    self.record_tail = true;
                    Ok(record.into_iter().next())
                }
                None => Ok(None),
            };
        }

        Ok(self.pending_fields.pop_front())
    }

    fn read_record(&mut self) -> CsvResult<Option<Record>> {
        if self.record_tail {
            self.record_tail = false;
            return Ok(Some(Vec::new()));
        }
        if self.state == State::EndFile {
            return Ok(None);
        }

        self.parse(State::EndLine)?;

        Ok(self.pending_records.pop_front())
    }

    fn read_all(&mut self) -> CsvResult<Document> {
        self.record_tail = false;

        if self.state != State::EndFile {
            self.parse(State::EndFile)?;
        }

        Ok(self.pending_records.drain(..).collect())
    }

    /// Runs the automaton until its state reaches or passes `until`.
    ///
    /// At least one transition is always taken, so a reader resting on a
    /// boundary moves on to the next one.
    fn parse(&mut self, until: State) -> CsvResult<()> {
        let mut lambda = false;
        let mut current = None;

        loop {
            if !lambda {
                current = self.source.next()?;
            }

            let transition = self.select(current)?;
            trace!(
                "{} --{:?}--> {} ({:?})",
                self.state, transition.on, transition.next, transition.action
            );

            lambda = transition.on == Match::None;
            self.apply(transition.action, current)?;
            self.state = transition.next;

            if self.state >= until {
                break;
            }
        }

        if self.state == State::EndFile {
            debug!("End of CSV stream after {} bytes", self.source.offset());
        }
        Ok(())
    }

    fn select(&mut self, current: Option<u8>) -> CsvResult<Transition> {
        for transition in self.state.transitions() {
            if self.matches(transition.on, current)? {
                return Ok(*transition);
            }
        }

        let offset = self.source.offset() - u64::from(current.is_some());
        error!(
            "No transition from state {} on {:?} at byte {}",
            self.state, current, offset
        );
        Err(CsvError::Parse {
            state: self.state,
            character: current,
            offset,
        })
    }

    fn matches(&mut self, on: Match, current: Option<u8>) -> CsvResult<bool> {
        let matched = match on {
            Match::None => true,
            Match::Eof => current.is_none(),
            Match::Separator => current == Some(self.separator),
            Match::Quote => current == Some(self.quote),
            Match::Any => current.is_some(),
            Match::LineFeed => match current {
                Some(CR) => {
                    self.line_feed_tail = None;
                    if self.source.peek()? == Some(LF) {
                        self.line_feed_tail = self.source.next()?;
                    }
                    true
                }
                Some(LF) => {
                    self.line_feed_tail = None;
                    true
                }
                _ => false,
            },
        };
        Ok(matched)
    }

    fn apply(&mut self, action: Action, current: Option<u8>) -> CsvResult<()> {
        match action {
            Action::None => {}
            Action::SaveField => self.save_field()?,
            Action::SaveLine => {
                self.save_field()?;
                let record: Record = self.pending_fields.drain(..).collect();
                self.pending_records.push_back(record);
            }
            Action::AppendToField => self.field.extend(current),
            Action::AppendLineFeedToField => {
                self.field.extend(current);
                self.field.extend(self.line_feed_tail.take());
            }
        }
        Ok(())
    }

    fn save_field(&mut self) -> CsvResult<()> {
        let bytes = mem::take(&mut self.field);
        let field = String::from_utf8(bytes).map_err(|source| CsvError::Encoding {
            offset: self.source.offset(),
            source,
        })?;
        self.pending_fields.push_back(field);
        Ok(())
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Separator: comma (,)
/// - Quote: double quote (")
/// - Buffer capacity: 8 KiB
///
/// # Examples
///
/// ```
/// use csv_stream::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// let reader = CsvItemReaderBuilder::new()
///     .separator(b'|')
///     .quote(b'*')
///     .from_reader("*a|b*|c".as_bytes());
///
/// assert_eq!(
///     reader.read_all().unwrap(),
///     vec![vec!["a|b".to_string(), "c".to_string()]]
/// );
/// ```
pub struct CsvItemReaderBuilder {
    /// The field separator (default: comma ',')
    separator: u8,
    /// The quote character (default: '"')
    quote: u8,
    /// Capacity of the read buffer in bytes
    capacity: usize,
}

impl Default for CsvItemReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemReaderBuilder {
    /// Creates a new `CsvItemReaderBuilder` with default configuration.
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            quote: DEFAULT_QUOTE,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Sets the field separator.
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the quote character.
    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Sets the capacity of the read buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Applies the separator and the quote of a [`CsvFormat`].
    pub fn format(self, format: &CsvFormat) -> Self {
        self.separator(format.separator).quote(format.quote)
    }

    /// Creates a `CsvItemReader` over any source implementing `Read`.
    ///
    /// The reader does not take ownership of anything but `rdr`: pass
    /// `&mut file` or `&[u8]` to keep the source with the caller.
    pub fn from_reader<R: Read>(self, rdr: R) -> CsvItemReader<R> {
        let format = CsvFormat {
            separator: self.separator,
            quote: self.quote,
            ..CsvFormat::default()
        };
        format.warn_if_ambiguous();

        debug!(
            "CSV reader built with separator '{}' and quote '{}'",
            self.separator.escape_ascii(),
            self.quote.escape_ascii()
        );

        CsvItemReader {
            parser: RefCell::new(Parser {
                source: Lookahead::with_capacity(self.capacity, rdr),
                separator: self.separator,
                quote: self.quote,
                state: State::Start,
                field: Vec::new(),
                pending_fields: VecDeque::new(),
                pending_records: VecDeque::new(),
                line_feed_tail: None,
                record_tail: false,
            }),
        }
    }

    /// Creates a `CsvItemReader` from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Io`] if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> CsvResult<CsvItemReader<File>> {
        let path = path.as_ref();
        let file = File::open(path).inspect_err(|e| {
            error!("Failed to open CSV file {}: {}", path.display(), e);
        })?;

        Ok(self.from_reader(file))
    }
}
