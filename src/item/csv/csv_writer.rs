use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::Write,
    path::Path,
};

use log::{debug, error};

use crate::{core::item::ItemWriter, error::CsvResult};

use super::{
    Record,
    constants::{CR, DEFAULT_QUOTE, DEFAULT_QUOTE_LIMIT, DEFAULT_SEPARATOR, LF, RECORD_TERMINATOR},
    format::CsvFormat,
};

/// A CSV writer that accepts a field, a record or a whole document at a time.
///
/// Fields are separated by the configured separator and records by CR LF.
/// No terminator follows the last record. A field is quoted when its length
/// in characters reaches the quote limit, or when it contains the separator,
/// the quote, CR or LF; quotes inside a quoted field are doubled. Empty
/// fields are written as nothing at all.
///
/// Bytes go straight to the sink, which is flushed once the outermost
/// `write_*` call returns. The writer keeps no output of its own: wrap the
/// sink in a `BufWriter` to batch small writes.
///
/// # Errors
///
/// Field and record counters only move once their bytes were accepted by the
/// sink, so a call that failed before writing anything can be retried as is.
/// A call that failed half way through a record leaves that record partially
/// written.
///
/// # Examples
///
/// ```
/// use csv_stream::item::csv::csv_writer::CsvItemWriterBuilder;
///
/// let writer = CsvItemWriterBuilder::new().from_writer(vec![]);
///
/// writer.write_record(&["AAAA", "BBBB", "CCCC"]).unwrap();
/// writer.write_record(&["with,comma", "with \"quote\""]).unwrap();
///
/// let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "AAAA,BBBB,CCCC\r\n\"with,comma\",\"with \"\"quote\"\"\"");
/// ```
pub struct CsvItemWriter<W: Write> {
    stream: RefCell<W>,
    separator: u8,
    quote: u8,
    quote_limit: usize,
    /// Fields written on the current line
    field_count: Cell<usize>,
    /// Records written so far
    record_count: Cell<usize>,
    /// Depth of nested `write_*` calls; the stream is flushed at zero
    depth: Cell<usize>,
}

impl<W: Write> CsvItemWriter<W> {
    /// Writes one field, preceded by a separator unless it is the first
    /// field of the line.
    pub fn write_field(&self, field: &str) -> CsvResult<()> {
        self.nested(|| {
            if self.field_count.get() > 0 {
                self.emit(&[self.separator])?;
            }
            self.write_escaped(field)?;

            self.field_count.set(self.field_count.get() + 1);
            Ok(())
        })
    }

    /// Writes one record, preceded by CR LF unless it is the first record.
    ///
    /// A record without fields writes nothing, not even a line terminator.
    pub fn write_record<S: AsRef<str>>(&self, record: &[S]) -> CsvResult<()> {
        self.nested(|| {
            if record.is_empty() {
                return Ok(());
            }

            // A terminator already written for a record that then failed is
            // not written twice.
            if self.record_count.get() > 0 && self.field_count.get() > 0 {
                self.emit(RECORD_TERMINATOR)?;
                self.field_count.set(0);
            }

            for field in record {
                self.write_field(field.as_ref())?;
            }

            self.record_count.set(self.record_count.get() + 1);
            Ok(())
        })
    }

    /// Writes every record in order.
    ///
    /// Reading the output back gives the same records, except when the last
    /// record is a single empty field: it writes nothing after the final
    /// terminator, and a stream ending on a terminator holds no further
    /// record. `[["a"], [""]]` is written as `a\r\n` and read back as
    /// `[["a"]]`. Likewise an empty document and `[[""]]` are both written
    /// as nothing, which reads back as `[[""]]`.
    pub fn write_all<S, T>(&self, records: &[T]) -> CsvResult<()>
    where
        S: AsRef<str>,
        T: AsRef<[S]>,
    {
        self.nested(|| {
            for record in records {
                self.write_record(record.as_ref())?;
            }
            Ok(())
        })
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(self) -> CsvResult<W> {
        let mut stream = self.stream.into_inner();
        stream.flush()?;
        Ok(stream)
    }

    /// Number of records written so far.
    pub fn record_count(&self) -> usize {
        self.record_count.get()
    }

    /// Runs `operation` one level deeper and flushes once back at the top.
    fn nested<F>(&self, operation: F) -> CsvResult<()>
    where
        F: FnOnce() -> CsvResult<()>,
    {
        self.depth.set(self.depth.get() + 1);
        let result = operation();
        self.depth.set(self.depth.get() - 1);
        result?;

        if self.depth.get() == 0 {
            self.stream.borrow_mut().flush()?;
        }
        Ok(())
    }

    fn emit(&self, bytes: &[u8]) -> CsvResult<()> {
        self.stream.borrow_mut().write_all(bytes)?;
        Ok(())
    }

    fn needs_quotes(&self, field: &str) -> bool {
        // A character takes at least one byte: only long fields are counted.
        (field.len() >= self.quote_limit && field.chars().count() >= self.quote_limit)
            || field
                .bytes()
                .any(|b| b == self.separator || b == self.quote || b == CR || b == LF)
    }

    fn write_escaped(&self, field: &str) -> CsvResult<()> {
        if field.is_empty() {
            return Ok(());
        }
        if !self.needs_quotes(field) {
            return self.emit(field.as_bytes());
        }

        let quote = [self.quote];
        let mut stream = self.stream.borrow_mut();

        stream.write_all(&quote)?;
        for chunk in field.as_bytes().split_inclusive(|&b| b == self.quote) {
            stream.write_all(chunk)?;
            if chunk.last() == Some(&self.quote) {
                stream.write_all(&quote)?;
            }
        }
        stream.write_all(&quote)?;

        Ok(())
    }
}

impl<W: Write> ItemWriter<Record> for CsvItemWriter<W> {
    /// Writes a chunk of records. See [`CsvItemWriter::write_all`].
    fn write(&self, items: &[Record]) -> CsvResult<()> {
        self.write_all(items)
    }

    /// Flushes the underlying writer.
    fn flush(&self) -> CsvResult<()> {
        self.stream.borrow_mut().flush()?;
        Ok(())
    }
}

/// A builder for configuring CSV item writing.
///
/// # Default Configuration
///
/// - Separator: comma (,)
/// - Quote: double quote (")
/// - Quote limit: 1000 characters
pub struct CsvItemWriterBuilder {
    separator: u8,
    quote: u8,
    quote_limit: usize,
}

impl Default for CsvItemWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemWriterBuilder {
    pub fn new() -> CsvItemWriterBuilder {
        CsvItemWriterBuilder {
            separator: DEFAULT_SEPARATOR,
            quote: DEFAULT_QUOTE,
            quote_limit: DEFAULT_QUOTE_LIMIT,
        }
    }

    pub fn separator(mut self, separator: u8) -> CsvItemWriterBuilder {
        self.separator = separator;
        self
    }

    pub fn quote(mut self, quote: u8) -> CsvItemWriterBuilder {
        self.quote = quote;
        self
    }

    /// Sets the length, in characters, from which fields are quoted without
    /// being scanned. Zero quotes every non-empty field.
    pub fn quote_limit(mut self, quote_limit: usize) -> CsvItemWriterBuilder {
        self.quote_limit = quote_limit;
        self
    }

    pub fn format(self, format: &CsvFormat) -> CsvItemWriterBuilder {
        self.separator(format.separator)
            .quote(format.quote)
            .quote_limit(format.quote_limit)
    }

    /// Creates or truncates the file at `path` and writes to it.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> CsvResult<CsvItemWriter<File>> {
        let path = path.as_ref();
        let file = File::create(path).inspect_err(|e| {
            error!("Failed to create CSV file {}: {}", path.display(), e);
        })?;

        Ok(self.from_writer(file))
    }

    pub fn from_writer<W: Write>(self, wtr: W) -> CsvItemWriter<W> {
        let format = CsvFormat {
            separator: self.separator,
            quote: self.quote,
            quote_limit: self.quote_limit,
        };
        format.warn_if_ambiguous();

        debug!(
            "CSV writer built with separator '{}', quote '{}' and quote limit {}",
            self.separator.escape_ascii(),
            self.quote.escape_ascii(),
            self.quote_limit
        );

        CsvItemWriter {
            stream: RefCell::new(wtr),
            separator: self.separator,
            quote: self.quote,
            quote_limit: self.quote_limit,
            field_count: Cell::new(0),
            record_count: Cell::new(0),
            depth: Cell::new(0),
        }
    }
}
