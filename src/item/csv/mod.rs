/// CSV support for reading and writing tabular text.
///
/// # Module Architecture
///
/// 1. **automaton**: the grammar, as a table of states and ordered
///    transitions. It is plain data and can be inspected and tested on its own.
///
/// 2. **CsvItemReader**: drives the automaton over a byte source with one byte
///    of lookahead. It can stop after a field, after a record or at the end of
///    the stream, and resumes exactly where it stopped.
///
/// 3. **CsvItemWriter**: serializes fields and records, quoting and escaping
///    fields when needed.
///
/// 4. **CsvDocument**: loads and saves whole files.
///
/// Readers and writers follow the builder pattern and share a [`CsvFormat`]
/// describing the separator, the quote and the quote limit.
///
/// # Ownership and Borrowing Considerations
///
/// Readers and writers wrap a byte stream but never close it themselves:
/// - Pass `&mut file` or a slice to keep the stream with the caller.
/// - Writers borrow their destination until dropped or until
///   [`into_inner`](csv_writer::CsvItemWriter::into_inner) is called.
///
/// # Format
///
/// - Records are separated by CR LF on output; CR LF, CR and LF are all
///   accepted on input.
/// - A field is quoted on output when it reaches the quote limit or contains
///   the separator, the quote, CR or LF. Quotes inside are doubled.
/// - On input, quoted fields may contain separators, doubled quotes and real
///   line breaks, which are kept byte for byte.
/// - An empty input is one record holding one empty field.
///
/// # Examples
///
/// ## Reading
///
/// ```
/// use csv_stream::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// let data = "\"2lines, 2 fields, With, commas\",\"With \"\"Quotes\"\"\"";
///
/// let reader = CsvItemReaderBuilder::new().from_reader(data.as_bytes());
///
/// assert_eq!(
///     reader.read_all().unwrap(),
///     vec![vec![
///         "2lines, 2 fields, With, commas".to_string(),
///         "With \"Quotes\"".to_string(),
///     ]]
/// );
/// ```
///
/// ## Writing
///
/// ```
/// use csv_stream::item::csv::csv_writer::CsvItemWriterBuilder;
///
/// let mut buffer = Vec::new();
/// {
///     let writer = CsvItemWriterBuilder::new().from_writer(&mut buffer);
///
///     writer
///         .write_all(&[vec!["name", "age"], vec!["Alice", "28"]])
///         .unwrap();
/// } // writer is dropped here, releasing the borrow
///
/// assert_eq!(String::from_utf8(buffer).unwrap(), "name,age\r\nAlice,28");
/// ```
pub mod automaton;

/// Default separator, quote and quote limit.
pub mod constants;

/// Loading and saving whole files.
pub mod document;

/// The shared reader/writer configuration.
pub mod format;

/// A byte source with one byte of lookahead.
pub mod lookahead;

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;

pub use format::CsvFormat;

/// A single value of a record. Possibly empty.
pub type Field = String;

/// The fields of one line, or of several lines when quoted fields hold line
/// breaks.
pub type Record = Vec<Field>;

/// Every record of a stream.
pub type Document = Vec<Record>;
