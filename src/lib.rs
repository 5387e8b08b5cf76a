#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # CSV stream

 A streaming codec for comma separated values: a reader that turns raw bytes
 into fields and records, and a writer that turns records back into text with
 correct quoting.

 ## Core Concepts

- **Automaton:** The grammar is a table of states and ordered transitions. The
  reader feeds it one byte at a time and applies the action of the first
  matching transition.
- **CsvItemReader:** Reads a field, a record or the whole stream. Calls can be
  interleaved freely; each resumes exactly where the previous one stopped.
  Reading is destructive: what was returned once is not returned again.
- **CsvItemWriter:** Writes a field, a record or a whole document, quoting
  fields that contain the separator, the quote or a line break.
- **CsvFormat:** The separator, quote and quote limit shared by both sides.
- **Step:** Moves records from any `ItemReader` to any `ItemWriter` in chunks,
  for instance to convert a file from one format to another.

 ## Getting Started

```rust
use csv_stream::{
    error::CsvError,
    item::csv::{csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder},
};

fn main() -> Result<(), CsvError> {
    let csv = "year,make,model\r\n1948,Porsche,356\r\n1995,Peugeot,\"205, GTI\"";

    let reader = CsvItemReaderBuilder::new().from_reader(csv.as_bytes());

    let header = reader.read_record()?;
    assert_eq!(header, Some(vec!["year".into(), "make".into(), "model".into()]));

    let cars = reader.read_all()?;
    assert_eq!(cars.len(), 2);
    assert_eq!(cars[1][2], "205, GTI");

    let writer = CsvItemWriterBuilder::new()
        .separator(b';')
        .from_writer(vec![]);
    writer.write_all(&cars)?;

    let output = writer.into_inner()?;
    assert_eq!(output, b"1948;Porsche;356\r\n1995;Peugeot;205, GTI");

    Ok(())
}
```

 ## Logging

 The crate logs through the [`log`] facade and never installs a logger.
 Transitions of the automaton are logged at the `trace` level.

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Item traits and the chunk-oriented step
pub mod core;

/// Error types for reading and writing
pub mod error;

#[doc(inline)]
pub use error::*;

/// Readers and writers
pub mod item;
