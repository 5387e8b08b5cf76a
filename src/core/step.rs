use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error, info};

use crate::error::CsvError;

use super::{
    build_name,
    item::{ItemReader, ItemWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Ready,
    Started,
    Success,
    Error,
}

/// Outcome of a successful step run.
#[derive(Debug)]
pub struct StepExecution {
    pub name: String,
    pub status: StepStatus,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    /// Items read from the reader
    pub read_count: usize,
    /// Items handed to the writer
    pub write_count: usize,
}

/// Moves items from a reader to a writer, one chunk at a time.
///
/// Each chunk holds up to `chunk_size` items; it is written with a single
/// `write` call followed by a `flush`. The first read or write error stops the
/// step and is returned as is.
///
/// # Examples
///
/// Re-encoding semicolon separated data with commas:
///
/// ```
/// use csv_stream::core::step::{StepBuilder, StepStatus};
/// use csv_stream::item::csv::{
///     csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder,
/// };
///
/// let reader = CsvItemReaderBuilder::new()
///     .separator(b';')
///     .from_reader("a;b,c\r\nd;e".as_bytes());
/// let writer = CsvItemWriterBuilder::new().from_writer(vec![]);
///
/// let step = StepBuilder::new()
///     .name("convert")
///     .reader(&reader)
///     .writer(&writer)
///     .chunk(10)
///     .build();
///
/// let execution = step.execute().unwrap();
/// assert_eq!(execution.status, StepStatus::Success);
/// assert_eq!(execution.read_count, 2);
///
/// let output = writer.into_inner().unwrap();
/// assert_eq!(output, b"a,\"b,c\"\r\nd,e");
/// ```
pub struct StepInstance<'a, I> {
    name: String,
    reader: &'a dyn ItemReader<I>,
    writer: &'a dyn ItemWriter<I>,
    chunk_size: usize,
    status: Cell<StepStatus>,
    read_count: Cell<usize>,
    write_count: Cell<usize>,
}

impl<I> StepInstance<'_, I> {
    pub fn execute(&self) -> Result<StepExecution, CsvError> {
        let start = Instant::now();
        self.status.set(StepStatus::Started);

        info!("Start of step: {}", self.name);

        self.writer.open().map_err(|e| self.fail(e))?;

        let mut chunk: Vec<I> = Vec::with_capacity(self.chunk_size);
        loop {
            let finished = self.read_chunk(&mut chunk).map_err(|e| self.fail(e))?;

            if !chunk.is_empty() {
                self.write_chunk(&chunk).map_err(|e| self.fail(e))?;
            }

            if finished {
                break;
            }
        }

        self.writer.close().map_err(|e| self.fail(e))?;
        self.status.set(StepStatus::Success);

        info!(
            "End of step: {}, {} read, {} written",
            self.name,
            self.read_count.get(),
            self.write_count.get()
        );

        Ok(StepExecution {
            name: self.name.clone(),
            status: StepStatus::Success,
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            read_count: self.read_count.get(),
            write_count: self.write_count.get(),
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_status(&self) -> StepStatus {
        self.status.get()
    }

    /// Fills `chunk` and tells whether the reader is exhausted.
    fn read_chunk(&self, chunk: &mut Vec<I>) -> Result<bool, CsvError> {
        debug!("Start reading chunk");
        chunk.clear();

        while chunk.len() < self.chunk_size {
            match self.reader.read()? {
                Some(item) => {
                    chunk.push(item);
                    self.read_count.set(self.read_count.get() + 1);
                }
                None => {
                    debug!("End reading chunk: FINISHED");
                    return Ok(true);
                }
            }
        }

        debug!("End reading chunk: FULL");
        Ok(false)
    }

    fn write_chunk(&self, chunk: &[I]) -> Result<(), CsvError> {
        debug!("Start writing chunk of {} items", chunk.len());

        self.writer.write(chunk)?;
        self.writer.flush()?;
        self.write_count.set(self.write_count.get() + chunk.len());

        debug!("End writing chunk");
        Ok(())
    }

    fn fail(&self, error: CsvError) -> CsvError {
        self.status.set(StepStatus::Error);
        error!("Step {} failed: {}", self.name, error);
        error
    }
}

/// Builder for [`StepInstance`]. Reader and writer are mandatory.
pub struct StepBuilder<'a, I> {
    name: Option<String>,
    reader: Option<&'a dyn ItemReader<I>>,
    writer: Option<&'a dyn ItemWriter<I>>,
    chunk_size: usize,
}

impl<I> Default for StepBuilder<'_, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, I> StepBuilder<'a, I> {
    pub fn new() -> StepBuilder<'a, I> {
        Self {
            name: None,
            reader: None,
            writer: None,
            chunk_size: 1,
        }
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> StepBuilder<'a, I> {
        self.name = Some(name.into());
        self
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<I>) -> StepBuilder<'a, I> {
        self.reader = Some(reader);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<I>) -> StepBuilder<'a, I> {
        self.writer = Some(writer);
        self
    }

    /// Sets the number of items per chunk (at least one).
    pub fn chunk(mut self, chunk_size: usize) -> StepBuilder<'a, I> {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// # Panics
    ///
    /// Panics if the reader or the writer has not been set.
    pub fn build(self) -> StepInstance<'a, I> {
        StepInstance {
            name: self.name.unwrap_or_else(build_name),
            reader: self.reader.expect("a step needs a reader"),
            writer: self.writer.expect("a step needs a writer"),
            chunk_size: self.chunk_size,
            status: Cell::new(StepStatus::Ready),
            read_count: Cell::new(0),
            write_count: Cell::new(0),
        }
    }
}
