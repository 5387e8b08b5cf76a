use crate::error::CsvError;

/// Result of a single read: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<I> = Result<Option<I>, CsvError>;

/// A source of items, read one at a time.
pub trait ItemReader<I> {
    fn read(&self) -> ItemReaderResult<I>;
}

/// A sink of items, written one chunk at a time.
pub trait ItemWriter<O> {
    fn write(&self, items: &[O]) -> Result<(), CsvError>;

    fn flush(&self) -> Result<(), CsvError> {
        Ok(())
    }

    fn open(&self) -> Result<(), CsvError> {
        Ok(())
    }

    fn close(&self) -> Result<(), CsvError> {
        Ok(())
    }
}
