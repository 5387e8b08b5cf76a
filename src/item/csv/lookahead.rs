use std::io::{BufRead, BufReader, ErrorKind, Read, Result};

/// A buffered byte source with exactly one byte of lookahead.
///
/// `None` stands for the end of the stream. A peeked end of stream is kept in
/// the slot like any byte and handed to the following `next` without reading
/// the source again.
pub struct Lookahead<R> {
    inner: BufReader<R>,
    /// `Some(_)` when a peeked value waits to be returned by `next`.
    slot: Option<Option<u8>>,
    /// Number of bytes returned by `next` so far.
    offset: u64,
}

impl<R: Read> Lookahead<R> {
    pub fn with_capacity(capacity: usize, rdr: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, rdr),
            slot: None,
            offset: 0,
        }
    }

    /// Returns and consumes the next byte.
    pub fn next(&mut self) -> Result<Option<u8>> {
        let byte = match self.slot.take() {
            Some(peeked) => peeked,
            None => self.fetch()?,
        };

        if byte.is_some() {
            self.offset += 1;
        }
        Ok(byte)
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        if let Some(peeked) = self.slot {
            return Ok(peeked);
        }

        let byte = self.fetch()?;
        self.slot = Some(byte);
        Ok(byte)
    }

    /// Number of bytes consumed through `next`.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn fetch(&mut self) -> Result<Option<u8>> {
        loop {
            let byte = match self.inner.fill_buf() {
                Ok(buffer) => buffer.first().copied(),
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };

            if byte.is_some() {
                self.inner.consume(1);
            }
            return Ok(byte);
        }
    }
}
