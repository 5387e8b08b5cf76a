use std::path::{Path, PathBuf};

use log::info;

use crate::error::CsvResult;

use super::{
    Document, Record, csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder,
    format::CsvFormat,
};

/// The rows of a whole CSV file.
///
/// `load` and `save` open the file, hand it to a reader or a writer and close
/// it again before returning, whether the operation succeeded or not.
///
/// # Examples
///
/// ```
/// use csv_stream::item::csv::{document::CsvDocument, format::CsvFormat};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("cities.csv");
///
/// let mut document = CsvDocument::from_rows(vec![
///     vec!["Boston".to_string(), "United States".to_string()],
///     vec!["Concord".to_string(), "United States".to_string()],
/// ]);
/// document.save(&path, &CsvFormat::default()).unwrap();
///
/// let loaded = CsvDocument::load(&path, &CsvFormat::default()).unwrap();
/// assert_eq!(loaded.rows(), document.rows());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDocument {
    path: Option<PathBuf>,
    rows: Document,
}

impl CsvDocument {
    /// Creates a document without rows and without a file.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Document) -> Self {
        Self { path: None, rows }
    }

    /// Reads every record of the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P, format: &CsvFormat) -> CsvResult<Self> {
        let path = path.as_ref();
        info!("Loading {}", path.display());

        let reader = CsvItemReaderBuilder::new().format(format).from_path(path)?;
        let rows = reader.read_all()?;

        info!("Loaded {} records from {}", rows.len(), path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            rows,
        })
    }

    /// Writes every row to the file at `path`, replacing its content, and
    /// remembers `path` as the document's file.
    pub fn save<P: AsRef<Path>>(&mut self, path: P, format: &CsvFormat) -> CsvResult<()> {
        let path = path.as_ref();
        info!("Saving {}", path.display());

        let writer = CsvItemWriterBuilder::new().format(format).from_path(path)?;
        writer.write_all(&self.rows)?;
        writer.into_inner()?;

        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// The file the document was last loaded from or saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Document {
        &mut self.rows
    }

    pub fn into_rows(self) -> Document {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
