/// The default separator used by the CSV reader and writer.
pub const DEFAULT_SEPARATOR: u8 = b',';

/// The default quote character used by the CSV reader and writer.
pub const DEFAULT_QUOTE: u8 = b'"';

/// Fields at or above this length in characters are quoted without being
/// scanned.
pub const DEFAULT_QUOTE_LIMIT: usize = 1000;

/// Terminator written between two records.
pub const RECORD_TERMINATOR: &[u8] = b"\r\n";

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
