/// This module provides a streaming CSV reader and writer.
pub mod csv;
