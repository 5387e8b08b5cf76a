use rand::distr::{Alphanumeric, SampleString};

/// Reader and writer traits shared by the CSV codec and the step.
pub mod item;

/// Chunk-oriented transfer of items from a reader to a writer.
pub mod step;

/// Generates a random name consisting of alphanumeric characters.
///
/// # Returns
///
/// A `String` containing the generated random name.
fn build_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 8)
}
