use thiserror::Error;

/// Data-quality defects found while loading a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset must be a JSON array of records")]
    NotAnArray,

    #[error("record {index} could not be read")]
    MalformedRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV row {row} could not be read")]
    MalformedRow {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("bacterium {bacterium:?} has unrecognised Gram stain {value:?} (expected \"positive\" or \"negative\")")]
    UnknownGramStain { bacterium: String, value: String },

    #[error("bacterium {0:?} appears more than once")]
    DuplicateBacterium(String),
}
