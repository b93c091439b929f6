use thiserror::Error;

/// Failure modes of the in-memory schematic body parser.
///
/// All variants cross into [`crate::Error::Decode`] and are surfaced to
/// callers of `World::parse` as a malformed-world condition.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("truncated header: expected '<X> <Y> <Z>', got {0:?}")]
    TruncatedHeader(String),

    #[error("header token {0:?} is not a valid extent")]
    BadExtent(String),

    #[error("layer {layer} row {row} has {got} hex characters, expected {expected}")]
    RowLength {
        layer: usize,
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("layer {layer} row {row} contains non-hex character {ch:?}")]
    BadHexDigit { layer: usize, row: usize, ch: char },

    #[error("{0} does not have a .vox extension")]
    NotVoxFile(String),

    #[error("could not open {0}")]
    Unreadable(String),
}
