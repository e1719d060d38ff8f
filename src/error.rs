use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not a review quality score (expected 0, 3, 4 or 5)")]
    InvalidQuality(u8),

    #[error("{0} is not a mastery level (expected 0..=4)")]
    InvalidMasteryLevel(u8),

    #[error("{name} must be within {min}..={max} in steps of {step}, given {value}")]
    SettingOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
        step: u32,
    },

    #[error("timestamp {0} ns is out of range")]
    InvalidTimestamp(i128),

    #[error("failed to parse corpus: {0}")]
    Corpus(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}
