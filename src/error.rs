use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("malformed play #{index} (drive {drive:?}): {reason}")]
    MalformedPlay {
        drive: Option<u32>,
        index: usize,
        reason: String,
    },
    #[error("malformed drive #{index}: {reason}")]
    MalformedDrive { index: usize, reason: String },
}
