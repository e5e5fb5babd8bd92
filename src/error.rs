use thiserror::Error;

/// Structural failures that abort an entire load.
///
/// Asset-level gaps (a texture that doesn't resolve, a missing animation
/// frame) are not represented here; they are absorbed and logged at the
/// point they occur and never fail the load.
#[derive(Debug, Error)]
pub enum Error {
    /// The model source could not be resolved or opened.
    #[error("model source unavailable: {path}: {detail}")]
    SourceUnavailable { path: String, detail: String },
    /// The stream ended mid-record.
    #[error("unexpected end of data at offset 0x{offset:X} while reading {context}")]
    UnexpectedEndOfData { offset: usize, context: &'static str },
    /// A record decoded to values the format forbids.
    #[error("malformed record: {detail}")]
    MalformedRecord { detail: String },
    /// A mesh referenced itself or a later mesh as its parent.
    #[error("malformed hierarchy: mesh {mesh} has parent reference {parent_ref}")]
    MalformedHierarchy { mesh: usize, parent_ref: u16 },
}

pub type IResult<T> = Result<T, Error>;
