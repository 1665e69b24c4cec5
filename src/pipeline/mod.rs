pub mod dates;
pub mod extraction;
pub mod fusion;
pub mod processor;

pub use processor::*;

use thiserror::Error;

use crate::db::DatabaseError;

/// Caller-facing pipeline failures. Per-backend and fusion degradations are
/// absorbed upstream; only "nothing could be read" and "the record could not
/// be saved" reach the caller, plus up-front request validation.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid upload request: {0}")]
    InvalidRequest(String),

    #[error("unsupported image type: {0}")]
    UnsupportedImage(String),

    #[error("no text could be extracted from the prescription image")]
    ExtractionExhausted,

    #[error("prescription record could not be saved: {0}")]
    Persistence(#[from] DatabaseError),
}
