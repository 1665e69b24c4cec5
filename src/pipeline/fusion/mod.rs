pub mod groq;
pub mod normalizer;
pub mod parser;
pub mod prompt;
pub mod types;

pub use groq::*;
pub use normalizer::*;
pub use parser::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FusionError {
    #[error("reasoning service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("malformed reply: {0}")]
    MalformedReply(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("response parsing error: {0}")]
    ResponseParsing(String),
}
