use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown primitive type: {0}")]
    UnknownPrimitive(String),

    #[error("Length prefix must be a primitive, found {0}")]
    CompositeLengthPrefix(&'static str),

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Unknown string encoding: {0}")]
    UnknownEncoding(String),

    #[error("Buffer exhausted at offset {offset:#x}: needed {needed} bytes, {available} available")]
    BufferExhausted {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Offset {offset:#x} is past the end of a {len}-byte buffer")]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[error("Negative length prefix: {0}")]
    NegativeLength(i64),

    #[error("Length prefix decoded to a non-integer value: {0}")]
    NonIntegerLength(String),

    #[error("Length {length} needs at least {required} bytes, only {remaining} remaining")]
    LengthExceedsBuffer {
        length: usize,
        required: usize,
        remaining: usize,
    },

    #[error("Element count {count} exceeds the configured limit of {limit}")]
    CountLimitExceeded { count: usize, limit: usize },

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("In field `{field}`: {source}")]
    InField {
        field: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Layout file contains no layouts: {0}")]
    EmptyLayoutSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error with the name of the field being decoded
    pub fn in_field(self, field: &str) -> Self {
        match self {
            Error::InField { field: inner, source } => Error::InField {
                field: format!("{field}.{inner}"),
                source,
            },
            other => Error::InField {
                field: field.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, with field context stripped
    pub fn root(&self) -> &Error {
        match self {
            Error::InField { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error comes from a malformed descriptor rather than the data
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.root(),
            Error::UnknownPrimitive(_)
                | Error::CompositeLengthPrefix(_)
                | Error::DuplicateField(_)
                | Error::UnknownEncoding(_)
        )
    }

    /// Check if this error comes from bytes that do not match the declared shape
    pub fn is_decode(&self) -> bool {
        matches!(
            self.root(),
            Error::BufferExhausted { .. }
                | Error::OffsetOutOfBounds { .. }
                | Error::NegativeLength(_)
                | Error::NonIntegerLength(_)
                | Error::LengthExceedsBuffer { .. }
                | Error::CountLimitExceeded { .. }
                | Error::EncodingError(_)
        )
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
