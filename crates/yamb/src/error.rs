//! Error types for facade operations.

use thiserror::Error;

/// Error type for facade operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // Schema errors
    /// A constructor was given field names the class never declared.
    #[error("{class} was given unknown fields: {}", .fields.join(", "))]
    UnknownFields { class: String, fields: Vec<String> },
    /// A read or write targeted a name that is neither declared nor unmanaged.
    #[error("{class} has no attribute `{name}`")]
    UnknownAttribute { class: String, name: String },

    // Shape errors
    /// The raw value does not have the shape the field expects.
    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
    /// Sequence index out of bounds.
    #[error("index {index} out of bounds (length={length})")]
    IndexOutOfBounds { index: usize, length: usize },
    /// A mapping key is itself a sequence or mapping.
    #[error("mapping key must be a string, found {0}")]
    NonStringKey(String),

    // Codec errors
    /// Format name is not one of the supported codecs.
    #[error("unknown document format: {0}")]
    UnknownFormat(String),
    /// Failed to parse YAML input.
    #[error("YAML parse error: {0}")]
    YamlParse(String),
    /// Failed to serialize to YAML.
    #[error("YAML serialize error: {0}")]
    YamlSerialize(String),
    /// Failed to parse JSON input.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
    /// Failed to serialize to JSON.
    #[error("JSON serialize error: {0}")]
    JsonSerialize(String),
    /// f64 is NaN or Infinity (not representable in JSON).
    #[error("cannot encode non-finite float {0} as JSON")]
    NonFiniteFloat(f64),
}

/// Result type alias for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
