use std::fmt;

/// Returned when a value cannot be read back from a bit stream: the stream
/// ended early, a discriminant was out of range, or the decoded value is not
/// representable by the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerdeErr;

impl fmt::Display for SerdeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error while deserializing from bit stream")
    }
}

impl std::error::Error for SerdeErr {}
