//! Record values - the scalar types the facade stores

use std::fmt;

use crate::domain::DomainError;

/// A scalar value accepted by the storage facade.
///
/// Values are written to the backing store byte-for-byte: text as UTF-8,
/// numbers in their decimal rendering (the same convention Redis uses for
/// numeric values, which keeps stored integers compatible with INCR).
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl RecordValue {
    /// Returns the exact byte sequence stored for this value
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Text(s) => s.as_bytes().to_vec(),
            Self::Bytes(b) => b.clone(),
            Self::Int(n) => n.to_string().into_bytes(),
            Self::Float(x) => x.to_string().into_bytes(),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for RecordValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for RecordValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<i64> for RecordValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for RecordValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Decoders applied to raw stored bytes on retrieval.
///
/// A decoder failure surfaces as a Decode error; the stored value itself is
/// left untouched.
pub mod decode {
    use super::DomainError;

    /// Decodes stored bytes as UTF-8 text
    pub fn text(raw: &[u8]) -> Result<String, DomainError> {
        String::from_utf8(raw.to_vec())
            .map_err(|e| DomainError::decode(format!("Value is not valid UTF-8: {}", e)))
    }

    /// Decodes stored bytes as a decimal integer
    pub fn integer(raw: &[u8]) -> Result<i64, DomainError> {
        let text = text(raw)?;
        text.parse()
            .map_err(|e| DomainError::decode(format!("Value is not an integer: {}", e)))
    }

    /// Decodes stored bytes as a decimal float
    pub fn float(raw: &[u8]) -> Result<f64, DomainError> {
        let text = text(raw)?;
        text.parse()
            .map_err(|e| DomainError::decode(format!("Value is not a float: {}", e)))
    }
}
