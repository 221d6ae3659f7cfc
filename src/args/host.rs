//! Call-site values as the host hands them over.

use crate::error::ShimError;

/// A value passed to the binding by the host.
///
/// Only `Str` and `Bytes` can be forwarded; the rest exist so the host can
/// report exactly what it received when conversion fails.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    /// Any other host object, identified by its type name.
    Other(String),
}

impl HostValue {
    /// Host-facing type name, used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            HostValue::Str(_) => "str",
            HostValue::Bytes(_) => "bytes",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Bool(_) => "bool",
            HostValue::None => "None",
            HostValue::Other(name) => name.as_str(),
        }
    }

    /// Native byte string for argument `index`.
    pub fn to_native(&self, index: usize) -> Result<Vec<u8>, ShimError> {
        let bytes = match self {
            HostValue::Str(s) => s.as_bytes(),
            HostValue::Bytes(b) => b.as_slice(),
            other => {
                return Err(ShimError::Type {
                    index,
                    found: other.type_name().to_string(),
                })
            }
        };

        let mut native = Vec::new();
        native.try_reserve_exact(bytes.len() + 1)?;
        native.extend_from_slice(bytes);
        Ok(native)
    }

    /// The value as text, for the command-string call style.
    pub fn as_text(&self, index: usize) -> Result<&str, ShimError> {
        match self {
            HostValue::Str(s) => Ok(s),
            HostValue::Bytes(b) => std::str::from_utf8(b).map_err(|_| ShimError::Type {
                index,
                found: "bytes (not UTF-8)".to_string(),
            }),
            other => Err(ShimError::Type {
                index,
                found: other.type_name().to_string(),
            }),
        }
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Str(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Str(s)
    }
}

impl From<Vec<u8>> for HostValue {
    fn from(b: Vec<u8>) -> Self {
        HostValue::Bytes(b)
    }
}

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::Int(n)
    }
}
