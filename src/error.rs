use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// JSON shape names used when reporting validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        f.write_str(s)
    }
}

/// Failures the search pipeline knows how to present to the user.
///
/// Anything else travelling through the pipeline is an unexpected failure and
/// is propagated instead of being turned into a notice.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("{message}, status code: {status}")]
    Server { message: String, status: u16 },

    #[error("No internet connection")]
    Offline,

    #[error("Problem with {field} ({value}): it is {actual}, expected {expected}")]
    Validate {
        field: String,
        value: Value,
        actual: JsonKind,
        expected: JsonKind,
    },

    #[error("Data is missing: {field}")]
    DataMiss { field: String },
}

/// Concrete tag of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Server,
    Offline,
    Validate,
    DataMiss,
}

pub const HTTP_FAILURE_MESSAGE: &str = "HTTP request failed";

impl AppError {
    pub fn server(status: u16) -> Self {
        AppError::Server {
            message: HTTP_FAILURE_MESSAGE.to_string(),
            status,
        }
    }

    pub fn validate(field: impl Into<String>, value: &Value, expected: JsonKind) -> Self {
        AppError::Validate {
            field: field.into(),
            value: value.clone(),
            actual: JsonKind::of(value),
            expected,
        }
    }

    pub fn data_miss(field: impl Into<String>) -> Self {
        AppError::DataMiss {
            field: field.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Server { .. } => ErrorKind::Server,
            AppError::Offline => ErrorKind::Offline,
            AppError::Validate { .. } => ErrorKind::Validate,
            AppError::DataMiss { .. } => ErrorKind::DataMiss,
        }
    }

    /// Server failures, including the offline subtype.
    pub fn is_server(&self) -> bool {
        matches!(self, AppError::Server { .. } | AppError::Offline)
    }

    /// Shape failures, including the missing-data subtype.
    pub fn is_validate(&self) -> bool {
        matches!(self, AppError::Validate { .. } | AppError::DataMiss { .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
