//! Error payloads
//!
//! Request-level failures carry one of these bodies. The application's codec
//! turns them into the wire format; the shapes below are what it receives.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

/// Structured payload for a rejected request.
///
/// | Variant               | Value handed to the codec                          |
/// |-----------------------|----------------------------------------------------|
/// | `Unauthorized`        | `{"errors": "unauthorized_api_key"}`               |
/// | `MissingApiKey`       | `{"errors": ["missing_api_key"]}`                  |
/// | `InvalidApiKey`       | `{"errors": ["invalid_api_key"]}`                  |
/// | `NoParams`            | `{"errors": "no_params"}`                          |
/// | `NonEmptyParams`      | `{"errors": "non_empty_params"}`                   |
/// | `InvalidParams(keys)` | `{"errors": {"invalid_params": keys}}`             |
/// | `InternalServerError` | `{"errors": "internal_server_error"}`              |
/// | `Errors(value)`       | `{"errors": value}`                                |
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// Credential valid but role insufficient
    Unauthorized,
    /// No credential supplied where one is needed
    MissingApiKey,
    /// Credential supplied but not recognised
    InvalidApiKey,
    /// Update without parameters
    NoParams,
    /// Parameters where none are allowed
    NonEmptyParams,
    /// Parameters the role may not write
    InvalidParams(Vec<String>),
    /// Anything the client cannot fix
    InternalServerError,
    /// Application-defined errors
    Errors(Value),
}

impl ErrorBody {
    /// Short machine-readable name of the body.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorBody::Unauthorized => "unauthorized_api_key",
            ErrorBody::MissingApiKey => "missing_api_key",
            ErrorBody::InvalidApiKey => "invalid_api_key",
            ErrorBody::NoParams => "no_params",
            ErrorBody::NonEmptyParams => "non_empty_params",
            ErrorBody::InvalidParams(_) => "invalid_params",
            ErrorBody::InternalServerError => "internal_server_error",
            ErrorBody::Errors(_) => "errors",
        }
    }

    /// The value handed to the application's codec.
    pub fn to_value(&self) -> Value {
        match self {
            ErrorBody::MissingApiKey | ErrorBody::InvalidApiKey => {
                json!({ "errors": [self.code()] })
            }
            ErrorBody::InvalidParams(params) => json!({ "errors": { "invalid_params": params } }),
            ErrorBody::Errors(errors) => json!({ "errors": errors }),
            _ => json!({ "errors": self.code() }),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::InvalidParams(params) => write!(f, "invalid_params: {}", params.join(", ")),
            ErrorBody::Errors(errors) => write!(f, "errors: {errors}"),
            _ => f.write_str(self.code()),
        }
    }
}

impl Serialize for ErrorBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
