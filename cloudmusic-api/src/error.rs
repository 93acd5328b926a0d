//! Error types for the cloud music API client.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a `code` outside the accepted set.
    ///
    /// Login endpoints report business rejections this way:
    /// - `400`: malformed phone number
    /// - `501`: account not registered
    /// - `502`: wrong password
    /// - `503`: wrong captcha
    /// - `800` / `801` / `802`: QR ticket expired / waiting / scanned
    #[error("API returned code {code}")]
    BadCode {
        /// Remote status code (not the HTTP status).
        code: i64,
        /// Raw response body.
        body: Value,
    },

    /// A field the endpoint always returns was missing, e.g. `profile` on
    /// `account/get` with an invalid cookie.
    #[error("unexpected response payload: {0}")]
    BadData(Value),

    /// Every attempt failed; `source` is the last failure.
    #[error("gave up on {path} after {} reconnections: {source}", crate::RECONNECTION)]
    ConnectionExhausted {
        /// Request path, e.g. `/api/login`.
        path: String,
        /// Failure of the final attempt.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Remote `code` carried by this error, if any.
    ///
    /// Looks through [`Error::ConnectionExhausted`] to the last attempt.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::BadCode { code, .. } => Some(*code),
            Self::ConnectionExhausted { source, .. } => source.code(),
            _ => None,
        }
    }
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn code_looks_through_exhaustion() {
        let err = Error::ConnectionExhausted {
            path: "/api/v3/song/detail".into(),
            source: Box::new(Error::BadCode {
                code: 400,
                body: json!({ "code": 400 }),
            }),
        };
        assert_eq!(err.code(), Some(400));
        assert!(err.to_string().contains("/api/v3/song/detail"));
    }

    #[test]
    fn bad_data_has_no_code() {
        assert_eq!(Error::BadData(json!({ "profile": null })).code(), None);
    }
}
