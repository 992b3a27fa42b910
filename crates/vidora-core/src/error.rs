//! Error types module
//!
//! All failure modes of the library are unified under the [`Error`] enum:
//! local validation failures, transport failures (HTTP or FTP), errors
//! reported by the remote service as an error-shaped payload, and malformed
//! responses. Remote numeric error codes are mapped to [`RemoteErrorKind`]
//! through a fixed table; unmapped codes fall back to
//! [`RemoteErrorKind::Unknown`].
//!
//! Nothing in this library retries or swallows an error: every variant
//! propagates synchronously to the caller that triggered the operation.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field-level invariant was violated before any network call.
    #[error("{0}")]
    Validation(String),

    /// A required configuration value is missing or unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Network-level failure talking to the HTTP API.
    #[error("transport error: {0}")]
    Transport(String),

    /// Network- or protocol-level failure talking to the FTP batch API.
    #[error("ftp error: {0}")]
    Ftp(String),

    /// The operation is not available on the configured transport.
    #[error("'{command}' is not supported by this transport")]
    UnsupportedTransport { command: String },

    /// The service answered with an error-shaped payload.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The response was decodable JSON but not the shape we expected.
    #[error("malformed response: {0}")]
    Deserialization(String),

    /// A single-item lookup returned no data.
    #[error("no data found")]
    NoData,
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn transport(msg: impl std::fmt::Display) -> Self {
        Error::Transport(msg.to_string())
    }

    pub fn ftp(msg: impl std::fmt::Display) -> Self {
        Error::Ftp(msg.to_string())
    }

    pub fn deserialization(msg: impl Into<String>) -> Self {
        Error::Deserialization(msg.into())
    }
}

/// Category of a service-reported error, derived from its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// An unspecified and unexpected error (code 100, and the fallback).
    Unknown,
    /// The write API is down for a scheduled deployment (101).
    ServiceDeploying,
    /// The call took too long; retry with a smaller page size (103).
    CallTimeout,
    /// Write methods require a multipart/form-data POST (200).
    Enctype,
    /// Read methods must be called with GET (201).
    GetRequired,
    /// Write methods must be called with POST (202).
    PostRequired,
    /// No query string was provided (203).
    MissingQueryString,
    /// POST body lacked a valid JSON-RPC envelope (204).
    MissingBody,
    /// JSON-RPC parameters could not be parsed (205).
    MalformedParameters,
    /// Invalid method name (206).
    InvalidMethod,
    /// Upload requires a multipart POST with a file stream (207).
    FilestreamRequired,
    /// The uploaded file has no filename (208).
    MissingFileName,
    /// A file stream was provided for a non-upload method (209).
    UnwantedFilestream,
    /// The token used in the call is invalid (210).
    InvalidToken,
    /// The JSON-RPC part of the request was empty (211).
    MissingJson,
    /// Parameters are the wrong type or number for this method (301).
    InvalidParameters,
    /// A delete of a business object failed (302).
    DeleteFailed,
    /// A required parameter was not set (303).
    RequiredParameter,
    /// An id did not refer to a valid object for this operation (304).
    IllegalValue,
    /// A property on the object is incompatible with the destination (305).
    IncompatibleValue,
    /// The provided file was not in a supported format (306).
    FileFormat,
    /// No object matches the given parameters (307).
    ObjectNotFound,
    /// The uploaded file's MD5 digest did not match the checksum (308).
    NonmatchingChecksum,
    /// The account is not approved to use remote assets (309).
    RemoteAssetsDisabled,
    /// An unsupported country code was used for geo-restriction (310).
    InvalidCountryCode,
    /// The account is not approved to use geo-restriction (311).
    GeoRestrictionDisabled,
}

impl RemoteErrorKind {
    /// Maps a service error code onto its kind. Total: unmapped codes come
    /// back as [`RemoteErrorKind::Unknown`].
    pub fn from_code(code: i64) -> Self {
        match code {
            100 => RemoteErrorKind::Unknown,
            101 => RemoteErrorKind::ServiceDeploying,
            103 => RemoteErrorKind::CallTimeout,
            200 => RemoteErrorKind::Enctype,
            201 => RemoteErrorKind::GetRequired,
            202 => RemoteErrorKind::PostRequired,
            203 => RemoteErrorKind::MissingQueryString,
            204 => RemoteErrorKind::MissingBody,
            205 => RemoteErrorKind::MalformedParameters,
            206 => RemoteErrorKind::InvalidMethod,
            207 => RemoteErrorKind::FilestreamRequired,
            208 => RemoteErrorKind::MissingFileName,
            209 => RemoteErrorKind::UnwantedFilestream,
            210 => RemoteErrorKind::InvalidToken,
            211 => RemoteErrorKind::MissingJson,
            301 => RemoteErrorKind::InvalidParameters,
            302 => RemoteErrorKind::DeleteFailed,
            303 => RemoteErrorKind::RequiredParameter,
            304 => RemoteErrorKind::IllegalValue,
            305 => RemoteErrorKind::IncompatibleValue,
            306 => RemoteErrorKind::FileFormat,
            307 => RemoteErrorKind::ObjectNotFound,
            308 => RemoteErrorKind::NonmatchingChecksum,
            309 => RemoteErrorKind::RemoteAssetsDisabled,
            310 => RemoteErrorKind::InvalidCountryCode,
            311 => RemoteErrorKind::GeoRestrictionDisabled,
            _ => RemoteErrorKind::Unknown,
        }
    }
}

/// An error payload reported by the remote service.
#[derive(Debug, Clone, thiserror::Error)]
#[error("server error {code}: {message}")]
pub struct RemoteError {
    pub code: i64,
    pub message: String,
    pub kind: RemoteErrorKind,
}

impl RemoteError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        RemoteError {
            code,
            message: message.into(),
            kind: RemoteErrorKind::from_code(code),
        }
    }

    /// Builds a `RemoteError` from a decoded error payload.
    ///
    /// The service emits `{"error": {"code": N, "message": ".."}}` on reads
    /// and `{"error": {...}, "result": null}` on writes; some legacy
    /// endpoints emit `{"error": "message", "code": N}` at the top level.
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        let code = payload
            .get("code")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(100);
        let message = payload
            .get("message")
            .and_then(serde_json::Value::as_str)
            .or_else(|| payload.as_str())
            .unwrap_or("an unknown error occurred while processing your request")
            .to_string();
        RemoteError::new(code, message)
    }
}
