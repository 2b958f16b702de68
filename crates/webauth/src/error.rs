//! Error types for response parsing and validation
//!
//! Three families, from narrowest to widest:
//! - [`FieldError`]: a single field could not be converted (integer, date).
//!   The response itself stays usable.
//! - [`ParseError`]: the token is structurally unusable; no `Response` is
//!   built.
//! - [`ValidationError`]: the token parsed but breaks a protocol rule. One
//!   variant per check, each carrying the values needed to diagnose it.

use crate::status::Status;
use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

/// Token-level parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first field is empty or the token is empty
    #[error("Response does not specify a protocol version")]
    MissingVersion,

    /// The first field is not a positive integer
    #[error("Invalid protocol version: {0:?}")]
    InvalidVersion(String),

    /// A field is not valid percent-encoded UTF-8
    #[error("Unable to decode response field {index}: {reason}")]
    Decode {
        /// Zero-based position of the field in the token
        index: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// Single-field conversion failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Non-empty value that is not an integer
    #[error("Error converting field '{field}' to an integer: {value:?}")]
    NotAnInteger {
        /// Field name
        field: String,
        /// Offending value
        value: String,
    },

    /// Non-empty value that is not a `yyyyMMdd'T'HHmmss'Z'` date
    #[error("Error converting field '{field}' to a date: {value:?}")]
    BadDate {
        /// Field name
        field: String,
        /// Offending value
        value: String,
    },
}

/// Protocol validation failures, in pipeline order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The token could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A field needed by a check could not be converted
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Response uses an older protocol than the request asked for
    #[error("Unacceptable protocol version ({0}) in response")]
    UnacceptableVersion(u32),

    /// Empty status field
    #[error("Status code missing from response")]
    StatusMissing,

    /// Status outside the protocol's code table
    #[error("Unrecognised status code: {0}")]
    UnrecognisedStatus(String),

    /// The WLS answered with a non-success status
    #[error("{}{}", .status.description(), message_suffix(.message))]
    Status {
        /// Status reported by the WLS
        status: Status,
        /// Free-text `msg` field, if any
        message: Option<String>,
    },

    /// Empty `id` field
    #[error("Response ID missing")]
    IdMissing,

    /// Empty `url` field
    #[error("URL missing from response")]
    UrlMissing,

    /// Response was issued for a different URL
    #[error("URL in response ({response}) does not match expected URL ({request})")]
    UrlMismatch {
        /// URL carried by the response
        response: String,
        /// URL the request was made for
        request: String,
    },

    /// Empty `principal` field
    #[error("Principal missing from status 200 response")]
    PrincipalMissing,

    /// Both `auth` and `sso` are populated
    #[error("Both first-hand and SSO auth tokens found in response")]
    BothAuthTypesPresent,

    /// Neither `auth` nor `sso` is populated
    #[error("No authentication type found in status 200 response")]
    NoAuthTypePresent,

    /// Request demanded `iact=yes` but the user was authenticated via SSO
    #[error("First-hand authentication required but not supplied")]
    FirstHandAuthRequired,

    /// None of the authentication types used is in the request's `aauth`
    #[error("No acceptable authentication types used")]
    NoAcceptableAuthType,

    /// Empty `kid` or `sig` field
    #[error("KeyID and/or signature missing from status 200 response")]
    KeyOrSignatureMissing,

    /// No key registered under the computed alias
    #[error("Failed to retrieve a key with alias {0} from the key store")]
    KeyNotFound(String),

    /// Signature does not verify
    #[error("Unable to verify response signature")]
    SignatureInvalid,

    /// Empty `issue` field
    #[error("Issue time missing from response")]
    IssueMissing,

    /// Issue time is further ahead of the reference time than the skew allows
    #[error(
        "Response apparently issued in the future; issue time {} compared with {}",
        render_time(.issued),
        render_time(.now)
    )]
    IssuedInFuture {
        /// Issue time, in the validator's time zone
        issued: DateTime<Tz>,
        /// Reference time, in the validator's time zone
        now: DateTime<Tz>,
    },

    /// Issue time is older than timeout plus skew
    #[error(
        "Response issued too long ago; issue time {} compared with {}",
        render_time(.issued),
        render_time(.now)
    )]
    IssuedTooLongAgo {
        /// Issue time, in the validator's time zone
        issued: DateTime<Tz>,
        /// Reference time, in the validator's time zone
        now: DateTime<Tz>,
    },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(msg) if !msg.is_empty() => format!(": {}", msg),
        _ => String::new(),
    }
}

fn render_time(time: &DateTime<Tz>) -> String {
    time.format("%Y-%m-%d %H:%M:%S%.3f %Z").to_string()
}

impl ValidationError {
    /// WLS status code, for failures that carry one.
    ///
    /// Only [`ValidationError::Status`] does; every other failure was
    /// detected locally.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ValidationError::Status { status, .. } => Some(status.code()),
            _ => None,
        }
    }

    /// Check if the user should simply be sent back to authenticate.
    ///
    /// True for answers the WLS gave deliberately (cancelled, declined, ...)
    /// and for stale responses; false for anything that suggests a broken or
    /// forged response.
    pub fn is_expected_outcome(&self) -> bool {
        matches!(
            self,
            ValidationError::Status { .. }
                | ValidationError::IssuedTooLongAgo { .. }
                | ValidationError::FirstHandAuthRequired
                | ValidationError::NoAcceptableAuthType
        )
    }

    /// Get error code for API responses and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Parse(_) => "PARSE_ERROR",
            ValidationError::Field(_) => "FIELD_ERROR",
            ValidationError::UnacceptableVersion(_) => "UNACCEPTABLE_VERSION",
            ValidationError::StatusMissing => "STATUS_MISSING",
            ValidationError::UnrecognisedStatus(_) => "UNRECOGNISED_STATUS",
            ValidationError::Status { .. } => "WLS_STATUS",
            ValidationError::IdMissing => "ID_MISSING",
            ValidationError::UrlMissing => "URL_MISSING",
            ValidationError::UrlMismatch { .. } => "URL_MISMATCH",
            ValidationError::PrincipalMissing => "PRINCIPAL_MISSING",
            ValidationError::BothAuthTypesPresent => "BOTH_AUTH_TYPES",
            ValidationError::NoAuthTypePresent => "NO_AUTH_TYPE",
            ValidationError::FirstHandAuthRequired => "FIRST_HAND_REQUIRED",
            ValidationError::NoAcceptableAuthType => "NO_ACCEPTABLE_AUTH",
            ValidationError::KeyOrSignatureMissing => "KEY_OR_SIG_MISSING",
            ValidationError::KeyNotFound(_) => "KEY_NOT_FOUND",
            ValidationError::SignatureInvalid => "SIGNATURE_INVALID",
            ValidationError::IssueMissing => "ISSUE_MISSING",
            ValidationError::IssuedInFuture { .. } => "ISSUED_IN_FUTURE",
            ValidationError::IssuedTooLongAgo { .. } => "ISSUED_TOO_LONG_AGO",
        }
    }
}
