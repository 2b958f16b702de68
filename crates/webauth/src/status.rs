//! WLS response status codes
//!
//! The protocol defines a closed set of three-digit codes. Anything else in
//! the `status` field is rejected by the validator.

use serde::{Deserialize, Serialize};

/// Status of an authentication response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// 200: the user was authenticated
    Success,

    /// 410: the user cancelled the authentication
    Cancelled,

    /// 510: none of the `aauth` types is supported by the WLS
    NoCommonAuth,

    /// 520: the WLS does not support the requested protocol version.
    ///
    /// Only ever sent in a version 1 response.
    UnsupportedVersion,

    /// 530: the request parameters could not be decoded
    RequestError,

    /// 540: `iact=no` was requested but interaction would be needed
    InteractionRequired,

    /// 560: the WAA is not authorised to use the WLS
    Unauthorized,

    /// 570: the WLS declined to authenticate this time
    Declined,
}

impl Status {
    /// Every status, in code order.
    pub const ALL: [Status; 8] = [
        Status::Success,
        Status::Cancelled,
        Status::NoCommonAuth,
        Status::UnsupportedVersion,
        Status::RequestError,
        Status::InteractionRequired,
        Status::Unauthorized,
        Status::Declined,
    ];

    /// Numeric code.
    pub fn code(&self) -> u16 {
        match self {
            Status::Success => 200,
            Status::Cancelled => 410,
            Status::NoCommonAuth => 510,
            Status::UnsupportedVersion => 520,
            Status::RequestError => 530,
            Status::InteractionRequired => 540,
            Status::Unauthorized => 560,
            Status::Declined => 570,
        }
    }

    /// Look up a numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Parse the text of a `status` field.
    ///
    /// Only exact three-digit codes are accepted; `"0200"` or `" 200"` are not.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().and_then(Self::from_code)
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Status::Success => "OK",
            Status::Cancelled => "Authentication cancelled at user's request",
            Status::NoCommonAuth => "No mutually acceptable types of authentication available",
            Status::UnsupportedVersion => "Unsupported authentication protocol version",
            Status::RequestError => "Parameter error in authentication request",
            Status::InteractionRequired => "Interaction with the user would be required",
            Status::Unauthorized => "Web server not authorised to use the authentication service",
            Status::Declined => "Operation declined by the authentication service",
        }
    }

    /// Whether this is the success status.
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Description of a raw status field, including codes outside the table.
pub fn status_text(status: &str) -> String {
    match Status::parse(status) {
        Some(s) => s.description().to_string(),
        None => format!("Unrecognised status code: {}", status),
    }
}
