//! # WebAuth
//!
//! Client-side (WAA) support for the WebAuth single-sign-on protocol: the
//! application redirects the user to the login service (WLS) with a
//! [`Request`], and receives back a signed token that this crate parses into
//! a [`Response`] and checks with a [`Validator`].
//!
//! ## Overview
//!
//! The webauth crate handles:
//! - **Responses**: parsing `!`-separated, percent-encoded tokens for
//!   protocol versions 1 to 3
//! - **Validation**: status, URL, authentication type, signature and
//!   freshness checks, failing with a precise [`ValidationError`]
//! - **Requests**: building the redirect query string
//! - **Configuration**: timeout, clock skew, key alias prefix and display
//!   time zone, loaded from the environment
//!
//! Key material lives in the companion `webauth-keys` crate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use webauth::{Request, Validator, ValidatorConfig};
//! use webauth_keys::{KeyRing, KeySnapshot};
//!
//! let validator = Validator::with_config(&ValidatorConfig::from_env()).unwrap();
//! let ring = KeyRing::new(KeySnapshot::load_dir("/etc/webauth/keys").unwrap());
//!
//! // Redirect the user to the WLS with this query string
//! let request = Request::new()
//!     .with_version(3)
//!     .with_url("https://app.example.org/login");
//! let query = request.to_query_string();
//!
//! // ...then validate the WLS-Response parameter it sends back
//! # let token = "";
//! let response = validator
//!     .validate_token(&request, token, &*ring.snapshot(), Utc::now())
//!     .unwrap();
//! println!("{} logged in", response.get("principal"));
//! ```
//!
//! ## Logging
//!
//! Validation emits `tracing` events at debug level; install a subscriber
//! to see them. Signatures and key material are never logged.

pub mod config;
pub mod encoding;
pub mod error;
pub mod fields;
pub mod request;
pub mod response;
pub mod status;
pub mod token;
pub mod validator;

// Re-export main types
pub use config::{ConfigError, ValidatorConfig};
pub use error::{FieldError, ParseError, ValidationError, ValidationResult};
pub use request::Request;
pub use response::{Response, Schema};
pub use status::Status;
pub use validator::Validator;

pub use webauth_keys::{KeyRing, KeySnapshot, KeyStore, PublicKey};
