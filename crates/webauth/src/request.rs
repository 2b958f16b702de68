//! Authentication request parameters
//!
//! A [`Request`] describes what the WAA asked the WLS for. It is encoded
//! into the redirect query string, and later handed to the
//! [`Validator`](crate::Validator) so the response can be checked against
//! it (`ver`, `url`, `iact`, `aauth`).

use crate::error::FieldError;
use crate::fields;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Parameters in the order the WLS protocol lists them.
const PROTOCOL_ORDER: &[&str] = &[
    "ver", "url", "desc", "aauth", "iact", "msg", "params", "date", "fail",
];

/// Protocol version assumed when `ver` is not set.
pub const DEFAULT_VERSION: u32 = 1;

/// An authentication request.
///
/// # Example
///
/// ```rust
/// use webauth::Request;
///
/// let request = Request::new()
///     .with_version(3)
///     .with_url("https://app.example.org/login")
///     .with_acceptable_auth(["pwd"])
///     .with_interactive(true);
///
/// assert_eq!(request.version().unwrap(), 3);
/// assert!(request.requires_interactive());
/// assert!(request.to_query_string().starts_with("ver=3&url=https%3A%2F%2Fapp.example.org%2Flogin"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    params: Vec<(String, String)>,
}

impl Request {
    /// Create a request with the protocol defaults: `ver=1` and `date` set
    /// to the current time.
    pub fn new() -> Self {
        let mut request = Self::empty();
        request.set_int("ver", i64::from(DEFAULT_VERSION));
        request.set_date("date", &Utc::now());
        request
    }

    /// Create a request with no parameters at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.params.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((field, value)),
        }
    }

    /// Set an integer parameter.
    pub fn set_int(&mut self, field: impl Into<String>, value: i64) {
        self.set(field, value.to_string());
    }

    /// Set a timestamp parameter in the protocol date format.
    pub fn set_date(&mut self, field: impl Into<String>, value: &DateTime<Utc>) {
        self.set(field, fields::format_date(value));
    }

    /// Set a parameter to a comma-joined list.
    pub fn set_list<I, S>(&mut self, field: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = items
            .into_iter()
            .map(|item| item.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.set(field, joined);
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        let index = self.params.iter().position(|(name, _)| name == field)?;
        Some(self.params.remove(index).1)
    }

    /// Value of a parameter, or `""` if unset.
    pub fn get(&self, field: &str) -> &str {
        self.params
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Integer value of a parameter; `None` if unset or empty.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        fields::parse_int(field, self.get(field))
    }

    /// Timestamp value of a parameter; `None` if unset or empty.
    pub fn get_date(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        fields::parse_date(field, self.get(field))
    }

    /// Comma-separated items of a parameter; empty if unset.
    pub fn get_set(&self, field: &str) -> BTreeSet<String> {
        fields::parse_set(self.get(field))
    }

    /// Number of parameters set.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Names of the parameters set, in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(name, _)| name.as_str())
    }

    /// Protocol version the response must meet or exceed.
    ///
    /// An unset `ver` means [`DEFAULT_VERSION`].
    pub fn version(&self) -> Result<u32, FieldError> {
        match self.get_int("ver")? {
            None => Ok(DEFAULT_VERSION),
            Some(v) => u32::try_from(v).map_err(|_| FieldError::NotAnInteger {
                field: "ver".to_string(),
                value: self.get("ver").to_string(),
            }),
        }
    }

    /// URL the response must be issued for.
    pub fn url(&self) -> &str {
        self.get("url")
    }

    /// Whether `iact=yes` demands first-hand authentication.
    pub fn requires_interactive(&self) -> bool {
        self.get("iact") == "yes"
    }

    /// Authentication types listed in `aauth`; empty means any.
    pub fn acceptable_auth_types(&self) -> BTreeSet<String> {
        self.get_set("aauth")
    }

    /// Set the protocol version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.set_int("ver", i64::from(version));
        self
    }

    /// Set the return URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.set("url", url);
        self
    }

    /// Set the description shown to the user by the WLS.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.set("desc", desc);
        self
    }

    /// Restrict the acceptable authentication types.
    pub fn with_acceptable_auth<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_list("aauth", types);
        self
    }

    /// Demand (`yes`) or forbid (`no`) user interaction.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.set("iact", if interactive { "yes" } else { "no" });
        self
    }

    /// Set the message shown to the user by the WLS.
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.set("msg", msg);
        self
    }

    /// Set opaque data returned unchanged in the response `params` field.
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.set("params", params);
        self
    }

    /// Ask the WLS to report errors itself instead of redirecting back.
    pub fn with_fail(mut self, fail: bool) -> Self {
        if fail {
            self.set("fail", "yes");
        } else {
            self.remove("fail");
        }
        self
    }

    /// Encode as an `application/x-www-form-urlencoded` query string.
    ///
    /// Protocol parameters come first in protocol order, followed by any
    /// others in the order they were set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.ordered() {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }

    fn ordered(&self) -> impl Iterator<Item = (&str, &str)> {
        let known = PROTOCOL_ORDER.iter().filter_map(move |name| {
            self.params
                .iter()
                .find(|(field, _)| field == name)
                .map(|(field, value)| (field.as_str(), value.as_str()))
        });
        let extra = self
            .params
            .iter()
            .filter(|(field, _)| !PROTOCOL_ORDER.contains(&field.as_str()))
            .map(|(field, value)| (field.as_str(), value.as_str()));
        known.chain(extra)
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebAuth request: ")?;
        for (i, (name, value)) in self.ordered().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        Ok(())
    }
}
