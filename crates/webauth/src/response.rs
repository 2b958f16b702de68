//! Authentication response messages
//!
//! This module turns a raw WLS token into a [`Response`]: an immutable,
//! versioned field set plus the undecoded prefix the signature covers.
//!
//! ## Field layout
//!
//! | Protocol | Fields |
//! |----------|--------|
//! | 1, 2 | `ver status msg issue id url principal auth sso life params kid sig` |
//! | 3+   | `ver status msg issue id url principal ptags auth sso life params kid sig` |
//!
//! Parsing does not validate anything beyond the version field; see
//! [`Validator`](crate::Validator) for the protocol checks.

use crate::error::{FieldError, ParseError};
use crate::fields;
use crate::token::{self, RESPONSE_SEPARATOR};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

const FIELDS_V2: &[&str] = &[
    "ver", "status", "msg", "issue", "id", "url", "principal", "auth", "sso", "life", "params",
    "kid", "sig",
];

const FIELDS_V3: &[&str] = &[
    "ver", "status", "msg", "issue", "id", "url", "principal", "ptags", "auth", "sso", "life",
    "params", "kid", "sig",
];

/// Field layout of a response, selected by its declared version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// Protocol versions 1 and 2
    V2,
    /// Protocol version 3 and later (adds `ptags`)
    V3,
}

impl Schema {
    /// Schema used for a declared protocol version.
    pub fn for_version(version: u32) -> Self {
        if version < 3 {
            Schema::V2
        } else {
            Schema::V3
        }
    }

    /// Field names in wire order.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Schema::V2 => FIELDS_V2,
            Schema::V3 => FIELDS_V3,
        }
    }
}

/// A parsed authentication response.
///
/// # Example
///
/// ```rust
/// use webauth::Response;
///
/// let response = Response::parse(
///     "3!200!!20140612T101500Z!1402568100-4711-3!http://host/!jw35!current!pwd!!36000!!2!sig",
/// )
/// .unwrap();
///
/// assert_eq!(response.version(), 3);
/// assert_eq!(response.get("principal"), "jw35");
/// assert_eq!(response.get("ptags"), "current");
/// assert_eq!(response.get_int("life").unwrap(), Some(36000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    token: String,
    version: u32,
    schema: Schema,
    fields: HashMap<&'static str, String>,
    field_count: usize,
    raw_len: usize,
}

impl Response {
    /// Parse a token string.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Decode`] if any field is not valid percent-encoded UTF-8
    /// - [`ParseError::MissingVersion`] if the first field is empty
    /// - [`ParseError::InvalidVersion`] if it is not a positive integer
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        let values = token::split(RESPONSE_SEPARATOR, token)?;

        let ver = values.first().map(String::as_str).unwrap_or("");
        if ver.is_empty() {
            return Err(ParseError::MissingVersion);
        }
        let version = ver
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| ParseError::InvalidVersion(ver.to_string()))?;

        let schema = Schema::for_version(version);
        let names = schema.field_names();
        let field_count = values.len().min(names.len());
        let fields = names.iter().copied().zip(values).collect();

        Ok(Self {
            token: token.to_string(),
            version,
            schema,
            fields,
            field_count,
            raw_len: raw_data_len(token),
        })
    }

    /// Declared protocol version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Field layout in use.
    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Number of fields present in the token, capped at the schema size.
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Names of the fields present, in wire order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schema.field_names().iter().copied().take(self.field_count)
    }

    /// The token this response was parsed from.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The undecoded token prefix covered by the signature.
    ///
    /// This is everything before the `!` that precedes the `kid` field, or
    /// the empty string if the token has fewer than two separators.
    pub fn raw_data(&self) -> &str {
        &self.token[..self.raw_len]
    }

    /// Decoded value of a field, or `""` if absent.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// Whether a field is present and non-empty.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Integer value of a field; `None` if absent or empty.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        fields::parse_int(field, self.get(field))
    }

    /// Timestamp value of a field; `None` if absent or empty.
    pub fn get_date(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        fields::parse_date(field, self.get(field))
    }

    /// Comma-separated items of a field; empty if absent.
    pub fn get_set(&self, field: &str) -> BTreeSet<String> {
        fields::parse_set(self.get(field))
    }

    /// Look up `name` among the `name=value` items of the `params` field.
    ///
    /// Returns `Some("")` for an item with no `=`, `None` if there is no
    /// such item.
    pub fn param(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        self.get_set("params").into_iter().find_map(|item| {
            let mut parts = item.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), value) if key == name => Some(value.unwrap_or("").to_string()),
                _ => None,
            }
        })
    }
}

impl std::str::FromStr for Response {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebAuth response: ")?;
        for (i, name) in self.schema.field_names().iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, self.get(name))?;
        }
        Ok(())
    }
}

fn raw_data_len(token: &str) -> usize {
    token
        .rfind(RESPONSE_SEPARATOR)
        .and_then(|last| token[..last].rfind(RESPONSE_SEPARATOR))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_RESPONSE: &str = "1!200!A Message %21%21 %25%25!20050303T151131Z!1109862691-30323-5!\
        http://webapp.example.org/debug.html!jw35!pwd!foo,bar!36000!for babies!2!\
        B1PKo8dhTP6eJKCo52xm5IMvzIJI6EaH90u.irWKrnYluaQRePHi6jQOXRBfJ2sG_";

    const CANCEL_RESPONSE: &str =
        "1!410!!20050303T151131Z!1109862691-30323-5!http://webapp.example.org/debug.html!!!!!!!";

    #[test]
    fn test_field_values() {
        let response = Response::parse(OK_RESPONSE).unwrap();

        assert_eq!(response.version(), 1);
        assert_eq!(response.schema(), Schema::V2);
        assert_eq!(response.get("ver"), "1");
        assert_eq!(response.get("status"), "200");
        assert_eq!(response.get("msg"), "A Message !! %%");
        assert_eq!(response.get("issue"), "20050303T151131Z");
        assert_eq!(response.get("id"), "1109862691-30323-5");
        assert_eq!(response.get("url"), "http://webapp.example.org/debug.html");
        assert_eq!(response.get("principal"), "jw35");
        assert_eq!(response.get("auth"), "pwd");
        assert_eq!(response.get("sso"), "foo,bar");
        assert_eq!(response.get("life"), "36000");
        assert_eq!(response.get("params"), "for babies");
        assert_eq!(response.get("kid"), "2");
        assert!(response.get("sig").starts_with("B1PKo8dh"));
    }

    #[test]
    fn test_empty_fields_of_cancel_response() {
        let response = Response::parse(CANCEL_RESPONSE).unwrap();

        assert_eq!(response.field_count(), 13);
        assert_eq!(response.get("status"), "410");
        assert_eq!(response.get("principal"), "");
        assert_eq!(response.get_int("life").unwrap(), None);
        assert!(response.get_set("sso").is_empty());
        assert!(!response.has("kid"));
    }

    #[test]
    fn test_typed_accessors() {
        let response = Response::parse(OK_RESPONSE).unwrap();

        assert_eq!(response.get_int("status").unwrap(), Some(200));
        assert_eq!(response.get_int("life").unwrap(), Some(36000));
        assert_eq!(
            response.get_date("issue").unwrap().unwrap().timestamp_millis(),
            1_109_862_691_000
        );

        let sso = response.get_set("sso");
        assert_eq!(sso.len(), 2);
        assert!(sso.contains("foo") && sso.contains("bar"));
    }

    #[test]
    fn test_absent_fields_never_fail() {
        let response = Response::parse(OK_RESPONSE).unwrap();

        assert_eq!(response.get("nonesuch"), "");
        assert_eq!(response.get(""), "");
        assert_eq!(response.get_int("nonesuch").unwrap(), None);
        assert_eq!(response.get_date("nonesuch").unwrap(), None);
        assert!(response.get_set("nonesuch").is_empty());
        assert_eq!(response.get("ptags"), "");
    }

    #[test]
    fn test_malformed_values_fail_on_access_only() {
        let response = Response::parse("2!A!!TODAY!!http://a.b/c/!!!!A!!!").unwrap();

        assert!(matches!(response.get_int("status"), Err(FieldError::NotAnInteger { .. })));
        assert!(matches!(response.get_date("issue"), Err(FieldError::BadDate { .. })));
        assert!(matches!(response.get_int("life"), Err(FieldError::NotAnInteger { .. })));
        assert_eq!(response.get("url"), "http://a.b/c/");
    }

    #[test]
    fn test_short_token() {
        let response = Response::parse("1!200!A Message!20050303T151131Z!id!http://h/!jw99!pwd!!36000!p!2")
            .unwrap();

        assert_eq!(response.field_count(), 12);
        assert_eq!(response.get("kid"), "2");
        assert_eq!(response.get("sig"), "");
        assert_eq!(response.field_names().last(), Some("kid"));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let response = Response::parse("2!200!!i!id!u!p!pwd!!1!!2!sig!extra!more").unwrap();
        assert_eq!(response.field_count(), 13);
        assert_eq!(response.get("sig"), "sig");
    }

    #[test]
    fn test_v3_layout() {
        let response =
            Response::parse("3!200!!20140612T101500Z!id!http://h/!jw35!current,staff!pwd!!36000!!2!sig")
                .unwrap();

        assert_eq!(response.schema(), Schema::V3);
        assert_eq!(response.get("ptags"), "current,staff");
        assert_eq!(response.get("auth"), "pwd");
        assert_eq!(response.get("kid"), "2");
        assert_eq!(response.get("sig"), "sig");
    }

    #[test]
    fn test_future_versions_use_newest_layout() {
        let response = Response::parse("7!200!!i!id!u!p!tags!pwd!!1!!2!sig").unwrap();
        assert_eq!(response.schema(), Schema::V3);
        assert_eq!(response.get("ptags"), "tags");
    }

    #[test]
    fn test_missing_version() {
        assert_eq!(Response::parse(""), Err(ParseError::MissingVersion));
        assert_eq!(Response::parse("!!!!!!!!!!!!"), Err(ParseError::MissingVersion));
        assert_eq!(Response::parse("!200!!x"), Err(ParseError::MissingVersion));
    }

    #[test]
    fn test_invalid_version() {
        for token in ["FOO", "A!!!20050303T151131Z!!http://a.b/c/!!!!!!!", "0!200", "-1!200", "1.5!200"] {
            assert!(
                matches!(Response::parse(token), Err(ParseError::InvalidVersion(_))),
                "accepted {:?}",
                token
            );
        }
    }

    #[test]
    fn test_decode_error_is_fatal() {
        let result = Response::parse("2!200!bad %zz message!i");
        assert!(matches!(result, Err(ParseError::Decode { index: 2, .. })));
    }

    #[test]
    fn test_raw_data_excludes_kid_and_sig() {
        let response = Response::parse(OK_RESPONSE).unwrap();
        assert_eq!(
            response.raw_data(),
            "1!200!A Message %21%21 %25%25!20050303T151131Z!1109862691-30323-5!\
             http://webapp.example.org/debug.html!jw35!pwd!foo,bar!36000!for babies"
        );

        let cancel = Response::parse(CANCEL_RESPONSE).unwrap();
        assert_eq!(
            cancel.raw_data(),
            "1!410!!20050303T151131Z!1109862691-30323-5!http://webapp.example.org/debug.html!!!!!"
        );
    }

    #[test]
    fn test_raw_data_stops_before_kid() {
        let response = Response::parse("1!200!!date!id!url!!!!!!2!SIG").unwrap();
        assert_eq!(response.raw_data(), "1!200!!date!id!url!!!!!");
    }

    #[test]
    fn test_raw_data_without_separators() {
        assert_eq!(Response::parse("2").unwrap().raw_data(), "");
        assert_eq!(Response::parse("2!200").unwrap().raw_data(), "");
        assert_eq!(Response::parse("2!200!x").unwrap().raw_data(), "2");
    }

    #[test]
    fn test_param_lookup() {
        let response = Response::parse("2!200!!i!id!u!p!pwd!!1!return=/home,debug,lang=en!2!sig").unwrap();

        assert_eq!(response.param("return"), Some("/home".to_string()));
        assert_eq!(response.param("lang"), Some("en".to_string()));
        assert_eq!(response.param("debug"), Some(String::new()));
        assert_eq!(response.param("missing"), None);
        assert_eq!(response.param(""), None);
    }

    #[test]
    fn test_display_lists_every_schema_field() {
        let response = Response::parse(CANCEL_RESPONSE).unwrap();
        let rendered = response.to_string();

        assert!(rendered.starts_with("WebAuth response: ver: 1, status: 410, msg: , "));
        assert!(rendered.ends_with("kid: , sig: "));
    }

    #[test]
    fn test_from_str() {
        let response: Response = CANCEL_RESPONSE.parse().unwrap();
        assert_eq!(response.get("status"), "410");
    }
}
