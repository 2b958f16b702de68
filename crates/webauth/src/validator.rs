//! Response validation
//!
//! [`Validator`] runs the protocol checks over a parsed [`Response`] in a
//! fixed order and stops at the first failure:
//!
//! 1. response version at least the requested version
//! 2. status present and known; any non-200 status is reported as such
//! 3. `id`, `url` (matched against the request) and `principal` present
//! 4. exactly one of `auth` / `sso`, honouring `iact` and `aauth`
//! 5. `kid` and `sig` present, key found, signature verified
//! 6. issue time inside the freshness window
//!
//! The validator never reads the clock. Callers pass the reference time,
//! normally `Utc::now()`.

use crate::config::{
    ConfigError, ValidatorConfig, DEFAULT_KEY_PREFIX, DEFAULT_MAX_SKEW_MS, DEFAULT_TIMEOUT_MS,
};
use crate::encoding::decode_signature;
use crate::error::{ValidationError, ValidationResult};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;
use url::Url;
use webauth_keys::KeyStore;

/// Validates WLS responses against the request that produced them.
///
/// # Example
///
/// ```rust,no_run
/// use chrono::Utc;
/// use webauth::{Request, Validator};
/// use webauth_keys::KeySnapshot;
///
/// let keys = KeySnapshot::load_dir("/etc/webauth/keys").unwrap();
/// let request = Request::new().with_version(3).with_url("https://app.example.org/login");
/// let validator = Validator::default();
///
/// # let token = "";
/// match validator.validate_token(&request, token, &keys, Utc::now()) {
///     Ok(response) => println!("authenticated {}", response.get("principal")),
///     Err(e) if e.is_expected_outcome() => println!("try again: {}", e),
///     Err(e) => eprintln!("rejected: {}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    timeout_ms: u64,
    max_skew_ms: u64,
    key_prefix: String,
    time_zone: Tz,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_skew_ms: DEFAULT_MAX_SKEW_MS,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            time_zone: Tz::UTC,
        }
    }
}

impl Validator {
    /// Create a validator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator from configuration.
    pub fn with_config(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            timeout_ms: config.timeout_ms,
            max_skew_ms: config.max_skew_ms,
            key_prefix: config.key_prefix.clone(),
            time_zone: config.time_zone()?,
        })
    }

    /// Maximum age of an acceptable response.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Set the maximum response age. Sub-millisecond precision is dropped.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout_ms = whole_millis(timeout);
    }

    /// Tolerated clock disagreement between WLS and WAA.
    pub fn max_skew(&self) -> Duration {
        Duration::from_millis(self.max_skew_ms)
    }

    /// Set the tolerated clock disagreement.
    pub fn set_max_skew(&mut self, skew: Duration) {
        self.max_skew_ms = whole_millis(skew);
    }

    /// Prefix of key-store aliases.
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Set the prefix of key-store aliases.
    pub fn set_key_prefix(&mut self, prefix: impl Into<String>) {
        self.key_prefix = prefix.into();
    }

    /// Zone used to render times in freshness errors.
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Set the zone used to render times in freshness errors.
    pub fn set_time_zone(&mut self, tz: Tz) {
        self.time_zone = tz;
    }

    /// Key-store alias for a key id: the prefix immediately followed by
    /// the id.
    pub fn key_alias(&self, kid: &str) -> String {
        format!("{}{}", self.key_prefix, kid)
    }

    /// Parse `token` and validate the result.
    ///
    /// Returns the response once every check has passed.
    pub fn validate_token<K: KeyStore + ?Sized>(
        &self,
        request: &Request,
        token: &str,
        keys: &K,
        now: DateTime<Utc>,
    ) -> ValidationResult<Response> {
        let response = Response::parse(token).map_err(|e| {
            debug!(check = "parse", error = %e, "Response rejected");
            ValidationError::from(e)
        })?;
        self.validate(request, &response, keys, now)?;
        Ok(response)
    }

    /// Check `response` against `request`, `keys` and the reference time
    /// `now`.
    ///
    /// # Errors
    ///
    /// The first failed check, as a [`ValidationError`].
    pub fn validate<K: KeyStore + ?Sized>(
        &self,
        request: &Request,
        response: &Response,
        keys: &K,
        now: DateTime<Utc>,
    ) -> ValidationResult<()> {
        let span = tracing::debug_span!(
            "webauth_validate",
            id = response.get("id"),
            version = response.version()
        );
        let _enter = span.enter();

        match self.run_checks(request, response, keys, now) {
            Ok(()) => {
                debug!(principal = response.get("principal"), "Response accepted");
                Ok(())
            }
            Err(e) => {
                debug!(check = e.error_code(), error = %e, "Response rejected");
                Err(e)
            }
        }
    }

    fn run_checks<K: KeyStore + ?Sized>(
        &self,
        request: &Request,
        response: &Response,
        keys: &K,
        now: DateTime<Utc>,
    ) -> ValidationResult<()> {
        check_version(request, response)?;
        check_status(response)?;

        if response.get("id").is_empty() {
            return Err(ValidationError::IdMissing);
        }
        check_url(request, response)?;
        if response.get("principal").is_empty() {
            return Err(ValidationError::PrincipalMissing);
        }

        check_auth(request, response)?;
        self.check_signature(response, keys)?;
        self.check_freshness(response, now)
    }

    fn check_signature<K: KeyStore + ?Sized>(
        &self,
        response: &Response,
        keys: &K,
    ) -> ValidationResult<()> {
        let kid = response.get("kid");
        let sig = response.get("sig");
        if kid.is_empty() || sig.is_empty() {
            return Err(ValidationError::KeyOrSignatureMissing);
        }

        let alias = self.key_alias(kid);
        let key = match keys.lookup(&alias) {
            Some(key) => key,
            None => return Err(ValidationError::KeyNotFound(alias)),
        };

        let signature = decode_signature(sig).map_err(|_| ValidationError::SignatureInvalid)?;
        if !key.verify(response.raw_data().as_bytes(), &signature) {
            return Err(ValidationError::SignatureInvalid);
        }
        Ok(())
    }

    fn check_freshness(&self, response: &Response, now: DateTime<Utc>) -> ValidationResult<()> {
        let issued = response
            .get_date("issue")?
            .ok_or(ValidationError::IssueMissing)?;

        let age_ms = (now - issued).num_milliseconds();
        let skew_ms = clamp_i64(self.max_skew_ms);
        let window_ms = clamp_i64(self.timeout_ms.saturating_add(self.max_skew_ms));

        if age_ms < -skew_ms {
            return Err(ValidationError::IssuedInFuture {
                issued: issued.with_timezone(&self.time_zone),
                now: now.with_timezone(&self.time_zone),
            });
        }
        if age_ms > window_ms {
            return Err(ValidationError::IssuedTooLongAgo {
                issued: issued.with_timezone(&self.time_zone),
                now: now.with_timezone(&self.time_zone),
            });
        }
        Ok(())
    }
}

fn check_version(request: &Request, response: &Response) -> ValidationResult<()> {
    if response.version() < request.version()? {
        return Err(ValidationError::UnacceptableVersion(response.version()));
    }
    Ok(())
}

fn check_status(response: &Response) -> ValidationResult<()> {
    let raw = response.get("status");
    if raw.is_empty() {
        return Err(ValidationError::StatusMissing);
    }
    let status =
        Status::parse(raw).ok_or_else(|| ValidationError::UnrecognisedStatus(raw.to_string()))?;

    if !status.is_success() {
        let msg = response.get("msg");
        return Err(ValidationError::Status {
            status,
            message: (!msg.is_empty()).then(|| msg.to_string()),
        });
    }
    Ok(())
}

fn check_url(request: &Request, response: &Response) -> ValidationResult<()> {
    let issued_for = response.get("url");
    if issued_for.is_empty() {
        return Err(ValidationError::UrlMissing);
    }
    if !urls_match(response.version(), issued_for, request.url()) {
        return Err(ValidationError::UrlMismatch {
            response: issued_for.to_string(),
            request: request.url().to_string(),
        });
    }
    Ok(())
}

fn check_auth(request: &Request, response: &Response) -> ValidationResult<()> {
    let auth = response.get("auth");
    let sso = response.get("sso");
    match (auth.is_empty(), sso.is_empty()) {
        (false, false) => return Err(ValidationError::BothAuthTypesPresent),
        (true, true) => return Err(ValidationError::NoAuthTypePresent),
        _ => {}
    }

    if request.requires_interactive() && auth.is_empty() {
        return Err(ValidationError::FirstHandAuthRequired);
    }

    let acceptable = request.acceptable_auth_types();
    if !acceptable.is_empty() {
        let used: BTreeSet<String> = if auth.is_empty() {
            response.get_set("sso")
        } else {
            BTreeSet::from([auth.to_string()])
        };
        if used.is_disjoint(&acceptable) {
            return Err(ValidationError::NoAcceptableAuthType);
        }
    }
    Ok(())
}

/// Whether a response issued for `response_url` answers a request made for
/// `request_url`.
///
/// Scheme, host and port must agree and query strings are ignored. Version
/// 1 responses only need their path to be a prefix of the request path;
/// later versions need the same path. URLs that do not parse never match.
pub fn urls_match(version: u32, response_url: &str, request_url: &str) -> bool {
    let (Ok(issued_for), Ok(requested)) = (Url::parse(response_url), Url::parse(request_url))
    else {
        return false;
    };

    let same_origin = issued_for.scheme() == requested.scheme()
        && issued_for.host_str() == requested.host_str()
        && issued_for.port_or_known_default() == requested.port_or_known_default();
    if !same_origin {
        return false;
    }

    if version == 1 {
        requested.path().starts_with(issued_for.path())
    } else {
        requested.path() == issued_for.path()
    }
}

fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn clamp_i64(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}
