//! Shared fixtures for the integration tests.
//!
//! The response tokens below were signed with `fixtures/wls-test-signing.key`
//! under key id `2`. Their issue times are in the past, so tests validate
//! them against their own issue time rather than the clock.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha1::Sha1;
use webauth::encoding::encode_signature;
use webauth::{PublicKey, Request, Response, Validator};
use webauth_keys::KeySnapshot;

pub const SPKI_PEM: &str = include_str!("../fixtures/webauth-pubkey2.pem");
pub const PKCS1_PEM: &str = include_str!("../fixtures/wls-test-pkcs1.pem");
pub const SIGNING_KEY_PEM: &str = include_str!("../fixtures/wls-test-signing.key");

/// URL every fixture response was issued for.
pub const URL: &str = "http://webapp.example.org/debug.html";

/// Version 2, first-hand `pwd` authentication.
pub const RESPONSE_V2_FIRSTHAND: &str = concat!(
    "2!200!!20050317T151310Z!1111072390-26663-9!http://webapp.example",
    ".org/debug.html!jw35!pwd!!36000!For babies!2!n3zVCbb6yoapgYXh1Qo",
    "ip0bjaNO8p86PhDSzc47iAOQXs2.B.3eUIXqSo0rRSoZR6usZhmOOHIpbLk5FHVf",
    "fvqIiwoAPUIAiNRIgCYTjsuTgYNzM8ffAVT5hYSE1ldZ3hqdrzEvM4.zCDO2ZDel",
    "QYznqzfkwbHUx6jGKPDNvvoPlPcC44APi8K8777s14rzoVKvdp-af.GJk3Gkkv8I",
    "Dx7PZKIdna9UKIown6FrCC88I2VSsqFrAgPksFW1FWDBaEvghUCikXR-UfAAkiIr",
    "-Qn-xQvJt0TLKnfx4rc4KeiTeV1Wck-vGfgiDrAFg-38c5RuuXpjGp5XFyWVz5AK",
    "VsQ__",
);

/// Version 2, authenticated by SSO.
pub const RESPONSE_V2_SSO: &str = concat!(
    "2!200!!20050317T151424Z!1111072462-26473-5!http://webapp.example",
    ".org/debug.html!jw35!!pwd!35928!For babies!2!qEZwiO8ZhziO.VR11AL",
    "TiSEDk2U07-rsiNDONuJsK1AF8.WcbsqKGvzXa00qwsKb2kC8ZYanuwny6HrMnii",
    "LYkCh7UwQ-Xn8eO75PxTAdyTja.ZUTkMI1e2f5j34Fn6juhIChXl3BWFjlL4cr.s",
    "wHBSaApM8MX.wlV8EWnl2RIkx6CvAcm0D5X73qB4iIcbTTVRaEc8FxltpVtTrmKt",
    "Ki4eiH4dqJG1Hy-Q.K3aOj.lE6yclqxO7EkWmQXSAIgQm9TaQCRUraAd0vmBX9Ev",
    "K8-R.qLsvDUGkugfSxrUp4gkO7t1N8Ncl.uYG3M4hSB881m73QrDuy5rwMSBmIeY",
    "xsg__",
);

/// Version 1, authenticated by SSO.
pub const RESPONSE_V1: &str = concat!(
    "1!200!!20050317T151538Z!1111072536-26473-6!http://webapp.example",
    ".org/debug.html!jw35!!pwd!35854!For babies!2!mf-VKjy4hPTcAdr0aAG",
    "x18vnZzV6NGYLpjm-.MrPwVe.Kf8zqt7GjaeMviLyaWFYeTfwrqchmNR.nONB3VE",
    "lcEMXsjS2WjD3gfdoZRtF44AOoDo4dwvIVoyYLa4z-BXF5Vg6iErG-dzzUrPdykf",
    "UV4XRQjS646fPl-BSJPr8dNzm6q46gLMQ4L11Av77uRXZBpIAXS3XbW.JxSkjS2v",
    "ylmdnUILeted9a.CD9zQO3PoRQgTlnfEHGxeU1uIRm-g1nPVpSGcuvH8gNLIrdwE",
    "VSsJ4EjPSDxIkACnONIc57uWSTLoiU6bIr94touzLlVpxUbpcAtPvRDYZqyRTRhC",
    "j2g__",
);

/// Version 1, status 530.
pub const RESPONSE_ERROR: &str = concat!(
    "1!530!Missing required parameter 'ver'!20050317T151628Z!11110725",
    "88-26568-7!http://webapp.example.org/debug.html!!!!!!2!sVX30TUnY",
    "m0Nqy9QtuEWhPv0Znv-PvQOaT.QihxUevMPhyOApJ2bqeyJF4zJRftDKlwoKYO9v",
    "1gwMfhwqN2jCFDGqrG8FfE0BxheAG899xyue6JETntzHXSd3WtLSQsPuDEAf.ZGB",
    "2E2qx1G9t9ZYkoMxbsdRx8GkEzuUaie4YYehTXrp6lL3ycnEjSQvjtsmiy1aPeGM",
    "YTYfZsmc1MoACSDQg6K5468lPgXuQlxaqDwOauproSm7arbdIlFs-DRSeEBJG..m",
    "l2maNTKDwNGexCM-3Ee3wKaqzGdkTTGfoD.YFAXwKNucCOMbgbcgddcf5DlzkPrh",
    "bVOCJTX00N6tg__",
);

/// Version 2, issued during British Summer Time.
pub const RESPONSE_SUMMER: &str = concat!(
    "2!200!!20050331T145628Z!1112280988-1756-8!http://webapp.example.",
    "org/debug.html!jw35!pwd!!36000!!2!rvDUFYI-cNZfsBnWwWijP6TaXhlgce",
    "x0MJ2OkEy8tGuKoF7OmTUvuV-1TApzGUHES8DsB3Ry4R42tORkQ2z9sDwpZekrw8",
    "JBp4m47H6lCL.NhJuPZsZLtJhwBnqd55rQ-VpatcndQzFGY8MsyYmb5qjvyK2r5m",
    "cYJfVeErfYJVOERel8Vc.z4G9nopk4EF2dJIKGuw9vRRzVaSdL0viDJy-GXJzuHQ",
    "R103GKTYrpdNpm9YYuQj1sk.6CQrWQNGZyT7oGv-5wHlAaeZQvwuGiTXgp3.Pjko",
    "LCxloBRSzP4WEZvKvEADvWstwtKfbYgbQOJY8zLem19uj2A-mafIo4PA__",
);

/// Version 3 with `ptags` and percent-encoded `msg` and `params`.
pub const RESPONSE_V3: &str = concat!(
    "3!200!Welcome%21 100%25 ok!20140612T101500Z!1402568100-4711-3!ht",
    "tp://webapp.example.org/debug.html!jw35!current!pwd!!36000!retur",
    "n%3D%2Fhome!2!BJoQ1QeG.cN57izTuEY0CsIMEZPpvSg6yHyPU3IpiS7YBYIGsZ",
    "f6wwXxUIMv4-sdabOaM15gCHCS31rj0iqKAzliYVh1ggkvRy4IxtUT5Cv.ZEmNaD",
    "9X50UCSAX.FdhNZ9FbmeBROnba5B5-GqIdJxFU1XcCx7oYpuJfJScv01sQlsQM60",
    "5xKOWDzRksB5g35UlVIIaAHo.OVHULYPlQGucMxgygCKjwib8Cy3Za.njf-yyfkV",
    "29nrIJGZz.a9-TWIDL5ygBv28xeDmlYCY2FGNjSqVwB8EMhUkwUN6u1EmfzBCiYM",
    "6NRfn3QWFK3Zljv3SHKFiu3H-naXeURBv7rA__",
);

/// First-hand response with the principal changed after signing.
pub const RESPONSE_FORGED: &str = concat!(
    "2!200!!20050317T151310Z!1111072390-26663-9!http://webapp.example",
    ".org/debug.html!jw99!pwd!!36000!For babies!2!n3zVCbb6yoapgYXh1Qo",
    "ip0bjaNO8p86PhDSzc47iAOQXs2.B.3eUIXqSo0rRSoZR6usZhmOOHIpbLk5FHVf",
    "fvqIiwoAPUIAiNRIgCYTjsuTgYNzM8ffAVT5hYSE1ldZ3hqdrzEvM4.zCDO2ZDel",
    "QYznqzfkwbHUx6jGKPDNvvoPlPcC44APi8K8777s14rzoVKvdp-af.GJk3Gkkv8I",
    "Dx7PZKIdna9UKIown6FrCC88I2VSsqFrAgPksFW1FWDBaEvghUCikXR-UfAAkiIr",
    "-Qn-xQvJt0TLKnfx4rc4KeiTeV1Wck-vGfgiDrAFg-38c5RuuXpjGp5XFyWVz5AK",
    "VsQ__",
);

/// Key store holding the fixture key under its default alias.
pub fn keys() -> KeySnapshot {
    KeySnapshot::new().with_key("webauth-pubkey2", SPKI_PEM.parse::<PublicKey>().unwrap())
}

/// A version 2 request for [`URL`].
pub fn request() -> Request {
    Request::empty().with_version(2).with_url(URL)
}

pub fn parse(token: &str) -> Response {
    Response::parse(token).unwrap()
}

/// Issue time of a fixture token.
pub fn issue_time(token: &str) -> DateTime<Utc> {
    parse(token).get_date("issue").unwrap().unwrap()
}

/// `issue_time(token)` shifted by `offset_ms`.
pub fn at(token: &str, offset_ms: i64) -> DateTime<Utc> {
    issue_time(token) + Duration::milliseconds(offset_ms)
}

/// Validator rendering times in Europe/London, with the given window.
pub fn london_validator(timeout_ms: u64, skew_ms: u64) -> Validator {
    let mut validator = Validator::default();
    validator.set_timeout(std::time::Duration::from_millis(timeout_ms));
    validator.set_max_skew(std::time::Duration::from_millis(skew_ms));
    validator.set_time_zone(chrono_tz::Europe::London);
    validator
}

/// Sign `raw` the way the WLS does.
pub fn sign(raw: &str) -> String {
    let key = RsaPrivateKey::from_pkcs1_pem(SIGNING_KEY_PEM).unwrap();
    let signer = SigningKey::<Sha1>::new(key);
    encode_signature(&signer.sign(raw.as_bytes()).to_bytes())
}

/// Build a token from everything up to `params`, signed under key id `2`.
pub fn signed_token(fields: &[&str]) -> String {
    let raw = fields.join("!");
    format!("{}!2!{}", raw, sign(&raw))
}
