//! Telegram WebApp `initData` verification.
//!
//! The Mini App hands the backend an `application/x-www-form-urlencoded` blob
//! signed by Telegram. Verification rebuilds the canonical data-check string
//! (every field except `hash`, sorted by key, `key=value` joined with `\n`),
//! derives the secret key as `HMAC_SHA256("WebAppData", bot_token)` and compares
//! `HMAC_SHA256(secret_key, data_check_string)` against the received hash.
//!
//! Everything here is pure: no I/O, no logging, no shared state.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Key of the HMAC that turns a bot token into the WebApp secret key.
const WEB_APP_DATA: &[u8] = b"WebAppData";

const HASH_FIELD: &str = "hash";
const AUTH_DATE_FIELD: &str = "auth_date";
const USER_FIELD: &str = "user";

/// Reasons an initData blob is rejected.
///
/// Callers must not surface the variant to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InitDataError {
    #[error("malformed initData encoding")]
    MalformedInput,

    #[error("missing hash")]
    MissingSignature,

    #[error("missing auth_date")]
    MissingTimestamp,

    #[error("bad auth_date")]
    BadTimestamp,

    #[error("auth_date expired")]
    Expired,

    #[error("bad signature")]
    BadSignature,
}

/// Decoded initData fields, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitData {
    fields: BTreeMap<String, String>,
}

impl InitData {
    /// Raw decoded value of a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// Decode the nested `user` JSON object.
    ///
    /// Returns `None` when the field is absent, blank, not valid JSON, or
    /// carries a zero id.
    pub fn user(&self) -> Option<WebAppUser> {
        let raw = self.get(USER_FIELD)?.trim();
        if raw.is_empty() {
            return None;
        }
        serde_json::from_str::<WebAppUser>(raw)
            .ok()
            .filter(|user| user.id != 0)
    }
}

/// The `user` object embedded in initData.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl WebAppUser {
    /// Profile name: "first last", else "@username", else "tg:<id>".
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        let full = format!("{} {}", first, last).trim().to_string();
        if !full.is_empty() {
            return full;
        }

        match self.username.as_deref() {
            Some(username) if !username.is_empty() => format!("@{}", username),
            _ => format!("tg:{}", self.id),
        }
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.photo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

/// Verify `raw` against `bot_token` using the system clock.
///
/// A zero `max_age` disables the freshness check.
pub fn verify(raw: &str, bot_token: &[u8], max_age: Duration) -> Result<InitData, InitDataError> {
    verify_at(raw, bot_token, max_age, SystemTime::now())
}

/// Verify `raw` against `bot_token` as of `now`.
pub fn verify_at(
    raw: &str,
    bot_token: &[u8],
    max_age: Duration,
    now: SystemTime,
) -> Result<InitData, InitDataError> {
    let fields = parse(raw)?;

    let hash = match fields.get(HASH_FIELD) {
        Some(hash) if !hash.is_empty() => hash,
        _ => return Err(InitDataError::MissingSignature),
    };

    if !max_age.is_zero() {
        check_freshness(&fields, max_age, now)?;
    }

    let expected = sign(&fields, bot_token);
    if !bool::from(expected.as_bytes().ct_eq(hash.as_bytes())) {
        return Err(InitDataError::BadSignature);
    }

    Ok(InitData { fields })
}

/// Compute the lowercase hex signature Telegram would attach to `fields`.
///
/// A `hash` entry in `fields` is ignored.
pub fn sign(fields: &BTreeMap<String, String>, bot_token: &[u8]) -> String {
    let secret_key = hmac_sha256(WEB_APP_DATA, bot_token);
    let signature = hmac_sha256(&secret_key, data_check_string(fields).as_bytes());
    hex::encode(signature)
}

/// Canonical `key=value` lines, sorted by key, `hash` excluded.
pub fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .filter(|(key, _)| key.as_str() != HASH_FIELD)
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_freshness(
    fields: &BTreeMap<String, String>,
    max_age: Duration,
    now: SystemTime,
) -> Result<(), InitDataError> {
    let auth_date = fields
        .get(AUTH_DATE_FIELD)
        .filter(|value| !value.is_empty())
        .ok_or(InitDataError::MissingTimestamp)?;
    let auth_date: i64 = auth_date
        .parse()
        .map_err(|_| InitDataError::BadTimestamp)?;

    let now = now
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as i64);

    // Clock skew in either direction counts against the same window.
    let age = now.saturating_sub(auth_date).unsigned_abs();
    if age > max_age.as_secs() {
        return Err(InitDataError::Expired);
    }

    Ok(())
}

/// Decode the query string. Duplicate keys keep the last value.
fn parse(raw: &str) -> Result<BTreeMap<String, String>, InitDataError> {
    check_encoding(raw)?;

    Ok(url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect())
}

/// Reject stray `%` escapes and `;` separators.
fn check_encoding(raw: &str) -> Result<(), InitDataError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
                if !escaped {
                    return Err(InitDataError::MalformedInput);
                }
                i += 3;
            }
            b';' => return Err(InitDataError::MalformedInput),
            _ => i += 1,
        }
    }
    Ok(())
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}
