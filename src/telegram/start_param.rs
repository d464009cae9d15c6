//! Deep-link payload routing.
//!
//! A bot's `/start <payload>` argument decides which first-contact flow runs.

use regex::Regex;
use std::sync::LazyLock;

const LIST_PREFIX: &str = "list_";
const SHARE_PREFIX: &str = "share_";
const WEBAUTH_PREFIX: &str = "webauth_";
const INLINE_WISHLIST_PREFIX: &str = "wishlist:";

const WEBAUTH_STATE_MIN: usize = 8;
const WEBAUTH_STATE_MAX: usize = 32;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern is valid")
});

/// Flow selected by a start payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartParam {
    /// Preview a wishlist.
    List(String),
    /// Offer to share a wishlist into another chat.
    Share(String),
    /// Log in to the website; carries the browser's state token.
    WebAuth(String),
    /// Unrecognized payload.
    None,
}

impl StartParam {
    /// Route a payload. Total: anything unrecognized maps to [`StartParam::None`].
    pub fn parse(payload: &str) -> Self {
        if let Some(id) = payload.strip_prefix(LIST_PREFIX) {
            return canonical_uuid(id).map_or(StartParam::None, StartParam::List);
        }

        if let Some(id) = payload.strip_prefix(SHARE_PREFIX) {
            return canonical_uuid(id).map_or(StartParam::None, StartParam::Share);
        }

        if let Some(state) = payload.strip_prefix(WEBAUTH_PREFIX) {
            let len = state.chars().count();
            if (WEBAUTH_STATE_MIN..=WEBAUTH_STATE_MAX).contains(&len) {
                return StartParam::WebAuth(state.to_string());
            }
        }

        StartParam::None
    }
}

/// Payload of a `/start` command, or `""` when there is none.
pub fn extract_start_param(text: &str) -> &str {
    if !text.starts_with("/start") {
        return "";
    }

    text.split_once(' ')
        .map(|(_, payload)| payload.trim())
        .unwrap_or_default()
}

/// Wishlist id referenced by an inline query (`wishlist:<uuid>` or `list_<uuid>`).
pub fn parse_inline_query(query: &str) -> Option<String> {
    let query = query.trim();

    if let Some(id) = query.strip_prefix(INLINE_WISHLIST_PREFIX) {
        return canonical_uuid(id);
    }

    match StartParam::parse(query) {
        StartParam::List(id) => Some(id),
        _ => None,
    }
}

fn canonical_uuid(candidate: &str) -> Option<String> {
    UUID_RE
        .is_match(candidate)
        .then(|| candidate.to_string())
}
