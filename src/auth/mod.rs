//! Authentication for the user service.
//!
//! This module provides:
//! - Telegram WebApp `initData` verification (HMAC-SHA256, constant-time compare)
//! - HS256 access tokens issued after a successful login
//! - A Bearer token extractor for protected handlers

mod extractor;
pub mod init_data;
mod jwt;

pub use extractor::RequireAuth;
pub use init_data::{InitData, InitDataError, WebAppUser};
pub use jwt::{Claims, IssuedToken, TokenIssuer};

use subtle::ConstantTimeEq;

/// Compare two shared secrets without leaking the mismatch position.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
