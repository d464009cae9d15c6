//! Telegram bot plumbing: wire types, deep-link routing, message templates and
//! the outbound API seams.

pub mod api;
#[cfg(feature = "http")]
pub mod http;
pub mod local;
pub mod messages;
pub mod start_param;
pub mod types;

pub use api::{BotApi, WishlistApi};
pub use messages::{Lang, MessageKey};
pub use start_param::StartParam;
