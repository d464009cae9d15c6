//! Outbound collaborators of the bot.
//!
//! The Telegram Bot API and the wishlist API are remote services; the bot only
//! sees them through these traits so that handlers can be exercised without a
//! network.

use super::types::{AnswerInlineQuery, SendMessage, Wishlist, WishlistSummary};
use crate::Result;
use async_trait::async_trait;

/// Telegram Bot API methods the bot calls.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn send_message(&self, message: &SendMessage) -> Result<()>;

    async fn answer_inline_query(&self, answer: &AnswerInlineQuery) -> Result<()>;
}

/// Read access to the wishlist service.
#[async_trait]
pub trait WishlistApi: Send + Sync {
    /// Fetch a wishlist by id (public read).
    async fn get_wishlist(&self, id: &str) -> Result<Wishlist>;

    /// List the wishlists owned by the holder of `access_token`.
    async fn list_wishlists(&self, access_token: &str) -> Result<Vec<WishlistSummary>>;
}
