mod auth;
mod health;
mod users;
mod webhook;
mod wishlists;

pub use auth::{telegram_auth, telegram_bot_auth, validate_token};
pub use health::health;
pub use users::{get_me, get_user, update_me};
pub use webhook::webhook;
pub use wishlists::{
    add_item, book_item, cancel_booking, create_wishlist, delete_item, delete_wishlist,
    get_wishlist, list_wishlists, remove_booking, update_item, update_wishlist,
};

use crate::{
    auth::TokenIssuer,
    bot::Bot,
    store::{UserStore, WishlistStore},
};
use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub wishlists: Arc<dyn WishlistStore>,
    pub tokens: TokenIssuer,
    /// Verifies `initData` and authenticates the bot itself; Telegram login
    /// answers 500 while unset.
    pub telegram_bot_token: Option<String>,
    /// Zero disables the `auth_date` freshness check.
    pub init_data_max_age: Duration,
    pub bot: Option<Arc<Bot>>,
    pub webhook_secret: Option<String>,
    pub webhook_route: String,
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Build the service router. The webhook is only mounted when a bot is configured.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/auth/telegram", post(telegram_auth))
        .route("/auth/telegram-bot", post(telegram_bot_auth))
        .route("/auth/validate", post(validate_token))
        .route("/users/me", get(get_me).put(update_me))
        .route("/users/:user_id", get(get_user))
        .route("/wishlists", get(list_wishlists).post(create_wishlist))
        .route(
            "/wishlists/:wishlist_id",
            get(get_wishlist).put(update_wishlist).delete(delete_wishlist),
        )
        .route("/wishlists/:wishlist_id/items", post(add_item))
        .route(
            "/wishlists/:wishlist_id/items/:item_id",
            put(update_item).delete(delete_item),
        )
        .route(
            "/wishlists/:wishlist_id/items/:item_id/booking",
            post(book_item).delete(cancel_booking),
        )
        .route(
            "/wishlists/:wishlist_id/items/:item_id/booking/:booking_id",
            delete(remove_booking),
        )
        .route("/health", get(health));

    if state.bot.is_some() {
        router = router.route(&state.webhook_route, post(webhook));
    }

    router.with_state(state)
}
