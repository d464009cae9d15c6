use clap::Parser;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wili::{
    Config,
    auth::TokenIssuer,
    bot::Bot,
    handlers::{AppState, create_router},
    store::{MemoryUserStore, MemoryWishlistStore, UserStore, WishlistStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.jwt_secret.trim().is_empty() {
        anyhow::bail!("JWT_SECRET must not be empty");
    }

    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let wishlists: Arc<dyn WishlistStore> = Arc::new(MemoryWishlistStore::new());
    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl());
    let bot_token = config.bot_token();

    if bot_token.is_none() {
        tracing::warn!("TELEGRAM_BOT_TOKEN not set; Telegram login is disabled");
    }

    let bot = build_bot(&config, users.clone(), wishlists.clone(), tokens.clone())?;

    let state = AppState {
        users,
        wishlists,
        tokens,
        telegram_bot_token: bot_token,
        init_data_max_age: config.init_data_max_age(),
        bot,
        webhook_secret: config.webhook_secret(),
        webhook_route: config.webhook_route(),
    };

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let app = if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting wili server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "http")]
fn build_bot(
    config: &Config,
    users: Arc<dyn UserStore>,
    store: Arc<dyn WishlistStore>,
    tokens: TokenIssuer,
) -> anyhow::Result<Option<Arc<Bot>>> {
    use wili::telegram::{
        WishlistApi,
        http::{HttpBotApi, HttpWishlistApi, build_client},
        local::StoreWishlistApi,
    };

    let (Some(bot_token), Some(links)) = (config.bot_token(), config.bot_links()) else {
        tracing::info!("Bot webhook disabled: bot token or Mini App/web URLs missing");
        return Ok(None);
    };

    let client = build_client()?;
    let api = Arc::new(HttpBotApi::new(client.clone(), bot_token));
    let wishlists: Arc<dyn WishlistApi> = match config.wishlist_api_url() {
        Some(url) => {
            tracing::info!("Bot reads wishlists from {}", url);
            Arc::new(HttpWishlistApi::new(client, url))
        }
        None => Arc::new(StoreWishlistApi::new(store, tokens.clone())),
    };

    tracing::info!("Bot webhook enabled on {}", config.webhook_route());
    Ok(Some(Arc::new(Bot::new(links, api, wishlists, users, tokens))))
}

#[cfg(not(feature = "http"))]
fn build_bot(
    _config: &Config,
    _users: Arc<dyn UserStore>,
    _store: Arc<dyn WishlistStore>,
    _tokens: TokenIssuer,
) -> anyhow::Result<Option<Arc<Bot>>> {
    tracing::info!("Bot webhook disabled: built without the `http` feature");
    Ok(None)
}
