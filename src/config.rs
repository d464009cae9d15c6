use crate::bot::BotLinks;
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "wili")]
#[command(about = "Wili backend: Telegram Mini App auth, user profiles, wishlists and bot webhook")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "WILI_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "WILI_PORT", default_value = "8080")]
    pub port: u16,

    /// Enable CORS for all origins
    #[arg(long, env = "WILI_CORS", default_value = "false")]
    pub cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Secret used to sign access tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in seconds (default: 10 years)
    #[arg(long, env = "WILI_TOKEN_TTL", default_value = "315360000")]
    pub token_ttl: u64,

    /// Telegram bot token; enables Telegram login and the bot webhook
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Maximum initData age in seconds; 0 disables the check
    #[arg(long, env = "TELEGRAM_INIT_DATA_MAX_AGE", default_value = "86400")]
    pub init_data_max_age: u64,

    /// External wishlist collection URL for the bot (e.g. https://api.wili.me/wishlists)
    #[arg(long, env = "WISHLIST_API_BASE_URL")]
    pub wishlist_api_base_url: Option<String>,

    /// Mini App URL
    #[arg(long, env = "TELEGRAM_WEBAPP_URL")]
    pub webapp_url: Option<String>,

    /// Public website URL used for fallback links
    #[arg(long, env = "WISHES_WEB_URL")]
    pub web_url: Option<String>,

    /// Website root for the Telegram login callback (default: web URL without `/wishlists`)
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Username of the bot hosting the Mini App
    #[arg(long, env = "TELEGRAM_MINIAPP_BOT_USERNAME")]
    pub miniapp_bot_username: Option<String>,

    /// Short name of the Mini App
    #[arg(long, env = "TELEGRAM_MINIAPP_NAME")]
    pub miniapp_name: Option<String>,

    /// Path the bot webhook is served on
    #[arg(long, env = "WEBHOOK_PATH", default_value = "webhook")]
    pub webhook_path: String,

    /// Expected X-Telegram-Bot-Api-Secret-Token header value
    #[arg(long, env = "WEBHOOK_SECRET_TOKEN", hide_env_values = true)]
    pub webhook_secret_token: Option<String>,
}

impl Config {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl)
    }

    pub fn init_data_max_age(&self) -> Duration {
        Duration::from_secs(self.init_data_max_age)
    }

    /// Bot token with surrounding whitespace removed, if set.
    pub fn bot_token(&self) -> Option<String> {
        non_blank(self.telegram_bot_token.as_deref())
    }

    pub fn webhook_secret(&self) -> Option<String> {
        non_blank(self.webhook_secret_token.as_deref())
    }

    /// Route the webhook is mounted on.
    pub fn webhook_route(&self) -> String {
        format!("/{}", self.webhook_path.trim().trim_start_matches('/'))
    }

    /// External wishlist service the bot reads from; unset means this process's own store.
    pub fn wishlist_api_url(&self) -> Option<String> {
        non_blank(self.wishlist_api_base_url.as_deref()).map(trim_url)
    }

    /// Links for the bot, or `None` when the Mini App or website URL is missing.
    pub fn bot_links(&self) -> Option<BotLinks> {
        let webapp_url = trim_url(non_blank(self.webapp_url.as_deref())?);
        let web_fallback_url = trim_url(non_blank(self.web_url.as_deref())?);
        let frontend_url = non_blank(self.frontend_url.as_deref())
            .map(trim_url)
            .unwrap_or_else(|| {
                web_fallback_url
                    .trim_end_matches("/wishlists")
                    .to_string()
            });

        Some(BotLinks {
            webapp_url,
            web_fallback_url,
            frontend_url,
            miniapp_bot: non_blank(self.miniapp_bot_username.as_deref()),
            miniapp_name: non_blank(self.miniapp_name.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
