use super::AppState;
use crate::{
    Error, Result,
    auth::{init_data, secrets_match},
    types::{
        AuthResponse, TelegramAuthRequest, TelegramBotAuthRequest, User, ValidateTokenRequest,
        ValidateTokenResponse,
    },
};
use axum::{Json, body::Bytes, extract::State, http::HeaderMap};

/// Header the bot uses to authenticate itself on `/auth/telegram-bot`.
pub const BOT_TOKEN_HEADER: &str = "x-wili-bot-token";

/// Log in with Telegram Mini App `initData`.
pub async fn telegram_auth(
    State(state): State<AppState>,
    Json(req): Json<TelegramAuthRequest>,
) -> Result<Json<AuthResponse>> {
    let raw = req.init_data.trim();
    if raw.is_empty() {
        return Err(Error::InvalidInput("initData is required".to_string()));
    }

    let bot_token = state
        .telegram_bot_token
        .as_deref()
        .ok_or_else(|| Error::Internal("telegram bot token is not configured".to_string()))?;

    let init_data = init_data::verify(raw, bot_token.as_bytes(), state.init_data_max_age)?;
    let tg_user = init_data.user().ok_or_else(|| {
        tracing::debug!("initData carries no usable user");
        Error::InvalidAuthentication
    })?;

    let display_name = tg_user.display_name();
    let avatar_url = tg_user.avatar_url();

    let user = match state.users.get_by_telegram_id(tg_user.id).await? {
        Some(existing) => User {
            display_name,
            avatar_url,
            ..existing
        },
        None => User {
            avatar_url,
            ..User::new(display_name)
        },
    };
    state.users.upsert_with_telegram_id(&user, tg_user.id).await?;

    tracing::info!(user_id = %user.id, telegram_id = tg_user.id, "telegram login");
    issue_response(&state, user)
}

/// Issue a token for the user linked to a Telegram account, on behalf of the bot.
pub async fn telegram_bot_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AuthResponse>> {
    let provided = headers
        .get(BOT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let authorized = state
        .telegram_bot_token
        .as_deref()
        .is_some_and(|expected| secrets_match(expected, provided));
    if !authorized {
        tracing::warn!("rejected bot auth request");
        return Err(Error::PermissionDenied);
    }

    // Only decoded once the caller is known to be the bot.
    let req: TelegramBotAuthRequest = serde_json::from_slice(&body)
        .map_err(|e| Error::InvalidInput(format!("invalid request body: {}", e)))?;

    let user = state
        .users
        .get_by_telegram_id(req.telegram_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("telegram user {}", req.telegram_id)))?;

    issue_response(&state, user)
}

/// Check a token. Always answers 200; `valid` carries the verdict.
pub async fn validate_token(
    State(state): State<AppState>,
    Json(req): Json<ValidateTokenRequest>,
) -> Json<ValidateTokenResponse> {
    let user = match state.tokens.validate(&req.token) {
        Ok(user_id) => state.users.get(user_id).await.ok(),
        Err(_) => None,
    };

    Json(match user {
        Some(user) => ValidateTokenResponse { valid: true, user },
        None => ValidateTokenResponse {
            valid: false,
            user: User::empty(),
        },
    })
}

fn issue_response(state: &AppState, user: User) -> Result<Json<AuthResponse>> {
    let issued = state.tokens.issue(user.id)?;
    Ok(Json(AuthResponse {
        access_token: issued.token,
        expires_in: issued.expires_in,
        user,
    }))
}
