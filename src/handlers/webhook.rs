use super::AppState;
use crate::{Error, Result, auth::secrets_match, telegram::types::Update};
use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode};

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Telegram webhook. Bot failures are logged and still acknowledged, so
/// Telegram does not redeliver the update.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    if let Some(expected) = state.webhook_secret.as_deref() {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !secrets_match(expected, provided) {
            tracing::warn!("webhook secret mismatch");
            return Err(Error::PermissionDenied);
        }
    }

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| Error::InvalidInput(format!("undecodable update: {}", e)))?;

    let Some(bot) = state.bot.as_ref() else {
        return Ok(StatusCode::OK);
    };

    let update_id = update.update_id;
    if let Err(e) = bot.handle_update(update).await {
        tracing::error!(update_id, "failed to handle update: {}", e);
    }

    Ok(StatusCode::OK)
}
