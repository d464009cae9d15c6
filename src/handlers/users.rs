use super::AppState;
use crate::{
    Error, Result,
    auth::RequireAuth,
    types::{UpdateUserRequest, User},
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

pub async fn get_me(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<Json<User>> {
    Ok(Json(current_user(&state, user_id).await?))
}

/// Apply a partial profile update to the caller.
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Json(update): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let mut user = current_user(&state, user_id).await?;

    if let Some(display_name) = update.display_name {
        user.display_name = display_name;
    }
    if let Some(avatar_url) = update.avatar_url {
        user.avatar_url = Some(avatar_url);
    }

    state.users.upsert(&user).await?;
    tracing::info!(user_id = %user.id, "profile updated");
    Ok(Json(user))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>> {
    Ok(Json(state.users.get(user_id).await?))
}

/// A valid token for a user that no longer exists is an authentication failure.
pub(super) async fn current_user(state: &AppState, user_id: Uuid) -> Result<User> {
    state.users.get(user_id).await.map_err(|e| match e {
        Error::NotFound(_) => Error::InvalidAuthentication,
        other => other,
    })
}
