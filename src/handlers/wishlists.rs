//! Wishlist CRUD and item bookings.
//!
//! Reads and bookings are public. Everything else requires the owner's token.

use super::{AppState, users::current_user};
use crate::{
    Error, Result,
    auth::RequireAuth,
    wishlist::{
        BookItemRequest, BookItemResponse, Booking, BookingRef, CancelBookingRequest,
        CreateItemRequest, CreateWishlistRequest, UpdateItemRequest, UpdateWishlistRequest,
        Wishlist, WishlistItem, WishlistList, validation,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn list_wishlists(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<Json<WishlistList>> {
    current_user(&state, user_id).await?;
    let wishlists = state.wishlists.list_by_owner(user_id).await?;
    Ok(Json(WishlistList { wishlists }))
}

pub async fn create_wishlist(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Json(req): Json<CreateWishlistRequest>,
) -> Result<(StatusCode, Json<Wishlist>)> {
    current_user(&state, user_id).await?;
    validation::validate_create_wishlist(&req)?;

    let wishlist = Wishlist::new(user_id, req);
    state.wishlists.create(&wishlist).await?;

    tracing::info!(user_id = %user_id, wishlist_id = %wishlist.id, "wishlist created");
    Ok((StatusCode::CREATED, Json(wishlist)))
}

pub async fn get_wishlist(
    State(state): State<AppState>,
    Path(wishlist_id): Path<Uuid>,
) -> Result<Json<Wishlist>> {
    Ok(Json(state.wishlists.get(wishlist_id).await?))
}

pub async fn update_wishlist(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(wishlist_id): Path<Uuid>,
    Json(req): Json<UpdateWishlistRequest>,
) -> Result<Json<Wishlist>> {
    require_owner(&state, wishlist_id, user_id).await?;
    validation::validate_update_wishlist(&req)?;

    let wishlist = state.wishlists.update(wishlist_id, user_id, req).await?;
    Ok(Json(wishlist))
}

/// Someone else's wishlist answers 404, same as a missing one.
pub async fn delete_wishlist(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(wishlist_id): Path<Uuid>,
) -> Result<StatusCode> {
    current_user(&state, user_id).await?;
    state.wishlists.delete(wishlist_id, user_id).await?;

    tracing::info!(user_id = %user_id, wishlist_id = %wishlist_id, "wishlist deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(wishlist_id): Path<Uuid>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<WishlistItem>)> {
    require_owner(&state, wishlist_id, user_id).await?;
    validation::validate_create_item(&req)?;

    let item = state
        .wishlists
        .add_item(wishlist_id, user_id, WishlistItem::new(req))
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path((wishlist_id, item_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<WishlistItem>> {
    require_owner(&state, wishlist_id, user_id).await?;
    validation::validate_update_item(&req)?;

    let item = state
        .wishlists
        .update_item(wishlist_id, item_id, user_id, req)
        .await?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path((wishlist_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    require_owner(&state, wishlist_id, user_id).await?;
    state
        .wishlists
        .delete_item(wishlist_id, item_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Book an item as a guest. The response is the only copy of the cancellation token.
pub async fn book_item(
    State(state): State<AppState>,
    Path((wishlist_id, item_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<BookItemRequest>,
) -> Result<(StatusCode, Json<BookItemResponse>)> {
    validation::validate_booking(&req)?;

    let booking = state
        .wishlists
        .book_item(wishlist_id, item_id, Booking::new(req))
        .await?;

    tracing::info!(wishlist_id = %wishlist_id, item_id = %item_id, "item booked");
    Ok((StatusCode::CREATED, Json(booking.receipt())))
}

/// Guest cancels their own booking with the token they were given.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path((wishlist_id, item_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<StatusCode> {
    let token = req.cancellation_token.trim();
    if token.is_empty() {
        return Err(Error::InvalidInput("cancellationToken is required".to_string()));
    }

    state
        .wishlists
        .unbook_item(wishlist_id, item_id, BookingRef::Token(token.to_string()))
        .await?;

    tracing::info!(wishlist_id = %wishlist_id, item_id = %item_id, "booking cancelled");
    Ok(StatusCode::NO_CONTENT)
}

/// Owner clears a booking by its public id.
pub async fn remove_booking(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path((wishlist_id, item_id, booking_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode> {
    require_owner(&state, wishlist_id, user_id).await?;
    state
        .wishlists
        .unbook_item(wishlist_id, item_id, BookingRef::Id(booking_id))
        .await?;

    tracing::info!(wishlist_id = %wishlist_id, item_id = %item_id, "booking removed by owner");
    Ok(StatusCode::NO_CONTENT)
}

/// 404 for a missing wishlist, 403 when the caller does not own it.
async fn require_owner(state: &AppState, wishlist_id: Uuid, user_id: Uuid) -> Result<()> {
    current_user(state, user_id).await?;
    let wishlist = state.wishlists.get(wishlist_id).await?;
    if wishlist.user_id != user_id {
        tracing::warn!(user_id = %user_id, wishlist_id = %wishlist_id, "not the wishlist owner");
        return Err(Error::PermissionDenied);
    }
    Ok(())
}
