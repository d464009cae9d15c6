//! Wishlists, their items and anonymous bookings.
//!
//! A wishlist belongs to one user and is readable by anyone who has its id.
//! Guests book items without an account: a booking hands back a
//! cancellation token that is the only way for the guest to undo it. The
//! owner can clear a booking by its public booking id.

pub mod validation;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<WishlistItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Wishlist {
    pub fn new(owner: Uuid, req: CreateWishlistRequest) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title: req.title,
            description: req.description,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn item(&self, item_id: Uuid) -> Option<&WishlistItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: Uuid) -> Option<&mut WishlistItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: Uuid,
    pub r#type: String,
    pub data: ItemData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl WishlistItem {
    pub fn new(req: CreateItemRequest) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            r#type: req.r#type,
            data: req.data,
            booking: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Item payload. Keys other than `name`, `description` and `url` are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A guest's claim on an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: Uuid,
    #[serde(skip)]
    pub cancellation_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booker_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub booked_at: OffsetDateTime,
}

impl Booking {
    /// Blank `bookerName`/`message` are stored as absent.
    pub fn new(req: BookItemRequest) -> Self {
        Self {
            booking_id: Uuid::new_v4(),
            cancellation_token: Uuid::new_v4().to_string(),
            booker_name: non_blank(req.booker_name),
            message: non_blank(req.message),
            booked_at: OffsetDateTime::now_utc(),
        }
    }

    /// Response for the guest who made the booking; the only place the token is revealed.
    pub fn receipt(&self) -> BookItemResponse {
        BookItemResponse {
            booking_id: self.booking_id,
            cancellation_token: self.cancellation_token.clone(),
            booker_name: self.booker_name.clone(),
            message: self.message.clone(),
            booked_at: self.booked_at,
        }
    }
}

/// How a booking is identified when it is removed.
#[derive(Debug, Clone)]
pub enum BookingRef {
    /// Public booking id, used by the wishlist owner.
    Id(Uuid),
    /// Secret token handed to the guest at booking time.
    Token(String),
}

impl BookingRef {
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            BookingRef::Id(id) => booking.booking_id == *id,
            BookingRef::Token(token) => {
                crate::auth::secrets_match(&booking.cancellation_token, token)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWishlistRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWishlistRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub data: ItemData,
}

/// Partial item update; `data` replaces the whole payload when present.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub r#type: Option<String>,
    pub data: Option<ItemData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookItemRequest {
    pub booker_name: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookItemResponse {
    pub booking_id: Uuid,
    pub cancellation_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booker_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub booked_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub cancellation_token: String,
}

#[derive(Debug, Serialize)]
pub struct WishlistList {
    pub wishlists: Vec<Wishlist>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
