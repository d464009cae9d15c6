//! Record storage.
//!
//! Users are keyed by their own UUID and, once they log in through Telegram,
//! additionally by their numeric Telegram id. Wishlists are keyed by id and
//! carry their owner's user id.
//!
//! # Implementations
//!
//! - [`MemoryUserStore`] - process-local user store
//! - [`MemoryWishlistStore`] - process-local wishlist store

mod memory;
mod wishlists;

pub use memory::MemoryUserStore;
pub use wishlists::MemoryWishlistStore;

use crate::{
    Result,
    types::User,
    wishlist::{
        Booking, BookingRef, UpdateItemRequest, UpdateWishlistRequest, Wishlist, WishlistItem,
    },
};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage backend trait for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by id, `Error::NotFound` when absent
    async fn get(&self, id: Uuid) -> Result<User>;

    /// Fetch the user linked to a Telegram account
    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>>;

    /// Insert or replace a user
    async fn upsert(&self, user: &User) -> Result<()>;

    /// Insert or replace a user and link it to a Telegram account
    async fn upsert_with_telegram_id(&self, user: &User, telegram_id: i64) -> Result<()>;
}

/// Storage backend trait for wishlists.
///
/// Owner-scoped operations answer `Error::NotFound` both when the wishlist is
/// missing and when it belongs to someone else.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    async fn create(&self, wishlist: &Wishlist) -> Result<()>;

    /// Fetch a wishlist by id regardless of owner
    async fn get(&self, id: Uuid) -> Result<Wishlist>;

    /// Wishlists of one owner, oldest first
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Wishlist>>;

    async fn update(&self, id: Uuid, owner: Uuid, changes: UpdateWishlistRequest)
    -> Result<Wishlist>;

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<()>;

    async fn add_item(&self, id: Uuid, owner: Uuid, item: WishlistItem) -> Result<WishlistItem>;

    async fn update_item(
        &self,
        id: Uuid,
        item_id: Uuid,
        owner: Uuid,
        changes: UpdateItemRequest,
    ) -> Result<WishlistItem>;

    async fn delete_item(&self, id: Uuid, item_id: Uuid, owner: Uuid) -> Result<()>;

    /// Attach a booking, `Error::Conflict` when the item is already booked
    async fn book_item(&self, id: Uuid, item_id: Uuid, booking: Booking) -> Result<Booking>;

    /// Remove the booking `by` refers to, `Error::NotFound` when it does not match
    async fn unbook_item(&self, id: Uuid, item_id: Uuid, by: BookingRef) -> Result<()>;
}
