use super::WishlistStore;
use crate::{
    Error, Result,
    wishlist::{
        Booking, BookingRef, UpdateItemRequest, UpdateWishlistRequest, Wishlist, WishlistItem,
    },
};
use async_trait::async_trait;
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryWishlistStore {
    wishlists: RwLock<HashMap<Uuid, Wishlist>>,
}

impl MemoryWishlistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn wishlist_not_found(id: Uuid) -> Error {
    Error::NotFound(format!("wishlist {}", id))
}

fn item_not_found(id: Uuid) -> Error {
    Error::NotFound(format!("item {}", id))
}

fn owned(
    wishlists: &mut HashMap<Uuid, Wishlist>,
    id: Uuid,
    owner: Uuid,
) -> Result<&mut Wishlist> {
    wishlists
        .get_mut(&id)
        .filter(|w| w.user_id == owner)
        .ok_or_else(|| wishlist_not_found(id))
}

#[async_trait]
impl WishlistStore for MemoryWishlistStore {
    async fn create(&self, wishlist: &Wishlist) -> Result<()> {
        self.wishlists
            .write()
            .await
            .insert(wishlist.id, wishlist.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Wishlist> {
        self.wishlists
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| wishlist_not_found(id))
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Wishlist>> {
        let mut found: Vec<Wishlist> = self
            .wishlists
            .read()
            .await
            .values()
            .filter(|w| w.user_id == owner)
            .cloned()
            .collect();
        found.sort_by_key(|w| w.created_at);
        Ok(found)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: UpdateWishlistRequest,
    ) -> Result<Wishlist> {
        let mut wishlists = self.wishlists.write().await;
        let wishlist = owned(&mut wishlists, id, owner)?;

        if let Some(title) = changes.title {
            wishlist.title = title;
        }
        if let Some(description) = changes.description {
            wishlist.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        wishlist.updated_at = OffsetDateTime::now_utc();
        Ok(wishlist.clone())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<()> {
        let mut wishlists = self.wishlists.write().await;
        owned(&mut wishlists, id, owner)?;
        wishlists.remove(&id);
        Ok(())
    }

    async fn add_item(&self, id: Uuid, owner: Uuid, item: WishlistItem) -> Result<WishlistItem> {
        let mut wishlists = self.wishlists.write().await;
        let wishlist = owned(&mut wishlists, id, owner)?;
        wishlist.items.push(item.clone());
        wishlist.updated_at = item.created_at;
        Ok(item)
    }

    async fn update_item(
        &self,
        id: Uuid,
        item_id: Uuid,
        owner: Uuid,
        changes: UpdateItemRequest,
    ) -> Result<WishlistItem> {
        let mut wishlists = self.wishlists.write().await;
        let wishlist = owned(&mut wishlists, id, owner)?;
        let now = OffsetDateTime::now_utc();

        let item = wishlist
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(item_id))?;
        if let Some(kind) = changes.r#type {
            item.r#type = kind;
        }
        if let Some(data) = changes.data {
            item.data = data;
        }
        item.updated_at = now;
        let updated = item.clone();

        wishlist.updated_at = now;
        Ok(updated)
    }

    async fn delete_item(&self, id: Uuid, item_id: Uuid, owner: Uuid) -> Result<()> {
        let mut wishlists = self.wishlists.write().await;
        let wishlist = owned(&mut wishlists, id, owner)?;

        let before = wishlist.items.len();
        wishlist.items.retain(|item| item.id != item_id);
        if wishlist.items.len() == before {
            return Err(item_not_found(item_id));
        }
        wishlist.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn book_item(&self, id: Uuid, item_id: Uuid, booking: Booking) -> Result<Booking> {
        let mut wishlists = self.wishlists.write().await;
        let wishlist = wishlists
            .get_mut(&id)
            .ok_or_else(|| wishlist_not_found(id))?;
        let item = wishlist
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(item_id))?;

        if item.booking.is_some() {
            return Err(Error::Conflict("item is already booked".to_string()));
        }
        item.booking = Some(booking.clone());
        item.updated_at = booking.booked_at;
        Ok(booking)
    }

    async fn unbook_item(&self, id: Uuid, item_id: Uuid, by: BookingRef) -> Result<()> {
        let mut wishlists = self.wishlists.write().await;
        let wishlist = wishlists
            .get_mut(&id)
            .ok_or_else(|| wishlist_not_found(id))?;
        let item = wishlist
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(item_id))?;

        if !item.booking.as_ref().is_some_and(|b| by.matches(b)) {
            return Err(Error::NotFound("booking".to_string()));
        }
        item.booking = None;
        item.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }
}
