//! [`WishlistApi`] served from this process's own wishlist store.

use super::api::WishlistApi;
use super::types::{Wishlist, WishlistSummary};
use crate::{Error, Result, auth::TokenIssuer, store::WishlistStore};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct StoreWishlistApi {
    wishlists: Arc<dyn WishlistStore>,
    tokens: TokenIssuer,
}

impl StoreWishlistApi {
    pub fn new(wishlists: Arc<dyn WishlistStore>, tokens: TokenIssuer) -> Self {
        Self { wishlists, tokens }
    }
}

#[async_trait]
impl WishlistApi for StoreWishlistApi {
    async fn get_wishlist(&self, id: &str) -> Result<Wishlist> {
        let id = Uuid::parse_str(id).map_err(|_| Error::NotFound(format!("wishlist {}", id)))?;
        let wishlist = self.wishlists.get(id).await?;
        Ok(Wishlist {
            title: wishlist.title,
            description: wishlist.description,
        })
    }

    async fn list_wishlists(&self, access_token: &str) -> Result<Vec<WishlistSummary>> {
        let owner = self.tokens.validate(access_token)?;
        Ok(self
            .wishlists
            .list_by_owner(owner)
            .await?
            .into_iter()
            .map(|w| WishlistSummary {
                id: w.id.to_string(),
                title: w.title,
                description: w.description,
            })
            .collect())
    }
}
