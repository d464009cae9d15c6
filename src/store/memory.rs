use super::UserStore;
use crate::{Error, Result, types::User};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    telegram_links: HashMap<i64, Uuid>,
}

#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: Uuid) -> Result<User> {
        self.inner
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .telegram_links
            .get(&telegram_id)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn upsert(&self, user: &User) -> Result<()> {
        self.inner
            .write()
            .await
            .users
            .insert(user.id, user.clone());
        Ok(())
    }

    async fn upsert_with_telegram_id(&self, user: &User, telegram_id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user.clone());
        inner.telegram_links.insert(telegram_id, user.id);
        Ok(())
    }
}
