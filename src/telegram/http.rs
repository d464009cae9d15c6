//! reqwest-backed implementations of the bot's collaborators.

use super::api::{BotApi, WishlistApi};
use super::types::{AnswerInlineQuery, SendMessage, Wishlist, WishlistList, WishlistSummary};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Build the shared outbound client.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::Internal(format!("failed to create HTTP client: {}", e)))
}

/// Telegram Bot API over HTTPS.
pub struct HttpBotApi {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl HttpBotApi {
    pub fn new(client: Client, bot_token: String) -> Self {
        Self::with_api_base(client, TELEGRAM_API_BASE.to_string(), bot_token)
    }

    /// Point the client at a different Bot API server (e.g. a local one).
    pub fn with_api_base(client: Client, api_base: String, bot_token: String) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    async fn call<T: Serialize + Sync>(&self, method: &str, body: &T) -> Result<()> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("telegram {} request failed: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "telegram {} status {} body={}",
                method,
                status.as_u16(),
                body.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl BotApi for HttpBotApi {
    async fn send_message(&self, message: &SendMessage) -> Result<()> {
        self.call("sendMessage", message).await
    }

    async fn answer_inline_query(&self, answer: &AnswerInlineQuery) -> Result<()> {
        self.call("answerInlineQuery", answer).await
    }
}

/// Wishlist service client rooted at its collection URL (e.g. `https://api.wili.me/wishlists`).
pub struct HttpWishlistApi {
    client: Client,
    base_url: String,
}

impl HttpWishlistApi {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WishlistApi for HttpWishlistApi {
    async fn get_wishlist(&self, id: &str) -> Result<Wishlist> {
        let url = format!("{}/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("wishlist request failed: {}", e)))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(Error::NotFound(id.to_string())),
            status => {
                return Err(Error::Upstream(format!(
                    "wishlist api status {}",
                    status.as_u16()
                )));
            }
        }

        response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("failed to decode wishlist: {}", e)))
    }

    async fn list_wishlists(&self, access_token: &str) -> Result<Vec<WishlistSummary>> {
        let response = self
            .client
            .get(&self.base_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("wishlist list request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "wishlist api status {}",
                response.status().as_u16()
            )));
        }

        let list: WishlistList = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("failed to decode wishlist list: {}", e)))?;

        Ok(list.wishlists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let api = HttpBotApi::with_api_base(
            Client::new(),
            "http://localhost:8081/".to_string(),
            "123:ABC".to_string(),
        );
        assert_eq!(
            api.method_url("sendMessage"),
            "http://localhost:8081/bot123:ABC/sendMessage"
        );
    }

    #[test]
    fn test_default_api_base() {
        let api = HttpBotApi::new(Client::new(), "123:ABC".to_string());
        assert_eq!(
            api.method_url("answerInlineQuery"),
            "https://api.telegram.org/bot123:ABC/answerInlineQuery"
        );
    }
}
