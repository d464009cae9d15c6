//! Telegram bot update handling.
//!
//! The webhook hands every decoded [`Update`] to [`Bot::handle_update`], which
//! routes `/start` payloads and inline queries. Message construction is kept in
//! pure builder methods so the text and keyboards can be checked without I/O.

use crate::{
    Result,
    auth::TokenIssuer,
    store::UserStore,
    telegram::{
        BotApi, Lang, MessageKey, StartParam, WishlistApi,
        messages::{escape_html, tr, trf},
        start_param::{extract_start_param, parse_inline_query},
        types::{
            AnswerInlineQuery, InlineKeyboardButton, InlineKeyboardMarkup, InlineQuery,
            InlineQueryResultArticle, InputTextMessageContent, Message, ParseMode, SendMessage,
            Update, Wishlist,
        },
    },
};
use std::sync::Arc;

/// Inline "my wishlists" answers are capped at this many cards.
const MAX_INLINE_WISHLISTS: usize = 10;

/// Links the bot hands out.
#[derive(Debug, Clone)]
pub struct BotLinks {
    /// Mini App URL opened by `web_app` buttons.
    pub webapp_url: String,
    /// Website root; wishlists live under `/wishlists/<id>`.
    pub web_fallback_url: String,
    /// Website root hosting the Telegram login callback.
    pub frontend_url: String,
    /// Username of the bot that hosts the Mini App, for `t.me` deep links.
    pub miniapp_bot: Option<String>,
    /// Short name of the Mini App under that bot.
    pub miniapp_name: Option<String>,
}

impl BotLinks {
    /// Link that opens a wishlist inside the Mini App.
    pub fn mini_app_deep_link(&self, list_id: &str) -> String {
        match &self.miniapp_bot {
            Some(bot) => {
                let mut base = format!("https://t.me/{}", bot);
                if let Some(name) = &self.miniapp_name {
                    base = format!("{}/{}", base, name);
                }
                format!("{}?startapp=list_{}", base, list_id)
            }
            None => self.webapp_list_link(list_id),
        }
    }

    /// Link to the bot that hosts the Mini App.
    pub fn mini_app_bot_link(&self) -> String {
        match &self.miniapp_bot {
            Some(bot) => format!("https://t.me/{}", bot),
            None => self.webapp_url.clone(),
        }
    }

    pub fn webapp_list_link(&self, list_id: &str) -> String {
        format!("{}?start=list_{}", self.webapp_url, list_id)
    }

    pub fn web_fallback_link(&self, list_id: &str) -> String {
        format!("{}/wishlists/{}", self.web_fallback_url, list_id)
    }

    /// Website login callback carrying a freshly issued access token.
    pub fn login_url(&self, token: &str, state: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("token", token)
            .append_pair("state", state)
            .finish();
        format!("{}/auth/telegram-callback?{}", self.frontend_url, query)
    }
}

pub struct Bot {
    links: BotLinks,
    api: Arc<dyn BotApi>,
    wishlists: Arc<dyn WishlistApi>,
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl Bot {
    pub fn new(
        links: BotLinks,
        api: Arc<dyn BotApi>,
        wishlists: Arc<dyn WishlistApi>,
        users: Arc<dyn UserStore>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            links,
            api,
            wishlists,
            users,
            tokens,
        }
    }

    pub fn links(&self) -> &BotLinks {
        &self.links
    }

    /// Dispatch one update. Errors are returned for the caller to log; the
    /// webhook acknowledges regardless.
    pub async fn handle_update(&self, update: Update) -> Result<()> {
        if let Some(query) = update.inline_query {
            return self.handle_inline_query(&query).await;
        }

        let Some(message) = update.message else {
            tracing::debug!(update_id = update.update_id, "ignored update without message");
            return Ok(());
        };

        self.handle_message(&message).await
    }

    async fn handle_message(&self, message: &Message) -> Result<()> {
        let chat_id = message.chat.id;
        let lang = Lang::normalize(message.from.language_code());

        let payload = extract_start_param(&message.text);
        if payload.is_empty() {
            if message.text.trim().starts_with("/start") {
                tracing::info!(chat_id, "start without payload");
                return self.api.send_message(&self.entry_message(chat_id, lang)).await;
            }
            tracing::debug!(chat_id, "ignored message without start payload");
            return Ok(());
        }

        match StartParam::parse(payload) {
            StartParam::Share(list_id) => {
                tracing::info!(chat_id, list_id = %list_id, "share prompt");
                let wishlist = self.wishlists.get_wishlist(&list_id).await?;
                let message = self.share_prompt(chat_id, &list_id, &wishlist, lang);
                self.api.send_message(&message).await
            }
            StartParam::WebAuth(state) => {
                tracing::info!(chat_id, "web login requested");
                let message = match self.linked_token(message.from.id).await {
                    Some(token) => self.webauth_message(chat_id, &token, &state, lang),
                    None => {
                        tracing::info!(telegram_id = message.from.id, "web login for unlinked account");
                        self.webauth_not_linked(chat_id, lang)
                    }
                };
                self.api.send_message(&message).await
            }
            StartParam::List(list_id) => {
                tracing::info!(chat_id, list_id = %list_id, "wishlist preview");
                let wishlist = self.wishlists.get_wishlist(&list_id).await?;
                let message = self.preview_message(chat_id, &list_id, &wishlist, lang);
                self.api.send_message(&message).await
            }
            StartParam::None => {
                tracing::info!(chat_id, payload, "ignored unknown start payload");
                Ok(())
            }
        }
    }

    async fn handle_inline_query(&self, query: &InlineQuery) -> Result<()> {
        let lang = Lang::normalize(query.from.language_code());
        let text = query.query.trim();
        tracing::debug!(from = query.from.id, id = %query.id, query = text, "inline query");

        let results = if text.is_empty() {
            self.my_wishlist_results(query.from.id, lang).await?
        } else if let Some(list_id) = parse_inline_query(text) {
            match self.wishlists.get_wishlist(&list_id).await {
                Ok(wishlist) => vec![self.wishlist_article(
                    format!("wishlist_{}", list_id),
                    &list_id,
                    &wishlist.title,
                    wishlist.description.as_deref(),
                    tr(lang, MessageKey::InlineOpenDesc),
                    lang,
                )],
                Err(e) => {
                    tracing::warn!(list_id = %list_id, "inline wishlist fetch failed: {}", e);
                    vec![self.inline_error_article(lang)]
                }
            }
        } else {
            vec![self.inline_help_article(lang)]
        };

        let answer = AnswerInlineQuery {
            inline_query_id: query.id.clone(),
            results,
            cache_time: 1,
            is_personal: true,
        };
        self.api.answer_inline_query(&answer).await?;
        tracing::debug!(id = %query.id, results = answer.results.len(), "inline query answered");
        Ok(())
    }

    async fn my_wishlist_results(
        &self,
        telegram_id: i64,
        lang: Lang,
    ) -> Result<Vec<InlineQueryResultArticle>> {
        let Some(token) = self.linked_token(telegram_id).await else {
            return Ok(vec![self.my_notice_article(
                "my_not_linked",
                MessageKey::InlineMyNotLinked,
                lang,
            )]);
        };

        let lists = match self.wishlists.list_wishlists(&token).await {
            Ok(lists) => lists,
            Err(e) => {
                tracing::warn!(telegram_id, "inline my wishlists failed: {}", e);
                return Ok(Vec::new());
            }
        };

        if lists.is_empty() {
            return Ok(vec![self.my_notice_article(
                "my_empty",
                MessageKey::InlineMyEmpty,
                lang,
            )]);
        }

        Ok(lists
            .iter()
            .take(MAX_INLINE_WISHLISTS)
            .map(|list| {
                self.wishlist_article(
                    format!("my_{}", list.id),
                    &list.id,
                    &list.title,
                    list.description.as_deref(),
                    tr(lang, MessageKey::InlineMyDesc),
                    lang,
                )
            })
            .collect())
    }

    /// Access token for the account linked to `telegram_id`. Lookup or signing
    /// failures are logged and treated as "not linked".
    async fn linked_token(&self, telegram_id: i64) -> Option<String> {
        let user = match self.users.get_by_telegram_id(telegram_id).await {
            Ok(user) => user?,
            Err(e) => {
                tracing::warn!(telegram_id, "linked account lookup failed: {}", e);
                return None;
            }
        };

        match self.tokens.issue(user.id) {
            Ok(issued) => Some(issued.token),
            Err(e) => {
                tracing::warn!(telegram_id, "failed to issue token for linked account: {}", e);
                None
            }
        }
    }

    pub fn entry_message(&self, chat_id: i64, lang: Lang) -> SendMessage {
        SendMessage {
            chat_id,
            text: tr(lang, MessageKey::MiniAppEntryText).to_string(),
            parse_mode: Some(ParseMode::Html),
            disable_web_page_preview: false,
            reply_markup: Some(InlineKeyboardMarkup::column([InlineKeyboardButton::web_app(
                tr(lang, MessageKey::MiniAppEntryButton),
                &self.links.webapp_url,
            )])),
        }
    }

    pub fn preview_message(
        &self,
        chat_id: i64,
        list_id: &str,
        wishlist: &Wishlist,
        lang: Lang,
    ) -> SendMessage {
        let description = describe(
            wishlist.description.as_deref(),
            tr(lang, MessageKey::PreviewBaseDesc),
        );
        let text = trf(
            lang,
            MessageKey::PreviewText,
            &[
                escape_html(&wishlist.title),
                escape_html(&description),
                escape_html(&self.links.web_fallback_link(list_id)),
            ],
        );

        SendMessage {
            chat_id,
            text,
            parse_mode: Some(ParseMode::Html),
            disable_web_page_preview: true,
            reply_markup: Some(InlineKeyboardMarkup::column([InlineKeyboardButton::web_app(
                tr(lang, MessageKey::PreviewOpen),
                self.links.webapp_list_link(list_id),
            )])),
        }
    }

    pub fn share_prompt(
        &self,
        chat_id: i64,
        list_id: &str,
        wishlist: &Wishlist,
        lang: Lang,
    ) -> SendMessage {
        let text = trf(
            lang,
            MessageKey::SharePromptText,
            &[
                escape_html(&wishlist.title),
                escape_html(&self.links.web_fallback_link(list_id)),
            ],
        );

        SendMessage {
            chat_id,
            text,
            parse_mode: Some(ParseMode::Html),
            disable_web_page_preview: true,
            reply_markup: Some(InlineKeyboardMarkup::column([
                InlineKeyboardButton::switch_inline_query(
                    tr(lang, MessageKey::SharePromptSendChat),
                    format!("wishlist:{}", list_id),
                ),
                InlineKeyboardButton::web_app(
                    tr(lang, MessageKey::SharePromptOpen),
                    self.links.webapp_list_link(list_id),
                ),
            ])),
        }
    }

    pub fn webauth_message(&self, chat_id: i64, token: &str, state: &str, lang: Lang) -> SendMessage {
        SendMessage {
            chat_id,
            text: tr(lang, MessageKey::WebAuthText).to_string(),
            parse_mode: Some(ParseMode::Html),
            disable_web_page_preview: false,
            reply_markup: Some(InlineKeyboardMarkup::column([
                InlineKeyboardButton::url(
                    tr(lang, MessageKey::WebAuthButton),
                    self.links.login_url(token, state),
                ),
                InlineKeyboardButton::web_app(
                    tr(lang, MessageKey::WebAuthOpenMiniApp),
                    &self.links.webapp_url,
                ),
            ])),
        }
    }

    pub fn webauth_not_linked(&self, chat_id: i64, lang: Lang) -> SendMessage {
        SendMessage {
            chat_id,
            text: tr(lang, MessageKey::WebAuthNotLinked).to_string(),
            parse_mode: Some(ParseMode::Html),
            disable_web_page_preview: false,
            reply_markup: Some(InlineKeyboardMarkup::column([InlineKeyboardButton::web_app(
                tr(lang, MessageKey::WebAuthOpenMiniApp),
                &self.links.webapp_url,
            )])),
        }
    }

    fn wishlist_article(
        &self,
        id: String,
        list_id: &str,
        title: &str,
        description: Option<&str>,
        card_description: &str,
        lang: Lang,
    ) -> InlineQueryResultArticle {
        let description = describe(description, tr(lang, MessageKey::InlineBaseDesc));
        let text = trf(
            lang,
            MessageKey::InlineMessage,
            &[
                escape_html(title),
                escape_html(&description),
                escape_html(&self.links.web_fallback_link(list_id)),
            ],
        );

        InlineQueryResultArticle::new(
            id,
            title,
            card_description,
            InputTextMessageContent::html(text),
        )
        .with_markup(InlineKeyboardMarkup::column([InlineKeyboardButton::url(
            tr(lang, MessageKey::InlineOpenButton),
            self.links.mini_app_deep_link(list_id),
        )]))
    }

    fn my_notice_article(&self, id: &str, key: MessageKey, lang: Lang) -> InlineQueryResultArticle {
        let text = tr(lang, key);
        InlineQueryResultArticle::new(
            id,
            tr(lang, MessageKey::InlineMyTitle),
            text,
            InputTextMessageContent::plain(text),
        )
        .with_markup(InlineKeyboardMarkup::column([InlineKeyboardButton::url(
            tr(lang, MessageKey::MiniAppEntryButton),
            self.links.mini_app_bot_link(),
        )]))
    }

    fn inline_help_article(&self, lang: Lang) -> InlineQueryResultArticle {
        InlineQueryResultArticle::new(
            "help",
            tr(lang, MessageKey::InlineHelpTitle),
            tr(lang, MessageKey::InlineHelpDesc),
            InputTextMessageContent::plain(tr(lang, MessageKey::InlineHelpMessage)),
        )
    }

    fn inline_error_article(&self, lang: Lang) -> InlineQueryResultArticle {
        InlineQueryResultArticle::new(
            "error",
            tr(lang, MessageKey::InlineErrorTitle),
            tr(lang, MessageKey::InlineErrorDesc),
            InputTextMessageContent::plain(tr(lang, MessageKey::InlineErrorMessage)),
        )
    }
}

/// Prepend a wishlist's own description to the generic blurb.
fn describe(description: Option<&str>, base: &str) -> String {
    match description.map(str::trim) {
        Some(own) if !own.is_empty() => format!("{}\n\n{}", own, base),
        _ => base.to_string(),
    }
}
