use serde::{Deserialize, Serialize};

/// Incoming webhook update. Only the parts the bot reacts to are decoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<Message>,
    pub inline_query: Option<InlineQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: User,
    pub chat: Chat,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl User {
    pub fn language_code(&self) -> &str {
        self.language_code.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub query: String,
}

/// `sendMessage` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// One button per row.
    pub fn column(buttons: impl IntoIterator<Item = InlineKeyboardButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|button| vec![button]).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebAppInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_inline_query: Option<String>,
}

impl InlineKeyboardButton {
    /// Button that opens a Mini App.
    pub fn web_app(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            web_app: Some(WebAppInfo { url: url.into() }),
            url: None,
            switch_inline_query: None,
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            web_app: None,
            url: Some(url.into()),
            switch_inline_query: None,
        }
    }

    /// Button that prompts the user to pick a chat and prefills an inline query.
    pub fn switch_inline_query(text: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            web_app: None,
            url: None,
            switch_inline_query: Some(query.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebAppInfo {
    pub url: String,
}

/// `answerInlineQuery` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerInlineQuery {
    pub inline_query_id: String,
    pub results: Vec<InlineQueryResultArticle>,
    pub cache_time: u32,
    pub is_personal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineQueryResultArticle {
    pub r#type: &'static str,
    pub id: String,
    pub title: String,
    pub description: String,
    pub input_message_content: InputTextMessageContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl InlineQueryResultArticle {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        content: InputTextMessageContent,
    ) -> Self {
        Self {
            r#type: "article",
            id: id.into(),
            title: title.into(),
            description: description.into(),
            input_message_content: content,
            reply_markup: None,
        }
    }

    pub fn with_markup(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputTextMessageContent {
    pub message_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_web_page_preview: bool,
}

impl InputTextMessageContent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            message_text: text.into(),
            parse_mode: None,
            disable_web_page_preview: false,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            message_text: text.into(),
            parse_mode: Some(ParseMode::Html),
            disable_web_page_preview: true,
        }
    }
}

/// Single wishlist as returned by the wishlist API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Wishlist {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Entry of the caller's wishlist listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WishlistSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishlistList {
    #[serde(default)]
    pub wishlists: Vec<WishlistSummary>,
}
