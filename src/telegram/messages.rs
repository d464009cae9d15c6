//! Bilingual bot message templates.
//!
//! Templates are immutable data keyed by `(Lang, MessageKey)`. Russian is the
//! fallback language: a key missing (or blank) in another language resolves to
//! its Russian template. Templates use positional `{}` placeholders.

/// Supported message languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Ru,
    En,
}

impl Lang {
    /// Map a Telegram `language_code` to a supported language.
    pub fn normalize(code: &str) -> Self {
        if code.trim().to_lowercase().starts_with("en") {
            Lang::En
        } else {
            Lang::Ru
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }

    fn templates(&self) -> &'static Table {
        match self {
            Lang::Ru => RU,
            Lang::En => EN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    MiniAppEntryText,
    MiniAppEntryButton,
    SharePromptText,
    SharePromptSendChat,
    SharePromptOpen,
    PreviewBaseDesc,
    PreviewText,
    PreviewOpen,
    InlineHelpTitle,
    InlineHelpDesc,
    InlineHelpMessage,
    InlineMyTitle,
    InlineMyDesc,
    InlineMyNotLinked,
    InlineMyEmpty,
    InlineErrorTitle,
    InlineErrorDesc,
    InlineErrorMessage,
    InlineBaseDesc,
    InlineMessage,
    InlineOpenDesc,
    InlineOpenButton,
    WebAuthText,
    WebAuthButton,
    WebAuthNotLinked,
    WebAuthOpenMiniApp,
}

impl MessageKey {
    pub const ALL: [MessageKey; 26] = [
        MessageKey::MiniAppEntryText,
        MessageKey::MiniAppEntryButton,
        MessageKey::SharePromptText,
        MessageKey::SharePromptSendChat,
        MessageKey::SharePromptOpen,
        MessageKey::PreviewBaseDesc,
        MessageKey::PreviewText,
        MessageKey::PreviewOpen,
        MessageKey::InlineHelpTitle,
        MessageKey::InlineHelpDesc,
        MessageKey::InlineHelpMessage,
        MessageKey::InlineMyTitle,
        MessageKey::InlineMyDesc,
        MessageKey::InlineMyNotLinked,
        MessageKey::InlineMyEmpty,
        MessageKey::InlineErrorTitle,
        MessageKey::InlineErrorDesc,
        MessageKey::InlineErrorMessage,
        MessageKey::InlineBaseDesc,
        MessageKey::InlineMessage,
        MessageKey::InlineOpenDesc,
        MessageKey::InlineOpenButton,
        MessageKey::WebAuthText,
        MessageKey::WebAuthButton,
        MessageKey::WebAuthNotLinked,
        MessageKey::WebAuthOpenMiniApp,
    ];

    /// Dotted key name, used when no template exists at all.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::MiniAppEntryText => "miniapp.entry.text",
            MessageKey::MiniAppEntryButton => "miniapp.entry.button",
            MessageKey::SharePromptText => "share.prompt.text",
            MessageKey::SharePromptSendChat => "share.prompt.send_chat",
            MessageKey::SharePromptOpen => "share.prompt.open",
            MessageKey::PreviewBaseDesc => "preview.base_desc",
            MessageKey::PreviewText => "preview.text",
            MessageKey::PreviewOpen => "preview.open",
            MessageKey::InlineHelpTitle => "inline.help.title",
            MessageKey::InlineHelpDesc => "inline.help.desc",
            MessageKey::InlineHelpMessage => "inline.help.message",
            MessageKey::InlineMyTitle => "inline.my.title",
            MessageKey::InlineMyDesc => "inline.my.desc",
            MessageKey::InlineMyNotLinked => "inline.my.notLinked",
            MessageKey::InlineMyEmpty => "inline.my.empty",
            MessageKey::InlineErrorTitle => "inline.error.title",
            MessageKey::InlineErrorDesc => "inline.error.desc",
            MessageKey::InlineErrorMessage => "inline.error.message",
            MessageKey::InlineBaseDesc => "inline.base_desc",
            MessageKey::InlineMessage => "inline.message",
            MessageKey::InlineOpenDesc => "inline.open.desc",
            MessageKey::InlineOpenButton => "inline.open.button",
            MessageKey::WebAuthText => "webauth.text",
            MessageKey::WebAuthButton => "webauth.button",
            MessageKey::WebAuthNotLinked => "webauth.not_linked",
            MessageKey::WebAuthOpenMiniApp => "webauth.open_miniapp",
        }
    }
}

const RU: &[(MessageKey, &str)] = &[
    (MessageKey::MiniAppEntryText, "Откройте Wili в Telegram Mini App."),
    (MessageKey::MiniAppEntryButton, "Открыть Wili"),
    (
        MessageKey::SharePromptText,
        "<b>«{}»</b>\n\nНажмите кнопку ниже, выберите чат и отправьте сообщение с кнопкой.\n\nЕсли не работает — можно открыть в <a href=\"{}\">web</a>.",
    ),
    (MessageKey::SharePromptSendChat, "Отправить в чат…"),
    (MessageKey::SharePromptOpen, "Открыть вишлист"),
    (
        MessageKey::PreviewBaseDesc,
        "Посмотрите список желаний и забронируйте то, что хотите подарить. Чтобы увидеть, что уже забронировано, откройте вишлист.",
    ),
    (
        MessageKey::PreviewText,
        "<b>«{}»</b>\n\n{}\n\nМожно посмотреть по кнопке ниже или в <a href=\"{}\">web</a>",
    ),
    (MessageKey::PreviewOpen, "Открыть вишлист"),
    (MessageKey::InlineHelpTitle, "Как поделиться вишлистом"),
    (MessageKey::InlineHelpDesc, "Формат: wishlist:<uuid>"),
    (MessageKey::InlineHelpMessage, "Введите запрос в формате: wishlist:<uuid>"),
    (MessageKey::InlineMyTitle, "Мои вишлисты"),
    (MessageKey::InlineMyDesc, "Выберите вишлист и отправьте его в чат"),
    (
        MessageKey::InlineMyNotLinked,
        "Аккаунт не привязан. Откройте Mini App и войдите через Telegram.",
    ),
    (
        MessageKey::InlineMyEmpty,
        "У вас пока нет вишлистов. Создайте первый в Mini App.",
    ),
    (MessageKey::InlineErrorTitle, "Не удалось загрузить вишлист"),
    (MessageKey::InlineErrorDesc, "Проверьте id и попробуйте снова"),
    (
        MessageKey::InlineErrorMessage,
        "Не удалось загрузить вишлист. Проверьте id и попробуйте снова.",
    ),
    (
        MessageKey::InlineBaseDesc,
        "Посмотрите список подарков и забронируйте то, что хотите подарить.",
    ),
    (
        MessageKey::InlineMessage,
        "<b>«{}»</b>\n\n{}\n\nЕсли не работает кнопка, можно открыть в <a href=\"{}\">web</a>",
    ),
    (MessageKey::InlineOpenDesc, "Открыть вишлист"),
    (MessageKey::InlineOpenButton, "Открыть вишлист"),
    (
        MessageKey::WebAuthText,
        "Нажмите кнопку ниже, чтобы войти в веб-версию Wili.\n\nКстати, вы можете пользоваться Wili прямо здесь, в Telegram!",
    ),
    (MessageKey::WebAuthButton, "Войти на сайт"),
    (
        MessageKey::WebAuthNotLinked,
        "Чтобы войти на сайт через Telegram, сначала откройте Mini App и создайте аккаунт.",
    ),
    (MessageKey::WebAuthOpenMiniApp, "Открыть Wili"),
];

const EN: &[(MessageKey, &str)] = &[
    (MessageKey::MiniAppEntryText, "Open Wili in Telegram Mini App."),
    (MessageKey::MiniAppEntryButton, "Open Wili"),
    (
        MessageKey::SharePromptText,
        "<b>«{}»</b>\n\nTap the button below, choose a chat and send the message with a button.\n\nIf it doesn't work — open in <a href=\"{}\">web</a>.",
    ),
    (MessageKey::SharePromptSendChat, "Send to chat…"),
    (MessageKey::SharePromptOpen, "Open wishlist"),
    (
        MessageKey::PreviewBaseDesc,
        "View the wish list and book what you want to give. To see what's already booked, open the wishlist.",
    ),
    (
        MessageKey::PreviewText,
        "<b>«{}»</b>\n\n{}\n\nOpen with the button below or in <a href=\"{}\">web</a>",
    ),
    (MessageKey::PreviewOpen, "Open wishlist"),
    (MessageKey::InlineHelpTitle, "How to share a wishlist"),
    (MessageKey::InlineHelpDesc, "Format: wishlist:<uuid>"),
    (MessageKey::InlineHelpMessage, "Type a query in the format: wishlist:<uuid>"),
    (MessageKey::InlineMyTitle, "My wishlists"),
    (MessageKey::InlineMyDesc, "Pick a wishlist and send it to chat"),
    (
        MessageKey::InlineMyNotLinked,
        "Account is not linked. Open the Mini App and log in with Telegram.",
    ),
    (
        MessageKey::InlineMyEmpty,
        "You don’t have any wishlists yet. Create one in the Mini App.",
    ),
    (MessageKey::InlineErrorTitle, "Couldn't load wishlist"),
    (MessageKey::InlineErrorDesc, "Check the id and try again"),
    (
        MessageKey::InlineErrorMessage,
        "Couldn't load wishlist. Check the id and try again.",
    ),
    (
        MessageKey::InlineBaseDesc,
        "View the gift list and book what you want to give.",
    ),
    (
        MessageKey::InlineMessage,
        "<b>«{}»</b>\n\n{}\n\nIf the button doesn't work, open in <a href=\"{}\">web</a>",
    ),
    (MessageKey::InlineOpenDesc, "Open wishlist"),
    (MessageKey::InlineOpenButton, "Open wishlist"),
    (
        MessageKey::WebAuthText,
        "Tap the button below to log in to Wili web.\n\nBy the way, you can use Wili right here in Telegram!",
    ),
    (MessageKey::WebAuthButton, "Log in to website"),
    (
        MessageKey::WebAuthNotLinked,
        "To log in via Telegram, first open the Mini App and create an account.",
    ),
    (MessageKey::WebAuthOpenMiniApp, "Open Wili"),
];

type Table = [(MessageKey, &'static str)];

fn lookup(table: &Table, key: MessageKey) -> Option<&'static str> {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, template)| *template)
}

/// Template for `key` in `lang`, falling back to Russian, then to the key name.
pub fn tr(lang: Lang, key: MessageKey) -> &'static str {
    resolve(lang.templates(), RU, key)
}

/// A missing or blank entry in `primary` falls back to `fallback`.
fn resolve(primary: &Table, fallback: &Table, key: MessageKey) -> &'static str {
    lookup(primary, key)
        .filter(|template| !template.trim().is_empty())
        .or_else(|| lookup(fallback, key))
        .unwrap_or(key.as_str())
}

/// [`tr`] followed by [`render`].
pub fn trf<S: AsRef<str>>(lang: Lang, key: MessageKey, args: &[S]) -> String {
    render(tr(lang, key), args)
}

/// Fill `{}` placeholders left to right. Missing arguments render as empty.
pub fn render<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        out.push_str(args.next().map(AsRef::as_ref).unwrap_or_default());
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);

    out
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(Lang::normalize("en"), Lang::En);
        assert_eq!(Lang::normalize(" EN-us "), Lang::En);
        assert_eq!(Lang::normalize("ru"), Lang::Ru);
        assert_eq!(Lang::normalize("de"), Lang::Ru);
        assert_eq!(Lang::normalize(""), Lang::Ru);
    }

    #[test]
    fn test_every_key_has_a_template_in_every_language() {
        for key in MessageKey::ALL {
            for lang in [Lang::Ru, Lang::En] {
                let template = lookup(lang.templates(), key);
                assert!(
                    template.is_some_and(|t| !t.trim().is_empty()),
                    "{} missing for {}",
                    key.as_str(),
                    lang.code()
                );
            }
        }
    }

    #[test]
    fn test_tr_uses_requested_language() {
        assert_eq!(tr(Lang::En, MessageKey::MiniAppEntryButton), "Open Wili");
        assert_eq!(tr(Lang::Ru, MessageKey::MiniAppEntryButton), "Открыть Wili");
    }

    #[test]
    fn test_resolve_falls_back_to_russian() {
        let partial: &Table = &[(MessageKey::PreviewOpen, "   ")];

        // blank entry
        assert_eq!(
            resolve(partial, RU, MessageKey::PreviewOpen),
            tr(Lang::Ru, MessageKey::PreviewOpen)
        );
        // missing entry
        assert_eq!(
            resolve(partial, RU, MessageKey::MiniAppEntryButton),
            "Открыть Wili"
        );
    }

    #[test]
    fn test_resolve_falls_back_to_key_name() {
        assert_eq!(
            resolve(&[], &[], MessageKey::MiniAppEntryButton),
            MessageKey::MiniAppEntryButton.as_str()
        );
    }

    #[test]
    fn test_placeholder_counts_match_across_languages() {
        for key in MessageKey::ALL {
            assert_eq!(
                tr(Lang::Ru, key).matches("{}").count(),
                tr(Lang::En, key).matches("{}").count(),
                "{}",
                key.as_str()
            );
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(render("<b>{}</b> {}", &["a", "b"]), "<b>a</b> b");
        assert_eq!(render("{} and {}", &["only"]), "only and ");
        assert_eq!(render("no placeholders", &["ignored"]), "no placeholders");
        assert_eq!(render("{}{}", &["x", "y", "z"]), "xy");
    }

    #[test]
    fn test_trf() {
        let text = trf(
            Lang::En,
            MessageKey::SharePromptText,
            &["Birthday", "https://wili.me/wishlists/1"],
        );
        assert!(text.starts_with("<b>«Birthday»</b>"));
        assert!(text.contains("<a href=\"https://wili.me/wishlists/1\">web</a>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<Tom & "Jerry's">"#),
            "&lt;Tom &amp; &#34;Jerry&#39;s&#34;&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
