use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// User profile as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            email: None,
            avatar_url: None,
        }
    }

    /// Placeholder returned alongside `valid: false`.
    pub fn empty() -> Self {
        Self {
            id: Uuid::nil(),
            display_name: String::new(),
            email: None,
            avatar_url: None,
        }
    }
}

/// Successful login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramAuthRequest {
    #[serde(default)]
    pub init_data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramBotAuthRequest {
    pub telegram_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    pub user: User,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_serializes_camel_case() {
        let mut user = User::new("Ada");
        user.avatar_url = Some("https://t.me/a.jpg".to_string());

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["displayName"], "Ada");
        assert_eq!(value["avatarUrl"], "https://t.me/a.jpg");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn test_update_request_partial() {
        let req: UpdateUserRequest = serde_json::from_value(json!({"displayName": "New"})).unwrap();
        assert_eq!(req.display_name.as_deref(), Some("New"));
        assert!(req.avatar_url.is_none());
    }
}
