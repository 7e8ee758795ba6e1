//! Web API response shapes.
//!
//! Only the fields this crate reads are modelled; serde ignores the rest.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use yomiage_core::UserProfile;

use crate::error::{SlackError, SlackResult};
use crate::http::ApiResponse;

/// The `{ok, error}` envelope every Web API method returns.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Check status and envelope, then decode the body as `T`.
pub fn parse<T: DeserializeOwned>(method: &'static str, response: &ApiResponse) -> SlackResult<T> {
    if !(200..300).contains(&response.status) {
        return Err(SlackError::Status {
            method,
            status: response.status,
        });
    }

    let envelope: Envelope = serde_json::from_str(&response.body)
        .map_err(|source| SlackError::Decode { method, source })?;
    if !envelope.ok {
        return Err(SlackError::Api {
            method,
            code: envelope.error.unwrap_or_else(|| "unknown_error".to_string()),
        });
    }

    serde_json::from_str(&response.body).map_err(|source| SlackError::Decode { method, source })
}

/// Methods whose successful answer carries nothing we need.
#[derive(Debug, Deserialize)]
pub struct Empty {}

/// `auth.test`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// `users.info`
#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub profile: Profile,
}

#[derive(Debug, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        // Top-level `real_name` first; the profile copy only fills a gap.
        let real_name = if user.real_name.is_empty() {
            user.profile.real_name
        } else {
            user.real_name
        };
        Self {
            id: user.id,
            display_name: user.profile.display_name,
            real_name,
            name: user.name,
        }
    }
}

/// `apps.connections.open`
#[derive(Debug, Deserialize)]
pub struct ConnectionsOpen {
    pub url: String,
}
