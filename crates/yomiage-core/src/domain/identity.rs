//! Sender identity and display-name resolution.

use crate::ports::IdentityError;

/// Spoken when every name field of a profile is empty.
pub const PLACEHOLDER_NAME: &str = "ユーザー";

/// What the identity lookup returns for a sender id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    /// Profile display name (may be empty).
    pub display_name: String,
    /// Full/real name (may be empty).
    pub real_name: String,
    /// Account (handle) name.
    pub name: String,
}

impl UserProfile {
    /// First non-empty of display name, real name, account name, falling
    /// back to [`PLACEHOLDER_NAME`].
    pub fn spoken_name(&self) -> &str {
        [
            self.display_name.as_str(),
            self.real_name.as_str(),
            self.name.as_str(),
        ]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(PLACEHOLDER_NAME)
    }
}

/// Name to speak for `user_id` given the outcome of the lookup.
///
/// A failed lookup degrades to the raw sender id.
pub fn resolve_display_name(user_id: &str, lookup: &Result<UserProfile, IdentityError>) -> String {
    match lookup {
        Ok(profile) => profile.spoken_name().to_string(),
        Err(_) => user_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(display: &str, real: &str, account: &str) -> UserProfile {
        UserProfile {
            id: "U1".into(),
            display_name: display.into(),
            real_name: real.into(),
            name: account.into(),
        }
    }

    #[test]
    fn fallback_chain_order() {
        assert_eq!(profile("Ali", "Alice Liddell", "alice").spoken_name(), "Ali");
        assert_eq!(profile("", "Alice Liddell", "alice").spoken_name(), "Alice Liddell");
        assert_eq!(profile("", "", "alice").spoken_name(), "alice");
        assert_eq!(profile("", "", "").spoken_name(), PLACEHOLDER_NAME);
    }

    #[test]
    fn lookup_error_uses_raw_sender_id() {
        let failed = Err(IdentityError::Lookup("user_not_found".into()));
        assert_eq!(resolve_display_name("U123", &failed), "U123");
    }

    #[test]
    fn lookup_success_uses_profile() {
        let ok = Ok(profile("", "", ""));
        assert_eq!(resolve_display_name("U123", &ok), "ユーザー");
    }
}
