//! Core port implementations for `SlackWebClient`.

use async_trait::async_trait;
use yomiage_core::ports::{AnnotationError, IdentityError, IdentityLookup, MessageAnnotator};
use yomiage_core::{MessageRef, UserProfile};

use crate::error::SlackError;
use crate::http::HttpBackend;
use crate::web::SlackWebClient;

fn map_identity_error(err: SlackError) -> IdentityError {
    match err {
        SlackError::Api { code, .. } => IdentityError::Lookup(code),
        other => IdentityError::Unavailable(other.to_string()),
    }
}

fn map_annotation_error(action: &'static str, name: &str, err: &SlackError) -> AnnotationError {
    AnnotationError {
        action,
        name: name.to_string(),
        message: err.api_code().map_or_else(|| err.to_string(), str::to_string),
    }
}

#[async_trait]
impl<B: HttpBackend> IdentityLookup for SlackWebClient<B> {
    async fn lookup_user(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
        self.user_info(user_id).await.map_err(map_identity_error)
    }
}

#[async_trait]
impl<B: HttpBackend> MessageAnnotator for SlackWebClient<B> {
    async fn add_marker(&self, target: &MessageRef, name: &str) -> Result<(), AnnotationError> {
        self.add_reaction(target, name)
            .await
            .map_err(|e| map_annotation_error("add", name, &e))
    }

    async fn remove_marker(&self, target: &MessageRef, name: &str) -> Result<(), AnnotationError> {
        self.remove_reaction(target, name)
            .await
            .map_err(|e| map_annotation_error("remove", name, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlackConfig;
    use crate::http::testing::FakeBackend;
    use serde_json::json;
    use tokio_test::assert_err;
    use yomiage_core::Secret;

    fn client(backend: FakeBackend) -> SlackWebClient<FakeBackend> {
        let config = SlackConfig::new(Secret::new("xoxb"), Secret::new("xapp"));
        SlackWebClient::with_backend(&config, backend)
    }

    #[tokio::test]
    async fn test_unknown_user_is_lookup_error() {
        let backend =
            FakeBackend::new().with_json("users.info", json!({"ok": false, "error": "user_not_found"}));
        let err = assert_err!(client(backend).lookup_user("U404").await);
        assert!(matches!(err, IdentityError::Lookup(code) if code == "user_not_found"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_unavailable() {
        let backend = FakeBackend::new().with_status("users.info", 429, "");
        let err = assert_err!(client(backend).lookup_user("U1").await);
        assert!(matches!(err, IdentityError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_annotation_error_names_marker() {
        let backend = FakeBackend::new()
            .with_json("reactions.add", json!({"ok": false, "error": "missing_scope"}));
        let target = MessageRef {
            channel: "C1".into(),
            ts: "1.0".into(),
        };
        let err = assert_err!(client(backend).add_marker(&target, "speaker").await);
        assert_eq!(err.to_string(), "failed to add marker ':speaker:': missing_scope");
    }
}
