//! Slack Web API client.

use url::Url;
use yomiage_core::{MessageRef, Secret, UserProfile};

use crate::api::{self, AuthTest, ConnectionsOpen, Empty, UserInfo};
use crate::config::SlackConfig;
use crate::error::SlackResult;
use crate::http::{ApiCall, HttpBackend, ReqwestBackend};

/// Default Web API client using the reqwest backend.
pub type DefaultSlackWebClient = SlackWebClient<ReqwestBackend>;

/// The handful of Web API methods the bridge needs.
///
/// Bot-token methods serve identity lookup and reactions; the app-level
/// token is used only to open Socket Mode connections.
pub struct SlackWebClient<B: HttpBackend> {
    pub(crate) backend: B,
    bot_token: Secret,
    app_level_token: Secret,
}

impl DefaultSlackWebClient {
    pub fn new(config: &SlackConfig) -> SlackResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        Ok(Self::with_backend(config, backend))
    }
}

impl<B: HttpBackend> SlackWebClient<B> {
    pub(crate) fn with_backend(config: &SlackConfig, backend: B) -> Self {
        Self {
            backend,
            bot_token: config.bot_token.clone(),
            app_level_token: config.app_level_token.clone(),
        }
    }

    fn bot_call(&self, method: &'static str) -> ApiCall {
        ApiCall::new(method, self.bot_token.expose())
    }

    /// `auth.test`: verify the bot token.
    pub async fn auth_test(&self) -> SlackResult<AuthTest> {
        let call = self.bot_call("auth.test");
        let response = self.backend.call(call).await?;
        api::parse("auth.test", &response)
    }

    /// `users.info`
    pub async fn user_info(&self, user_id: &str) -> SlackResult<UserProfile> {
        let call = self.bot_call("users.info").param("user", user_id);
        let response = self.backend.call(call).await?;
        let info: UserInfo = api::parse("users.info", &response)?;
        Ok(info.user.into())
    }

    /// `reactions.add`
    pub async fn add_reaction(&self, target: &MessageRef, name: &str) -> SlackResult<()> {
        self.reaction("reactions.add", target, name).await
    }

    /// `reactions.remove`
    pub async fn remove_reaction(&self, target: &MessageRef, name: &str) -> SlackResult<()> {
        self.reaction("reactions.remove", target, name).await
    }

    async fn reaction(&self, method: &'static str, target: &MessageRef, name: &str) -> SlackResult<()> {
        let call = self
            .bot_call(method)
            .param("channel", target.channel.as_str())
            .param("timestamp", target.ts.as_str())
            .param("name", name);
        let response = self.backend.call(call).await?;
        api::parse::<Empty>(method, &response).map(|_| ())
    }

    /// `apps.connections.open`: a fresh single-use Socket Mode URL.
    pub async fn open_connection(&self) -> SlackResult<Url> {
        let call = ApiCall::new("apps.connections.open", self.app_level_token.expose());
        let response = self.backend.call(call).await?;
        let open: ConnectionsOpen = api::parse("apps.connections.open", &response)?;
        Ok(Url::parse(&open.url)?)
    }
}
