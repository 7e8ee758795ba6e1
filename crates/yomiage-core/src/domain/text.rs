//! Text preprocessing for TTS.
//!
//! Slack encodes mentions, channel links and URLs as `<target|label>` or
//! bare `<target>`. Read aloud, the target is an opaque id or a URL, so only
//! the label survives.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Localized "message from" suffix placed after the sender name.
pub const MESSAGE_FROM_SUFFIX: &str = "さんからのメッセージ。";

static MARKUP_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^|>]+?)(\|(.+?))?>").expect("markup token pattern is valid")
});

/// Replace every `<target|label>` with `label` and every `<target>` with
/// the empty string.
#[must_use]
pub fn normalize_markup(text: &str) -> String {
    MARKUP_TOKEN
        .replace_all(text, |caps: &Captures<'_>| {
            caps.get(3).map_or_else(String::new, |label| label.as_str().to_string())
        })
        .into_owned()
}

/// The final string submitted for speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    /// `"{name}さんからのメッセージ。{text}"`.
    pub fn compose(display_name: &str, normalized_text: &str) -> Self {
        Self(format!("{display_name}{MESSAGE_FROM_SUFFIX}{normalized_text}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Utterance {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_token_becomes_label() {
        assert_eq!(normalize_markup("<U123|Alice> hi"), "Alice hi");
    }

    #[test]
    fn bare_token_is_stripped() {
        assert_eq!(normalize_markup("<C456>"), "");
        assert_eq!(normalize_markup("see <https://example.com> now"), "see  now");
    }

    #[test]
    fn multiple_tokens_in_one_message() {
        assert_eq!(
            normalize_markup("<@U1|bob> posted <https://example.com|the docs> in <#C2|general>"),
            "bob posted the docs in general"
        );
    }

    #[test]
    fn plain_text_is_untouched() {
        let text = "こんにちは、今日は 3 > 2 です";
        assert_eq!(normalize_markup(text), text);
    }

    #[test]
    fn normalizing_twice_changes_nothing_more() {
        let once = normalize_markup("<U123|Alice> hi <C456>");
        assert_eq!(normalize_markup(&once), once);
    }

    #[test]
    fn utterance_follows_fixed_template() {
        let utterance = Utterance::compose("Alice", "Bob hi");
        assert_eq!(utterance.as_str(), "Aliceさんからのメッセージ。Bob hi");
        assert_eq!(utterance.to_string(), utterance.into_string());
    }
}
