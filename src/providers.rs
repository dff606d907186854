//! Built-in presets for providers that speak the Anthropic Messages API.
//!
//! Each preset defines the base URL, how the API key is sent, and the default
//! environment variable holding the key. Users name a provider in their
//! config and the preset fills in the rest.

use serde::{Deserialize, Serialize};

/// How the API key is presented to the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStyle {
    /// `x-api-key: <key>`
    XApiKey,
    /// `Authorization: Bearer <key>`
    Bearer,
}

#[derive(Debug, Clone)]
pub struct ProviderPreset {
    pub name: &'static str,
    pub base_url: &'static str,
    pub auth: AuthStyle,
    pub default_api_key_env: &'static str,
}

const PRESETS: &[ProviderPreset] = &[
    ProviderPreset {
        name: "anthropic",
        base_url: "https://api.anthropic.com",
        auth: AuthStyle::XApiKey,
        default_api_key_env: "ANTHROPIC_API_KEY",
    },
    ProviderPreset {
        name: "deepseek",
        base_url: "https://api.deepseek.com/anthropic",
        auth: AuthStyle::XApiKey,
        default_api_key_env: "DEEPSEEK_API_KEY",
    },
    ProviderPreset {
        name: "moonshot",
        base_url: "https://api.moonshot.ai/anthropic",
        auth: AuthStyle::Bearer,
        default_api_key_env: "MOONSHOT_API_KEY",
    },
    ProviderPreset {
        name: "zhipu",
        base_url: "https://open.bigmodel.cn/api/anthropic",
        auth: AuthStyle::Bearer,
        default_api_key_env: "ZHIPU_API_KEY",
    },
    ProviderPreset {
        name: "local",
        base_url: "http://localhost:8080",
        auth: AuthStyle::XApiKey,
        default_api_key_env: "LOCAL_API_KEY",
    },
];

impl ProviderPreset {
    #[must_use]
    pub fn from_name(name: &str) -> Option<&'static ProviderPreset> {
        PRESETS.iter().find(|p| p.name == name.to_lowercase())
    }

    #[must_use]
    pub fn all() -> &'static [ProviderPreset] {
        PRESETS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_providers() {
        assert!(ProviderPreset::from_name("anthropic").is_some());
        assert!(ProviderPreset::from_name("DeepSeek").is_some()); // case-insensitive
        assert!(ProviderPreset::from_name("unknown_provider").is_none());
    }

    #[test]
    fn test_anthropic_uses_api_key_header() {
        let preset = ProviderPreset::from_name("anthropic").unwrap();
        assert_eq!(preset.auth, AuthStyle::XApiKey);
        assert_eq!(preset.default_api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_base_urls_have_no_trailing_slash() {
        for preset in ProviderPreset::all() {
            assert!(
                !preset.base_url.ends_with('/'),
                "Provider {} base_url should not end with '/'",
                preset.name
            );
        }
    }
}
