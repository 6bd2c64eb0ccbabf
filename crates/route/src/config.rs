use serde::{Deserialize, Serialize};

/// Document-level settings for the generated API description.
///
/// `spec_url` and `docs_url` are where the host serves the JSON document and
/// the interactive UI; they do not appear in the document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub title: String,
    pub version: String,
    pub base_path: String,
    pub spec_url: String,
    pub docs_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: "routeguard".to_owned(),
            version: "0.1".to_owned(),
            base_path: "/".to_owned(),
            spec_url: "/api/swagger.json".to_owned(),
            docs_url: "/api/docs".to_owned(),
        }
    }
}

impl ApiConfig {
    /// Defaults overridden by `ROUTEGUARD_API_TITLE`,
    /// `ROUTEGUARD_API_VERSION` and `ROUTEGUARD_API_BASE_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] over an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(title) = lookup("ROUTEGUARD_API_TITLE") {
            config.title = title;
        }
        if let Some(version) = lookup("ROUTEGUARD_API_VERSION") {
            config.version = version;
        }
        if let Some(base_path) = lookup("ROUTEGUARD_API_BASE_PATH") {
            config.base_path = base_path;
        }
        config
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
