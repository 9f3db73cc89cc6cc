//! # Site configuration — `folio.toml`
//!
//! Tells the site where its hosted backend lives and tunes the public pages.
//!
//! ## Structure
//!
//! ```toml
//! [remote]
//! url = "https://xyzcompany.example.co"   # project URL of the hosted backend
//! anon_key = "public-anon-key"            # publishable key, sent as `apikey`
//!
//! [gallery]
//! featured_limit = 3   # projects shown on the home page
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`FolioConfig`] | Top-level config. TOML (de)serialisation, environment loaders and the canonical filename. |
//! | [`RemoteConfig`] | Backend endpoint and anon key, shared by the row store and the auth client. |
//! | [`GalleryConfig`] | Public page tuning — `featured_limit` defaults to **3**. |
//!
//! ## Loading
//!
//! [`FolioConfig::load`] is what the app calls at startup. Native builds read the
//! process environment (and `.env`) through [`FolioConfig::from_env`]; when that
//! fails, or on WASM where there is no process environment, the values baked in
//! at compile time by [`FolioConfig::from_build_env`] are used.
//!
//! Missing sections fall back to their defaults, so an empty file is a valid
//! (if disconnected) configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `folio.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

/// Where the hosted backend lives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Number of newest projects featured on the home page.
    #[serde(default = "default_featured_limit")]
    pub featured_limit: usize,
}

fn default_featured_limit() -> usize {
    3
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            featured_limit: default_featured_limit(),
        }
    }
}

impl FolioConfig {
    /// Create a config pointing at the given backend.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            remote: RemoteConfig {
                url: url.into(),
                anon_key: anon_key.into(),
            },
            gallery: GalleryConfig::default(),
        }
    }

    /// Builder method to set the number of featured projects.
    pub fn with_featured_limit(mut self, limit: usize) -> Self {
        self.gallery.featured_limit = limit;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "folio.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read the backend settings from `FOLIO_REMOTE_URL` / `FOLIO_ANON_KEY`,
    /// loading a `.env` file first when one is present.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from named variables supplied by `lookup`.
    /// `FOLIO_FEATURED_LIMIT` is optional; the other two are required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let url = lookup("FOLIO_REMOTE_URL").ok_or("FOLIO_REMOTE_URL not set")?;
        let anon_key = lookup("FOLIO_ANON_KEY").ok_or("FOLIO_ANON_KEY not set")?;
        let mut config = Self::new(url, anon_key);

        if let Some(limit) = lookup("FOLIO_FEATURED_LIMIT") {
            config.gallery.featured_limit = limit
                .trim()
                .parse()
                .map_err(|e| format!("FOLIO_FEATURED_LIMIT: {e}"))?;
        }
        Ok(config)
    }

    /// Startup configuration for the current target.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("{e}; using build-time settings");
            Self::from_build_env()
        })
    }

    /// Startup configuration for the current target.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::from_build_env()
    }

    /// Settings baked in at compile time, for WASM builds that have no process
    /// environment at runtime.
    pub fn from_build_env() -> Self {
        Self::new(
            option_env!("FOLIO_REMOTE_URL").unwrap_or_default(),
            option_env!("FOLIO_ANON_KEY").unwrap_or_default(),
        )
    }

    /// Whether a backend endpoint has been configured.
    pub fn is_connected(&self) -> bool {
        !self.remote.url.is_empty() && !self.remote.anon_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = FolioConfig::from_toml("").unwrap();
        assert_eq!(config, FolioConfig::default());
        assert_eq!(config.gallery.featured_limit, 3);
        assert!(!config.is_connected());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = FolioConfig::new("https://demo.example.co", "anon").with_featured_limit(6);
        let text = config.to_toml().unwrap();
        assert!(text.contains("[remote]"));
        assert!(text.contains("featured_limit = 6"));

        let loaded = FolioConfig::from_toml(&text).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.is_connected());
    }

    #[test]
    fn test_from_lookup() {
        let vars = std::collections::HashMap::from([
            ("FOLIO_REMOTE_URL", "https://demo.example.co"),
            ("FOLIO_ANON_KEY", "anon"),
            ("FOLIO_FEATURED_LIMIT", " 5 "),
        ]);
        let lookup = |name: &str| vars.get(name).map(|v| v.to_string());
        let config = FolioConfig::from_lookup(lookup).unwrap();
        assert_eq!(config, FolioConfig::new("https://demo.example.co", "anon").with_featured_limit(5));

        let missing_key = |name: &str| (name == "FOLIO_REMOTE_URL").then(|| "https://x".to_string());
        assert_eq!(
            FolioConfig::from_lookup(missing_key).unwrap_err(),
            "FOLIO_ANON_KEY not set"
        );

        let bad_limit = |name: &str| match name {
            "FOLIO_FEATURED_LIMIT" => Some("many".to_string()),
            _ => Some("set".to_string()),
        };
        assert!(FolioConfig::from_lookup(bad_limit)
            .unwrap_err()
            .starts_with("FOLIO_FEATURED_LIMIT"));
    }

    // The only test touching the process environment, so set and unset run in
    // sequence here.
    #[test]
    fn test_load_reads_env_and_falls_back() {
        std::env::set_var("FOLIO_REMOTE_URL", "https://env.example.co");
        std::env::set_var("FOLIO_ANON_KEY", "env-anon");
        std::env::remove_var("FOLIO_FEATURED_LIMIT");
        let config = FolioConfig::load();
        assert_eq!(config, FolioConfig::new("https://env.example.co", "env-anon"));
        assert!(config.is_connected());

        std::env::remove_var("FOLIO_REMOTE_URL");
        std::env::remove_var("FOLIO_ANON_KEY");
        assert!(FolioConfig::from_env().is_err());
        assert_eq!(FolioConfig::load(), FolioConfig::from_build_env());
    }

    #[test]
    fn test_partial_section() {
        let config = FolioConfig::from_toml("[remote]\nurl = \"https://demo.example.co\"\n").unwrap();
        assert_eq!(config.remote.url, "https://demo.example.co");
        assert_eq!(config.remote.anon_key, "");
        assert_eq!(config.gallery.featured_limit, 3);
    }
}
