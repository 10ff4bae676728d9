//! Site configuration: `folio.toml`, then environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use folio_model::Lang;
use serde::Deserialize;

/// Public base path prefixed to every generated link.
pub const ENV_BASE_PATH: &str = "FOLIO_BASE_PATH";
/// Content API root.
pub const ENV_API_URL: &str = "FOLIO_API_URL";
/// Admin bearer token.
pub const ENV_TOKEN: &str = "FOLIO_TOKEN";

/// Where content comes from and how the site is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute site origin used in the sitemap.
    pub base_url: String,
    /// Path prefix of the published site (`""` at the domain root).
    pub base_path: String,
    /// Content API root; takes precedence over `content_dir` when both are set.
    pub api_url: Option<String>,
    /// Local content directory.
    pub content_dir: Option<PathBuf>,
    /// Output directory.
    pub out_dir: PathBuf,
    /// Slug of the page published at each language root.
    pub home_slug: String,
    /// Languages to publish.
    pub languages: Vec<Lang>,
    /// Prefix static forms post to.
    pub form_action_base: String,
    /// Admin bearer token. Only ever read from the environment.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            base_path: String::new(),
            api_url: None,
            content_dir: None,
            out_dir: PathBuf::from("public"),
            home_slug: "home".into(),
            languages: Lang::ALL.to_vec(),
            form_action_base: "/api".into(),
            token: None,
        }
    }
}

impl SiteConfig {
    /// Parses a configuration file body. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, unknown keys or an empty language
    /// list.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(source).context("Invalid site configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, then applies the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config: {}", path.display()))?;
        let mut config =
            Self::from_toml(&source).with_context(|| format!("In {}", path.display()))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides from `lookup` (the environment in production).
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(base_path) = var(ENV_BASE_PATH) {
            self.base_path = base_path;
        }
        if let Some(api_url) = var(ENV_API_URL) {
            self.api_url = Some(api_url);
        }
        if let Some(token) = var(ENV_TOKEN) {
            self.token = Some(token);
        }
    }

    /// The base path without a trailing slash.
    #[must_use]
    pub fn base_path(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }

    fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            bail!("`languages` must name at least one language");
        }
        if self.home_slug.trim().is_empty() {
            bail!("`home_slug` must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_fill_missing_keys() -> Result<()> {
        let config = SiteConfig::from_toml("base_url = \"https://asia.example\"\n")?;
        assert_eq!(config.base_url, "https://asia.example");
        assert_eq!(config.home_slug, "home");
        assert_eq!(config.languages, [Lang::Ru, Lang::En]);
        assert_eq!(config.out_dir, PathBuf::from("public"));
        Ok(())
    }

    #[test]
    fn rejects_bad_files() {
        assert!(SiteConfig::from_toml("languages = []").is_err());
        assert!(SiteConfig::from_toml("languages = [\"de\"]").is_err());
        assert!(SiteConfig::from_toml("colour = \"red\"").is_err());
    }

    #[test]
    fn environment_overrides_file() -> Result<()> {
        let mut config = SiteConfig::from_toml("base_path = \"/old\"\napi_url = \"http://a\"")?;
        let env = HashMap::from([
            (ENV_BASE_PATH, "/preview/"),
            (ENV_TOKEN, "t0k"),
            (ENV_API_URL, " "),
        ]);
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.base_path(), "/preview");
        assert_eq!(config.api_url.as_deref(), Some("http://a"));
        assert_eq!(config.token.as_deref(), Some("t0k"));
        Ok(())
    }
}
