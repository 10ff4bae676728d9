//! Shared plumbing for the Folio command-line clients: logging setup and the
//! choice between a content directory and the content API.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use folio_gateway::{Authenticator, ContentGateway, HttpGateway, MemoryGateway};
use folio_site::SiteConfig;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the stderr log subscriber. `RUST_LOG` overrides the `info`
/// default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Where content is read from. At most one may be given; when neither is,
/// the configuration decides.
#[derive(Debug, Clone, Default, Args)]
#[group(multiple = false)]
pub struct SourceArgs {
    /// Directory holding one JSON file per collection.
    #[arg(long, value_name = "DIR")]
    pub content: Option<PathBuf>,

    /// Base URL of the content API.
    #[arg(long, value_name = "URL")]
    pub api: Option<String>,
}

impl SourceArgs {
    /// Opens the content store: `--content`, then `--api`, then the
    /// configured API URL, then the configured content directory.
    ///
    /// # Errors
    ///
    /// Returns an error when no source is configured or the content
    /// directory cannot be loaded.
    pub fn open(&self, config: &SiteConfig) -> Result<Store> {
        if let Some(dir) = &self.content {
            return Store::dir(dir);
        }
        if let Some(url) = self.api.as_ref().or(config.api_url.as_ref()) {
            return Ok(Store::api(url, config.token.clone()));
        }
        if let Some(dir) = &config.content_dir {
            return Store::dir(dir);
        }
        bail!("No content source: pass --content DIR or --api URL")
    }

    /// Applies the flags to a site configuration so that they win over the
    /// file and the environment.
    pub fn override_config(&self, config: &mut SiteConfig) {
        if let Some(dir) = &self.content {
            config.content_dir = Some(dir.clone());
            config.api_url = None;
        } else if let Some(url) = &self.api {
            config.api_url = Some(url.clone());
        }
    }
}

/// An opened content store.
pub enum Store {
    /// A content directory loaded into memory; written back by
    /// [`Store::persist`].
    Dir {
        /// The loaded content.
        gateway: MemoryGateway,
        /// Directory it was loaded from.
        dir: PathBuf,
    },
    /// The content API.
    Api(HttpGateway),
}

impl Store {
    fn dir(dir: &Path) -> Result<Self> {
        let gateway = MemoryGateway::load_dir(dir)
            .with_context(|| format!("Cannot load content from {}", dir.display()))?;
        debug!(dir = %dir.display(), "content directory loaded");
        Ok(Store::Dir {
            gateway,
            dir: dir.to_path_buf(),
        })
    }

    fn api(url: &str, token: Option<String>) -> Self {
        let gateway = HttpGateway::new(url);
        debug!(url, "using content API");
        Store::Api(match token {
            Some(token) => gateway.with_token(token),
            None => gateway,
        })
    }

    /// The store as a content gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn ContentGateway {
        match self {
            Store::Dir { gateway, .. } => gateway,
            Store::Api(gateway) => gateway,
        }
    }

    /// The store as an authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &dyn Authenticator {
        match self {
            Store::Dir { gateway, .. } => gateway,
            Store::Api(gateway) => gateway,
        }
    }

    /// Writes a content directory back to disk. The API needs nothing.
    ///
    /// # Errors
    ///
    /// Returns an error when a collection file cannot be written.
    pub fn persist(&self) -> Result<()> {
        if let Store::Dir { gateway, dir } = self {
            gateway
                .save_dir(dir)
                .with_context(|| format!("Cannot write content to {}", dir.display()))?;
        }
        Ok(())
    }
}

/// The configuration used when no config file is given: defaults plus the
/// process environment.
#[must_use]
pub fn env_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.apply_env(|key| std::env::var(key).ok());
    config
}

#[cfg(test)]
mod tests {
    use folio_gateway::PAGES;
    use folio_model::{Document, LocalizedText, Page};

    use super::*;

    #[test]
    fn flags_win_over_configuration() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let args = SourceArgs {
            content: Some(dir.path().to_path_buf()),
            api: None,
        };
        let mut config = SiteConfig {
            api_url: Some("http://cms.invalid".into()),
            ..SiteConfig::default()
        };
        assert!(matches!(args.open(&config)?, Store::Dir { .. }));

        args.override_config(&mut config);
        assert_eq!(config.api_url, None);
        assert_eq!(config.content_dir.as_deref(), Some(dir.path()));
        Ok(())
    }

    #[test]
    fn configured_api_is_used_without_flags() -> Result<()> {
        let config = SiteConfig {
            api_url: Some("http://cms.invalid".into()),
            token: Some("t".into()),
            ..SiteConfig::default()
        };
        match SourceArgs::default().open(&config)? {
            Store::Api(gateway) => assert_eq!(gateway.token().as_deref(), Some("t")),
            Store::Dir { .. } => bail!("expected the API store"),
        }
        Ok(())
    }

    #[test]
    fn missing_source_is_an_error() {
        assert!(SourceArgs::default().open(&SiteConfig::default()).is_err());
    }

    #[test]
    fn directory_store_persists_edits() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let args = SourceArgs {
            content: Some(dir.path().to_path_buf()),
            api: None,
        };
        let store = args.open(&SiteConfig::default())?;
        store
            .gateway()
            .create(PAGES, Page::new("about", LocalizedText::new("О нас")).to_record())?;
        store.persist()?;

        let reopened = args.open(&SiteConfig::default())?;
        let pages = reopened.gateway().list(PAGES, &folio_gateway::ListQuery::new())?;
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text("slug"), "about");
        Ok(())
    }
}
