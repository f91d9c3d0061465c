//! Site configuration management.
//!
//! Handles loading, parsing, and validating the `papers.toml` configuration file.
//!
//! # Sections
//!
//! | Section   | Purpose                                           |
//! |-----------|---------------------------------------------------|
//! | `[base]`  | Site metadata (title, author, language, url)      |
//! | `[build]` | Paths, path prefix, trailing slash, minify, anchor|
//! | `[serve]` | Preview server (interface, port)                  |

use crate::{
    citation::AnchorScheme,
    cli::{Cli, Commands},
};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default values for serde deserialization
pub mod config_defaults {
    pub fn r#true() -> bool {
        true
    }

    pub fn r#false() -> bool {
        false
    }

    pub mod base {
        pub fn title() -> String {
            "Papers".into()
        }
        pub fn author() -> String {
            "Research Team".into()
        }
        pub fn language() -> String {
            "en".into()
        }
        pub fn url() -> Option<String> {
            None
        }
    }

    pub mod build {
        use std::path::PathBuf;

        pub fn root() -> Option<PathBuf> {
            None
        }
        pub fn content() -> PathBuf {
            "content".into()
        }
        pub fn output() -> PathBuf {
            "out".into()
        }
        pub fn base_path() -> PathBuf {
            "papers".into()
        }
    }

    pub mod serve {
        pub fn interface() -> String {
            "127.0.0.1".into()
        }
        pub fn port() -> u16 {
            5277
        }
    }
}

/// `[base]` section in papers.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title, shown on the landing page tab
    #[serde(default = "config_defaults::base::title")]
    #[educe(Default = config_defaults::base::title())]
    pub title: String,

    /// Author shown in page metadata, e.g.: "Research Team"
    #[serde(default = "config_defaults::base::author")]
    #[educe(Default = config_defaults::base::author())]
    pub author: String,

    /// Site description
    #[serde(default)]
    pub description: String,

    /// Language code, e.g.: "en"
    #[serde(default = "config_defaults::base::language")]
    #[educe(Default = config_defaults::base::language())]
    pub language: String,

    /// Public site URL, e.g.: "https://example.com"
    #[serde(default = "config_defaults::base::url")]
    #[educe(Default = config_defaults::base::url())]
    pub url: Option<String>,
}

/// `[build]` section in papers.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Root directory path
    #[serde(default = "config_defaults::build::root")]
    #[educe(Default = config_defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content directory with `*.toml` pages (relative to root).
    /// The built-in pages are used when it does not exist.
    #[serde(default = "config_defaults::build::content")]
    #[educe(Default = config_defaults::build::content())]
    pub content: PathBuf,

    /// Output directory path (relative to root)
    #[serde(default = "config_defaults::build::output")]
    #[educe(Default = config_defaults::build::output())]
    pub output: PathBuf,

    /// Path prefix the site is served under, e.g.: "papers"
    #[serde(default = "config_defaults::build::base_path")]
    #[educe(Default = config_defaults::build::base_path())]
    pub base_path: PathBuf,

    /// Write `<slug>/index.html` instead of `<slug>.html`
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub trailing_slash: bool,

    /// Minify HTML output
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clear output directory before building
    #[serde(default = "config_defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// How reference-list anchors are addressed: "number" or "key"
    #[serde(default)]
    pub anchor: AnchorScheme,
}

/// `[serve]` section in papers.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Network interface to bind (e.g.: "127.0.0.1", "0.0.0.0")
    #[serde(default = "config_defaults::serve::interface")]
    #[educe(Default = config_defaults::serve::interface())]
    pub interface: String,

    /// Port number to listen on
    #[serde(default = "config_defaults::serve::port")]
    #[educe(Default = config_defaults::serve::port())]
    pub port: u16,
}

/// Root configuration structure representing papers.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the loaded config file
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Directory the pages are written to: `<output>/<base_path>`
    pub fn site_dir(&self) -> PathBuf {
        self.build.output.join(&self.build.base_path)
    }

    /// URL prefix for absolute links: `/papers` (empty when no prefix)
    pub fn url_prefix(&self) -> String {
        let base = self.build.base_path.to_string_lossy();
        let base = base.trim_matches('/');
        if base.is_empty() {
            String::new()
        } else {
            format!("/{base}")
        }
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        self.set_root(&root);

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.build.content = root.join(&self.build.content);
        self.build.output = root.join(&self.build.output);

        let build_args = cli.build_args();
        Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
        Self::update_option(&mut self.build.base_path, build_args.base_path.as_ref());
        self.build.clean |= build_args.clean;

        if let Commands::Serve { interface, port, .. } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            self.base.url = Some(format!("http://{}:{}", self.serve.interface, self.serve.port));
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.build.base_path.is_absolute() {
            bail!(ConfigError::Validation(
                "[build.base_path] must be relative, e.g. \"papers\"".into()
            ));
        }

        if self.build.output == *self.get_root() {
            bail!(ConfigError::Validation(
                "[build.output] must not be the project root".into()
            ));
        }

        Ok(())
    }
}
