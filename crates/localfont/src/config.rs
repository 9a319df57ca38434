//! Configuration file discovery and parsing
//!
//! Searches for `.config/localfont.yaml` walking up from the current directory.
//! Every field is optional; a missing file means all defaults.

use std::env;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, eyre};
use facet::Facet;
use localfont_css::DEFAULT_LOCAL_PREFIX;
use localfont_fetch::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetchOptions, GOOGLE_FONTS_HOST};

use crate::record::DEFAULT_SAMPLE_TEXT;

const CONFIG_DIR: &str = ".config";
const CONFIG_FILE_YAML: &str = "localfont.yaml";

/// localfont configuration from `.config/localfont.yaml`
#[derive(Debug, Clone, Default, Facet)]
#[facet(rename_all = "snake_case")]
pub struct LocalfontConfig {
    /// Hosts that stylesheet URLs may point at
    #[facet(default)]
    pub allowed_hosts: Option<Vec<String>>,

    /// Path prefix for rewritten font URLs (e.g. `/fonts`)
    #[facet(default)]
    pub local_prefix: Option<String>,

    /// Sample text for new font slots and `subset`
    #[facet(default)]
    pub sample_text: Option<String>,

    /// HTTP settings
    #[facet(default)]
    pub fetch: Option<FetchConfig>,
}

#[derive(Debug, Clone, Default, Facet)]
#[facet(rename_all = "snake_case")]
pub struct FetchConfig {
    /// Per-request timeout in seconds. Default: 30
    #[facet(default)]
    pub timeout_secs: Option<u64>,

    #[facet(default)]
    pub user_agent: Option<String>,
}

/// Configuration with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// File the configuration came from, if any
    pub source: Option<Utf8PathBuf>,
    pub allowed_hosts: Vec<String>,
    pub local_prefix: String,
    pub sample_text: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            source: None,
            allowed_hosts: vec![GOOGLE_FONTS_HOST.to_string()],
            local_prefix: DEFAULT_LOCAL_PREFIX.to_string(),
            sample_text: DEFAULT_SAMPLE_TEXT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Discover and load configuration from the current directory.
    ///
    /// Falls back to defaults when no config file exists.
    pub fn discover() -> Result<Self> {
        let cwd = env::current_dir()?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
            eyre!(
                "Current directory is not valid UTF-8: {}",
                e.as_path().display()
            )
        })?;

        match find_config_file(&cwd) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load(config_path: &Utf8Path) -> Result<Self> {
        let content = fs_err::read_to_string(config_path)?;
        let mut resolved = Self::from_yaml(&content)
            .map_err(|e| eyre!("Failed to load {}: {}", config_path, e))?;
        resolved.source = Some(config_path.to_owned());
        tracing::debug!(path = %config_path, "loaded configuration");
        Ok(resolved)
    }

    /// Parse and resolve YAML configuration text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: LocalfontConfig =
            facet_yaml::from_str(content).map_err(|e| eyre!("invalid YAML: {}", e))?;
        resolve(config)
    }

    /// HTTP options for a [`localfont_fetch::Fetcher`]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new()
            .allowed_hosts(self.allowed_hosts.iter().cloned())
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
    }
}

/// Search for `.config/localfont.yaml` walking up from `start`
fn find_config_file(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE_YAML))
        .find(|path| path.exists())
}

fn resolve(config: LocalfontConfig) -> Result<ResolvedConfig> {
    let defaults = ResolvedConfig::default();

    let allowed_hosts = match config.allowed_hosts {
        Some(hosts) if hosts.is_empty() => {
            return Err(eyre!("allowed_hosts must list at least one host"));
        }
        Some(hosts) => hosts.into_iter().map(|h| h.trim().to_lowercase()).collect(),
        None => defaults.allowed_hosts,
    };

    let local_prefix = match config.local_prefix {
        Some(prefix) if !prefix.starts_with('/') => {
            return Err(eyre!("local_prefix must start with '/', got '{}'", prefix));
        }
        Some(prefix) => prefix,
        None => defaults.local_prefix,
    };

    let fetch = config.fetch.unwrap_or_default();
    let timeout = match fetch.timeout_secs {
        Some(0) => return Err(eyre!("fetch.timeout_secs must be greater than zero")),
        Some(secs) => Duration::from_secs(secs),
        None => defaults.timeout,
    };

    Ok(ResolvedConfig {
        source: None,
        allowed_hosts,
        local_prefix,
        sample_text: config.sample_text.unwrap_or(defaults.sample_text),
        timeout,
        user_agent: fetch.user_agent.unwrap_or(defaults.user_agent),
    })
}
