//! Configuration loading for bioactyx.
//! Reads bioactyx.toml from the current directory or the path in the BIOACTYX_CONFIG env var.
//! Without a file, built-in defaults reproduce the reference run (catechol, 100 compounds).

use bioactyx_chembl::sources::chembl::CHEMBL_API_URL;
use bioactyx_chembl::{ActivitySearchJob, ChemblClient};
use bioactyx_common::SandboxClient;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_pattern()     -> String { "catechol".to_string() }
fn default_max_results() -> usize  { 100 }
fn default_page_size()   -> usize  { 20 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            max_results: default_max_results(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_activity_limit")]
    pub activity_limit: usize,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_activity_limit() -> usize { 10 }
fn default_concurrency()    -> usize { 10 }

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            activity_limit: default_activity_limit(),
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unset means requests wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub extra_allowed_domains: Vec<String>,
}

fn default_base_url() -> String { CHEMBL_API_URL.to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            extra_allowed_domains: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_output_dir() }
    }
}


impl Config {
    /// Load configuration from bioactyx.toml.
    /// Checks BIOACTYX_CONFIG env var first, then current directory.
    /// A missing bioactyx.toml in the current directory falls back to defaults;
    /// a missing file named by BIOACTYX_CONFIG is an error.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("BIOACTYX_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => {
                let path = Path::new("bioactyx.toml");
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.search.pattern.trim().is_empty() {
            anyhow::bail!("search.pattern must not be empty");
        }
        Ok(config)
    }

    pub fn to_job(&self) -> ActivitySearchJob {
        ActivitySearchJob {
            pattern: self.search.pattern.clone(),
            max_results: self.search.max_results,
            page_size: self.search.page_size,
            activity_limit: self.enrichment.activity_limit,
            concurrency: self.enrichment.concurrency,
        }
    }

    pub fn build_client(&self) -> anyhow::Result<ChemblClient> {
        let timeout = self.api.request_timeout_secs.map(Duration::from_secs);
        let mut sandbox = SandboxClient::with_timeout(timeout)?;
        for domain in &self.api.extra_allowed_domains {
            sandbox.allow_domain(domain);
        }
        Ok(ChemblClient::with_client(sandbox, &self.api.base_url))
    }
}
