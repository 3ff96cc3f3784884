use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;
use crate::error::{BioactyxError, Result};

/// Hosts every client may reach without extra configuration.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    "www.ebi.ac.uk", // ChEMBL
    "localhost",
    "127.0.0.1",
];

/// An HTTP client that only issues requests to approved hosts.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and no request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Creates a client with the default allowlist. A `None` timeout lets a
    /// request wait for the server indefinitely.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let allowlist = DEFAULT_ALLOWED_DOMAINS
            .iter()
            .map(|d| d.to_string())
            .collect();

        let mut builder = ClientBuilder::new()
            .user_agent(concat!("bioactyx/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BioactyxError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        debug!(domain, "Allowing additional domain");
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current allowlist.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        // Exact match or a subdomain of an allowed host
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// Starts a GET request, refusing hosts outside the allowlist.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder> {
        if !self.is_allowed(url) {
            return Err(BioactyxError::Security(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}
