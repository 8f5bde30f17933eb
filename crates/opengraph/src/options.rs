// ABOUTME: Configuration options for the Open Graph fetcher and the FetcherBuilder.
// ABOUTME: Holds the DNS/connect/read timeouts and request settings that used to be compiled-in constants.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Fetcher;
use crate::resolver::Resolver;
use crate::resource::MAX_CONTENT_LENGTH;

/// Default bound for DNS lookup, TCP/TLS connect and each body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration options for a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct Options {
    pub dns_timeout: Duration,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub max_content_length: usize,
    /// Extra trust anchors for TLS, on top of the bundled web PKI roots.
    pub root_certificates: Vec<reqwest::Certificate>,
    /// Skip the private-IP gate. Only meant for tests against local servers.
    pub allow_private_networks: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dns_timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            user_agent: "opengraph-fetcher/0.1".to_string(),
            headers: HashMap::new(),
            max_content_length: MAX_CONTENT_LENGTH,
            root_certificates: Vec::new(),
            allow_private_networks: false,
        }
    }
}

/// Builder for constructing Fetcher instances with custom configuration.
#[derive(Debug, Clone)]
pub struct FetcherBuilder {
    opts: Options,
}

impl FetcherBuilder {
    /// Create a new FetcherBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the DNS lookup timeout.
    pub fn dns_timeout(mut self, timeout: Duration) -> Self {
        self.opts.dns_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.opts.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.opts.read_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Cap the accepted response body size in bytes.
    pub fn max_content_length(mut self, len: usize) -> Self {
        self.opts.max_content_length = len;
        self
    }

    /// Trust an additional root certificate, e.g. a private CA.
    pub fn add_root_certificate(mut self, cert: reqwest::Certificate) -> Self {
        self.opts.root_certificates.push(cert);
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Build a Fetcher that resolves through the system resolver.
    pub fn build(self) -> Fetcher {
        Fetcher::new(self.opts)
    }

    /// Build a Fetcher with a custom resolver.
    pub fn build_with_resolver<R: Resolver>(self, resolver: R) -> Fetcher<R> {
        Fetcher::with_resolver(self.opts, resolver)
    }
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
