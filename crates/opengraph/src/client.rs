// ABOUTME: The Fetcher, which runs validate, resolve, IP gate, pinned fetch and extraction in order.
// ABOUTME: Each stage short-circuits the pipeline with a typed OpenGraphError.

use tracing::{debug, warn};

use crate::error::OpenGraphError;
use crate::ip::is_private_or_reserved;
use crate::opengraph::{extract, OpenGraphData};
use crate::options::{FetcherBuilder, Options};
use crate::resolver::{resolve, Resolver, SystemResolver};
use crate::resource::{check_response, fetch};
use crate::uri::{validate, ParsedUrl};

/// Fetches a page over HTTPS and extracts its Open Graph data.
///
/// A Fetcher holds no per-request state, so one instance can serve
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Fetcher<R = SystemResolver> {
    opts: Options,
    resolver: R,
}

impl Fetcher {
    /// Create a new FetcherBuilder for configuring the fetcher.
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::new()
    }

    /// Create a new Fetcher with the given options and the system resolver.
    pub fn new(opts: Options) -> Self {
        Self::with_resolver(opts, SystemResolver)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<R: Resolver> Fetcher<R> {
    /// Create a new Fetcher with the given options and resolver.
    pub fn with_resolver(opts: Options, resolver: R) -> Self {
        Self { opts, resolver }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Fetch `url` and extract its Open Graph properties.
    pub async fn fetch(&self, url: &str) -> Result<OpenGraphData, OpenGraphError> {
        let parsed = validate(url)?;
        debug!(host = parsed.hostname(), "validated URL");
        self.fetch_parsed(&parsed).await
    }

    async fn fetch_parsed(&self, parsed: &ParsedUrl) -> Result<OpenGraphData, OpenGraphError> {
        let resolved = resolve(&self.resolver, parsed, self.opts.dns_timeout).await?;
        debug!(host = resolved.host(), ip = %resolved.ip(), "resolved host");

        if !self.opts.allow_private_networks && is_private_or_reserved(&resolved.ip()) {
            warn!(host = resolved.host(), ip = %resolved.ip(), "blocked fetch to private address");
            return Err(OpenGraphError::private_ip(
                parsed.as_str(),
                "Fetch",
                Some(anyhow::anyhow!(
                    "Resolved IP address is in a private or reserved range"
                )),
            ));
        }

        let result = fetch(parsed, resolved, &self.opts).await?;
        debug!(
            status = result.status,
            content_type = result.content_type.as_deref().unwrap_or(""),
            bytes = result.body.len(),
            "fetched page"
        );
        check_response(parsed.as_str(), &result)?;

        let data = extract(&result.text_utf8());
        debug!(properties = data.len(), "extracted open graph data");
        Ok(data)
    }
}

/// Fetch `url` with default options and the system resolver.
pub async fn fetch_open_graph(url: &str) -> Result<OpenGraphData, OpenGraphError> {
    Fetcher::default().fetch(url).await
}
