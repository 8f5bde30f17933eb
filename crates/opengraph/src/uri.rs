// ABOUTME: URI validator that turns a raw URL string into a ParsedUrl.
// ABOUTME: Enforces the https scheme, the default port and a DNS hostname (no IP literals).

use url::{Host, Url};

use crate::error::OpenGraphError;

/// A URL that passed every policy check of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    url: Url,
    host: String,
}

impl ParsedUrl {
    /// Build a ParsedUrl without policy checks, for fetch-stage tests against plain HTTP mocks.
    #[cfg(test)]
    pub(crate) fn unchecked(raw: &str) -> Self {
        let url = Url::parse(raw).unwrap();
        let host = url.host_str().unwrap().to_string();
        Self { url, host }
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn hostname(&self) -> &str {
        &self.host
    }

    /// The explicit port, if any. The URL parser drops a port equal to the scheme default.
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    /// The port the connection goes to.
    pub(crate) fn effective_port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(443)
    }

    /// Request target: path plus query, without the fragment.
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(q) => format!("{}?{}", self.url.path(), q),
            None => self.url.path().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub(crate) fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url
    }
}

/// Parse and check a URL against the fetch policy.
///
/// Checks run in a fixed order: syntax, scheme, port, then host.
pub fn validate(raw: &str) -> Result<ParsedUrl, OpenGraphError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        OpenGraphError::invalid_uri(
            raw,
            "Validate",
            Some(anyhow::anyhow!("Could not parse URI: {}", e)),
        )
    })?;

    if !url.scheme().eq_ignore_ascii_case("https") {
        return Err(OpenGraphError::invalid_scheme(
            raw,
            "Validate",
            Some(anyhow::anyhow!("Only HTTPS URLs are allowed")),
        ));
    }

    if let Some(port) = url.port() {
        if port != 443 {
            return Err(OpenGraphError::invalid_port(
                raw,
                "Validate",
                Some(anyhow::anyhow!("Only the default HTTPS port (443) is allowed")),
            ));
        }
    }

    let host = match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
            return Err(OpenGraphError::invalid_host(
                raw,
                "Validate",
                Some(anyhow::anyhow!("Using an IP as host is not allowed")),
            ));
        }
        _ => {
            return Err(OpenGraphError::invalid_uri(
                raw,
                "Validate",
                Some(anyhow::anyhow!("Could not parse URI: missing host")),
            ));
        }
    };

    Ok(ParsedUrl { url, host })
}
