// ABOUTME: Error types for the Open Graph fetcher including the ErrorCode enum and OpenGraphError struct.
// ABOUTME: Provides one constructor and one boolean helper per failure kind of the fetch pipeline.

use std::fmt;

/// Error codes, one per gate of the fetch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidUri,
    InvalidScheme,
    InvalidPort,
    InvalidHost,
    IpResolution,
    PrivateIp,
    Fetch,
    Response,
    InvalidContentType,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUri => "invalid URI",
            ErrorCode::InvalidScheme => "invalid scheme",
            ErrorCode::InvalidPort => "invalid port",
            ErrorCode::InvalidHost => "invalid host",
            ErrorCode::IpResolution => "IP resolution failed",
            ErrorCode::PrivateIp => "private IP blocked",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Response => "bad response",
            ErrorCode::InvalidContentType => "invalid content type",
        };
        write!(f, "{}", s)
    }
}

/// The error returned by every stage of a fetch.
#[derive(Debug, thiserror::Error)]
pub struct OpenGraphError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for OpenGraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opengraph: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl OpenGraphError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUri error.
    pub fn invalid_uri(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUri, url, op, source)
    }

    /// Create an InvalidScheme error.
    pub fn invalid_scheme(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidScheme, url, op, source)
    }

    /// Create an InvalidPort error.
    pub fn invalid_port(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidPort, url, op, source)
    }

    /// Create an InvalidHost error.
    pub fn invalid_host(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidHost, url, op, source)
    }

    /// Create an IpResolution error.
    pub fn ip_resolution(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::IpResolution, url, op, source)
    }

    /// Create a PrivateIp error.
    pub fn private_ip(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::PrivateIp, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Response error.
    pub fn response(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Response, url, op, source)
    }

    /// Create an InvalidContentType error.
    pub fn invalid_content_type(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidContentType, url, op, source)
    }

    /// Returns true if this is an InvalidUri error.
    pub fn is_invalid_uri(&self) -> bool {
        self.code == ErrorCode::InvalidUri
    }

    /// Returns true if this is an InvalidScheme error.
    pub fn is_invalid_scheme(&self) -> bool {
        self.code == ErrorCode::InvalidScheme
    }

    /// Returns true if this is an InvalidPort error.
    pub fn is_invalid_port(&self) -> bool {
        self.code == ErrorCode::InvalidPort
    }

    /// Returns true if this is an InvalidHost error.
    pub fn is_invalid_host(&self) -> bool {
        self.code == ErrorCode::InvalidHost
    }

    /// Returns true if this is an IpResolution error.
    pub fn is_ip_resolution(&self) -> bool {
        self.code == ErrorCode::IpResolution
    }

    /// Returns true if this is a PrivateIp error.
    pub fn is_private_ip(&self) -> bool {
        self.code == ErrorCode::PrivateIp
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Response error.
    pub fn is_response(&self) -> bool {
        self.code == ErrorCode::Response
    }

    /// Returns true if this is an InvalidContentType error.
    pub fn is_invalid_content_type(&self) -> bool {
        self.code == ErrorCode::InvalidContentType
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_code_and_source() {
        let err = OpenGraphError::ip_resolution(
            "https://nonexistent.example.com",
            "Resolve",
            Some(anyhow::anyhow!("Could not resolve IP: DNS resolution failed")),
        );
        assert_eq!(
            err.to_string(),
            "opengraph: Resolve https://nonexistent.example.com: IP resolution failed: \
             Could not resolve IP: DNS resolution failed"
        );
    }

    #[test]
    fn display_without_source() {
        let err = OpenGraphError::invalid_host("https://1.2.3.4/", "Validate", None);
        assert_eq!(
            err.to_string(),
            "opengraph: Validate https://1.2.3.4/: invalid host"
        );
    }

    #[test]
    fn helpers_match_only_their_code() {
        let err = OpenGraphError::private_ip("https://ssrf.example.com", "Fetch", None);
        assert!(err.is_private_ip());
        assert!(!err.is_fetch());
        assert!(!err.is_ip_resolution());
        assert_eq!(err.code, ErrorCode::PrivateIp);
    }
}
