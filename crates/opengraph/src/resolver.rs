// ABOUTME: Hostname resolution stage producing the single pinned address for one fetch.
// ABOUTME: Defines the Resolver seam, the tokio-backed SystemResolver and the timeout-bounded resolve step.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use crate::error::OpenGraphError;
use crate::uri::ParsedUrl;

/// Source of DNS answers. Implementations return one address per lookup.
pub trait Resolver: Send + Sync {
    fn resolve(&self, host: &str) -> impl Future<Output = anyhow::Result<IpAddr>> + Send;
}

/// Resolver backed by the operating system via `tokio::net::lookup_host`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    async fn resolve(&self, host: &str) -> anyhow::Result<IpAddr> {
        let mut addrs = tokio::net::lookup_host((host, 443)).await?;
        addrs
            .next()
            .map(|sa| sa.ip())
            .ok_or_else(|| anyhow::anyhow!("no addresses found for {}", host))
    }
}

/// An IP bound to a hostname for exactly one fetch.
///
/// Only the resolve stage creates these, and the fetch stage consumes them by value.
#[derive(Debug)]
pub struct ResolvedAddress {
    host: String,
    ip: IpAddr,
}

impl ResolvedAddress {
    pub(crate) fn new(host: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            host: host.into(),
            ip,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }
}

/// Resolve the URL's hostname once, bounded by `timeout`.
pub async fn resolve<R: Resolver>(
    resolver: &R,
    parsed: &ParsedUrl,
    timeout: Duration,
) -> Result<ResolvedAddress, OpenGraphError> {
    let host = parsed.hostname();
    let ip = match tokio::time::timeout(timeout, resolver.resolve(host)).await {
        Ok(Ok(ip)) => ip,
        Ok(Err(e)) => {
            return Err(OpenGraphError::ip_resolution(
                parsed.as_str(),
                "Resolve",
                Some(anyhow::anyhow!("Could not resolve IP: {}", e)),
            ));
        }
        Err(_) => {
            return Err(OpenGraphError::ip_resolution(
                parsed.as_str(),
                "Resolve",
                Some(anyhow::anyhow!(
                    "Could not resolve IP: DNS lookup timed out after {}ms",
                    timeout.as_millis()
                )),
            ));
        }
    };

    Ok(ResolvedAddress::new(host, ip))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Canned resolver for tests: a fixed answer, a failure, or a hang.
    pub(crate) enum StaticResolver {
        Answer(IpAddr),
        Fail(&'static str),
        Hang,
    }

    impl Resolver for StaticResolver {
        async fn resolve(&self, _host: &str) -> anyhow::Result<IpAddr> {
            match self {
                StaticResolver::Answer(ip) => Ok(*ip),
                StaticResolver::Fail(msg) => Err(anyhow::anyhow!("{}", msg)),
                StaticResolver::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Err(anyhow::anyhow!("unreachable"))
                }
            }
        }
    }

    fn parsed() -> ParsedUrl {
        crate::uri::validate("https://example.com/page").unwrap()
    }

    #[tokio::test]
    async fn resolve_binds_host_to_answer() {
        let resolver = StaticResolver::Answer("203.0.113.0".parse().unwrap());
        let resolved = resolve(&resolver, &parsed(), Duration::from_secs(3))
            .await
            .unwrap();
        assert_eq!(resolved.host(), "example.com");
        assert_eq!(resolved.ip(), "203.0.113.0".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn resolve_wraps_failure_message() {
        let resolver = StaticResolver::Fail("DNS resolution failed");
        let err = resolve(&resolver, &parsed(), Duration::from_secs(3))
            .await
            .expect_err("should fail");
        assert!(err.is_ip_resolution());
        assert!(err
            .to_string()
            .contains("Could not resolve IP: DNS resolution failed"));
    }

    #[tokio::test]
    async fn resolve_times_out() {
        let err = resolve(&StaticResolver::Hang, &parsed(), Duration::from_millis(50))
            .await
            .expect_err("should time out");
        assert!(err.is_ip_resolution());
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn system_resolver_resolves_localhost() {
        let ip = SystemResolver.resolve("localhost").await.unwrap();
        assert!(ip.is_loopback());
    }
}
