// ABOUTME: Fetch executor that performs the HTTPS GET against a pinned, pre-resolved IP.
// ABOUTME: Handles connect/read timeouts, content-length limits, response checks and charset decoding.

use std::net::SocketAddr;

use bytes::{Bytes, BytesMut};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;

use crate::error::OpenGraphError;
use crate::options::Options;
use crate::resolver::ResolvedAddress;
use crate::uri::ParsedUrl;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Result of a completed fetch, before any status or content-type interpretation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as UTF-8 text, using charset hints from content-type header.
    pub fn text_utf8(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode the body, choosing the encoding from a byte-order mark, then the
/// declared charset, then statistical detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(body)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(declared_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(body, true);
            detector.guess(None, true)
        });
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// The `charset` parameter of a Content-Type value, unquoted and lowercased.
fn declared_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim().eq_ignore_ascii_case("charset").then(|| {
            value
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_ascii_lowercase()
        })
    })
}

fn header_map(url: &str, opts: &Options) -> Result<HeaderMap, OpenGraphError> {
    let mut headers = HeaderMap::new();
    for (key, value) in &opts.headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            OpenGraphError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("Failed to fetch data: invalid header {}: {}", key, e)),
            )
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            OpenGraphError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("Failed to fetch data: invalid header {}: {}", key, e)),
            )
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Map a transport error onto a Fetch error, calling out timeouts.
fn transport_error(url: &str, err: reqwest::Error) -> OpenGraphError {
    let source = if err.is_timeout() {
        anyhow::anyhow!("Request timed out: {}", err)
    } else {
        anyhow::anyhow!("Failed to fetch data: {}", err)
    };
    OpenGraphError::fetch(url, "Fetch", Some(source))
}

/// Fetch `parsed` over a connection to the pinned address.
///
/// The hostname is never looked up again: the client maps it to the resolved IP,
/// while TLS still verifies the certificate against the hostname. Redirects are
/// not followed and proxies are bypassed.
pub async fn fetch(
    parsed: &ParsedUrl,
    resolved: ResolvedAddress,
    opts: &Options,
) -> Result<FetchResult, OpenGraphError> {
    let url = parsed.as_str();
    let pinned = SocketAddr::new(resolved.ip(), parsed.effective_port());

    let mut builder = reqwest::Client::builder();
    for cert in &opts.root_certificates {
        builder = builder.add_root_certificate(cert.clone());
    }
    let client = builder
        .resolve(resolved.host(), pinned)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(opts.connect_timeout)
        .read_timeout(opts.read_timeout)
        .user_agent(&opts.user_agent)
        .default_headers(header_map(url, opts)?)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| {
            OpenGraphError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("Failed to fetch data: {}", e)),
            )
        })?;

    tracing::debug!(host = resolved.host(), addr = %pinned, "connecting to pinned address");

    let response = client
        .get(parsed.request_url())
        .send()
        .await
        .map_err(|e| transport_error(url, e))?;

    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or("").to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    // Non-200 answers are rejected on status alone; their body is never read.
    if status != StatusCode::OK {
        return Ok(FetchResult {
            status: status.as_u16(),
            status_text,
            content_type,
            body: Bytes::new(),
        });
    }

    let content_length = response.content_length().or_else(|| {
        response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    });
    if content_length.is_some_and(|len| len > opts.max_content_length as u64) {
        return Err(too_large(url));
    }

    let body = read_capped(url, response, opts.max_content_length).await?;

    Ok(FetchResult {
        status: status.as_u16(),
        status_text,
        content_type,
        body,
    })
}

fn too_large(url: &str) -> OpenGraphError {
    OpenGraphError::fetch(
        url,
        "Fetch",
        Some(anyhow::anyhow!("Failed to fetch data: content too large")),
    )
}

/// Read the (decompressed) body chunk by chunk, failing as soon as it exceeds `cap`.
async fn read_capped(
    url: &str,
    response: reqwest::Response,
    cap: usize,
) -> Result<Bytes, OpenGraphError> {
    let mut stream = response.bytes_stream();
    let mut body = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| transport_error(url, e))?;
        if body.len() + chunk.len() > cap {
            return Err(too_large(url));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

/// Check that a fetch returned 200 with an HTML content type.
pub fn check_response(url: &str, result: &FetchResult) -> Result<(), OpenGraphError> {
    if result.status != 200 {
        return Err(OpenGraphError::response(
            url,
            "Fetch",
            Some(anyhow::anyhow!(
                "HTTP response is not ok: HTTP {} {}",
                result.status,
                result.status_text
            )),
        ));
    }

    let is_html = result
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.trim_start().starts_with("text/html"));
    if !is_html {
        return Err(OpenGraphError::invalid_content_type(
            url,
            "Fetch",
            Some(anyhow::anyhow!("Only HTML content is allowed")),
        ));
    }

    Ok(())
}
