// ABOUTME: Main library entry point for the SSRF-safe Open Graph fetcher.
// ABOUTME: Re-exports the public API: Fetcher, FetcherBuilder, Options, OpenGraphData, OpenGraphError, ErrorCode.

//! Fetch a page over HTTPS and extract its Open Graph metadata without
//! letting the request reach private, loopback or link-local addresses.
//!
//! A fetch runs five gates in order: URL validation, a single DNS lookup,
//! the private-IP check, an HTTPS request pinned to the checked address, and
//! extraction of `og:title`, `og:type`, `og:image`, `og:url` and
//! `og:description`.
//!
//! # Example
//!
//! ```no_run
//! use opengraph_fetcher::{Fetcher, OpenGraphError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), OpenGraphError> {
//!     let fetcher = Fetcher::builder().build();
//!     let og = fetcher.fetch("https://ogp.me").await?;
//!     println!("{:?}", og.title);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod ip;
pub mod opengraph;
pub mod options;
pub mod resolver;
pub mod resource;
pub mod uri;

pub use crate::client::{fetch_open_graph, Fetcher};
pub use crate::error::{ErrorCode, OpenGraphError};
pub use crate::ip::{is_private_or_reserved, is_private_or_reserved_str};
pub use crate::opengraph::{extract, OpenGraphData, Property};
pub use crate::options::{FetcherBuilder, Options};
pub use crate::resolver::{ResolvedAddress, Resolver, SystemResolver};
pub use crate::resource::FetchResult;
pub use crate::uri::{validate, ParsedUrl};
