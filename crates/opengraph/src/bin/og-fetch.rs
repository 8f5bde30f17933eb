// ABOUTME: CLI binary for the SSRF-safe Open Graph fetcher.
// ABOUTME: Fetches one or more HTTPS URLs and prints the extracted og:* properties as JSON.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use opengraph_fetcher::{Fetcher, OpenGraphData};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "og-fetch")]
#[command(about = "Fetch Open Graph metadata from HTTPS pages", long_about = None)]
struct Args {
    /// HTTPS URLs to fetch
    #[arg(required = true)]
    urls: Vec<String>,

    /// DNS lookup timeout in milliseconds
    #[arg(long = "dns-timeout", default_value_t = 3000)]
    dns_timeout_ms: u64,

    /// Connect timeout in milliseconds
    #[arg(long = "connect-timeout", default_value_t = 3000)]
    connect_timeout_ms: u64,

    /// Read timeout in milliseconds
    #[arg(long = "read-timeout", default_value_t = 3000)]
    read_timeout_ms: u64,

    /// User-Agent header to send
    #[arg(long = "user-agent")]
    user_agent: Option<String>,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render(value: &serde_json::Value, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.unwrap_or_else(|_| "null".to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut builder = Fetcher::builder()
        .dns_timeout(Duration::from_millis(args.dns_timeout_ms))
        .connect_timeout(Duration::from_millis(args.connect_timeout_ms))
        .read_timeout(Duration::from_millis(args.read_timeout_ms))
        .allow_private_networks(args.allow_private_networks);
    if let Some(ua) = &args.user_agent {
        builder = builder.user_agent(ua);
    }
    let fetcher = builder.build();

    let mut results: Vec<(String, Result<OpenGraphData, String>)> = Vec::new();
    for url in &args.urls {
        let outcome = fetcher.fetch(url).await.map_err(|e| {
            eprintln!("error fetching {}: {}", url, e);
            e.to_string()
        });
        results.push((url.clone(), outcome));
    }

    let had_error = results.iter().any(|(_, r)| r.is_err());

    // A single successful URL prints the bare object; anything else gets envelopes.
    let output = match results.as_slice() {
        [(_, Ok(data))] => json!(data),
        [(_, Err(_))] => json!(null),
        _ => json!(results
            .iter()
            .map(|(url, r)| match r {
                Ok(data) => json!({ "url": url, "ok": true, "data": data, "error": null }),
                Err(e) => json!({ "url": url, "ok": false, "data": null, "error": e }),
            })
            .collect::<Vec<_>>()),
    };

    if !output.is_null() {
        println!("{}", render(&output, args.compact));
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
