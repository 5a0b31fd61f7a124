//! End-to-end demo: define a family, translate a foreign failure, and
//! emit structured log records.
//!
//! ```sh
//! cargo run -p errfamily-tracing --example structured_logs
//! RUST_LOG=debug cargo run -p errfamily-tracing --example structured_logs
//! ```

use std::error::Error as StdError;
use std::fmt;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use errfamily_core::{define, payload, ErrorSpec};
use errfamily_tracing::{emit, to_json};

#[derive(Debug)]
struct DriverTimeout {
    millis: u64,
}

impl fmt::Display for DriverTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "driver gave up after {}ms", self.millis)
    }
}

impl StdError for DriverTimeout {}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let api = define([
        (
            "NotFound",
            ErrorSpec::template(1, |p| format!("Resource {} not found", p[0])),
        ),
        ("Unauthorized", ErrorSpec::fixed("User is not logged in")),
        (
            "StorageUnavailable",
            ErrorSpec::fixed("Storage backend unavailable"),
        ),
    ])?;

    // a plain construction, anchored right here
    let not_found = api
        .case("NotFound")
        .ok_or_else(|| anyhow!("NotFound case missing"))?;
    emit(&not_found.build(payload![42], None));

    // a foreign driver error routed through the registry
    let storage = api
        .case("StorageUnavailable")
        .ok_or_else(|| anyhow!("StorageUnavailable case missing"))?;
    let routed = api.enroll::<DriverTimeout>(&storage)?;
    let translated = routed.translate(DriverTimeout { millis: 350 })?;
    emit(&translated);

    // the same records, rendered for a JSON pipeline
    println!("{}", serde_json::to_string_pretty(&to_json(&translated)?)?);
    Ok(())
}
