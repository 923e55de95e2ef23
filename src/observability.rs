//! Observability module for structured logging and metrics recording.
//!
//! This module provides:
//! - Structured logging setup with configurable levels and formats
//! - Metrics recording functions for scans, index builds and store mutations
//!
//! Metrics go through the `metrics` facade; they are no-ops until the host
//! application installs a recorder.

use anyhow::Result;
use std::time::Duration;
use tracing_subscriber::prelude::*;

use crate::config::LoggingConfig;

/// Initialize structured logging from configuration
///
/// Pretty output in development (or with `log_format = "pretty"`), JSON
/// otherwise. Fails if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("ingredient_scanner={}", config.log_level.to_lowercase()).parse()?);

    if config.use_pretty_format() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Record scan operation metrics
pub fn record_scan_metrics(token_count: usize, match_count: usize, duration: Duration) {
    metrics::counter!("scan_operations_total").increment(1);
    metrics::histogram!("scan_duration_seconds").record(duration.as_secs_f64());
    metrics::histogram!("scan_tokens").record(token_count as f64);
    metrics::histogram!("scan_matches").record(match_count as f64);
}

/// Record group index build metrics
pub fn record_index_build_metrics(phrase_count: usize, duration: Duration) {
    metrics::counter!("group_index_builds_total").increment(1);
    metrics::histogram!("group_index_build_duration_seconds").record(duration.as_secs_f64());
    metrics::gauge!("group_index_phrases").set(phrase_count as f64);
}

/// Record a group store mutation
pub fn record_store_mutation(operation: &'static str) {
    metrics::counter!("group_store_mutations_total", "operation" => operation).increment(1);
}

/// Record an index cache lookup
pub fn record_index_cache_lookup(hit: bool) {
    metrics::counter!("group_index_cache_lookups_total", "result" => if hit { "hit" } else { "miss" })
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_recorder_are_noops() {
        record_scan_metrics(10, 2, Duration::from_millis(1));
        record_index_build_metrics(40, Duration::from_micros(50));
        record_store_mutation("add_word");
        record_index_cache_lookup(true);
    }

    #[test]
    fn test_init_tracing_twice_fails_gracefully() {
        let config = LoggingConfig::default();
        let first = init_tracing(&config);
        let second = init_tracing(&config);
        // Only one global subscriber can be installed per process
        assert!(first.is_err() || second.is_err());
    }
}
