use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Events go to stderr; stdout carries command output.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "simfeed_pool_cache_hit_total",
            Unit::Count,
            "Total number of pool lookups served from a ready entry."
        );
        describe_counter!(
            "simfeed_pool_cache_miss_total",
            Unit::Count,
            "Total number of pool lookups that started a fetch."
        );
        describe_counter!(
            "simfeed_pool_cache_coalesced_total",
            Unit::Count,
            "Total number of pool lookups that joined an in-flight fetch."
        );
        describe_counter!(
            "simfeed_pool_fetch_failure_total",
            Unit::Count,
            "Total number of pool fetches that failed or panicked."
        );
        describe_histogram!(
            "simfeed_pool_fetch_ms",
            Unit::Milliseconds,
            "Pool fetch latency in milliseconds."
        );
    });
}
