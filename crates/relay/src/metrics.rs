use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::Result;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref REQUESTS_TOTAL: IntCounter = IntCounter::new(
        "apprise_relay_requests_total",
        "Total number of webhook requests received."
    )
    .expect("valid metric definition");
    pub static ref DECODE_FAILURES_TOTAL: IntCounter = IntCounter::new(
        "apprise_relay_decode_failures_total",
        "Total number of webhook requests dropped because the body could not be decoded."
    )
    .expect("valid metric definition");
    pub static ref ALERTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "apprise_relay_alerts_total",
            "Total number of alerts relayed, by alert status."
        ),
        &["status"]
    )
    .expect("valid metric definition");
    pub static ref DELIVERIES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "apprise_relay_deliveries_total",
            "Total number of notifications sent to Apprise, by outcome."
        ),
        &["outcome"]
    )
    .expect("valid metric definition");
}

/// Register all relay metrics plus the process collector with [`REGISTRY`].
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DECODE_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ALERTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DELIVERIES_TOTAL.clone()))?;
    #[cfg(target_os = "linux")]
    REGISTRY.register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))?;
    Ok(())
}

pub fn record_delivery(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    DELIVERIES_TOTAL.with_label_values(&[outcome]).inc();
}

/// Encode the registry in the Prometheus text exposition format.
pub fn gather_metrics() -> Result<String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
