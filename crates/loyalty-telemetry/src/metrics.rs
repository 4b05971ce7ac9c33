//! Prometheus metrics for the loyalty engine.
//!
//! All metrics follow the naming convention: `sl_<component>_<metric>_<unit>`
//!
//! Statics are always usable; they only show up in [`encode_metrics`]
//! output once [`register_metrics`] has run.

use lazy_static::lazy_static;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

/// Scan latency buckets in seconds (100µs .. ~1.6s).
const SCAN_DURATION_BUCKETS: &[f64] = &[
    0.0001, 0.0002, 0.0004, 0.0008, 0.0016, 0.0032, 0.0064, 0.0128, 0.0256, 0.0512, 0.1024,
    0.2048, 0.4096, 0.8192, 1.6384,
];

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LEDGER METRICS
    // =========================================================================

    /// Stamps appended to the ledger
    pub static ref STAMPS_ISSUED: IntCounter = IntCounter::new(
        "sl_ledger_stamps_issued_total",
        "Total number of stamps appended to the ledger"
    ).expect("metric creation failed");

    /// Stamps flipped to redeemed
    pub static ref STAMPS_REDEEMED: IntCounter = IntCounter::new(
        "sl_ledger_stamps_redeemed_total",
        "Total number of stamps marked redeemed"
    ).expect("metric creation failed");

    // =========================================================================
    // ENGINE METRICS
    // =========================================================================

    /// Completed cards
    pub static ref REWARDS_EARNED: IntCounter = IntCounter::new(
        "sl_engine_rewards_earned_total",
        "Total number of completed loyalty cards"
    ).expect("metric creation failed");

    /// Rejected scans by reason
    pub static ref SCANS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("sl_engine_scans_rejected_total", "Scans rejected by the cycle engine"),
        &["reason"]  // reason: invalid_payload/campaign_not_found/campaign_inactive/out_of_range/concurrent_redemption/infrastructure
    ).expect("metric creation failed");

    /// End-to-end scan handling time
    pub static ref SCAN_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "sl_engine_scan_duration_seconds",
            "Time spent handling a scan"
        ).buckets(SCAN_DURATION_BUCKETS.to_vec())
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Ledger
        Box::new(STAMPS_ISSUED.clone()),
        Box::new(STAMPS_REDEEMED.clone()),
        // Engine
        Box::new(REWARDS_EARNED.clone()),
        Box::new(SCANS_REJECTED.clone()),
        Box::new(SCAN_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}
