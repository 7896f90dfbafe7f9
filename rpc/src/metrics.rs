//! Prometheus metrics for the lookup service.
//!
//! [`LookupMetrics`] owns a dedicated [`Registry`] that the `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry, Histogram,
    HistogramOpts, IntCounterVec, Opts, Registry,
};
use std::time::Duration;

/// How a lookup request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupOutcome {
    Found,
    NotFound,
    BadRequest,
    Error,
}

impl LookupOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::Error => "error",
        }
    }
}

pub struct LookupMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,
    /// Lookup requests by outcome.
    pub lookups: IntCounterVec,
    /// Time spent answering a lookup, in milliseconds.
    pub lookup_latency_ms: Histogram,
}

impl LookupMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let lookups = register_int_counter_vec_with_registry!(
            Opts::new("idcheck_lookups_total", "NIN lookups by outcome"),
            &["outcome"],
            registry
        )?;

        let lookup_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "idcheck_lookup_latency_ms",
                "Time spent answering a NIN lookup, in milliseconds"
            )
            .buckets(vec![1.0, 5.0, 25.0, 100.0, 500.0, 1000.0, 2500.0, 5000.0]),
            registry
        )?;

        Ok(Self {
            registry,
            lookups,
            lookup_latency_ms,
        })
    }

    pub fn observe(&self, outcome: LookupOutcome, elapsed: Duration) {
        self.lookups.with_label_values(&[outcome.as_str()]).inc();
        self.lookup_latency_ms
            .observe(elapsed.as_secs_f64() * 1000.0);
    }

    /// Current count for one outcome.
    pub fn count(&self, outcome: LookupOutcome) -> u64 {
        self.lookups.with_label_values(&[outcome.as_str()]).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_counted_separately() {
        let m = LookupMetrics::new().unwrap();
        m.observe(LookupOutcome::Found, Duration::from_millis(3));
        m.observe(LookupOutcome::Found, Duration::from_millis(4));
        m.observe(LookupOutcome::BadRequest, Duration::ZERO);
        assert_eq!(m.count(LookupOutcome::Found), 2);
        assert_eq!(m.count(LookupOutcome::BadRequest), 1);
        assert_eq!(m.count(LookupOutcome::NotFound), 0);
        assert_eq!(m.lookup_latency_ms.get_sample_count(), 3);
    }
}
