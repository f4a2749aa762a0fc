// Metrics and observability module
// This file handles collection of dispatch outcomes, dispatch latency
// and catalog reloads
//
// Numan Thabit 2025 Nov

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

pub static DISPATCH_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "bridge_dispatch_total",
        "dispatched transfers by strategy and outcome",
        &["strategy", "outcome"]
    )
    .unwrap()
});

pub static DISPATCH_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "bridge_dispatch_latency_seconds",
        "latency of adapter dispatch",
        &["strategy"]
    )
    .unwrap()
});

pub static CATALOG_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "bridge_catalog_loads_total",
        "catalog snapshot loads by catalog and outcome",
        &["catalog", "outcome"]
    )
    .unwrap()
});
