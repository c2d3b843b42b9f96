use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: seat assignment requests. Labels: outcome.
pub const ASSIGNMENTS_TOTAL: &str = "railseat_assignments_total";

/// Counter: seat release requests. Labels: outcome.
pub const RELEASES_TOTAL: &str = "railseat_releases_total";

/// Histogram: candidate seats fetched per allocation request.
pub const SEAT_SCAN_LENGTH: &str = "railseat_seat_scan_length";

// ── Stock-resolution metrics ────────────────────────────────────

/// Counter: stock reads answered by the cache (including cached zero).
pub const STOCK_CACHE_HITS_TOTAL: &str = "railseat_stock_cache_hits_total";

/// Counter: stock reads that fell through to the authoritative counter.
pub const STOCK_CACHE_MISSES_TOTAL: &str = "railseat_stock_cache_misses_total";

/// Counter: stock cache read failures (degraded to the counter).
pub const STOCK_CACHE_ERRORS_TOTAL: &str = "railseat_stock_cache_errors_total";

/// Initialize process-wide tracing output for embedding binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init_metrics(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
