use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Once, OnceLock};

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static INSTALL_RECORDER: Once = Once::new();

/// Install the global Prometheus recorder. Later and concurrent calls are no-ops.
pub fn init_metrics() {
    INSTALL_RECORDER.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            METRICS_HANDLE.set(handle).ok();
        }
        Err(e) => tracing::warn!("Failed to install Prometheus recorder: {}", e),
    });
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a submitted payment.
pub fn record_payment() {
    counter!("payments_processed_total").increment(1);
}
