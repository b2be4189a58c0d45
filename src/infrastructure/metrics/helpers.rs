//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    BATCH_ROWS_TOTAL, CERTIFICATES_CREATED_TOTAL, CERTIFICATES_STORED, EMAIL_INDEX_ENTRIES,
    RENDERS_TOTAL, TEMPLATES_TOTAL,
};
use crate::store::RecordStore;

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

pub struct CertificateMetrics;

impl CertificateMetrics {
    pub fn record_created() {
        CERTIFICATES_CREATED_TOTAL.inc();
    }
}

pub struct BatchMetrics;

impl BatchMetrics {
    pub fn record_success() {
        BATCH_ROWS_TOTAL.with_label_values(&["success"]).inc();
    }

    pub fn record_failed() {
        BATCH_ROWS_TOTAL.with_label_values(&["failed"]).inc();
    }
}

pub struct RenderMetrics;

impl RenderMetrics {
    pub fn record_success() {
        RENDERS_TOTAL.with_label_values(&["success"]).inc();
    }

    pub fn record_failure() {
        RENDERS_TOTAL.with_label_values(&["failed"]).inc();
    }
}

pub struct StoreMetrics;

impl StoreMetrics {
    /// Refresh store size gauges
    pub fn update(store: &RecordStore) {
        CERTIFICATES_STORED.set(store.certificate_count() as i64);
        EMAIL_INDEX_ENTRIES.set(store.index_entry_count() as i64);
        TEMPLATES_TOTAL.set(store.template_count() as i64);
    }
}
