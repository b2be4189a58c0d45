//! Prometheus metrics for the certificate service.
//!
//! - Issuing metrics (certificates created, batch rows by outcome)
//! - Rendering metrics
//! - Store size gauges, refreshed when `/metrics` is scraped

mod helpers;

pub use helpers::{encode_metrics, BatchMetrics, CertificateMetrics, RenderMetrics, StoreMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "certsvc";

lazy_static! {
    /// Total certificates issued, single or batch
    pub static ref CERTIFICATES_CREATED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_certificates_created_total", METRIC_PREFIX),
        "Total certificates created"
    ).unwrap();

    /// Batch rows processed, by outcome
    pub static ref BATCH_ROWS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_batch_rows_total", METRIC_PREFIX),
        "Total CSV batch rows processed",
        &["outcome"]
    ).unwrap();

    /// Certificate renders, by outcome
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total certificate renders",
        &["outcome"]
    ).unwrap();

    /// Certificates currently held by the store
    pub static ref CERTIFICATES_STORED: IntGauge = register_int_gauge!(
        format!("{}_certificates_stored", METRIC_PREFIX),
        "Number of certificates in the store"
    ).unwrap();

    /// Ids held by the email index; tracks certificate puts, including re-puts
    pub static ref EMAIL_INDEX_ENTRIES: IntGauge = register_int_gauge!(
        format!("{}_email_index_entries", METRIC_PREFIX),
        "Number of entries in the email index"
    ).unwrap();

    /// Templates currently held by the store
    pub static ref TEMPLATES_TOTAL: IntGauge = register_int_gauge!(
        format!("{}_templates_total", METRIC_PREFIX),
        "Number of templates in the store"
    ).unwrap();
}
