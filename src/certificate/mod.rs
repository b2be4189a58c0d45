//! Certificate issuing.
//!
//! `CertificateService` validates single requests and CSV batches and writes
//! the resulting certificates to the shared record store.

mod batch;
mod service;
mod types;

pub use batch::parse_csv;
pub use service::{parse_completion_date, CertificateService};
pub use types::{
    BatchResult, BatchRowError, Certificate, CertificateError, CertificateRequest,
    CertificateResult,
};
