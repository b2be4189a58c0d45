//! Record store for certificates and templates.
//!
//! A single owned [`RecordStore`] is constructed at startup and shared with
//! every service through an `Arc`.

mod record_store;

pub use record_store::{RecordStore, StoreError, StoreResult};
