//! MediVault: prescription ingestion and structured storage.
//!
//! An uploaded prescription image is read by three independent OCR backends,
//! their outputs are fused into one structured record by an external
//! reasoning service, and the result is stored atomically as a prescription
//! with its medicines.

pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG`, falling back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
