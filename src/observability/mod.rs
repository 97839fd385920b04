//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of interpolated messages where practical
//! - Secrets (private keys, signed payloads) are never recorded

pub mod logging;
pub mod metrics;
