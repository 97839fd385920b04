//! Transfer subsystem: request surface and orchestration.

pub mod orchestrator;
pub mod request;

pub use orchestrator::TransferOrchestrator;
pub use request::{TransferReceipt, TransferRequest};
