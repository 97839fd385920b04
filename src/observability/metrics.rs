//! Metrics collection.
//!
//! # Metrics
//! - `erc20_transfer_attempts_total` (counter): transfers started
//! - `erc20_transfers_total` (counter): finished transfers by outcome
//!   (`success` or the error category)
//! - `erc20_rpc_errors_total` (counter): failed RPC calls by method
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use crate::error::ErrorKind;

pub fn record_transfer_attempt() {
    metrics::counter!("erc20_transfer_attempts_total").increment(1);
}

pub fn record_transfer_success() {
    metrics::counter!("erc20_transfers_total", "outcome" => "success").increment(1);
}

pub fn record_transfer_failure(kind: ErrorKind) {
    metrics::counter!("erc20_transfers_total", "outcome" => kind.as_str()).increment(1);
}

pub fn record_rpc_error(method: &'static str) {
    metrics::counter!("erc20_rpc_errors_total", "method" => method).increment(1);
}
