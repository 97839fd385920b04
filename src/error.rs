//! Transfer error kinds.
//!
//! Every component returns one of these instead of falling back to defaults.
//! The orchestrator surfaces the first one it hits without modifying it.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while preparing or submitting a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Address is not 20 bytes of hex or fails its EIP-55 checksum.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Amount is unparseable, negative, or does not fit 256 bits in base units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Gas price or gas limit is unusable, or the fee overflows.
    #[error("Invalid gas parameters: {0}")]
    InvalidGasParameters(String),

    /// Token name, symbol or decimals could not be read from the contract.
    #[error("Token detection failed: {0}")]
    TokenDetectionFailed(String),

    /// Native balance does not cover the gas fee.
    #[error("Insufficient ETH balance to cover the gas fees: balance {balance} wei, required {required} wei")]
    InsufficientFunds { balance: U256, required: U256 },

    /// Private key is malformed or unusable for the sender.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// RPC connection, request, timeout or broadcast rejection.
    #[error("Network error: {0}")]
    Network(String),
}

/// Result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// Error category shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidAddress,
    InvalidAmount,
    InvalidGasParameters,
    TokenDetectionFailed,
    InsufficientFunds,
    InvalidPrivateKey,
    NetworkError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidAddress => "InvalidAddress",
            ErrorKind::InvalidAmount => "InvalidAmount",
            ErrorKind::InvalidGasParameters => "InvalidGasParameters",
            ErrorKind::TokenDetectionFailed => "TokenDetectionFailed",
            ErrorKind::InsufficientFunds => "InsufficientFunds",
            ErrorKind::InvalidPrivateKey => "InvalidPrivateKey",
            ErrorKind::NetworkError => "NetworkError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransferError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            TransferError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            TransferError::InvalidGasParameters(_) => ErrorKind::InvalidGasParameters,
            TransferError::TokenDetectionFailed(_) => ErrorKind::TokenDetectionFailed,
            TransferError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            TransferError::InvalidPrivateKey(_) => ErrorKind::InvalidPrivateKey,
            TransferError::Network(_) => ErrorKind::NetworkError,
        }
    }
}

/// Structured failure handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFailure {
    pub category: ErrorKind,
    pub message: String,
}

impl From<&TransferError> for TransferFailure {
    fn from(err: &TransferError) -> Self {
        Self {
            category: err.kind(),
            message: err.to_string(),
        }
    }
}
