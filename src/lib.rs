//! ERC-20 token transfers from a locally held key.
//!
//! Resolves token metadata, checks the sender can pay for gas, encodes
//! `transfer(address,uint256)`, signs and broadcasts through a JSON-RPC node.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod observability;
pub mod token;
pub mod transfer;

pub use config::AppConfig;
pub use error::{ErrorKind, TransferError, TransferFailure, TransferResult};
pub use transfer::{TransferOrchestrator, TransferReceipt, TransferRequest};
