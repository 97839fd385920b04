//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! request strings
//!     → address.rs (EIP-55 validation / normalization)
//!     → transaction.rs (calldata, fee check, unsigned transaction)
//!     → wallet.rs (sign with the supplied key)
//!     → client.rs (broadcast through the node)
//! ```
//!
//! # Security Constraints
//! - Private keys live only for the duration of one call
//! - Never log private keys or signed payloads
//! - Every RPC call carries a deadline

pub mod address;
pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, RpcChainClient};
pub use transaction::{BuildParams, TxBuilder};
pub use types::{Calldata, ChainId, GasParameters, SignedTransaction, UnsignedTransaction};
pub use wallet::Wallet;
