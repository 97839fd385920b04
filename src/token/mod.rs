//! Token subsystem.
//!
//! # Data Flow
//! ```text
//! contract address
//!     → metadata.rs (name/symbol/decimals via read-only calls)
//!     → amount.rs (decimal amount → base units using decimals)
//! ```

pub mod amount;
pub mod erc20;
pub mod metadata;

pub use amount::AmountSpec;
pub use metadata::{MetadataResolver, TokenMetadata};
