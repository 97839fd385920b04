//! Transfer request and receipt types.

use alloy::primitives::{TxHash, U256};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::token::metadata::TokenMetadata;

/// A transfer as entered by the operator. Every field is validated by the
/// orchestrator; none of them are trusted as formatted.
#[derive(Clone)]
pub struct TransferRequest {
    /// Token contract address.
    pub contract: String,
    /// Address paying gas and holding the tokens.
    pub sender: String,
    /// Hex private key of `sender`. Wiped from memory on drop.
    pub private_key: Zeroizing<String>,
    /// Address receiving the tokens.
    pub recipient: String,
    /// Decimal token amount, e.g. "1.5".
    pub amount: String,
    /// Decimal gas price in Gwei.
    pub gas_price_gwei: String,
    /// Integer gas limit.
    pub gas_limit: String,
}

impl std::fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferRequest")
            .field("contract", &self.contract)
            .field("sender", &self.sender)
            .field("private_key", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("amount", &self.amount)
            .field("gas_price_gwei", &self.gas_price_gwei)
            .field("gas_limit", &self.gas_limit)
            .finish()
    }
}

/// Outcome of a broadcast transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    /// Hash returned by the node.
    pub tx_hash: TxHash,
    /// Metadata the amount was scaled with.
    pub token: TokenMetadata,
    /// Token amount in base units.
    pub amount_base_units: U256,
    /// `gas_price * gas_limit` in wei.
    pub fee_wei: U256,
    pub nonce: u64,
}
