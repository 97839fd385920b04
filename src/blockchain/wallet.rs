//! Transaction signing.
//!
//! # Security
//! - The private key is parsed per call and dropped when the wallet is dropped
//! - Keys are never logged or serialized
//! - The underlying signing key zeroizes its memory on drop

use alloy::consensus::SignableTransaction;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{SignedTransaction, UnsignedTransaction};
use crate::error::{TransferError, TransferResult};

/// Environment variable holding the sender's private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "ERC20_TRANSFER_PRIVATE_KEY";

/// Short-lived signer wrapping one private key.
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts the key with or without `0x`. Fails when the hex is malformed
    /// or the scalar is not a valid secp256k1 secret (zero or above the curve order).
    pub fn from_private_key(private_key_hex: &str) -> TransferResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| TransferError::InvalidPrivateKey(format!("Invalid private key format: {e}")))?;

        tracing::debug!(address = %signer.address(), "Wallet loaded");

        Ok(Self { signer })
    }

    /// Address controlled by this key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign an unsigned transaction, producing the EIP-2718 payload and its hash.
    pub fn sign(&self, tx: &UnsignedTransaction) -> TransferResult<SignedTransaction> {
        let mut legacy = tx.to_legacy()?;

        let signature = self
            .signer
            .sign_transaction_sync(&mut legacy)
            .map_err(|e| TransferError::InvalidPrivateKey(format!("Signing failed: {e}")))?;

        let signed = legacy.into_signed(signature);
        let hash = *signed.hash();

        let mut payload = Vec::new();
        signed.eip2718_encode(&mut payload);

        Ok(SignedTransaction::new(Bytes::from(payload), hash))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.signer.address())
            .finish_non_exhaustive()
    }
}

/// Sign `tx` with `private_key`. The key is not retained after this returns.
pub fn sign(tx: &UnsignedTransaction, private_key: &str) -> TransferResult<SignedTransaction> {
    Wallet::from_private_key(private_key)?.sign(tx)
}
