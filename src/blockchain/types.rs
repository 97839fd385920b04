//! Chain-specific types shared by the builder, signer and client.

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::error::{TransferError, TransferResult};

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Gas price and limit for a legacy transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasParameters {
    pub gas_price_wei: U256,
    pub gas_limit: u64,
}

impl GasParameters {
    /// `gas_price_wei * gas_limit`, failing on 256-bit overflow.
    pub fn fee(&self) -> TransferResult<U256> {
        self.gas_price_wei
            .checked_mul(U256::from(self.gas_limit))
            .ok_or_else(|| {
                TransferError::InvalidGasParameters(format!(
                    "fee {} wei x {} gas overflows 256 bits",
                    self.gas_price_wei, self.gas_limit
                ))
            })
    }
}

/// ABI-encoded `transfer(address,uint256)` payload.
///
/// Layout: 4-byte selector, recipient word, amount word (68 bytes total).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calldata(Bytes);

impl Calldata {
    pub const LEN: usize = 4 + 32 + 32;

    pub(crate) fn from_encoded(bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), Self::LEN);
        Self(Bytes::from(bytes))
    }

    pub fn selector(&self) -> [u8; 4] {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&self.0[..4]);
        selector
    }

    /// First argument word (recipient, left-padded).
    pub fn recipient_word(&self) -> &[u8] {
        &self.0[4..36]
    }

    /// Second argument word (amount, big-endian).
    pub fn amount_word(&self) -> &[u8] {
        &self.0[36..68]
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

/// Transaction ready for signing.
///
/// `to` is the token contract; the token amount travels only in `data`, so
/// the native value is always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub to: Address,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub nonce: u64,
    pub data: Calldata,
    pub chain_id: ChainId,
}

impl UnsignedTransaction {
    /// Native currency attached to the transaction.
    pub fn value(&self) -> U256 {
        U256::ZERO
    }

    /// Convert to an EIP-155 legacy transaction.
    pub fn to_legacy(&self) -> TransferResult<TxLegacy> {
        let gas_price: u128 = self.gas_price.try_into().map_err(|_| {
            TransferError::InvalidGasParameters(format!(
                "gas price {} wei exceeds the 128-bit transaction field",
                self.gas_price
            ))
        })?;

        Ok(TxLegacy {
            chain_id: Some(self.chain_id.0),
            nonce: self.nonce,
            gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value(),
            input: self.data.as_bytes().clone(),
        })
    }
}

/// Signed, encoded transaction payload. Never persisted or logged.
#[derive(Clone)]
pub struct SignedTransaction {
    raw: Bytes,
    hash: TxHash,
}

impl SignedTransaction {
    pub(crate) fn new(raw: Bytes, hash: TxHash) -> Self {
        Self { raw, hash }
    }

    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }
}

impl std::fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedTransaction")
            .field("hash", &self.hash)
            .field("raw_len", &self.raw.len())
            .finish()
    }
}
