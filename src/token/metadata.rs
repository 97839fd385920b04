//! Token metadata detection.
//!
//! Reads `name()`, `symbol()` and `decimals()` from a contract. Either all
//! three decode or the whole resolution fails; there is no partial result.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::{sol_data, SolCall, SolType};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::blockchain::address::parse_address;
use crate::blockchain::client::ChainClient;
use crate::error::{TransferError, TransferResult};
use crate::token::erc20::IERC20;

/// Token name, symbol and decimals as reported by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Resolves ERC-20 metadata through a chain client.
#[derive(Clone)]
pub struct MetadataResolver {
    client: Arc<dyn ChainClient>,
}

impl MetadataResolver {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    /// Validate `contract` and read its metadata.
    pub async fn resolve(&self, contract: &str, deadline: Instant) -> TransferResult<TokenMetadata> {
        let address = parse_address(contract)?;
        self.resolve_address(address, deadline).await
    }

    /// Read metadata from an already validated address.
    ///
    /// The three reads are independent and issued concurrently.
    pub async fn resolve_address(
        &self,
        contract: Address,
        deadline: Instant,
    ) -> TransferResult<TokenMetadata> {
        let result = tokio::try_join!(
            self.read_name(contract, deadline),
            self.read_symbol(contract, deadline),
            self.read_decimals(contract, deadline),
        );

        match result {
            Ok((name, symbol, decimals)) => {
                tracing::info!(
                    token = %contract,
                    name = %name,
                    symbol = %symbol,
                    decimals,
                    "Detected token"
                );
                Ok(TokenMetadata {
                    name,
                    symbol,
                    decimals,
                })
            }
            Err(e) => {
                tracing::error!(token = %contract, error = %e, "Failed to detect token details");
                Err(e)
            }
        }
    }

    async fn read_name(&self, contract: Address, deadline: Instant) -> TransferResult<String> {
        let data = self
            .view(contract, IERC20::nameCall {}.abi_encode(), "name", deadline)
            .await?;
        decode_string(&data, "name")
    }

    async fn read_symbol(&self, contract: Address, deadline: Instant) -> TransferResult<String> {
        let data = self
            .view(contract, IERC20::symbolCall {}.abi_encode(), "symbol", deadline)
            .await?;
        decode_string(&data, "symbol")
    }

    async fn read_decimals(&self, contract: Address, deadline: Instant) -> TransferResult<u8> {
        let data = self
            .view(contract, IERC20::decimalsCall {}.abi_encode(), "decimals", deadline)
            .await?;
        decode_decimals(&data)
    }

    async fn view(
        &self,
        contract: Address,
        calldata: Vec<u8>,
        function: &str,
        deadline: Instant,
    ) -> TransferResult<Bytes> {
        self.client
            .call(contract, Bytes::from(calldata), deadline)
            .await
            .map_err(|e| TransferError::TokenDetectionFailed(format!("{function}() call failed: {e}")))
    }
}

/// Decode a `string` return value, rejecting invalid UTF-8 instead of
/// substituting replacement characters.
fn decode_string(data: &[u8], function: &str) -> TransferResult<String> {
    let (raw,) = <(sol_data::Bytes,) as SolType>::abi_decode_sequence(data).map_err(|e| {
        TransferError::TokenDetectionFailed(format!("{function}() returned undecodable data: {e}"))
    })?;
    String::from_utf8(raw.to_vec()).map_err(|e| {
        TransferError::TokenDetectionFailed(format!("{function}() returned invalid UTF-8: {e}"))
    })
}

/// Decode a `uint8` return word strictly: exactly 32 bytes, value below 256.
fn decode_decimals(data: &[u8]) -> TransferResult<u8> {
    if data.len() != 32 {
        return Err(TransferError::TokenDetectionFailed(format!(
            "decimals() returned {} bytes, expected 32",
            data.len()
        )));
    }
    if data[..31].iter().any(|b| *b != 0) {
        return Err(TransferError::TokenDetectionFailed(
            "decimals() returned a value outside uint8".to_string(),
        ));
    }
    Ok(data[31])
}

impl std::fmt::Debug for MetadataResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataResolver").finish_non_exhaustive()
    }
}
