//! Transfer orchestration.
//!
//! # Sequence
//! ```text
//! validate request offline (addresses, amount, gas, key)
//!     → resolve token metadata
//!     → fetch nonce
//!     → build (balance check, calldata)
//!     → sign
//!     → broadcast
//! ```
//!
//! The first error short-circuits everything after it. Nothing is broadcast
//! unless every earlier step succeeded.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use tokio::time::Instant;

use crate::blockchain::address::parse_address;
use crate::blockchain::client::ChainClient;
use crate::blockchain::transaction::{BuildParams, TxBuilder};
use crate::blockchain::types::{ChainId, GasParameters};
use crate::blockchain::wallet::Wallet;
use crate::config::AppConfig;
use crate::error::{TransferError, TransferResult};
use crate::observability::metrics;
use crate::token::amount::{parse_amount, parse_gas_limit, parse_gwei, wei_to_gwei, AmountSpec};
use crate::token::metadata::{MetadataResolver, TokenMetadata};
use crate::transfer::request::{TransferReceipt, TransferRequest};

/// Request fields after offline validation.
struct ValidatedRequest {
    contract: Address,
    sender: Address,
    amount: BigDecimal,
    gas: GasParameters,
}

/// Runs ERC-20 transfers against one chain client.
#[derive(Clone)]
pub struct TransferOrchestrator {
    client: Arc<dyn ChainClient>,
    resolver: MetadataResolver,
    builder: TxBuilder,
    chain_id: ChainId,
    request_timeout: Duration,
}

impl TransferOrchestrator {
    pub fn new(client: Arc<dyn ChainClient>, chain_id: ChainId, request_timeout: Duration) -> Self {
        Self {
            resolver: MetadataResolver::new(client.clone()),
            builder: TxBuilder::new(client.clone()),
            client,
            chain_id,
            request_timeout,
        }
    }

    pub fn from_config(client: Arc<dyn ChainClient>, config: &AppConfig) -> Self {
        Self::new(
            client,
            ChainId(config.network.chain_id),
            config.transfer.request_timeout(),
        )
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }

    /// Detect a token's name, symbol and decimals.
    pub async fn detect_token(&self, contract: &str) -> TransferResult<TokenMetadata> {
        self.resolver.resolve(contract, self.deadline()).await
    }

    /// Current gas price in Gwei, or `None` when the node cannot be asked.
    pub async fn current_gas_price(&self) -> Option<BigDecimal> {
        match self.client.get_gas_price(self.deadline()).await {
            Ok(wei) => {
                let gwei = wei_to_gwei(wei);
                tracing::info!(gas_price_gwei = %gwei.to_plain_string(), "Current gas price");
                Some(gwei)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch gas price");
                None
            }
        }
    }

    /// Send `request.amount` tokens from `request.sender` to `request.recipient`.
    pub async fn transfer(&self, request: &TransferRequest) -> TransferResult<TransferReceipt> {
        metrics::record_transfer_attempt();
        tracing::info!(token = %request.contract, "Starting ERC-20 transaction");

        match self.run(request).await {
            Ok(receipt) => {
                metrics::record_transfer_success();
                tracing::info!(
                    tx_hash = %receipt.tx_hash,
                    symbol = %receipt.token.symbol,
                    nonce = receipt.nonce,
                    "ERC-20 transaction sent"
                );
                Ok(receipt)
            }
            Err(e) => {
                metrics::record_transfer_failure(e.kind());
                tracing::error!(category = %e.kind(), error = %e, "ERC-20 transaction failed");
                Err(e)
            }
        }
    }

    async fn run(&self, request: &TransferRequest) -> TransferResult<TransferReceipt> {
        let validated = validate(request)?;
        let wallet = Wallet::from_private_key(&request.private_key)?;
        if wallet.address() != validated.sender {
            return Err(TransferError::InvalidPrivateKey(format!(
                "key controls {}, not sender {}",
                wallet.address(),
                validated.sender
            )));
        }

        let deadline = self.deadline();

        let token = self
            .resolver
            .resolve_address(validated.contract, deadline)
            .await?;

        let nonce = self
            .client
            .get_transaction_count(validated.sender, deadline)
            .await?;

        let unsigned = self
            .builder
            .build(
                BuildParams {
                    contract: &request.contract,
                    sender: validated.sender,
                    recipient: &request.recipient,
                    amount: &validated.amount,
                    decimals: token.decimals,
                    gas_price_wei: validated.gas.gas_price_wei,
                    gas_limit: validated.gas.gas_limit,
                    nonce,
                    chain_id: self.chain_id,
                },
                deadline,
            )
            .await?;

        let signed = wallet.sign(&unsigned)?;
        drop(wallet);

        let tx_hash = self
            .client
            .send_raw_transaction(signed.raw().clone(), deadline)
            .await?;
        if tx_hash != signed.hash() {
            tracing::warn!(
                node_hash = %tx_hash,
                local_hash = %signed.hash(),
                "Node returned a different transaction hash"
            );
        }

        Ok(TransferReceipt {
            tx_hash,
            amount_base_units: AmountSpec::new(validated.amount, token.decimals).to_base_units()?,
            token,
            fee_wei: validated.gas.fee()?,
            nonce,
        })
    }
}

/// Validate every field that can be checked without the network.
fn validate(request: &TransferRequest) -> TransferResult<ValidatedRequest> {
    let contract = parse_address(&request.contract)?;
    let sender = parse_address(&request.sender)?;
    parse_address(&request.recipient)?;

    let amount = parse_amount(&request.amount)?;

    let gas = GasParameters {
        gas_price_wei: parse_gwei(&request.gas_price_gwei)?,
        gas_limit: parse_gas_limit(&request.gas_limit)?,
    };
    gas.fee()?;
    if gas.gas_price_wei > U256::from(u128::MAX) {
        return Err(TransferError::InvalidGasParameters(format!(
            "gas price {} wei exceeds the 128-bit transaction field",
            gas.gas_price_wei
        )));
    }

    Ok(ValidatedRequest {
        contract,
        sender,
        amount,
        gas,
    })
}

impl std::fmt::Debug for TransferOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferOrchestrator")
            .field("chain_id", &self.chain_id)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
