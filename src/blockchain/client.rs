//! Chain client: the node's read operations and raw-transaction broadcast.
//!
//! # Responsibilities
//! - Query chain state (balance, gas price, nonce, contract calls)
//! - Broadcast signed transactions
//! - Enforce a caller-supplied deadline on every call
//!
//! No retries and no failover: an RPC failure is returned to the caller as
//! `TransferError::Network` immediately.

use std::future::IntoFuture;
use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportResult;
use async_trait::async_trait;
use tokio::time::{timeout_at, Instant};

use crate::blockchain::types::ChainId;
use crate::config::NetworkConfig;
use crate::error::{TransferError, TransferResult};
use crate::observability::metrics;

/// Remote node operations used by the transfer pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native-currency balance in wei.
    async fn get_balance(&self, address: Address, deadline: Instant) -> TransferResult<U256>;

    /// Current gas price in wei.
    async fn get_gas_price(&self, deadline: Instant) -> TransferResult<U256>;

    /// Transaction count (next nonce) of an account.
    async fn get_transaction_count(&self, address: Address, deadline: Instant)
        -> TransferResult<u64>;

    /// Read-only contract call.
    async fn call(&self, contract: Address, calldata: Bytes, deadline: Instant)
        -> TransferResult<Bytes>;

    /// Broadcast a signed transaction, returning its hash.
    async fn send_raw_transaction(&self, raw: Bytes, deadline: Instant) -> TransferResult<TxHash>;
}

/// JSON-RPC chain client over HTTP.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    config: NetworkConfig,
}

impl RpcChainClient {
    /// Create a new client for the configured endpoint.
    ///
    /// When `verify_chain_id` is set, the node's chain ID is compared with the
    /// configured one. A mismatch or an unreachable node is only logged.
    pub async fn new(config: NetworkConfig) -> TransferResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            TransferError::Network(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        // Transactions are signed locally and sent raw, so no fillers are needed.
        let provider = Arc::new(
            ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_http(url),
        ) as Arc<dyn Provider + Send + Sync>;

        let client = Self { provider, config };

        if client.config.verify_chain_id {
            match client.verify_chain_id().await {
                Ok(()) => {
                    tracing::info!(
                        rpc_url = %client.config.rpc_url,
                        chain_id = client.config.chain_id,
                        "Chain client initialized"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Chain client initialized but chain verification failed"
                    );
                }
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> TransferResult<()> {
        let chain_id = self.get_chain_id(self.default_deadline()).await?;
        if chain_id.0 != self.config.chain_id {
            return Err(TransferError::Network(format!(
                "Chain ID mismatch: expected {}, got {}",
                self.config.chain_id, chain_id.0
            )));
        }
        Ok(())
    }

    /// Get the chain ID reported by the node.
    pub async fn get_chain_id(&self, deadline: Instant) -> TransferResult<ChainId> {
        self.request("eth_chainId", deadline, self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Configured chain ID.
    pub fn chain_id(&self) -> ChainId {
        ChainId(self.config.chain_id)
    }

    /// Deadline one RPC timeout from now.
    pub fn default_deadline(&self) -> Instant {
        Instant::now() + self.config.rpc_timeout()
    }

    async fn request<T, F>(&self, method: &'static str, deadline: Instant, fut: F) -> TransferResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        // The per-call RPC timeout caps whatever deadline the caller passed.
        let deadline = deadline.min(self.default_deadline());
        match timeout_at(deadline, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                metrics::record_rpc_error(method);
                tracing::warn!(method, error = %e, "RPC error");
                Err(TransferError::Network(format!("{method} failed: {e}")))
            }
            Err(_) => {
                metrics::record_rpc_error(method);
                tracing::warn!(method, "RPC timeout");
                Err(TransferError::Network(format!("{method} timed out")))
            }
        }
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn get_balance(&self, address: Address, deadline: Instant) -> TransferResult<U256> {
        self.request("eth_getBalance", deadline, self.provider.get_balance(address))
            .await
    }

    async fn get_gas_price(&self, deadline: Instant) -> TransferResult<U256> {
        self.request("eth_gasPrice", deadline, self.provider.get_gas_price())
            .await
            .map(U256::from)
    }

    async fn get_transaction_count(
        &self,
        address: Address,
        deadline: Instant,
    ) -> TransferResult<u64> {
        self.request(
            "eth_getTransactionCount",
            deadline,
            self.provider.get_transaction_count(address),
        )
        .await
    }

    async fn call(
        &self,
        contract: Address,
        calldata: Bytes,
        deadline: Instant,
    ) -> TransferResult<Bytes> {
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_input(calldata);
        self.request("eth_call", deadline, self.provider.call(tx)).await
    }

    async fn send_raw_transaction(&self, raw: Bytes, deadline: Instant) -> TransferResult<TxHash> {
        let pending = self
            .request(
                "eth_sendRawTransaction",
                deadline,
                self.provider.send_raw_transaction(&raw),
            )
            .await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
