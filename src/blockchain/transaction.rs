//! Transfer transaction building.
//!
//! # Responsibilities
//! - Normalize the contract and recipient addresses
//! - Convert the decimal amount to base units
//! - Check the sender's native balance covers `gas_price * gas_limit`
//! - Encode `transfer(address,uint256)` calldata
//!
//! The token balance is not checked here; the node rejects or reverts an
//! overspending transfer at execution time.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use bigdecimal::BigDecimal;
use tokio::time::Instant;

use crate::blockchain::address::parse_address;
use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{Calldata, ChainId, GasParameters, UnsignedTransaction};
use crate::error::{TransferError, TransferResult};
use crate::token::amount::AmountSpec;
use crate::token::erc20::IERC20;

/// Inputs for one transfer transaction.
#[derive(Debug, Clone)]
pub struct BuildParams<'a> {
    pub contract: &'a str,
    pub sender: Address,
    pub recipient: &'a str,
    pub amount: &'a BigDecimal,
    pub decimals: u8,
    pub gas_price_wei: U256,
    pub gas_limit: u64,
    pub nonce: u64,
    pub chain_id: ChainId,
}

/// Builds unsigned ERC-20 transfer transactions.
#[derive(Clone)]
pub struct TxBuilder {
    client: Arc<dyn ChainClient>,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    /// Validate inputs, check the fee is affordable and assemble the transaction.
    ///
    /// Only the balance lookup touches the network; every offline check runs first.
    pub async fn build(
        &self,
        params: BuildParams<'_>,
        deadline: Instant,
    ) -> TransferResult<UnsignedTransaction> {
        let contract = parse_address(params.contract)?;
        let recipient = parse_address(params.recipient)?;

        let amount = AmountSpec::new(params.amount.clone(), params.decimals).to_base_units()?;

        let gas = GasParameters {
            gas_price_wei: params.gas_price_wei,
            gas_limit: params.gas_limit,
        };
        if gas.gas_limit == 0 {
            return Err(TransferError::InvalidGasParameters(
                "gas limit must be greater than zero".to_string(),
            ));
        }
        let fee = gas.fee()?;

        let balance = self.client.get_balance(params.sender, deadline).await?;
        if balance < fee {
            tracing::warn!(
                sender = %params.sender,
                balance = %balance,
                required = %fee,
                "Insufficient ETH balance to cover the gas fees"
            );
            return Err(TransferError::InsufficientFunds {
                balance,
                required: fee,
            });
        }

        let data = encode_transfer(recipient, amount);

        tracing::debug!(
            token = %contract,
            recipient = %recipient,
            amount = %amount,
            fee_wei = %fee,
            nonce = params.nonce,
            "Built transfer transaction"
        );

        Ok(UnsignedTransaction {
            to: contract,
            gas_price: gas.gas_price_wei,
            gas_limit: gas.gas_limit,
            nonce: params.nonce,
            data,
            chain_id: params.chain_id,
        })
    }
}

/// Encode `transfer(recipient, amount)` calldata.
pub fn encode_transfer(recipient: Address, amount: U256) -> Calldata {
    let encoded = IERC20::transferCall {
        to: recipient,
        amount,
    }
    .abi_encode();
    Calldata::from_encoded(encoded)
}

impl std::fmt::Debug for TxBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxBuilder").finish_non_exhaustive()
    }
}
