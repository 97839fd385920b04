//! Property tests for calldata encoding, amount scaling and the fee check.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use proptest::prelude::*;
use tokio::time::Instant;

use erc20_transfer::blockchain::transaction::encode_transfer;
use erc20_transfer::blockchain::{BuildParams, ChainClient, ChainId, TxBuilder, UnsignedTransaction};
use erc20_transfer::token::amount::to_base_units;
use erc20_transfer::{TransferError, TransferResult};

mod common;
use common::{FakeChain, TOKEN};

const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `round(int.frac * 10^decimals)` computed digit by digit in 256-bit integers.
fn scaled_by_hand(int: u64, frac: &str, decimals: u32) -> Option<U256> {
    let ten = U256::from(10u8);
    let whole = U256::from(int).checked_mul(ten.checked_pow(U256::from(decimals))?)?;
    let digits = frac.len() as u32;

    let parse = |s: &str| {
        if s.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(s, 10).unwrap()
        }
    };

    let fraction = if decimals >= digits {
        parse(frac).checked_mul(ten.checked_pow(U256::from(decimals - digits))?)?
    } else {
        let kept = parse(&frac[..decimals as usize]);
        if frac.as_bytes()[decimals as usize] >= b'5' {
            kept + U256::from(1u8)
        } else {
            kept
        }
    };
    whole.checked_add(fraction)
}

fn amount_string(int: u64, frac: &str) -> String {
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{int}.{frac}")
    }
}

fn build(
    balance: U256,
    recipient: Address,
    amount: &BigDecimal,
    decimals: u8,
    gas_price_wei: U256,
    gas_limit: u64,
) -> TransferResult<UnsignedTransaction> {
    let chain: Arc<dyn ChainClient> = Arc::new(FakeChain::new(balance, decimals));
    let builder = TxBuilder::new(chain);
    let recipient = recipient.to_checksum(None);
    let params = BuildParams {
        contract: TOKEN,
        sender: Address::ZERO,
        recipient: &recipient,
        amount,
        decimals,
        gas_price_wei,
        gas_limit,
        nonce: 0,
        chain_id: ChainId(1),
    };

    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(builder.build(params, Instant::now() + Duration::from_secs(5)))
}

proptest! {
    #[test]
    fn calldata_words_match_inputs(
        recipient in prop::array::uniform20(any::<u8>()),
        amount in prop::array::uniform32(any::<u8>()),
    ) {
        let recipient = Address::from(recipient);
        let amount = U256::from_be_bytes(amount);
        let calldata = encode_transfer(recipient, amount);

        prop_assert_eq!(calldata.as_bytes().len(), 68);
        prop_assert_eq!(calldata.selector(), TRANSFER_SELECTOR);
        prop_assert_eq!(&calldata.recipient_word()[..12], &[0u8; 12]);
        prop_assert_eq!(&calldata.recipient_word()[12..], recipient.as_slice());
        prop_assert_eq!(U256::from_be_slice(calldata.amount_word()), amount);
    }

    #[test]
    fn base_units_match_digit_arithmetic(
        int in any::<u64>(),
        frac in "[0-9]{0,24}",
        decimals in 0u8..=77,
    ) {
        let amount = BigDecimal::from_str(&amount_string(int, &frac)).unwrap();
        prop_assert_eq!(
            to_base_units(&amount, decimals),
            scaled_by_hand(int, &frac, u32::from(decimals))
        );
    }

    #[test]
    fn built_calldata_carries_scaled_amount(
        recipient in prop::array::uniform20(any::<u8>()),
        int in 0u64..1_000_000_000,
        frac in "[0-9]{0,18}",
        decimals in 0u8..=18,
    ) {
        let recipient = Address::from(recipient);
        let amount = BigDecimal::from_str(&amount_string(int, &frac)).unwrap();
        let expected = scaled_by_hand(int, &frac, u32::from(decimals)).unwrap();

        let tx = build(U256::MAX, recipient, &amount, decimals, U256::from(1u8), 21_000).unwrap();

        prop_assert_eq!(tx.value(), U256::ZERO);
        prop_assert_eq!(tx.to, TOKEN.parse::<Address>().unwrap());
        prop_assert_eq!(tx.data.selector(), TRANSFER_SELECTOR);
        prop_assert_eq!(&tx.data.recipient_word()[12..], recipient.as_slice());
        prop_assert_eq!(U256::from_be_slice(tx.data.amount_word()), expected);
    }

    #[test]
    fn insufficient_funds_iff_balance_below_fee(
        gas_price in any::<u64>(),
        gas_limit in 1u64..10_000_000,
        offset in 0u64..1_000,
        below in any::<bool>(),
    ) {
        let fee = U256::from(gas_price) * U256::from(gas_limit);
        let balance = if below {
            fee.saturating_sub(U256::from(offset) + U256::from(1u8))
        } else {
            fee + U256::from(offset)
        };
        let amount = BigDecimal::from(1);

        let result = build(balance, Address::ZERO, &amount, 18, U256::from(gas_price), gas_limit);

        if balance < fee {
            let is_insufficient = matches!(result, Err(TransferError::InsufficientFunds { .. }));
            prop_assert!(is_insufficient);
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
