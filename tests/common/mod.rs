//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;

use erc20_transfer::blockchain::ChainClient;
use erc20_transfer::token::erc20::IERC20;
use erc20_transfer::{TransferError, TransferResult};

pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const SENDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const ONE_ETH: u128 = 1_000_000_000_000_000_000;

/// ABI return data for the three metadata views.
pub fn metadata_return(calldata: &[u8], name: &str, symbol: &str, decimals: u8) -> Option<Vec<u8>> {
    let selector = calldata.get(..4)?;
    if selector == IERC20::nameCall::SELECTOR {
        Some(IERC20::nameCall::abi_encode_returns(&name.to_string()))
    } else if selector == IERC20::symbolCall::SELECTOR {
        Some(IERC20::symbolCall::abi_encode_returns(&symbol.to_string()))
    } else if selector == IERC20::decimalsCall::SELECTOR {
        Some(U256::from(decimals).to_be_bytes::<32>().to_vec())
    } else {
        None
    }
}

/// In-memory chain client that counts calls per method.
pub struct FakeChain {
    pub balance: U256,
    pub gas_price: U256,
    pub nonce: u64,
    pub decimals: u8,
    pub fail_decimals: bool,
    pub calls: Mutex<HashMap<&'static str, usize>>,
    pub broadcasts: Mutex<Vec<Bytes>>,
}

impl FakeChain {
    pub fn new(balance: U256, decimals: u8) -> Self {
        Self {
            balance,
            gas_price: U256::from(20_000_000_000u64),
            nonce: 0,
            decimals,
            fail_decimals: false,
            calls: Mutex::new(HashMap::new()),
            broadcasts: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn record(&self, method: &'static str) {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn get_balance(&self, _address: Address, _deadline: Instant) -> TransferResult<U256> {
        self.record("eth_getBalance");
        Ok(self.balance)
    }

    async fn get_gas_price(&self, _deadline: Instant) -> TransferResult<U256> {
        self.record("eth_gasPrice");
        Ok(self.gas_price)
    }

    async fn get_transaction_count(
        &self,
        _address: Address,
        _deadline: Instant,
    ) -> TransferResult<u64> {
        self.record("eth_getTransactionCount");
        Ok(self.nonce)
    }

    async fn call(
        &self,
        _contract: Address,
        calldata: Bytes,
        _deadline: Instant,
    ) -> TransferResult<Bytes> {
        self.record("eth_call");
        if self.fail_decimals && calldata[..4] == IERC20::decimalsCall::SELECTOR {
            return Err(TransferError::Network("execution reverted".to_string()));
        }
        metadata_return(&calldata, "Mock Token", "MOCK", self.decimals)
            .map(Bytes::from)
            .ok_or_else(|| TransferError::Network("unknown selector".to_string()))
    }

    async fn send_raw_transaction(&self, raw: Bytes, _deadline: Instant) -> TransferResult<TxHash> {
        self.record("eth_sendRawTransaction");
        let hash = keccak256(&raw);
        self.broadcasts.lock().unwrap().push(raw);
        Ok(hash)
    }
}

/// State of the mock JSON-RPC node.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub chain_id: u64,
    pub balance: U256,
    pub gas_price: U256,
    pub nonce: u64,
    pub decimals: u8,
    /// JSON-RPC error message returned for eth_sendRawTransaction, if any.
    pub reject_broadcast: Option<String>,
    pub methods: Vec<String>,
    pub raw_transactions: Vec<String>,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            chain_id: 1,
            balance: U256::from(ONE_ETH),
            gas_price: U256::from(20_000_000_000u64),
            nonce: 4,
            decimals: 18,
            reject_broadcast: None,
            methods: Vec::new(),
            raw_transactions: Vec::new(),
        }
    }
}

/// Start a mock JSON-RPC node on an ephemeral port.
pub async fn start_mock_node(state: Arc<Mutex<NodeState>>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let state = state.clone();
                    tokio::spawn(async move {
                        let _ = serve_connection(socket, state).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn serve_connection(mut socket: TcpStream, state: Arc<Mutex<NodeState>>) -> std::io::Result<()> {
    loop {
        let Some(body) = read_request(&mut socket).await? else {
            return Ok(());
        };
        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let response = handle_rpc(&request, &state).to_string();

        let http = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            response.len(),
            response
        );
        socket.write_all(http.as_bytes()).await?;
    }
}

/// Read one HTTP request, returning its body. `None` on a closed connection.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(Some(buf[header_end..header_end + content_length].to_vec()))
}

fn hex_quantity(value: U256) -> Value {
    Value::String(format!("{value:#x}"))
}

fn handle_rpc(request: &Value, state: &Arc<Mutex<NodeState>>) -> Value {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = &request["params"];

    let mut state = state.lock().unwrap();
    state.methods.push(method.clone());

    let result = match method.as_str() {
        "eth_chainId" => Ok(hex_quantity(U256::from(state.chain_id))),
        "eth_getBalance" => Ok(hex_quantity(state.balance)),
        "eth_gasPrice" => Ok(hex_quantity(state.gas_price)),
        "eth_getTransactionCount" => Ok(hex_quantity(U256::from(state.nonce))),
        "eth_call" => {
            let tx = &params[0];
            let data = tx
                .get("input")
                .or_else(|| tx.get("data"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let calldata = alloy::hex::decode(data).unwrap_or_default();
            match metadata_return(&calldata, "Mock Token", "MOCK", state.decimals) {
                Some(ret) => Ok(Value::String(alloy::hex::encode_prefixed(ret))),
                None => Err("execution reverted".to_string()),
            }
        }
        "eth_sendRawTransaction" => {
            let raw = params[0].as_str().unwrap_or_default().to_string();
            match &state.reject_broadcast {
                Some(message) => Err(message.clone()),
                None => {
                    let bytes = alloy::hex::decode(&raw).unwrap_or_default();
                    state.raw_transactions.push(raw);
                    Ok(Value::String(alloy::hex::encode_prefixed(keccak256(&bytes))))
                }
            }
        }
        other => Err(format!("method {other} not supported")),
    };

    match result {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": message }
        }),
    }
}
