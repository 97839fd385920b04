//! `erc20-transfer` command line.
//!
//! Thin wrapper around [`TransferOrchestrator`]: parses arguments, loads
//! configuration, prints results. All validation happens in the library.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

use erc20_transfer::blockchain::wallet::PRIVATE_KEY_ENV_VAR;
use erc20_transfer::blockchain::RpcChainClient;
use erc20_transfer::config::{load_config, validate_config, AppConfig};
use erc20_transfer::observability::logging::init_logging;
use erc20_transfer::{TransferError, TransferFailure, TransferOrchestrator, TransferRequest};

#[derive(Parser)]
#[command(name = "erc20-transfer")]
#[command(about = "Send ERC-20 tokens from a local private key", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint (overrides the config file).
    #[arg(long)]
    rpc_url: Option<String>,

    /// Chain ID (overrides the config file).
    #[arg(long)]
    chain_id: Option<u64>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect a token's name, symbol and decimals
    Detect {
        #[arg(long)]
        token: String,
    },
    /// Show the current gas price in Gwei
    GasPrice,
    /// Send tokens. The private key is read from ERC20_TRANSFER_PRIVATE_KEY.
    Send {
        /// Token contract address.
        #[arg(long)]
        token: String,
        /// Sender address.
        #[arg(long)]
        from: String,
        /// Recipient address.
        #[arg(long)]
        to: String,
        /// Amount in whole tokens, e.g. 1.5.
        #[arg(long)]
        amount: String,
        /// Gas price in Gwei. Defaults to the node's current gas price.
        #[arg(long)]
        gas_price: Option<String>,
        /// Gas limit. Defaults to transfer.default_gas_limit.
        #[arg(long)]
        gas_limit: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability.log_level);
    tracing::debug!(
        rpc_url = %config.network.rpc_url,
        chain_id = config.network.chain_id,
        "Configuration loaded"
    );

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(output) => {
            eprintln!("{output}");
            ExitCode::FAILURE
        }
    }
}

fn load(cli: &Cli) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(url) = &cli.rpc_url {
        config.network.rpc_url = url.clone();
    }
    if let Some(chain_id) = cli.chain_id {
        config.network.chain_id = chain_id;
    }

    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    Ok(config)
}

/// Execute the command. `Err` carries the text for stderr.
async fn run(cli: Cli, config: AppConfig) -> Result<(), String> {
    let json = cli.json;
    let client = RpcChainClient::new(config.network.clone())
        .await
        .map_err(|e| render_error(&e, json))?;
    let orchestrator = TransferOrchestrator::from_config(Arc::new(client), &config);

    match cli.command {
        Commands::Detect { token } => {
            let metadata = orchestrator
                .detect_token(&token)
                .await
                .map_err(|e| render_error(&e, json))?;
            if json {
                println!("{}", to_json(&metadata));
            } else {
                println!("Detected Token: {} ({})", metadata.name, metadata.symbol);
                println!("Decimals: {}", metadata.decimals);
            }
        }
        Commands::GasPrice => match orchestrator.current_gas_price().await {
            Some(gwei) if json => println!(
                "{}",
                serde_json::json!({ "gas_price_gwei": gwei.to_plain_string() })
            ),
            Some(gwei) => println!("{} Gwei", gwei.to_plain_string()),
            None if json => println!("{}", serde_json::json!({ "gas_price_gwei": null })),
            None => println!("unavailable"),
        },
        Commands::Send {
            token,
            from,
            to,
            amount,
            gas_price,
            gas_limit,
        } => {
            let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map(Zeroizing::new).map_err(|_| {
                render_error(
                    &TransferError::InvalidPrivateKey(format!(
                        "Environment variable {PRIVATE_KEY_ENV_VAR} not set"
                    )),
                    json,
                )
            })?;

            let gas_price_gwei = match gas_price {
                Some(price) => price,
                None => orchestrator
                    .current_gas_price()
                    .await
                    .map(|gwei| gwei.to_plain_string())
                    .ok_or_else(|| {
                        render_error(
                            &TransferError::InvalidGasParameters(
                                "no --gas-price given and the current gas price is unavailable"
                                    .to_string(),
                            ),
                            json,
                        )
                    })?,
            };

            let request = TransferRequest {
                contract: token,
                sender: from,
                private_key,
                recipient: to,
                amount,
                gas_price_gwei,
                gas_limit: gas_limit
                    .unwrap_or_else(|| config.transfer.default_gas_limit.to_string()),
            };

            let receipt = orchestrator
                .transfer(&request)
                .await
                .map_err(|e| render_error(&e, json))?;
            if json {
                println!("{}", to_json(&receipt));
            } else {
                println!("Transaction Successful!");
                println!("Transaction Hash: {}", receipt.tx_hash);
            }
        }
    }

    Ok(())
}

fn render_error(err: &TransferError, json: bool) -> String {
    let failure = TransferFailure::from(err);
    if json {
        to_json(&failure)
    } else {
        format!("Error [{}]: {}", failure.category, failure.message)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
