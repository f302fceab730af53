//! Command Line Interface for the DxMgnPool client.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use dxmgn_domain::enums::PoolNumber;
use dxmgn_domain::value_objects::{ETHER_DECIMALS, parse_units};
use dxmgn_execution::api::{AllowanceCheck, DxMgnPoolApi};
use dxmgn_execution::config::{AppConfig, parse_address};
use dxmgn_execution::sync::ProviderWatcher;
use dxmgn_store::dispatchers::Dispatchers;
use dxmgn_store::store::Store;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser)]
#[command(name = "dxmgn")]
#[command(about = "DxMgnPool client: pool overview, MGN balances and deposits", long_about = None)]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the connected account, its balance and the network
    Session,
    /// Show shares, tokens and wallet balances of both pools
    Pools,
    /// Show total, locked and unlocked MGN
    Mgn,
    /// Approve, wrap ether when needed, and deposit into a pool
    Deposit {
        /// Pool to deposit into (1 or 2)
        #[arg(short, long, value_parser = parse_pool)]
        pool: PoolNumber,

        /// Amount in whole tokens (e.g., 1.5)
        #[arg(short, long)]
        amount: Decimal,
    },
    /// Check whether the GNO allowance for a spender covers an amount
    Allowance {
        /// Spender address
        #[arg(long)]
        spender: String,

        /// Amount in whole tokens
        #[arg(short, long)]
        amount: Decimal,
    },
    /// Follow account, balance and network changes until interrupted
    Watch,
    /// Show the token constants of the connected network
    Network,
}

fn parse_pool(value: &str) -> Result<PoolNumber, String> {
    let number: u8 = value
        .parse()
        .map_err(|_| format!("pool must be 1 or 2, got {value}"))?;
    PoolNumber::try_from(number).map_err(|e| e.to_string())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Loads the user state, tolerating a session without an unlocked account.
async fn load_user(dispatchers: &Dispatchers) -> Result<()> {
    match dispatchers.set_user_state().await {
        Ok(_) => Ok(()),
        Err(e) if e.is_no_account() => {
            warn!("No account available from the provider");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to read the user state"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let api = Arc::new(
        DxMgnPoolApi::connect(&config)
            .await
            .with_context(|| format!("Failed to connect to {}", config.rpc.url))?,
    );
    let dispatchers = Dispatchers::new(Arc::new(Store::default()), api.clone());
    dispatchers.register_providers(vec![config.rpc.url.clone()]);
    dispatchers.set_active_provider(Some(config.rpc.url.clone()));

    match cli.command {
        Commands::Session => {
            load_user(&dispatchers).await?;
            let chain = match api.refresh_state(None, None).await {
                Ok(chain) => Some(chain),
                Err(e) if e.is_no_account() => None,
                Err(e) => return Err(e).context("Failed to read the chain state"),
            };
            let state = dispatchers.store().get_state();
            if cli.json {
                print_json(&json!({ "STATE": state.as_ref(), "CHAIN": chain }))?;
            } else {
                render::session_table(&state, chain.as_ref()).printstd();
            }
        }
        Commands::Pools => {
            load_user(&dispatchers).await?;
            dispatchers
                .set_dx_mgn_pool_state()
                .await
                .context("Failed to read the pool state")?;
            let state = dispatchers.store().get_state();
            if cli.json {
                print_json(&state.dx_mgn_pool)?;
            } else {
                render::pools_table(&state).printstd();
            }
        }
        Commands::Mgn => {
            load_user(&dispatchers).await?;
            dispatchers
                .refresh_mgn_balances()
                .await
                .context("Failed to read MGN balances")?;
            let state = dispatchers.store().get_state();
            if cli.json {
                print_json(&state.token_mgn)?;
            } else {
                render::mgn_table(&state.token_mgn).printstd();
            }
        }
        Commands::Deposit { pool, amount } => {
            load_user(&dispatchers).await?;
            dispatchers.set_input_amount(amount);
            dispatchers.app_loading(true);
            let result = dispatchers.set_deposit_amount(pool).await;
            dispatchers.app_loading(false);
            let receipt = result.with_context(|| format!("Deposit into pool {pool} failed"))?;

            let hash = format!("{:#x}", receipt.deposit.transaction_hash);
            dispatchers.show_modal(Some(format!("Deposit mined: {hash}")));
            info!(pool = %pool, hash = %hash, "Deposit complete");

            if cli.json {
                print_json(&json!({
                    "POOL": pool.as_u8(),
                    "AMOUNT": receipt.amount,
                    "APPROVAL": receipt.approval.map(|tx| tx.transaction_hash),
                    "WRAP": receipt.wrap.map(|tx| tx.transaction_hash),
                    "DEPOSIT": receipt.deposit.transaction_hash,
                }))?;
            } else {
                render::deposit_table(&receipt).printstd();
            }
        }
        Commands::Allowance { spender, amount } => {
            let spender = parse_address("--spender", &spender)?;
            let amount = parse_units(amount, ETHER_DECIMALS)?;
            let account = api
                .current_account()
                .await
                .context("No account to check the allowance for")?;
            let check = api.check_if_false_allowance(amount, account, spender).await;
            let message = match check {
                AllowanceCheck::Sufficient => "Allowance covers the amount".to_string(),
                AllowanceCheck::Approve(top_up) => format!("Approve {top_up} more"),
                AllowanceCheck::Unavailable => "Allowance could not be read".to_string(),
            };
            if cli.json {
                print_json(&json!({
                    "SUFFICIENT": check == AllowanceCheck::Sufficient,
                    "APPROVE": match check {
                        AllowanceCheck::Approve(top_up) => Some(top_up),
                        _ => None,
                    },
                }))?;
            } else {
                println!("{message}");
            }
        }
        Commands::Watch => {
            let mut watcher = ProviderWatcher::new(api.clone(), config.watcher.clone());
            let events = watcher
                .take_receiver()
                .context("Watcher receiver already taken")?;
            let watcher = Arc::new(watcher);
            tokio::spawn(async move { watcher.start().await });

            let follower = dispatchers.clone();
            tokio::spawn(async move { follower.follow(events).await });

            let mut subscription = dispatchers.store().subscribe();
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("Interrupted, stopping");
                        break;
                    }
                    next = subscription.changed() => {
                        let Some(state) = next else { break };
                        if cli.json {
                            print_json(&json!({ "USER": state.user, "PROVIDER": state.provider }))?;
                        } else {
                            render::session_table(&state, None).printstd();
                        }
                    }
                }
            }
        }
        Commands::Network => {
            let network = api.network_config();
            if cli.json {
                print_json(network)?;
            } else {
                render::network_table(network).printstd();
            }
        }
    }

    Ok(())
}
