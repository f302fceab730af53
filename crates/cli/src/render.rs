//! Table rendering for the store's state tree.

use dxmgn_domain::value_objects::format_units;
use dxmgn_domain::{Address, U256};
use dxmgn_execution::api::{ChainSnapshot, DepositReceipt};
use dxmgn_execution::config::NetworkConfig;
use dxmgn_store::state::{AppState, MgnState, PLACEHOLDER, PoolState};
use prettytable::{Table, row};

fn address_label(address: Option<Address>) -> String {
    address
        .map(|a| format!("{a:#x}"))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn amount_label(amount: Option<U256>, decimals: u8) -> String {
    amount
        .map(|a| format_units(a, decimals))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn session_table(state: &AppState, chain: Option<&ChainSnapshot>) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Account", state.user.account_label()]);
    table.add_row(row!["Balance (ETH)", state.user.balance_label()]);
    table.add_row(row!["Network", state.provider.network_label()]);
    table.add_row(row![
        "Provider",
        state
            .provider
            .active_provider
            .as_deref()
            .unwrap_or(PLACEHOLDER)
    ]);
    if let Some(chain) = chain {
        let time = chrono::DateTime::from_timestamp(chain.timestamp as i64, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| chain.timestamp.to_string());
        table.add_row(row!["Latest block", time]);
    }
    table
}

fn pool_rows(table: &mut Table, name: &str, pool: &PoolState) {
    let decimals = pool.deposit_decimals.unwrap_or(18);
    table.add_row(row![
        name,
        format!("{} ({})", pool.deposit_token, pool.deposit_symbol),
        format!("{} ({})", pool.secondary_token, pool.secondary_symbol),
        format_units(pool.your_share, decimals),
        format_units(pool.total_share, decimals),
        pool.token_balance_label(),
    ]);
}

pub fn pools_table(state: &AppState) -> Table {
    let mut table = Table::new();
    table.set_titles(row![
        "Pool",
        "Deposit token",
        "Secondary token",
        "Your share",
        "Total share",
        "Wallet balance"
    ]);
    pool_rows(&mut table, "1", &state.dx_mgn_pool.pool1);
    pool_rows(&mut table, "2", &state.dx_mgn_pool.pool2);
    table
}

pub fn mgn_table(mgn: &MgnState) -> Table {
    let mut table = Table::new();
    table.add_row(row!["MGN token", address_label(mgn.address)]);
    table.add_row(row!["Balance", amount_label(mgn.balance, 18)]);
    table.add_row(row!["Locked", amount_label(mgn.locked_balance, 18)]);
    table.add_row(row!["Unlocked", amount_label(mgn.unlocked_balance, 18)]);
    table
}

pub fn deposit_table(receipt: &DepositReceipt) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Step", "Transaction", "Block"]);
    let steps = [
        ("Approve", receipt.approval.as_ref()),
        ("Wrap ETH", receipt.wrap.as_ref()),
        ("Deposit", Some(&receipt.deposit)),
    ];
    for (step, tx) in steps {
        match tx {
            Some(tx) => table.add_row(row![
                step,
                format!("{:#x}", tx.transaction_hash),
                tx.block_number
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string())
            ]),
            None => table.add_row(row![step, "skipped", ""]),
        };
    }
    table
}

pub fn network_table(network: &NetworkConfig) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Network", network.network]);
    table.add_row(row!["WETH", format!("{:#x}", network.weth)]);
    table.add_row(row!["GNO", format!("{:#x}", network.gno)]);
    table.add_row(row![
        "WETH buffer",
        format!("{}%", network.weth_buffer_percent)
    ]);
    table.add_row(row![
        "WebSocket",
        network.websocket_url.as_deref().unwrap_or(PLACEHOLDER)
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxmgn_domain::enums::Network;

    #[test]
    fn test_pools_table_has_both_pools() {
        let table = pools_table(&AppState::default());
        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("... (...)"));
    }

    #[test]
    fn test_network_table() {
        let table = network_table(&NetworkConfig::for_network(Network::Main));
        let rendered = table.to_string();
        assert!(rendered.contains("MAIN"));
        assert!(rendered.contains("104%"));
    }
}
