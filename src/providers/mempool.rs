use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::balance::TransactionEvent;
use crate::core::ledger::LedgerProvider;

/// mempool.space Esplora address API.
pub struct MempoolProvider {
    base_url: String,
}

impl MempoolProvider {
    pub fn new(base_url: &str) -> Self {
        MempoolProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct AddressResponse {
    chain_stats: ChainStats,
}

#[derive(Deserialize, Debug)]
struct ChainStats {
    funded_txo_sum: i64,
    spent_txo_sum: i64,
}

#[derive(Deserialize, Debug)]
struct AddressTx {
    txid: String,
    vin: Vec<TxInput>,
    vout: Vec<TxOutput>,
    status: TxStatus,
}

#[derive(Deserialize, Debug)]
struct TxInput {
    // Absent for coinbase inputs.
    prevout: Option<TxOutput>,
}

#[derive(Deserialize, Debug)]
struct TxOutput {
    scriptpubkey_address: Option<String>,
    value: i64,
}

#[derive(Deserialize, Debug)]
struct TxStatus {
    confirmed: bool,
    block_time: Option<i64>,
}

/// Net balance change of `address` for one transaction: outputs credited to
/// it minus inputs spent from it, so self-transfers net to the real change.
fn address_delta(tx: &AddressTx, address: &str) -> i64 {
    let credited: i64 = tx
        .vout
        .iter()
        .filter(|out| out.scriptpubkey_address.as_deref() == Some(address))
        .map(|out| out.value)
        .sum();
    let debited: i64 = tx
        .vin
        .iter()
        .filter_map(|input| input.prevout.as_ref())
        .filter(|prev| prev.scriptpubkey_address.as_deref() == Some(address))
        .map(|prev| prev.value)
        .sum();
    credited - debited
}

#[async_trait]
impl LedgerProvider for MempoolProvider {
    #[instrument(name = "AddressBalanceFetch", skip(self), fields(address = %address))]
    async fn address_balance(&self, address: &str) -> Result<i64> {
        let url = format!("{}/api/address/{}", self.base_url, address);
        debug!("Requesting address summary from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(super::USER_AGENT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for address: {}", e, address))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for address: {}",
                response.status(),
                address
            ));
        }

        let data = response.json::<AddressResponse>().await?;
        Ok(data.chain_stats.funded_txo_sum - data.chain_stats.spent_txo_sum)
    }

    #[instrument(name = "AddressTxsFetch", skip(self), fields(address = %address))]
    async fn address_events(&self, address: &str) -> Result<Vec<TransactionEvent>> {
        let url = format!("{}/api/address/{}/txs", self.base_url, address);
        debug!("Requesting address transactions from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(super::USER_AGENT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for address: {}", e, address))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for address: {}",
                response.status(),
                address
            ));
        }

        let txs = response.json::<Vec<AddressTx>>().await?;
        let mut events = Vec::with_capacity(txs.len());
        for tx in &txs {
            let Some(block_time) = tx.status.block_time.filter(|_| tx.status.confirmed) else {
                debug!("Skipping unconfirmed transaction {}", tx.txid);
                continue;
            };
            events.push(TransactionEvent {
                timestamp: block_time,
                delta: address_delta(tx, address),
            });
        }
        debug!("Mapped {} confirmed transactions for {}", events.len(), address);
        Ok(events)
    }
}
