//! Ledger-query abstractions
//!
//! The tracked address is always an explicit parameter; nothing in the core
//! reads ambient state to decide which entity it is reconstructing.

use crate::core::balance::TransactionEvent;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait LedgerProvider: Send + Sync {
    /// Confirmed balance of `address` in smallest currency units.
    async fn address_balance(&self, address: &str) -> Result<i64>;

    /// Recent confirmed transactions of `address` as signed balance events,
    /// credits minus debits per transaction.
    async fn address_events(&self, address: &str) -> Result<Vec<TransactionEvent>>;
}
