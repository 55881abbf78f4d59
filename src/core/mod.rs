//! Pure computations and the provider seams they are fed through

pub mod balance;
pub mod config;
pub mod error;
pub mod ledger;
pub mod log;
pub mod market;
pub mod oscillator;
pub mod sentiment;

// Re-export main types for cleaner imports
pub use balance::{DailyBalance, TransactionEvent};
pub use error::ComputeError;
pub use ledger::LedgerProvider;
pub use market::{CandleProvider, DerivativesProvider, DerivativesSnapshot};
pub use sentiment::{SentimentProvider, SentimentReading};
