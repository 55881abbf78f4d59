//! Day-by-day balance reconstruction from a transaction list.
//!
//! Given the balance known at an anchor date and the signed transaction
//! history of an address, walk backward one calendar day at a time and undo
//! each day's net flow to recover the historical balance series.

use crate::core::error::ComputeError;
use chrono::{DateTime, NaiveDate};
use std::collections::HashMap;

/// A single signed balance change for a tracked address.
///
/// `delta` is the net effect of one transaction in the smallest currency
/// unit (satoshis for Bitcoin): credits to the address minus debits from it,
/// so a self-transfer nets to its actual balance change (usually just the
/// fee). `timestamp` is unix seconds, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionEvent {
    pub timestamp: i64,
    pub delta: i64,
}

/// One entry of a reconstructed balance series, in smallest currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: i64,
}

/// Reconstructs a contiguous daily balance series ending at `anchor_date`.
///
/// `final_balance` is the balance as of `anchor_date`; the returned series
/// has exactly `window_days` entries, oldest date first and `anchor_date`
/// last, with no gaps. Days without transactions repeat the neighboring
/// balance. Transactions are bucketed by UTC calendar day; events dated
/// after `anchor_date` are never visited by the backward walk and do not
/// affect the output.
///
/// Negative running balances are not clamped: the routine trusts its input,
/// and incomplete or double-counted upstream data propagates into the series
/// unchecked.
pub fn reconstruct(
    transactions: &[TransactionEvent],
    final_balance: i64,
    window_days: u32,
    anchor_date: NaiveDate,
) -> Result<Vec<DailyBalance>, ComputeError> {
    if window_days == 0 {
        return Err(ComputeError::invalid_input("window_days must be at least 1"));
    }

    let mut net_flow: HashMap<NaiveDate, i64> = HashMap::new();
    for (index, tx) in transactions.iter().enumerate() {
        let day = DateTime::from_timestamp(tx.timestamp, 0)
            .ok_or_else(|| {
                ComputeError::invalid_input(format!(
                    "transaction {index} has an unrepresentable timestamp: {}",
                    tx.timestamp
                ))
            })?
            .date_naive();
        *net_flow.entry(day).or_insert(0) += tx.delta;
    }

    let mut series = Vec::with_capacity(window_days as usize);
    let mut balance = final_balance;
    let mut day = anchor_date;
    series.push(DailyBalance {
        date: day,
        balance,
    });
    for _ in 1..window_days {
        day = day.pred_opt().ok_or_else(|| {
            ComputeError::invalid_input("window extends past the earliest representable date")
        })?;
        if let Some(flow) = net_flow.get(&day) {
            balance -= flow;
        }
        series.push(DailyBalance {
            date: day,
            balance,
        });
    }
    series.reverse();
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};

    const SATS_PER_BTC: i64 = 100_000_000;

    fn day(anchor: NaiveDate, offset: i64) -> NaiveDate {
        anchor + chrono::Duration::days(offset)
    }

    fn at_noon(date: NaiveDate) -> i64 {
        date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
            .and_utc()
            .timestamp()
    }

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn empty_transactions_yield_flat_series() {
        let series = reconstruct(&[], 42_000, 90, anchor()).unwrap();
        assert_eq!(series.len(), 90);
        assert!(series.iter().all(|entry| entry.balance == 42_000));
        assert_eq!(series.last().unwrap().date, anchor());
    }

    #[test]
    fn dates_are_contiguous_and_end_at_anchor() {
        let txs = vec![
            TransactionEvent {
                timestamp: at_noon(day(anchor(), -3)),
                delta: 1_000,
            },
            TransactionEvent {
                timestamp: at_noon(day(anchor(), -10)),
                delta: -2_500,
            },
        ];
        let series = reconstruct(&txs, 50_000, 30, anchor()).unwrap();
        assert_eq!(series.len(), 30);
        for pair in series.windows(2) {
            assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
        }
        assert_eq!(series.last().unwrap().date, anchor());
        assert_eq!(series.last().unwrap().balance, 50_000);
    }

    #[test]
    fn incoming_transfer_steps_balance_up_crossing_its_day() {
        // 0.5 BTC received the day before the anchor, 1.0 BTC held now.
        let txs = vec![TransactionEvent {
            timestamp: at_noon(day(anchor(), -1)),
            delta: SATS_PER_BTC / 2,
        }];
        let series = reconstruct(&txs, SATS_PER_BTC, 3, anchor()).unwrap();
        assert_eq!(
            series,
            vec![
                DailyBalance {
                    date: day(anchor(), -2),
                    balance: SATS_PER_BTC / 2,
                },
                DailyBalance {
                    date: day(anchor(), -1),
                    balance: SATS_PER_BTC / 2,
                },
                DailyBalance {
                    date: anchor(),
                    balance: SATS_PER_BTC,
                },
            ]
        );
    }

    #[test]
    fn unordered_input_is_bucketed_the_same() {
        let early = TransactionEvent {
            timestamp: at_noon(day(anchor(), -20)),
            delta: 7_000,
        };
        let late = TransactionEvent {
            timestamp: at_noon(day(anchor(), -2)),
            delta: -3_000,
        };
        let ordered = reconstruct(&[early, late], 10_000, 30, anchor()).unwrap();
        let shuffled = reconstruct(&[late, early], 10_000, 30, anchor()).unwrap();
        assert_eq!(ordered, shuffled);
    }

    #[test]
    fn same_day_deltas_are_summed() {
        let ts = at_noon(day(anchor(), -5));
        let txs = vec![
            TransactionEvent {
                timestamp: ts,
                delta: 4_000,
            },
            TransactionEvent {
                timestamp: ts + 3600,
                delta: -1_000,
            },
        ];
        let series = reconstruct(&txs, 10_000, 10, anchor()).unwrap();
        // Before the bucketed day the balance is 10_000 - (4_000 - 1_000).
        assert_eq!(series.first().unwrap().balance, 7_000);
        assert_eq!(series.last().unwrap().balance, 10_000);
    }

    #[test]
    fn negative_running_balances_are_not_clamped() {
        let txs = vec![TransactionEvent {
            timestamp: at_noon(day(anchor(), -1)),
            delta: 5_000,
        }];
        let series = reconstruct(&txs, 1_000, 5, anchor()).unwrap();
        assert_eq!(series.first().unwrap().balance, -4_000);
    }

    #[test]
    fn transactions_after_anchor_are_ignored() {
        let txs = vec![TransactionEvent {
            timestamp: at_noon(day(anchor(), 2)),
            delta: 9_999,
        }];
        let series = reconstruct(&txs, 1_000, 5, anchor()).unwrap();
        assert!(series.iter().all(|entry| entry.balance == 1_000));
    }

    #[test]
    fn unrepresentable_timestamp_names_the_offending_index() {
        let txs = vec![
            TransactionEvent {
                timestamp: at_noon(anchor()),
                delta: 1,
            },
            TransactionEvent {
                timestamp: i64::MAX,
                delta: 1,
            },
        ];
        let err = reconstruct(&txs, 0, 3, anchor()).unwrap_err();
        match err {
            ComputeError::InvalidInput { reason } => {
                assert!(reason.contains("transaction 1"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = reconstruct(&[], 0, 0, anchor()).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput { .. }));
    }

    #[test]
    fn anchor_day_flow_does_not_disturb_the_anchor_value() {
        let txs = vec![TransactionEvent {
            timestamp: at_noon(anchor()),
            delta: 123_456,
        }];
        let series = reconstruct(&txs, 1_000_000, 7, anchor()).unwrap();
        assert_eq!(series.last().unwrap().balance, 1_000_000);
    }

    #[test]
    fn today_anchor_matches_utc_calendar() {
        // Bucketing and the anchor share the UTC calendar, so an event
        // stamped "now" lands on today's entry, not yesterday's.
        let today = Utc::now().date_naive();
        let txs = vec![TransactionEvent {
            timestamp: Utc::now().timestamp(),
            delta: 500,
        }];
        let series = reconstruct(&txs, 2_000, 3, today).unwrap();
        // The flow sits on the anchor day, which the backward walk leaves alone.
        assert!(series.iter().all(|entry| entry.balance == 2_000));
    }
}
