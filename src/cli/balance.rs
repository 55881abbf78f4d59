use super::ui;
use crate::core::balance::{self, DailyBalance};
use crate::core::config::TrackedAddress;
use crate::core::ledger::LedgerProvider;
use anyhow::Result;
use chrono::Utc;
use comfy_table::Cell;

const SATS_PER_BTC: f64 = 100_000_000.0;

fn btc(sats: i64) -> String {
    format!("{:.8}", sats as f64 / SATS_PER_BTC)
}

/// Picks the anchor day plus every 7th day walking back, oldest first, so a
/// 90-day series renders as a readable table instead of 90 rows.
fn weekly_samples(series: &[DailyBalance]) -> Vec<DailyBalance> {
    let last = series.len().saturating_sub(1);
    series
        .iter()
        .enumerate()
        .filter(|(idx, _)| (last - idx) % 7 == 0)
        .map(|(_, entry)| *entry)
        .collect()
}

fn display_as_table(label: &str, series: &[DailyBalance]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Date"), ui::header_cell("Balance (BTC)")]);
    for entry in weekly_samples(series) {
        table.add_row(vec![
            Cell::new(entry.date.to_string()),
            ui::format_optional_cell(Some(entry.balance), btc),
        ]);
    }

    let mut output = format!("Address: {}\n\n", ui::style_text(label, ui::StyleType::Title));
    output.push_str(&table.to_string());
    if let Some(current) = series.last() {
        output.push_str(&format!(
            "\n\nCurrent balance: {}",
            ui::style_text(&btc(current.balance), ui::StyleType::TotalValue)
        ));
    }
    output
}

pub async fn run(
    addresses: &[TrackedAddress],
    provider: &(dyn LedgerProvider),
    window_days: u32,
) -> Result<()> {
    if addresses.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No tracked addresses configured; nothing to show.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    let anchor_date = Utc::now().date_naive();
    let pb = ui::new_progress_bar(addresses.len() as u64, true);
    pb.set_message("Fetching address history...");

    let mut outputs = Vec::with_capacity(addresses.len());
    for tracked in addresses {
        let fetched = async {
            let final_balance = provider.address_balance(&tracked.address).await?;
            let events = provider.address_events(&tracked.address).await?;
            anyhow::Ok((final_balance, events))
        }
        .await;
        pb.inc(1);

        match super::ok_or_logged(&tracked.label, fetched) {
            Some((final_balance, events)) => {
                let series = balance::reconstruct(&events, final_balance, window_days, anchor_date)?;
                outputs.push(display_as_table(&tracked.label, &series));
            }
            None => {
                outputs.push(format!(
                    "Address: {}\n\n{}",
                    ui::style_text(&tracked.label, ui::StyleType::Title),
                    ui::style_text("Could not fetch ledger data.", ui::StyleType::Error)
                ));
            }
        }
    }
    pb.finish_and_clear();

    let count = outputs.len();
    for (i, output) in outputs.into_iter().enumerate() {
        println!("{output}");
        if i < count - 1 {
            ui::print_separator();
        }
    }
    Ok(())
}
