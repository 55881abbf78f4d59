use super::ui;
use crate::core::config::WatchItem;
use crate::core::market::CandleProvider;
use crate::core::oscillator::{self, BollingerBands, DEFAULT_BOLLINGER_WINDOW};
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;

/// One rendered row of the market table. Fields are `None` when the fetch
/// failed or the history was too short for the derived value.
struct MarketRow {
    label: String,
    last_price: Option<f64>,
    change_pct: Option<f64>,
    rsi: Option<f64>,
    bands: Option<BollingerBands>,
    fetch_failed: bool,
}

fn build_row(label: &str, closes: Option<Vec<f64>>, rsi_period: usize) -> MarketRow {
    let Some(closes) = closes else {
        return MarketRow {
            label: label.to_string(),
            last_price: None,
            change_pct: None,
            rsi: None,
            bands: None,
            fetch_failed: true,
        };
    };

    let change_pct = super::ok_or_logged(
        label,
        oscillator::percent_change(&closes).map_err(Into::into),
    );
    let rsi = super::ok_or_logged(
        label,
        oscillator::relative_strength(&closes, rsi_period).map_err(Into::into),
    );
    let bands = super::ok_or_logged(
        label,
        oscillator::bollinger(&closes, DEFAULT_BOLLINGER_WINDOW).map_err(Into::into),
    );
    MarketRow {
        label: label.to_string(),
        last_price: closes.last().copied(),
        change_pct,
        rsi,
        bands,
        fetch_failed: false,
    }
}

fn display_as_table(rows: &[MarketRow], rsi_period: usize) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Instrument"),
        ui::header_cell("Last"),
        ui::header_cell("Change (1d)"),
        ui::header_cell(&format!("RSI({rsi_period})")),
        ui::header_cell(&format!("SMA({DEFAULT_BOLLINGER_WINDOW})")),
        ui::header_cell("BB upper"),
        ui::header_cell("BB lower"),
    ]);

    for row in rows {
        let last = ui::format_optional_cell(row.last_price, |p| format!("{p:.2}"));
        let change = row
            .change_pct
            .map_or(ui::na_cell(row.fetch_failed), ui::change_cell);
        let rsi = row.rsi.map_or(ui::na_cell(row.fetch_failed), ui::rsi_cell);
        let sma =
            ui::format_optional_cell(row.bands.map(|b| b.middle), |v| format!("{v:.2}"));
        let upper =
            ui::format_optional_cell(row.bands.map(|b| b.upper), |v| format!("{v:.2}"));
        let lower =
            ui::format_optional_cell(row.bands.map(|b| b.lower), |v| format!("{v:.2}"));
        table.add_row(vec![Cell::new(&row.label), last, change, rsi, sma, upper, lower]);
    }
    table.to_string()
}

pub async fn run(
    watchlist: &[WatchItem],
    crypto_provider: &(dyn CandleProvider),
    taiwan_provider: &(dyn CandleProvider),
    rsi_period: usize,
) -> Result<()> {
    if watchlist.is_empty() {
        println!(
            "{}",
            ui::style_text("Watchlist is empty; nothing to show.", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    // One extra close so the trailing window yields a full set of deltas,
    // and at least a full Bollinger window.
    let limit = (rsi_period + 1).max(DEFAULT_BOLLINGER_WINDOW);

    let pb = ui::new_progress_bar(watchlist.len() as u64, true);
    pb.set_message("Fetching closes...");

    let close_futures = watchlist.iter().map(|item| {
        let pb_clone = pb.clone();
        async move {
            let provider = match item {
                WatchItem::Crypto(_) => crypto_provider,
                WatchItem::TaiwanStock(_) => taiwan_provider,
            };
            let res = provider.fetch_closes(item.label(), limit).await;
            pb_clone.inc(1);
            (item.label().to_string(), res)
        }
    });
    let fetched = join_all(close_futures).await;
    pb.finish_and_clear();

    let mut rows = Vec::with_capacity(fetched.len());
    for (label, result) in fetched {
        let closes = super::ok_or_logged(&label, result);
        rows.push(build_row(&label, closes, rsi_period));
    }

    println!(
        "{}\n",
        ui::style_text("Market overview", ui::StyleType::Title)
    );
    println!("{}", display_as_table(&rows, rsi_period));
    Ok(())
}
