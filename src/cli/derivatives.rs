use super::ui;
use crate::core::config::WatchItem;
use crate::core::market::{DerivativesProvider, DerivativesSnapshot};
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;

fn display_as_table(rows: &[(String, Option<DerivativesSnapshot>)]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Long/Short ratio"),
        ui::header_cell("Funding rate"),
    ]);

    for (symbol, snapshot) in rows {
        match snapshot {
            Some(snap) => {
                table.add_row(vec![
                    Cell::new(symbol),
                    ui::format_optional_cell(Some(snap.long_short_ratio), |r| format!("{r:.4}")),
                    ui::change_cell(snap.funding_rate * 100.0),
                ]);
            }
            None => {
                table.add_row(vec![Cell::new(symbol), ui::na_cell(true), ui::na_cell(true)]);
            }
        }
    }
    table.to_string()
}

pub async fn run(watchlist: &[WatchItem], provider: &(dyn DerivativesProvider)) -> Result<()> {
    let symbols: Vec<&str> = watchlist
        .iter()
        .filter_map(|item| match item {
            WatchItem::Crypto(c) => Some(c.symbol.as_str()),
            WatchItem::TaiwanStock(_) => None,
        })
        .collect();

    if symbols.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No crypto symbols on the watchlist; nothing to show.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    let pb = ui::new_progress_bar(symbols.len() as u64, true);
    pb.set_message("Fetching positioning data...");

    let futures = symbols.iter().map(|symbol| {
        let pb_clone = pb.clone();
        async move {
            let res = provider.fetch_derivatives(symbol).await;
            pb_clone.inc(1);
            (symbol.to_string(), res)
        }
    });
    let fetched = join_all(futures).await;
    pb.finish_and_clear();

    let rows: Vec<(String, Option<DerivativesSnapshot>)> = fetched
        .into_iter()
        .map(|(symbol, res)| {
            let snapshot = super::ok_or_logged(&symbol, res);
            (symbol, snapshot)
        })
        .collect();

    println!(
        "{}\n",
        ui::style_text("Futures positioning", ui::StyleType::Title)
    );
    println!("{}", display_as_table(&rows));
    Ok(())
}
