use super::ui;
use crate::core::sentiment::{SentimentProvider, SentimentReading};
use anyhow::Result;
use comfy_table::Cell;

// Today, yesterday, and a trailing week.
const READINGS_WANTED: usize = 8;

fn weekly_average(readings: &[SentimentReading]) -> Option<f64> {
    let week = &readings[..readings.len().min(7)];
    if week.is_empty() {
        return None;
    }
    Some(week.iter().map(|r| r.value as f64).sum::<f64>() / week.len() as f64)
}

fn display_as_table(readings: &[SentimentReading]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Reading"),
        ui::header_cell("Index"),
        ui::header_cell("Date"),
    ]);

    let labelled = [("Now", readings.first()), ("Yesterday", readings.get(1))];
    for (label, reading) in labelled {
        match reading {
            Some(r) => {
                table.add_row(vec![
                    Cell::new(label),
                    ui::sentiment_cell(r.value, &r.classification),
                    Cell::new(r.date.to_string()),
                ]);
            }
            None => {
                table.add_row(vec![Cell::new(label), ui::na_cell(false), ui::na_cell(false)]);
            }
        }
    }

    if let Some(avg) = weekly_average(readings) {
        table.add_row(vec![
            Cell::new("7-day average"),
            Cell::new(format!("{avg:.1}")),
            Cell::new(""),
        ]);
    }
    table.to_string()
}

pub async fn run(provider: &(dyn SentimentProvider)) -> Result<()> {
    let readings = provider.fetch_readings(READINGS_WANTED).await?;

    println!(
        "{}\n",
        ui::style_text("Crypto Fear & Greed", ui::StyleType::Title)
    );
    println!("{}", display_as_table(&readings));
    Ok(())
}
