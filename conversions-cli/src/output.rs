//! Plain-text rendering of API results.

use conversions_types::{ConversionRecord, CurrencyCount, PairStat};

pub fn history_line(record: &ConversionRecord) -> String {
    format!(
        "{}  {:.2} {} -> {:.2} {}  (rate {})",
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.amount.round_dp(2),
        record.from_currency,
        record.converted_amount.round_dp(2),
        record.to_currency,
        record.conversion_rate.normalize(),
    )
}

pub fn stat_line(stat: &PairStat) -> String {
    format!(
        "{} -> {}  {}",
        stat.from_currency, stat.to_currency, stat.count
    )
}

pub fn distribution_line(entry: &CurrencyCount) -> String {
    format!("{:<6}{}", entry.currency_code, entry.count)
}

pub fn print_history(records: &[ConversionRecord]) {
    if records.is_empty() {
        println!("No conversion history yet");
        return;
    }
    for record in records {
        println!("{}", history_line(record));
    }
}
