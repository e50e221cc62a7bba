//! Average enjoyment across a level's records

use crate::models::Record;

const ENJOYMENT_RANGE: std::ops::RangeInclusive<i32> = 0..=10;

/// Mean of the enjoyment ratings in `0..=10`, rounded to two decimals.
///
/// Missing and out-of-range ratings count towards neither the sum nor the
/// count. Returns `None` when no record qualifies.
pub fn average_enjoyment(records: &[Record]) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter_map(|record| record.enjoyment)
        .filter(|value| ENJOYMENT_RANGE.contains(value))
        .fold((0i64, 0u32), |(sum, count), value| {
            (sum + value as i64, count + 1)
        });

    if count == 0 {
        return None;
    }

    let mean = sum as f64 / count as f64;
    Some((mean * 100.0).round() / 100.0)
}

/// Display form used next to a level: `6.00/10`
pub fn format_enjoyment(average: f64) -> String {
    format!("{:.2}/10", average)
}
