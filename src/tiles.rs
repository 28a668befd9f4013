use chrono::Months;

use crate::dataset::{round_one_decimal, CombinedDataset};
use crate::models::{Comparison, Geography, GeographyLabels, Statistic, Tiles, Tone};

pub const NOT_AVAILABLE: &str = "N/A";

pub fn compute_tiles(
    dataset: &CombinedDataset,
    statistic: Statistic,
    labels: &GeographyLabels,
) -> Tiles {
    let as_of = dataset.latest_date();
    let latest_row = dataset.latest_row();
    let current = |geography| dataset.value(&statistic.column(geography), latest_row);

    let community = current(Geography::Community);

    let year_ago_date = as_of.checked_sub_months(Months::new(12));
    let year_ago_value = year_ago_date
        .and_then(|date| dataset.row_for(date))
        .and_then(|row| dataset.value(&statistic.column(Geography::Community), row));

    let year_over_year = compare("Year over year", community, year_ago_value);
    let comparisons = Geography::REFERENCES
        .iter()
        .map(|&geography| compare(labels.label(geography), community, current(geography)))
        .collect();

    Tiles {
        statistic,
        as_of,
        primary_label: labels.label(Geography::Community).to_string(),
        primary_value: community,
        year_ago_date,
        year_ago_value,
        year_over_year,
        comparisons,
    }
}

pub fn compare(label: &str, subject: Option<f64>, reference: Option<f64>) -> Comparison {
    let percent = percent_difference(subject, reference);
    let delta = match (subject, reference) {
        (Some(subject), Some(reference)) => Some(subject - reference),
        _ => None,
    };

    Comparison {
        label: label.to_string(),
        percent,
        percent_display: format_percent(percent),
        tone: tone_for(percent),
        delta,
        delta_display: format_delta(delta),
    }
}

/// `(subject - reference) / reference * 100` to one decimal place; `None`
/// when either side is absent or the reference is zero.
pub fn percent_difference(subject: Option<f64>, reference: Option<f64>) -> Option<f64> {
    match (subject, reference) {
        (Some(subject), Some(reference)) if reference != 0.0 => {
            Some(round_one_decimal((subject - reference) / reference * 100.0))
        }
        _ => None,
    }
}

pub fn tone_for(percent: Option<f64>) -> Tone {
    match percent {
        Some(value) if value > 0.0 => Tone::Positive,
        Some(value) if value < 0.0 => Tone::Negative,
        _ => Tone::Neutral,
    }
}

pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        None => NOT_AVAILABLE.to_string(),
        Some(value) if value == 0.0 => "0.0%".to_string(),
        Some(value) => format!("{value:+.1}%"),
    }
}

pub fn format_delta(delta: Option<f64>) -> String {
    let Some(delta) = delta else {
        return NOT_AVAILABLE.to_string();
    };
    let whole = delta.round() as i64;
    let sign = match whole {
        0 => "",
        value if value > 0 => "+",
        _ => "-",
    };
    format!("{sign}${}", group_thousands(whole.unsigned_abs()))
}

pub fn format_currency(value: Option<f64>) -> String {
    match value {
        None => NOT_AVAILABLE.to_string(),
        Some(value) if value < 0.0 => {
            format!("-${}", group_thousands(value.round().abs() as u64))
        }
        Some(value) => format!("${}", group_thousands(value.round() as u64)),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{date, sample_dataset};

    #[test]
    fn tiles_use_latest_row_and_year_ago_value() {
        let dataset = sample_dataset();
        let tiles = compute_tiles(&dataset, Statistic::Mean, &GeographyLabels::default());

        assert_eq!(tiles.as_of, date(2024, 11, 1));
        assert_eq!(tiles.primary_label, "SkyTerrace Towns");
        assert_eq!(tiles.primary_value, Some(600_000.0));
        assert_eq!(tiles.year_ago_date, Some(date(2023, 11, 1)));
        assert_eq!(tiles.year_ago_value, Some(580_000.0));
        assert_eq!(tiles.year_over_year.percent, Some(3.4));
        assert_eq!(tiles.year_over_year.delta_display, "+$20,000");
    }

    #[test]
    fn comparisons_follow_reference_order_and_signs() {
        let dataset = sample_dataset();
        let tiles = compute_tiles(&dataset, Statistic::Mean, &GeographyLabels::default());
        let labels: Vec<&str> = tiles.comparisons.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Wesley Heights", "Charlotte", "North Carolina"]);

        let neighborhood = &tiles.comparisons[0];
        assert_eq!(neighborhood.percent, Some(4.3));
        assert_eq!(neighborhood.percent_display, "+4.3%");
        assert_eq!(neighborhood.tone, Tone::Positive);
        assert_eq!(neighborhood.delta_display, "+$25,000");

        let state = &tiles.comparisons[2];
        assert_eq!(state.percent, Some(-6.2));
        assert_eq!(state.tone, Tone::Negative);
        assert_eq!(state.delta, Some(-40_000.0));
        assert_eq!(state.delta_display, "-$40,000");
    }

    #[test]
    fn zero_reference_reports_not_available() {
        let dataset = sample_dataset();
        let tiles = compute_tiles(&dataset, Statistic::Mean, &GeographyLabels::default());
        let city = &tiles.comparisons[1];
        assert_eq!(city.percent, None);
        assert_eq!(city.percent_display, NOT_AVAILABLE);
        assert_eq!(city.tone, Tone::Neutral);
        assert_eq!(city.delta_display, "+$600,000");
    }

    #[test]
    fn missing_reference_columns_report_not_available() {
        let dataset = sample_dataset();
        let tiles = compute_tiles(&dataset, Statistic::Median, &GeographyLabels::default());
        assert_eq!(tiles.primary_value, Some(500_000.0));
        assert_eq!(tiles.year_ago_value, Some(470_000.0));
        for comparison in &tiles.comparisons {
            assert_eq!(comparison.percent_display, NOT_AVAILABLE);
            assert_eq!(comparison.delta_display, NOT_AVAILABLE);
        }
    }

    #[test]
    fn percent_sign_matches_difference() {
        assert_eq!(percent_difference(Some(110.0), Some(100.0)), Some(10.0));
        assert_eq!(percent_difference(Some(90.0), Some(100.0)), Some(-10.0));
        assert_eq!(percent_difference(Some(100.0), Some(100.0)), Some(0.0));
        assert_eq!(percent_difference(Some(100.0), Some(0.0)), None);
        assert_eq!(percent_difference(None, Some(100.0)), None);
    }

    #[test]
    fn percent_ties_round_to_even() {
        assert_eq!(
            percent_difference(Some(600_000.0), Some(640_000.0)),
            Some(-6.2)
        );
        assert_eq!(percent_difference(Some(1_050.0), Some(800.0)), Some(31.2));
    }

    #[test]
    fn formats_signed_values() {
        assert_eq!(format_percent(Some(0.0)), "0.0%");
        assert_eq!(format_percent(Some(-1.0)), "-1.0%");
        assert_eq!(format_delta(Some(1_234_567.4)), "+$1,234,567");
        assert_eq!(format_delta(Some(-999.0)), "-$999");
        assert_eq!(format_delta(Some(0.2)), "$0");
        assert_eq!(format_currency(Some(612_345.0)), "$612,345");
        assert_eq!(format_currency(None), NOT_AVAILABLE);
    }
}
