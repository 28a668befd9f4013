use std::fmt::Write;

use crate::dashboard::Dashboard;
use crate::dataset::BASE_DATE;
use crate::models::{ChartSeries, Statistic, Tiles};
use crate::tiles::format_currency;

/// Plain-text tile block, one comparison per line.
pub fn render_tiles(tiles: &Tiles) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{} {} home value as of {}: {}",
        tiles.primary_label,
        tiles.statistic.display_name(),
        tiles.as_of,
        format_currency(tiles.primary_value)
    );

    match (tiles.year_ago_date, tiles.year_ago_value) {
        (Some(date), Some(value)) => {
            let _ = writeln!(
                output,
                "- {} (vs {} on {}): {} ({})",
                tiles.year_over_year.label,
                format_currency(Some(value)),
                date,
                tiles.year_over_year.percent_display,
                tiles.year_over_year.delta_display
            );
        }
        _ => {
            let _ = writeln!(output, "- {}: N/A", tiles.year_over_year.label);
        }
    }

    for comparison in &tiles.comparisons {
        let _ = writeln!(
            output,
            "- vs {}: {} ({})",
            comparison.label, comparison.percent_display, comparison.delta_display
        );
    }

    output
}

fn summarize_series(series: &ChartSeries) -> String {
    let first = series.y.iter().flatten().next();
    let last = series.y.iter().flatten().last();
    match (first, last) {
        (Some(first), Some(last)) => {
            format!("- {}: {:.1} → {:.1}", series.name, first, last)
        }
        _ => format!("- {}: no indexed values in this window", series.name),
    }
}

pub fn build_report(dashboard: &Dashboard, range_token: &str, statistic: Statistic) -> String {
    let tiles = dashboard.tiles(statistic);
    let view = dashboard.chart(range_token, statistic);

    let mut output = String::new();

    let _ = writeln!(output, "# {} HOA Dashboard", dashboard.labels().community);
    let _ = writeln!(
        output,
        "Property value trends using the {} statistic (range {} from {})",
        statistic.display_name(),
        range_token,
        view.start
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    output.push_str(&render_tiles(&tiles));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Indexed Trend");

    if view.rows == 0 {
        let _ = writeln!(output, "No observations in this window.");
    } else {
        let _ = writeln!(
            output,
            "{} observations between {} and {}.",
            view.rows,
            view.start,
            dashboard.dataset().latest_date()
        );
        if view.chart.data.is_empty() {
            let _ = writeln!(output, "No indexed series for this statistic.");
        }
        for series in &view.chart.data {
            let _ = writeln!(output, "{}", summarize_series(series));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Note: All values are indexed to 100 as of {} representing changes in {} home values over time.",
        BASE_DATE.format("%B %-d, %Y"),
        statistic.display_name()
    );

    output
}
