use chrono::NaiveDate;

use crate::dataset::DatasetSlice;
use crate::models::{
    ChartDescription, ChartLayout, ChartSeries, DateAxis, Geography, GeographyLabels, Margin,
    Statistic, ValueAxis,
};

pub const VALUE_AXIS_TITLE: &str = "Indexed Home Value";

/// One line per geography whose indexed column is present, in fixed
/// geography order. Absent columns are skipped.
pub fn build_chart(
    slice: &DatasetSlice<'_>,
    start: NaiveDate,
    statistic: Statistic,
    labels: &GeographyLabels,
) -> ChartDescription {
    let data = Geography::ALL
        .iter()
        .filter_map(|&geography| {
            let values = slice.column(&statistic.indexed_column(geography))?;
            Some(ChartSeries {
                name: labels.label(geography).to_string(),
                geography,
                x: slice.dates().to_vec(),
                y: values.to_vec(),
                mode: "lines+markers".to_string(),
                hover_template: "%{y:.1f}".to_string(),
            })
        })
        .collect();

    ChartDescription {
        data,
        layout: ChartLayout {
            yaxis: ValueAxis {
                title: VALUE_AXIS_TITLE.to_string(),
                tick_format: ".1f".to_string(),
            },
            xaxis: DateAxis {
                title: String::new(),
                tick_format: "%b %Y".to_string(),
                dtick: "M1".to_string(),
                range: (start, slice.latest_date()),
            },
            margin: Margin {
                l: 40,
                r: 10,
                t: 10,
                b: 40,
            },
            height: 400,
            legend_title_text: "Geography".to_string(),
            hover_mode: "x unified".to_string(),
        },
    }
}
