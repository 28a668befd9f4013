use chrono::NaiveDate;
use tracing::{info, warn};

use crate::chart;
use crate::dataset::CombinedDataset;
use crate::models::{ChartDescription, GeographyLabels, Statistic, Tiles};
use crate::range;
use crate::tiles;

/// The shared read-only state every interaction computes against.
pub struct Dashboard {
    dataset: CombinedDataset,
    labels: GeographyLabels,
}

#[derive(Debug, Clone)]
pub struct RangeChart {
    pub start: NaiveDate,
    pub rows: usize,
    pub chart: ChartDescription,
}

impl Dashboard {
    pub fn new(dataset: CombinedDataset, labels: GeographyLabels) -> Self {
        Self { dataset, labels }
    }

    pub fn dataset(&self) -> &CombinedDataset {
        &self.dataset
    }

    pub fn labels(&self) -> &GeographyLabels {
        &self.labels
    }

    pub fn tiles(&self, statistic: Statistic) -> Tiles {
        tiles::compute_tiles(&self.dataset, statistic, &self.labels)
    }

    /// Range selection, filtering and chart build for one interaction.
    /// An empty window is charted as-is.
    pub fn chart(&self, range_token: &str, statistic: Statistic) -> RangeChart {
        let start = range::compute_range_start(&self.dataset, range_token);
        let slice = self.dataset.filter_from(start);

        if slice.is_empty() {
            warn!(range = range_token, %start, "no rows in selected window");
        } else {
            info!(range = range_token, %start, rows = slice.len(), "charting window");
        }

        RangeChart {
            start,
            rows: slice.len(),
            chart: chart::build_chart(&slice, start, statistic, &self.labels),
        }
    }
}
