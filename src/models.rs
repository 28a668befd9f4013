use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Geography {
    Community,
    Neighborhood,
    City,
    State,
}

impl Geography {
    /// Chart and legend order.
    pub const ALL: [Geography; 4] = [
        Geography::Community,
        Geography::Neighborhood,
        Geography::City,
        Geography::State,
    ];

    /// Geographies the community is compared against.
    pub const REFERENCES: [Geography; 3] =
        [Geography::Neighborhood, Geography::City, Geography::State];

    pub fn key(self) -> &'static str {
        match self {
            Geography::Community => "community",
            Geography::Neighborhood => "neighborhood",
            Geography::City => "city",
            Geography::State => "state",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    #[value(name = "avg", alias = "mean")]
    Mean,
    #[value(name = "median")]
    Median,
}

impl Statistic {
    pub fn column_suffix(self) -> &'static str {
        match self {
            Statistic::Mean => "avg",
            Statistic::Median => "median",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
        }
    }

    /// Raw source column, e.g. `city_median`.
    pub fn column(self, geography: Geography) -> String {
        format!("{}_{}", geography.key(), self.column_suffix())
    }

    /// Derived base-100 column, e.g. `city_median_indexed`.
    pub fn indexed_column(self, geography: Geography) -> String {
        format!("{}_indexed", self.column(geography))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeographyLabels {
    pub community: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl Default for GeographyLabels {
    fn default() -> Self {
        Self {
            community: "SkyTerrace Towns".to_string(),
            neighborhood: "Wesley Heights".to_string(),
            city: "Charlotte".to_string(),
            state: "North Carolina".to_string(),
        }
    }
}

impl GeographyLabels {
    pub fn label(&self, geography: Geography) -> &str {
        match geography {
            Geography::Community => &self.community,
            Geography::Neighborhood => &self.neighborhood,
            Geography::City => &self.city,
            Geography::State => &self.state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub label: String,
    pub percent: Option<f64>,
    pub percent_display: String,
    #[serde(rename = "color")]
    pub tone: Tone,
    pub delta: Option<f64>,
    pub delta_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tiles {
    pub statistic: Statistic,
    pub as_of: NaiveDate,
    pub primary_label: String,
    pub primary_value: Option<f64>,
    pub year_ago_date: Option<NaiveDate>,
    pub year_ago_value: Option<f64>,
    pub year_over_year: Comparison,
    pub comparisons: Vec<Comparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub geography: Geography,
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<f64>>,
    pub mode: String,
    #[serde(rename = "hovertemplate")]
    pub hover_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueAxis {
    pub title: String,
    #[serde(rename = "tickformat")]
    pub tick_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateAxis {
    pub title: String,
    #[serde(rename = "tickformat")]
    pub tick_format: String,
    pub dtick: String,
    pub range: (NaiveDate, Option<NaiveDate>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub yaxis: ValueAxis,
    pub xaxis: DateAxis,
    pub margin: Margin,
    pub height: u32,
    pub legend_title_text: String,
    #[serde(rename = "hovermode")]
    pub hover_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescription {
    pub data: Vec<ChartSeries>,
    pub layout: ChartLayout,
}
