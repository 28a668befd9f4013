use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::DatasetError;

pub const DATE_COLUMN: &str = "date";
pub const INDEXED_SUFFIX: &str = "_indexed";

/// Every numeric column is rescaled so its value on this date is 100.
pub const BASE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2021, 8, 1) {
    Some(date) => date,
    None => panic!("invalid base date"),
};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// One source row-set: a date axis plus numeric columns of equal length.
#[derive(Debug, Clone)]
pub struct ObservationSet {
    name: String,
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl ObservationSet {
    pub fn from_parts(
        name: impl Into<String>,
        dates: Vec<NaiveDate>,
        columns: Vec<Column>,
    ) -> Result<Self, DatasetError> {
        let name = name.into();

        for column in &columns {
            if column.values.len() != dates.len() {
                return Err(DatasetError::RaggedColumn {
                    dataset: name,
                    column: column.name.clone(),
                    expected: dates.len(),
                    actual: column.values.len(),
                });
            }
        }

        let mut names = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(DatasetError::DuplicateColumn {
                    dataset: name,
                    column: column.name.clone(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(dates.len());
        for date in &dates {
            if !seen.insert(*date) {
                return Err(DatasetError::DuplicateDate {
                    dataset: name,
                    date: *date,
                });
            }
        }

        Ok(Self {
            name,
            dates,
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Date-ordered merge of the community and reference data with a derived
/// `<column>_indexed` column for every raw column. Immutable once built.
#[derive(Debug, Clone)]
pub struct CombinedDataset {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
    lookup: HashMap<String, usize>,
}

impl CombinedDataset {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Never empty: construction requires the base date row.
    pub fn latest_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn latest_row(&self) -> usize {
        self.dates.len() - 1
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.lookup
            .get(name)
            .map(|&idx| self.columns[idx].values.as_slice())
    }

    pub fn value(&self, column: &str, row: usize) -> Option<f64> {
        self.column(column)
            .and_then(|values| values.get(row).copied().flatten())
    }

    pub fn row_for(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Rows dated on or after `start`. May be empty.
    pub fn filter_from(&self, start: NaiveDate) -> DatasetSlice<'_> {
        let first_row = self.dates.partition_point(|date| *date < start);
        DatasetSlice {
            dataset: self,
            first_row,
        }
    }
}

/// A borrowed date-suffix of the combined dataset.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSlice<'a> {
    dataset: &'a CombinedDataset,
    first_row: usize,
}

impl<'a> DatasetSlice<'a> {
    pub fn len(&self) -> usize {
        self.dataset.len() - self.first_row
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dates(&self) -> &'a [NaiveDate] {
        &self.dataset.dates[self.first_row..]
    }

    pub fn column(&self, name: &str) -> Option<&'a [Option<f64>]> {
        self.dataset
            .column(name)
            .map(|values| &values[self.first_row..])
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates().last().copied()
    }
}

/// One decimal place, ties to even.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Left-joins `reference` onto `community` by date and indexes every
/// numeric column against [`BASE_DATE`].
pub fn build_combined_dataset(
    community: &ObservationSet,
    reference: &ObservationSet,
) -> Result<CombinedDataset, DatasetError> {
    for column in reference.columns() {
        if community.column(&column.name).is_some() {
            return Err(DatasetError::ColumnConflict {
                column: column.name.clone(),
            });
        }
    }

    let reference_rows: HashMap<NaiveDate, usize> = reference
        .dates()
        .iter()
        .enumerate()
        .map(|(row, date)| (*date, row))
        .collect();

    let mut order: Vec<usize> = (0..community.dates().len()).collect();
    order.sort_by_key(|&row| community.dates()[row]);
    let dates: Vec<NaiveDate> = order.iter().map(|&row| community.dates()[row]).collect();

    let matched = dates
        .iter()
        .filter(|date| reference_rows.contains_key(date))
        .count();
    debug!(
        community = community.name(),
        reference = reference.name(),
        community_rows = dates.len(),
        reference_rows = reference.dates().len(),
        matched,
        "merged row-sets on date"
    );

    let mut columns: Vec<Column> = community
        .columns()
        .iter()
        .map(|column| Column {
            name: column.name.clone(),
            values: order.iter().map(|&row| column.values[row]).collect(),
        })
        .collect();

    for column in reference.columns() {
        let values = dates
            .iter()
            .map(|date| {
                reference_rows
                    .get(date)
                    .and_then(|&row| column.values[row])
            })
            .collect();
        columns.push(Column {
            name: column.name.clone(),
            values,
        });
    }

    let base_row = locate_base_row(&dates)?;
    let raw_columns = columns.len();
    let indexed: Vec<Column> = columns
        .iter()
        .map(|column| index_column(column, base_row))
        .collect();
    columns.extend(indexed);

    let lookup = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| (column.name.clone(), idx))
        .collect();

    info!(
        rows = dates.len(),
        columns = raw_columns,
        base_date = %BASE_DATE,
        "combined dataset ready"
    );

    Ok(CombinedDataset {
        dates,
        columns,
        lookup,
    })
}

/// Dates are unique per row-set, so at most one row can match.
fn locate_base_row(dates: &[NaiveDate]) -> Result<usize, DatasetError> {
    dates
        .iter()
        .position(|date| *date == BASE_DATE)
        .ok_or(DatasetError::MissingBaseDate { date: BASE_DATE })
}

fn index_column(column: &Column, base_row: usize) -> Column {
    let name = format!("{}{}", column.name, INDEXED_SUFFIX);
    let values = match column.values[base_row] {
        Some(base) if base != 0.0 && base.is_finite() => column
            .values
            .iter()
            .map(|value| value.map(|value| round_one_decimal(value / base * 100.0)))
            .collect(),
        base => {
            warn!(
                column = %column.name,
                ?base,
                "no usable base value; indexed column left empty"
            );
            vec![None; column.values.len()]
        }
    };
    Column { name, values }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

pub fn load_observations(path: &Path) -> anyhow::Result<ObservationSet> {
    let dataset = path.display().to_string();
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {dataset}"))?;
    let headers = reader
        .headers()
        .with_context(|| format!("reading header of {dataset}"))?
        .clone();

    let date_idx = headers
        .iter()
        .position(|header| header.trim() == DATE_COLUMN)
        .ok_or_else(|| DatasetError::MissingDateColumn {
            dataset: dataset.clone(),
        })?;
    let value_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != date_idx)
        .map(|(idx, header)| (idx, header.trim().to_string()))
        .collect();

    let mut dates = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); value_columns.len()];

    for result in reader.records() {
        let record = result.with_context(|| format!("reading {dataset}"))?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date)
            .with_context(|| format!("{dataset}:{line}: invalid date '{raw_date}'"))?;
        dates.push(date);

        for (slot, (idx, name)) in value_columns.iter().enumerate() {
            let cell = record.get(*idx).unwrap_or_default().trim();
            let value = if cell.is_empty() {
                None
            } else {
                let parsed: f64 = cell.parse().with_context(|| {
                    format!("{dataset}:{line}: column '{name}' has non-numeric value '{cell}'")
                })?;
                Some(parsed).filter(|value| !value.is_nan())
            };
            values[slot].push(value);
        }
    }

    let columns = value_columns
        .into_iter()
        .zip(values)
        .map(|((_, name), values)| Column { name, values })
        .collect();
    let observations = ObservationSet::from_parts(dataset, dates, columns)?;

    info!(
        path = %path.display(),
        rows = observations.dates().len(),
        columns = observations.columns().len(),
        "loaded observations"
    );
    Ok(observations)
}

/// Writes the combined dataset with raw columns first, then indexed ones.
pub fn write_combined_csv(dataset: &CombinedDataset, path: &Path) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![DATE_COLUMN.to_string()];
    header.extend(dataset.column_names().map(str::to_string));
    writer.write_record(&header)?;

    for (row, date) in dataset.dates().iter().enumerate() {
        let mut record = vec![date.to_string()];
        for column in &dataset.columns {
            record.push(
                column.values[row]
                    .map(|value| value.to_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
