use chrono::NaiveDate;

/// Failures while assembling observation row-sets or the combined dataset.
/// All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("base date {date} is missing from the combined dataset")]
    MissingBaseDate { date: NaiveDate },
    #[error("{dataset}: date {date} appears more than once")]
    DuplicateDate { dataset: String, date: NaiveDate },
    #[error("{dataset}: column '{column}' appears more than once")]
    DuplicateColumn { dataset: String, column: String },
    #[error("column '{column}' is present in both the community and reference data")]
    ColumnConflict { column: String },
    #[error("{dataset}: no 'date' column")]
    MissingDateColumn { dataset: String },
    #[error("{dataset}: column '{column}' has {actual} values for {expected} dates")]
    RaggedColumn {
        dataset: String,
        column: String,
        expected: usize,
        actual: usize,
    },
}
