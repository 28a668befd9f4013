use chrono::{Months, NaiveDate};
use tracing::{debug, warn};

use crate::dataset::CombinedDataset;

/// Start date used by `ALL`, independent of the data's latest date.
pub const ANCHOR_START: NaiveDate = match NaiveDate::from_ymd_opt(2024, 8, 1) {
    Some(date) => date,
    None => panic!("invalid anchor date"),
};

/// Start date used when a range token is not recognized.
pub const DEFAULT_START: NaiveDate = ANCHOR_START;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
    All,
}

impl RangeToken {
    pub const ALL_TOKENS: [RangeToken; 5] = [
        RangeToken::ThreeMonths,
        RangeToken::SixMonths,
        RangeToken::OneYear,
        RangeToken::ThreeYears,
        RangeToken::All,
    ];

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "3M" => Some(RangeToken::ThreeMonths),
            "6M" => Some(RangeToken::SixMonths),
            "1Y" => Some(RangeToken::OneYear),
            "3Y" => Some(RangeToken::ThreeYears),
            "ALL" => Some(RangeToken::All),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RangeToken::ThreeMonths => "3M",
            RangeToken::SixMonths => "6M",
            RangeToken::OneYear => "1Y",
            RangeToken::ThreeYears => "3Y",
            RangeToken::All => "ALL",
        }
    }

    /// Inclusive start of the window ending at `today`. Month arithmetic
    /// clamps to the end of shorter months.
    pub fn start_from(self, today: NaiveDate) -> NaiveDate {
        let months = match self {
            RangeToken::All => return ANCHOR_START,
            RangeToken::ThreeMonths => 3,
            RangeToken::SixMonths => 6,
            RangeToken::OneYear => 12,
            RangeToken::ThreeYears => 36,
        };
        today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN)
    }
}

pub fn compute_range_start(dataset: &CombinedDataset, token: &str) -> NaiveDate {
    match RangeToken::parse(token) {
        Some(range) => {
            let start = range.start_from(dataset.latest_date());
            debug!(range = range.as_str(), %start, "resolved range start");
            start
        }
        None => {
            warn!(
                token,
                expected = ?RangeToken::ALL_TOKENS.map(RangeToken::as_str),
                start = %DEFAULT_START,
                "unrecognized range token; using default start"
            );
            DEFAULT_START
        }
    }
}
