//! Tabular feed: delimited rows of cumulative counts, oldest to newest.
//!
//! Column order is fixed at `date,state,fips,cases,deaths` (the NYT
//! state-level layout). The feed carries running totals, so the day-over-day
//! numbers come from diffing the two most recent rows for the jurisdiction.
//! Matching is exact whole-field equality on the state column; substring
//! matches would confuse jurisdictions whose names contain one another.

use casetally_http::{HttpClient, RequestOpts};
use chrono::NaiveDate;

use crate::{DailyRecord, FeedError};

const ROW_DATE_FORMAT: &str = "%Y-%m-%d";

const COL_DATE: usize = 0;
const COL_STATE: usize = 1;
const COL_CASES: usize = 3;
const COL_DEATHS: usize = 4;
const MIN_COLUMNS: usize = 5;

/// One parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub state: String,
    pub cases: i64,
    pub deaths: i64,
}

/// Client for the tabular feed.
pub struct TableFeed {
    http: HttpClient,
    url: String,
}

impl TableFeed {
    pub fn new(url: &str) -> Result<Self, FeedError> {
        Ok(Self {
            http: HttpClient::new(url)?,
            url: url.to_string(),
        })
    }

    /// One GET for the whole table, reduced to the jurisdiction's latest
    /// delta. `Ok(None)` means fewer than two matching rows — nothing to
    /// report today, not a failure.
    pub async fn fetch_latest_delta(
        &self,
        jurisdiction: &str,
    ) -> Result<Option<DailyRecord>, FeedError> {
        let opts = RequestOpts {
            allow_absolute: true,
            ..Default::default()
        };
        let body = self.http.get_text(&self.url, opts).await?;
        if body.trim().is_empty() {
            return Err(FeedError::EmptyResponse);
        }
        let rows = parse_rows(&body)?;
        tracing::debug!(total_rows = rows.len(), "table.parsed");
        Ok(latest_delta(&rows, jurisdiction))
    }
}

/// Parse every data row into a typed [`TableRow`], in file order.
///
/// A leading header row (first cell `date`) is skipped; blank lines are
/// ignored; anything else malformed is a hard error naming the column.
pub fn parse_rows(body: &str) -> Result<Vec<TableRow>, FeedError> {
    let mut rows = Vec::new();
    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split(',').collect();
        if cols[COL_DATE] == "date" {
            continue;
        }
        if cols.len() < MIN_COLUMNS {
            return Err(FeedError::BadField {
                field: "row",
                value: line.to_string(),
            });
        }
        let date = NaiveDate::parse_from_str(cols[COL_DATE], ROW_DATE_FORMAT).map_err(|_| {
            FeedError::BadDate {
                value: cols[COL_DATE].to_string(),
                format: ROW_DATE_FORMAT,
            }
        })?;
        let cases = parse_count(cols[COL_CASES], "cases")?;
        let deaths = parse_count(cols[COL_DEATHS], "deaths")?;
        rows.push(TableRow {
            date,
            state: cols[COL_STATE].to_string(),
            cases,
            deaths,
        });
    }
    Ok(rows)
}

fn parse_count(raw: &str, field: &'static str) -> Result<i64, FeedError> {
    raw.trim().parse().map_err(|_| FeedError::BadField {
        field,
        value: raw.to_string(),
    })
}

/// Diff the two most recent rows matching the jurisdiction exactly.
///
/// Rows arrive oldest to newest, so "most recent" is the tail of the filtered
/// sequence. Returns `None` with fewer than two matches.
pub fn latest_delta(rows: &[TableRow], jurisdiction: &str) -> Option<DailyRecord> {
    let matching: Vec<&TableRow> = rows.iter().filter(|r| r.state == jurisdiction).collect();
    let [.., previous, latest] = matching.as_slice() else {
        return None;
    };
    Some(DailyRecord {
        as_of: latest.date,
        new_cases: latest.cases - previous.cases,
        new_deaths: latest.deaths - previous.deaths,
        // This layout never reports hospitalizations or testing totals.
        new_hospitalizations: None,
        new_tests: None,
    })
}
