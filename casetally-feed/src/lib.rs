//! Feed retrieval and summary composition for one jurisdiction's daily
//! COVID-19 numbers.
//!
//! Two feed shapes are supported: the [`tracker`] JSON object of per-state
//! current values, and the [`table`] delimited feed of cumulative rows that we
//! diff ourselves. Both produce a [`DailyRecord`]; [`summary`] turns a record
//! into the post text.
pub mod record;
pub mod summary;
pub mod table;
pub mod tracker;

pub use record::DailyRecord;
pub use summary::compose;

use thiserror::Error;

/// Failures while fetching or extracting a day's numbers.
///
/// None of these are retried; each aborts the remainder of the run. "Fewer
/// than two matching rows" is deliberately *not* here — that is the normal
/// nothing-to-report outcome and surfaces as `Ok(None)` from the table path.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Network(#[from] casetally_http::HttpError),
    #[error("feed returned an empty or unparsable body")]
    EmptyResponse,
    #[error("feed is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("feed field `{field}` is unusable: {value:?}")]
    BadField { field: &'static str, value: String },
    #[error("feed date {value:?} does not match format {format:?}")]
    BadDate { value: String, format: &'static str },
}
