//! Structured JSON feed: per-state "current values" object in the COVID
//! Tracking Project shape.
//!
//! The feed reports increases directly, so no diffing is needed here. Its
//! `lastUpdateEt` timestamp is an update time, not a reporting day — the
//! as-of date is that timestamp shifted back one calendar day.

use casetally_http::{HttpClient, RequestOpts};
use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;

use crate::{DailyRecord, FeedError};

const UPDATE_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// The subset of the per-state object we consume. Every field is optional at
/// the wire level so a missing key surfaces as [`FeedError::MissingField`]
/// naming the key, not as an opaque decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentValues {
    #[serde(default)]
    positive_increase: Option<i64>,
    #[serde(default)]
    death_increase: Option<i64>,
    #[serde(default)]
    hospitalized_increase: Option<i64>,
    #[serde(default)]
    total_test_results_increase: Option<i64>,
    #[serde(default)]
    last_update_et: Option<String>,
}

/// Client for the structured feed.
pub struct TrackerFeed {
    http: HttpClient,
}

impl TrackerFeed {
    pub fn new(endpoint: &str) -> Result<Self, FeedError> {
        // Url::join drops the last path segment without a trailing slash.
        let endpoint = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{endpoint}/")
        };
        Ok(Self {
            http: HttpClient::new(&endpoint)?,
        })
    }

    /// One GET for the jurisdiction's current-values object, reduced to a
    /// [`DailyRecord`].
    pub async fn fetch_current(&self, code: &str) -> Result<DailyRecord, FeedError> {
        let path = format!("states/{}/current.json", code.to_ascii_lowercase());
        let body = self.http.get_text(&path, RequestOpts::default()).await?;
        if body.trim().is_empty() {
            return Err(FeedError::EmptyResponse);
        }
        let values: CurrentValues =
            serde_json::from_str(&body).map_err(|_| FeedError::EmptyResponse)?;
        tracing::debug!(?values, "tracker.response");
        extract_record(values)
    }
}

/// Reduce the wire object to a record, requiring every documented key.
pub fn extract_record(values: CurrentValues) -> Result<DailyRecord, FeedError> {
    let last_update = values
        .last_update_et
        .ok_or(FeedError::MissingField("lastUpdateEt"))?;
    let updated = NaiveDateTime::parse_from_str(&last_update, UPDATE_TIMESTAMP_FORMAT).map_err(
        |_| FeedError::BadDate {
            value: last_update,
            format: UPDATE_TIMESTAMP_FORMAT,
        },
    )?;
    let as_of = (updated - Duration::days(1)).date();

    let new_cases = values
        .positive_increase
        .ok_or(FeedError::MissingField("positiveIncrease"))?;
    let new_deaths = values
        .death_increase
        .ok_or(FeedError::MissingField("deathIncrease"))?;
    let new_hospitalizations = values
        .hospitalized_increase
        .ok_or(FeedError::MissingField("hospitalizedIncrease"))?;
    let new_tests = values
        .total_test_results_increase
        .ok_or(FeedError::MissingField("totalTestResultsIncrease"))?;

    Ok(DailyRecord {
        as_of,
        new_cases,
        new_deaths,
        new_hospitalizations: Some(new_hospitalizations),
        new_tests: Some(new_tests),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn full_values() -> CurrentValues {
        CurrentValues {
            positive_increase: Some(120),
            death_increase: Some(-2),
            hospitalized_increase: Some(15),
            total_test_results_increase: Some(900),
            last_update_et: Some("05/20/2020 09:00".into()),
        }
    }

    #[test]
    fn as_of_is_update_timestamp_minus_one_day() {
        let record = extract_record(full_values()).unwrap();
        assert_eq!(record.as_of, NaiveDate::from_ymd_opt(2020, 5, 19).unwrap());
    }

    #[test]
    fn all_counts_carry_over() {
        let record = extract_record(full_values()).unwrap();
        assert_eq!(record.new_cases, 120);
        assert_eq!(record.new_deaths, -2);
        assert_eq!(record.new_hospitalizations, Some(15));
        assert_eq!(record.new_tests, Some(900));
    }

    #[test]
    fn missing_key_is_named_in_the_error() {
        let values = CurrentValues {
            positive_increase: None,
            ..full_values()
        };
        match extract_record(values) {
            Err(FeedError::MissingField(field)) => assert_eq!(field, "positiveIncrease"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_timestamp_is_a_bad_date() {
        let values = CurrentValues {
            last_update_et: Some("2020-05-20T09:00".into()),
            ..full_values()
        };
        assert!(matches!(
            extract_record(values),
            Err(FeedError::BadDate { .. })
        ));
    }

    #[test]
    fn midnight_timestamp_shifts_a_full_day() {
        let values = CurrentValues {
            last_update_et: Some("05/01/2020 00:10".into()),
            ..full_values()
        };
        let record = extract_record(values).unwrap();
        assert_eq!(record.as_of, NaiveDate::from_ymd_opt(2020, 4, 30).unwrap());
    }

    #[test]
    fn wire_names_deserialize() {
        let values: CurrentValues = serde_json::from_str(
            r#"{"positiveIncrease":1,"deathIncrease":2,"hospitalizedIncrease":3,
                "totalTestResultsIncrease":4,"lastUpdateEt":"05/20/2020 14:30",
                "unrelatedKey":true}"#,
        )
        .unwrap();
        let record = extract_record(values).unwrap();
        assert_eq!(record.new_cases, 1);
        assert_eq!(record.as_of, NaiveDate::from_ymd_opt(2020, 5, 19).unwrap());
    }
}
