//! The one-day statistics record every feed shape reduces to.

use chrono::NaiveDate;

/// One day's numbers for the tracked jurisdiction.
///
/// Constructed once per run from the freshest available data, used to build
/// exactly one status message, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    /// The calendar day the counts describe (not the feed's update time).
    pub as_of: NaiveDate,
    pub new_cases: i64,
    /// May be negative when a source retroactively corrects earlier totals;
    /// use [`DailyRecord::clamped_deaths`] for anything user-facing.
    pub new_deaths: i64,
    /// Absent for sources that never report hospitalizations.
    pub new_hospitalizations: Option<i64>,
    /// Absent for sources that never report testing totals.
    pub new_tests: Option<i64>,
}

impl DailyRecord {
    /// Death delta floored at zero. Only deaths get this treatment.
    pub fn clamped_deaths(&self) -> i64 {
        self.new_deaths.max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(new_deaths: i64) -> DailyRecord {
        DailyRecord {
            as_of: NaiveDate::from_ymd_opt(2020, 5, 19).unwrap(),
            new_cases: 10,
            new_deaths,
            new_hospitalizations: None,
            new_tests: None,
        }
    }

    #[test]
    fn negative_deaths_clamp_to_zero() {
        assert_eq!(record(-2).clamped_deaths(), 0);
    }

    #[test]
    fn non_negative_deaths_pass_through() {
        assert_eq!(record(0).clamped_deaths(), 0);
        assert_eq!(record(7).clamped_deaths(), 7);
    }
}
