//! Message composition: pick a template from the record's completeness and
//! render the post text.

use crate::DailyRecord;

/// Platform ceiling for one post. The fixed templates land well under it;
/// a test pins that down.
pub const MAX_POST_LEN: usize = 280;

const FRIENDLY_DATE_FORMAT: &str = "%A, %B %d, %Y";

/// Render the status message for one record.
///
/// Template selection is a pure function of which optional fields are
/// meaningful:
/// - testing total present and greater than the case count → full template
///   with the case/test percentage
/// - otherwise → partial template; the hospitalization clause is dropped
///   entirely for sources that never report it
pub fn compose(display_name: &str, record: &DailyRecord) -> String {
    let date = record.as_of.format(FRIENDLY_DATE_FORMAT);
    let cases = record.new_cases;
    let deaths = record.clamped_deaths();

    match record.new_tests {
        Some(tests) if tests > cases => {
            let pct = if tests != 0 {
                cases as f64 / tests as f64 * 100.0
            } else {
                0.0
            };
            // Feeds that report testing totals report hospitalizations too.
            let hosp = record.new_hospitalizations.unwrap_or(0);
            format!(
                "{display_name} COVID-19 numbers for {date}: {cases} new positive case(s) \
                 out of {tests} test(s) ({pct:.1}%); {hosp} new hospitalization(s); \
                 {deaths} new death(s). #coronavirus #covid19"
            )
        }
        _ => match record.new_hospitalizations {
            Some(hosp) => format!(
                "{display_name} COVID-19 numbers for {date}: {cases} new positive case(s); \
                 {hosp} new hospitalization(s); {deaths} new death(s). \
                 #coronavirus #covid19"
            ),
            None => format!(
                "{display_name} COVID-19 numbers for {date}: {cases} new positive case(s); \
                 {deaths} new death(s). #coronavirus #covid19"
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> DailyRecord {
        DailyRecord {
            as_of: NaiveDate::from_ymd_opt(2020, 5, 19).unwrap(),
            new_cases: 120,
            new_deaths: -2,
            new_hospitalizations: Some(15),
            new_tests: Some(900),
        }
    }

    #[test]
    fn full_template_end_to_end() {
        let msg = compose("NY", &record());
        assert_eq!(
            msg,
            "NY COVID-19 numbers for Tuesday, May 19, 2020: 120 new positive case(s) \
             out of 900 test(s) (13.3%); 15 new hospitalization(s); 0 new death(s). \
             #coronavirus #covid19"
        );
    }

    #[test]
    fn percentage_is_one_decimal() {
        let rec = DailyRecord {
            new_cases: 10,
            new_tests: Some(100),
            ..record()
        };
        assert!(compose("NY", &rec).contains("(10.0%)"));
    }

    #[test]
    fn zero_tests_never_divides() {
        // tests == 0 can't exceed a positive case count, so this only
        // matters for a zero-case day; it must render 0.0, not NaN.
        let rec = DailyRecord {
            new_cases: -1,
            new_tests: Some(0),
            ..record()
        };
        let msg = compose("NY", &rec);
        assert!(msg.contains("(0.0%)"), "{msg}");
    }

    #[test]
    fn tests_not_exceeding_cases_selects_partial() {
        let rec = DailyRecord {
            new_cases: 5,
            new_tests: Some(5),
            ..record()
        };
        let msg = compose("NY", &rec);
        assert!(!msg.contains("test(s)"), "{msg}");
        assert!(msg.contains("5 new positive case(s); 15 new hospitalization(s)"));
    }

    #[test]
    fn absent_tests_selects_partial() {
        let rec = DailyRecord {
            new_tests: None,
            ..record()
        };
        assert!(!compose("NY", &rec).contains("test(s)"));
    }

    #[test]
    fn absent_hospitalizations_drops_the_clause() {
        let rec = DailyRecord {
            new_hospitalizations: None,
            new_tests: None,
            new_deaths: 3,
            ..record()
        };
        let msg = compose("Washington", &rec);
        assert_eq!(
            msg,
            "Washington COVID-19 numbers for Tuesday, May 19, 2020: \
             120 new positive case(s); 3 new death(s). #coronavirus #covid19"
        );
    }

    #[test]
    fn negative_deaths_render_as_zero() {
        let msg = compose("NY", &record());
        assert!(msg.contains("0 new death(s)"));
    }

    #[test]
    fn friendly_date_is_weekday_month_day_year() {
        let rec = DailyRecord {
            as_of: NaiveDate::from_ymd_opt(2020, 7, 4).unwrap(),
            ..record()
        };
        assert!(compose("NY", &rec).contains("Saturday, July 04, 2020"));
    }

    #[test]
    fn stays_under_the_platform_ceiling() {
        // Worst plausible widths for every numeric slot.
        let rec = DailyRecord {
            as_of: NaiveDate::from_ymd_opt(2020, 9, 30).unwrap(),
            new_cases: 9_999_999,
            new_deaths: 9_999_999,
            new_hospitalizations: Some(9_999_999),
            new_tests: Some(99_999_999),
        };
        let msg = compose("Northern Mariana Islands", &rec);
        assert!(msg.len() <= MAX_POST_LEN, "{} chars", msg.len());
    }
}
