//! HTTP-level feed tests against a local mock server.

use casetally_feed::table::TableFeed;
use casetally_feed::tracker::TrackerFeed;
use casetally_feed::FeedError;
use chrono::NaiveDate;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn tracker_fetch_reduces_to_a_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/states/ny/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"positiveIncrease":120,"totalTestResultsIncrease":900,
                "hospitalizedIncrease":15,"deathIncrease":-2,
                "lastUpdateEt":"05/20/2020 09:00","state":"NY"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let feed = TrackerFeed::new(&format!("{}/api/v1", server.uri())).unwrap();
    let record = feed.fetch_current("NY").await.unwrap();

    assert_eq!(record.as_of, NaiveDate::from_ymd_opt(2020, 5, 19).unwrap());
    assert_eq!(record.new_cases, 120);
    assert_eq!(record.new_tests, Some(900));
    assert_eq!(record.new_deaths, -2);
}

#[tokio::test]
async fn tracker_non_2xx_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let feed = TrackerFeed::new(&server.uri()).unwrap();
    let err = feed.fetch_current("NY").await.unwrap_err();
    assert!(matches!(err, FeedError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn tracker_empty_body_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("", "application/json"))
        .mount(&server)
        .await;

    let feed = TrackerFeed::new(&server.uri()).unwrap();
    let err = feed.fetch_current("NY").await.unwrap_err();
    assert!(matches!(err, FeedError::EmptyResponse), "{err:?}");
}

#[tokio::test]
async fn tracker_garbage_body_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"))
        .mount(&server)
        .await;

    let feed = TrackerFeed::new(&server.uri()).unwrap();
    let err = feed.fetch_current("NY").await.unwrap_err();
    assert!(matches!(err, FeedError::EmptyResponse), "{err:?}");
}

#[tokio::test]
async fn table_fetch_diffs_the_last_two_rows() {
    let server = MockServer::start().await;
    let body = "\
date,state,fips,cases,deaths
2020-05-18,Washington,53,18000,1000
2020-05-19,Washington,53,18200,1010
";
    Mock::given(method("GET"))
        .and(path("/data/us-states.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/csv"))
        .expect(1)
        .mount(&server)
        .await;

    let feed = TableFeed::new(&format!("{}/data/us-states.csv", server.uri())).unwrap();
    let record = feed
        .fetch_latest_delta("Washington")
        .await
        .unwrap()
        .expect("two rows present");

    assert_eq!(record.as_of, NaiveDate::from_ymd_opt(2020, 5, 19).unwrap());
    assert_eq!(record.new_cases, 200);
    assert_eq!(record.new_deaths, 10);
    assert_eq!(record.new_tests, None);
}

#[tokio::test]
async fn table_with_one_matching_row_yields_no_data() {
    let server = MockServer::start().await;
    let body = "date,state,fips,cases,deaths\n2020-05-19,Washington,53,18200,1010\n";
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/csv"))
        .mount(&server)
        .await;

    let feed = TableFeed::new(&format!("{}/us-states.csv", server.uri())).unwrap();
    let record = feed.fetch_latest_delta("Washington").await.unwrap();
    assert!(record.is_none());
}
