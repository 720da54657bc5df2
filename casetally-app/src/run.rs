//! The four-stage pipeline: fetch, extract, compose, publish.
//!
//! Everything here is sequential; each stage completes before the next
//! starts, and any failure aborts the rest of the run. The binary decides
//! how to report the [`Outcome`].

use anyhow::{Context, Result};
use casetally_config::{CasetallyConfig, SourceConfig};
use casetally_feed::table::TableFeed;
use casetally_feed::tracker::TrackerFeed;
use casetally_feed::{DailyRecord, compose};
use casetally_social::{Credentials, TwitterApi};

/// How one run ended. All three are normal completions.
#[derive(Debug)]
pub enum Outcome {
    Published { post_id: String, message: String },
    DryRun { message: String },
    NoData,
}

/// Execute one run against the given configuration.
pub async fn run(cfg: &CasetallyConfig) -> Result<Outcome> {
    let Some(record) = fetch_record(cfg).await? else {
        tracing::info!(
            jurisdiction = %cfg.jurisdiction.code,
            "feed has nothing new to report"
        );
        return Ok(Outcome::NoData);
    };
    tracing::debug!(?record, "extracted record");

    let message = compose(&cfg.jurisdiction.name, &record);
    tracing::info!(%message, "composed status message");

    match &cfg.publish {
        Some(publish) if publish.enabled => {
            let api = TwitterApi::new(
                &publish.endpoint,
                Credentials {
                    consumer_key: publish.consumer_key.clone(),
                    consumer_secret: publish.consumer_secret.clone(),
                    access_token: publish.access_token.clone(),
                    access_token_secret: publish.access_token_secret.clone(),
                },
            )
            .context("building publish client")?;
            let posted = api
                .post_status(&message)
                .await
                .context("publishing status")?;
            Ok(Outcome::Published {
                post_id: posted.id,
                message,
            })
        }
        _ => Ok(Outcome::DryRun { message }),
    }
}

/// Fetch + extract. `Ok(None)` is the tabular feed's nothing-to-report case.
async fn fetch_record(cfg: &CasetallyConfig) -> Result<Option<DailyRecord>> {
    match &cfg.source {
        SourceConfig::Tracker { endpoint } => {
            let feed = TrackerFeed::new(endpoint)?;
            let record = feed
                .fetch_current(&cfg.jurisdiction.code)
                .await
                .context("reading structured feed")?;
            Ok(Some(record))
        }
        SourceConfig::Table { url } => {
            let feed = TableFeed::new(url)?;
            feed.fetch_latest_delta(&cfg.jurisdiction.code)
                .await
                .context("reading tabular feed")
        }
    }
}
