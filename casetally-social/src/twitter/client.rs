//! Minimal wrapper around the Twitter/X create-post API.
//!
//! Signs each request with OAuth 1.0a user context and delegates the HTTP
//! call to the shared client. One post per run, no retries.
use casetally_http::{Auth, HttpClient, RequestOpts};
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::PublishError;
use crate::twitter::oauth::{self, Credentials};
use crate::twitter::types::{CreateTweet, CreateTweetResponse, PostedTweet};

const CREATE_TWEET_PATH: &str = "2/tweets";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    creds: Credentials,
}

impl TwitterApi {
    /// Construct a client against the configured API base (the production
    /// host normally; a mock server in tests).
    pub fn new(base: &str, creds: Credentials) -> Result<Self, PublishError> {
        let http = HttpClient::new(base).map_err(PublishError::from)?;
        Ok(Self { http, creds })
    }

    /// Submit one post. The signature covers the fully resolved URL, so the
    /// URL is computed before the request is issued.
    pub async fn post_status(&self, text: &str) -> Result<PostedTweet, PublishError> {
        let url = self.http.resolve_url(CREATE_TWEET_PATH, false)?;
        let header = oauth::authorization_header("POST", url.as_str(), &self.creds);
        let value = HeaderValue::from_str(&header)
            .map_err(|e| PublishError::Network(format!("invalid Authorization header: {e}")))?;

        let resp: CreateTweetResponse = self
            .http
            .post_json(
                CREATE_TWEET_PATH,
                &CreateTweet { text },
                RequestOpts {
                    auth: Some(Auth {
                        name: AUTHORIZATION,
                        value,
                    }),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(post_id = %resp.data.id, "publish.posted");
        Ok(resp.data)
    }
}
