use serde::{Deserialize, Serialize};

/// Payload for `POST /2/tweets`.
#[derive(Debug, Serialize)]
pub struct CreateTweet<'a> {
    pub text: &'a str,
}

/// Response envelope for a created post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTweetResponse {
    pub data: PostedTweet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostedTweet {
    pub id: String,
    pub text: String,
}
