//! OAuth 1.0a user-context request signing (HMAC-SHA1).
//!
//! The create-post endpoint only accepts user-context auth: every request
//! carries an `Authorization: OAuth ...` header whose signature covers the
//! method, the URL, and the protocol parameters. With a JSON body there are
//! no body parameters to sign — only the `oauth_*` set (plus query
//! parameters, of which the endpoint has none).

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// The four opaque credential strings. Capability tokens; nothing here or
/// downstream ever logs them.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Build the `Authorization` header value for one request, with a fresh nonce
/// and the current epoch timestamp.
pub fn authorization_header(method: &str, url: &str, creds: &Credentials) -> String {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    header_with(method, url, creds, &nonce, timestamp, &BTreeMap::new())
}

/// Deterministic variant: caller supplies nonce/timestamp and any extra
/// request parameters that participate in the signature (form bodies, query).
fn header_with(
    method: &str,
    url: &str,
    creds: &Credentials,
    nonce: &str,
    timestamp: u64,
    extra_params: &BTreeMap<String, String>,
) -> String {
    let mut oauth_params = BTreeMap::new();
    oauth_params.insert("oauth_consumer_key".to_string(), creds.consumer_key.clone());
    oauth_params.insert("oauth_nonce".to_string(), nonce.to_string());
    oauth_params.insert(
        "oauth_signature_method".to_string(),
        SIGNATURE_METHOD.to_string(),
    );
    oauth_params.insert("oauth_timestamp".to_string(), timestamp.to_string());
    oauth_params.insert("oauth_token".to_string(), creds.access_token.clone());
    oauth_params.insert("oauth_version".to_string(), OAUTH_VERSION.to_string());

    let mut all_params = oauth_params.clone();
    all_params.extend(extra_params.clone());

    let base = signature_base_string(method, url, &all_params);
    let signature = hmac_sha1_signature(&base, &creds.consumer_secret, &creds.access_token_secret);
    oauth_params.insert("oauth_signature".to_string(), signature);

    let fields: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", enc(k), enc(v)))
        .collect();
    format!("OAuth {}", fields.join(", "))
}

/// `METHOD&enc(url)&enc(sorted k=v pairs)` per RFC 5849 §3.4.1.
fn signature_base_string(method: &str, url: &str, params: &BTreeMap<String, String>) -> String {
    // BTreeMap iteration is already sorted by key; for these parameter names
    // percent-encoding never reorders them.
    let param_string: String = params
        .iter()
        .map(|(k, v)| format!("{}={}", enc(k), enc(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        enc(url),
        enc(&param_string)
    )
}

/// Sign the base string with `enc(consumer_secret)&enc(token_secret)`.
fn hmac_sha1_signature(base: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!("{}&{}", enc(consumer_secret), enc(token_secret));
    let mut mac =
        Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("hmac accepts any key length");
    mac.update(base.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// RFC 3986 percent-encoding: unreserved characters (`A-Z a-z 0-9 - . _ ~`)
/// pass through, everything else becomes `%XX` with uppercase hex.
fn enc(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}
