//! Loader for the bot's configuration with YAML + environment overlays.
//!
//! One `casetally.yaml` file describes the tracked jurisdiction, the feed to
//! read, and the publishing credentials. `CASETALLY_`-prefixed environment
//! variables override file values, and `${VAR}` placeholders inside string
//! values are expanded from the environment so secrets never have to live in
//! the file itself.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

const DEFAULT_TRACKER_ENDPOINT: &str = "https://covidtracking.com/api/v1";

const DEFAULT_PUBLISH_ENDPOINT: &str = "https://api.twitter.com";

/// Top-level configuration for one run.
#[derive(Debug, Deserialize)]
pub struct CasetallyConfig {
    pub jurisdiction: Jurisdiction,
    pub source: SourceConfig,
    /// Absent entirely for dry-run-only setups; no placeholder secrets needed.
    #[serde(default)]
    pub publish: Option<PublishConfig>,
}

impl CasetallyConfig {
    /// True when a real post should be attempted this run.
    pub fn publish_enabled(&self) -> bool {
        self.publish.as_ref().is_some_and(|p| p.enabled)
    }
}

/// The region whose numbers are tracked.
#[derive(Debug, Deserialize)]
pub struct Jurisdiction {
    /// Identifier used to select feed records (state abbreviation for the
    /// tracker API, exact state-column value for tabular feeds).
    pub code: String,
    /// Display name used in the composed message.
    pub name: String,
}

/// The tag is `kind`; each variant carries its own endpoint details.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Per-state JSON object of current values (COVID Tracking Project shape).
    Tracker {
        #[serde(default = "default_tracker_endpoint")]
        endpoint: String,
    },
    /// Delimited rows with cumulative counts, oldest to newest (NYT shape).
    Table { url: String },
}

fn default_tracker_endpoint() -> String {
    DEFAULT_TRACKER_ENDPOINT.into()
}

/// Credentials and the switch between dry-run and a real post.
///
/// The four credential strings are opaque capability tokens; nothing in the
/// workspace logs them.
#[derive(Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub enabled: bool,
    /// API base; overridable so tests can point at a local server.
    #[serde(default = "default_publish_endpoint")]
    pub endpoint: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

fn default_publish_endpoint() -> String {
    DEFAULT_PUBLISH_ENDPOINT.into()
}

// Manual Debug so a dumped config never carries credential material.
impl std::fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                *s = expand_env_str(std::mem::take(s));
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

// Re-expand until a fixed point so `${A}` -> `${B}` chains resolve; the depth
// cap keeps cyclic definitions from looping forever.
fn expand_env_str(mut cur: String) -> String {
    for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
        let expanded = match shellexpand::env(&cur) {
            Ok(cow) => cow.into_owned(),
            Err(_) => cur.clone(),
        };
        if expanded == cur {
            break;
        }
        cur = expanded;
    }
    cur
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct CasetallyConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for CasetallyConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CasetallyConfigLoader {
    /// Start with the defaults: `CASETALLY_` env overrides, file added later.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("CASETALLY").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use casetally_config::{CasetallyConfigLoader, SourceConfig};
    ///
    /// let cfg = CasetallyConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// jurisdiction:
    ///   code: "NY"
    ///   name: "NY"
    /// source:
    ///   kind: "tracker"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.jurisdiction.code, "NY");
    /// assert!(matches!(cfg.source, SourceConfig::Tracker { .. }));
    /// assert!(!cfg.publish_enabled());
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources, expanding
    /// `${VAR}` placeholders before materialising the typed config.
    pub fn load(self) -> Result<CasetallyConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: CasetallyConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
