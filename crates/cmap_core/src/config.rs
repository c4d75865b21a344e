//! Pipeline configuration.
//!
//! Every field has a default matching the CMAP deployment, so an empty or
//! missing `cmap.toml` gives a working setup. A file only needs to name
//! what it changes:
//!
//! ```toml
//! taxonomy_path = "taxonomy.yaml"
//!
//! [api]
//! requests_per_minute = 0
//!
//! [votes]
//! disregard = ["non-voting", "ex-officio", "absent (nv)", "abstain"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::actions::TopLevelBody;
use crate::error::ConfigError;
use crate::schema::{Jurisdiction, LegislativeSession};
use crate::taxonomy::Taxonomy;
use crate::votes::VoteOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub api: ApiConfig,
    pub jurisdiction: JurisdictionConfig,
    pub votes: VoteOptions,
    pub storage: StorageConfig,
    /// Replaces the compiled-in action taxonomy when set.
    pub taxonomy_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub web_url: String,
    pub page_size: usize,
    /// 0 disables throttling.
    pub requests_per_minute: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    /// Upper bound for the doubled retry delay.
    pub max_backoff_ms: u64,
    /// Version texts declaring a larger Content-Length are skipped.
    pub max_text_bytes: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://webapi.legistar.com/v1/cmap".to_string(),
            web_url: "https://cmap.legistar.com".to_string(),
            page_size: 1000,
            requests_per_minute: 60,
            timeout_secs: 60,
            max_retries: 3,
            initial_backoff_ms: 2000,
            max_backoff_ms: 30_000,
            max_text_bytes: 21_052_630,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JurisdictionConfig {
    pub name: String,
    pub division_id: String,
    pub classification: String,
    pub url: String,
    /// Legistar's name for the top-level body.
    pub top_level_body: String,
    /// The name the top-level body is emitted under.
    pub top_level_organization: String,
    pub legislative_sessions: Vec<LegislativeSession>,
}

impl Default for JurisdictionConfig {
    fn default() -> Self {
        let session = |identifier: &str, start: &str, end: &str| LegislativeSession {
            identifier: identifier.to_string(),
            name: format!("{identifier} Regular Session"),
            start_date: start.to_string(),
            end_date: end.to_string(),
        };
        Self {
            name: "Chicago Metropolitan Agency for Planning".to_string(),
            division_id: "ocd-division/country:us/state:il/county:cook".to_string(),
            classification: "government".to_string(),
            url: "https://www.cmap.illinois.gov/".to_string(),
            top_level_body: "CMAP Board".to_string(),
            top_level_organization: "CMAP Board of Directors".to_string(),
            legislative_sessions: vec![
                session("2019", "2019-05-20", "2023-05-19"),
                session("2015", "2015-05-18", "2019-05-19"),
                session("2011", "2011-05-18", "2015-05-17"),
                session("2007", "2007-05-18", "2011-05-17"),
            ],
        }
    }
}

impl JurisdictionConfig {
    pub fn top_level(&self) -> TopLevelBody {
        TopLevelBody {
            body: self.top_level_body.clone(),
            organization: self.top_level_organization.clone(),
        }
    }

    pub fn to_jurisdiction(&self) -> Jurisdiction {
        Jurisdiction {
            name: self.name.clone(),
            division_id: self.division_id.clone(),
            classification: self.classification.clone(),
            url: self.url.clone(),
            legislative_sessions: self.legislative_sessions.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "cmap.db".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw)?;

        // Relative taxonomy paths are relative to the config file.
        let resolved = match (&config.taxonomy_path, path.parent()) {
            (Some(taxonomy_path), Some(dir)) if taxonomy_path.is_relative() => {
                Some(dir.join(taxonomy_path))
            }
            _ => None,
        };
        if resolved.is_some() {
            config.taxonomy_path = resolved;
        }
        Ok(config)
    }

    pub fn taxonomy(&self) -> Result<Taxonomy, ConfigError> {
        match &self.taxonomy_path {
            Some(path) => Taxonomy::load(path),
            None => Ok(Taxonomy::builtin()),
        }
    }
}
