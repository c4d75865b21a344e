use thiserror::Error;

use crate::raw::{
    Matter, RawAttachment, RawHistoryEvent, RawRelation, RawSponsor, RawText, RawTopic, RawVote,
};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("all {attempts} attempts failed for {url}: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        url: String,
        last_error: String,
    },
}

/// Read-only access to a legislative-management API.
///
/// Every call blocks until the upstream answers. Rate limiting and retries
/// are the implementation's business.
pub trait LegislativeSource {
    /// All matters, or those modified after `since` (`YYYY-MM-DD`).
    fn matters(&self, since: Option<&str>) -> Result<Vec<Matter>, SourceError>;

    fn matter(&self, matter_id: i64) -> Result<Matter, SourceError>;

    fn history(&self, matter_id: i64) -> Result<Vec<RawHistoryEvent>, SourceError>;

    /// Per-member ballots recorded against a history row.
    fn votes(&self, history_id: i64) -> Result<Vec<RawVote>, SourceError>;

    fn sponsors(&self, matter_id: i64) -> Result<Vec<RawSponsor>, SourceError>;

    fn topics(&self, matter_id: i64) -> Result<Vec<RawTopic>, SourceError>;

    fn attachments(&self, matter_id: i64) -> Result<Vec<RawAttachment>, SourceError>;

    fn relations(&self, matter_id: i64) -> Result<Vec<RawRelation>, SourceError>;

    /// Full texts of every version small enough to download.
    fn texts(&self, matter_id: i64) -> Result<Vec<RawText>, SourceError>;

    fn web_url(&self, matter: &Matter) -> String;

    fn api_url(&self, matter_id: i64) -> String;
}
