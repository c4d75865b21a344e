use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::raw::{
    Matter, RawAttachment, RawHistoryEvent, RawRelation, RawSponsor, RawText, RawTopic, RawVersion,
    RawVote,
};
use crate::source::{LegislativeSource, SourceError};

pub struct LegistarClient {
    client: Client,
    base_url: String,
    web_url: String,
    page_size: usize,
    min_interval: Option<Duration>,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
    max_text_bytes: u64,
    last_request: Cell<Option<Instant>>,
}

impl LegistarClient {
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            web_url: config.web_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
            min_interval: min_interval(config.requests_per_minute),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            max_text_bytes: config.max_text_bytes,
            last_request: Cell::new(None),
        })
    }

    fn throttle(&self) {
        if let Some(interval) = self.min_interval
            && let Some(last) = self.last_request.get()
        {
            let elapsed = last.elapsed();
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    /// GET with retries. Transport errors and 5xx responses back off and
    /// retry; a 4xx fails at once.
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response, SourceError> {
        let mut backoff = self.initial_backoff;
        let mut last_error = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(
                    url,
                    attempt,
                    max_retries = self.max_retries,
                    ?backoff,
                    "retrying request"
                );
                thread::sleep(backoff);
                backoff = next_backoff(backoff, self.max_backoff);
            }

            self.throttle();
            match self.client.get(url).query(query).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp);
                    }
                    if status.is_client_error() {
                        return Err(SourceError::Status {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }
                    last_error = format!("HTTP {status}");
                }
                Err(err) => last_error = err.to_string(),
            }
        }

        Err(SourceError::RetriesExhausted {
            attempts: self.max_retries + 1,
            url: url.to_string(),
            last_error,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        let body = self.get(&url, &[])?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Follows `$top`/`$skip` pages until a short page comes back.
    fn paginate<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: Option<String>,
    ) -> Result<Vec<T>, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        let mut items = Vec::new();
        let mut skip = 0;
        loop {
            let mut query = vec![("$top", self.page_size.to_string()), ("$skip", skip.to_string())];
            if let Some(filter) = &filter {
                query.push(("$filter", filter.clone()));
            }
            let body = self.get(&url, &query)?.text()?;
            let page: Vec<T> = serde_json::from_str(&body)?;
            let len = page.len();
            items.extend(page);
            if len < self.page_size {
                break;
            }
            skip += len;
        }
        Ok(items)
    }
}

fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

fn min_interval(requests_per_minute: u32) -> Option<Duration> {
    (requests_per_minute > 0).then(|| Duration::from_secs(60) / requests_per_minute)
}

impl LegislativeSource for LegistarClient {
    fn matters(&self, since: Option<&str>) -> Result<Vec<Matter>, SourceError> {
        let filter = since.map(|since| format!("MatterLastModifiedUtc gt datetime'{since}'"));
        let matters: Vec<Matter> = self.paginate("/matters", filter)?;
        info!(count = matters.len(), since = ?since, "listed matters");
        Ok(matters)
    }

    fn matter(&self, matter_id: i64) -> Result<Matter, SourceError> {
        self.get_json(&format!("/matters/{matter_id}"))
    }

    fn history(&self, matter_id: i64) -> Result<Vec<RawHistoryEvent>, SourceError> {
        self.get_json(&format!("/matters/{matter_id}/histories"))
    }

    fn votes(&self, history_id: i64) -> Result<Vec<RawVote>, SourceError> {
        self.get_json(&format!("/eventitems/{history_id}/votes"))
    }

    fn sponsors(&self, matter_id: i64) -> Result<Vec<RawSponsor>, SourceError> {
        self.get_json(&format!("/matters/{matter_id}/sponsors"))
    }

    fn topics(&self, matter_id: i64) -> Result<Vec<RawTopic>, SourceError> {
        self.get_json(&format!("/matters/{matter_id}/indexes"))
    }

    fn attachments(&self, matter_id: i64) -> Result<Vec<RawAttachment>, SourceError> {
        self.get_json(&format!("/matters/{matter_id}/attachments"))
    }

    fn relations(&self, matter_id: i64) -> Result<Vec<RawRelation>, SourceError> {
        self.get_json(&format!("/matters/{matter_id}/relations"))
    }

    fn texts(&self, matter_id: i64) -> Result<Vec<RawText>, SourceError> {
        let versions: Vec<RawVersion> = self.get_json(&format!("/matters/{matter_id}/versions"))?;
        let mut texts = Vec::with_capacity(versions.len());
        for version in versions {
            let url = format!("{}/matters/{matter_id}/texts/{}", self.base_url, version.key);
            let resp = self.get(&url, &[])?;
            if let Some(length) = resp.content_length()
                && length > self.max_text_bytes
            {
                warn!(matter_id, url = %url, length, "skipping oversized version text");
                continue;
            }
            let mut text: RawText = serde_json::from_str(&resp.text()?)?;
            text.url = url;
            texts.push(text);
        }
        Ok(texts)
    }

    fn web_url(&self, matter: &Matter) -> String {
        format!(
            "{}/LegislationDetail.aspx?ID={}&GUID={}",
            self.web_url,
            matter.id,
            matter.guid.as_deref().unwrap_or_default()
        )
    }

    fn api_url(&self, matter_id: i64) -> String {
        format!("{}/matters/{matter_id}", self.base_url)
    }
}
