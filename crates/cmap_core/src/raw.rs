//! Records as returned by the Legistar web API.
//!
//! Field names follow the upstream JSON; only the fields the pipeline reads
//! are declared; serde ignores the rest.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matter {
    #[serde(rename = "MatterId")]
    pub id: i64,
    #[serde(rename = "MatterGuid", default)]
    pub guid: Option<String>,
    /// Bill identifier, e.g. "23-1234".
    #[serde(rename = "MatterFile", default)]
    pub file: Option<String>,
    #[serde(rename = "MatterTitle", default)]
    pub title: Option<String>,
    #[serde(rename = "MatterIntroDate", default)]
    pub intro_date: Option<String>,
    #[serde(rename = "MatterTypeName", default)]
    pub type_name: Option<String>,
    #[serde(rename = "MatterBodyName", default)]
    pub body_name: Option<String>,
}

/// One row of a matter's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHistoryEvent {
    #[serde(rename = "MatterHistoryId")]
    pub history_id: i64,
    /// Local ISO timestamp, `YYYY-MM-DDTHH:MM:SS`.
    #[serde(rename = "MatterHistoryActionDate")]
    pub action_date: String,
    #[serde(rename = "MatterHistoryActionName")]
    pub action_name: String,
    #[serde(rename = "MatterHistoryActionText", default)]
    pub action_text: Option<String>,
    #[serde(rename = "MatterHistoryActionBodyName")]
    pub body_name: String,
    /// Roll-call identifier.
    #[serde(rename = "MatterHistoryEventId", default)]
    pub event_id: Option<i64>,
    #[serde(rename = "MatterHistoryRollCallFlag", default, deserialize_with = "flag")]
    pub roll_call_flag: Option<bool>,
    #[serde(rename = "MatterHistoryPassedFlag", default, deserialize_with = "flag")]
    pub passed_flag: Option<bool>,
}

impl RawHistoryEvent {
    /// Splits the timestamp on `T` into its date and time-of-day parts.
    pub fn date_parts(&self) -> (&str, &str) {
        self.action_date
            .split_once('T')
            .unwrap_or((self.action_date.as_str(), ""))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVote {
    #[serde(rename = "VoteValueName", default)]
    pub value_name: Option<String>,
    #[serde(rename = "VotePersonName")]
    pub person_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSponsor {
    #[serde(rename = "MatterSponsorName")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTopic {
    #[serde(rename = "MatterIndexName")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAttachment {
    #[serde(rename = "MatterAttachmentName", default)]
    pub name: Option<String>,
    #[serde(rename = "MatterAttachmentHyperlink", default)]
    pub hyperlink: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRelation {
    #[serde(rename = "MatterRelationMatterId")]
    pub matter_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVersion {
    #[serde(rename = "Key")]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawText {
    #[serde(rename = "MatterTextVersion", default)]
    pub version: Option<String>,
    #[serde(rename = "MatterTextRtf", default)]
    pub rtf: Option<String>,
    /// Added by the client: the endpoint the text was read from.
    #[serde(default)]
    pub url: String,
}

/// Legistar flags arrive as 0/1 integers on most deployments and as
/// booleans on a few.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|value| match value {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_flags_accept_ints_bools_and_null() {
        let json = r#"[
            {"MatterHistoryId": 1, "MatterHistoryActionDate": "2023-01-05T00:00:00",
             "MatterHistoryActionName": "approved", "MatterHistoryActionText": null,
             "MatterHistoryActionBodyName": "CMAP Board", "MatterHistoryEventId": 7,
             "MatterHistoryRollCallFlag": 0, "MatterHistoryPassedFlag": 1},
            {"MatterHistoryId": 2, "MatterHistoryActionDate": "2023-01-06T00:00:00",
             "MatterHistoryActionName": "approved", "MatterHistoryActionBodyName": "CMAP Board",
             "MatterHistoryPassedFlag": false, "MatterHistoryRollCallFlag": null}
        ]"#;
        let events: Vec<RawHistoryEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events[0].roll_call_flag, Some(false));
        assert_eq!(events[0].passed_flag, Some(true));
        assert_eq!(events[1].passed_flag, Some(false));
        assert_eq!(events[1].roll_call_flag, None);
        assert_eq!(events[1].event_id, None);
        assert_eq!(events[1].action_text, None);
    }

    #[test]
    fn date_parts_split_on_t() {
        let json = r#"{"MatterHistoryId": 1, "MatterHistoryActionDate": "2023-01-05T09:30:00",
            "MatterHistoryActionName": "referred", "MatterHistoryActionBodyName": "X"}"#;
        let event: RawHistoryEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.date_parts(), ("2023-01-05", "09:30:00"));
    }

    #[test]
    fn upstream_extras_are_ignored() {
        let matter: Matter = serde_json::from_str(
            r#"{"MatterId": 5, "MatterFile": "23-0005", "MatterLastModifiedUtc": "2023-01-05T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(matter.file.as_deref(), Some("23-0005"));

        let text: RawText = serde_json::from_str(
            r#"{"MatterTextVersion": "1", "MatterTextPlain": "plain", "MatterTextRtf": null}"#,
        )
        .unwrap();
        assert_eq!(text.version.as_deref(), Some("1"));
        assert_eq!(text.rtf, None);
        assert!(text.url.is_empty());
    }
}
