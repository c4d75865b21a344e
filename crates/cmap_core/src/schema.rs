use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceLink {
    pub url: String,
    pub note: Option<String>, // "web" or "api"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OrganizationRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LegislativeSession {
    pub identifier: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Jurisdiction {
    pub name: String,
    pub division_id: String,
    pub classification: String,
    pub url: String,
    pub legislative_sessions: Vec<LegislativeSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelatedEntity {
    pub name: String,
    pub entity_type: String,
    pub entity_id: String, // pseudo id, e.g. ~{"name": "Transportation Committee"}
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BillAction {
    pub description: String,
    pub date: String, // YYYY-MM-DD, jurisdiction-local
    pub organization: OrganizationRef,
    pub classification: Option<String>,
    pub related_entities: Vec<RelatedEntity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Organization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Sponsorship {
    pub name: String,
    pub entity_type: EntityType,
    pub primary: bool,
    pub classification: String, // "Primary" or "Regular"
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocumentLink {
    pub note: String,
    pub url: String,
    pub media_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VersionLink {
    pub note: String,
    pub url: String,
    pub media_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    Replaces,
    ReplacedBy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelatedBill {
    pub identifier: String,
    pub legislative_session: String,
    pub relation_type: RelationType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BillExtras {
    pub local_classification: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Bill {
    pub identifier: String,
    pub legislative_session: String,
    pub title: String,
    pub classification: Option<String>,
    pub from_organization: OrganizationRef,
    pub actions: Vec<BillAction>,
    pub sponsorships: Vec<Sponsorship>,
    pub subjects: Vec<String>,
    pub documents: Vec<DocumentLink>,
    pub versions: Vec<VersionLink>,
    pub related_bills: Vec<RelatedBill>,
    pub sources: Vec<SourceLink>,
    pub extras: BillExtras,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteResult {
    Pass,
    Fail,
}

impl VoteResult {
    pub fn from_passed(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ballot {
    pub option: String, // "yes", "no", "excused", "absent", or passed through
    pub voter_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VoteCount {
    pub option: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VoteEvent {
    pub id: String, // "<session>/<bill identifier>/<action index>"
    pub legislative_session: String,
    pub motion_text: String,
    pub organization: OrganizationRef,
    pub classification: Option<String>,
    pub start_date: String,
    pub result: VoteResult,
    pub bill_identifier: String,
    pub bill_action: String,
    pub votes: Vec<Ballot>,
    pub counts: Vec<VoteCount>,
    pub sources: Vec<SourceLink>,
}

/// Per-option totals in order of first appearance.
pub fn count_ballots(ballots: &[Ballot]) -> Vec<VoteCount> {
    let mut counts: Vec<VoteCount> = Vec::new();
    for ballot in ballots {
        match counts.iter_mut().find(|count| count.option == ballot.option) {
            Some(count) => count.value += 1,
            None => counts.push(VoteCount {
                option: ballot.option.clone(),
                value: 1,
            }),
        }
    }
    counts
}

/// Session identifier from the two-digit year prefix of a bill identifier:
/// "23-1234" belongs to "2023".
pub fn legislative_session(identifier: &str) -> String {
    let prefix = identifier.split('-').next().unwrap_or(identifier);
    format!("20{prefix}")
}
