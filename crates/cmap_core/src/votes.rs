use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::actions::{NormalizedAction, SortedAction};
use crate::error::IngestError;
use crate::raw::{RawHistoryEvent, RawVote};
use crate::schema::{Ballot, VoteResult};
use crate::source::LegislativeSource;

/// Ballot vocabulary: synonyms mapped onto OCD vote options, plus values
/// that are not votes at all and are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteOptions {
    pub options: BTreeMap<String, String>,
    pub disregard: Vec<String>,
}

impl Default for VoteOptions {
    fn default() -> Self {
        let options = [
            ("aye", "yes"),
            ("rising vote", "yes"),
            ("nay", "no"),
            ("recused", "excused"),
            ("not present", "absent"),
        ]
        .into_iter()
        .map(|(raw, clean)| (raw.to_string(), clean.to_string()))
        .collect();
        Self {
            options,
            disregard: vec![
                "non-voting".to_string(),
                "ex-officio".to_string(),
                "absent (nv)".to_string(),
            ],
        }
    }
}

impl VoteOptions {
    /// The OCD option for a raw ballot value, or `None` when the ballot is
    /// not counted at all.
    pub fn normalize(&self, raw: Option<&str>) -> Option<String> {
        let lowered = raw?.to_lowercase();
        if self
            .disregard
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(&lowered))
        {
            return None;
        }
        Some(self.options.get(&lowered).cloned().unwrap_or(lowered))
    }

    pub fn ballots(&self, rows: &[RawVote]) -> Vec<Ballot> {
        rows.iter()
            .filter_map(|row| {
                self.normalize(row.value_name.as_deref()).map(|option| Ballot {
                    option,
                    voter_name: row.person_name.trim().to_string(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteTally {
    pub result: Option<VoteResult>,
    pub ballots: Vec<Ballot>,
}

#[derive(Debug, Clone)]
pub struct PairedAction {
    pub action: NormalizedAction,
    pub tally: VoteTally,
}

/// The vote outcome of a history row. A row only records a vote when the
/// roll-call id, roll-call flag and passed flag are all present.
pub fn vote_result(event: &RawHistoryEvent) -> Option<VoteResult> {
    match (event.event_id, event.roll_call_flag, event.passed_flag) {
        (Some(_), Some(_), Some(passed)) => Some(VoteResult::from_passed(passed)),
        _ => None,
    }
}

pub fn is_voice_vote(motion_text: Option<&str>) -> bool {
    motion_text.is_some_and(|text| text.to_lowercase().contains("voice vote"))
}

/// Attaches a tally to every sorted action, fetching ballots for roll
/// calls. Voice votes keep their result but never their ballots.
pub fn pair_votes<S>(
    sorted: Vec<SortedAction<'_>>,
    source: &S,
    options: &VoteOptions,
    matter_id: i64,
) -> Result<Vec<PairedAction>, IngestError>
where
    S: LegislativeSource + ?Sized,
{
    let mut paired = Vec::with_capacity(sorted.len());
    for SortedAction { action, event } in sorted {
        let tally = match vote_result(event) {
            None => VoteTally::default(),
            Some(result) if is_voice_vote(event.action_text.as_deref()) => {
                info!(
                    history_id = event.history_id,
                    matter_id, "skipping ballots for voice vote"
                );
                VoteTally {
                    result: Some(result),
                    ballots: Vec::new(),
                }
            }
            Some(result) => {
                let rows = source.votes(event.history_id)?;
                VoteTally {
                    result: Some(result),
                    ballots: options.ballots(&rows),
                }
            }
        };
        paired.push(PairedAction { action, tally });
    }
    Ok(paired)
}
