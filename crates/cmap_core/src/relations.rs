use time::Date;
use tracing::warn;

use crate::actions::local_date;
use crate::error::IngestError;
use crate::raw::RawRelation;
use crate::schema::{RelatedBill, RelationType, legislative_session};
use crate::source::{LegislativeSource, SourceError};

#[derive(Debug, Clone, PartialEq)]
pub struct RelationCandidate {
    pub identifier: String,
    pub legislative_session: String,
    pub intro_date: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    NoCandidates,
    Resolved(RelationType),
    Ambiguous,
}

/// Decides one relation type for the whole candidate set.
///
/// A single later candidate replaced this matter. Several candidates that
/// all predate it were replaced by it. Everything else, including a single
/// earlier candidate, stays unresolved.
pub fn classify(candidates: &[RelationCandidate], intro_date: Date) -> Resolution {
    match candidates {
        [] => Resolution::NoCandidates,
        [only] if only.intro_date >= intro_date => Resolution::Resolved(RelationType::ReplacedBy),
        [_] => Resolution::Ambiguous,
        many if many.iter().all(|c| c.intro_date <= intro_date) => {
            Resolution::Resolved(RelationType::Replaces)
        }
        _ => Resolution::Ambiguous,
    }
}

/// Looks up every related matter, dropping those that cannot be fetched or
/// carry no usable identifier or introduction date. A related matter that
/// comes back but does not decode fails the whole matter.
pub fn gather_candidates<S>(
    source: &S,
    matter_id: i64,
    relations: &[RawRelation],
) -> Result<Vec<RelationCandidate>, IngestError>
where
    S: LegislativeSource + ?Sized,
{
    let mut candidates = Vec::with_capacity(relations.len());
    for relation in relations {
        let related = match source.matter(relation.matter_id) {
            Ok(related) => related,
            Err(err @ SourceError::Json(_)) => return Err(err.into()),
            Err(err) => {
                warn!(
                    matter_id,
                    related_matter_id = relation.matter_id,
                    error = %err,
                    "dropping relation: related matter could not be fetched"
                );
                continue;
            }
        };
        let Some(identifier) = related.file else {
            warn!(matter_id, related_matter_id = relation.matter_id, "dropping relation: no identifier");
            continue;
        };
        let Some(intro_date) = related.intro_date.as_deref().and_then(local_date) else {
            warn!(
                matter_id,
                related_matter_id = relation.matter_id,
                intro_date = ?related.intro_date,
                "dropping relation: unparseable introduction date"
            );
            continue;
        };
        candidates.push(RelationCandidate {
            legislative_session: legislative_session(&identifier),
            identifier,
            intro_date,
        });
    }
    Ok(candidates)
}

/// Related-bill links for a matter, or none when the relation is unclear.
pub fn resolve_relations(
    matter_id: i64,
    intro_date: Option<Date>,
    candidates: Vec<RelationCandidate>,
) -> Vec<RelatedBill> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let Some(intro_date) = intro_date else {
        warn!(matter_id, "unclear relation: matter has no introduction date");
        return Vec::new();
    };
    match classify(&candidates, intro_date) {
        Resolution::Resolved(relation_type) => candidates
            .into_iter()
            .map(|candidate| RelatedBill {
                identifier: candidate.identifier,
                legislative_session: candidate.legislative_session,
                relation_type,
            })
            .collect(),
        Resolution::NoCandidates => Vec::new(),
        Resolution::Ambiguous => {
            warn!(matter_id, candidates = candidates.len(), "unclear relation");
            Vec::new()
        }
    }
}
