use serde_json::json;

use crate::actions::{TopLevelBody, local_date, sort_actions};
use crate::error::IngestError;
use crate::linker::link_referrals;
use crate::raw::Matter;
use crate::relations::{gather_candidates, resolve_relations};
use crate::schema::{
    Bill, BillAction, BillExtras, DocumentLink, EntityType, OrganizationRef, RelatedEntity,
    SourceLink, Sponsorship, VersionLink, VoteEvent, count_ballots, legislative_session,
};
use crate::source::LegislativeSource;
use crate::taxonomy::Taxonomy;
use crate::votes::{PairedAction, VoteOptions, pair_votes};

#[derive(Debug, Clone)]
pub struct AssembledBill {
    pub bill: Bill,
    pub vote_events: Vec<VoteEvent>,
}

pub struct BillAssembler<'a, S: ?Sized> {
    source: &'a S,
    taxonomy: &'a Taxonomy,
    vote_options: &'a VoteOptions,
    top_level: &'a TopLevelBody,
}

impl<'a, S> BillAssembler<'a, S>
where
    S: LegislativeSource + ?Sized,
{
    pub fn new(
        source: &'a S,
        taxonomy: &'a Taxonomy,
        vote_options: &'a VoteOptions,
        top_level: &'a TopLevelBody,
    ) -> Self {
        Self {
            source,
            taxonomy,
            vote_options,
            top_level,
        }
    }

    pub fn assemble(&self, matter: &Matter) -> Result<AssembledBill, IngestError> {
        let identifier = matter
            .file
            .clone()
            .ok_or(IngestError::MissingField("MatterFile"))?;
        let session = legislative_session(&identifier);
        let web_url = self.source.web_url(matter);
        let api_url = self.source.api_url(matter.id);

        let history = self.source.history(matter.id)?;
        let sorted = sort_actions(&history, self.taxonomy, self.top_level)?;
        let mut paired = pair_votes(sorted, self.source, self.vote_options, matter.id)?;
        link_referrals(&mut paired, matter.body_name.as_deref(), self.top_level);

        let mut bill = Bill {
            identifier: identifier.clone(),
            legislative_session: session.clone(),
            title: matter.title.clone().unwrap_or_default(),
            classification: None,
            from_organization: OrganizationRef {
                name: self.top_level.organization.clone(),
            },
            actions: Vec::with_capacity(paired.len()),
            sponsorships: Vec::new(),
            subjects: Vec::new(),
            documents: Vec::new(),
            versions: Vec::new(),
            related_bills: Vec::new(),
            sources: vec![
                SourceLink {
                    url: web_url.clone(),
                    note: Some("web".to_string()),
                },
                SourceLink {
                    url: api_url.clone(),
                    note: Some("api".to_string()),
                },
            ],
            extras: BillExtras {
                local_classification: matter.type_name.clone(),
            },
        };

        let mut vote_events = Vec::new();
        for (index, PairedAction { action, tally }) in paired.into_iter().enumerate() {
            let date = action.date.to_string();
            let organization = OrganizationRef {
                name: action.organization.clone(),
            };

            if let Some(result) = tally.result {
                let motion_text = action
                    .motion_text
                    .clone()
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| action.description.clone());
                vote_events.push(VoteEvent {
                    id: format!("{session}/{identifier}/{index}"),
                    legislative_session: session.clone(),
                    motion_text,
                    organization: organization.clone(),
                    classification: action.classification.clone(),
                    start_date: date.clone(),
                    result,
                    bill_identifier: identifier.clone(),
                    bill_action: action.description.clone(),
                    counts: count_ballots(&tally.ballots),
                    votes: tally.ballots,
                    sources: vec![
                        SourceLink {
                            url: web_url.clone(),
                            note: None,
                        },
                        SourceLink {
                            url: format!("{api_url}/histories"),
                            note: None,
                        },
                    ],
                });
            }

            bill.actions.push(BillAction {
                description: action.description,
                date,
                organization,
                classification: action.classification,
                related_entities: action
                    .related_organization
                    .map(organization_entity)
                    .into_iter()
                    .collect(),
            });
        }

        bill.sponsorships = self.sponsorships(matter.id)?;
        bill.subjects = self
            .source
            .topics(matter.id)?
            .into_iter()
            .map(|topic| topic.name.trim().to_string())
            .collect();
        bill.documents = self
            .source
            .attachments(matter.id)?
            .into_iter()
            .filter_map(|attachment| {
                let name = attachment.name.filter(|name| !name.is_empty())?;
                Some(DocumentLink {
                    note: name,
                    url: attachment.hyperlink.unwrap_or_default(),
                    media_type: "application/pdf".to_string(),
                })
            })
            .collect();

        let relations = self.source.relations(matter.id)?;
        let candidates = gather_candidates(self.source, matter.id, &relations)?;
        let intro_date = matter.intro_date.as_deref().and_then(local_date);
        bill.related_bills = resolve_relations(matter.id, intro_date, candidates);

        bill.versions = self
            .source
            .texts(matter.id)?
            .into_iter()
            .filter_map(|text| {
                let rtf = text.rtf.filter(|rtf| !rtf.is_empty())?;
                Some(VersionLink {
                    note: text.version.unwrap_or_default(),
                    url: text.url,
                    media_type: "text/rtf".to_string(),
                    text: Some(rtf),
                })
            })
            .collect();

        Ok(AssembledBill { bill, vote_events })
    }

    /// First sponsor is primary. Names containing "Committee" are
    /// organizations, everything else a person.
    fn sponsorships(&self, matter_id: i64) -> Result<Vec<Sponsorship>, IngestError> {
        Ok(self
            .source
            .sponsors(matter_id)?
            .into_iter()
            .enumerate()
            .map(|(index, sponsor)| {
                let name = sponsor.name.trim().to_string();
                let entity_type = if name.contains("Committee") {
                    EntityType::Organization
                } else {
                    EntityType::Person
                };
                Sponsorship {
                    name,
                    entity_type,
                    primary: index == 0,
                    classification: (if index == 0 { "Primary" } else { "Regular" }).to_string(),
                }
            })
            .collect())
    }
}

fn organization_entity(name: String) -> RelatedEntity {
    RelatedEntity {
        entity_id: pseudo_id(&name),
        name,
        entity_type: "organization".to_string(),
    }
}

/// Reference resolved by name at import time, e.g. `~{"name": "Finance Committee"}`.
pub fn pseudo_id(name: &str) -> String {
    format!("~{{\"name\": {}}}", json!(name))
}
