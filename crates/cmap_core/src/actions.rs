use time::Date;
use time::macros::format_description;

use crate::error::IngestError;
use crate::raw::RawHistoryEvent;
use crate::taxonomy::Taxonomy;

/// The jurisdiction's top-level body, as Legistar names it and as the
/// emitted organization is named.
#[derive(Debug, Clone)]
pub struct TopLevelBody {
    pub body: String,
    pub organization: String,
}

impl TopLevelBody {
    pub fn canonical(&self, name: &str) -> String {
        if name == self.body {
            self.organization.clone()
        } else {
            name.to_string()
        }
    }

    pub fn is_top_level(&self, name: &str) -> bool {
        name == self.body || name == self.organization
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedAction {
    pub description: String,
    pub date: Date,
    pub motion_text: Option<String>,
    pub organization: String,
    pub classification: Option<String>,
    /// Set by the linker; not part of the action's identity.
    pub related_organization: Option<String>,
}

impl NormalizedAction {
    /// Structural equality over description, date, motion text,
    /// organization and classification. Two rows the API returns twice
    /// compare equal here.
    pub fn same_as(&self, other: &Self) -> bool {
        self.description == other.description
            && self.date == other.date
            && self.motion_text == other.motion_text
            && self.organization == other.organization
            && self.classification == other.classification
    }
}

/// A normalized action together with the history row it came from.
#[derive(Debug, Clone)]
pub struct SortedAction<'a> {
    pub action: NormalizedAction,
    pub event: &'a RawHistoryEvent,
}

/// Parses the date portion of a local ISO timestamp.
pub fn local_date(timestamp: &str) -> Option<Date> {
    let date_part = timestamp.split('T').next()?;
    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}

/// Orders a matter's history by (date, taxonomy bucket, time of day) and
/// drops rows identical to their immediate predecessor.
///
/// Every action name is looked up before anything is sorted, so an
/// unmapped action fails the whole matter.
pub fn sort_actions<'a>(
    events: &'a [RawHistoryEvent],
    taxonomy: &Taxonomy,
    top_level: &TopLevelBody,
) -> Result<Vec<SortedAction<'a>>, IngestError> {
    let mut keyed = Vec::with_capacity(events.len());
    for event in events {
        let rule = taxonomy.lookup(&event.action_name)?;
        let (date, time) = event.date_parts();
        keyed.push(((date, rule.order, time), event, rule));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut sorted: Vec<SortedAction<'a>> = Vec::with_capacity(keyed.len());
    for (_, event, rule) in keyed {
        let date = local_date(&event.action_date).ok_or_else(|| IngestError::InvalidDate {
            value: event.action_date.clone(),
            field: "MatterHistoryActionDate",
        })?;
        let action = NormalizedAction {
            description: event.action_name.clone(),
            date,
            motion_text: event.action_text.clone(),
            organization: top_level.canonical(&event.body_name),
            classification: rule.classification.clone(),
            related_organization: None,
        };
        if sorted
            .last()
            .is_some_and(|previous| previous.action.same_as(&action))
        {
            continue;
        }
        sorted.push(SortedAction { action, event });
    }
    Ok(sorted)
}
