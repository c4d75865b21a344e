//! Action taxonomy: raw Legistar action names to OCD action types.
//!
//! Each entry also carries an order bucket used to break ties between
//! actions recorded on the same day:
//!
//! - 0: introduction
//! - 1: committee stage
//! - 2: floor / passage
//! - 3: executive
//! - 4: terminal (repeal)
//!
//! A name that is missing from the table is an error. When upstream adds a
//! new action, the table has to be extended by hand.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, IngestError};

pub const MAX_ORDER: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRule {
    pub classification: Option<String>,
    pub order: u8,
}

#[derive(Debug, Clone)]
pub struct Taxonomy {
    rules: HashMap<String, ActionRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaxonomyFile {
    actions: BTreeMap<String, ActionRule>,
}

const BUILTIN: &[(&str, Option<&str>, u8)] = &[
    ("discussed", None, 1),
    ("presented", None, 1),
    ("Direct Introduction", Some("introduction"), 0),
    ("Introduced (Agreed Calendar)", Some("introduction"), 0),
    ("Rules Suspended - Immediate Consideration", Some("introduction"), 0),
    ("approved and referred", Some("referral-committee"), 1),
    ("referred", Some("referral-committee"), 1),
    ("Re-Referred", Some("referral-committee"), 1),
    ("Substituted in Committee", Some("substitution"), 1),
    ("Amended in Committee", Some("amendment-passage"), 1),
    ("withdrawn", Some("withdrawal"), 1),
    ("Remove Co-Sponsor(s)", None, 1),
    ("Add Co-Sponsor(s)", None, 1),
    ("Recommended for Re-Referral", None, 1),
    ("Committee Discharged", Some("committee-passage"), 1),
    ("Held in Committee", Some("committee-failure"), 1),
    ("Recommended Do Not Pass", Some("committee-passage-unfavorable"), 1),
    ("recommended for approval", Some("committee-passage-favorable"), 1),
    ("received and referred", Some("committee-passage-favorable"), 1),
    ("Deferred and Published", None, 2),
    ("Amended in City Council", Some("amendment-passage"), 2),
    ("Failed to Pass", Some("failure"), 2),
    ("approved as amended", Some("passage"), 2),
    ("Adopted", Some("passage"), 2),
    ("approved", Some("passage"), 2),
    ("Passed", Some("passage"), 2),
    ("Approved as Amended", Some("passage"), 2),
    ("Passed as Substitute", Some("passage"), 2),
    ("Adopted as Substitute", None, 2),
    ("read into the record", Some("filing"), 2),
    ("received and filed", Some("filing"), 2),
    ("continued", Some("deferral"), 2),
    ("tabled", Some("deferral"), 2),
    ("Vetoed", Some("failure"), 2),
    ("Published in Special Pamphlet", None, 3),
    ("Signed by Mayor", Some("executive-signature"), 3),
    ("Repealed", None, 4),
];

impl Taxonomy {
    /// The table maintained for the CMAP Legistar instance.
    pub fn builtin() -> Self {
        let rules = BUILTIN
            .iter()
            .map(|(name, classification, order)| {
                (
                    name.to_string(),
                    ActionRule {
                        classification: classification.map(str::to_string),
                        order: *order,
                    },
                )
            })
            .collect();
        Self { rules }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: TaxonomyFile = serde_yaml::from_str(raw)?;
        for (action, rule) in &file.actions {
            if rule.order > MAX_ORDER {
                return Err(ConfigError::OrderOutOfRange {
                    action: action.clone(),
                    order: rule.order,
                });
            }
        }
        Ok(Self {
            rules: file.actions.into_iter().collect(),
        })
    }

    /// Serialises the table in the format `from_yaml_str` reads, sorted by name.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        let file = TaxonomyFile {
            actions: self
                .rules
                .iter()
                .map(|(name, rule)| (name.clone(), rule.clone()))
                .collect(),
        };
        serde_yaml::to_string(&file)
    }

    pub fn lookup(&self, action: &str) -> Result<&ActionRule, IngestError> {
        self.rules
            .get(action)
            .ok_or_else(|| IngestError::UnmappedAction {
                action: action.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
