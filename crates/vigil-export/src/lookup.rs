use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vigil_core::models::schema::{Item, Questionnaire};

use crate::error::ExportError;

/// Display-only helper text keyed by an item's `lookup_key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lookup {
    entries: BTreeMap<String, String>,
}

impl Lookup {
    pub fn from_json_str(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An item whose `lookup_key` has no entry in the lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingLookup {
    pub instrument_id: String,
    pub item_key: String,
    pub lookup_key: String,
}

/// List every item (medications included) that references a missing
/// lookup key. Each one is logged as a warning; none of them affect scoring.
pub fn audit_lookup(schema: &Questionnaire, lookup: &Lookup) -> Vec<MissingLookup> {
    let mut missing = Vec::new();
    for instrument in schema.instruments() {
        let meds = instrument.classes.iter().flat_map(|c| c.meds.iter());
        for item in instrument.items.iter().chain(meds) {
            if let Some(key) = unresolved(item, lookup) {
                tracing::warn!(
                    instrument = %instrument.id,
                    item = %item.key,
                    lookup_key = %key,
                    "helper text missing for lookup key"
                );
                missing.push(MissingLookup {
                    instrument_id: instrument.id.clone(),
                    item_key: item.key.clone(),
                    lookup_key: key.to_string(),
                });
            }
        }
    }
    missing
}

fn unresolved<'a>(item: &'a Item, lookup: &Lookup) -> Option<&'a str> {
    let key = item.lookup_key.as_deref()?;
    lookup.get(key).is_none().then_some(key)
}
