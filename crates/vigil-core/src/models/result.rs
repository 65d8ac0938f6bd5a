use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::schema::{CompositeMode, SummaryMode};

/// A band chosen for a value. An empty label means "no data" or "no band
/// matched"; renderers show nothing for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResolvedBand {
    pub label: String,
    pub level: Option<String>,
}

impl ResolvedBand {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }
}

/// Score for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentResult {
    pub instrument_id: String,
    pub title: String,
    /// Type tag as written in the schema (canonicalized when known).
    pub kind: String,
    /// Owning sub-group key for instruments nested in a group.
    pub group: Option<String>,
    pub total: f64,
    pub max: Option<f64>,
    /// Whole-number percent of `max`, present when `max` is positive.
    pub percent: Option<f64>,
    pub answered: u32,
    pub band: ResolvedBand,
    pub detail: ResultDetail,
}

impl InstrumentResult {
    pub fn is_unsupported(&self) -> bool {
        matches!(self.detail, ResultDetail::Unsupported { .. })
    }
}

/// Type-specific extras carried alongside the common score fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum ResultDetail {
    Plain,
    YesNo {
        flags: Vec<RaisedFlag>,
    },
    Medication {
        checked_count: u32,
        classes: Vec<ClassTotal>,
    },
    Demographic {
        age: Option<f64>,
        bmi: Option<f64>,
        bmi_band: ResolvedBand,
    },
    Bmi {
        bmi: Option<f64>,
    },
    Unsupported {
        note: String,
    },
}

/// A qualitative tier raised by a specific yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RaisedFlag {
    pub item_key: String,
    pub label: String,
    pub tier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClassTotal {
    pub class_key: String,
    pub title: String,
    pub checked_count: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySummary {
    pub mode: SummaryMode,
    /// The summarized value: the sum in `sum` mode, the percent in
    /// `percent` mode.
    pub value: f64,
    pub total: f64,
    pub max: Option<f64>,
    pub percent: Option<f64>,
    pub band: ResolvedBand,
    /// Number of source results that contributed.
    pub sources: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryResult {
    pub category_id: String,
    pub title: String,
    pub instruments: Vec<InstrumentResult>,
    pub summary: Option<CategorySummary>,
}

impl CategoryResult {
    pub fn instrument(&self, id: &str) -> Option<&InstrumentResult> {
        self.instruments.iter().find(|r| r.instrument_id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OverallResult {
    /// Aggregation mode used; `None` when the questionnaire declares none.
    pub mode: Option<CompositeMode>,
    pub total: f64,
    pub max: Option<f64>,
    pub percent: Option<f64>,
    pub band: ResolvedBand,
}

impl OverallResult {
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// The full result tree of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Evaluation {
    pub categories: Vec<CategoryResult>,
    pub overall: OverallResult,
}

impl Evaluation {
    pub fn category(&self, id: &str) -> Option<&CategoryResult> {
        self.categories.iter().find(|c| c.category_id == id)
    }

    pub fn instrument(&self, id: &str) -> Option<&InstrumentResult> {
        self.categories.iter().find_map(|c| c.instrument(id))
    }
}
