use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{json_kind, CoreError};

/// The full authored questionnaire: categories plus an optional global
/// composite rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Questionnaire {
    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "lenient")]
    pub composite: Option<CompositeRule>,
}

impl Questionnaire {
    /// Read a questionnaire from an already-parsed JSON value.
    ///
    /// Anything other than a JSON object is rejected. Individual instrument
    /// nodes that cannot be read are kept as defective instruments instead of
    /// failing the whole load (see [`Instrument::defect`]).
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        if !value.is_object() {
            return Err(CoreError::NotAnObject {
                what: "schema",
                found: json_kind(value),
            });
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Every instrument in the questionnaire, flat and grouped, in
    /// evaluation order.
    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.categories.iter().flat_map(Category::instruments)
    }
}

/// A titled group of instruments, optionally summarized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub instruments: Vec<Instrument>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub groups: Vec<SubGroup>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<SummaryRule>,
}

impl Category {
    /// Flat instruments first, then each sub-group's instruments.
    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments
            .iter()
            .chain(self.groups.iter().flat_map(|g| g.instruments.iter()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubGroup {
    #[serde(default, deserialize_with = "or_default")]
    pub key: String,
    #[serde(default, deserialize_with = "or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub instruments: Vec<Instrument>,
}

/// The evaluation type of an instrument.
///
/// Read from the schema's `type` string. Tags this build does not know are
/// kept verbatim in [`InstrumentKind::Unsupported`] so the dispatcher can
/// report them without failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstrumentKind {
    Demographic,
    Bmi,
    YesNoList,
    Likert,
    SingleChoiceRadio,
    WeightedSelect,
    MedicationClasses,
    Unsupported(String),
}

impl InstrumentKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "demographic" | "demographics" => Self::Demographic,
            "bmi" => Self::Bmi,
            "yes-no-list" | "yes-no" | "yesno" => Self::YesNoList,
            "likert" => Self::Likert,
            "single-choice-radio" | "radio" | "radio-sum" => Self::SingleChoiceRadio,
            "weighted-select" | "select" => Self::WeightedSelect,
            "medication-classes" | "medications" => Self::MedicationClasses,
            _ => Self::Unsupported(tag.to_string()),
        }
    }

    /// Canonical tag, or the original tag for unsupported kinds.
    pub fn tag(&self) -> &str {
        match self {
            Self::Demographic => "demographic",
            Self::Bmi => "bmi",
            Self::YesNoList => "yes-no-list",
            Self::Likert => "likert",
            Self::SingleChoiceRadio => "single-choice-radio",
            Self::WeightedSelect => "weighted-select",
            Self::MedicationClasses => "medication-classes",
            Self::Unsupported(tag) => tag,
        }
    }
}

impl From<String> for InstrumentKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<InstrumentKind> for String {
    fn from(kind: InstrumentKind) -> Self {
        kind.tag().to_string()
    }
}

/// One questionnaire block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Instrument {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: InstrumentKind,
    pub items: Vec<Item>,
    pub bands: Vec<Band>,
    pub percent_bands: Vec<Band>,
    pub bmi_bands: Vec<Band>,
    pub reverse_scored: BTreeSet<String>,
    pub scale_max: Option<f64>,
    pub classes: Vec<MedicationClass>,
    /// Set when the schema node could not be read; holds the reason.
    #[serde(skip)]
    pub defect: Option<String>,
}

impl Instrument {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: InstrumentKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            items: Vec::new(),
            bands: Vec::new(),
            percent_bands: Vec::new(),
            bmi_bands: Vec::new(),
            reverse_scored: BTreeSet::new(),
            scale_max: None,
            classes: Vec::new(),
            defect: None,
        }
    }

    fn defective(id: String, title: String, kind: InstrumentKind, reason: String) -> Self {
        Self {
            defect: Some(reason),
            ..Self::new(id, title, kind)
        }
    }

    pub fn is_reverse_scored(&self, key: &str) -> bool {
        self.reverse_scored.contains(key)
    }
}

#[derive(Deserialize)]
struct InstrumentDef {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    bands: Vec<Band>,
    #[serde(default)]
    percent_bands: Vec<Band>,
    #[serde(default)]
    bmi_bands: Vec<Band>,
    #[serde(default)]
    reverse_scored: BTreeSet<String>,
    #[serde(default)]
    scale_max: Option<f64>,
    #[serde(default)]
    classes: Vec<MedicationClass>,
}

impl From<Value> for Instrument {
    fn from(value: Value) -> Self {
        let text = |field: &str| {
            value
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let id = match text("id") {
            id if id.is_empty() => text("key"),
            id => id,
        };
        let title = text("title");
        let kind = InstrumentKind::from_tag(&text("type"));

        if !value.is_object() {
            return Self::defective(
                id,
                title,
                kind,
                format!("instrument node is a {}, not an object", json_kind(&value)),
            );
        }

        match serde_json::from_value::<InstrumentDef>(value) {
            Ok(def) => Self {
                id: if def.id.is_empty() { id } else { def.id },
                title: def.title,
                kind: InstrumentKind::from_tag(&def.kind),
                items: def.items,
                bands: def.bands,
                percent_bands: def.percent_bands,
                bmi_bands: def.bmi_bands,
                reverse_scored: def.reverse_scored,
                scale_max: def.scale_max,
                classes: def.classes,
                defect: None,
            },
            Err(e) => {
                tracing::warn!(instrument = %id, error = %e, "unreadable instrument node");
                Self::defective(id, title, kind, e.to_string())
            }
        }
    }
}

/// One question within an instrument.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    #[serde(default)]
    pub label: String,
    /// Points when checked (yes/no lists), multiplier (weighted select) or
    /// per-medication weight. Defaults differ per instrument type.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Points when explicitly unchecked (yes/no lists).
    #[serde(default)]
    pub unchecked_weight: Option<f64>,
    /// Declared maximum contribution (radio instruments).
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub options: Vec<ItemOption>,
    #[serde(default)]
    pub yes_tier: Option<String>,
    #[serde(default)]
    pub no_tier: Option<String>,
    /// Helper-text cross reference; never read by scoring.
    #[serde(default)]
    pub lookup_key: Option<String>,
}

impl Item {
    /// Largest declared option value, if any options are declared.
    pub fn max_option_value(&self) -> Option<f64> {
        self.options
            .iter()
            .map(|o| o.value)
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    pub fn has_option(&self, value: f64) -> bool {
        self.options.iter().any(|o| (o.value - value).abs() < 1e-9)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOption {
    pub value: f64,
    #[serde(default)]
    pub label: String,
}

/// A medication class: a base weight shared by its medications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicationClass {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "base_risk")]
    pub weight: f64,
    #[serde(default)]
    pub meds: Vec<Item>,
}

/// An inclusive numeric range with a label. Either bound may be open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Band {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    pub label: String,
    #[serde(default)]
    pub level: Option<String>,
}

impl Band {
    pub fn new(min: Option<f64>, max: Option<f64>, label: impl Into<String>) -> Self {
        Self {
            min,
            max,
            label: label.into(),
            level: None,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SummaryMode {
    /// Sum of the source instruments' totals.
    Sum,
    /// Pooled total over pooled max across the sources, as a percent.
    Percent,
}

/// Category-level summary over some of the category's instruments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRule {
    pub mode: SummaryMode,
    /// Instrument ids. Empty means every instrument in the category.
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub bands: Vec<Band>,
    #[serde(default)]
    pub percent_bands: Vec<Band>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum CompositeMode {
    /// Pool every weighted-select instrument across all categories.
    Percent,
    /// Grand total over grand max, each category contributing its own
    /// answer space.
    WeightedAverage,
    /// Sum of every category summary's total.
    Sum,
}

/// Global rule for the overall score. Declared once per questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeRule {
    pub mode: CompositeMode,
    #[serde(default)]
    pub bands: Vec<Band>,
    #[serde(default)]
    pub percent_bands: Vec<Band>,
}

/// Read an optional rule, dropping it with a warning when it is malformed
/// so the rest of the questionnaire still loads.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match serde_json::from_value(value) {
            Ok(rule) => Ok(Some(rule)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed rule");
                Ok(None)
            }
        },
    }
}

/// A field that does not read as `T` (null, wrong type) falls back to the
/// default instead of failing the whole schema.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring malformed field");
        T::default()
    }))
}

/// A list whose unreadable entries are dropped with a warning. A missing,
/// null or non-list value reads as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let nodes = match Value::deserialize(deserializer)? {
        Value::Array(nodes) => nodes,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!(found = json_kind(&other), "expected a list, ignoring");
            return Ok(Vec::new());
        }
    };
    Ok(nodes
        .into_iter()
        .filter_map(|node| match serde_json::from_value(node) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "dropping unreadable schema node");
                None
            }
        })
        .collect())
}
