//! vigil-instruments
//!
//! The scoring engine. Turns a questionnaire schema and a response snapshot
//! into a fresh result tree: per-instrument scores, category summaries and
//! the overall composite. Pure and synchronous; nothing is cached between
//! calls.

pub mod band;
pub mod category;
pub mod composite;
pub mod error;
pub mod instruments;
pub mod scoring;

use serde_json::Value;
use vigil_core::models::response::Responses;
use vigil_core::models::result::{Evaluation, InstrumentResult};
use vigil_core::models::schema::{Instrument, Questionnaire};

use crate::error::ScoringError;

/// Score one instrument with the evaluator for its kind.
///
/// Unsupported kinds and unreadable schema nodes produce an unsupported
/// result instead of failing, so sibling instruments are unaffected.
pub fn evaluate_instrument(instrument: &Instrument, responses: &Responses) -> InstrumentResult {
    if let Some(reason) = &instrument.defect {
        tracing::warn!(instrument = %instrument.id, %reason, "skipping unreadable instrument");
        return scoring::unsupported(instrument, format!("unreadable instrument: {reason}"));
    }

    match instruments::evaluator_for(&instrument.kind) {
        Some(evaluator) => evaluator.evaluate(instrument, responses),
        None => {
            let tag = instrument.kind.tag();
            tracing::warn!(instrument = %instrument.id, tag, "unsupported instrument type");
            let note = if tag.is_empty() {
                "instrument declares no type".to_string()
            } else {
                format!("unsupported instrument type '{tag}'")
            };
            scoring::unsupported(instrument, note)
        }
    }
}

/// Evaluate the whole questionnaire against one response snapshot.
pub fn evaluate(schema: &Questionnaire, responses: &Responses) -> Evaluation {
    let categories: Vec<_> = schema
        .categories
        .iter()
        .map(|category| category::evaluate_category(category, responses))
        .collect();
    let overall = composite::evaluate_overall(&categories, schema.composite.as_ref());
    Evaluation {
        categories,
        overall,
    }
}

/// Evaluate raw JSON inputs.
///
/// Fails only when the schema or the responses are not JSON objects;
/// malformed content inside them degrades to unsupported or unanswered.
pub fn evaluate_json(schema: &Value, responses: &Value) -> Result<Evaluation, ScoringError> {
    let schema = Questionnaire::from_value(schema)?;
    let responses = Responses::from_value(responses)?;
    Ok(evaluate(&schema, &responses))
}
