use vigil_core::models::result::{InstrumentResult, ResultDetail};
use vigil_core::models::response::Responses;
use vigil_core::models::schema::Instrument;

use crate::band::resolve_answered;
use crate::instruments::Evaluator;
use crate::scoring::{percent_of, scored};

/// Likert scale: each answer in `0..=scale_max`, summed, with reverse-scored
/// items inverted first.
pub struct Likert;

impl Evaluator for Likert {
    fn evaluate(&self, instrument: &Instrument, responses: &Responses) -> InstrumentResult {
        let scale_max = scale_max(instrument);
        let mut total = 0.0;
        let mut answered = 0;

        for item in &instrument.items {
            let Some(raw) = responses
                .lookup(&instrument.id, &item.key)
                .and_then(|a| a.as_number())
            else {
                continue;
            };
            let value = raw.clamp(0.0, scale_max);
            if value != raw {
                tracing::debug!(instrument = %instrument.id, item = %item.key, raw, "likert answer clamped to scale");
            }
            total += if instrument.is_reverse_scored(&item.key) {
                reverse_score(value, scale_max)
            } else {
                value
            };
            answered += 1;
        }

        let max = instrument.items.len() as f64 * scale_max;
        let percent = (max > 0.0).then(|| percent_of(total, max));
        let band = if instrument.bands.is_empty() {
            resolve_answered(percent.unwrap_or(0.0), &instrument.percent_bands, answered)
        } else {
            resolve_answered(total, &instrument.bands, answered)
        };

        scored(
            instrument,
            total,
            Some(max),
            percent,
            answered,
            band,
            ResultDetail::Plain,
        )
    }
}

/// Invert an answer on a `0..=scale_max` scale.
pub fn reverse_score(value: f64, scale_max: f64) -> f64 {
    scale_max - value
}

/// Declared scale maximum, else the largest option value, else 0.
fn scale_max(instrument: &Instrument) -> f64 {
    instrument
        .scale_max
        .filter(|m| m.is_finite() && *m >= 0.0)
        .or_else(|| {
            instrument
                .items
                .iter()
                .filter_map(|i| i.max_option_value())
                .reduce(f64::max)
        })
        .unwrap_or(0.0)
        .max(0.0)
}
