use vigil_core::models::result::{InstrumentResult, ResultDetail};
use vigil_core::models::response::Responses;
use vigil_core::models::schema::{Instrument, Item};

use crate::band::resolve_answered;
use crate::instruments::Evaluator;
use crate::scoring::{percent_of, scored};

/// Select-per-item instrument scored as a percent of its answer space.
///
/// Each selection is clamped to the item's largest option value and
/// multiplied by the item weight (default 1). Banding uses the percent
/// table; the raw-total table is only a fallback.
pub struct WeightedSelect;

impl Evaluator for WeightedSelect {
    fn evaluate(&self, instrument: &Instrument, responses: &Responses) -> InstrumentResult {
        let mut total = 0.0;
        let mut max = 0.0;
        let mut answered = 0;

        for item in &instrument.items {
            let weight = item.weight.unwrap_or(1.0).max(0.0);
            let ceiling = item_ceiling(instrument, item);
            max += weight * ceiling;

            let Some(value) = responses
                .lookup(&instrument.id, &item.key)
                .and_then(|a| a.as_number())
            else {
                continue;
            };
            if value < 0.0 {
                continue;
            }
            total += weight * value.min(ceiling);
            answered += 1;
        }

        let percent = percent_of(total, max);
        let band = if instrument.percent_bands.is_empty() {
            resolve_answered(total, &instrument.bands, answered)
        } else {
            resolve_answered(percent, &instrument.percent_bands, answered)
        };

        scored(
            instrument,
            total,
            Some(max),
            Some(percent),
            answered,
            band,
            ResultDetail::Plain,
        )
    }
}

fn item_ceiling(instrument: &Instrument, item: &Item) -> f64 {
    item.max_option_value()
        .or(instrument.scale_max)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .max(0.0)
}
