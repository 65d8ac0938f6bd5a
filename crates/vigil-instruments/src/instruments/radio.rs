use vigil_core::models::result::{InstrumentResult, ResultDetail};
use vigil_core::models::response::Responses;
use vigil_core::models::schema::{Instrument, Item};

use crate::band::resolve_answered;
use crate::instruments::Evaluator;
use crate::scoring::{percent_of, scored};

/// One radio selection per item; the selected option values are summed.
pub struct RadioSum;

impl Evaluator for RadioSum {
    fn evaluate(&self, instrument: &Instrument, responses: &Responses) -> InstrumentResult {
        let mut total = 0.0;
        let mut answered = 0;

        for item in &instrument.items {
            let Some(value) = responses
                .lookup(&instrument.id, &item.key)
                .and_then(|a| a.as_number())
            else {
                continue;
            };
            // A value outside the item's declared options was never offered.
            if value < 0.0 || (!item.options.is_empty() && !item.has_option(value)) {
                tracing::debug!(instrument = %instrument.id, item = %item.key, value, "radio value not among options");
                continue;
            }
            let ceiling = item_ceiling(item);
            if value > ceiling {
                tracing::debug!(instrument = %instrument.id, item = %item.key, value, ceiling, "radio value clamped to item max");
            }
            total += value.min(ceiling);
            answered += 1;
        }

        let max: f64 = instrument.items.iter().map(item_ceiling).sum();
        let percent = (max > 0.0).then(|| percent_of(total, max));
        let band = resolve_answered(total, &instrument.bands, answered);

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

/// Declared `max`, else the largest option value, else 0.
fn item_ceiling(item: &Item) -> f64 {
    item.max
        .or_else(|| item.max_option_value())
        .unwrap_or(0.0)
        .max(0.0)
}
