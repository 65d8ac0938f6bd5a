use vigil_core::models::result::{InstrumentResult, RaisedFlag, ResultDetail};
use vigil_core::models::response::Responses;
use vigil_core::models::schema::Instrument;

use crate::band::resolve_answered;
use crate::instruments::Evaluator;
use crate::scoring::{percent_of, scored};

/// Checklist of yes/no items. A checked item scores its `weight` (default 1),
/// an explicitly unchecked one its `unchecked_weight` (default 0).
pub struct YesNoList;

impl Evaluator for YesNoList {
    fn evaluate(&self, instrument: &Instrument, responses: &Responses) -> InstrumentResult {
        let mut total = 0.0;
        let mut max = 0.0;
        let mut answered = 0;
        let mut flags = Vec::new();

        for item in &instrument.items {
            let on = item.weight.unwrap_or(1.0);
            let off = item.unchecked_weight.unwrap_or(0.0);
            max += f64::max(on, off);

            let Some(checked) = responses
                .lookup(&instrument.id, &item.key)
                .and_then(|a| a.is_checked())
            else {
                continue;
            };
            answered += 1;
            total += if checked { on } else { off };

            let tier = if checked { &item.yes_tier } else { &item.no_tier };
            if let Some(tier) = tier {
                flags.push(RaisedFlag {
                    item_key: item.key.clone(),
                    label: item.label.clone(),
                    tier: tier.clone(),
                });
            }
        }

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
            ResultDetail::YesNo { flags },
        )
    }
}
