use vigil_core::models::result::{ClassTotal, InstrumentResult, ResultDetail};
use vigil_core::models::response::Responses;
use vigil_core::models::schema::Instrument;

use crate::band::resolve_answered;
use crate::instruments::Evaluator;
use crate::scoring::scored;

/// Medications grouped into classes. Every checked medication adds its own
/// weight, or its class weight when it declares none. There is no maximum;
/// bands apply to the raw total.
pub struct MedicationClasses;

impl Evaluator for MedicationClasses {
    fn evaluate(&self, instrument: &Instrument, responses: &Responses) -> InstrumentResult {
        let mut total = 0.0;
        let mut answered = 0;
        let mut checked_count = 0;
        let mut classes = Vec::with_capacity(instrument.classes.len());

        for class in &instrument.classes {
            let mut class_total = 0.0;
            let mut class_checked = 0;
            for med in &class.meds {
                let Some(checked) = responses
                    .lookup(&instrument.id, &med.key)
                    .and_then(|a| a.is_checked())
                else {
                    continue;
                };
                answered += 1;
                if checked {
                    class_total += med.weight.unwrap_or(class.weight).max(0.0);
                    class_checked += 1;
                }
            }
            total += class_total;
            checked_count += class_checked;
            classes.push(ClassTotal {
                class_key: class.key.clone(),
                title: class.title.clone(),
                checked_count: class_checked,
                total: class_total,
            });
        }

        let band = resolve_answered(total, &instrument.bands, answered);

        scored(
            instrument,
            total,
            None,
            None,
            answered,
            band,
            ResultDetail::Medication {
                checked_count,
                classes,
            },
        )
    }
}
