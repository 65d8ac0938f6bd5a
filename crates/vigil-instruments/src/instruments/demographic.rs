use vigil_core::models::result::{InstrumentResult, ResolvedBand, ResultDetail};
use vigil_core::models::response::Responses;
use vigil_core::models::schema::Instrument;

use crate::band::resolve;
use crate::instruments::Evaluator;
use crate::scoring::{round_to, scored};

pub const AGE: &str = "age";
pub const HEIGHT_CM: &str = "height_cm";
pub const WEIGHT_KG: &str = "weight_kg";
pub const HEIGHT_FT: &str = "height_ft";
pub const HEIGHT_IN: &str = "height_in";
pub const WEIGHT_LB: &str = "weight_lb";

const METERS_PER_INCH: f64 = 0.0254;
const KG_PER_POUND: f64 = 0.453_592_37;
const MAX_AGE: f64 = 130.0;

/// Age (item `age`) banded by `bands`, plus BMI banded by `bmi_bands` when
/// the instrument also collects height and weight. Nothing is summed.
pub struct Demographic;

impl Evaluator for Demographic {
    fn evaluate(&self, instrument: &Instrument, responses: &Responses) -> InstrumentResult {
        let age = responses
            .lookup(&instrument.id, AGE)
            .and_then(|a| a.as_number())
            .filter(|v| (0.0..=MAX_AGE).contains(v));
        let bmi = body_mass_index(instrument, responses);

        let band = age
            .map(|age| resolve(age, &instrument.bands))
            .unwrap_or_default();
        let bmi_band = bmi
            .map(|bmi| resolve(bmi, &instrument.bmi_bands))
            .unwrap_or_default();

        scored(
            instrument,
            0.0,
            None,
            None,
            answered_inputs(instrument, responses),
            band,
            ResultDetail::Demographic { age, bmi, bmi_band },
        )
    }
}

/// Body-mass index alone, banded by `bands`.
pub struct BodyMassIndex;

impl Evaluator for BodyMassIndex {
    fn evaluate(&self, instrument: &Instrument, responses: &Responses) -> InstrumentResult {
        let bmi = body_mass_index(instrument, responses);
        let band: ResolvedBand = bmi
            .map(|bmi| resolve(bmi, &instrument.bands))
            .unwrap_or_default();

        scored(
            instrument,
            0.0,
            None,
            None,
            answered_inputs(instrument, responses),
            band,
            ResultDetail::Bmi { bmi },
        )
    }
}

/// BMI in kg/m², rounded to one decimal.
///
/// Metric inputs (`height_cm`, `weight_kg`) win when both are present;
/// otherwise imperial inputs (`height_ft` and/or `height_in`, `weight_lb`)
/// are converted first. Missing or non-positive height or weight means the
/// BMI is unavailable.
pub fn body_mass_index(instrument: &Instrument, responses: &Responses) -> Option<f64> {
    let number = |key: &str| {
        responses
            .lookup(&instrument.id, key)
            .and_then(|a| a.as_number())
    };

    let (height_m, weight_kg) = match (number(HEIGHT_CM), number(WEIGHT_KG)) {
        (Some(cm), Some(kg)) => (cm / 100.0, kg),
        _ => {
            let feet = number(HEIGHT_FT);
            let inches = number(HEIGHT_IN);
            if feet.is_none() && inches.is_none() {
                return None;
            }
            let total_inches = feet.unwrap_or(0.0) * 12.0 + inches.unwrap_or(0.0);
            (total_inches * METERS_PER_INCH, number(WEIGHT_LB)? * KG_PER_POUND)
        }
    };

    if height_m <= 0.0 || weight_kg <= 0.0 {
        return None;
    }
    let bmi = weight_kg / (height_m * height_m);
    bmi.is_finite().then(|| round_to(bmi, 1))
}

/// Declared items with an answer; without declared items, the known derived
/// inputs are counted instead.
fn answered_inputs(instrument: &Instrument, responses: &Responses) -> u32 {
    let answered = |key: &str| {
        responses
            .lookup(&instrument.id, key)
            .and_then(|a| a.as_number())
            .is_some()
    };
    if instrument.items.is_empty() {
        [AGE, HEIGHT_CM, WEIGHT_KG, HEIGHT_FT, HEIGHT_IN, WEIGHT_LB]
            .into_iter()
            .filter(|key| answered(key))
            .count() as u32
    } else {
        instrument
            .items
            .iter()
            .filter(|item| answered(&item.key))
            .count() as u32
    }
}
