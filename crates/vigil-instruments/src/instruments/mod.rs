pub mod demographic;
pub mod likert;
pub mod medication;
pub mod radio;
pub mod weighted_select;
pub mod yes_no;

use vigil_core::models::result::InstrumentResult;
use vigil_core::models::response::Responses;
use vigil_core::models::schema::{Instrument, InstrumentKind};

/// A scoring rule for one instrument type.
pub trait Evaluator: Send + Sync {
    /// Score `instrument` against the current response snapshot.
    fn evaluate(&self, instrument: &Instrument, responses: &Responses) -> InstrumentResult;
}

/// Evaluator for a kind, or `None` for unsupported kinds.
pub fn evaluator_for(kind: &InstrumentKind) -> Option<&'static dyn Evaluator> {
    match kind {
        InstrumentKind::Demographic => Some(&demographic::Demographic),
        InstrumentKind::Bmi => Some(&demographic::BodyMassIndex),
        InstrumentKind::YesNoList => Some(&yes_no::YesNoList),
        InstrumentKind::Likert => Some(&likert::Likert),
        InstrumentKind::SingleChoiceRadio => Some(&radio::RadioSum),
        InstrumentKind::WeightedSelect => Some(&weighted_select::WeightedSelect),
        InstrumentKind::MedicationClasses => Some(&medication::MedicationClasses),
        InstrumentKind::Unsupported(_) => None,
    }
}
