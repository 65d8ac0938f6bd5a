use vigil_core::models::result::{InstrumentResult, ResolvedBand, ResultDetail};
use vigil_core::models::schema::Instrument;

/// Whole-number percent of `max`, clamped to [0, 100].
///
/// Rounds half away from zero (`f64::round`), so 9/21 = 42.857… becomes 43.
/// A zero or negative max yields 0.
pub fn percent_of(total: f64, max: f64) -> f64 {
    if !total.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    (total / max * 100.0).clamp(0.0, 100.0).round()
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Keep totals finite and non-negative before they reach a parent.
pub fn sanitize_total(total: f64) -> f64 {
    if total.is_finite() { total.max(0.0) } else { 0.0 }
}

/// Assemble an instrument result. `group` is filled in by the category
/// aggregator.
pub fn scored(
    instrument: &Instrument,
    total: f64,
    max: Option<f64>,
    percent: Option<f64>,
    answered: u32,
    band: ResolvedBand,
    detail: ResultDetail,
) -> InstrumentResult {
    InstrumentResult {
        instrument_id: instrument.id.clone(),
        title: instrument.title.clone(),
        kind: instrument.kind.tag().to_string(),
        group: None,
        total: sanitize_total(total),
        max: max.map(sanitize_total),
        percent,
        answered,
        band,
        detail,
    }
}

pub fn unsupported(instrument: &Instrument, note: String) -> InstrumentResult {
    scored(
        instrument,
        0.0,
        None,
        None,
        0,
        ResolvedBand::empty(),
        ResultDetail::Unsupported { note },
    )
}
