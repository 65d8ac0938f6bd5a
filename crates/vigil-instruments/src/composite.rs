use vigil_core::models::result::{CategoryResult, InstrumentResult, OverallResult, ResolvedBand};
use vigil_core::models::schema::{CompositeMode, CompositeRule, InstrumentKind};

use crate::band::{resolve, resolve_answered};
use crate::scoring::{percent_of, sanitize_total};

/// Combine every category into one overall result.
///
/// The mode comes from the questionnaire's single composite rule and is
/// applied to all categories alike. Without a rule the result is neutral.
pub fn evaluate_overall(categories: &[CategoryResult], rule: Option<&CompositeRule>) -> OverallResult {
    let Some(rule) = rule else {
        return OverallResult::neutral();
    };

    match rule.mode {
        CompositeMode::Percent => {
            let pool = categories
                .iter()
                .flat_map(|c| c.instruments.iter())
                .filter(|r| r.kind == InstrumentKind::WeightedSelect.tag());
            pooled_percent(rule, pool)
        }
        CompositeMode::WeightedAverage => {
            let pool = categories
                .iter()
                .flat_map(|c| c.instruments.iter())
                .filter(|r| !r.is_unsupported());
            pooled_percent(rule, pool)
        }
        CompositeMode::Sum => {
            let summaries: Vec<_> = categories.iter().filter_map(|c| c.summary.as_ref()).collect();
            let total = sanitize_total(summaries.iter().map(|s| s.total).sum());
            let band = if summaries.is_empty() {
                ResolvedBand::empty()
            } else {
                resolve(total, &rule.bands)
            };
            OverallResult {
                mode: Some(rule.mode),
                total,
                max: None,
                percent: None,
                band,
            }
        }
    }
}

/// Grand total over grand max across every result that defines a maximum.
/// Each result contributes its own answer space, so instruments with more
/// items weigh in proportion to what they can score.
fn pooled_percent<'a>(
    rule: &CompositeRule,
    pool: impl Iterator<Item = &'a InstrumentResult>,
) -> OverallResult {
    let mut total = 0.0;
    let mut max = 0.0;
    let mut answered = 0;
    for result in pool {
        let Some(result_max) = result.max else {
            continue;
        };
        total += result.total;
        max += result_max;
        answered += result.answered;
    }

    let percent = percent_of(total, max);
    let bands = if rule.percent_bands.is_empty() {
        &rule.bands
    } else {
        &rule.percent_bands
    };
    OverallResult {
        mode: Some(rule.mode),
        total: sanitize_total(total),
        max: Some(sanitize_total(max)),
        percent: Some(percent),
        band: resolve_answered(percent, bands, answered),
    }
}
