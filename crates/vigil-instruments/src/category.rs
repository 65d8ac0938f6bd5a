use vigil_core::models::result::{CategoryResult, CategorySummary, InstrumentResult};
use vigil_core::models::response::Responses;
use vigil_core::models::schema::{Category, SummaryMode, SummaryRule};

use crate::band::resolve_answered;
use crate::evaluate_instrument;
use crate::scoring::{percent_of, sanitize_total};

/// Evaluate every instrument of a category, flat ones first and then each
/// sub-group's (tagged with the group key), and apply the summary rule.
pub fn evaluate_category(category: &Category, responses: &Responses) -> CategoryResult {
    let mut instruments: Vec<InstrumentResult> = category
        .instruments
        .iter()
        .map(|instrument| evaluate_instrument(instrument, responses))
        .collect();

    for group in &category.groups {
        for instrument in &group.instruments {
            let mut result = evaluate_instrument(instrument, responses);
            result.group = Some(group.key.clone());
            instruments.push(result);
        }
    }

    let summary = category
        .summary
        .as_ref()
        .map(|rule| summarize(rule, &instruments));

    CategoryResult {
        category_id: category.id.clone(),
        title: category.title.clone(),
        instruments,
        summary,
    }
}

/// Apply a summary rule to already-computed instrument results.
///
/// Named sources that are missing or unsupported are skipped. In percent
/// mode only sources that define a maximum contribute.
pub fn summarize(rule: &SummaryRule, results: &[InstrumentResult]) -> CategorySummary {
    let sources = summary_sources(rule, results);

    match rule.mode {
        SummaryMode::Sum => {
            let total = sanitize_total(sources.iter().map(|r| r.total).sum());
            let answered: u32 = sources.iter().map(|r| r.answered).sum();
            CategorySummary {
                mode: rule.mode,
                value: total,
                total,
                max: None,
                percent: None,
                band: resolve_answered(total, &rule.bands, answered),
                sources: sources.len() as u32,
            }
        }
        SummaryMode::Percent => {
            let mut total = 0.0;
            let mut max = 0.0;
            let mut answered = 0;
            let mut used = 0;
            for (result, source_max) in sources
                .iter()
                .filter_map(|r| r.max.map(|m| (*r, m)))
            {
                total += result.total;
                max += source_max;
                answered += result.answered;
                used += 1;
            }
            let percent = percent_of(total, max);
            let bands = if rule.percent_bands.is_empty() {
                &rule.bands
            } else {
                &rule.percent_bands
            };
            CategorySummary {
                mode: rule.mode,
                value: percent,
                total: sanitize_total(total),
                max: Some(sanitize_total(max)),
                percent: Some(percent),
                band: resolve_answered(percent, bands, answered),
                sources: used,
            }
        }
    }
}

fn summary_sources<'a>(rule: &SummaryRule, results: &'a [InstrumentResult]) -> Vec<&'a InstrumentResult> {
    if rule.sources.is_empty() {
        return results.iter().filter(|r| !r.is_unsupported()).collect();
    }
    rule.sources
        .iter()
        .filter_map(|id| {
            let found = results.iter().find(|r| &r.instrument_id == id);
            if found.is_none() {
                tracing::debug!(source = %id, "summary source not found in category");
            }
            found
        })
        .filter(|r| !r.is_unsupported() && r.total.is_finite())
        .collect()
}
