use serde::Serialize;
use tera::{Context, Tera};
use vigil_core::models::result::{
    CategoryResult, CategorySummary, Evaluation, InstrumentResult, OverallResult, ResolvedBand,
    ResultDetail,
};

use crate::error::ExportError;

const TEMPLATE_NAME: &str = "report";

/// Built-in report: one line per instrument, one per category summary and
/// one overall line.
pub const DEFAULT_TEMPLATE: &str = "\
{% for category in categories %}## {{ category.title }}
{% for line in category.instruments %}- {{ line.title }}: {{ line.text }}
{% for flag in line.flags %}  * {{ flag }}
{% endfor %}{% endfor %}{% if category.summary %}Summary: {{ category.summary }}
{% endif %}
{% endfor %}{% if overall %}Overall: {{ overall }}
{% endif %}";

/// Template context. Every number is already formatted.
#[derive(Debug, Serialize)]
pub struct ReportView {
    pub categories: Vec<CategoryView>,
    pub overall: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub instruments: Vec<InstrumentLine>,
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InstrumentLine {
    pub id: String,
    pub title: String,
    pub group: Option<String>,
    pub text: String,
    pub flags: Vec<String>,
}

/// Render an evaluation with `template`, or [`DEFAULT_TEMPLATE`].
///
/// The template sees a [`ReportView`]: values are formatted from the
/// already-resolved result tree; nothing is re-banded.
pub fn render_report(evaluation: &Evaluation, template: Option<&str>) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, template.unwrap_or(DEFAULT_TEMPLATE))
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(report_view(evaluation))?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(TEMPLATE_NAME, &context)?;
    Ok(rendered)
}

pub fn report_view(evaluation: &Evaluation) -> ReportView {
    ReportView {
        categories: evaluation.categories.iter().map(category_view).collect(),
        overall: overall_line(&evaluation.overall),
    }
}

fn category_view(category: &CategoryResult) -> CategoryView {
    CategoryView {
        id: category.category_id.clone(),
        title: display_title(&category.title, &category.category_id),
        instruments: category.instruments.iter().map(instrument_line).collect(),
        summary: category.summary.as_ref().map(summary_line),
    }
}

fn instrument_line(result: &InstrumentResult) -> InstrumentLine {
    let flags = match &result.detail {
        ResultDetail::YesNo { flags } => flags
            .iter()
            .map(|f| format!("{}: {}", display_title(&f.label, &f.item_key), f.tier))
            .collect(),
        _ => Vec::new(),
    };
    InstrumentLine {
        id: result.instrument_id.clone(),
        title: display_title(&result.title, &result.instrument_id),
        group: result.group.clone(),
        text: instrument_text(result),
        flags,
    }
}

pub fn instrument_text(result: &InstrumentResult) -> String {
    match &result.detail {
        ResultDetail::Unsupported { note } => format!("not scored ({note})"),
        ResultDetail::Demographic { age, bmi, bmi_band } => {
            let mut parts = Vec::new();
            if let Some(age) = age {
                parts.push(with_band(format!("age {}", number(*age)), &result.band));
            }
            if let Some(bmi) = bmi {
                parts.push(with_band(format!("BMI {}", number(*bmi)), bmi_band));
            }
            if parts.is_empty() {
                "no data".to_string()
            } else {
                parts.join(", ")
            }
        }
        ResultDetail::Bmi { bmi } => match bmi {
            Some(bmi) => with_band(format!("BMI {}", number(*bmi)), &result.band),
            None => "BMI unavailable".to_string(),
        },
        _ if result.answered == 0 => "not answered".to_string(),
        ResultDetail::Medication { checked_count, .. } => with_band(
            format!("{} from {checked_count} checked", number(result.total)),
            &result.band,
        ),
        ResultDetail::Plain | ResultDetail::YesNo { .. } => {
            let mut text = match result.max {
                Some(max) => format!("{}/{}", number(result.total), number(max)),
                None => number(result.total),
            };
            if let Some(percent) = result.percent {
                text.push_str(&format!(" ({}%)", number(percent)));
            }
            with_band(text, &result.band)
        }
    }
}

fn summary_line(summary: &CategorySummary) -> String {
    let text = match summary.percent {
        Some(percent) => format!("{}%", number(percent)),
        None => number(summary.value),
    };
    with_band(text, &summary.band)
}

fn overall_line(overall: &OverallResult) -> Option<String> {
    overall.mode?;
    let text = match (overall.percent, overall.max) {
        (Some(percent), Some(max)) => format!(
            "{}% ({}/{})",
            number(percent),
            number(overall.total),
            number(max)
        ),
        _ => number(overall.total),
    };
    Some(with_band(text, &overall.band))
}

fn with_band(text: String, band: &ResolvedBand) -> String {
    match (band.is_empty(), &band.level) {
        (true, _) => text,
        (false, Some(level)) => format!("{text} {} [{level}]", band.label),
        (false, None) => format!("{text} {}", band.label),
    }
}

fn display_title(title: &str, fallback: &str) -> String {
    if title.is_empty() {
        fallback.to_string()
    } else {
        title.to_string()
    }
}

/// Whole numbers without decimals, anything else to at most two places.
pub fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
