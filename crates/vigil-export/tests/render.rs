use serde_json::json;
use vigil_core::models::response::Responses;
use vigil_core::models::schema::Questionnaire;
use vigil_export::error::ExportError;
use vigil_export::render::{number, render_report};

fn evaluation() -> vigil_core::models::result::Evaluation {
    let schema = Questionnaire::from_value(&json!({
        "categories": [{
            "id": "history",
            "title": "History",
            "instruments": [
                {
                    "id": "checks",
                    "title": "Risk factors",
                    "type": "yes-no-list",
                    "items": [
                        { "key": "smoker", "label": "Smoker", "weight": 2, "yes_tier": "Elevated" },
                        { "key": "diabetes", "label": "Diabetes", "weight": 2 }
                    ],
                    "bands": [{ "max": 1, "label": "Low" }, { "min": 2, "label": "High", "level": "red" }]
                },
                { "id": "sketch", "title": "Body map", "type": "drawing" },
                { "id": "vitals", "title": "Vitals", "type": "bmi" }
            ],
            "summary": { "mode": "sum", "sources": ["checks"] }
        }],
        "composite": { "mode": "sum", "bands": [{ "min": 0, "label": "Recorded" }] }
    }))
    .unwrap();
    let responses = Responses::from_value(&json!({ "smoker": "Yes", "diabetes": "No" })).unwrap();
    vigil_instruments::evaluate(&schema, &responses)
}

#[test]
fn default_report_has_one_line_per_result() {
    let report = render_report(&evaluation(), None).unwrap();
    let lines: Vec<_> = report.lines().collect();

    assert_eq!(lines[0], "## History");
    assert_eq!(lines[1], "- Risk factors: 2/4 (50%) High [red]");
    assert_eq!(lines[2], "  * Smoker: Elevated");
    assert!(lines[3].starts_with("- Body map: not scored (unsupported instrument type 'drawing')"));
    assert_eq!(lines[4], "- Vitals: BMI unavailable");
    assert_eq!(lines[5], "Summary: 2");
    assert!(report.contains("Overall: 2 Recorded"));
}

#[test]
fn custom_template_sees_formatted_view() {
    let template = "{% for c in categories %}{{ c.id }}={{ c.instruments | length }};{% endfor %}";
    let report = render_report(&evaluation(), Some(template)).unwrap();
    assert_eq!(report, "history=3;");
}

#[test]
fn broken_template_is_a_parse_error() {
    let err = render_report(&evaluation(), Some("{% for %}")).unwrap_err();
    assert!(matches!(err, ExportError::TemplateParse(_)));
}

#[test]
fn numbers_drop_needless_decimals() {
    assert_eq!(number(10.0), "10");
    assert_eq!(number(42.857), "42.86");
    assert_eq!(number(22.9), "22.9");
}
