use serde_json::{json, Value};
use vigil_core::models::response::Responses;
use vigil_core::models::result::ResultDetail;
use vigil_core::models::schema::Instrument;
use vigil_instruments::evaluate_instrument;
use vigil_instruments::instruments::demographic::body_mass_index;
use vigil_instruments::instruments::likert::reverse_score;

fn instrument(node: Value) -> Instrument {
    serde_json::from_value(node).unwrap()
}

fn responses(raw: Value) -> Responses {
    Responses::from_value(&raw).unwrap()
}

fn options(max: u32) -> Value {
    Value::Array((0..=max).map(|v| json!({ "value": v, "label": v.to_string() })).collect())
}

fn sleep_scale() -> Instrument {
    instrument(json!({
        "id": "sleep",
        "title": "Sleep",
        "type": "likert",
        "scale_max": 4,
        "reverse_scored": ["q2", "q3"],
        "items": [{ "key": "q1" }, { "key": "q2" }, { "key": "q3" }, { "key": "q4" }],
        "bands": [
            { "max": 5, "label": "Good" },
            { "min": 6, "max": 11, "label": "Fair" },
            { "min": 12, "label": "Poor", "level": "high" }
        ]
    }))
}

#[test]
fn likert_reverse_scored_items_are_inverted() {
    let result = evaluate_instrument(
        &sleep_scale(),
        &responses(json!({ "q1": 1, "q2": 1, "q3": 1, "q4": 1 })),
    );
    // 1 + (4 - 1) + (4 - 1) + 1
    assert_eq!(result.total, 8.0);
    assert_eq!(result.max, Some(16.0));
    assert_eq!(result.answered, 4);
    assert_eq!(result.percent, Some(50.0));
    assert_eq!(result.band.label, "Fair");
    assert_eq!(result.kind, "likert");
}

#[test]
fn reverse_score_is_scale_max_minus_value() {
    for v in 0..=4 {
        assert_eq!(reverse_score(v as f64, 4.0), 4.0 - v as f64);
    }
}

#[test]
fn likert_skips_unanswered_and_clamps_out_of_scale() {
    // q1 clamps down to 4; q3 clamps up to 0 and then reverses to 4.
    let result = evaluate_instrument(
        &sleep_scale(),
        &responses(json!({ "q1": 9, "q2": "", "q3": -1, "q4": "often" })),
    );
    assert_eq!(result.total, 8.0);
    assert_eq!(result.answered, 2);
}

#[test]
fn likert_clamps_both_bounds_the_same_way() {
    let low = evaluate_instrument(&sleep_scale(), &responses(json!({ "q1": -3, "q4": -0.5 })));
    assert_eq!(low.total, 0.0);
    assert_eq!(low.answered, 2);

    let high = evaluate_instrument(&sleep_scale(), &responses(json!({ "q1": 7, "q4": 4.5 })));
    assert_eq!(high.total, 8.0);
    assert_eq!(high.answered, 2);
}

#[test]
fn likert_with_nothing_answered_has_zero_total_and_no_band() {
    let result = evaluate_instrument(&sleep_scale(), &Responses::new());
    assert_eq!(result.total, 0.0);
    assert_eq!(result.max, Some(16.0));
    assert_eq!(result.answered, 0);
    assert!(result.band.is_empty());
    assert!(!result.total.is_nan());
}

#[test]
fn instrument_without_items_is_empty_not_nan() {
    let empty = instrument(json!({ "id": "e", "type": "weighted-select", "items": [] }));
    let result = evaluate_instrument(&empty, &responses(json!({ "x": 1 })));
    assert_eq!(result.total, 0.0);
    assert_eq!(result.max, Some(0.0));
    assert_eq!(result.percent, Some(0.0));
    assert!(result.band.is_empty());
}

#[test]
fn qualified_keys_separate_instruments_sharing_item_keys() {
    let result = evaluate_instrument(
        &sleep_scale(),
        &responses(json!({ "sleep.q1": 4, "q1": 0 })),
    );
    assert_eq!(result.total, 4.0);
}

fn risk_checklist() -> Instrument {
    instrument(json!({
        "id": "history",
        "type": "yes-no-list",
        "items": [
            { "key": "smoker", "label": "Smoker", "weight": 4, "yes_tier": "Elevated" },
            { "key": "diabetes", "label": "Diabetes", "weight": 4, "yes_tier": "High" },
            { "key": "active", "label": "Exercises weekly", "weight": 4, "no_tier": "Sedentary" }
        ]
    }))
}

#[test]
fn yes_no_list_sums_checked_points() {
    let result = evaluate_instrument(&risk_checklist(), &responses(json!({ "diabetes": "1" })));
    assert_eq!(result.total, 4.0);
    assert_eq!(result.max, Some(12.0));
    assert_eq!(result.answered, 1);
}

#[test]
fn yes_no_answers_raise_their_tiers() {
    let result = evaluate_instrument(
        &risk_checklist(),
        &responses(json!({ "smoker": "Yes", "diabetes": false, "active": "No" })),
    );
    assert_eq!(result.total, 4.0);
    assert_eq!(result.answered, 3);
    let ResultDetail::YesNo { flags } = &result.detail else {
        panic!("expected yes/no detail, got {:?}", result.detail);
    };
    let tiers: Vec<_> = flags.iter().map(|f| f.tier.as_str()).collect();
    assert_eq!(tiers, ["Elevated", "Sedentary"]);
}

#[test]
fn yes_no_unchecked_points_count_toward_max() {
    let list = instrument(json!({
        "id": "l",
        "type": "yes-no-list",
        "items": [{ "key": "a", "weight": 1, "unchecked_weight": 3 }]
    }));
    let result = evaluate_instrument(&list, &responses(json!({ "a": "false" })));
    assert_eq!(result.total, 3.0);
    assert_eq!(result.max, Some(3.0));
}

#[test]
fn radio_sums_selected_options() {
    let radio = instrument(json!({
        "id": "mood",
        "type": "single-choice-radio",
        "items": [
            { "key": "m1", "options": options(3) },
            { "key": "m2", "options": options(3), "max": 5 },
            { "key": "m3", "options": options(3) }
        ],
        "bands": [{ "max": 2, "label": "Low" }, { "min": 3, "label": "High" }]
    }));
    let result = evaluate_instrument(&radio, &responses(json!({ "m1": "2", "m2": 3, "m3": "7" })));
    assert_eq!(result.total, 5.0);
    assert_eq!(result.answered, 2);
    assert_eq!(result.max, Some(11.0));
    assert_eq!(result.band.label, "High");
}

#[test]
fn radio_selection_never_exceeds_item_max() {
    let radio = instrument(json!({
        "id": "pain",
        "type": "single-choice-radio",
        "items": [{ "key": "a", "max": 3 }, { "key": "b", "options": options(2) }]
    }));
    let result = evaluate_instrument(&radio, &responses(json!({ "a": 10, "b": 2 })));
    assert_eq!(result.total, 5.0);
    assert_eq!(result.max, Some(5.0));
    assert_eq!(result.percent, Some(100.0));
    assert_eq!(result.answered, 2);
}

fn diet_select(weights: [f64; 2]) -> Instrument {
    instrument(json!({
        "id": "diet",
        "type": "weighted-select",
        "items": [
            { "key": "d1", "weight": weights[0], "options": options(3) },
            { "key": "d2", "weight": weights[1], "options": options(3) }
        ],
        "percent_bands": [
            { "max": 33, "label": "Low" },
            { "min": 34, "max": 66, "label": "Moderate" },
            { "min": 67, "label": "High" }
        ]
    }))
}

#[test]
fn weighted_select_scores_percent_of_answer_space() {
    let result = evaluate_instrument(&diet_select([1.0, 2.0]), &responses(json!({ "d1": "3", "d2": "0" })));
    assert_eq!(result.total, 3.0);
    assert_eq!(result.max, Some(9.0));
    assert_eq!(result.percent, Some(33.0));
    assert_eq!(result.band.label, "Low");
}

#[test]
fn weighted_select_percent_ignores_uniform_weight_scaling() {
    let answers = responses(json!({ "d1": 2, "d2": 1 }));
    let base = evaluate_instrument(&diet_select([1.0, 2.0]), &answers);
    let scaled = evaluate_instrument(&diet_select([2.5, 5.0]), &answers);
    assert_eq!(base.percent, scaled.percent);
    assert_eq!(scaled.total, base.total * 2.5);
}

#[test]
fn weighted_select_clamps_to_largest_option() {
    let result = evaluate_instrument(&diet_select([1.0, 1.0]), &responses(json!({ "d1": 10 })));
    assert_eq!(result.total, 3.0);
}

fn medications() -> Instrument {
    instrument(json!({
        "id": "meds",
        "type": "medication-classes",
        "classes": [
            {
                "key": "sedatives",
                "title": "Sedatives",
                "weight": 2,
                "meds": [{ "key": "zolpidem" }, { "key": "diazepam" }]
            },
            {
                "key": "opioids",
                "title": "Opioids",
                "base_risk": 3,
                "meds": [{ "key": "codeine" }, { "key": "fentanyl", "weight": 5 }]
            }
        ],
        "bands": [{ "max": 0, "label": "None" }, { "min": 1, "max": 4, "label": "Some" }, { "min": 5, "label": "Many" }]
    }))
}

#[test]
fn medication_classes_weight_checked_meds() {
    let result = evaluate_instrument(&medications(), &responses(json!({ "zolpidem": true })));
    assert_eq!(result.total, 2.0);
    assert_eq!(result.max, None);
    assert_eq!(result.band.label, "Some");
    let ResultDetail::Medication { checked_count, classes } = &result.detail else {
        panic!("expected medication detail");
    };
    assert_eq!(*checked_count, 1);
    assert_eq!(classes[0].total, 2.0);
    assert_eq!(classes[1].checked_count, 0);
}

#[test]
fn medication_override_weight_beats_class_weight() {
    let result = evaluate_instrument(
        &medications(),
        &responses(json!({ "codeine": "1", "fentanyl": "true", "diazepam": 0 })),
    );
    assert_eq!(result.total, 8.0);
    assert_eq!(result.answered, 3);
    assert_eq!(result.band.label, "Many");
}

fn vitals(kind: &str) -> Instrument {
    instrument(json!({
        "id": "vitals",
        "type": kind,
        "bands": [{ "max": 17, "label": "Younger" }, { "min": 18, "label": "Adult" }],
        "bmi_bands": [
            { "max": 18.4, "label": "Underweight" },
            { "min": 18.5, "max": 24.9, "label": "Healthy" },
            { "min": 25, "label": "Overweight" }
        ]
    }))
}

#[test]
fn metric_bmi_is_rounded_to_one_decimal() {
    let answers = responses(json!({ "height_cm": 175, "weight_kg": "70" }));
    assert_eq!(body_mass_index(&vitals("bmi"), &answers), Some(22.9));
}

#[test]
fn imperial_bmi_is_converted_first() {
    let answers = responses(json!({ "height_ft": 5, "height_in": 9, "weight_lb": 160 }));
    assert_eq!(body_mass_index(&vitals("bmi"), &answers), Some(23.6));
}

#[test]
fn bmi_unavailable_without_positive_inputs() {
    let bmi = vitals("bmi");
    assert_eq!(body_mass_index(&bmi, &responses(json!({ "height_cm": 175 }))), None);
    assert_eq!(
        body_mass_index(&bmi, &responses(json!({ "height_cm": 0, "weight_kg": 70 }))),
        None
    );

    let result = evaluate_instrument(&bmi, &responses(json!({ "weight_kg": 70 })));
    assert!(result.band.is_empty());
    assert_eq!(result.detail, ResultDetail::Bmi { bmi: None });
}

#[test]
fn demographic_bands_age_and_bmi_independently() {
    let result = evaluate_instrument(
        &vitals("demographic"),
        &responses(json!({ "age": 42, "height_cm": 160, "weight_kg": 81 })),
    );
    assert_eq!(result.band.label, "Adult");
    assert_eq!(result.total, 0.0);
    assert_eq!(result.answered, 3);
    let ResultDetail::Demographic { age, bmi, bmi_band } = &result.detail else {
        panic!("expected demographic detail");
    };
    assert_eq!(*age, Some(42.0));
    assert_eq!(*bmi, Some(31.6));
    assert_eq!(bmi_band.label, "Overweight");
}

#[test]
fn unsupported_type_yields_unsupported_result() {
    let odd = instrument(json!({ "id": "odd", "title": "Odd", "type": "slider-grid", "items": [] }));
    let result = evaluate_instrument(&odd, &responses(json!({})));
    assert!(result.is_unsupported());
    assert_eq!(result.kind, "slider-grid");
    assert_eq!(result.total, 0.0);
    assert!(result.band.is_empty());
    let ResultDetail::Unsupported { note } = &result.detail else {
        unreachable!();
    };
    assert!(note.contains("slider-grid"));
}
