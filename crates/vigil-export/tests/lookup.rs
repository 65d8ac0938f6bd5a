use serde_json::json;
use vigil_core::models::schema::Questionnaire;
use vigil_export::lookup::{audit_lookup, Lookup, MissingLookup};

#[test]
fn audit_lists_items_with_missing_helper_text() {
    let schema = Questionnaire::from_value(&json!({
        "categories": [{
            "id": "c",
            "instruments": [
                {
                    "id": "checks",
                    "type": "yes-no-list",
                    "items": [
                        { "key": "a", "lookup_key": "known" },
                        { "key": "b", "lookup_key": "unknown" },
                        { "key": "c" }
                    ]
                },
                {
                    "id": "meds",
                    "type": "medication-classes",
                    "classes": [{ "key": "k", "meds": [{ "key": "m", "lookup_key": "brand:m" }] }]
                }
            ]
        }]
    }))
    .unwrap();
    let lookup = Lookup::from_json_str(r#"{ "known": "Helper text" }"#).unwrap();

    let missing = audit_lookup(&schema, &lookup);
    assert_eq!(
        missing,
        vec![
            MissingLookup {
                instrument_id: "checks".to_string(),
                item_key: "b".to_string(),
                lookup_key: "unknown".to_string(),
            },
            MissingLookup {
                instrument_id: "meds".to_string(),
                item_key: "m".to_string(),
                lookup_key: "brand:m".to_string(),
            },
        ]
    );
}

#[test]
fn lookup_reads_flat_json_object() {
    let lookup = Lookup::from_json_str(r#"{ "a": "Alpha", "b": "Beta" }"#).unwrap();
    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup.get("b"), Some("Beta"));
    assert_eq!(lookup.get("z"), None);
    assert!(Lookup::from_json_str("[1, 2]").is_err());
}
