mod properties;

use pretty_assertions::assert_eq;
use skill_eval::{
    Error, ReferenceError,
    enumerator::enumerate,
    evaluation::build_all,
    expander::{SampleExpander, expand},
    model::InteractionModel,
};

use crate::shop_model;

fn utterances_with_slot(
    model: &InteractionModel,
    intent: &str,
    slot: &str,
) -> Vec<(String, Option<String>)> {
    let intent = model.intent(intent).unwrap();
    expand(intent, model)
        .unwrap()
        .into_iter()
        .map(|s| {
            let value = s.slot_values.get(slot).map(|v| v.value.clone());
            (s.utterance, value)
        })
        .collect()
}

#[test]
fn it_expands_add_to_cart_in_enumerator_order() {
    let model = shop_model();
    assert_eq!(
        enumerate(model.slot_type("ITEM_TYPE").unwrap()),
        vec!["apples", "apple", "banana"]
    );
    assert_eq!(
        utterances_with_slot(&model, "AddToCartIntent", "ItemName"),
        vec![
            ("add apples to cart".to_string(), Some("apples".to_string())),
            ("add apple to cart".to_string(), Some("apple".to_string())),
            ("add banana to cart".to_string(), Some("banana".to_string())),
        ]
    );
}

#[test]
fn it_expands_every_template_of_an_intent_in_order() {
    let model = shop_model();
    let intent = model.intent("OrderIntent").unwrap();
    let samples = expand(intent, &model).unwrap();
    let utterances: Vec<&str> = samples.iter().map(|s| s.utterance.as_str()).collect();
    assert_eq!(
        utterances,
        vec![
            "order one apples",
            "order one apple",
            "order one banana",
            "order a couple of apples",
            "order a couple of apple",
            "order a couple of banana",
            "order two apples",
            "order two apple",
            "order two banana",
            "apples please, yes apples",
            "apple please, yes apple",
            "banana please, yes banana",
            "place an order",
        ]
    );
    assert_eq!(samples[3].slot_values["Quantity"].value, "a couple of");
    assert_eq!(samples[3].slot_values["ItemName"].value, "apples");
    assert_eq!(samples[10].slot_values.len(), 1);
    assert!(samples[12].slot_values.is_empty());
}

#[test]
fn it_counts_before_expanding() {
    let model = shop_model();
    let intent = model.intent("OrderIntent").unwrap();
    let expander = SampleExpander::new(intent, &model);
    assert_eq!(expander.count("order {Quantity} {ItemName}").unwrap(), 9);
    assert_eq!(expander.count("{ItemName} please, yes {ItemName}").unwrap(), 3);
    assert_eq!(expander.count("place an order").unwrap(), 1);
    assert_eq!(expander.total_count().unwrap(), 13);
}

#[test]
fn it_builds_suite_without_builtin_intents() {
    let suite = build_all(&shop_model()).unwrap();
    assert_eq!(
        suite.intent_names().collect::<Vec<_>>(),
        vec!["AddToCartIntent", "OrderIntent"]
    );
    assert!(!suite.contains("AMAZON.CancelIntent"));
    assert!(!suite.contains("AMAZON.HelpIntent"));
    assert_eq!(suite.total_cases(), 16);

    let first = &suite.get("OrderIntent").unwrap()[0];
    let expected = first.expected_intent().unwrap();
    assert_eq!(first.utterance(), "order one apples");
    assert_eq!(expected.name, "OrderIntent");
    assert_eq!(expected.slots["Quantity"].value, "one");
}

#[test]
fn it_is_deterministic() {
    let model = shop_model();
    assert_eq!(build_all(&model).unwrap(), build_all(&model).unwrap());
}

#[test]
fn it_reports_the_undeclared_slot() {
    let model = InteractionModel::from_str(
        r#"{
            "interactionModel": { "languageModel": {
                "invocationName": "broken",
                "intents": [{ "name": "FindIntent", "samples": ["find {Place}"] }],
                "types": []
            } }
        }"#,
    )
    .unwrap();
    match build_all(&model) {
        Err(Error::Reference(ReferenceError::UnknownSlot {
            intent,
            template,
            slot,
        })) => {
            assert_eq!(intent, "FindIntent");
            assert_eq!(template, "find {Place}");
            assert_eq!(slot, "Place");
        }
        other => panic!("expected unknown slot, got {:?}", other),
    }
}

#[test]
fn it_reports_the_undeclared_type() {
    let model = InteractionModel::from_str(
        r#"{
            "interactionModel": { "languageModel": {
                "invocationName": "broken",
                "intents": [{
                    "name": "FindIntent",
                    "slots": [{ "name": "Place", "type": "AMAZON.City" }],
                    "samples": ["find {Place}"]
                }],
                "types": []
            } }
        }"#,
    )
    .unwrap();
    let err = build_all(&model).unwrap_err();
    assert!(err.to_string().contains("AMAZON.City"));
}
