use std::fs;

use pretty_assertions::assert_eq;
use skill_eval::{
    config::EvalConfig,
    corpus::{file_path, read_cases, write_suite},
    evaluation::{build_all, build_all_with},
    model::InteractionModel,
};

use crate::{fixture_path, shop_model};

#[test]
fn it_writes_one_file_per_custom_intent() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("test").join("eval");
    let suite = build_all(&shop_model()).unwrap();

    let written = write_suite(&out, &suite).unwrap();
    assert_eq!(
        written,
        vec![
            file_path(&out, "AddToCartIntent"),
            file_path(&out, "OrderIntent")
        ]
    );
    assert!(!out.join("AMAZON.CancelIntent.json").exists());

    let mut names: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["AddToCartIntent.json", "OrderIntent.json"]);
}

#[test]
fn it_round_trips_cases_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let suite = build_all(&shop_model()).unwrap();
    write_suite(dir.path(), &suite).unwrap();

    for (intent, cases) in suite.iter() {
        let read = read_cases(file_path(dir.path(), intent)).unwrap();
        assert_eq!(read.as_slice(), cases);
        let pairs: Vec<_> = read
            .iter()
            .map(|c| (c.utterance(), &c.expected_intent().unwrap().slots))
            .collect();
        let original: Vec<_> = cases
            .iter()
            .map(|c| (c.utterance(), &c.expected_intent().unwrap().slots))
            .collect();
        assert_eq!(pairs, original);
    }
}

#[test]
fn it_writes_the_documented_shape() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path(), &build_all(&shop_model()).unwrap()).unwrap();

    let content = fs::read_to_string(file_path(dir.path(), "AddToCartIntent")).unwrap();
    let expected = r#"{
  "data": [
    {
      "inputs": {
        "utterance": "add apples to cart"
      },
      "expected": [
        {
          "intent": {
            "name": "AddToCartIntent",
            "slots": {
              "ItemName": {
                "value": "apples"
              }
            }
          }
        }
      ]
    },"#;
    assert!(content.starts_with(expected), "unexpected content:\n{}", content);
}

#[test]
fn it_writes_nothing_when_an_intent_fails() {
    let dir = tempfile::tempdir().unwrap();
    let model = shop_model();
    let config = EvalConfig {
        max_cases_per_intent: Some(5),
        ..Default::default()
    };
    // OrderIntent expands to 13 cases; the suite is never built.
    let result = build_all_with(&model, &config).and_then(|suite| write_suite(dir.path(), &suite));
    assert!(result.is_err());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn it_loads_the_fixture_model() {
    let model = InteractionModel::from_file(fixture_path("en-US.json")).unwrap();
    assert_eq!(model.invocation_name, "corner shop");
    assert_eq!(model.version.as_deref(), Some("3"));
    assert_eq!(model.intents.len(), 4);
}
