//! Property-based tests for template expansion.

use proptest::prelude::*;
use skill_eval::{
    expander::expand,
    model::{Entity, Intent, InteractionModel, SlotDecl, SlotType},
};

/// Slot cardinalities plus a template as a sequence of slot indices.
fn template_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec(1usize..4, 1..4).prop_flat_map(|cardinalities| {
        let slots = cardinalities.len();
        (
            Just(cardinalities),
            prop::collection::vec(0..slots, 0..6),
        )
    })
}

fn build(cardinalities: &[usize], sequence: &[usize]) -> (Intent, InteractionModel) {
    let types: Vec<SlotType> = cardinalities
        .iter()
        .enumerate()
        .map(|(slot, &n)| SlotType {
            name: format!("T{}", slot),
            entities: (0..n)
                .map(|j| Entity::new(format!("s{}v{}", slot, j), &[]))
                .collect(),
        })
        .collect();
    let template = sequence
        .iter()
        .map(|slot| format!("w {{S{}}}", slot))
        .collect::<Vec<_>>()
        .join(" ");
    let intent = Intent {
        name: "PropIntent".to_string(),
        slots: (0..cardinalities.len())
            .map(|slot| SlotDecl {
                name: format!("S{}", slot),
                type_name: format!("T{}", slot),
            })
            .collect(),
        samples: vec![template],
    };
    let model = InteractionModel::new(None, "prop".to_string(), vec![intent.clone()], types);
    (intent, model)
}

fn distinct(sequence: &[usize]) -> Vec<usize> {
    let mut seen = Vec::new();
    for &slot in sequence {
        if !seen.contains(&slot) {
            seen.push(slot);
        }
    }
    seen
}

/// Index combinations in nested-loop order, first slot outermost.
fn expected_combinations(cardinalities: &[usize], order: &[usize]) -> Vec<Vec<usize>> {
    order.iter().fold(vec![vec![]], |acc, &slot| {
        acc.into_iter()
            .flat_map(|prefix| {
                (0..cardinalities[slot]).map(move |j| {
                    let mut next = prefix.clone();
                    next.push(j);
                    next
                })
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn test_count_is_product_of_distinct_cardinalities((cardinalities, sequence) in template_strategy()) {
        let (intent, model) = build(&cardinalities, &sequence);
        let samples = expand(&intent, &model).unwrap();
        let expected: usize = distinct(&sequence).iter().map(|&s| cardinalities[s]).product();
        prop_assert_eq!(samples.len(), expected);
    }

    #[test]
    fn test_nested_loop_order_and_shared_values((cardinalities, sequence) in template_strategy()) {
        let (intent, model) = build(&cardinalities, &sequence);
        let samples = expand(&intent, &model).unwrap();
        let order = distinct(&sequence);

        for (sample, combination) in samples.iter().zip(expected_combinations(&cardinalities, &order)) {
            for (&slot, &j) in order.iter().zip(&combination) {
                let value = format!("s{}v{}", slot, j);
                prop_assert_eq!(&sample.slot_values[&format!("S{}", slot)].value, &value);
            }
            let rendered = sequence
                .iter()
                .map(|&slot| format!("w {}", sample.slot_values[&format!("S{}", slot)].value))
                .collect::<Vec<_>>()
                .join(" ");
            prop_assert_eq!(&sample.utterance, &rendered);
            prop_assert_eq!(sample.slot_values.len(), order.len());
        }
    }
}
