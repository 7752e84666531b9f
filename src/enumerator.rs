//! Surface values of a slot type.
//!
//! For entities `[e1, e2, ...]` the values are
//! `synonyms(e1) ++ [value(e1)] ++ synonyms(e2) ++ [value(e2)] ++ ...`.

use crate::model::{Entity, SlotType};

/// All surface strings of `slot_type` in expansion order.
pub fn enumerate(slot_type: &SlotType) -> Vec<&str> {
    slot_type.entities.iter().flat_map(surface_values).collect()
}

/// Number of values [`enumerate`] yields, without allocating them.
pub fn cardinality(slot_type: &SlotType) -> usize {
    slot_type
        .entities
        .iter()
        .map(|entity| entity.synonyms.len() + 1)
        .sum()
}

fn surface_values(entity: &Entity) -> impl Iterator<Item = &str> {
    entity
        .synonyms
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(entity.value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_type(entities: Vec<Entity>) -> SlotType {
        SlotType {
            name: "TEST_TYPE".to_string(),
            entities,
        }
    }

    #[test]
    fn test_synonyms_precede_canonical_value() {
        let t = slot_type(vec![Entity::new("dog", &["puppy", "pup"])]);
        assert_eq!(enumerate(&t), vec!["puppy", "pup", "dog"]);
    }

    #[test]
    fn test_canonical_values_are_interleaved() {
        let t = slot_type(vec![
            Entity::new("apple", &["apples"]),
            Entity::new("banana", &[]),
            Entity::new("cherry", &["cherries", "red cherry"]),
        ]);
        assert_eq!(
            enumerate(&t),
            vec!["apples", "apple", "banana", "cherries", "red cherry", "cherry"]
        );
        assert_eq!(cardinality(&t), 6);
    }

    #[test]
    fn test_empty_type() {
        let t = slot_type(vec![]);
        assert!(enumerate(&t).is_empty());
        assert_eq!(cardinality(&t), 0);
    }
}
