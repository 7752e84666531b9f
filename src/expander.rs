//! # Sample Expander
//!
//! Turns an intent's utterance templates into every concrete utterance they
//! describe, each paired with the slot values used to produce it.
//!
//! ## Expansion Rules
//!
//! * A template without placeholders yields itself once, with no slot values.
//! * Each distinct `{SlotName}` is resolved to the slot's declared type and
//!   substituted with every value of that type (see [`crate::enumerator`]).
//! * Repeated occurrences of one placeholder share a single value per
//!   utterance; they do not multiply the number of utterances.
//! * Utterances are produced as a nested-loop Cartesian product: the first
//!   placeholder varies slowest, the last one fastest.
//!
//! ```text
//! "add {ItemName} to cart"   ItemName: ITEM_TYPE = [apples, apple, banana]
//!   → "add apples to cart"   { ItemName: apples }
//!   → "add apple to cart"    { ItemName: apple }
//!   → "add banana to cart"   { ItemName: banana }
//! ```
//!
//! The product is walked with an index vector instead of recursion, so stack
//! depth does not grow with the number of placeholders, and each utterance gets
//! its own slot map.

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    enumerator,
    error::{LimitError, ReferenceError},
    model::{Intent, InteractionModel},
};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(.*?)\}").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValue {
    pub value: String,
}

pub type SlotValues = BTreeMap<String, SlotValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedSample {
    pub utterance: String,
    pub slot_values: SlotValues,
}

/// One `{SlotName}` occurrence in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Full text including braces.
    pub text: &'a str,
    pub slot: &'a str,
}

/// Every placeholder occurrence in `template`, left to right, duplicates kept.
pub fn placeholders(template: &str) -> Vec<Placeholder<'_>> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| {
            let text = caps.get(0)?.as_str();
            let slot = caps.get(1)?.as_str();
            Some(Placeholder { text, slot })
        })
        .collect()
}

fn distinct_placeholders(template: &str) -> Vec<Placeholder<'_>> {
    let mut distinct: Vec<Placeholder<'_>> = Vec::new();
    for placeholder in placeholders(template) {
        if !distinct.iter().any(|p| p.text == placeholder.text) {
            distinct.push(placeholder);
        }
    }
    distinct
}

/// Expand every sample of `intent` against the types declared in `model`.
pub fn expand(
    intent: &Intent,
    model: &InteractionModel,
) -> Result<Vec<ExpandedSample>, ReferenceError> {
    SampleExpander::new(intent, model).expand()
}

pub struct SampleExpander<'m> {
    intent: &'m Intent,
    model: &'m InteractionModel,
    slot_types: HashMap<&'m str, &'m str>,
}

impl<'m> SampleExpander<'m> {
    pub fn new(intent: &'m Intent, model: &'m InteractionModel) -> Self {
        let mut slot_types = HashMap::with_capacity(intent.slots.len());
        for decl in &intent.slots {
            slot_types
                .entry(decl.name.as_str())
                .or_insert(decl.type_name.as_str());
        }
        Self {
            intent,
            model,
            slot_types,
        }
    }

    /// All expanded samples of the intent, template by template.
    #[tracing::instrument(level = "debug", skip(self), fields(intent = %self.intent.name))]
    pub fn expand(&self) -> Result<Vec<ExpandedSample>, ReferenceError> {
        let mut samples = Vec::new();
        for template in &self.intent.samples {
            samples.extend(self.expand_template(template)?);
        }
        debug!(
            "Expanded {} templates into {} samples",
            self.intent.samples.len(),
            samples.len()
        );
        Ok(samples)
    }

    /// Like [`SampleExpander::expand`], but refuses to materialize anything
    /// when the intent would produce more than `limit` samples.
    pub fn expand_with_limit(
        &self,
        limit: Option<usize>,
    ) -> crate::InternalResult<Vec<ExpandedSample>> {
        if let Some(limit) = limit {
            let total = self.total_count()?;
            if total > limit as u128 {
                return Err(LimitError::TooManyCases {
                    intent: self.intent.name.clone(),
                    cases: total,
                    limit,
                }
                .into());
            }
        }
        Ok(self.expand()?)
    }

    /// Number of samples the whole intent expands to.
    pub fn total_count(&self) -> Result<u128, ReferenceError> {
        self.intent
            .samples
            .iter()
            .try_fold(0u128, |acc, template| {
                Ok(acc.saturating_add(self.count(template)?))
            })
    }

    /// Number of samples `template` expands to.
    pub fn count(&self, template: &str) -> Result<u128, ReferenceError> {
        distinct_placeholders(template)
            .into_iter()
            .try_fold(1u128, |acc, placeholder| {
                let slot_type = self.resolve(template, placeholder.slot)?;
                Ok(acc.saturating_mul(enumerator::cardinality(slot_type) as u128))
            })
    }

    /// Lazily expand one template.
    ///
    /// Every placeholder is resolved up front, so a reference error is
    /// reported before any sample is produced.
    pub fn expand_template<'a>(
        &'a self,
        template: &'a str,
    ) -> Result<Expansion<'a>, ReferenceError> {
        let positions = distinct_placeholders(template)
            .into_iter()
            .map(|placeholder| {
                let slot_type = self.resolve(template, placeholder.slot)?;
                Ok(Position {
                    placeholder,
                    values: enumerator::enumerate(slot_type),
                })
            })
            .collect::<Result<Vec<_>, ReferenceError>>()?;
        Ok(Expansion::new(template, positions))
    }

    fn resolve(
        &self,
        template: &str,
        slot: &str,
    ) -> Result<&'m crate::model::SlotType, ReferenceError> {
        let type_name = self
            .slot_types
            .get(slot)
            .ok_or_else(|| ReferenceError::UnknownSlot {
                intent: self.intent.name.clone(),
                template: template.to_string(),
                slot: slot.to_string(),
            })?;
        self.model
            .slot_type(type_name)
            .ok_or_else(|| ReferenceError::UnknownType {
                intent: self.intent.name.clone(),
                slot: slot.to_string(),
                type_name: type_name.to_string(),
            })
    }
}

struct Position<'a> {
    placeholder: Placeholder<'a>,
    values: Vec<&'a str>,
}

/// Iterator over the Cartesian product of one template's placeholders.
pub struct Expansion<'a> {
    template: &'a str,
    positions: Vec<Position<'a>>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> Expansion<'a> {
    fn new(template: &'a str, positions: Vec<Position<'a>>) -> Self {
        let exhausted = positions.iter().any(|p| p.values.is_empty());
        let indices = vec![0; positions.len()];
        Self {
            template,
            positions,
            indices,
            exhausted,
        }
    }

    fn current(&self) -> ExpandedSample {
        let mut utterance = self.template.to_string();
        let mut slot_values = SlotValues::new();
        for (position, &index) in self.positions.iter().zip(&self.indices) {
            let value = position.values[index];
            utterance = utterance.replace(position.placeholder.text, value);
            slot_values.insert(
                position.placeholder.slot.to_string(),
                SlotValue {
                    value: value.to_string(),
                },
            );
        }
        ExpandedSample {
            utterance,
            slot_values,
        }
    }

    // Odometer step, last position fastest.
    fn advance(&mut self) {
        for i in (0..self.positions.len()).rev() {
            self.indices[i] += 1;
            if self.indices[i] < self.positions[i].values.len() {
                return;
            }
            self.indices[i] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for Expansion<'_> {
    type Item = ExpandedSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let sample = self.current();
        self.advance();
        Some(sample)
    }
}
