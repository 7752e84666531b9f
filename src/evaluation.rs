//! Evaluation cases: one labeled record per expanded utterance.
//!
//! The serialized form of a case is
//!
//! ```json
//! {
//!   "inputs": { "utterance": "add apple to cart" },
//!   "expected": [
//!     { "intent": { "name": "AddToCartIntent", "slots": { "ItemName": { "value": "apple" } } } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    InternalResult,
    config::EvalConfig,
    expander::{ExpandedSample, SampleExpander, SlotValues},
    model::InteractionModel,
};

pub const BUILTIN_PREFIX: &str = "AMAZON.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCase {
    pub inputs: Inputs,
    pub expected: Vec<Expected>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inputs {
    pub utterance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expected {
    pub intent: ExpectedIntent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedIntent {
    pub name: String,
    #[serde(default)]
    pub slots: SlotValues,
}

impl EvaluationCase {
    pub fn new(intent_name: &str, sample: ExpandedSample) -> Self {
        Self {
            inputs: Inputs {
                utterance: sample.utterance,
            },
            expected: vec![Expected {
                intent: ExpectedIntent {
                    name: intent_name.to_string(),
                    slots: sample.slot_values,
                },
            }],
        }
    }

    pub fn utterance(&self) -> &str {
        &self.inputs.utterance
    }

    /// The expected top intent; cases built here always carry exactly one.
    pub fn expected_intent(&self) -> Option<&ExpectedIntent> {
        self.expected.first().map(|e| &e.intent)
    }
}

/// Wrap each expanded sample of `intent_name` into an evaluation case.
pub fn build(intent_name: &str, samples: Vec<ExpandedSample>) -> Vec<EvaluationCase> {
    samples
        .into_iter()
        .map(|sample| EvaluationCase::new(intent_name, sample))
        .collect()
}

/// Cases for every non built-in intent, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationSuite {
    entries: Vec<(String, Vec<EvaluationCase>)>,
}

impl EvaluationSuite {
    pub fn get(&self, intent_name: &str) -> Option<&[EvaluationCase]> {
        self.entries
            .iter()
            .find(|(name, _)| name == intent_name)
            .map(|(_, cases)| cases.as_slice())
    }

    pub fn contains(&self, intent_name: &str) -> bool {
        self.get(intent_name).is_some()
    }

    pub fn intent_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EvaluationCase])> {
        self.entries
            .iter()
            .map(|(name, cases)| (name.as_str(), cases.as_slice()))
    }

    /// Number of intents in the suite.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_cases(&self) -> usize {
        self.entries.iter().map(|(_, cases)| cases.len()).sum()
    }

    fn push(&mut self, intent_name: String, cases: Vec<EvaluationCase>) {
        // Duplicate intent names merge into the first entry.
        match self.entries.iter_mut().find(|(name, _)| *name == intent_name) {
            Some((_, existing)) => existing.extend(cases),
            None => self.entries.push((intent_name, cases)),
        }
    }
}

/// Expand every intent of `model` with the default configuration.
pub fn build_all(model: &InteractionModel) -> InternalResult<EvaluationSuite> {
    build_all_with(model, &EvalConfig::default())
}

/// Expand every intent of `model`, skipping built-ins and enforcing the
/// configured case limit. The first failing intent aborts the whole build.
#[tracing::instrument(level = "debug", skip(model, config), fields(invocation = %model.invocation_name))]
pub fn build_all_with(
    model: &InteractionModel,
    config: &EvalConfig,
) -> InternalResult<EvaluationSuite> {
    let mut suite = EvaluationSuite::default();
    for intent in &model.intents {
        if intent.is_builtin(&config.builtin_prefix) {
            debug!("Skipping built-in intent {}", intent.name);
            continue;
        }
        let samples =
            SampleExpander::new(intent, model).expand_with_limit(config.max_cases_per_intent)?;
        suite.push(intent.name.clone(), build(&intent.name, samples));
    }
    info!(
        "Built {} evaluation cases for {} intents",
        suite.total_cases(),
        suite.len()
    );
    Ok(suite)
}
