//! # skill-eval: NLU evaluation corpus generation
//!
//! Generates a labeled evaluation corpus from a voice interface's interaction
//! model. For every custom intent, each utterance template is expanded into all
//! the concrete utterances it describes, and each utterance is labeled with the
//! intent and the exact slot values used to produce it.
//!
//! ## Pipeline
//!
//! ```text
//! locale JSON → model → expander (+ enumerator) → evaluation → corpus files
//! ```
//!
//! * [`model`]: parses the document into intents and slot types
//! * [`enumerator`]: lists a slot type's surface values (synonyms, then value)
//! * [`expander`]: Cartesian-product expansion of templates with slot attribution
//! * [`evaluation`]: labeled cases per intent, built-in intents skipped
//! * [`corpus`]: `{ "data": [...] }` files, one per intent
//!
//! Configuration lives in [`config`], errors in [`error`]. The [`debug`] module
//! starts local debug sessions of the skill code and is independent of the
//! pipeline.
//!
//! ## Example
//!
//! ```rust
//! use skill_eval::{evaluation, model::InteractionModel};
//!
//! let model = InteractionModel::from_str(r#"{
//!   "interactionModel": { "languageModel": {
//!     "invocationName": "shop",
//!     "intents": [{ "name": "AddToCartIntent",
//!                   "slots": [{ "name": "ItemName", "type": "ITEM_TYPE" }],
//!                   "samples": ["add {ItemName} to cart"] }],
//!     "types": [{ "name": "ITEM_TYPE", "values": [
//!         { "name": { "value": "apple", "synonyms": ["apples"] } },
//!         { "name": { "value": "banana" } } ] }]
//!   } }
//! }"#).unwrap();
//!
//! let suite = evaluation::build_all(&model).unwrap();
//! let utterances: Vec<_> = suite
//!     .get("AddToCartIntent")
//!     .unwrap()
//!     .iter()
//!     .map(|case| case.utterance())
//!     .collect();
//! assert_eq!(utterances, ["add apples to cart", "add apple to cart", "add banana to cart"]);
//! ```

pub mod config;
pub mod corpus;
pub mod debug;
pub mod enumerator;
pub mod error;
pub mod evaluation;
pub mod expander;
pub mod model;

// Re-exports
pub use error::*;
pub use evaluation::{EvaluationCase, EvaluationSuite};
pub use expander::{ExpandedSample, SlotValue, SlotValues};
pub use model::{Entity, Intent, InteractionModel, SlotDecl, SlotType};
