//! # Interaction Model
//!
//! Typed view over one locale's interaction-model document. Only the parts the
//! corpus generator needs are read:
//!
//! ```text
//! interactionModel.languageModel.invocationName : string
//! interactionModel.languageModel.intents[]      : { name, samples[], slots[ {name, type} ] }
//! interactionModel.languageModel.types[]        : { name, values[ { id, name: { value, synonyms[] } } ] }
//! ```
//!
//! Declaration order of intents, slots, samples, types, entities and synonyms is
//! preserved, since the expansion order of the generated corpus depends on it.

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ConfigurationError;

const LANGUAGE_MODEL_PATH: [&str; 2] = ["interactionModel", "languageModel"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: Vec<SlotDecl>,
    #[serde(default)]
    pub samples: Vec<String>,
}

impl Intent {
    /// Declared type of `slot`, first declaration wins.
    pub fn slot_type_name(&self, slot: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|decl| decl.name == slot)
            .map(|decl| decl.type_name.as_str())
    }

    pub fn is_builtin(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A named enumeration of slot fillers, custom or built-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotType {
    pub name: String,
    #[serde(rename = "values", default)]
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntity", into = "RawEntity")]
pub struct Entity {
    pub id: Option<String>,
    pub value: String,
    pub synonyms: Vec<String>,
}

impl Entity {
    pub fn new<S: Into<String>>(value: S, synonyms: &[&str]) -> Self {
        Self {
            id: None,
            value: value.into(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: RawEntityName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEntityName {
    value: String,
    #[serde(default)]
    synonyms: Vec<String>,
}

impl From<RawEntity> for Entity {
    fn from(raw: RawEntity) -> Self {
        Self {
            id: raw.id,
            value: raw.name.value,
            synonyms: raw.name.synonyms,
        }
    }
}

impl From<Entity> for RawEntity {
    fn from(entity: Entity) -> Self {
        Self {
            id: entity.id,
            name: RawEntityName {
                value: entity.value,
                synonyms: entity.synonyms,
            },
        }
    }
}

/// Parsed, immutable interaction model for a single locale.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionModel {
    pub version: Option<String>,
    pub invocation_name: String,
    pub intents: Vec<Intent>,
    pub types: Vec<SlotType>,
    type_index: HashMap<String, usize>,
    intent_index: HashMap<String, usize>,
}

impl InteractionModel {
    pub fn new(
        version: Option<String>,
        invocation_name: String,
        intents: Vec<Intent>,
        types: Vec<SlotType>,
    ) -> Self {
        let mut type_index = HashMap::with_capacity(types.len());
        for (i, t) in types.iter().enumerate() {
            type_index.entry(t.name.clone()).or_insert(i);
        }
        let mut intent_index = HashMap::with_capacity(intents.len());
        for (i, intent) in intents.iter().enumerate() {
            intent_index.entry(intent.name.clone()).or_insert(i);
        }
        Self {
            version,
            invocation_name,
            intents,
            types,
            type_index,
            intent_index,
        }
    }

    /// Build the model from a parsed JSON document.
    ///
    /// Fails when `invocationName`, `intents` or `types` is absent under
    /// `interactionModel.languageModel`.
    #[tracing::instrument(level = "debug", skip(document), err)]
    pub fn parse(document: &Value) -> Result<Self, ConfigurationError> {
        let version = document
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string);

        let invocation_name = section(document, "invocationName")?
            .as_str()
            .ok_or_else(|| ConfigurationError::MissingSection {
                path: section_path("invocationName"),
            })?
            .to_string();
        let intents: Vec<Intent> = Vec::deserialize(section(document, "intents")?)?;
        let types: Vec<SlotType> = Vec::deserialize(section(document, "types")?)?;

        debug!(
            "Parsed interaction model '{}': {} intents, {} types",
            invocation_name,
            intents.len(),
            types.len()
        );

        Ok(Self::new(version, invocation_name, intents, types))
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigurationError> {
        let document: Value = serde_json::from_str(s)?;
        Self::parse(&document)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    pub fn intent(&self, name: &str) -> Option<&Intent> {
        self.intent_index.get(name).map(|&i| &self.intents[i])
    }

    pub fn slot_type(&self, name: &str) -> Option<&SlotType> {
        self.type_index.get(name).map(|&i| &self.types[i])
    }
}

fn section<'a>(document: &'a Value, key: &str) -> Result<&'a Value, ConfigurationError> {
    LANGUAGE_MODEL_PATH
        .iter()
        .try_fold(document, |node, segment| node.get(segment))
        .and_then(|lm| lm.get(key))
        .filter(|v| !v.is_null())
        .ok_or_else(|| ConfigurationError::MissingSection {
            path: section_path(key),
        })
}

fn section_path(key: &str) -> String {
    format!("{}.{}", LANGUAGE_MODEL_PATH.join("."), key)
}
