use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{error::ConfigurationError, evaluation::BUILTIN_PREFIX};

pub const RESOURCES_FILE: &str = "ask-resources.json";
pub const HOSTED_DEPLOYER: &str = "@ask-cli/hosted-skill-deployer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default = "default_profile")]
    pub profile: String,

    /// Skill package directory; resolved from the resources file when unset.
    #[serde(default)]
    pub skill_package: Option<PathBuf>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub max_cases_per_intent: Option<usize>,

    #[serde(default = "default_builtin_prefix")]
    pub builtin_prefix: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            profile: default_profile(),
            skill_package: None,
            output_dir: default_output_dir(),
            max_cases_per_intent: None,
            builtin_prefix: default_builtin_prefix(),
        }
    }
}

impl EvalConfig {
    /// Path of the locale's interaction model inside `skill_package`.
    pub fn model_path(&self, skill_package: &Path) -> PathBuf {
        skill_package
            .join("interactionModels")
            .join("custom")
            .join(format!("{}.json", self.locale))
    }
}

/// Per-profile project settings read from `ask-resources.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default)]
    pub profiles: HashMap<String, ProfileResources>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResources {
    #[serde(default)]
    pub skill_metadata: Option<SourceConfig>,
    #[serde(default)]
    pub code: HashMap<String, SourceConfig>,
    #[serde(default)]
    pub skill_infrastructure: Option<InfrastructureConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureConfig {
    #[serde(rename = "type", default)]
    pub deployer: Option<String>,
    #[serde(default)]
    pub user_config: UserConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub handler: Option<String>,
}

impl ResourcesConfig {
    pub fn load<P: AsRef<Path>>(project_dir: P) -> Result<Self, ConfigurationError> {
        from_file(project_dir.as_ref().join(RESOURCES_FILE))
    }

    pub fn profile(&self, profile: &str) -> Result<&ProfileResources, ConfigurationError> {
        self.profiles.get(profile).ok_or_else(|| {
            ConfigurationError::InvalidResources(format!("profile {} not found", profile))
        })
    }

    pub fn skill_metadata_src(&self, profile: &str) -> Result<PathBuf, ConfigurationError> {
        self.profile(profile)?
            .skill_metadata
            .as_ref()
            .and_then(|m| non_blank(m.src.as_deref()))
            .map(PathBuf::from)
            .ok_or_else(|| {
                ConfigurationError::InvalidResources(format!(
                    "skillMetadata.src missing for profile {}",
                    profile
                ))
            })
    }

    pub fn code_src(&self, profile: &str, region: &str) -> Result<PathBuf, ConfigurationError> {
        self.profile(profile)?
            .code
            .get(region)
            .and_then(|c| non_blank(c.src.as_deref()))
            .map(PathBuf::from)
            .ok_or_else(|| {
                ConfigurationError::InvalidResources(format!(
                    "Invalid code setting in region {}. \"src\" must be set",
                    region
                ))
            })
    }

    pub fn is_hosted(&self, profile: &str) -> bool {
        self.profiles
            .get(profile)
            .and_then(|p| p.skill_infrastructure.as_ref())
            .and_then(|infra| infra.deployer.as_deref())
            == Some(HOSTED_DEPLOYER)
    }

    pub fn user_config(&self, profile: &str) -> Option<&UserConfig> {
        self.profiles
            .get(profile)
            .and_then(|p| p.skill_infrastructure.as_ref())
            .map(|infra| &infra.user_config)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(
    path: P,
) -> Result<T, ConfigurationError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, ConfigurationError> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("test").join("eval")
}

fn default_builtin_prefix() -> String {
    BUILTIN_PREFIX.to_string()
}
