//! On-disk corpus: one `<IntentName>.json` per intent holding
//! `{ "data": [EvaluationCase, ...] }`, pretty-printed with two-space indent.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, InternalResult,
    error::ConfigurationError,
    evaluation::{EvaluationCase, EvaluationSuite},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusFile {
    pub data: Vec<EvaluationCase>,
}

pub fn file_path(dir: &Path, intent_name: &str) -> PathBuf {
    dir.join(format!("{}.json", intent_name))
}

pub fn to_json_string(cases: &[EvaluationCase]) -> InternalResult<String> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        data: &'a [EvaluationCase],
    }
    Ok(serde_json::to_string_pretty(&Borrowed { data: cases })?)
}

/// Write every intent of `suite` under `dir`, creating it if needed.
///
/// The suite is fully built before this is called, so a failed expansion never
/// leaves a partial corpus behind.
#[tracing::instrument(level = "debug", skip(suite), err)]
pub fn write_suite(dir: &Path, suite: &EvaluationSuite) -> InternalResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| Error::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(suite.len());
    for (intent_name, cases) in suite.iter() {
        let path = file_path(dir, intent_name);
        let mut json = to_json_string(cases)?;
        json.push('\n');
        fs::write(&path, json).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote {} cases to {}", cases.len(), path.display());
        written.push(path);
    }
    info!("Wrote {} corpus files to {}", written.len(), dir.display());
    Ok(written)
}

pub fn read_cases<P: AsRef<Path>>(path: P) -> Result<Vec<EvaluationCase>, ConfigurationError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CorpusFile = serde_json::from_str(&content)?;
    Ok(file.data)
}
