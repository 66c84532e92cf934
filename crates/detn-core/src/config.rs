//! Run configuration for the batch driver, loadable from a JSON file.
//!
//! Every field is optional in the file. Missing fields keep the defaults:
//! column-major storage, abort on the first singular matrix, serial execution.

use crate::domain::{DetnError, ElementOrder, ExecutionMode, SingularMatrixPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE_NAME: &str = "detn.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DeterminantConfig {
    pub element_order: ElementOrder,
    pub singular_policy: SingularMatrixPolicy,
    pub execution_mode: ExecutionMode,
}

impl DeterminantConfig {
    pub fn with_element_order(mut self, element_order: ElementOrder) -> Self {
        self.element_order = element_order;
        self
    }

    pub fn with_singular_policy(mut self, singular_policy: SingularMatrixPolicy) -> Self {
        self.singular_policy = singular_policy;
        self
    }

    pub fn with_execution_mode(mut self, execution_mode: ExecutionMode) -> Self {
        self.execution_mode = execution_mode;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read determinant config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse determinant config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<ConfigError> for DetnError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Read { .. } => DetnError::io_system("IO.CONFIG_READ", error.to_string()),
            ConfigError::Parse { .. } => {
                DetnError::input_validation("INPUT.CONFIG_PARSE", error.to_string())
            }
        }
    }
}

pub fn load_determinant_config(
    config_path: impl AsRef<Path>,
) -> Result<DeterminantConfig, ConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}
