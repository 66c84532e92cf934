use super::CliError;
use anyhow::Context;
use detn_core::config::{DEFAULT_CONFIG_FILE_NAME, load_determinant_config};
use detn_core::serialization::{ArrayDocument, parse_array_document};
use detn_core::{DeterminantConfig, DetnError, ElementOrder, ExecutionMode, SingularMatrixPolicy};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub(super) const LOG_ENV_VAR: &str = "DETN_LOG";

/// Stderr only; stdout carries result documents.
pub(super) fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(clap::Args, Debug, Default)]
pub(super) struct ConfigOverrides {
    /// JSON run config; `./detn.json` is used when present and this is omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Element order of the input data
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// What to do with a matrix that has an all-zero row
    #[arg(long = "on-singular", value_enum)]
    on_singular: Option<SingularArg>,

    /// Compute matrices on the rayon thread pool
    #[arg(long)]
    parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum OrderArg {
    ColumnMajor,
    RowMajor,
}

impl From<OrderArg> for ElementOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::ColumnMajor => Self::ColumnMajor,
            OrderArg::RowMajor => Self::RowMajor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum SingularArg {
    Abort,
    Nan,
}

impl From<SingularArg> for SingularMatrixPolicy {
    fn from(value: SingularArg) -> Self {
        match value {
            SingularArg::Abort => Self::Abort,
            SingularArg::Nan => Self::RecordNan,
        }
    }
}

/// File values first, then command-line flags on top.
pub(super) fn resolve_config(overrides: &ConfigOverrides) -> Result<DeterminantConfig, CliError> {
    let config_path = match &overrides.config {
        Some(path) => Some(path.clone()),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE_NAME);
            default_path.is_file().then_some(default_path)
        }
    };

    let mut config = match &config_path {
        Some(path) => load_determinant_config(path)
            .map_err(|error| CliError::Compute(DetnError::from(error)))?,
        None => DeterminantConfig::default(),
    };

    if let Some(order) = overrides.order {
        config = config.with_element_order(order.into());
    }
    if let Some(policy) = overrides.on_singular {
        config = config.with_singular_policy(policy.into());
    }
    if overrides.parallel {
        config = config.with_execution_mode(ExecutionMode::Parallel);
    }

    tracing::debug!(
        config_file = ?config_path,
        order = %config.element_order,
        policy = %config.singular_policy,
        mode = %config.execution_mode,
        "resolved run config"
    );
    Ok(config)
}

/// An explicit `--order` loses to the document's own `order`; say so.
pub(super) fn warn_on_order_conflict(overrides: &ConfigOverrides, document: &ArrayDocument) {
    if let (Some(flag), Some(declared)) = (overrides.order, document.order) {
        let requested = ElementOrder::from(flag);
        if requested != declared {
            tracing::warn!(
                flag_order = %requested,
                document_order = %declared,
                "--order is ignored because the input document declares its own order"
            );
        }
    }
}

pub(super) fn read_text_input(path: &Path, what: &str) -> Result<String, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} '{}'", path.display()))?;
    Ok(source)
}

pub(super) fn read_array_document(path: &Path) -> Result<ArrayDocument, CliError> {
    let source = read_text_input(path, "input array document")?;
    parse_array_document(&source).map_err(CliError::Compute)
}
