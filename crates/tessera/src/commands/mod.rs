//! CLI command implementations.

pub(crate) mod anchors;
pub(crate) mod render;
pub(crate) mod retitle;
pub(crate) mod validate;

pub(crate) use anchors::AnchorsArgs;
pub(crate) use render::RenderArgs;
pub(crate) use retitle::RetitleArgs;
pub(crate) use validate::ValidateArgs;

use std::path::{Path, PathBuf};

use tessera_config::{CliSettings, Config};
use tessera_content::Document;

use crate::error::CliError;

/// Load config, with a positional document argument taking precedence.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    settings: &CliSettings,
) -> Result<Config, CliError> {
    let config = Config::load(config_path, Some(settings))?;
    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "Loaded configuration");
    }
    Ok(config)
}

/// Resolve and load the document the command operates on.
pub(crate) fn load_document(config: &Config) -> Result<(PathBuf, Document), CliError> {
    let path = config.source_resolved.document.clone().ok_or_else(|| {
        CliError::Validation(
            "no document given: pass a path or set [source] document in tessera.toml".to_owned(),
        )
    })?;
    let document = Document::load(&path)?;
    Ok((path, document))
}
