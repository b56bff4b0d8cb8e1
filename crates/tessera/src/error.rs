//! CLI error types.

use tessera_anchor::AnchorError;
use tessera_config::ConfigError;
use tessera_content::ContentError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Anchor(#[from] AnchorError),

    #[error("{0}")]
    Validation(String),
}
