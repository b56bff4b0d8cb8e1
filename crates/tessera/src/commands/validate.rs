//! `tessera validate` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use tessera_config::CliSettings;

use super::{load_config, load_document};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the validate command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    /// Document to check (default: `[source] document` from config).
    document: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command.
    ///
    /// Prints one line per anchor violation and fails if there are any.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            document: self.document,
            ..Default::default()
        };
        let config = load_config(config_path, &settings)?;
        let (path, document) = load_document(&config)?;

        match tessera_anchor::validate(&document) {
            Ok(()) => {
                output.success(&format!("{}: anchors are valid", path.display()));
                Ok(())
            }
            Err(violations) => {
                for violation in &violations {
                    output.error(&violation.to_string());
                }
                Err(CliError::Validation(format!(
                    "{}: {} anchor violation(s)",
                    path.display(),
                    violations.len()
                )))
            }
        }
    }
}
