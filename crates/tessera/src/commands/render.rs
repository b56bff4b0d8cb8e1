//! `tessera render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use tessera_config::{CliSettings, Config};
use tessera_renderer::{ContentRenderer, InheritedContext, SpacingPolicy};

use super::{load_config, load_document};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document to render (default: `[source] document` from config).
    document: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Root path of node addresses (overrides config).
    #[arg(long)]
    root_path: Option<String>,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            document: self.document,
            root_path: self.root_path,
        };
        let config = load_config(config_path, &settings)?;
        let (path, document) = load_document(&config)?;

        let result = renderer_from_config(&config).render_document(&document);
        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        match &self.output {
            Some(target) => {
                std::fs::write(target, &result.html)?;
                output.success(&format!(
                    "Rendered {} to {} ({} blocks)",
                    path.display(),
                    target.display(),
                    result.addresses().len()
                ));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(result.html.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

/// Build a renderer from the `[render]` and `[spacing]` sections.
pub(crate) fn renderer_from_config(config: &Config) -> ContentRenderer {
    ContentRenderer::new()
        .with_root_path(config.render.root_path.as_str())
        .with_address_attribute(config.render.address_attribute.as_str())
        .with_spacing(SpacingPolicy::new(
            config.spacing.standard.as_str(),
            config.spacing.large.as_str(),
        ))
        .with_context(InheritedContext::new(
            config.render.default_align,
            config.render.heading_base_level,
        ))
}
