//! `tessera anchors` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use tessera_config::CliSettings;

use super::{load_config, load_document};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the anchors command.
#[derive(Args)]
pub(crate) struct AnchorsArgs {
    /// Document to update (default: `[source] document` from config).
    document: Option<PathBuf>,

    /// Save the document after assigning anchors.
    #[arg(long)]
    write: bool,
}

impl AnchorsArgs {
    /// Execute the anchors command.
    ///
    /// Assigns an anchor to every titled node that lacks one. Without
    /// `--write` this is a dry run.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            document: self.document,
            ..Default::default()
        };
        let config = load_config(config_path, &settings)?;
        let (path, mut document) = load_document(&config)?;

        let assigned = tessera_anchor::assign_missing(&mut document);
        if assigned.is_empty() {
            output.info("All titled nodes already have anchors");
            return Ok(());
        }
        for (key, anchor) in &assigned {
            output.assignment(key, anchor);
        }

        if self.write {
            document.save(&path)?;
            output.success(&format!(
                "Assigned {} anchor(s) in {}",
                assigned.len(),
                path.display()
            ));
        } else {
            output.warning("Dry run: pass --write to save");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_util::{write_config, write_document};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tessera_content::Document;

    fn anchors(path: &Path) -> Vec<Option<String>> {
        Document::load(path)
            .unwrap()
            .iter()
            .map(|n| n.anchor_id().map(str::to_owned))
            .collect()
    }

    #[test]
    fn test_write_assigns_unique_anchors() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), "");
        let doc = write_document(
            dir.path(),
            "page.json",
            &json!([
                {"_key": "a", "_type": "section", "title": "FAQ"},
                {"_key": "b", "_type": "section", "title": "FAQ"}
            ]),
        );
        AnchorsArgs {
            document: Some(doc.clone()),
            write: true,
        }
        .execute(Some(&config_path))
        .unwrap();

        assert_eq!(
            anchors(&doc),
            vec![Some("faq".to_owned()), Some("faq-2".to_owned())]
        );
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), "");
        let doc = write_document(
            dir.path(),
            "page.json",
            &json!([{"_key": "a", "_type": "section", "title": "Team"}]),
        );
        AnchorsArgs {
            document: Some(doc.clone()),
            write: false,
        }
        .execute(Some(&config_path))
        .unwrap();

        assert_eq!(anchors(&doc), vec![None]);
    }
}
