//! `tessera retitle` command implementation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Args;
use tessera_anchor::{AnchorChange, AnchorEvent, AnchorSession, AnchorTiming};
use tessera_config::CliSettings;
use tokio::sync::broadcast::error::RecvError;

use super::{load_config, load_document};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the retitle command.
#[derive(Args)]
pub(crate) struct RetitleArgs {
    /// Key of the section or panel to retitle.
    key: String,

    /// New title. An empty title removes the anchor.
    title: String,

    /// Document to update (default: `[source] document` from config).
    document: Option<PathBuf>,

    /// Save the document afterwards.
    #[arg(long)]
    write: bool,
}

impl RetitleArgs {
    /// Execute the retitle command.
    ///
    /// Runs the edit through an anchor session, exactly as an editor would,
    /// and waits for the debounced regeneration to finish.
    pub(crate) async fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            document: self.document,
            ..Default::default()
        };
        let config = load_config(config_path, &settings)?;
        let (path, document) = load_document(&config)?;

        let timing = AnchorTiming {
            debounce: config.anchors.debounce(),
            safety_ceiling: config.anchors.safety_timeout(),
        };
        let document = Arc::new(Mutex::new(document));
        let session = AnchorSession::new(Arc::clone(&document), timing)?;
        let mut events = session.subscribe();

        session.title_changed(&self.key, &self.title)?;
        let change = loop {
            match events.recv().await {
                Ok(AnchorEvent::Regenerated { key, change }) if key == self.key => break change,
                Ok(AnchorEvent::Failed { key, error }) if key == self.key => return Err(error.into()),
                Ok(AnchorEvent::TimedOut { key }) if key == self.key => {
                    return Err(CliError::Validation(format!(
                        "anchor regeneration for `{key}` timed out"
                    )));
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => {
                    return Err(CliError::Validation("anchor session closed".to_owned()));
                }
            }
        };

        match &change {
            AnchorChange::Assigned(anchor) => output.assignment(&self.key, anchor),
            AnchorChange::Cleared => output.info(&format!("{}: anchor removed", self.key)),
            AnchorChange::Unchanged => output.info(&format!("{}: anchor unchanged", self.key)),
        }

        if self.write {
            let document = document.lock().unwrap();
            document.save(&path)?;
            output.success(&format!("Saved {}", path.display()));
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

    fn anchor_of(path: &Path, key: &str) -> Option<String> {
        Document::load(path)
            .unwrap()
            .find(key)
            .and_then(|n| n.anchor_id())
            .map(str::to_owned)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retitle_assigns_unique_anchor() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), "[anchors]\ndebounce_ms = 50\nsafety_timeout_ms = 1000\n");
        let doc = write_document(
            dir.path(),
            "page.json",
            &json!([
                {"_key": "a", "_type": "section", "title": "FAQ", "anchorId": "faq"},
                {"_key": "b", "_type": "section", "title": "Old", "anchorId": "old"}
            ]),
        );

        RetitleArgs {
            key: "b".to_owned(),
            title: "FAQ".to_owned(),
            document: Some(doc.clone()),
            write: true,
        }
        .execute(Some(&config_path))
        .await
        .unwrap();

        assert_eq!(anchor_of(&doc, "b").as_deref(), Some("faq-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retitle_empty_clears_anchor() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), "");
        let doc = write_document(
            dir.path(),
            "page.json",
            &json!([{"_key": "a", "_type": "section", "title": "Team", "anchorId": "team"}]),
        );

        RetitleArgs {
            key: "a".to_owned(),
            title: String::new(),
            document: Some(doc.clone()),
            write: true,
        }
        .execute(Some(&config_path))
        .await
        .unwrap();

        assert_eq!(anchor_of(&doc, "a"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retitle_unusable_title_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), "");
        let doc = write_document(
            dir.path(),
            "page.json",
            &json!([{"_key": "a", "_type": "section", "title": "Team", "anchorId": "team"}]),
        );

        let err = RetitleArgs {
            key: "a".to_owned(),
            title: "???".to_owned(),
            document: Some(doc.clone()),
            write: true,
        }
        .execute(Some(&config_path))
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Anchor(_)));
        assert_eq!(anchor_of(&doc, "a").as_deref(), Some("team"));
    }
}
