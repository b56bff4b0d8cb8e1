//! Anchor ids for titled content nodes.
//!
//! Titled containers carry an `anchorId` used as a URL fragment. This crate
//! derives anchors from titles ([`normalize`], [`generate`]), keeps them
//! unique across the whole document ([`regenerate`], [`assign_missing`]),
//! checks them before saving ([`validate`]) and re-derives them as an author
//! types, debounced ([`AnchorSession`]).
//!
//! # Example
//!
//! ```
//! use tessera_anchor::{AnchorChange, regenerate, validate};
//! use tessera_content::Document;
//!
//! let mut doc = Document::from_json(r#"[
//!     {"_key": "a", "_type": "section", "title": "FAQ"},
//!     {"_key": "b", "_type": "section", "title": "FAQ"}
//! ]"#).unwrap();
//!
//! assert_eq!(regenerate(&mut doc, "a").unwrap(), AnchorChange::Assigned("faq".to_owned()));
//! assert_eq!(regenerate(&mut doc, "b").unwrap(), AnchorChange::Assigned("faq-2".to_owned()));
//! assert!(validate(&doc).is_ok());
//! ```

mod assign;
mod error;
mod schedule;
mod session;
mod slug;
mod validate;

pub use assign::{AnchorChange, assign_missing, existing_anchors, regenerate};
pub use error::{AnchorError, AnchorViolation};
pub use schedule::{CancelHandle, Scheduler, Task, TokioScheduler};
pub use session::{
    AnchorEvent, AnchorSession, AnchorTiming, DEFAULT_DEBOUNCE, DEFAULT_SAFETY_CEILING,
};
pub use slug::{MAX_ANCHOR_LEN, generate, normalize};
pub use validate::{is_valid_anchor, validate};
