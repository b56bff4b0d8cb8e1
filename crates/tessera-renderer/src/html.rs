//! HTML helpers shared by the walker and the built-in blocks.

use std::fmt::Write;

use tessera_content::TextAlign;

use crate::block::{BlockOutput, RenderedBlock};

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn align_class(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "text-left",
        TextAlign::Center => "text-center",
        TextAlign::Right => "text-right",
    }
}

/// Diagnostic markup for a node with no renderer.
pub(crate) fn write_placeholder(type_name: &str, out: &mut String) {
    let label = if type_name.is_empty() {
        "(none)"
    } else {
        type_name
    };
    let _ = write!(
        out,
        r#"<div class="block-unknown" role="note">Unknown block type: <code>{}</code></div>"#,
        escape_html(label)
    );
}

/// Write one block inside its addressing wrapper. Empty outputs write nothing.
pub(crate) fn write_block(block: &RenderedBlock, address_attribute: &str, out: &mut String) {
    let mut inner = String::new();
    match &block.output {
        BlockOutput::Html(html) => inner.push_str(html),
        BlockOutput::Placeholder { type_name } => write_placeholder(type_name, &mut inner),
        BlockOutput::Empty => return,
    }

    let _ = write!(out, r#"<div class="block {}"#, align_class(block.align));
    if let Some(spacing) = &block.spacing_class {
        let _ = write!(out, " {}", escape_html(spacing));
    }
    let _ = write!(
        out,
        r#"" {address_attribute}="{}">{inner}</div>"#,
        escape_html(block.address.as_str())
    );
}
