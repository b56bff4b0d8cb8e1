//! Built-in block renderers.
//!
//! Markup is deliberately plain: concrete styling belongs to the site's CSS.

use std::fmt::Write;

use pulldown_cmark::{Options, Parser};
use tessera_content::{BlockKind, ContentNode};

use super::{BlockContext, BlockError, BlockRenderer};
use crate::html::escape_html;

/// Require a non-blank optional field.
fn required<'a>(
    value: Option<&'a String>,
    kind: BlockKind,
    field: &'static str,
) -> Result<&'a str, BlockError> {
    value
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or(BlockError::missing(kind, field))
}

/// Optional field, treating blank as absent.
fn optional(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

fn id_attr(anchor_id: Option<&String>) -> String {
    optional(anchor_id).map_or_else(String::new, |id| format!(r#" id="{}""#, escape_html(id)))
}

/// `section`: titled container with optional subtitle.
pub struct SectionBlock;

impl BlockRenderer for SectionBlock {
    fn render(&self, node: &ContentNode, ctx: &BlockContext<'_>) -> Result<String, BlockError> {
        let ContentNode::Section(section) = node else {
            return Err(BlockError::kind_mismatch(BlockKind::Section, node));
        };
        let title = required(section.title.as_ref(), BlockKind::Section, "title")?;
        let level = ctx.heading_level_or_base();

        let mut out = String::new();
        let _ = write!(
            out,
            r#"<section class="section"{}><h{level} class="section-title">{}</h{level}>"#,
            id_attr(section.anchor_id.as_ref()),
            escape_html(title)
        );
        if let Some(subtitle) = optional(section.subtitle.as_ref()) {
            let _ = write!(out, r#"<p class="section-subtitle">{}</p>"#, escape_html(subtitle));
        }
        let _ = write!(out, r#"<div class="section-content">{}</div></section>"#, ctx.children());
        Ok(out)
    }
}

/// `panel`: container whose title is optional.
pub struct PanelBlock;

impl BlockRenderer for PanelBlock {
    fn render(&self, node: &ContentNode, ctx: &BlockContext<'_>) -> Result<String, BlockError> {
        let ContentNode::Panel(panel) = node else {
            return Err(BlockError::kind_mismatch(BlockKind::Panel, node));
        };

        let mut out = String::new();
        let _ = write!(out, r#"<div class="panel"{}>"#, id_attr(panel.anchor_id.as_ref()));
        if let Some(title) = optional(panel.title.as_ref()) {
            let level = ctx.heading_level_or_base();
            let _ = write!(out, r#"<h{level} class="panel-title">{}</h{level}>"#, escape_html(title));
        }
        out.push_str(ctx.children());
        out.push_str("</div>");
        Ok(out)
    }
}

/// `hero`: the page banner. Always carries the page `<h1>`.
pub struct HeroBlock;

impl BlockRenderer for HeroBlock {
    fn render(&self, node: &ContentNode, _ctx: &BlockContext<'_>) -> Result<String, BlockError> {
        let ContentNode::Hero(hero) = node else {
            return Err(BlockError::kind_mismatch(BlockKind::Hero, node));
        };
        let heading = required(hero.heading.as_ref(), BlockKind::Hero, "heading")?;

        let mut out = String::new();
        let _ = write!(out, r#"<header class="hero"><h1>{}</h1>"#, escape_html(heading));
        if let Some(tagline) = optional(hero.tagline.as_ref()) {
            let _ = write!(out, r#"<p class="hero-tagline">{}</p>"#, escape_html(tagline));
        }
        out.push_str("</header>");
        Ok(out)
    }
}

/// `richText`: markdown body.
pub struct RichTextBlock;

impl BlockRenderer for RichTextBlock {
    fn render(&self, node: &ContentNode, _ctx: &BlockContext<'_>) -> Result<String, BlockError> {
        let ContentNode::RichText(text) = node else {
            return Err(BlockError::kind_mismatch(BlockKind::RichText, node));
        };
        let body = required(text.body.as_ref(), BlockKind::RichText, "body")?;

        let parser = Parser::new_ext(body, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
        let mut out = String::from(r#"<div class="rich-text">"#);
        pulldown_cmark::html::push_html(&mut out, parser);
        out.push_str("</div>");
        Ok(out)
    }
}

/// `image`: figure with optional caption.
pub struct ImageBlock;

impl BlockRenderer for ImageBlock {
    fn render(&self, node: &ContentNode, _ctx: &BlockContext<'_>) -> Result<String, BlockError> {
        let ContentNode::Image(image) = node else {
            return Err(BlockError::kind_mismatch(BlockKind::Image, node));
        };
        let src = required(image.src.as_ref(), BlockKind::Image, "src")?;
        let alt = optional(image.alt.as_ref()).unwrap_or_default();

        let mut out = String::new();
        let _ = write!(
            out,
            r#"<figure class="image"><img src="{}" alt="{}" loading="lazy">"#,
            escape_html(src),
            escape_html(alt)
        );
        if let Some(caption) = optional(image.caption.as_ref()) {
            let _ = write!(out, "<figcaption>{}</figcaption>", escape_html(caption));
        }
        out.push_str("</figure>");
        Ok(out)
    }
}

/// `callToAction`: a prominent link.
pub struct CallToActionBlock;

impl BlockRenderer for CallToActionBlock {
    fn render(&self, node: &ContentNode, _ctx: &BlockContext<'_>) -> Result<String, BlockError> {
        let ContentNode::CallToAction(cta) = node else {
            return Err(BlockError::kind_mismatch(BlockKind::CallToAction, node));
        };
        let label = required(cta.label.as_ref(), BlockKind::CallToAction, "label")?;
        let href = required(cta.href.as_ref(), BlockKind::CallToAction, "href")?;

        Ok(format!(
            r#"<a class="cta" href="{}">{}</a>"#,
            escape_html(href),
            escape_html(label)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::context::InheritedContext;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tessera_content::TextAlign;

    fn render_with<R: BlockRenderer>(
        renderer: &R,
        value: serde_json::Value,
        heading_level: Option<u8>,
        children_html: Option<&str>,
    ) -> Result<String, BlockError> {
        let node = ContentNode::from_value(value);
        let address = Address::root("content").child(node.key());
        let inherited = InheritedContext::default();
        let ctx = BlockContext {
            align: TextAlign::Left,
            address: &address,
            heading_level,
            inherited: &inherited,
            children_html,
        };
        renderer.render(&node, &ctx)
    }

    #[test]
    fn test_section_with_anchor_and_subtitle() {
        let html = render_with(
            &SectionBlock,
            json!({"_key": "s", "_type": "section", "title": "Q & A", "subtitle": "Ask", "anchorId": "q-a"}),
            Some(3),
            Some("<p>child</p>"),
        )
        .unwrap();
        assert_eq!(
            html,
            r#"<section class="section" id="q-a"><h3 class="section-title">Q &amp; A</h3><p class="section-subtitle">Ask</p><div class="section-content"><p>child</p></div></section>"#
        );
    }

    #[test]
    fn test_section_without_title_fails() {
        let err = render_with(
            &SectionBlock,
            json!({"_key": "s", "_type": "section", "title": "  "}),
            Some(2),
            None,
        )
        .unwrap_err();
        assert_eq!(err, BlockError::missing(BlockKind::Section, "title"));
    }

    #[test]
    fn test_panel_without_title() {
        let html = render_with(
            &PanelBlock,
            json!({"_key": "p", "_type": "panel"}),
            Some(2),
            Some("x"),
        )
        .unwrap();
        assert_eq!(html, r#"<div class="panel">x</div>"#);
    }

    #[test]
    fn test_panel_with_title_uses_heading_level() {
        let html = render_with(
            &PanelBlock,
            json!({"_key": "p", "_type": "panel", "title": "Team"}),
            Some(4),
            None,
        )
        .unwrap();
        assert_eq!(html, r#"<div class="panel"><h4 class="panel-title">Team</h4></div>"#);
    }

    #[test]
    fn test_hero() {
        let html = render_with(
            &HeroBlock,
            json!({"_key": "h", "_type": "hero", "heading": "Welcome", "tagline": "Hi"}),
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            html,
            r#"<header class="hero"><h1>Welcome</h1><p class="hero-tagline">Hi</p></header>"#
        );
    }

    #[test]
    fn test_rich_text_markdown() {
        let html = render_with(
            &RichTextBlock,
            json!({"_key": "t", "_type": "richText", "body": "Some **bold** text"}),
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            html,
            "<div class=\"rich-text\"><p>Some <strong>bold</strong> text</p>\n</div>"
        );
    }

    #[test]
    fn test_image_escapes_attributes() {
        let html = render_with(
            &ImageBlock,
            json!({"_key": "i", "_type": "image", "src": "https://cdn.example/a.png?w=1&h=2", "alt": "A \"quote\""}),
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            html,
            r#"<figure class="image"><img src="https://cdn.example/a.png?w=1&amp;h=2" alt="A &quot;quote&quot;" loading="lazy"></figure>"#
        );
    }

    #[test]
    fn test_cta_requires_href() {
        let err = render_with(
            &CallToActionBlock,
            json!({"_key": "c", "_type": "callToAction", "label": "Go"}),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err, BlockError::missing(BlockKind::CallToAction, "href"));
    }

    #[test]
    fn test_kind_mismatch() {
        let err = render_with(
            &HeroBlock,
            json!({"_key": "i", "_type": "image", "src": "a.png"}),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BlockError::KindMismatch {
                expected: BlockKind::Hero,
                found: "image".to_owned()
            }
        );
    }
}
