//! Recursive tree walker.

use tessera_content::{ContentNode, Document};

use crate::address::Address;
use crate::block::{BlockContext, BlockOutput, BlockRegistry, RenderedBlock};
use crate::context::InheritedContext;
use crate::html::write_block;
use crate::spacing::SpacingPolicy;

/// Root path of top-level node addresses.
pub const DEFAULT_ROOT_PATH: &str = "content";
/// HTML attribute carrying the node address.
pub const DEFAULT_ADDRESS_ATTRIBUTE: &str = "data-content-path";

/// Result of rendering a document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Walked top-level blocks, children nested.
    pub blocks: Vec<RenderedBlock>,
    /// Per-node failures that were contained (malformed nodes).
    pub warnings: Vec<String>,
}

impl RenderResult {
    /// Addresses of every walked node in pre-order.
    #[must_use]
    pub fn addresses(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(RenderedBlock::iter)
            .map(|block| block.address.as_str())
            .collect()
    }
}

/// Content tree renderer.
///
/// Walks the node list depth-first, dispatching every node through the
/// [`BlockRegistry`] and wrapping its output with the node's address and
/// spacing class. Configuration is fixed at construction; rendering only
/// reads the document.
///
/// # Example
///
/// ```
/// use tessera_content::Document;
/// use tessera_renderer::{ContentRenderer, SpacingPolicy};
///
/// let renderer = ContentRenderer::new()
///     .with_root_path("pageBuilder")
///     .with_spacing(SpacingPolicy::new("mb-8", "mb-16"));
///
/// let doc = Document::from_json(r#"[{"_key": "h", "_type": "hero", "heading": "Hi"}]"#).unwrap();
/// let result = renderer.render_document(&doc);
/// assert_eq!(result.addresses(), vec![r#"pageBuilder[_key=="h"]"#]);
/// ```
pub struct ContentRenderer {
    registry: BlockRegistry,
    spacing: SpacingPolicy,
    root_path: String,
    address_attribute: String,
    context: InheritedContext,
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRenderer {
    /// Renderer with the built-in blocks and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: BlockRegistry::with_builtins(),
            spacing: SpacingPolicy::default(),
            root_path: DEFAULT_ROOT_PATH.to_owned(),
            address_attribute: DEFAULT_ADDRESS_ATTRIBUTE.to_owned(),
            context: InheritedContext::default(),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: BlockRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: SpacingPolicy) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the root path prefixed to top-level addresses.
    #[must_use]
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = root_path.into();
        self
    }

    /// Set the HTML attribute that carries addresses.
    #[must_use]
    pub fn with_address_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.address_attribute = attribute.into();
        self
    }

    /// Set the root inherited context.
    #[must_use]
    pub fn with_context(mut self, context: InheritedContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Render a whole document from the root context.
    #[must_use]
    pub fn render_document(&self, document: &Document) -> RenderResult {
        let mut warnings = Vec::new();
        let prefix = Address::root(self.root_path.as_str());
        let blocks = self.walk_inner(&document.content, &self.context, &prefix, &mut warnings);

        let mut html = String::new();
        self.write_blocks(&blocks, &mut html);

        tracing::debug!(
            blocks = blocks.len(),
            warnings = warnings.len(),
            "Rendered document"
        );
        RenderResult {
            html,
            blocks,
            warnings,
        }
    }

    /// Walk a node list under `ctx`, addressing nodes from `prefix`.
    ///
    /// Warnings for malformed nodes are logged; use
    /// [`render_document`](Self::render_document) to collect them.
    #[must_use]
    pub fn walk(
        &self,
        nodes: &[ContentNode],
        ctx: &InheritedContext,
        prefix: &Address,
    ) -> Vec<RenderedBlock> {
        let mut warnings = Vec::new();
        self.walk_inner(nodes, ctx, prefix, &mut warnings)
    }

    fn walk_inner(
        &self,
        nodes: &[ContentNode],
        ctx: &InheritedContext,
        prefix: &Address,
        warnings: &mut Vec<String>,
    ) -> Vec<RenderedBlock> {
        nodes
            .iter()
            .enumerate()
            .map(|(i, node)| self.walk_node(node, nodes.get(i + 1), ctx, prefix, warnings))
            .collect()
    }

    fn walk_node(
        &self,
        node: &ContentNode,
        next: Option<&ContentNode>,
        ctx: &InheritedContext,
        prefix: &Address,
        warnings: &mut Vec<String>,
    ) -> RenderedBlock {
        let address = prefix.child(node.key());
        let align = ctx.resolve_align(node);
        let mut block = RenderedBlock {
            key: node.key().to_owned(),
            type_name: node.type_name().to_owned(),
            kind: node.kind(),
            address,
            align,
            spacing_class: self.spacing.spacing_class(node, next).map(str::to_owned),
            output: BlockOutput::Empty,
            children: Vec::new(),
        };

        if let ContentNode::Invalid(invalid) = node {
            tracing::warn!(
                address = %block.address,
                type_name = %invalid.type_name,
                reason = %invalid.reason,
                "Skipping malformed content node"
            );
            warnings.push(format!("{}: {}", block.address, invalid.reason));
            return block;
        }

        let mut child_warnings = Vec::new();
        let mut children_html = None;
        if let (Some(children), Some(field)) = (node.children(), node.nested_field()) {
            let child_ctx = ctx.for_children(align, node.title().is_some());
            let child_prefix = block.address.nested(field);
            block.children = self.walk_inner(children, &child_ctx, &child_prefix, &mut child_warnings);

            let mut html = String::new();
            self.write_blocks(&block.children, &mut html);
            children_html = Some(html);
        }

        let block_ctx = BlockContext {
            align,
            address: &block.address,
            heading_level: node.has_title_field().then(|| ctx.heading_level(0)),
            inherited: ctx,
            children_html: children_html.as_deref(),
        };

        match self.registry.render(node, &block_ctx) {
            Ok(output) => {
                if let BlockOutput::Placeholder { type_name } = &output {
                    tracing::debug!(address = %block.address, type_name = %type_name, "No renderer for block type");
                }
                block.output = output;
                warnings.append(&mut child_warnings);
            }
            Err(err) => {
                tracing::warn!(address = %block.address, error = %err, "Block failed to render");
                warnings.push(format!("{}: {err}", block.address));
                block.children.clear();
            }
        }
        block
    }

    fn write_blocks(&self, blocks: &[RenderedBlock], out: &mut String) {
        for block in blocks {
            write_block(block, &self.address_attribute, out);
        }
    }
}
