//! The extension bundle record (§6): everything a user extension
//! registers with an [`crate::builder::EngineBuilder`] — block/span
//! parsers, directives, rewrite hooks, and root-level pre/post-processing.

use std::collections::HashMap;
use std::rc::Rc;

use litmark_ast::{Block, DocumentCursor, Phase, Span};
use litmark_combinators::CharSet;
use litmark_combinators::Parser;
use litmark_directives::{Invocation, RecursiveParser, SeparatorSpec};

/// Builds a block parser once the engine's recursive handle exists, so the
/// parser's own closure can call back into the host to parse nested
/// content (e.g. a block quote's children).
pub struct BlockParserBuilder {
    pub starts: CharSet,
    pub low_precedence: bool,
    pub build: Rc<dyn Fn(Rc<dyn RecursiveParser>) -> Parser<Block>>,
}

impl BlockParserBuilder {
    pub fn new(
        starts: CharSet,
        build: impl Fn(Rc<dyn RecursiveParser>) -> Parser<Block> + 'static,
    ) -> Self {
        BlockParserBuilder { starts, low_precedence: false, build: Rc::new(build) }
    }

    /// Marks this parser as low precedence (§4.7): tried only after every
    /// normal-precedence candidate sharing a start character has failed.
    pub fn low_precedence(mut self) -> Self {
        self.low_precedence = true;
        self
    }
}

/// Span counterpart of [`BlockParserBuilder`] — span parsers may embed
/// recursive calls for nested spans (e.g. `**bold _and italic_**`) the
/// same way block parsers recurse into nested blocks.
pub struct SpanParserBuilder {
    pub starts: CharSet,
    pub low_precedence: bool,
    pub build: Rc<dyn Fn(Rc<dyn RecursiveParser>) -> Parser<Span>>,
}

impl SpanParserBuilder {
    pub fn new(
        starts: CharSet,
        build: impl Fn(Rc<dyn RecursiveParser>) -> Parser<Span> + 'static,
    ) -> Self {
        SpanParserBuilder { starts, low_precedence: false, build: Rc::new(build) }
    }

    pub fn low_precedence(mut self) -> Self {
        self.low_precedence = true;
        self
    }
}

type BlockDirectiveHandler = Rc<dyn Fn(&Invocation) -> Block>;
type SpanDirectiveHandler = Rc<dyn Fn(&Invocation) -> Span>;

/// Directive registrations, keyed by name, for the positions a directive
/// can be invoked in (§4.5: "usable in three positions... plus a link
/// variant"). A template directive builds a `Block::TemplateRoot` and a
/// link directive builds a `Span::SpanLink` — both are just `Block`- or
/// `Span`-shaped results, so they register through the same two handler
/// maps rather than needing dedicated ones.
///
/// `separators` is declared up front, by name, alongside the handler: the
/// engine needs to know a directive's separator names before it can split
/// the body text, but a `DirectiveDecl<T>` is opaque at this layer (its
/// separator list, if any, is buried inside a `separated_body` closure).
#[derive(Clone, Default)]
pub struct DirectiveRegistry {
    pub block: HashMap<String, BlockDirectiveHandler>,
    pub span: HashMap<String, SpanDirectiveHandler>,
    pub separators: HashMap<String, Vec<SeparatorSpec>>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        DirectiveRegistry::default()
    }

    pub fn with_block(
        mut self,
        name: impl Into<String>,
        separators: Vec<SeparatorSpec>,
        handler: impl Fn(&Invocation) -> Block + 'static,
    ) -> Self {
        let name = name.into();
        self.separators.insert(name.clone(), separators);
        self.block.insert(name, Rc::new(handler));
        self
    }

    pub fn with_span(
        mut self,
        name: impl Into<String>,
        separators: Vec<SeparatorSpec>,
        handler: impl Fn(&Invocation) -> Span + 'static,
    ) -> Self {
        let name = name.into();
        self.separators.insert(name.clone(), separators);
        self.span.insert(name, Rc::new(handler));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty() && self.span.is_empty()
    }
}

/// A rule applied to one node at one rewrite phase (§4.6): `None` removes
/// the node, `Some(original)` keeps it unchanged, `Some(other)` replaces
/// it. The traversal driver that actually walks the tree lives in
/// `litmark-rewrite`; a bundle only contributes the rule-building closure.
pub type RewriteRule = Rc<dyn Fn(Block) -> Option<Block>>;

#[derive(Clone)]
pub struct RewriteHook {
    pub phase: Phase,
    pub make_rule: Rc<dyn Fn(&dyn DocumentCursor) -> RewriteRule>,
}

#[derive(Clone, Default)]
pub struct RootHooks {
    pub pre_process_input: Option<Rc<dyn Fn(String) -> String>>,
    pub post_process_document: Option<Rc<dyn Fn(Vec<Block>) -> Vec<Block>>>,
}

/// Everything one extension contributes to the engine (§6's `ExtensionBundle`
/// record).
pub struct ExtensionBundle {
    pub description: String,
    pub block_parsers: Vec<BlockParserBuilder>,
    pub span_parsers: Vec<SpanParserBuilder>,
    pub directives: DirectiveRegistry,
    pub rewrite_rules: Vec<RewriteHook>,
    pub root_hooks: RootHooks,
    pub use_in_strict: bool,
}

impl ExtensionBundle {
    pub fn new(description: impl Into<String>) -> Self {
        ExtensionBundle {
            description: description.into(),
            block_parsers: Vec::new(),
            span_parsers: Vec::new(),
            directives: DirectiveRegistry::new(),
            rewrite_rules: Vec::new(),
            root_hooks: RootHooks::default(),
            use_in_strict: true,
        }
    }

    pub fn with_block_parser(mut self, parser: BlockParserBuilder) -> Self {
        self.block_parsers.push(parser);
        self
    }

    pub fn with_span_parser(mut self, parser: SpanParserBuilder) -> Self {
        self.span_parsers.push(parser);
        self
    }

    pub fn with_directives(mut self, directives: DirectiveRegistry) -> Self {
        self.directives = directives;
        self
    }

    pub fn with_rewrite_rule(mut self, hook: RewriteHook) -> Self {
        self.rewrite_rules.push(hook);
        self
    }

    pub fn with_pre_process_input(mut self, hook: impl Fn(String) -> String + 'static) -> Self {
        self.root_hooks.pre_process_input = Some(Rc::new(hook));
        self
    }

    pub fn with_post_process_document(
        mut self,
        hook: impl Fn(Vec<Block>) -> Vec<Block> + 'static,
    ) -> Self {
        self.root_hooks.post_process_document = Some(Rc::new(hook));
        self
    }

    /// Opts this bundle out of an `EngineBuilder::strict()` build — e.g. a
    /// flavor extension that is convenient but not part of the host's
    /// conformance surface.
    pub fn excluded_from_strict(mut self) -> Self {
        self.use_in_strict = false;
        self
    }
}
