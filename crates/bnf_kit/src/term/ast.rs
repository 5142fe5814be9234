//! AST node construction bound to terms.
//!
//! A term creates its AST node through one of three strategies, tried in order:
//!
//! 1. a custom [`AstNodeCreator`] closure set on the term; the closure is fully
//!    responsible for the node and no further initialization is performed,
//! 2. a node-kind tag looked up in the [`AstNodeRegistry`]; the factory's node
//!    is then initialized through [`AstNode::init`],
//! 3. nothing: no node is produced and a configuration warning is recorded.
//!
//! When a node was produced and the term has an `on_created` hook, the hook
//! fires with the new node.

use compact_str::CompactString;
use hashbrown::HashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::grammar::Grammar;
use crate::parsing::ParseTreeNode;
use crate::term::Term;

/// A node of the abstract syntax tree built by the host language.
pub trait AstNode: fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Initialize the node from its parse tree node.
    ///
    /// Called for nodes created from a registered node kind. The default does
    /// nothing.
    fn init(&mut self, context: &mut AstContext<'_>, tree_node: &ParseTreeNode) {
        let _ = (context, tree_node);
    }
}

/// Custom node construction closure
pub type AstNodeCreator =
    Arc<dyn Fn(&mut AstContext<'_>, &ParseTreeNode) -> Option<Box<dyn AstNode>> + Send + Sync>;

/// Factory registered under a node-kind tag
pub type AstNodeFactory = Arc<dyn Fn() -> Box<dyn AstNode> + Send + Sync>;

/// Notification fired after a node was created
pub type AstNodeCreatedHook = Arc<dyn Fn(&AstNodeCreatedArgs<'_>) + Send + Sync>;

/// Arguments of an [`AstNodeCreatedHook`]
pub struct AstNodeCreatedArgs<'a> {
    pub term: &'a Term,
    pub tree_node: &'a ParseTreeNode,
    pub node: &'a dyn AstNode,
}

/// AST settings of a single term.
#[derive(Clone, Default)]
pub struct AstBinding {
    node_kind: Option<CompactString>,
    creator: Option<AstNodeCreator>,
    config: Option<Arc<dyn Any + Send + Sync>>,
    on_created: Option<AstNodeCreatedHook>,
}

impl AstBinding {
    #[must_use]
    pub fn node_kind(&self) -> Option<&str> {
        self.node_kind.as_deref()
    }

    pub fn set_node_kind(&mut self, kind: impl Into<CompactString>) -> &mut Self {
        self.node_kind = Some(kind.into());
        self
    }

    pub fn set_creator(
        &mut self,
        creator: impl Fn(&mut AstContext<'_>, &ParseTreeNode) -> Option<Box<dyn AstNode>>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        self.creator = Some(Arc::new(creator));
        self
    }

    #[must_use]
    pub const fn has_creator(&self) -> bool {
        self.creator.is_some()
    }

    /// Opaque configuration payload for the node implementation
    #[must_use]
    pub fn config<C: Any>(&self) -> Option<&C> {
        self.config.as_deref().and_then(|c| c.downcast_ref::<C>())
    }

    pub fn set_config(&mut self, config: impl Any + Send + Sync) -> &mut Self {
        self.config = Some(Arc::new(config));
        self
    }

    pub fn on_created(
        &mut self,
        hook: impl Fn(&AstNodeCreatedArgs<'_>) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_created = Some(Arc::new(hook));
        self
    }

    /// True if the term can produce a node by itself
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.creator.is_some() || self.node_kind.is_some()
    }
}

impl fmt::Debug for AstBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstBinding")
            .field("node_kind", &self.node_kind)
            .field("creator", &self.creator.is_some())
            .field("config", &self.config.is_some())
            .field("on_created", &self.on_created.is_some())
            .finish()
    }
}

/// Maps node-kind tags to node factories.
#[derive(Clone, Default)]
pub struct AstNodeRegistry {
    factories: HashMap<CompactString, AstNodeFactory, ahash::RandomState>,
}

impl AstNodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `kind`, replacing any previous factory
    pub fn register(
        &mut self,
        kind: impl Into<CompactString>,
        factory: impl Fn() -> Box<dyn AstNode> + Send + Sync + 'static,
    ) -> &mut Self {
        self.factories.insert(kind.into(), Arc::new(factory));
        self
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&AstNodeFactory> {
        self.factories.get(kind)
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }
}

impl fmt::Debug for AstNodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

/// State shared by AST construction over one parse tree.
pub struct AstContext<'a> {
    pub grammar: &'a Grammar,
    pub registry: &'a AstNodeRegistry,
    warnings: Vec<String>,
}

impl<'a> AstContext<'a> {
    #[must_use]
    pub const fn new(grammar: &'a Grammar, registry: &'a AstNodeRegistry) -> Self {
        Self {
            grammar,
            registry,
            warnings: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Configuration problems found while creating nodes
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Term {
    /// Create the AST node for `tree_node`, a parse node of this term.
    pub fn create_ast_node(
        &self,
        context: &mut AstContext<'_>,
        tree_node: &ParseTreeNode,
    ) -> Option<Box<dyn AstNode>> {
        let binding = self.ast();
        let node = if let Some(creator) = &binding.creator {
            creator(context, tree_node)
        } else {
            let grammar = context.grammar;
            let kind = binding
                .node_kind
                .as_deref()
                .or_else(|| grammar.config().default_node_kind.as_deref());
            match kind {
                Some(kind) => match context.registry.get(kind).cloned() {
                    Some(factory) => {
                        let mut node = factory();
                        node.init(context, tree_node);
                        Some(node)
                    }
                    None => {
                        tracing::warn!(term = self.name(), kind, "AST node kind is not registered");
                        context.add_warning(format!(
                            "AST node kind '{kind}' of term '{}' is not registered",
                            self.name()
                        ));
                        None
                    }
                },
                None => {
                    tracing::warn!(term = self.name(), "term has no AST node kind");
                    context.add_warning(format!(
                        "AST node type is not set for term '{}'",
                        self.name()
                    ));
                    None
                }
            }
        };

        if let (Some(hook), Some(node)) = (&binding.on_created, &node) {
            hook(&AstNodeCreatedArgs {
                term: self,
                tree_node,
                node: node.as_ref(),
            });
        }
        node
    }
}
