//! Bindings tracked by the pass and the per-invocation context

use std::fmt;

use oxc_semantic::SymbolId;
use oxc_span::Span;
use rustc_hash::FxHashSet;

/// Stable handle for a binding: the span of the identifier that names it.
///
/// Symbol ids are reassigned every time scoping is rebuilt, spans are not.
/// Two bindings never share a naming identifier, so shadowed names stay apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingSite(Span);

impl BindingSite {
    pub fn new(span: Span) -> Self {
        Self(span)
    }

    pub fn span(self) -> Span {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Function,
    Variable,
    Import,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            BindingKind::Function => "function",
            BindingKind::Variable => "variable",
            BindingKind::Import => "import",
        };
        f.write_str(kind)
    }
}

/// A named entity declared somewhere in the module
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub site: BindingSite,
    pub symbol: SymbolId,
    /// Reads inside this span belong to the declaration itself and do not
    /// keep the binding alive (self-recursion, `const f = () => f()`).
    pub self_span: Span,
    pub kind: BindingKind,
}

/// A binding the sweeper took out of the module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedBinding {
    pub name: String,
    pub kind: BindingKind,
}

/// State owned by one transform invocation and threaded through every phase
#[derive(Debug, Default)]
pub struct TransformContext {
    /// Bindings that were read when the module was first seen
    pub refs: FxHashSet<BindingSite>,
    /// A server data export was found while resolving exports
    pub has_server_export: bool,
    /// The marker export exists, either injected or already present
    pub done: bool,
    /// Sweep passes run so far, including the final one that removed nothing
    pub passes: usize,
    pub removed: Vec<RemovedBinding>,
}

impl TransformContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracked(&self, site: BindingSite) -> bool {
        self.refs.contains(&site)
    }
}
