//! Read-reference index over freshly built scoping
//!
//! Every sweep pass rebuilds this from the current tree. Nothing here survives
//! a mutation: symbol and reference ids are only meaningful for the tree they
//! were computed on.

use oxc_ast::ast::{IdentifierReference, Program};
use oxc_ast_visit::Visit;
use oxc_semantic::{Scoping, SemanticBuilder, SymbolId};
use oxc_span::Span;
use rustc_hash::FxHashMap;

use crate::binding::Binding;

/// Run semantic analysis on the current tree.
///
/// This also refreshes the symbol and reference ids stored on identifiers.
pub fn analyze(program: &Program<'_>) -> Scoping {
    SemanticBuilder::new().build(program).semantic.into_scoping()
}

/// Where each symbol is read
#[derive(Debug, Default)]
pub struct ReadIndex {
    reads: FxHashMap<SymbolId, Vec<Span>>,
}

impl ReadIndex {
    pub fn build(program: &Program<'_>, scoping: &Scoping) -> Self {
        let mut collector = ReadCollector {
            scoping,
            reads: FxHashMap::default(),
        };
        collector.visit_program(program);
        Self {
            reads: collector.reads,
        }
    }

    /// Spans of the identifiers reading `symbol`, in source order
    pub fn reads_of(&self, symbol: SymbolId) -> &[Span] {
        self.reads.get(&symbol).map_or(&[], Vec::as_slice)
    }

    /// A binding is referenced when something outside its own declaration reads it
    pub fn is_referenced(&self, binding: &Binding) -> bool {
        self.reads_of(binding.symbol)
            .iter()
            .any(|read| !encloses(binding.self_span, *read))
    }
}

fn encloses(outer: Span, inner: Span) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

struct ReadCollector<'s> {
    scoping: &'s Scoping,
    reads: FxHashMap<SymbolId, Vec<Span>>,
}

impl<'a> Visit<'a> for ReadCollector<'_> {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        let Some(reference_id) = ident.reference_id.get() else {
            return;
        };
        let reference = self.scoping.get_reference(reference_id);
        // `x = 1` only writes. Type positions count so that an import used
        // only in annotations is never orphaned.
        if !reference.is_read() && !reference.is_type() {
            return;
        }
        if let Some(symbol_id) = reference.symbol_id() {
            self.reads.entry(symbol_id).or_default().push(ident.span);
        }
    }
}
