//! Reference collector
//!
//! Enumerates every binding the sweeper may remove and seeds the reference set
//! with the ones that are read when the module is first seen. Only statement
//! lists are scanned (program body, function bodies, blocks, switch cases), so
//! declarations in `for` heads and anything wrapped in `export` stay untracked.

use indexmap::IndexMap;
use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::{
    ArrowFunctionExpression, BindingIdentifier, BindingPattern, Expression, Function,
    ImportDeclaration, Program, Statement, VariableDeclarator,
};
use oxc_ast_visit::{walk, Visit};
use oxc_semantic::Scoping;
use oxc_span::Span;
use tracing::debug;

use common::is_function_like;

use crate::binding::{Binding, BindingKind, BindingSite, TransformContext};
use crate::error::{Result, TransformError};
use crate::pattern::{
    assigned_function, check_declarator_target, element_target, import_local, rest_target,
};
use crate::scope::{analyze, ReadIndex};

/// Bindings of the module in source order, keyed by their site
pub type BindingTable = IndexMap<BindingSite, Binding>;

/// Collect all tracked bindings of the current tree.
///
/// `scoping` must have been built from this exact tree.
pub fn collect_bindings(program: &Program<'_>, scoping: &Scoping) -> Result<BindingTable> {
    let mut collector = BindingCollector {
        scoping,
        bindings: IndexMap::new(),
        error: None,
    };
    collector.visit_program(program);
    match collector.error {
        Some(error) => Err(error),
        None => Ok(collector.bindings),
    }
}

/// Fill `ctx.refs` with every binding that is read outside its own declaration
pub fn seed_references(program: &Program<'_>, ctx: &mut TransformContext) -> Result<()> {
    let scoping = analyze(program);
    let bindings = collect_bindings(program, &scoping)?;
    let reads = ReadIndex::build(program, &scoping);

    for binding in bindings.values() {
        if reads.is_referenced(binding) {
            ctx.refs.insert(binding.site);
        }
    }

    debug!(
        bindings = bindings.len(),
        tracked = ctx.refs.len(),
        "seeded reference set"
    );
    Ok(())
}

struct BindingCollector<'s> {
    scoping: &'s Scoping,
    bindings: BindingTable,
    error: Option<TransformError>,
}

impl BindingCollector<'_> {
    fn collect_statement(&mut self, stmt: &Statement<'_>) -> Result<()> {
        match stmt {
            Statement::FunctionDeclaration(func) => self.collect_function(func),
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    self.collect_declarator(declarator)?;
                }
            }
            Statement::ExpressionStatement(expr_stmt) => {
                self.collect_assignment(&expr_stmt.expression);
            }
            Statement::ImportDeclaration(import) => self.collect_import(import),
            _ => {}
        }
        Ok(())
    }

    fn collect_function(&mut self, func: &Function<'_>) {
        // Overload signatures and ambient declarations have nothing to remove
        if func.body.is_none() || func.declare {
            return;
        }
        if let Some(id) = &func.id {
            self.add(id, BindingKind::Function, func.span);
        }
    }

    fn collect_declarator(&mut self, declarator: &VariableDeclarator<'_>) -> Result<()> {
        check_declarator_target(&declarator.id)?;
        match &declarator.id {
            BindingPattern::BindingIdentifier(ident) => {
                let bound_function = declarator
                    .init
                    .as_ref()
                    .is_some_and(|init| is_function_like(init));
                if bound_function {
                    self.add(ident, BindingKind::Function, declarator.span);
                } else {
                    self.add(ident, BindingKind::Variable, ident.span);
                }
            }
            BindingPattern::ObjectPattern(pattern) => {
                for property in &pattern.properties {
                    let ident = element_target(&property.value)?;
                    self.add(ident, BindingKind::Variable, ident.span);
                }
                if let Some(rest) = &pattern.rest {
                    let ident = rest_target(rest)?;
                    self.add(ident, BindingKind::Variable, ident.span);
                }
            }
            BindingPattern::ArrayPattern(pattern) => {
                for element in pattern.elements.iter().flatten() {
                    let ident = element_target(element)?;
                    self.add(ident, BindingKind::Variable, ident.span);
                }
                if let Some(rest) = &pattern.rest {
                    let ident = rest_target(rest)?;
                    self.add(ident, BindingKind::Variable, ident.span);
                }
            }
            BindingPattern::AssignmentPattern(_) => {}
        }
        Ok(())
    }

    fn collect_assignment(&mut self, expr: &Expression<'_>) {
        let Some((ident, assign_span)) = assigned_function(expr) else {
            return;
        };
        // Assignments to undeclared globals have no binding to track
        let Some(symbol) = ident
            .reference_id
            .get()
            .and_then(|reference_id| self.scoping.get_reference(reference_id).symbol_id())
        else {
            return;
        };
        let site = BindingSite::new(ident.span);
        self.bindings.insert(
            site,
            Binding {
                name: ident.name.to_string(),
                site,
                symbol,
                self_span: assign_span,
                kind: BindingKind::Function,
            },
        );
    }

    fn collect_import(&mut self, import: &ImportDeclaration<'_>) {
        let Some(specifiers) = &import.specifiers else {
            return;
        };
        for specifier in specifiers {
            let local = import_local(specifier);
            self.add(local, BindingKind::Import, local.span);
        }
    }

    fn add(&mut self, ident: &BindingIdentifier<'_>, kind: BindingKind, self_span: Span) {
        let Some(symbol) = ident.symbol_id.get() else {
            return;
        };
        let site = BindingSite::new(ident.span);
        self.bindings.insert(
            site,
            Binding {
                name: ident.name.to_string(),
                site,
                symbol,
                self_span,
                kind,
            },
        );
    }
}

impl<'a> Visit<'a> for BindingCollector<'_> {
    fn visit_statements(&mut self, stmts: &ArenaVec<'a, Statement<'a>>) {
        if self.error.is_some() {
            return;
        }
        for stmt in stmts {
            if let Err(error) = self.collect_statement(stmt) {
                self.error = Some(error);
                return;
            }
        }
        walk::walk_statements(self, stmts);
    }

    fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        // `() => expr` keeps its expression in a one-statement body that is not
        // a real statement list; only look inside it
        if arrow.expression {
            self.visit_formal_parameters(&arrow.params);
            for stmt in &arrow.body.statements {
                self.visit_statement(stmt);
            }
            return;
        }
        walk::walk_arrow_function_expression(self, arrow);
    }
}
