//! Fixed-point sweeper
//!
//! Each pass rebuilds scoping for the current tree, takes a snapshot of which
//! tracked bindings are dead, and only then mutates. A pass that removes
//! nothing ends the loop. Every other pass removes at least one binding, so
//! the loop runs at most once per binding plus one.

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::{
    ArrowFunctionExpression, BindingPattern, Expression, Function, ImportDeclaration, Program,
    Statement, VariableDeclaration, VariableDeclarator,
};
use oxc_ast_visit::{walk_mut, VisitMut};
use tracing::{debug, trace};

use common::TransformOptions;

use crate::binding::{BindingSite, RemovedBinding, TransformContext};
use crate::collector::{collect_bindings, BindingTable};
use crate::error::{Result, TransformError};
use crate::pattern::{
    assigned_function, check_declarator_target, element_target, import_local, rest_target,
};
use crate::scope::{analyze, ReadIndex};

/// Remove dead tracked bindings until a pass removes nothing
pub fn sweep(
    program: &mut Program<'_>,
    options: &TransformOptions,
    ctx: &mut TransformContext,
) -> Result<()> {
    loop {
        if let Some(limit) = options.max_passes {
            if ctx.passes >= limit {
                return Err(TransformError::PassLimitExceeded { limit });
            }
        }
        ctx.passes += 1;

        let dead = dead_bindings(program, ctx)?;
        if dead.is_empty() {
            debug!(
                passes = ctx.passes,
                removed = ctx.removed.len(),
                "sweep converged"
            );
            return Ok(());
        }

        let removed = remove_bindings(program, &dead)?;
        debug!(pass = ctx.passes, removed = removed.len(), "sweep pass");
        ctx.removed.extend(removed);
    }
}

/// Tracked bindings with no read outside their own declaration, for the tree as it is now
fn dead_bindings(program: &Program<'_>, ctx: &TransformContext) -> Result<BindingTable> {
    let scoping = analyze(program);
    let bindings = collect_bindings(program, &scoping)?;
    let reads = ReadIndex::build(program, &scoping);
    Ok(bindings
        .into_iter()
        .filter(|(site, binding)| ctx.is_tracked(*site) && !reads.is_referenced(binding))
        .collect())
}

fn remove_bindings(program: &mut Program<'_>, dead: &BindingTable) -> Result<Vec<RemovedBinding>> {
    let mut remover = Remover {
        dead,
        removed: Vec::new(),
        error: None,
    };
    remover.visit_program(program);
    if let Some(error) = remover.error {
        return Err(error);
    }
    if remover.removed.len() != dead.len() {
        return Err(TransformError::inconsistent(format!(
            "{} dead bindings selected but {} removed",
            dead.len(),
            remover.removed.len()
        )));
    }
    Ok(remover.removed)
}

struct Remover<'d> {
    dead: &'d BindingTable,
    removed: Vec<RemovedBinding>,
    error: Option<TransformError>,
}

impl Remover<'_> {
    /// Claim `site` for removal if it is dead
    fn take(&mut self, site: BindingSite) -> bool {
        let Some(binding) = self.dead.get(&site) else {
            return false;
        };
        trace!(name = %binding.name, kind = %binding.kind, at = site.span().start, "removing binding");
        self.removed.push(RemovedBinding {
            name: binding.name.clone(),
            kind: binding.kind,
        });
        true
    }

    /// Returns whether the statement stays
    fn sweep_statement(&mut self, stmt: &mut Statement<'_>) -> Result<bool> {
        match stmt {
            Statement::FunctionDeclaration(func) => Ok(!self.take_function(func)),
            Statement::VariableDeclaration(decl) => self.sweep_declaration(decl),
            Statement::ExpressionStatement(expr_stmt) => {
                Ok(!self.take_assignment(&expr_stmt.expression))
            }
            Statement::ImportDeclaration(import) => Ok(self.sweep_import(import)),
            _ => Ok(true),
        }
    }

    fn take_function(&mut self, func: &Function<'_>) -> bool {
        if func.body.is_none() || func.declare {
            return false;
        }
        func.id
            .as_ref()
            .is_some_and(|id| self.take(BindingSite::new(id.span)))
    }

    fn take_assignment(&mut self, expr: &Expression<'_>) -> bool {
        assigned_function(expr).is_some_and(|(ident, _)| self.take(BindingSite::new(ident.span)))
    }

    fn sweep_declaration(&mut self, decl: &mut VariableDeclaration<'_>) -> Result<bool> {
        let mut keep = Vec::with_capacity(decl.declarations.len());
        for declarator in decl.declarations.iter_mut() {
            keep.push(self.sweep_declarator(declarator)?);
        }
        if keep.iter().all(|k| *k) {
            return Ok(true);
        }
        let mut keep = keep.into_iter();
        decl.declarations.retain(|_| keep.next().unwrap_or(true));
        Ok(!decl.declarations.is_empty())
    }

    /// Returns whether the declarator stays
    fn sweep_declarator(&mut self, declarator: &mut VariableDeclarator<'_>) -> Result<bool> {
        check_declarator_target(&declarator.id)?;
        match &mut declarator.id {
            BindingPattern::BindingIdentifier(ident) => Ok(!self.take(BindingSite::new(ident.span))),
            BindingPattern::ObjectPattern(pattern) => {
                let mut keep = Vec::with_capacity(pattern.properties.len());
                for property in &pattern.properties {
                    let site = BindingSite::new(element_target(&property.value)?.span);
                    keep.push(!self.take(site));
                }
                let mut removed_any = keep.iter().any(|k| !*k);
                let mut keep = keep.into_iter();
                pattern.properties.retain(|_| keep.next().unwrap_or(true));

                let rest_site = pattern
                    .rest
                    .as_ref()
                    .map(|rest| rest_target(rest).map(|ident| BindingSite::new(ident.span)))
                    .transpose()?;
                if rest_site.is_some_and(|site| self.take(site)) {
                    pattern.rest = None;
                    removed_any = true;
                }

                Ok(!(removed_any && pattern.properties.is_empty() && pattern.rest.is_none()))
            }
            BindingPattern::ArrayPattern(pattern) => {
                let mut removed_any = false;
                // Dead elements become holes so later elements keep their index
                for element in pattern.elements.iter_mut() {
                    let Some(target) = element.as_ref() else {
                        continue;
                    };
                    let site = BindingSite::new(element_target(target)?.span);
                    if self.take(site) {
                        *element = None;
                        removed_any = true;
                    }
                }

                let rest_site = pattern
                    .rest
                    .as_ref()
                    .map(|rest| rest_target(rest).map(|ident| BindingSite::new(ident.span)))
                    .transpose()?;
                if rest_site.is_some_and(|site| self.take(site)) {
                    pattern.rest = None;
                    removed_any = true;
                }

                if !removed_any {
                    return Ok(true);
                }
                if pattern.rest.is_none() {
                    while matches!(pattern.elements.last(), Some(None)) {
                        pattern.elements.pop();
                    }
                }
                Ok(!(pattern.elements.is_empty() && pattern.rest.is_none()))
            }
            BindingPattern::AssignmentPattern(_) => Ok(true),
        }
    }

    /// Returns whether the import stays
    fn sweep_import(&mut self, import: &mut ImportDeclaration<'_>) -> bool {
        // Side-effect imports (`import "./polyfill"`) bind nothing
        let Some(specifiers) = import.specifiers.as_mut() else {
            return true;
        };
        let mut keep = Vec::with_capacity(specifiers.len());
        for specifier in specifiers.iter() {
            keep.push(!self.take(BindingSite::new(import_local(specifier).span)));
        }
        if keep.iter().all(|k| *k) {
            return true;
        }
        let mut keep = keep.into_iter();
        specifiers.retain(|_| keep.next().unwrap_or(true));
        !specifiers.is_empty()
    }
}

impl<'a> VisitMut<'a> for Remover<'_> {
    fn visit_statements(&mut self, stmts: &mut ArenaVec<'a, Statement<'a>>) {
        walk_mut::walk_statements(self, stmts);
        if self.error.is_some() {
            return;
        }

        let mut keep = Vec::with_capacity(stmts.len());
        for stmt in stmts.iter_mut() {
            match self.sweep_statement(stmt) {
                Ok(stays) => keep.push(stays),
                Err(error) => {
                    self.error = Some(error);
                    return;
                }
            }
        }
        if keep.iter().all(|k| *k) {
            return;
        }
        let mut keep = keep.into_iter();
        stmts.retain(|_| keep.next().unwrap_or(true));
    }

    fn visit_arrow_function_expression(&mut self, arrow: &mut ArrowFunctionExpression<'a>) {
        if arrow.expression {
            self.visit_formal_parameters(&mut arrow.params);
            for stmt in arrow.body.statements.iter_mut() {
                self.visit_statement(stmt);
            }
            return;
        }
        walk_mut::walk_arrow_function_expression(self, arrow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use common::print_program;

    use crate::binding::BindingKind;
    use crate::collector::seed_references;

    /// Seed on the whole module, drop the top-level function `cut`, then sweep
    fn sweep_after_removing(source: &str, cut: &str) -> (String, TransformContext) {
        let allocator = Allocator::default();
        let mut program = Parser::new(&allocator, source, SourceType::tsx())
            .parse()
            .program;
        let mut ctx = TransformContext::new();
        seed_references(&program, &mut ctx).expect("seed");
        program.body.retain(|stmt| {
            !matches!(stmt, Statement::FunctionDeclaration(f)
                if f.id.as_ref().is_some_and(|id| id.name.as_str() == cut))
        });
        sweep(&mut program, &TransformOptions::default(), &mut ctx).expect("sweep");
        (print_program(&program), ctx)
    }

    #[test]
    fn test_cascade_through_helpers() {
        let (code, ctx) = sweep_after_removing(
            r#"
            import { fetchUser } from "./api";
            function format(user) { return user.name; }
            function load() { return format(fetchUser()); }
            function gone() { return load(); }
            export const kept = 1;
            "#,
            "gone",
        );
        assert!(!code.contains("fetchUser"));
        assert!(!code.contains("format"));
        assert!(!code.contains("load"));
        assert!(!code.contains("import"));
        assert!(code.contains("export const kept = 1"));
        assert!(ctx.passes >= 3);
        let kinds: Vec<_> = ctx.removed.iter().map(|r| (r.name.as_str(), r.kind)).collect();
        assert!(kinds.contains(&("fetchUser", BindingKind::Import)));
        assert!(kinds.contains(&("format", BindingKind::Function)));
    }

    #[test]
    fn test_untracked_bindings_survive() {
        let (code, ctx) = sweep_after_removing(
            "const sideEffect = register(); function gone() {} ",
            "gone",
        );
        assert!(code.contains("const sideEffect = register()"));
        assert!(ctx.removed.is_empty());
        assert_eq!(ctx.passes, 1);
    }

    #[test]
    fn test_partial_object_pattern() {
        let (code, _) = sweep_after_removing(
            "const { used, unused } = getProps(); function gone() { return unused; } log(used);",
            "gone",
        );
        assert!(code.contains("used"));
        assert!(!code.contains("unused"));
        assert!(code.contains("getProps()"));
    }

    #[test]
    fn test_emptied_object_pattern_removes_declarator() {
        let (code, _) = sweep_after_removing(
            "const { a, ...rest } = getProps(), other = 1; function gone() { return [a, rest]; } log(other);",
            "gone",
        );
        assert!(!code.contains("getProps"));
        assert!(code.contains("other = 1"));
    }

    #[test]
    fn test_array_pattern_keeps_positions() {
        let (code, _) = sweep_after_removing(
            "const [first, second, third] = list; function gone() { return first + third; } log(second);",
            "gone",
        );
        assert!(!code.contains("first"));
        assert!(!code.contains("third"));
        assert!(code.contains("second"));
        assert!(code.contains(", second"));
    }

    #[test]
    fn test_partial_import() {
        let (code, _) = sweep_after_removing(
            r#"import { alpha, beta } from "mod"; function gone() { return alpha; } log(beta);"#,
            "gone",
        );
        assert!(!code.contains("alpha"));
        assert!(code.contains("beta"));
        assert!(code.contains("mod"));
    }

    #[test]
    fn test_assignment_bound_function() {
        let (code, _) = sweep_after_removing(
            "let handler; handler = () => 1; function gone() { return handler(); }",
            "gone",
        );
        assert!(!code.contains("handler"));
    }

    #[test]
    fn test_nested_bindings_inside_live_function() {
        let (code, _) = sweep_after_removing(
            r#"
            function helper() { return 1; }
            function gone() { return helper(); }
            export function Page() { const local = () => 2; return local(); }
            "#,
            "gone",
        );
        assert!(!code.contains("helper"));
        assert!(code.contains("const local"));
    }

    #[test]
    fn test_pass_limit() {
        let allocator = Allocator::default();
        let source = "function a() {} function b() { return a(); } function gone() { return b(); }";
        let mut program = Parser::new(&allocator, source, SourceType::mjs())
            .parse()
            .program;
        let mut ctx = TransformContext::new();
        seed_references(&program, &mut ctx).expect("seed");
        program.body.pop();
        let options = TransformOptions::default().with_max_passes(1);
        let err = sweep(&mut program, &options, &mut ctx).unwrap_err();
        assert_eq!(err, TransformError::PassLimitExceeded { limit: 1 });
    }
}
