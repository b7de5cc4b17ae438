//! Marker injection
//!
//! Modules that exported server data get `export var __has_server = true;`
//! right before their default export so the bundler can tell them apart
//! without re-parsing.

use oxc_ast::ast::{
    Declaration, ImportOrExportKind, Program, Statement, VariableDeclarationKind, WithClause,
};
use oxc_ast::{AstBuilder, NONE};
use oxc_span::SPAN;
use tracing::debug;

use common::TransformOptions;

use crate::binding::TransformContext;

/// Insert the marker export if a server export was seen and no marker exists yet.
///
/// Returns whether the marker was inserted.
pub fn decorate_server_export<'a>(
    program: &mut Program<'a>,
    ast: AstBuilder<'a>,
    options: &TransformOptions,
    ctx: &mut TransformContext,
) -> bool {
    if ctx.done || !ctx.has_server_export {
        return false;
    }
    let Some(index) = program
        .body
        .iter()
        .position(|stmt| matches!(stmt, Statement::ExportDefaultDeclaration(_)))
    else {
        debug!("no default export to mark");
        return false;
    };

    program
        .body
        .insert(index, marker_export(ast, &options.marker_name));
    ctx.done = true;
    debug!(marker = %options.marker_name, index, "injected marker export");
    true
}

fn marker_export<'a>(ast: AstBuilder<'a>, name: &str) -> Statement<'a> {
    let declarator = ast.variable_declarator(
        SPAN,
        VariableDeclarationKind::Var,
        ast.binding_pattern_binding_identifier(SPAN, ast.allocator.alloc_str(name)),
        NONE,
        Some(ast.expression_boolean_literal(SPAN, true)),
        false,
    );
    let declaration = ast.alloc_variable_declaration(
        SPAN,
        VariableDeclarationKind::Var,
        ast.vec1(declarator),
        false,
    );
    Statement::ExportNamedDeclaration(ast.alloc_export_named_declaration(
        SPAN,
        Some(Declaration::VariableDeclaration(declaration)),
        ast.vec(),
        None,
        ImportOrExportKind::Value,
        None::<WithClause<'a>>,
    ))
}
