//! Binding shapes the pass understands
//!
//! Anything outside these shapes is rejected with
//! [`TransformError::UnsupportedPatternShape`] instead of being skipped, since a
//! skipped target would be misjudged as dead or alive.

use oxc_ast::ast::{
    AssignmentTarget, BindingIdentifier, BindingPattern, BindingRestElement, Expression,
    IdentifierReference, ImportDeclarationSpecifier,
};
use oxc_span::Span;
use oxc_syntax::operator::AssignmentOperator;

use common::is_function_like;

use crate::error::{Result, TransformError};

/// The identifier a destructuring element binds directly (`a` or `a = 1`)
pub(crate) fn element_target<'a, 'b>(
    pattern: &'b BindingPattern<'a>,
) -> Result<&'b BindingIdentifier<'a>> {
    match pattern {
        BindingPattern::BindingIdentifier(ident) => Ok(&**ident),
        BindingPattern::AssignmentPattern(assign) => match &assign.left {
            BindingPattern::BindingIdentifier(ident) => Ok(&**ident),
            _ => Err(TransformError::unsupported(
                "nested destructuring with default",
                assign.span,
            )),
        },
        BindingPattern::ObjectPattern(nested) => Err(TransformError::unsupported(
            "nested object destructuring",
            nested.span,
        )),
        BindingPattern::ArrayPattern(nested) => Err(TransformError::unsupported(
            "nested array destructuring",
            nested.span,
        )),
    }
}

/// The identifier a rest element (`...rest`) binds
pub(crate) fn rest_target<'a, 'b>(
    rest: &'b BindingRestElement<'a>,
) -> Result<&'b BindingIdentifier<'a>> {
    match &rest.argument {
        BindingPattern::BindingIdentifier(ident) => Ok(&**ident),
        _ => Err(TransformError::unsupported("rest element target", rest.span)),
    }
}

/// Declarator targets: a destructuring default is only valid inside a pattern
pub(crate) fn check_declarator_target(pattern: &BindingPattern<'_>) -> Result<()> {
    match pattern {
        BindingPattern::AssignmentPattern(assign) => Err(TransformError::unsupported(
            "declarator target",
            assign.span,
        )),
        _ => Ok(()),
    }
}

pub(crate) fn import_local<'a, 'b>(
    specifier: &'b ImportDeclarationSpecifier<'a>,
) -> &'b BindingIdentifier<'a> {
    match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
    }
}

/// `name = function () {}` or `name = () => {}` used as a statement.
/// Returns the assigned identifier and the span of the whole assignment.
pub(crate) fn assigned_function<'a, 'b>(
    expr: &'b Expression<'a>,
) -> Option<(&'b IdentifierReference<'a>, Span)> {
    let Expression::AssignmentExpression(assign) = expr else {
        return None;
    };
    if assign.operator != AssignmentOperator::Assign || !is_function_like(&assign.right) {
        return None;
    }
    match &assign.left {
        AssignmentTarget::AssignmentTargetIdentifier(ident) => Some((&**ident, assign.span)),
        _ => None,
    }
}
