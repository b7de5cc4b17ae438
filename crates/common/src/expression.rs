//! Expression utilities for working with OXC AST

use oxc_ast::ast::{Expression, ModuleExportName, Program};
use oxc_codegen::{Codegen, CodegenOptions};

/// Print a whole program back to source
pub fn print_program(program: &Program<'_>) -> String {
    Codegen::new()
        .with_options(CodegenOptions::default())
        .build(program)
        .code
}

/// Strip parentheses and TS-only wrappers around an expression
pub fn peel_expression<'a, 'b>(expr: &'b Expression<'a>) -> &'b Expression<'a> {
    match expr {
        Expression::ParenthesizedExpression(e) => peel_expression(&e.expression),
        Expression::TSAsExpression(e) => peel_expression(&e.expression),
        Expression::TSSatisfiesExpression(e) => peel_expression(&e.expression),
        Expression::TSNonNullExpression(e) => peel_expression(&e.expression),
        Expression::TSTypeAssertion(e) => peel_expression(&e.expression),
        _ => expr,
    }
}

/// Check if an expression is a function or arrow function (after peeling wrappers)
pub fn is_function_like(expr: &Expression<'_>) -> bool {
    matches!(
        peel_expression(expr),
        Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_)
    )
}

/// Get the text of an import/export name (`foo`, or `"foo"` in string form)
pub fn module_export_name<'b>(name: &'b ModuleExportName<'_>) -> &'b str {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.as_str(),
        ModuleExportName::IdentifierReference(id) => id.name.as_str(),
        ModuleExportName::StringLiteral(lit) => lit.value.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_ast::ast::Statement;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn first_init<'a>(program: &'a Program<'a>) -> &'a Expression<'a> {
        let Some(Statement::VariableDeclaration(decl)) = program.body.first() else {
            panic!("expected a variable declaration");
        };
        decl.declarations[0].init.as_ref().expect("initializer")
    }

    #[test]
    fn test_function_like_through_wrappers() {
        let allocator = Allocator::default();
        let source = "const a = ((() => 1) as any);";
        let ret = Parser::new(&allocator, source, SourceType::ts()).parse();
        assert!(is_function_like(first_init(&ret.program)));
    }

    #[test]
    fn test_call_is_not_function_like() {
        let allocator = Allocator::default();
        let source = "const a = helper();";
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(!is_function_like(first_init(&ret.program)));
    }

    #[test]
    fn test_module_export_name_forms() {
        let allocator = Allocator::default();
        let source = r#"const a = 1; export { a as routeData, a as "quoted name" };"#;
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        let Some(Statement::ExportNamedDeclaration(export)) = ret.program.body.last() else {
            panic!("expected an export");
        };
        let names: Vec<_> = export
            .specifiers
            .iter()
            .map(|s| module_export_name(&s.exported))
            .collect();
        assert_eq!(names, vec!["routeData", "quoted name"]);
    }
}
