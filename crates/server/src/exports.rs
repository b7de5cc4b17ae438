//! Export resolver
//!
//! Classifies top-level exports and applies the removal policy of the compile
//! mode before any sweeping happens.

use oxc_ast::ast::{
    BindingPattern, Declaration, ExportNamedDeclaration, Program, Statement,
};
use tracing::debug;

use common::{module_export_name, CompileMode, TransformOptions};

use crate::binding::TransformContext;

/// What one export statement exports. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRecord {
    Default,
    Named {
        /// Names bound by the wrapped declaration
        declared: Vec<String>,
        has_declaration: bool,
        /// Exported names of the `export { .. }` form
        specifiers: Vec<String>,
    },
}

impl ExportRecord {
    pub fn classify(stmt: &Statement<'_>) -> Option<Self> {
        match stmt {
            Statement::ExportDefaultDeclaration(_) => Some(Self::Default),
            Statement::ExportNamedDeclaration(export) => Some(Self::from_named(export)),
            _ => None,
        }
    }

    fn from_named(export: &ExportNamedDeclaration<'_>) -> Self {
        let declared = export
            .declaration
            .as_ref()
            .map(declared_names)
            .unwrap_or_default();
        let specifiers = export
            .specifiers
            .iter()
            .map(|s| module_export_name(&s.exported).to_string())
            .collect();
        Self::Named {
            declared,
            has_declaration: export.declaration.is_some(),
            specifiers,
        }
    }

    /// Names this export adds to the module interface, besides `default`
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let (declared, specifiers): (&[String], &[String]) = match self {
            Self::Default => (&[], &[]),
            Self::Named {
                declared,
                specifiers,
                ..
            } => (declared.as_slice(), specifiers.as_slice()),
        };
        declared.iter().chain(specifiers).map(String::as_str)
    }

    pub fn exports_name(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

fn declared_names(declaration: &Declaration<'_>) -> Vec<String> {
    match declaration {
        Declaration::FunctionDeclaration(func) => {
            func.id.iter().map(|id| id.name.to_string()).collect()
        }
        Declaration::ClassDeclaration(class) => {
            class.id.iter().map(|id| id.name.to_string()).collect()
        }
        Declaration::VariableDeclaration(decl) => decl
            .declarations
            .iter()
            .filter_map(|d| match &d.id {
                BindingPattern::BindingIdentifier(id) => Some(id.name.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Rewrite the module's exports for `options.mode`.
///
/// Records in `ctx` whether a server data export was seen, in either mode, and
/// whether the marker export is already there.
pub fn resolve_exports(
    program: &mut Program<'_>,
    options: &TransformOptions,
    ctx: &mut TransformContext,
) {
    for record in program.body.iter().filter_map(ExportRecord::classify) {
        if record.names().any(|name| options.is_server_export(name)) {
            ctx.has_server_export = true;
        }
        if record.names().any(|name| options.is_marker(name)) {
            ctx.done = true;
        }
    }

    // Client mode leaves named exports alone, `routeData` included.
    match options.mode {
        CompileMode::Client => strip_default_exports(program),
        CompileMode::Server => remove_server_exports(program, &options.server_export_name),
    }
}

fn strip_default_exports(program: &mut Program<'_>) {
    let before = program.body.len();
    program
        .body
        .retain(|stmt| !matches!(stmt, Statement::ExportDefaultDeclaration(_)));
    debug!(
        removed = before - program.body.len(),
        "stripped default exports"
    );
}

fn remove_server_exports(program: &mut Program<'_>, name: &str) {
    let mut keep = Vec::with_capacity(program.body.len());
    for stmt in program.body.iter_mut() {
        keep.push(match stmt {
            Statement::ExportNamedDeclaration(export) => !excise_export(export, name),
            _ => true,
        });
    }
    let removed = keep.iter().filter(|k| !**k).count();
    let mut keep = keep.into_iter();
    program.body.retain(|_| keep.next().unwrap_or(true));
    debug!(removed, name, "removed server data export statements");
}

/// Drop `name` from one export statement.
/// Returns true when nothing is left and the whole statement must go.
fn excise_export(export: &mut ExportNamedDeclaration<'_>, name: &str) -> bool {
    if !export.specifiers.is_empty() {
        export
            .specifiers
            .retain(|s| module_export_name(&s.exported) != name);
        return export.specifiers.is_empty();
    }

    match &mut export.declaration {
        Some(Declaration::FunctionDeclaration(func)) => {
            func.id.as_ref().is_some_and(|id| id.name.as_str() == name)
        }
        Some(Declaration::VariableDeclaration(decl)) => {
            let before = decl.declarations.len();
            decl.declarations.retain(|d| {
                !matches!(&d.id, BindingPattern::BindingIdentifier(id) if id.name.as_str() == name)
            });
            before != decl.declarations.len() && decl.declarations.is_empty()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use common::print_program;

    fn resolve(source: &str, options: &TransformOptions) -> (String, TransformContext) {
        let allocator = Allocator::default();
        let mut program = Parser::new(&allocator, source, SourceType::mjs())
            .parse()
            .program;
        let mut ctx = TransformContext::new();
        resolve_exports(&mut program, options, &mut ctx);
        (print_program(&program), ctx)
    }

    #[test]
    fn test_classify() {
        let allocator = Allocator::default();
        let source = "export default 1; export const a = 1, b = 2; export { a as c };";
        let program = Parser::new(&allocator, source, SourceType::mjs())
            .parse()
            .program;
        let records: Vec<_> = program.body.iter().filter_map(ExportRecord::classify).collect();
        assert_eq!(records[0], ExportRecord::Default);
        assert_eq!(
            records[1],
            ExportRecord::Named {
                declared: vec!["a".to_string(), "b".to_string()],
                has_declaration: true,
                specifiers: vec![],
            }
        );
        assert!(records[2].exports_name("c"));
        assert!(!records[2].exports_name("a"));
    }

    #[test]
    fn test_client_strips_defaults_only() {
        let (code, ctx) = resolve(
            "export default function Page() {} export function routeData() {}",
            &TransformOptions::client(),
        );
        assert!(!code.contains("Page"));
        assert!(code.contains("export function routeData"));
        assert!(ctx.has_server_export);
    }

    #[test]
    fn test_server_removes_function_export() {
        let (code, ctx) = resolve(
            "export function routeData() {} export default function Page() {}",
            &TransformOptions::server(),
        );
        assert!(!code.contains("routeData"));
        assert!(code.contains("export default function Page"));
        assert!(ctx.has_server_export);
    }

    #[test]
    fn test_server_removes_only_matching_declarator() {
        let (code, _) = resolve(
            "export const routeData = () => {}, other = () => {};",
            &TransformOptions::server(),
        );
        assert!(!code.contains("routeData"));
        assert!(code.contains("export const other"));
    }

    #[test]
    fn test_server_removes_lone_declarator_statement() {
        let (code, _) = resolve(
            "export const routeData = () => {}; export const kept = 1;",
            &TransformOptions::server(),
        );
        assert!(!code.contains("routeData"));
        assert!(code.contains("export const kept = 1"));
    }

    #[test]
    fn test_server_removes_specifiers() {
        let (code, ctx) = resolve(
            "const load = () => {}, util = 1; export { load as routeData, util }; export { load as routeData };",
            &TransformOptions::server(),
        );
        assert!(!code.contains("routeData"));
        assert!(code.contains("util"));
        assert_eq!(code.matches("export").count(), 1);
        assert!(ctx.has_server_export);
    }

    #[test]
    fn test_existing_marker_sets_done() {
        let (_, ctx) = resolve(
            "export var __has_server = true; export default function Page() {}",
            &TransformOptions::server(),
        );
        assert!(ctx.done);
        assert!(!ctx.has_server_export);
    }

    #[test]
    fn test_empty_export_is_untouched() {
        let (code, _) = resolve("export {};", &TransformOptions::server());
        assert!(code.contains("export {}"));
    }
}
