//! Solid Start server-data compiler
//!
//! An OXC-based pass that separates a route module's `routeData` loader from
//! its page component and sweeps whatever either side leaves unreferenced.
//!
//! ## Usage
//!
//! ```rust
//! use solid_start_oxc::{transform, TransformOptions};
//!
//! let source = r#"
//! import { load } from "./db";
//! export function routeData() { return load(); }
//! export default function Page() { return null; }
//! "#;
//! let output = transform(source, Some(TransformOptions::server())).unwrap();
//! assert!(!output.code.contains("load"));
//! assert!(output.code.contains("__has_server"));
//! ```

pub use common::{content_hash, CompileMode, TransformOptions};
pub use server::{BindingKind, RemovedBinding, TransformError, TransformReport};

#[cfg(feature = "napi")]
use napi_derive::napi;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, IndentChar};
use oxc_parser::Parser;
use oxc_span::SourceType;
use rayon::prelude::*;
use tracing::debug;

use std::path::PathBuf;

use server::ServerDataTransform;

/// Rewritten module plus what the pass did to it
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    /// Source map as JSON (if enabled)
    pub map: Option<String>,
    pub report: TransformReport,
}

/// Result of a transform operation
#[cfg(feature = "napi")]
#[napi(object)]
pub struct TransformResult {
    /// The transformed code
    pub code: String,
    /// Source map (if enabled)
    pub map: Option<String>,
    /// Whether the module exported `routeData` before the rewrite
    pub has_server_export: bool,
    /// Whether `__has_server` was injected by this run
    pub marker_injected: bool,
    /// Names of the removed bindings, in removal order
    pub removed: Vec<String>,
}

/// Transform options exposed to JavaScript
#[cfg(feature = "napi")]
#[napi(object)]
#[derive(Default)]
pub struct JsTransformOptions {
    /// Keep server exports (server bundle) or strip the page (client bundle)
    /// @default false
    pub keep_server_exports: Option<bool>,

    /// Source filename
    /// @default "input.jsx"
    pub filename: Option<String>,

    /// Whether to generate source maps
    /// @default false
    pub source_map: Option<bool>,

    /// Fail instead of sweeping past this many passes
    pub max_passes: Option<u32>,
}

/// Transform a route module for the client or server bundle
#[cfg(feature = "napi")]
#[napi]
pub fn transform_route_data(
    source: String,
    options: Option<JsTransformOptions>,
) -> napi::Result<TransformResult> {
    let js_options = options.unwrap_or_default();

    let defaults = TransformOptions::start_defaults();
    let options = TransformOptions {
        mode: CompileMode::from(js_options.keep_server_exports.unwrap_or(false)),
        filename: js_options.filename.unwrap_or(defaults.filename.clone()),
        source_map: js_options.source_map.unwrap_or(false),
        max_passes: js_options.max_passes.map(|n| n as usize),
        ..defaults
    };

    let output = transform_internal(&source, &options)
        .map_err(|err| napi::Error::from_reason(err.to_string()))?;

    Ok(TransformResult {
        code: output.code,
        map: output.map,
        has_server_export: output.report.has_server_export,
        marker_injected: output.report.marker_injected,
        removed: output.report.removed.into_iter().map(|r| r.name).collect(),
    })
}

/// Short content hash used to name emitted chunks
#[cfg(feature = "napi")]
#[napi(js_name = "contentHash")]
pub fn content_hash_js(input: String) -> String {
    content_hash(&input)
}

/// Internal transform function
pub fn transform(
    source: &str,
    options: Option<TransformOptions>,
) -> Result<TransformOutput, TransformError> {
    let options = options.unwrap_or_else(TransformOptions::start_defaults);
    transform_internal(source, &options)
}

/// Transform many `(filename, source)` modules in parallel.
///
/// Each module gets its own allocator; results come back in input order.
pub fn transform_batch(
    modules: &[(&str, &str)],
    options: &TransformOptions,
) -> Vec<Result<TransformOutput, TransformError>> {
    modules
        .par_iter()
        .map(|(filename, source)| {
            let options = options.clone().with_filename(*filename);
            transform_internal(source, &options)
        })
        .collect()
}

fn transform_internal(
    source: &str,
    options: &TransformOptions,
) -> Result<TransformOutput, TransformError> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(&options.filename).unwrap_or(SourceType::tsx());

    // Parse the source
    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(TransformError::host(format!(
            "failed to parse {}: {}",
            options.filename, message
        )));
    }
    let mut program = ret.program;

    let report = ServerDataTransform::new(&allocator, options).transform(&mut program)?;
    debug!(
        filename = %options.filename,
        removed = report.removed.len(),
        passes = report.passes,
        "transformed module"
    );

    // Generate code
    let generated = Codegen::new()
        .with_options(CodegenOptions {
            source_map_path: if options.source_map {
                Some(PathBuf::from(&options.filename))
            } else {
                None
            },
            indent_width: 2,
            indent_char: IndentChar::Space,
            ..CodegenOptions::default()
        })
        .build(&program);

    Ok(TransformOutput {
        code: generated.code,
        map: generated.map.map(|m| m.to_json_string()),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE: &str = r#"
import { createServerData$ } from "solid-start/server";
export function routeData() {
  return createServerData$(() => 1);
}
export default function Page() {
  return <div />;
}
"#;

    #[test]
    fn test_defaults_to_client_mode() {
        let output = transform(ROUTE, None).unwrap();
        assert!(output.code.contains("export function routeData"));
        assert!(!output.code.contains("export default"));
    }

    #[test]
    fn test_server_mode() {
        let output = transform(ROUTE, Some(TransformOptions::server())).unwrap();
        assert!(!output.code.contains("createServerData$"));
        assert!(output.code.contains("export var __has_server = true"));
        assert!(output.report.marker_injected);
    }

    #[test]
    fn test_parse_error_is_host_failure() {
        let err = transform("export default function (", None).unwrap_err();
        assert!(matches!(err, TransformError::HostPrimitiveFailure { .. }));
    }

    #[test]
    fn test_source_map() {
        let options = TransformOptions {
            source_map: true,
            ..TransformOptions::server()
        };
        let output = transform(ROUTE, Some(options)).unwrap();
        assert!(output.map.is_some());
        assert!(transform(ROUTE, None).unwrap().map.is_none());
    }

    #[test]
    fn test_typescript_by_extension() {
        let source = "type Props = { id: string };\nexport default function Page(props: Props) {}";
        let options = TransformOptions::server().with_filename("route.tsx");
        let output = transform(source, Some(options)).unwrap();
        assert!(output.code.contains("Props"));
    }
}
