//! Main server-data transform
//!
//! Runs the phases in a fixed order on one module:
//! seed references, resolve exports, sweep to a fixed point, inject the marker.

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_ast::AstBuilder;
use tracing::instrument;

use common::TransformOptions;

use crate::binding::{RemovedBinding, TransformContext};
use crate::collector::seed_references;
use crate::decorate::decorate_server_export;
use crate::error::Result;
use crate::exports::resolve_exports;
use crate::sweep::sweep;

/// What one transform did to its module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// The module exported server data before the rewrite
    pub has_server_export: bool,
    pub marker_injected: bool,
    /// Sweep passes, including the last one that removed nothing
    pub passes: usize,
    /// Removed bindings in removal order
    pub removed: Vec<RemovedBinding>,
}

/// The server-data transformer
pub struct ServerDataTransform<'a> {
    allocator: &'a Allocator,
    options: &'a TransformOptions,
}

impl<'a> ServerDataTransform<'a> {
    pub fn new(allocator: &'a Allocator, options: &'a TransformOptions) -> Self {
        Self { allocator, options }
    }

    /// Run the transform on a program.
    ///
    /// On error the program may be partly rewritten and must be discarded.
    #[instrument(level = "debug", skip_all, fields(filename = %self.options.filename, mode = ?self.options.mode))]
    pub fn transform(self, program: &mut Program<'a>) -> Result<TransformReport> {
        let mut ctx = TransformContext::new();

        // The reference set is taken from the module as written, before any
        // export is removed
        seed_references(program, &mut ctx)?;
        resolve_exports(program, self.options, &mut ctx);
        sweep(program, self.options, &mut ctx)?;
        let marker_injected = decorate_server_export(
            program,
            AstBuilder::new(self.allocator),
            self.options,
            &mut ctx,
        );

        Ok(TransformReport {
            has_server_export: ctx.has_server_export,
            marker_injected,
            passes: ctx.passes,
            removed: ctx.removed,
        })
    }
}
