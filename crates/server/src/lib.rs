//! Server-data dead-code elimination for Solid Start route modules
//!
//! Route modules mix browser code (the default-exported page) with a
//! server-only `routeData` loader. This crate splits them per bundle:
//!
//! ```js
//! // Input
//! import { db } from "~/db";
//! export function routeData() { return db.load(); }
//! export default function Page() {}
//!
//! // Server bundle
//! export var __has_server = true;
//! export default function Page() {}
//!
//! // Client bundle
//! import { db } from "~/db";
//! export function routeData() { return db.load(); }
//! ```
//!
//! Whatever the removed exports alone kept alive is swept away with them,
//! repeatedly, until nothing else becomes unreferenced.

pub mod binding;
pub mod collector;
pub mod decorate;
pub mod error;
pub mod exports;
pub mod pattern;
pub mod scope;
pub mod sweep;
pub mod transform;

pub use binding::{BindingKind, RemovedBinding};
pub use error::{Result, TransformError};
pub use transform::*;
