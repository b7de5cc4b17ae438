pub mod constants;
pub mod expression;
pub mod hash;
pub mod options;

pub use constants::*;
pub use expression::{is_function_like, module_export_name, peel_expression, print_program};
pub use hash::content_hash;
pub use options::*;
