//! Epsilon-aware geometric predicates and operations.
//!
//! All functions in this module take explicit tolerance parameters.
//! No hidden epsilons are used.

mod predicates;
mod weld;

pub use predicates::{is_close, wrap_index};
pub use weld::{remove_collinear_vertices, remove_duplicate_vertices};
