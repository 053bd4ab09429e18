//! Input/output utilities for region geometry.
//!
//! Provides the path-command form fog items are stored in, and SVG path data.

mod svg;

pub use svg::{commands_to_rings, commands_to_svg_path, PathCommand};
