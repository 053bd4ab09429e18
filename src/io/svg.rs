//! Path commands and SVG path data.
//!
//! Fog items and the overlay are persisted as flat lists of path commands
//! (move, line, close). This module converts regions to commands and back,
//! and renders commands as the SVG `d` attribute.
//!
//! # Example
//!
//! ```
//! use dynfog::bounds::Aabb2;
//! use dynfog::io::commands_to_svg_path;
//! use dynfog::{Point2, Region};
//!
//! let square = Region::rect(Aabb2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)));
//! let d = commands_to_svg_path(&square.to_commands());
//! assert!(d.starts_with('M') && d.ends_with('Z'));
//! ```

use crate::polygon::{Polygon, Region};
use crate::primitives::Point2;
use serde::{Deserialize, Serialize};

/// A single absolute path command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PathCommand {
    /// Starts a new subpath.
    #[serde(rename = "move")]
    MoveTo(Point2<f64>),
    /// Straight line from the current point.
    #[serde(rename = "line")]
    LineTo(Point2<f64>),
    /// Closes the current subpath.
    Close,
}

impl Region {
    /// Converts the region to path commands, one closed subpath per ring.
    ///
    /// Render with the even-odd fill rule so holes stay open.
    pub fn to_commands(&self) -> Vec<PathCommand> {
        let mut commands = Vec::new();
        for part in self.parts() {
            push_ring(&mut commands, &part.exterior.vertices);
            for hole in &part.holes {
                push_ring(&mut commands, &hole.vertices);
            }
        }
        commands
    }

    /// Rebuilds a region from path commands under the even-odd rule.
    ///
    /// Each closed (or implicitly closed) subpath is toggled into the result,
    /// so holes emitted by [`Region::to_commands`] come back as holes.
    pub fn from_commands(commands: &[PathCommand]) -> Region {
        commands_to_rings(commands)
            .iter()
            .map(|ring| Region::from_polygon(&Polygon::new(ring.clone())))
            .fold(Region::empty(), |acc, ring| {
                let overlap = acc.intersection(&ring);
                acc.union(&ring).difference(&overlap)
            })
    }
}

fn push_ring(commands: &mut Vec<PathCommand>, ring: &[Point2<f64>]) {
    let Some((first, rest)) = ring.split_first() else {
        return;
    };
    commands.push(PathCommand::MoveTo(*first));
    commands.extend(rest.iter().map(|p| PathCommand::LineTo(*p)));
    commands.push(PathCommand::Close);
}

/// Splits path commands into rings, one per subpath.
pub fn commands_to_rings(commands: &[PathCommand]) -> Vec<Vec<Point2<f64>>> {
    let mut rings = Vec::new();
    let mut current: Vec<Point2<f64>> = Vec::new();

    for command in commands {
        match command {
            PathCommand::MoveTo(p) => {
                if !current.is_empty() {
                    rings.push(std::mem::take(&mut current));
                }
                current.push(*p);
            }
            PathCommand::LineTo(p) => current.push(*p),
            PathCommand::Close => {
                if !current.is_empty() {
                    rings.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        rings.push(current);
    }

    rings
}

/// Renders path commands as SVG path data.
pub fn commands_to_svg_path(commands: &[PathCommand]) -> String {
    let mut result = String::new();

    for command in commands {
        if !result.is_empty() {
            result.push(' ');
        }
        match command {
            PathCommand::MoveTo(p) => result.push_str(&format!("M {} {}", p.x, p.y)),
            PathCommand::LineTo(p) => result.push_str(&format!("L {} {}", p.x, p.y)),
            PathCommand::Close => result.push('Z'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb2;
    use approx::assert_relative_eq;

    #[test]
    fn test_region_commands_preserve_holes() {
        let outer = Region::rect(Aabb2::new(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)));
        let inner = Region::rect(Aabb2::new(Point2::new(1.0, 1.0), Point2::new(3.0, 3.0)));
        let frame = outer.difference(&inner);

        let commands = frame.to_commands();
        assert_eq!(commands_to_rings(&commands).len(), 2);
        assert_eq!(
            commands.iter().filter(|c| **c == PathCommand::Close).count(),
            2
        );

        let rebuilt = Region::from_commands(&commands);
        assert_relative_eq!(rebuilt.area(), 12.0, epsilon = 1e-9);
        assert!(!rebuilt.contains(Point2::new(2.0, 2.0)));
    }

    #[test]
    fn test_svg_path_rendering() {
        let commands = vec![
            PathCommand::MoveTo(Point2::new(0.0, 0.0)),
            PathCommand::LineTo(Point2::new(10.0, 0.0)),
            PathCommand::LineTo(Point2::new(10.0, 2.5)),
            PathCommand::Close,
            PathCommand::MoveTo(Point2::new(1.0, 1.0)),
        ];
        assert_eq!(
            commands_to_svg_path(&commands),
            "M 0 0 L 10 0 L 10 2.5 Z M 1 1"
        );
        assert_eq!(commands_to_rings(&commands).len(), 2);
        assert_eq!(commands_to_svg_path(&[]), "");
    }

    #[test]
    fn test_commands_serde_shape() {
        let json = serde_json::to_string(&PathCommand::MoveTo(Point2::new(1.0, 2.0))).unwrap();
        assert_eq!(json, r#"{"op":"move","x":1.0,"y":2.0}"#);
        let back: PathCommand = serde_json::from_str(r#"{"op":"close"}"#).unwrap();
        assert_eq!(back, PathCommand::Close);
    }
}
