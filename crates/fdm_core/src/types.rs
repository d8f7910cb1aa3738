//! Settings shared by the selector, solver and assembler.

use crate::error::FdmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grid spacing used when the caller has no preference.
pub const DEFAULT_SPACING: f64 = 0.1;

/// Placement of the stencil relative to the evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "c", alias = "central")]
    Central,
    #[serde(rename = "f", alias = "forward")]
    Forward,
    #[serde(rename = "b", alias = "backward")]
    Backward,
}

impl Direction {
    pub fn tag(self) -> &'static str {
        match self {
            Direction::Central => "c",
            Direction::Forward => "f",
            Direction::Backward => "b",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Central => "central",
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = FdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "central" => Ok(Direction::Central),
            "f" | "forward" => Ok(Direction::Forward),
            "b" | "backward" => Ok(Direction::Backward),
            other => Err(FdmError::InvalidOrder(format!(
                "unknown direction '{other}', expected c, f or b"
            ))),
        }
    }
}

/// Derivative order, accuracy order and direction of a finite difference.
/// Missing fields take the [`Default`] values when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scheme {
    #[serde(alias = "n")]
    pub derivative: usize,
    #[serde(alias = "m")]
    pub accuracy: usize,
    #[serde(alias = "d")]
    pub direction: Direction,
}

impl Scheme {
    pub fn new(derivative: usize, accuracy: usize, direction: Direction) -> Self {
        Self {
            derivative,
            accuracy,
            direction,
        }
    }

    pub fn central(derivative: usize, accuracy: usize) -> Self {
        Self::new(derivative, accuracy, Direction::Central)
    }

    pub fn forward(derivative: usize, accuracy: usize) -> Self {
        Self::new(derivative, accuracy, Direction::Forward)
    }

    pub fn backward(derivative: usize, accuracy: usize) -> Self {
        Self::new(derivative, accuracy, Direction::Backward)
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Self {
            derivative: 1,
            accuracy: 2,
            direction: Direction::Central,
        }
    }
}

/// How operator rows are built where the interior stencil leaves the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Slide a stencil of the interior width inward and re-solve its weights.
    #[default]
    OneSided,
    /// Keep the interior weights and drop columns outside the grid.
    Truncate,
}
