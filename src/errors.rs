//! Validation errors

use crate::float_types::Real;
use std::fmt::Display;

/// All the possible validation issues we might encounter while building a tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (EmptyPointSet) There are no points to distribute
    EmptyPointSet,
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    InvalidCoordinate { index: usize, point: [Real; 3] },
    /// (ZeroLengthVector) The point has no direction
    ZeroLengthVector { index: usize },
    /// (InvalidConfig) A build parameter is out of range
    InvalidConfig(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyPointSet => write!(f, "(EmptyPointSet) Cannot build a quadtree without points"),
            ValidationError::InvalidCoordinate { index, point } => write!(
                f,
                "(InvalidCoordinate) Point {} ({}, {}, {}) has a NaN or infinite coordinate",
                index, point[0], point[1], point[2]
            ),
            ValidationError::ZeroLengthVector { index } => write!(f, "(ZeroLengthVector) Point {} has zero length and no direction", index),
            ValidationError::InvalidConfig(str) => write!(f, "(InvalidConfig) {}", str),
        }
    }
}
