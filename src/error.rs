use std::fmt;

use thiserror::Error;

/// Acquisition axis an index refers to, used in [`AcqDataError::IndexError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Echo,
    Coil,
    Slice,
    Repetition,
    Profile,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Echo => "echo",
            Axis::Coil => "coil",
            Axis::Slice => "slice",
            Axis::Repetition => "repetition",
            Axis::Profile => "profile",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum AcqDataError {
    #[error("{axis} index {index} out of range (0..{len})")]
    IndexError { axis: Axis, index: usize, len: usize },
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
    #[error("density estimation failed for echo {echo}: {source}")]
    DensityEstimation { echo: usize, source: PlanError },
    #[cfg(feature = "snapshot")]
    #[error("snapshot codec failed: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl AcqDataError {
    pub(crate) fn check_index(axis: Axis, index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexError { axis, index, len })
        }
    }
}

/// Error reported by a [`crate::NufftPlanner`] implementation.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("degenerate node set: {0}")]
    DegenerateNodes(String),
    #[error("planning failed: {0}")]
    Other(String),
}

#[cfg(feature = "snapshot")]
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("serialization failed: {0}")]
    SerializationError(rmp_serde::encode::Error),
    #[error("deserialization failed: {0}")]
    DeserializationError(rmp_serde::decode::Error),
    #[error("decompression failed: {0}")]
    DecompressionError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionError {
    pub from: &'static str,
    pub into: &'static str,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot convert {} into {}", self.from, self.into)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    #[error("key not found")]
    KeyError,
    #[error("{0}")]
    ConversionError(ConversionError),
}
