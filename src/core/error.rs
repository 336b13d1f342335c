//! Error taxonomy for distance computation.
//!
//! A caller only ever observes three failure families: [`InvalidInput`]
//! from validation, [`SpecializationError`] when a metric rejects its
//! configuration, and [`CompilationError`] when the backend cannot produce a
//! genuinely specialized callable. [`DistanceError`] wraps all three.

use std::fmt;

use thiserror::Error;

use crate::core::specializer::Signature;

/// Which side of a distance call an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    X,
    Y,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::X => f.write_str("x"),
            Operand::Y => f.write_str("y"),
        }
    }
}

/// A malformed operand, detected before any specialization work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// The operand is not an `f64` ndarray.
    #[error(
        "operand `{operand}` is {found}, expected a 2-D f64 array of shape (channels, timepoints)"
    )]
    WrongType {
        operand: Operand,
        /// Human-readable kind of the value that was supplied.
        found: &'static str,
    },

    /// The operand is an `f64` ndarray with the wrong number of axes.
    #[error(
        "operand `{operand}` has {actual} dimension(s), expected exactly 2 (channels, timepoints)"
    )]
    WrongRank { operand: Operand, actual: usize },
}

impl InvalidInput {
    /// The operand this error refers to.
    pub fn operand(&self) -> Operand {
        match self {
            InvalidInput::WrongType { operand, .. } | InvalidInput::WrongRank { operand, .. } => {
                *operand
            }
        }
    }
}

/// A metric refused its configuration for the given operands.
///
/// Not retryable without changing the configuration or the inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecializationError {
    #[error("{metric}: parameter `{parameter}` = {value} is invalid: {reason}")]
    InvalidParameter {
        metric: &'static str,
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("{metric}: parameters `{first}` and `{second}` cannot be set together")]
    ConflictingParameters {
        metric: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{metric}: operands have {x} and {y} channels, expected the same number")]
    ChannelMismatch {
        metric: &'static str,
        x: usize,
        y: usize,
    },

    #[error(
        "{metric}: operand `{operand}` has shape {shape:?}, expected at least one channel and one timepoint"
    )]
    EmptySeries {
        metric: &'static str,
        operand: Operand,
        shape: (usize, usize),
    },

    #[error("{metric}: operands have shapes {x:?} and {y:?}, expected identical shapes")]
    ShapeMismatch {
        metric: &'static str,
        x: (usize, usize),
        y: (usize, usize),
    },
}

/// Raw failure reported by a [`Specializer`](crate::core::specializer::Specializer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend `{backend}` failed: {reason}")]
pub struct BackendError {
    pub backend: &'static str,
    pub reason: String,
}

impl BackendError {
    pub fn new(backend: &'static str, reason: impl Into<String>) -> Self {
        Self {
            backend,
            reason: reason.into(),
        }
    }
}

/// The backend did not produce a genuinely specialized callable.
///
/// Fatal for the call. There is no fallback to the
/// unspecialized path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    #[error("{metric}: could not be specialized: {source}")]
    Backend {
        metric: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("{metric}: backend returned a callable for {actual}, requested {expected}")]
    SignatureMismatch {
        metric: &'static str,
        expected: Signature,
        actual: Signature,
    },
}

/// Any failure surfaced by the distance facade.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error(transparent)]
    Specialization(#[from] SpecializationError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),
}

pub type Result<T> = std::result::Result<T, DistanceError>;

/// A metric name that does not match any known metric or alias.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown distance metric `{0}`")]
pub struct UnknownMetric(pub String);
