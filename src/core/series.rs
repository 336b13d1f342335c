//! Operand representation and validation.
//!
//! A time series is a 2-D `f64` array: axis 0 indexes channels, axis 1
//! indexes timepoints. [`SeriesInput`] is everything a caller may hand to
//! the facade; [`validate`] accepts only the well-formed case and borrows it
//! as an [`ArrayView2`].

use ndarray::{Array, ArrayView, ArrayView2, ArrayViewD, Dimension, Ix2};

use crate::core::error::{InvalidInput, Operand};

/// A candidate time series, prior to validation.
///
/// Construct it through the `From` conversions; the facade accepts
/// `impl Into<SeriesInput>`.
#[derive(Debug, Clone)]
pub enum SeriesInput<'a> {
    /// An `f64` array of any rank.
    Array(ArrayViewD<'a, f64>),
    /// A single-precision array. Not a recognized series type.
    F32Array(ArrayViewD<'a, f32>),
    /// A flat slice of values.
    Sequence(&'a [f64]),
    /// Row-wise nested vectors.
    Nested(&'a [Vec<f64>]),
    Scalar(f64),
}

impl SeriesInput<'_> {
    /// Short description of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SeriesInput::Array(_) => "an f64 array",
            SeriesInput::F32Array(_) => "an f32 array",
            SeriesInput::Sequence(_) => "a plain slice",
            SeriesInput::Nested(_) => "a nested Vec",
            SeriesInput::Scalar(_) => "a scalar",
        }
    }
}

impl<'a, D: Dimension> From<&'a Array<f64, D>> for SeriesInput<'a> {
    fn from(a: &'a Array<f64, D>) -> Self {
        SeriesInput::Array(a.view().into_dyn())
    }
}

impl<'a, D: Dimension> From<ArrayView<'a, f64, D>> for SeriesInput<'a> {
    fn from(a: ArrayView<'a, f64, D>) -> Self {
        SeriesInput::Array(a.into_dyn())
    }
}

impl<'a, D: Dimension> From<&'a Array<f32, D>> for SeriesInput<'a> {
    fn from(a: &'a Array<f32, D>) -> Self {
        SeriesInput::F32Array(a.view().into_dyn())
    }
}

impl<'a, D: Dimension> From<ArrayView<'a, f32, D>> for SeriesInput<'a> {
    fn from(a: ArrayView<'a, f32, D>) -> Self {
        SeriesInput::F32Array(a.into_dyn())
    }
}

impl<'a> From<&'a [f64]> for SeriesInput<'a> {
    fn from(s: &'a [f64]) -> Self {
        SeriesInput::Sequence(s)
    }
}

impl<'a> From<&'a Vec<f64>> for SeriesInput<'a> {
    fn from(s: &'a Vec<f64>) -> Self {
        SeriesInput::Sequence(s.as_slice())
    }
}

impl<'a> From<&'a [Vec<f64>]> for SeriesInput<'a> {
    fn from(rows: &'a [Vec<f64>]) -> Self {
        SeriesInput::Nested(rows)
    }
}

impl<'a> From<&'a Vec<Vec<f64>>> for SeriesInput<'a> {
    fn from(rows: &'a Vec<Vec<f64>>) -> Self {
        SeriesInput::Nested(rows.as_slice())
    }
}

impl From<f64> for SeriesInput<'_> {
    fn from(v: f64) -> Self {
        SeriesInput::Scalar(v)
    }
}

/// Check that `input` is a 2-D `f64` array and borrow it as such.
///
/// `operand` is only used to label the error.
pub fn validate<'a>(
    input: SeriesInput<'a>,
    operand: Operand,
) -> Result<ArrayView2<'a, f64>, InvalidInput> {
    let array = match input {
        SeriesInput::Array(a) => a,
        other => {
            log::trace!("operand {operand} rejected: {}", other.kind());
            return Err(InvalidInput::WrongType {
                operand,
                found: other.kind(),
            });
        }
    };

    let actual = array.ndim();
    array
        .into_dimensionality::<Ix2>()
        .map_err(|_| InvalidInput::WrongRank { operand, actual })
}
