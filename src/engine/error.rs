// Engine error taxonomy

use super::assets::AssetError;

/// Errors raised by the scene engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A value or capability did not have the expected shape.
    /// Returned before any state is touched.
    #[error("Type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A geometric computation hit a zero denominator or zero length
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl EngineError {
    pub(crate) fn mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.into(),
        }
    }
}

/// Reject non-finite scalars at a setter boundary
pub(crate) fn finite_scalar(value: f32, what: &'static str) -> Result<f32, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::mismatch(what, value.to_string()))
    }
}

/// Reject vectors with non-finite components at a setter boundary
pub(crate) fn finite_vector(
    value: crate::core::Vector2,
    what: &'static str,
) -> Result<crate::core::Vector2, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::mismatch(what, format!("{:?}", value)))
    }
}
