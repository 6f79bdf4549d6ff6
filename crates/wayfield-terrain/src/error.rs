//! Terrain error types.

/// Errors raised while building terrain components from parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// A parameter is outside the range the noise or grid math can use.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name, e.g. `scale`.
        name: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
