/// Crate-wide result alias.
pub type VitrineResult<T> = Result<T, VitrineError>;

#[derive(thiserror::Error, Debug)]
/// Error type for configuration, measurement and timeline composition failures.
pub enum VitrineError {
    /// Invalid configuration, item collection or element mapping.
    #[error("validation error: {0}")]
    Validation(String),

    /// An element could not be measured (unmounted or not laid out yet).
    #[error("measurement error: {0}")]
    Measurement(String),

    /// A timeline could not be composed from its steps.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped external error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VitrineError {
    /// Build a [`VitrineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VitrineError::Measurement`] value.
    pub fn measurement(msg: impl Into<String>) -> Self {
        Self::Measurement(msg.into())
    }

    /// Build a [`VitrineError::Timeline`] value.
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`VitrineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for failures that abort a transition without surfacing to the user.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Self::Measurement(_))
    }
}

impl From<serde_json::Error> for VitrineError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
