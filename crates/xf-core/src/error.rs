//! Error types for the xfgen lighting generator

use thiserror::Error;

/// Main error type for the generator
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Lighting error: {0}")]
    Lighting(#[from] LightingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Lighting configuration errors
///
/// Every variant is a contract violation by the caller that decoded the
/// hardware state. None of them are retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LightingError {
    #[error("Invalid light index: {0} (hardware has 8 lights)")]
    InvalidLightIndex(u8),

    #[error("Invalid color channel count: {0} (at most 2)")]
    InvalidChannelCount(u32),

    #[error("Reserved {field} code: {code}")]
    ReservedFunction { field: FunctionField, code: u32 },
}

/// Register field holding a reserved function code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionField {
    Diffuse,
    Attenuation,
}

impl std::fmt::Display for FunctionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Diffuse => write!(f, "diffuse function"),
            Self::Attenuation => write!(f, "attenuation function"),
        }
    }
}

impl LightingError {
    /// Whether this error is a malformed-configuration error.
    ///
    /// All lighting errors are; the method exists so callers can match on
    /// the category without caring about the specific variant.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidLightIndex(_)
                | Self::InvalidChannelCount(_)
                | Self::ReservedFunction { .. }
        )
    }
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
