//! Error types for hand skeleton operations.

use thiserror::Error;

/// Errors that can occur while building, converting or configuring hand data.
#[derive(Debug, Error)]
pub enum HandError {
    /// A joint array is shorter than the convention requires.
    #[error("insufficient joints: expected at least {expected}, got {actual}")]
    InsufficientJoints {
        /// Minimum number of joints required.
        expected: usize,
        /// Number of joints provided.
        actual: usize,
    },

    /// A joint references a parent at or after its own index.
    #[error("invalid hierarchy: joint {joint} has parent {parent}")]
    InvalidHierarchy {
        /// Offending joint index.
        joint: usize,
        /// Parent index it references.
        parent: usize,
    },

    /// An axis triple is not orthonormal.
    #[error("invalid hand space: {0}")]
    InvalidHandSpace(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed.
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl HandError {
    /// Creates an insufficient joints error.
    #[must_use]
    pub const fn insufficient_joints(expected: usize, actual: usize) -> Self {
        Self::InsufficientJoints { expected, actual }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an invalid hand space error.
    #[must_use]
    pub fn invalid_hand_space(reason: impl Into<String>) -> Self {
        Self::InvalidHandSpace(reason.into())
    }

    /// Check if this is malformed (too short) input.
    #[must_use]
    pub fn is_insufficient_joints(&self) -> bool {
        matches!(self, Self::InsufficientJoints { .. })
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::Parse(_))
    }
}

/// Result type for hand operations.
pub type Result<T> = std::result::Result<T, HandError>;
