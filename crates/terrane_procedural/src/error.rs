//! # Generation Error Types
//!
//! All errors that can occur while generating or editing chunks.

use thiserror::Error;

/// Errors raised by chunk storage access.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// A local coordinate fell outside the chunk volume.
    #[error("voxel ({x}, {y}, {z}) is outside the chunk")]
    OutOfBounds {
        /// Local X.
        x: usize,
        /// Local Y.
        y: usize,
        /// Local Z.
        z: usize,
    },
}

/// Errors that can occur during world generation.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Fractal noise parameters that would divide by zero or diverge.
    #[error("invalid noise parameters: {0}")]
    InvalidNoiseParams(String),

    /// Invalid configuration value or file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No generator registered under the requested id.
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    /// Chunk coordinate whose block origin does not fit in `i32`.
    #[error("chunk coordinate ({x}, {z}) overflows world space")]
    CoordinateOverflow {
        /// Chunk X.
        x: i32,
        /// Chunk Z.
        z: i32,
    },

    /// The batch was cancelled before this chunk started.
    #[error("generation cancelled")]
    Cancelled,

    /// Storage access failed.
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// Reading a configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for chunk storage operations.
pub type ChunkResult<T> = Result<T, ChunkError>;

/// Result type for generation operations.
pub type GenResult<T> = Result<T, GenerationError>;
