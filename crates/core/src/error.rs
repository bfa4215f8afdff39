//! Error types for point cloud access and views.

/// Result alias used across the core crate.
pub type Result<T> = std::result::Result<T, CloudError>;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CloudError {
    /// 2D access on a cloud whose height marks it as a plain sequence.
    #[error("cloud is not organized (width {width}, height {height})")]
    Unorganized { width: usize, height: usize },

    #[error("position {position} is out of range for a cloud of {len} points")]
    InvalidPosition { position: usize, len: usize },

    #[error("range {start}..{end} is out of range for a cloud of {len} points")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("invalid matrix view: {reason}")]
    InvalidView { reason: String },

    #[error("point storage cannot be viewed as floats: {0:?}")]
    PodCast(bytemuck::PodCastError),
}
