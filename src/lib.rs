//! Organized point clouds: a grid-aware point container plus the small set of
//! geometric helpers (eigen decomposition, distances, line intersection and
//! bounds) that operate on it.
//!
//! The container and point types come from `pointclouds-core`, the helpers
//! from `pointclouds-common`. Both are re-exported here.

#![forbid(unsafe_code)]

pub use pointclouds_common::*;
pub use pointclouds_core::*;
