//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`Error`] covers all failure modes including:
//! - Malformed scene input (bad indices, inconsistent skins, broken hierarchies)
//! - Unsupported features (cubic-spline sampling, compressed mip generation)
//! - Image decoding and file I/O failures
//! - GPU device and atlas allocation failures
//!
//! Structural failures abort the load of the offending model. Cosmetic,
//! per-resource failures are logged and degraded by the caller instead of
//! surfacing here.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, Error>`.

use thiserror::Error;

/// The main error type for scene loading and evaluation.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Malformed Input
    // ========================================================================
    /// An index in the source document points outside its target array.
    #[error("Index out of bounds: {context} (index: {index})")]
    IndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    /// Structurally invalid input that is not a plain bad index.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A skin declares a different number of joints and inverse bind matrices.
    #[error("Skin {skin} has {joints} joints but {matrices} inverse bind matrices")]
    SkinJointMismatch {
        skin: usize,
        joints: usize,
        matrices: usize,
    },

    /// A node is reachable twice from the declared roots (cycle or shared child).
    #[error("Node {node} is reachable more than once from the scene roots")]
    InvalidNodeGraph { node: usize },

    // ========================================================================
    // Unsupported Features
    // ========================================================================
    /// The input uses a feature this crate recognizes but does not implement.
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    // ========================================================================
    // Usage Errors
    // ========================================================================
    /// A transform buffer does not match the model it is queried against.
    #[error(
        "Incompatible transforms: model has {expected} nodes, buffer has {local} local and {global} global matrices"
    )]
    IncompatibleTransforms {
        expected: usize,
        local: usize,
        global: usize,
    },

    /// Invalid loader configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Image & I/O Errors
    // ========================================================================
    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // GPU Errors
    // ========================================================================
    /// The GPU device refused to create a resource.
    #[error("Device error: {0}")]
    Device(String),

    /// The texture atlas could not place an allocation.
    #[error("Atlas error: {0}")]
    Atlas(String),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// glTF parsing or loading error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    Gltf(String),

    /// Base64 decoding error in an embedded data URI.
    #[cfg(feature = "gltf")]
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl Error {
    pub(crate) fn out_of_bounds(context: impl Into<String>, index: usize) -> Self {
        Error::IndexOutOfBounds {
            context: context.into(),
            index,
        }
    }
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for Error {
    fn from(err: gltf::Error) -> Self {
        Error::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
