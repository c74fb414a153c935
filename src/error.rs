//! Error types for material preparation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PrepError.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for material preparation operations.
#[derive(Error, Debug)]
pub enum PrepError {
    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read, decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The block catalog is absent or could not be parsed.
    #[error("Block catalog unavailable: {0}")]
    CatalogMissing(String),

    /// Invalid resource pack location.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// No image for a block could be found in the resource pack.
    #[error("Image not found for {0}")]
    ImageNotFound(String),

    /// The diffuse pass is absent or has zero size.
    #[error("Diffuse image missing or empty for material {0}")]
    DiffuseMissing(String),

    /// An animated texture is not a vertical stack of square tiles.
    #[error("Invalid tile ratio for {path}: {width}x{height}")]
    TileRatioInvalid {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    /// The animation slicer could not write its output.
    #[error("Cannot write to {path}: {reason}")]
    UnwritablePath { path: PathBuf, reason: String },

    /// The active render engine is not supported.
    #[error("Unsupported render engine: {0}")]
    EngineUnsupported(String),

    /// A node link referenced a socket the node type does not have.
    #[error("Invalid node link: {0}")]
    GraphLink(String),

    /// An image handle does not belong to the image cache.
    #[error("Unknown image handle: {0}")]
    UnknownImage(usize),
}
