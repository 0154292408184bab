use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the radar widget and its window host.
#[derive(Debug, Error)]
pub enum RadarError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pixel surface error: {0}")]
    Surface(#[from] pixels::Error),

    #[error("failed to read font {path}: {source}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font data is not a valid TrueType or OpenType font")]
    InvalidFont,

    #[error("no string resource with id {0}")]
    MissingResource(u32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
