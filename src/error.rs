//! Error types for catalog loading, reordering and rename commits.

use std::path::PathBuf;

use thiserror::Error;

use crate::tile::TileKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TileError>;

#[derive(Error, Debug)]
pub enum TileError {
    /// A directory entry is neither `digits` nor `letter+digits`.
    #[error("malformed tile name '{name}' (expected digits or a letter followed by digits)")]
    MalformedTileName { name: String },

    /// A leftover temporary file from an interrupted exchange.
    #[error("stray exchange file {} found; restore it by hand before editing", .0.display())]
    StrayTempFile(PathBuf),

    #[error("cannot move {from} tile to {to} region")]
    CrossClassMove { from: TileKind, to: TileKind },

    #[error("position {position} is outside the palette (size {len})")]
    PositionOutOfRange { position: usize, len: usize },

    /// Save failed part way; `completed` exchanges are fully on disk.
    #[error("save failed after {completed} completed exchange(s): {source}")]
    Persistence {
        completed: usize,
        #[source]
        source: ExchangeError,
    },

    #[error("the tile directory no longer matches the editor; reload before editing")]
    ReloadRequired,

    #[error("unsupported pixel size: {0} bytes per pixel")]
    UnsupportedPixelFormat(usize),

    #[error("sheet export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TileError::Io { path: path.into(), source }
    }

    /// True for errors after which the on-disk state may not match memory.
    pub fn needs_reload(&self) -> bool {
        matches!(self, TileError::Persistence { .. } | TileError::ReloadRequired)
    }
}

/// The rename inside an exchange that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStep {
    /// `A -> temp`
    Park,
    /// `B -> A`
    Shift,
    /// `temp -> B`
    Restore,
}

impl std::fmt::Display for ExchangeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeStep::Park => write!(f, "park"),
            ExchangeStep::Shift => write!(f, "shift"),
            ExchangeStep::Restore => write!(f, "restore"),
        }
    }
}

/// A failed 3-rename exchange between two tile files.
#[derive(Error, Debug)]
#[error("exchanging '{first}' and '{second}' failed at the {step} step: {source}{}", rollback_note(.rolled_back))]
pub struct ExchangeError {
    pub first: String,
    pub second: String,
    pub step: ExchangeStep,
    /// False when undoing the earlier steps of the triple also failed.
    pub rolled_back: bool,
    #[source]
    pub source: std::io::Error,
}

fn rollback_note(rolled_back: &bool) -> &'static str {
    if *rolled_back {
        " (rolled back)"
    } else {
        " (rollback failed, directory needs repair)"
    }
}
