//! Tile set editor core.
//!
//! A tile palette is a directory with one raw image file per tile, named
//! `<n>` for passable tiles and `<letter><n>` for impassable ones. The
//! palette order (and so each tile's in-game index) is the sorted order of
//! those names. [`OrderEngine`] lets the order be rearranged in memory and
//! then commits it by swapping file names on disk.

pub mod logger;

pub mod catalog;
pub mod commit;
pub mod engine;
pub mod error;
pub mod selection;
pub mod settings;
pub mod sheet;
pub mod tile;
pub mod view;

pub use catalog::{Catalog, TileRecord};
pub use commit::{CommitReport, FsRenamer, Renamer};
pub use engine::OrderEngine;
pub use error::{ExchangeError, ExchangeStep, Result, TileError};
pub use selection::{ClickOutcome, MoveKind, Selection};
pub use settings::EditorSettings;
pub use tile::{TileClass, TileKind, TileName};
pub use view::{GridLayout, PaletteView};
