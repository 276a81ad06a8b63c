//! Order engine: owns the catalog and the display permutation for one
//! editing session.

use std::path::Path;

use crate::catalog::{Catalog, TileRecord};
use crate::commit::{self, CommitReport, FsRenamer, Renamer};
use crate::error::{Result, TileError};
use crate::selection::{ClickOutcome, MoveKind, Selection};
use crate::view::PaletteView;
use crate::{log_info, log_warn};

/// Editing state for one tile directory.
///
/// `index[p]` is the catalog slot shown at display position `p`. Only
/// `index` changes while editing; `save` writes it to disk.
#[derive(Debug)]
pub struct OrderEngine {
    catalog: Catalog,
    index: Vec<usize>,
    selection: Selection,
    dirty: bool,
    /// Set after a failed commit: the disk no longer matches `catalog`.
    stale: bool,
}

impl OrderEngine {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_catalog(Catalog::load(dir)?))
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        let index = (0..catalog.len()).collect();
        Self {
            catalog,
            index,
            selection: Selection::Idle,
            dirty: false,
            stale: false,
        }
    }

    /// Rescan the directory, dropping unsaved edits. On error the current
    /// session is left as it was.
    pub fn reload(&mut self) -> Result<()> {
        let catalog = Catalog::load(self.catalog.dir())?;
        if self.dirty {
            log_info!("Discarding unsaved tile order");
        }
        *self = Self::from_catalog(catalog);
        Ok(())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn needs_reload(&self) -> bool {
        self.stale
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The tile shown at display position `position`.
    pub fn tile_at(&self, position: usize) -> Option<&TileRecord> {
        self.index.get(position).and_then(|&slot| self.catalog.get(slot))
    }

    /// Read-only snapshot for drawing.
    pub fn view(&self) -> PaletteView<'_> {
        PaletteView::new(self.catalog.files(), &self.index, self.selection.pending())
    }

    /// Exchanges a save would perform right now.
    pub fn pending_exchanges(&self) -> usize {
        commit::count_exchanges(self.catalog.files(), &self.index)
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position < self.len() {
            Ok(())
        } else {
            Err(TileError::PositionOutOfRange { position, len: self.len() })
        }
    }

    /// Reject a move whose source tile differs in class from the tile
    /// currently at the destination.
    fn check_move(&self, src: usize, dst: usize) -> Result<()> {
        if self.stale {
            return Err(TileError::ReloadRequired);
        }
        self.check_position(src)?;
        self.check_position(dst)?;

        let from = self.catalog.files()[self.index[src]].kind();
        let to = self.catalog.files()[self.index[dst]].kind();
        if from != to {
            log_warn!("Rejected move of {} tile at {} onto {} tile at {}", from, src, to, dst);
            return Err(TileError::CrossClassMove { from, to });
        }
        Ok(())
    }

    fn refresh_dirty(&mut self) {
        self.dirty = self.index.iter().enumerate().any(|(p, &slot)| p != slot);
    }

    /// Move the tile at `src` in front of the tile at `dst`, shifting the
    /// tiles in between by one.
    pub fn insert(&mut self, src: usize, dst: usize) -> Result<()> {
        self.check_move(src, dst)?;
        if src == dst {
            return Ok(());
        }

        let tile = self.index[src];
        let dst = if src > dst {
            self.index.copy_within(dst..src, dst + 1);
            dst
        } else {
            // The removed tile frees one slot ahead of `dst`.
            let dst = dst - 1;
            self.index.copy_within(src + 1..=dst, src);
            dst
        };
        self.index[dst] = tile;
        self.refresh_dirty();
        Ok(())
    }

    pub fn swap(&mut self, src: usize, dst: usize) -> Result<()> {
        self.check_move(src, dst)?;
        if src == dst {
            return Ok(());
        }
        self.index.swap(src, dst);
        self.refresh_dirty();
        Ok(())
    }

    /// Feed one click at `position`. The first in-range click selects, the
    /// second performs `kind` against the selection. Either way the
    /// selection is cleared after the second click, even if the move is
    /// rejected.
    pub fn click(&mut self, position: usize, kind: MoveKind) -> Result<ClickOutcome> {
        if position >= self.len() {
            self.selection = Selection::Idle;
            return Ok(ClickOutcome::Cancelled);
        }
        match self.selection.take() {
            Selection::Idle => {
                self.selection = Selection::Pending(position);
                Ok(ClickOutcome::Selected(position))
            }
            Selection::Pending(src) => {
                match kind {
                    MoveKind::Insert => self.insert(src, position)?,
                    MoveKind::Swap => self.swap(src, position)?,
                }
                Ok(ClickOutcome::Moved { kind, src, dst: position })
            }
        }
    }

    pub fn cancel_selection(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Commit the current order to disk.
    pub fn save(&mut self) -> Result<CommitReport> {
        self.save_with(&mut FsRenamer)
    }

    /// [`save`](Self::save) through a caller-supplied renamer.
    ///
    /// On success the in-memory catalog mirrors the new disk layout and the
    /// permutation is the identity again. On a persistence failure the
    /// permutation and dirty flag are kept and further edits are refused
    /// until [`reload`](Self::reload).
    pub fn save_with<R: Renamer + ?Sized>(&mut self, renamer: &mut R) -> Result<CommitReport> {
        if self.stale {
            return Err(TileError::ReloadRequired);
        }
        self.selection = Selection::Idle;
        if !self.dirty {
            return Ok(CommitReport::default());
        }

        let mut work = self.index.clone();
        match commit::commit_order(renamer, self.catalog.dir(), self.catalog.files(), &mut work) {
            Ok(report) => {
                self.catalog.apply_commit(&self.index);
                self.index = work;
                self.dirty = false;
                Ok(report)
            }
            Err(e) => {
                if e.needs_reload() {
                    self.stale = true;
                }
                Err(e)
            }
        }
    }
}
