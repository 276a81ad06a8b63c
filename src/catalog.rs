//! Tile catalog: the sorted set of tile files in one directory.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::commit::TEMP_NAME;
use crate::error::{Result, TileError};
use crate::tile::{TileClass, TileKind, TileName};
use crate::{log_info, log_warn};

/// One tile file and its raw pixel bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRecord {
    pub name: TileName,
    /// Opaque pixel data, passed through untouched.
    pub bytes: Vec<u8>,
}

impl TileRecord {
    pub fn filename(&self) -> &str {
        self.name.as_str()
    }

    pub fn class(&self) -> TileClass {
        self.name.class()
    }

    pub fn kind(&self) -> TileKind {
        self.name.kind()
    }
}

/// All tiles of a directory in canonical (sorted) order.
///
/// Records are immutable while editing; only a committed save changes
/// which bytes sit behind which name.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    files: Vec<TileRecord>,
}

impl Catalog {
    /// Scan `dir`, validate every name, sort, and read every file.
    ///
    /// Either the whole directory loads or an error is returned; the
    /// directory itself is never touched.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let entries = fs::read_dir(&dir).map_err(|e| TileError::io(&dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TileError::io(&dir, e))?;
            let raw = entry.file_name();
            let Some(name) = raw.to_str() else {
                return Err(TileError::MalformedTileName {
                    name: raw.to_string_lossy().into_owned(),
                });
            };
            if name == TEMP_NAME {
                return Err(TileError::StrayTempFile(entry.path()));
            }
            names.push(TileName::parse(name)?);
        }
        names.sort();

        let files = names
            .into_par_iter()
            .map(|name| {
                let path = dir.join(name.as_str());
                fs::read(&path)
                    .map(|bytes| TileRecord { name, bytes })
                    .map_err(|e| TileError::io(path, e))
            })
            .collect::<Result<Vec<_>>>()?;

        log_info!("Loaded {} tile(s) from {}", files.len(), dir.display());
        Ok(Self { dir, files })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[TileRecord] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&TileRecord> {
        self.files.get(slot)
    }

    /// Warn about tiles whose size does not match the configured tile size.
    /// Content is never validated beyond this.
    pub fn report_size_mismatches(&self, expected: usize) -> usize {
        let mut count = 0;
        for rec in self.files.iter().filter(|r| r.bytes.len() != expected) {
            log_warn!(
                "Tile '{}' is {} bytes, expected {}",
                rec.filename(),
                rec.bytes.len(),
                expected
            );
            count += 1;
        }
        count
    }

    /// Mirror a committed permutation: after the renames, the name at
    /// slot `p` holds what used to be displayed at position `p`.
    pub(crate) fn apply_commit(&mut self, index: &[usize]) {
        let mut old: Vec<Option<Vec<u8>>> = self
            .files
            .iter_mut()
            .map(|r| Some(std::mem::take(&mut r.bytes)))
            .collect();
        for (rec, &slot) in self.files.iter_mut().zip(index) {
            rec.bytes = old[slot].take().unwrap_or_default();
        }
    }
}
