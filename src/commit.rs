//! Rename commit: realise a display order on disk by swapping file names.
//!
//! The display order is sorted back to canonical order with an insertion
//! sort. Every adjacent swap the sort makes is mirrored on disk as an
//! exchange of two file names through one temporary name:
//!
//! ```text
//!   A -> temp,  B -> A,  temp -> B
//! ```
//!
//! An exchange either completes or is rolled back, so between exchanges the
//! directory always holds exactly the names it started with.

use std::fs;
use std::io;
use std::path::Path;

use crate::catalog::TileRecord;
use crate::error::{ExchangeError, ExchangeStep, Result, TileError};
use crate::{log_err, log_info};

/// Temporary name used while two tiles trade places.
pub const TEMP_NAME: &str = ".t";

/// The filesystem operation a commit needs.
pub trait Renamer {
    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Renames on the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRenamer;

impl Renamer for FsRenamer {
    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommitReport {
    pub exchanges: usize,
}

impl CommitReport {
    pub fn renames(&self) -> usize {
        self.exchanges * 3
    }
}

/// Swap the names of files `first` and `second` in `dir`.
///
/// If a step fails the earlier steps are undone before returning, so no
/// temporary name is left behind unless the undo itself fails.
pub fn exchange<R: Renamer + ?Sized>(
    renamer: &mut R,
    dir: &Path,
    first: &str,
    second: &str,
) -> std::result::Result<(), ExchangeError> {
    let a = dir.join(first);
    let b = dir.join(second);
    let temp = dir.join(TEMP_NAME);

    let fail = |step, rolled_back, source| ExchangeError {
        first: first.to_string(),
        second: second.to_string(),
        step,
        rolled_back,
        source,
    };

    if let Err(e) = renamer.rename(&a, &temp) {
        return Err(fail(ExchangeStep::Park, true, e));
    }
    if let Err(e) = renamer.rename(&b, &a) {
        let rolled_back = renamer.rename(&temp, &a).is_ok();
        return Err(fail(ExchangeStep::Shift, rolled_back, e));
    }
    if let Err(e) = renamer.rename(&temp, &b) {
        let rolled_back =
            renamer.rename(&a, &b).is_ok() && renamer.rename(&temp, &a).is_ok();
        return Err(fail(ExchangeStep::Restore, rolled_back, e));
    }
    Ok(())
}

/// Number of exchanges a commit of `index` would perform.
pub fn count_exchanges(files: &[TileRecord], index: &[usize]) -> usize {
    let mut count = 0;
    for i in 0..index.len() {
        for j in i + 1..index.len() {
            if files[index[i]].name > files[index[j]].name {
                count += 1;
            }
        }
    }
    count
}

/// Commit the display order `index` over `files` (canonical order) in `dir`.
///
/// `index` is sorted in lockstep with the renames; on success it is the
/// identity permutation. On failure it reflects exactly the exchanges that
/// reached the disk, and the error carries their count.
pub fn commit_order<R: Renamer + ?Sized>(
    renamer: &mut R,
    dir: &Path,
    files: &[TileRecord],
    index: &mut [usize],
) -> Result<CommitReport> {
    let temp = dir.join(TEMP_NAME);
    if fs::symlink_metadata(&temp).is_ok() {
        return Err(TileError::StrayTempFile(temp));
    }

    let mut report = CommitReport::default();
    for i in 1..index.len() {
        let mut j = i;
        while j > 0 && files[index[j - 1]].name > files[index[j]].name {
            let first = files[index[j - 1]].filename();
            let second = files[index[j]].filename();
            if let Err(source) = exchange(renamer, dir, first, second) {
                log_err!("Commit stopped after {} exchange(s): {}", report.exchanges, source);
                return Err(TileError::Persistence {
                    completed: report.exchanges,
                    source,
                });
            }
            index.swap(j - 1, j);
            report.exchanges += 1;
            j -= 1;
        }
    }

    log_info!(
        "Committed tile order in {} ({} exchange(s), {} rename(s))",
        dir.display(),
        report.exchanges,
        report.renames()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    /// Renamer that records every rename and can fail the n-th call.
    struct Scripted {
        calls: usize,
        fail_on: Vec<usize>,
        log: Vec<(PathBuf, PathBuf)>,
    }

    impl Scripted {
        fn failing(fail_on: &[usize]) -> Self {
            Self { calls: 0, fail_on: fail_on.to_vec(), log: Vec::new() }
        }
    }

    impl Renamer for Scripted {
        fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on.contains(&call) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected"));
            }
            self.log.push((from.to_path_buf(), to.to_path_buf()));
            fs::rename(from, to)
        }
    }

    fn contents(dir: &Path) -> BTreeMap<String, String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| {
                let e = e.unwrap();
                let name = e.file_name().into_string().unwrap();
                (name, fs::read_to_string(e.path()).unwrap())
            })
            .collect()
    }

    fn setup(tiles: &[(&str, &str)]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for (name, body) in tiles {
            fs::write(tmp.path().join(name), body).unwrap();
        }
        tmp
    }

    #[test]
    fn exchange_swaps_contents() {
        let tmp = setup(&[("1", "one"), ("2", "two")]);
        exchange(&mut FsRenamer, tmp.path(), "1", "2").unwrap();

        let got = contents(tmp.path());
        assert_eq!(got["1"], "two");
        assert_eq!(got["2"], "one");
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn exchange_rolls_back_each_step() {
        for step in 0..3 {
            let tmp = setup(&[("1", "one"), ("2", "two")]);
            let mut r = Scripted::failing(&[step]);
            let err = exchange(&mut r, tmp.path(), "1", "2").unwrap_err();
            assert!(err.rolled_back, "step {step} did not roll back");

            let got = contents(tmp.path());
            assert_eq!(got.len(), 2);
            assert_eq!(got["1"], "one");
            assert_eq!(got["2"], "two");
        }
    }

    #[test]
    fn failed_rollback_is_reported() {
        let tmp = setup(&[("1", "one"), ("2", "two")]);
        // Shift fails, then so does the undo of park.
        let mut r = Scripted::failing(&[1, 2]);
        let err = exchange(&mut r, tmp.path(), "1", "2").unwrap_err();
        assert_eq!(err.step, ExchangeStep::Shift);
        assert!(!err.rolled_back);
    }

    #[test]
    fn commit_sorts_index_to_identity() {
        let tmp = setup(&[("1", "a"), ("2", "b"), ("3", "c"), ("4", "d")]);
        let cat = Catalog::load(tmp.path()).unwrap();
        let mut index = vec![3, 1, 0, 2];
        let expected = count_exchanges(cat.files(), &index);

        let report = commit_order(&mut FsRenamer, tmp.path(), cat.files(), &mut index).unwrap();
        assert_eq!(index, [0, 1, 2, 3]);
        assert_eq!(report.exchanges, expected);

        let got = contents(tmp.path());
        assert_eq!(
            got.values().map(String::as_str).collect::<Vec<_>>(),
            ["d", "b", "a", "c"]
        );
    }

    #[test]
    fn identity_commits_nothing() {
        let tmp = setup(&[("1", "a"), ("2", "b"), ("a1", "c")]);
        let cat = Catalog::load(tmp.path()).unwrap();
        let mut index = vec![0, 1, 2];
        let mut r = Scripted::failing(&[]);

        let report = commit_order(&mut r, tmp.path(), cat.files(), &mut index).unwrap();
        assert_eq!(report.renames(), 0);
        assert!(r.log.is_empty());
    }

    #[test]
    fn failure_keeps_completed_exchanges() {
        let tmp = setup(&[("1", "a"), ("2", "b"), ("3", "c")]);
        let cat = Catalog::load(tmp.path()).unwrap();
        // Reversal needs three exchanges; fail inside the second.
        let mut index = vec![2, 1, 0];
        let mut r = Scripted::failing(&[4]);

        let err = commit_order(&mut r, tmp.path(), cat.files(), &mut index).unwrap_err();
        match err {
            TileError::Persistence { completed, source } => {
                assert_eq!(completed, 1);
                assert!(source.rolled_back);
            }
            other => panic!("unexpected error: {other}"),
        }
        let got = contents(tmp.path());
        assert_eq!(got.len(), 3);
        assert!(!got.contains_key(TEMP_NAME));
    }

    #[test]
    fn stray_temp_blocks_commit() {
        let tmp = setup(&[("1", "a"), ("2", "b")]);
        let cat = Catalog::load(tmp.path()).unwrap();
        fs::write(tmp.path().join(TEMP_NAME), "left over").unwrap();

        let mut index = vec![1, 0];
        let mut r = Scripted::failing(&[]);
        let err = commit_order(&mut r, tmp.path(), cat.files(), &mut index).unwrap_err();
        assert!(matches!(err, TileError::StrayTempFile(_)));
        assert!(r.log.is_empty());
        assert_eq!(index, [1, 0]);
    }
}
