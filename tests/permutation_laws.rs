//! Property-based tests for the reordering operations
//!
//! Uses proptest to check that insert/swap keep the permutation valid and
//! obey their inverse laws on randomly built palettes.

use std::collections::HashSet;
use std::fs;

use proptest::prelude::*;
use tileseted::{OrderEngine, TileError, TileKind};

/// Palette with `passable` numeric tiles followed by `impassable` `x<n>` tiles.
fn palette(passable: usize, impassable: usize) -> (tempfile::TempDir, OrderEngine) {
    let tmp = tempfile::tempdir().unwrap();
    for n in 0..passable {
        fs::write(tmp.path().join(n.to_string()), [n as u8]).unwrap();
    }
    for n in 0..impassable {
        fs::write(tmp.path().join(format!("x{}", n)), [n as u8]).unwrap();
    }
    let eng = OrderEngine::load(tmp.path()).unwrap();
    (tmp, eng)
}

fn is_permutation(index: &[usize]) -> bool {
    let seen: HashSet<_> = index.iter().copied().collect();
    seen.len() == index.len() && index.iter().all(|&s| s < index.len())
}

/// Where the tile moved by `insert(src, dst)` ends up.
fn landed(src: usize, dst: usize) -> usize {
    if src < dst { dst - 1 } else { dst }
}

proptest! {
    #[test]
    fn prop_edits_keep_bijection(
        passable in 1usize..12,
        impassable in 0usize..12,
        ops in prop::collection::vec((any::<bool>(), 0usize..24, 0usize..24), 0..60)
    ) {
        let (_tmp, mut eng) = palette(passable, impassable);
        let n = eng.len();

        for (is_insert, a, b) in ops {
            let (a, b) = (a % n, b % n);
            let before = eng.index().to_vec();
            let result = if is_insert { eng.insert(a, b) } else { eng.swap(a, b) };
            match result {
                Ok(()) => {}
                Err(TileError::CrossClassMove { .. }) => {
                    prop_assert_eq!(eng.index(), &before[..]);
                }
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            }
            prop_assert!(is_permutation(eng.index()));
            prop_assert_eq!(eng.is_dirty(), eng.index().iter().enumerate().any(|(p, &s)| p != s));
        }
    }

    #[test]
    fn prop_classes_stay_partitioned(
        passable in 1usize..10,
        impassable in 1usize..10,
        ops in prop::collection::vec((any::<bool>(), 0usize..20, 0usize..20), 0..40)
    ) {
        let (_tmp, mut eng) = palette(passable, impassable);
        let n = eng.len();
        for (is_insert, a, b) in ops {
            let (a, b) = (a % n, b % n);
            let _ = if is_insert { eng.insert(a, b) } else { eng.swap(a, b) };
        }

        let kinds: Vec<_> = (0..n).map(|p| eng.tile_at(p).unwrap().kind()).collect();
        let first_impassable = kinds.iter().position(|k| *k == TileKind::Impassable).unwrap_or(n);
        prop_assert!(kinds[first_impassable..].iter().all(|k| *k == TileKind::Impassable));
    }

    #[test]
    fn prop_insert_round_trips(
        count in 2usize..20,
        src in 0usize..20,
        dst in 0usize..20
    ) {
        let (_tmp, mut eng) = palette(count, 0);
        let (src, dst) = (src % count, dst % count);
        let original = eng.index().to_vec();

        eng.insert(src, dst).unwrap();
        let at = landed(src, dst);
        // A tile moved backward returns by moving forward, which lands one
        // short of the target; it cannot return to the very last slot.
        let back = if at < src { src + 1 } else { src };
        prop_assume!(back < count);
        eng.insert(at, back).unwrap();

        prop_assert_eq!(eng.index(), &original[..]);
    }

    #[test]
    fn prop_swap_is_involution(
        count in 1usize..20,
        a in 0usize..20,
        b in 0usize..20,
        prefix in prop::collection::vec((0usize..20, 0usize..20), 0..10)
    ) {
        let (_tmp, mut eng) = palette(count, 0);
        for (x, y) in prefix {
            eng.swap(x % count, y % count).unwrap();
        }
        let before = eng.index().to_vec();
        let (a, b) = (a % count, b % count);

        eng.swap(a, b).unwrap();
        eng.swap(a, b).unwrap();
        prop_assert_eq!(eng.index(), &before[..]);
    }
}

#[test]
fn passable_and_impassable_never_trade() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("3"), b"p").unwrap();
    fs::write(tmp.path().join("a1"), b"i").unwrap();
    let mut eng = OrderEngine::load(tmp.path()).unwrap();

    assert!(matches!(eng.insert(0, 1), Err(TileError::CrossClassMove { .. })));
    assert!(matches!(eng.insert(1, 0), Err(TileError::CrossClassMove { .. })));
    assert!(matches!(eng.swap(0, 1), Err(TileError::CrossClassMove { .. })));
    assert_eq!(eng.index(), [0, 1]);
}
