//! Tile sheet export: every tile in display order composed into one image.

use std::path::Path;

use image::{imageops, RgbaImage};

use crate::error::{Result, TileError};
use crate::log_info;
use crate::view::{tile_rgba, PaletteView};

/// Compose `view` into a sheet `across` tiles wide with no padding.
/// Tiles of the wrong size stay transparent.
pub fn compose_sheet(
    view: &PaletteView<'_>,
    across: usize,
    dimension: usize,
    bytes_per_pixel: usize,
) -> Result<RgbaImage> {
    if !matches!(bytes_per_pixel, 3 | 4) {
        return Err(TileError::UnsupportedPixelFormat(bytes_per_pixel));
    }
    let across = across.max(1);
    let rows = view.len().div_ceil(across).max(1);
    let dim = dimension as u32;
    let mut sheet = RgbaImage::new(across as u32 * dim, rows as u32 * dim);

    for (position, tile) in view.tiles().enumerate() {
        let Some(rgba) = tile_rgba(&tile.bytes, dimension, bytes_per_pixel) else {
            continue;
        };
        let Some(cell) = RgbaImage::from_raw(dim, dim, rgba) else {
            continue;
        };
        let x = (position % across) as i64 * dim as i64;
        let y = (position / across) as i64 * dim as i64;
        imageops::replace(&mut sheet, &cell, x, y);
    }
    Ok(sheet)
}

/// Write the sheet to `out`; the format follows the file extension.
pub fn export_sheet(
    view: &PaletteView<'_>,
    across: usize,
    dimension: usize,
    bytes_per_pixel: usize,
    out: &Path,
) -> Result<()> {
    let sheet = compose_sheet(view, across, dimension, bytes_per_pixel)?;
    sheet.save(out)?;
    log_info!(
        "Exported {} tile(s) to {} ({}x{})",
        view.len(),
        out.display(),
        sheet.width(),
        sheet.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OrderEngine;
    use std::fs;

    fn solid(rgb: [u8; 3]) -> Vec<u8> {
        rgb.repeat(4)
    }

    #[test]
    fn sheet_follows_display_order() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("1"), solid([255, 0, 0])).unwrap();
        fs::write(tmp.path().join("2"), solid([0, 255, 0])).unwrap();
        fs::write(tmp.path().join("3"), b"short").unwrap();
        let mut eng = OrderEngine::load(tmp.path()).unwrap();
        eng.swap(0, 1).unwrap();

        let sheet = compose_sheet(&eng.view(), 2, 2, 3).unwrap();
        assert_eq!(sheet.dimensions(), (4, 4));
        assert_eq!(sheet.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(sheet.get_pixel(3, 1).0, [255, 0, 0, 255]);
        // Wrong-sized tile is left blank.
        assert_eq!(sheet.get_pixel(0, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn export_writes_png() {
        let tmp = tempfile::tempdir().unwrap();
        let tiles = tmp.path().join("tiles");
        fs::create_dir(&tiles).unwrap();
        fs::write(tiles.join("1"), solid([1, 2, 3])).unwrap();
        let eng = OrderEngine::load(&tiles).unwrap();

        let out = tmp.path().join("sheet.png");
        export_sheet(&eng.view(), 16, 2, 3, &out).unwrap();
        let img = image::open(&out).unwrap().into_rgba8();
        assert_eq!(img.dimensions(), (32, 2));
    }

    #[test]
    fn odd_pixel_sizes_are_rejected() {
        let view = PaletteView::new(&[], &[], None);
        assert!(matches!(
            compose_sheet(&view, 4, 2, 2),
            Err(TileError::UnsupportedPixelFormat(2))
        ));
    }
}
