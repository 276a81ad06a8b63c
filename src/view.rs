//! Read-only palette snapshot and grid geometry used by the renderers.

use crate::catalog::TileRecord;

/// What a frame needs to draw the palette.
#[derive(Debug, Clone, Copy)]
pub struct PaletteView<'a> {
    files: &'a [TileRecord],
    index: &'a [usize],
    selected: Option<usize>,
}

impl<'a> PaletteView<'a> {
    pub fn new(files: &'a [TileRecord], index: &'a [usize], selected: Option<usize>) -> Self {
        Self { files, index, selected }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Catalog slot and record shown at `position`.
    pub fn tile(&self, position: usize) -> Option<(usize, &'a TileRecord)> {
        let slot = *self.index.get(position)?;
        Some((slot, self.files.get(slot)?))
    }

    /// Tiles in display order.
    pub fn tiles(&self) -> impl Iterator<Item = &'a TileRecord> + 'a {
        let files = self.files;
        self.index.iter().filter_map(move |&slot| files.get(slot))
    }
}

/// Fixed-size grid the palette is laid out on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub tiles_across: usize,
    pub tiles_down: usize,
    /// Tile edge in pixels.
    pub dimension: usize,
    pub padding: usize,
}

impl GridLayout {
    /// Distance between the origins of neighbouring cells.
    pub fn pitch(&self) -> f32 {
        (self.dimension + self.padding) as f32
    }

    /// Rows needed for `count` tiles. Always leaves one spare row.
    pub fn rows(&self, count: usize) -> usize {
        count / self.tiles_across.max(1) + 1
    }

    /// Highest first-visible row the scrollbar may reach.
    pub fn max_scroll(&self, count: usize) -> usize {
        self.rows(count).saturating_sub(self.tiles_down)
    }

    /// Size in pixels of the visible grid.
    pub fn viewport_size(&self) -> (f32, f32) {
        let span = |n: usize| (n * self.dimension + n.saturating_sub(1) * self.padding) as f32;
        (span(self.tiles_across), span(self.tiles_down))
    }

    /// Top-left of the cell at visible `(col, row)`, relative to the grid.
    pub fn cell_origin(&self, col: usize, row: usize) -> (f32, f32) {
        (col as f32 * self.pitch(), row as f32 * self.pitch())
    }

    /// Display position under grid-relative point `(x, y)` with `scroll_row`
    /// rows scrolled away. Points in the padding count toward the next cell.
    /// The result may lie past the last tile; callers treat that as a miss.
    pub fn position_at(&self, x: f32, y: f32, scroll_row: usize) -> Option<usize> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let pad = self.padding as f32;
        let col = ((x + pad) / self.pitch()) as usize;
        let row = ((y + pad) / self.pitch()) as usize;
        if col >= self.tiles_across || row >= self.tiles_down {
            return None;
        }
        Some((row + scroll_row) * self.tiles_across + col)
    }

    /// `(col, row, position)` for every visible cell that holds a tile.
    pub fn visible_cells(
        &self,
        scroll_row: usize,
        count: usize,
    ) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let first = scroll_row * self.tiles_across;
        let last = (first + self.tiles_across * self.tiles_down).min(count);
        (first..last).map(move |p| {
            let rel = p - first;
            (rel % self.tiles_across, rel / self.tiles_across, p)
        })
    }
}

/// Expand raw tile bytes to RGBA. `None` if the length does not match
/// `dimension`×`dimension` pixels of `bytes_per_pixel` (3 or 4).
pub fn tile_rgba(bytes: &[u8], dimension: usize, bytes_per_pixel: usize) -> Option<Vec<u8>> {
    if bytes.len() != dimension * dimension * bytes_per_pixel {
        return None;
    }
    match bytes_per_pixel {
        4 => Some(bytes.to_vec()),
        3 => Some(
            bytes
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: GridLayout = GridLayout {
        tiles_across: 16,
        tiles_down: 10,
        dimension: 32,
        padding: 2,
    };

    #[test]
    fn rows_and_scroll_range() {
        assert_eq!(LAYOUT.rows(0), 1);
        assert_eq!(LAYOUT.rows(16), 2);
        assert_eq!(LAYOUT.rows(170), 11);
        assert_eq!(LAYOUT.max_scroll(40), 0);
        assert_eq!(LAYOUT.max_scroll(170), 1);
    }

    #[test]
    fn viewport_matches_cells_and_padding() {
        assert_eq!(LAYOUT.viewport_size(), (16.0 * 32.0 + 15.0 * 2.0, 10.0 * 32.0 + 9.0 * 2.0));
    }

    #[test]
    fn hit_testing() {
        assert_eq!(LAYOUT.position_at(0.0, 0.0, 0), Some(0));
        assert_eq!(LAYOUT.position_at(33.0, 0.0, 0), Some(1));
        assert_eq!(LAYOUT.position_at(5.0, 40.0, 0), Some(16));
        assert_eq!(LAYOUT.position_at(5.0, 40.0, 3), Some(64));
        assert_eq!(LAYOUT.position_at(-1.0, 0.0, 0), None);
        assert_eq!(LAYOUT.position_at(16.0 * 34.0, 0.0, 0), None);
    }

    #[test]
    fn visible_cells_stop_at_tile_count() {
        let cells: Vec<_> = LAYOUT.visible_cells(1, 20).collect();
        assert_eq!(cells, [(0, 0, 16), (1, 0, 17), (2, 0, 18), (3, 0, 19)]);
    }

    #[test]
    fn rgb_tiles_gain_alpha() {
        let rgb: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let rgba = tile_rgba(&rgb, 2, 3).unwrap();
        assert_eq!(rgba, [1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255]);
        assert!(tile_rgba(&rgb[1..], 2, 3).is_none());
        assert!(tile_rgba(&[0; 8], 2, 2).is_none());
    }
}
