//! Sparse hash grid for the detection pass
//!
//! Rebuilt from scratch once per pass: living snapshots are grouped into
//! fixed-size cells keyed by floor-divided coordinates. No index survives
//! across ticks.

use ahash::AHashMap;

use crate::creature::state::CreatureSnapshot;

/// Cell coordinate pair (floor of position / cell size)
pub type CellCoord = (i32, i32);

pub struct CellGrid {
    cell_size: i32,
    cells: AHashMap<CellCoord, Vec<usize>>,
}

impl CellGrid {
    /// Group living snapshots by cell; dead creatures are skipped.
    ///
    /// Stored values are indices into the snapshot slice the grid was built
    /// from, so a pass never has to touch the arena again.
    pub fn build(cell_size: i32, snapshots: &[CreatureSnapshot]) -> Self {
        debug_assert!(cell_size > 0);
        let mut cells: AHashMap<CellCoord, Vec<usize>> = AHashMap::new();
        for (idx, snap) in snapshots.iter().enumerate() {
            if !snap.alive {
                continue;
            }
            cells
                .entry(Self::cell_of(cell_size, snap.x, snap.y))
                .or_default()
                .push(idx);
        }
        Self { cell_size, cells }
    }

    #[inline]
    fn cell_of(cell_size: i32, x: i32, y: i32) -> CellCoord {
        (x.div_euclid(cell_size), y.div_euclid(cell_size))
    }

    /// Convert a world position to its cell coordinates
    #[inline]
    pub fn cell_coord(&self, x: i32, y: i32) -> CellCoord {
        Self::cell_of(self.cell_size, x, y)
    }

    pub fn get(&self, coord: CellCoord) -> Option<&[usize]> {
        self.cells.get(&coord).map(Vec::as_slice)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (CellCoord, &[usize])> {
        self.cells.iter().map(|(coord, members)| (*coord, members.as_slice()))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }
}
