//! Proximity detection pass
//!
//! For every occupied cell the pass tests all pairs within the cell, then
//! all pairs against four one-sided neighbor offsets (east, northeast,
//! north, northwest). Combined with same-cell pairing, the one-sided set
//! visits each adjacent cell pair exactly once across the whole grid, so an
//! eligible pair yields exactly one event per pass.
//!
//! The scheme is complete only while every interaction range fits within
//! one cell; `SimConfig::validate` enforces that bound.

use rayon::prelude::*;

use crate::creature::state::CreatureSnapshot;
use crate::engine::queue::{EventQueue, InteractionEvent};
use crate::spatial::grid::{CellCoord, CellGrid};

/// One-sided neighbor set: east, northeast, north, northwest
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (1, 1), (0, 1), (-1, 1)];

/// Occupied-cell count above which the pass fans out over rayon
const PARALLEL_CELL_THRESHOLD: usize = 64;

/// Squared-distance test against the larger of the two interaction ranges.
/// The boundary is inclusive: distance == range qualifies.
#[inline]
fn in_range(a: &CreatureSnapshot, b: &CreatureSnapshot) -> bool {
    let range = a.kind.interaction_range().max(b.kind.interaction_range()) as i64;
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy <= range * range
}

fn scan_cell(
    grid: &CellGrid,
    coord: CellCoord,
    members: &[usize],
    snapshots: &[CreatureSnapshot],
) -> Vec<InteractionEvent> {
    let mut events = Vec::new();

    // Pairs inside the same cell
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            if in_range(&snapshots[a], &snapshots[b]) {
                events.push(InteractionEvent {
                    actor: snapshots[a].id,
                    target: snapshots[b].id,
                });
            }
        }
    }

    // Pairs against the one-sided neighbor cells
    for (dx, dy) in NEIGHBOR_OFFSETS {
        let Some(neighbors) = grid.get((coord.0 + dx, coord.1 + dy)) else {
            continue;
        };
        for &a in members {
            for &b in neighbors {
                if in_range(&snapshots[a], &snapshots[b]) {
                    events.push(InteractionEvent {
                        actor: snapshots[a].id,
                        target: snapshots[b].id,
                    });
                }
            }
        }
    }

    events
}

/// Run one detection pass over the given snapshots, pushing every detected
/// pair to the queue. Returns the number of events emitted.
pub fn detect_into(
    queue: &EventQueue,
    cell_size: i32,
    snapshots: &[CreatureSnapshot],
) -> usize {
    let grid = CellGrid::build(cell_size, snapshots);
    let occupied: Vec<(CellCoord, &[usize])> = grid.occupied().collect();

    let events: Vec<InteractionEvent> = if occupied.len() >= PARALLEL_CELL_THRESHOLD {
        occupied
            .par_iter()
            .flat_map_iter(|&(coord, members)| scan_cell(&grid, coord, members, snapshots))
            .collect()
    } else {
        occupied
            .iter()
            .flat_map(|&(coord, members)| scan_cell(&grid, coord, members, snapshots))
            .collect()
    };

    let emitted = events.len();
    queue.extend(events);
    emitted
}
