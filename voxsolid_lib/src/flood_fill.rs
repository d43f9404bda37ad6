//! Interior segmentation of occupancy volumes using a 6-connected flood fill
//!
//! The input is a binary occupancy grid describing a closed surface: `0` marks empty space,
//! any nonzero value marks a surface/solid cell. [`fill_interior`] classifies every empty
//! cell as exterior (reachable from the volume boundary through a 6-connected path of empty
//! cells) or interior (enclosed by the surface) and returns the solid mask, i.e. `1` for
//! solid and enclosed cells and `0` for exterior-reachable empty space.

use std::collections::VecDeque;

use itertools::iproduct;
use log::info;
use thiserror::Error as ThisError;

use crate::topology::DirectedAxis;
use crate::volume::VoxelVolume;

/// Error type returned when the interior segmentation fails
#[derive(Clone, Eq, PartialEq, Debug, ThisError)]
pub enum SegmentationError {
    /// The grid has a zero extent on at least one axis
    #[error("invalid grid shape {0:?}, every axis extent has to be at least one")]
    InvalidShape([usize; 3]),
}

/// Classification state of a cell during the traversal
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum CellState {
    /// Original zero cell, not (yet) reached by the flood fill
    Empty,
    /// Original nonzero cell, never transitions
    Solid,
    /// Empty cell reached from a boundary seed, terminal state
    Exterior,
}

/// Computes the solid mask of the given occupancy volume
///
/// Empty cells connected to one of the six bounding faces through a 6-connected path of
/// empty cells are classified as exterior and end up as `0` in the output. All other cells
/// (original surface markers and enclosed voids) end up as `1`. The output volume has the
/// same extents as the input; the input is not mutated.
///
/// The result is a deterministic function of the input grid: the fill computes a
/// reachability set, so neither the face seeding order nor the frontier processing order
/// affects the classification.
pub fn fill_interior(volume: &VoxelVolume<u8>) -> Result<VoxelVolume<u8>, SegmentationError> {
    let dims = volume.dims();
    let [d, h, w] = dims;
    if d < 1 || h < 1 || w < 1 {
        return Err(SegmentationError::InvalidShape(dims));
    }

    info!("Segmenting interior of a {}x{}x{} occupancy volume", d, h, w);

    let mut states: Vec<CellState> = volume
        .data()
        .iter()
        .map(|&value| {
            if value == 0 {
                CellState::Empty
            } else {
                CellState::Solid
            }
        })
        .collect();

    // Every cell is enqueued at most once, so the frontier never outgrows the cell count
    let mut frontier: VecDeque<[usize; 3]> = VecDeque::with_capacity(volume.num_cells());

    // Seed phase: mark all empty cells on the six bounding faces as exterior. Cells on
    // shared edges/corners are visited more than once, but marking happens at enqueue
    // time, so a second visit is a no-op lookup instead of a duplicate insert.
    for (y, x) in iproduct!(0..h, 0..w) {
        try_mark_exterior(volume, &mut states, &mut frontier, [0, y, x]);
        try_mark_exterior(volume, &mut states, &mut frontier, [d - 1, y, x]);
    }
    for (z, x) in iproduct!(0..d, 0..w) {
        try_mark_exterior(volume, &mut states, &mut frontier, [z, 0, x]);
        try_mark_exterior(volume, &mut states, &mut frontier, [z, h - 1, x]);
    }
    for (z, y) in iproduct!(0..d, 0..h) {
        try_mark_exterior(volume, &mut states, &mut frontier, [z, y, 0]);
        try_mark_exterior(volume, &mut states, &mut frontier, [z, y, w - 1]);
    }

    // Propagation phase: expand the frontier in FIFO order over the 6-connected
    // neighborhood until the exterior-reachable component is exhausted
    while let Some(index) = frontier.pop_front() {
        for step in DirectedAxis::all_possible() {
            // Volume index triplets are ordered (z, y, x) while the axes count (x, y, z)
            let dim = 2 - step.axis.dim();
            let neighbor_coord = match step.direction.checked_apply_step(index[dim], 1) {
                Some(coord) => coord,
                None => continue,
            };
            let mut neighbor = index;
            neighbor[dim] = neighbor_coord;
            if volume.contains_index(neighbor) {
                try_mark_exterior(volume, &mut states, &mut frontier, neighbor);
            }
        }
    }

    // Classification phase: cells never reached by the fill are interior voids
    let mask: Vec<u8> = states
        .iter()
        .map(|&state| if state == CellState::Exterior { 0 } else { 1 })
        .collect();

    if log::log_enabled!(log::Level::Info) {
        let n_exterior = mask.iter().filter(|&&m| m == 0).count();
        let n_solid = volume.data().iter().filter(|&&v| v != 0).count();
        let n_interior = mask.len() - n_exterior - n_solid;
        info!(
            "Classified {} exterior, {} interior and {} surface cells",
            n_exterior, n_interior, n_solid
        );
    }

    let mask = VoxelVolume::from_vec(dims, mask).expect("mask has one value per input cell");
    Ok(mask)
}

/// Marks the given cell as exterior and enqueues it if it is still unvisited empty space
#[inline(always)]
fn try_mark_exterior(
    volume: &VoxelVolume<u8>,
    states: &mut [CellState],
    frontier: &mut VecDeque<[usize; 3]>,
    index: [usize; 3],
) {
    let flat_index = volume.flatten_index(index);
    if states[flat_index] == CellState::Empty {
        states[flat_index] = CellState::Exterior;
        frontier.push_back(index);
    }
}
