//! Node coincidence test for structured grid blocks.

use crate::error::Result;
use crate::grid::MultiBlockGrid;

/// Absolute distance under which a query point is treated as a grid node.
pub const NODE_TOLERANCE: f64 = 1e-6;

/// Find the node of `block` closest to `point`.
///
/// Returns `Some([i, j, k])` if that node is within `tol` (Euclidean
/// distance), otherwise `None`. Only the block's own extents are searched,
/// never the padding.
pub fn point_match(
    grid: &MultiBlockGrid,
    block: usize,
    point: [f64; 3],
    tol: f64,
) -> Result<Option<[usize; 3]>> {
    let coords = grid.block_coordinates(block)?;
    let (ni, nj, nk, _) = coords.dim();

    let mut best_dist = f64::INFINITY;
    let mut best_idx = [0usize; 3];

    for k in 0..nk {
        for j in 0..nj {
            for i in 0..ni {
                let dx = point[0] - coords[[i, j, k, 0]];
                let dy = point[1] - coords[[i, j, k, 1]];
                let dz = point[2] - coords[[i, j, k, 2]];
                let d = (dx * dx + dy * dy + dz * dz).sqrt();
                if d < best_dist {
                    best_dist = d;
                    best_idx = [i, j, k];
                }
            }
        }
    }

    if best_dist < tol {
        Ok(Some(best_idx))
    } else {
        Ok(None)
    }
}
