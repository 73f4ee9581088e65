//! Trilinear sampling of a flow solution at located points.
//!
//! A [`CellLocator`] (supplied by the caller) turns a query point into a
//! [`LocatedCell`]. [`TrilinearInterpolator`] then returns the node state
//! directly when the point sits on a node, blends the eight corner states
//! when it sits inside a cell, and reports an absent value otherwise.
//!
//! Corner ordering for [`Location::InCell`]: corners 0-1-2-3 and 4-5-6-7 are
//! the two faces, separated along the third axis. Edges 0-1, 3-2, 4-5 and
//! 7-6 run along the first axis.
//!
//! Blending weights come from physical coordinate differences at every
//! stage, not from parametric cell coordinates. This is exact on rectilinear
//! cells and first-order on skewed ones.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Plot3dError, Result};
use crate::flow::{FlowState, MultiBlockFlow, NUM_CHANNELS};
use crate::grid::MultiBlockGrid;

/// `(i, j, k)` node index within one block.
pub type NodeIndex = [usize; 3];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Location {
    /// Strictly inside the hexahedron bounded by `corners` in `block`.
    InCell {
        block: usize,
        corners: [NodeIndex; 8],
    },
    /// On a grid node, within [`crate::NODE_TOLERANCE`].
    AtNode { block: usize, index: NodeIndex },
    /// Outside every block.
    OutOfDomain { diagnostic: String },
}

/// Output of a cell search for one query point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocatedCell {
    pub point: [f64; 3],
    pub location: Location,
}

impl LocatedCell {
    pub fn in_cell(point: [f64; 3], block: usize, corners: [NodeIndex; 8]) -> Self {
        Self {
            point,
            location: Location::InCell { block, corners },
        }
    }

    pub fn at_node(point: [f64; 3], block: usize, index: NodeIndex) -> Self {
        Self {
            point,
            location: Location::AtNode { block, index },
        }
    }

    pub fn out_of_domain(point: [f64; 3], diagnostic: impl Into<String>) -> Self {
        Self {
            point,
            location: Location::OutOfDomain {
                diagnostic: diagnostic.into(),
            },
        }
    }
}

/// Finds the cell containing a point. Implemented outside this crate.
pub trait CellLocator {
    fn locate(&self, grid: &MultiBlockGrid, point: [f64; 3]) -> LocatedCell;
}

/// Result of sampling the flow at one point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Interpolated {
    State(FlowState),
    /// No value: the point is outside the domain.
    OutOfDomain { diagnostic: String },
}

impl Interpolated {
    pub fn state(&self) -> Option<&FlowState> {
        match self {
            Interpolated::State(q) => Some(q),
            Interpolated::OutOfDomain { .. } => None,
        }
    }

    pub fn into_state(self) -> Option<FlowState> {
        match self {
            Interpolated::State(q) => Some(q),
            Interpolated::OutOfDomain { .. } => None,
        }
    }

    pub fn is_out_of_domain(&self) -> bool {
        matches!(self, Interpolated::OutOfDomain { .. })
    }
}

// Geometry travels with the state so each stage has coordinates to weight by.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Sample {
    xyz: [f64; 3],
    q: [f64; NUM_CHANNELS],
}

/// Linear blend of `a` and `b` to where coordinate `axis` equals `p`.
fn lerp(p: f64, a: &Sample, b: &Sample, axis: usize, stage: u8) -> Result<Sample> {
    let denom = b.xyz[axis] - a.xyz[axis];
    if denom == 0.0 {
        return Err(Plot3dError::DegenerateCell { stage, axis });
    }
    let wa = (b.xyz[axis] - p) / denom;
    let wb = 1.0 - wa;

    let mut out = Sample {
        xyz: [0.0; 3],
        q: [0.0; NUM_CHANNELS],
    };
    for (o, (x, y)) in out.xyz.iter_mut().zip(a.xyz.iter().zip(b.xyz.iter())) {
        *o = wa * x + wb * y;
    }
    for (o, (x, y)) in out.q.iter_mut().zip(a.q.iter().zip(b.q.iter())) {
        *o = wa * x + wb * y;
    }
    Ok(out)
}

/// Samples a flow solution on the grid it was computed on.
#[derive(Copy, Clone, Debug)]
pub struct TrilinearInterpolator<'a> {
    grid: &'a MultiBlockGrid,
    flow: &'a MultiBlockFlow,
}

impl<'a> TrilinearInterpolator<'a> {
    /// Fails if `flow` does not have the same block layout as `grid`.
    pub fn new(grid: &'a MultiBlockGrid, flow: &'a MultiBlockFlow) -> Result<Self> {
        flow.check_matches(grid)?;
        Ok(Self { grid, flow })
    }

    pub fn interpolate(&self, located: &LocatedCell) -> Result<Interpolated> {
        match &located.location {
            Location::OutOfDomain { diagnostic } => {
                debug!(
                    point = ?located.point,
                    %diagnostic,
                    "point out of domain, not interpolating"
                );
                Ok(Interpolated::OutOfDomain {
                    diagnostic: diagnostic.clone(),
                })
            }
            Location::AtNode { block, index } => {
                self.flow.state_at(*block, *index).map(Interpolated::State)
            }
            Location::InCell { block, corners } => self
                .trilinear(located.point, *block, corners)
                .map(Interpolated::State),
        }
    }

    /// Locate `point` with `locator`, then interpolate.
    pub fn sample<L: CellLocator + ?Sized>(
        &self,
        locator: &L,
        point: [f64; 3],
    ) -> Result<Interpolated> {
        let located = locator.locate(self.grid, point);
        self.interpolate(&located)
    }

    /// Interpolate many independent points in parallel. Results keep the
    /// order of `cells`.
    pub fn interpolate_all(&self, cells: &[LocatedCell]) -> Vec<Result<Interpolated>> {
        cells.par_iter().map(|c| self.interpolate(c)).collect()
    }

    fn trilinear(
        &self,
        point: [f64; 3],
        block: usize,
        corners: &[NodeIndex; 8],
    ) -> Result<FlowState> {
        let mut c = [Sample {
            xyz: [0.0; 3],
            q: [0.0; NUM_CHANNELS],
        }; 8];
        for (s, &ijk) in c.iter_mut().zip(corners.iter()) {
            s.xyz = self.grid.xyz(block, ijk)?;
            s.q = self.flow.state_at(block, ijk)?.0;
        }
        let [x, y, z] = point;

        // first axis: edges of both faces
        let e01 = lerp(x, &c[0], &c[1], 0, 1)?;
        let e32 = lerp(x, &c[3], &c[2], 0, 1)?;
        let e45 = lerp(x, &c[4], &c[5], 0, 1)?;
        let e76 = lerp(x, &c[7], &c[6], 0, 1)?;

        // second axis: across each face
        let f0123 = lerp(y, &e01, &e32, 1, 2)?;
        let f4567 = lerp(y, &e45, &e76, 1, 2)?;

        // third axis: between the faces
        let out = lerp(z, &f0123, &f4567, 2, 3)?;
        Ok(FlowState(out.q))
    }
}

/// One-shot form of [`TrilinearInterpolator::interpolate`].
pub fn interpolate(
    grid: &MultiBlockGrid,
    flow: &MultiBlockFlow,
    located: &LocatedCell,
) -> Result<Interpolated> {
    TrilinearInterpolator::new(grid, flow)?.interpolate(located)
}
