use std::fmt;

use ndarray::{s, Array5, ArrayView4};
use serde::{Deserialize, Serialize};

use crate::block::{max_dims, BlockDims};
use crate::error::{Plot3dError, Result};
use crate::grid::MultiBlockGrid;

/// Number of conserved variables stored per node.
pub const NUM_CHANNELS: usize = 5;

/// Reference flow condition stored ahead of each block's field data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Freestream {
    pub mach: f64,
    /// Angle of attack.
    pub alpha: f64,
    pub reynolds: f64,
    pub time: f64,
}

impl Freestream {
    pub(crate) fn from_slice(v: &[f64]) -> Self {
        Self {
            mach: v[0],
            alpha: v[1],
            reynolds: v[2],
            time: v[3],
        }
    }
}

/// Conserved flow state at one point:
/// `(density, momentum_x, momentum_y, momentum_z, energy)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowState(pub [f64; NUM_CHANNELS]);

impl FlowState {
    #[inline]
    pub fn density(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn momentum(&self) -> [f64; 3] {
        [self.0[1], self.0[2], self.0[3]]
    }

    #[inline]
    pub fn energy(&self) -> f64 {
        self.0[4]
    }

    /// Momentum divided by density. Non-finite where density is zero.
    pub fn velocity(&self) -> [f64; 3] {
        let rho = self.density();
        let [mx, my, mz] = self.momentum();
        [mx / rho, my / rho, mz / rho]
    }

    #[inline]
    pub fn as_array(&self) -> &[f64; NUM_CHANNELS] {
        &self.0
    }
}

/// Multi-block flow solution, padded like [`MultiBlockGrid`].
///
/// `state` is shaped `(max_ni, max_nj, max_nk, 5, nblocks)`.
#[derive(Clone, Debug)]
pub struct MultiBlockFlow {
    dims: Vec<BlockDims>,
    freestream: Freestream,
    state: Array5<f64>,
}

impl MultiBlockFlow {
    pub(crate) fn from_parts(
        dims: Vec<BlockDims>,
        freestream: Freestream,
        state: Array5<f64>,
    ) -> Self {
        debug_assert_eq!(state.shape()[4], dims.len());
        Self {
            dims,
            freestream,
            state,
        }
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn dims(&self) -> &[BlockDims] {
        &self.dims
    }

    pub fn max_dims(&self) -> BlockDims {
        max_dims(&self.dims)
    }

    /// Freestream of block 0; see [`crate::read::read_flow`].
    #[inline]
    pub fn freestream(&self) -> Freestream {
        self.freestream
    }

    #[inline]
    pub fn state(&self) -> &Array5<f64> {
        &self.state
    }

    pub fn block_dims(&self, block: usize) -> Result<BlockDims> {
        self.dims.get(block).copied().ok_or(Plot3dError::NoSuchBlock {
            block,
            count: self.dims.len(),
        })
    }

    /// Valid `(ni, nj, nk, 5)` sub-volume of one block.
    pub fn block_state(&self, block: usize) -> Result<ArrayView4<'_, f64>> {
        let d = self.block_dims(block)?;
        Ok(self.state.slice(s![0..d.ni, 0..d.nj, 0..d.nk, .., block]))
    }

    /// Stored state of node `(i, j, k)` in `block`, unmodified.
    pub fn state_at(&self, block: usize, index: [usize; 3]) -> Result<FlowState> {
        let dims = self.block_dims(block)?;
        if !dims.contains(index) {
            return Err(Plot3dError::IndexOutOfBounds { block, index, dims });
        }
        let [i, j, k] = index;
        let mut q = [0.0; NUM_CHANNELS];
        for (c, v) in q.iter_mut().enumerate() {
            *v = self.state[[i, j, k, c, block]];
        }
        Ok(FlowState(q))
    }

    /// Fails unless this solution has the same block layout as `grid`.
    pub fn check_matches(&self, grid: &MultiBlockGrid) -> Result<()> {
        if grid.block_count() != self.block_count() {
            return Err(Plot3dError::BlockCountMismatch {
                grid: grid.block_count(),
                flow: self.block_count(),
            });
        }
        for (block, (g, q)) in grid.dims().iter().zip(self.dims.iter()).enumerate() {
            if g != q {
                return Err(Plot3dError::DimensionMismatch {
                    block,
                    grid: *g,
                    flow: *q,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for MultiBlockFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.max_dims();
        let fs = self.freestream;
        writeln!(f, "Multi-block flow with {} block(s)", self.block_count())?;
        for (b, d) in self.dims.iter().enumerate() {
            writeln!(f, "  block {b}: {d}")?;
        }
        writeln!(
            f,
            "freestream: mach={} alpha={} reynolds={} time={}",
            fs.mach, fs.alpha, fs.reynolds, fs.time
        )?;
        write!(
            f,
            "state shaped ({}, {}, {}, 5, {}); channels = density, momentum x/y/z, energy",
            m.ni,
            m.nj,
            m.nk,
            self.block_count()
        )
    }
}
