use std::fmt;

use ndarray::{s, Array5, ArrayView4};

use crate::block::{max_dims, BlockDims};
use crate::error::{Plot3dError, Result};

/// Multi-block structured mesh held in one block-padded array.
///
/// `coordinates` is shaped `(max_ni, max_nj, max_nk, 3, nblocks)`. For block
/// `b` only `[0..ni, 0..nj, 0..nk, .., b]` is geometry; the rest is zero
/// padding and the accessors below refuse to hand it out.
#[derive(Clone, Debug)]
pub struct MultiBlockGrid {
    dims: Vec<BlockDims>,
    coordinates: Array5<f64>,
}

impl MultiBlockGrid {
    pub(crate) fn from_parts(dims: Vec<BlockDims>, coordinates: Array5<f64>) -> Self {
        debug_assert_eq!(coordinates.shape()[4], dims.len());
        Self { dims, coordinates }
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

    /// The whole padded array, padding included.
    #[inline]
    pub fn coordinates(&self) -> &Array5<f64> {
        &self.coordinates
    }

    pub fn block_dims(&self, block: usize) -> Result<BlockDims> {
        self.dims.get(block).copied().ok_or(Plot3dError::NoSuchBlock {
            block,
            count: self.dims.len(),
        })
    }

    /// Valid `(ni, nj, nk, 3)` sub-volume of one block.
    pub fn block_coordinates(&self, block: usize) -> Result<ArrayView4<'_, f64>> {
        let d = self.block_dims(block)?;
        Ok(self
            .coordinates
            .slice(s![0..d.ni, 0..d.nj, 0..d.nk, .., block]))
    }

    /// Coordinates of node `(i, j, k)` in `block`.
    pub fn xyz(&self, block: usize, index: [usize; 3]) -> Result<[f64; 3]> {
        self.check_node(block, index)?;
        let [i, j, k] = index;
        Ok([
            self.coordinates[[i, j, k, 0, block]],
            self.coordinates[[i, j, k, 1, block]],
            self.coordinates[[i, j, k, 2, block]],
        ])
    }

    pub(crate) fn check_node(&self, block: usize, index: [usize; 3]) -> Result<()> {
        let dims = self.block_dims(block)?;
        if !dims.contains(index) {
            return Err(Plot3dError::IndexOutOfBounds { block, index, dims });
        }
        Ok(())
    }
}

impl fmt::Display for MultiBlockGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.max_dims();
        writeln!(f, "Multi-block grid with {} block(s)", self.block_count())?;
        for (b, d) in self.dims.iter().enumerate() {
            writeln!(f, "  block {b}: {d}")?;
        }
        write!(
            f,
            "coordinates shaped ({}, {}, {}, 3, {}); component 0..3 = x, y, z",
            m.ni,
            m.nj,
            m.nk,
            self.block_count()
        )
    }
}
