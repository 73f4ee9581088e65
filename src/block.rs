use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical extents of one structured block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDims {
    pub ni: usize,
    pub nj: usize,
    pub nk: usize,
}

impl BlockDims {
    pub fn new(ni: usize, nj: usize, nk: usize) -> Self {
        Self { ni, nj, nk }
    }

    #[inline]
    pub fn npoints(&self) -> usize {
        self.ni * self.nj * self.nk
    }

    #[inline]
    pub fn contains(&self, [i, j, k]: [usize; 3]) -> bool {
        i < self.ni && j < self.nj && k < self.nk
    }

    /// Component-wise maximum, used to size the padded arrays.
    pub fn max(self, other: BlockDims) -> BlockDims {
        BlockDims {
            ni: self.ni.max(other.ni),
            nj: self.nj.max(other.nj),
            nk: self.nk.max(other.nk),
        }
    }
}

impl fmt::Display for BlockDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {}", self.ni, self.nj, self.nk)
    }
}

/// Maxima of every block's extents.
pub(crate) fn max_dims(dims: &[BlockDims]) -> BlockDims {
    dims.iter()
        .copied()
        .fold(BlockDims::new(0, 0, 0), BlockDims::max)
}
