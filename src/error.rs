//! Error type shared by the readers and the interpolator.

use thiserror::Error;

use crate::block::BlockDims;

pub type Result<T> = std::result::Result<T, Plot3dError>;

#[derive(Debug, Error)]
pub enum Plot3dError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file declares more data than it holds.
    #[error("truncated {section}: need {expected} bytes, {available} available")]
    Truncated {
        section: &'static str,
        expected: usize,
        available: usize,
    },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("grid has {grid} blocks but flow has {flow}")]
    BlockCountMismatch { grid: usize, flow: usize },

    #[error("block {block}: grid extents {grid} do not match flow extents {flow}")]
    DimensionMismatch {
        block: usize,
        grid: BlockDims,
        flow: BlockDims,
    },

    /// A located node lies outside its block's valid sub-volume.
    #[error("node {index:?} is outside block {block} ({dims})")]
    IndexOutOfBounds {
        block: usize,
        index: [usize; 3],
        dims: BlockDims,
    },

    #[error("block {block} requested but the grid has {count} blocks")]
    NoSuchBlock { block: usize, count: usize },

    #[error("degenerate cell: zero-length edge along axis {axis} in stage {stage}")]
    DegenerateCell { stage: u8, axis: usize },
}
