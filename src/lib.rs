pub mod block;
pub mod error;
pub mod flow;
pub mod grid;
pub mod interpolation;
pub mod point_match;
pub mod read;
pub mod utils;

pub use block::BlockDims;
pub use error::{Plot3dError, Result};
pub use flow::{FlowState, Freestream, MultiBlockFlow, NUM_CHANNELS};
pub use grid::MultiBlockGrid;
pub use interpolation::{
    interpolate, CellLocator, Interpolated, LocatedCell, Location, NodeIndex,
    TrilinearInterpolator,
};
pub use point_match::{point_match, NODE_TOLERANCE};
pub use read::{
    read_flow, read_flow_from, read_grid, read_grid_from, ReadOptions, DEFAULT_MAX_PADDED_ELEMENTS,
};
pub use utils::{Endian, FloatPrecision};
