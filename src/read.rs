use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ndarray::{s, Array5, ArrayView, ShapeBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::block::{max_dims, BlockDims};
use crate::error::{Plot3dError, Result};
use crate::flow::{Freestream, MultiBlockFlow, NUM_CHANNELS};
use crate::grid::MultiBlockGrid;
use crate::utils::{ByteCursor, Endian, FloatPrecision};

/// Number of freestream scalars preceding each block's flow data.
const NUM_FREESTREAM: usize = 4;

/// Default cap on the padded array, in elements (8 GiB of f64).
pub const DEFAULT_MAX_PADDED_ELEMENTS: usize = 1 << 30;

/// How payload elements are encoded on disk. Header integers are always
/// 4-byte signed and follow the same byte order.
///
/// `max_padded_elements` bounds `max_ni * max_nj * max_nk * channels * nblocks`.
/// Blocks that are thin along different axes pad out to far more than the
/// file holds, so headers past the bound are rejected before allocating.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    pub precision: FloatPrecision,
    pub endian: Endian,
    pub max_padded_elements: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            precision: FloatPrecision::default(),
            endian: Endian::default(),
            max_padded_elements: DEFAULT_MAX_PADDED_ELEMENTS,
        }
    }
}

impl ReadOptions {
    pub fn new(precision: FloatPrecision, endian: Endian) -> Self {
        Self {
            precision,
            endian,
            ..Self::default()
        }
    }
}

/// Read a raw binary multi-block grid file.
///
/// Layout: `i32 nblocks`, `i32[3 * nblocks]` extents, then every block's
/// `(i, j, k, xyz)` coordinates back to back, column-major per block.
pub fn read_grid(path: impl AsRef<Path>, opts: &ReadOptions) -> Result<MultiBlockGrid> {
    let path = path.as_ref();
    let f = File::open(path)?;
    let grid = read_grid_from(BufReader::new(f), opts)?;
    info!(path = %path.display(), blocks = grid.block_count(), "grid read");
    Ok(grid)
}

pub fn read_grid_from(mut r: impl Read, opts: &ReadOptions) -> Result<MultiBlockGrid> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;
    let mut cur = ByteCursor::new(&buf, opts.endian);

    let dims = read_header(&mut cur)?;
    let counts = dims
        .iter()
        .map(|d| element_count(d, 3))
        .collect::<Result<Vec<_>>>()?;
    let total = checked_total(counts.iter().copied())?;
    let payload = cur.read_floats(total, opts.precision, "grid coordinates")?;
    warn_trailing(&cur, "grid");

    let mut coordinates = padded_zeros(&dims, 3, opts.max_padded_elements)?;
    let mut offset = 0;
    for (b, (d, &n)) in dims.iter().zip(counts.iter()).enumerate() {
        place_block(&mut coordinates, b, d, 3, &payload[offset..offset + n])?;
        offset += n;
    }

    Ok(MultiBlockGrid::from_parts(dims, coordinates))
}

/// Read a raw binary multi-block flow (Q) file.
///
/// Same header as the grid file. Each block's payload is four freestream
/// scalars `(mach, alpha, reynolds, time)` followed by `ni * nj * nk * 5`
/// conserved variables, column-major over `(i, j, k, channel)`.
///
/// The freestream is taken to be the same for every block: block 0's values
/// are kept, and a warning is logged if a later block disagrees.
pub fn read_flow(path: impl AsRef<Path>, opts: &ReadOptions) -> Result<MultiBlockFlow> {
    let path = path.as_ref();
    let f = File::open(path)?;
    let flow = read_flow_from(BufReader::new(f), opts)?;
    info!(path = %path.display(), blocks = flow.block_count(), "flow read");
    Ok(flow)
}

pub fn read_flow_from(mut r: impl Read, opts: &ReadOptions) -> Result<MultiBlockFlow> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;
    let mut cur = ByteCursor::new(&buf, opts.endian);

    let dims = read_header(&mut cur)?;
    let counts = dims
        .iter()
        .map(|d| element_count(d, NUM_CHANNELS))
        .collect::<Result<Vec<_>>>()?;
    let total = checked_total(counts.iter().map(|&n| n.saturating_add(NUM_FREESTREAM)))?;
    let payload = cur.read_floats(total, opts.precision, "flow payload")?;
    warn_trailing(&cur, "flow");

    // nblocks >= 1, so the payload holds at least one quadruple
    let freestream = Freestream::from_slice(&payload[..NUM_FREESTREAM]);

    let mut state = padded_zeros(&dims, NUM_CHANNELS, opts.max_padded_elements)?;
    let mut offset = 0;
    for (b, (d, &n)) in dims.iter().zip(counts.iter()).enumerate() {
        let scalars = Freestream::from_slice(&payload[offset..offset + NUM_FREESTREAM]);
        if scalars != freestream {
            warn!(
                block = b,
                ?scalars,
                ?freestream,
                "freestream differs from block 0; keeping block 0 values"
            );
        }
        offset += NUM_FREESTREAM;
        place_block(&mut state, b, d, NUM_CHANNELS, &payload[offset..offset + n])?;
        offset += n;
    }

    Ok(MultiBlockFlow::from_parts(dims, freestream, state))
}

fn read_header(cur: &mut ByteCursor<'_>) -> Result<Vec<BlockDims>> {
    let nblocks = cur.read_i32("block count")?;
    if nblocks < 1 {
        return Err(Plot3dError::InvalidHeader(format!(
            "block count {nblocks} must be at least 1"
        )));
    }
    let nblocks = nblocks as usize;

    // take every extent up front so a bogus count fails before allocating
    let count = nblocks
        .checked_mul(3)
        .ok_or_else(|| Plot3dError::InvalidHeader(format!("block count {nblocks} overflows")))?;
    let raw = cur.read_i32s(count, "block extents")?;
    let mut dims = Vec::with_capacity(nblocks);
    for (b, rec) in raw.chunks_exact(3).enumerate() {
        let mut ext = [0usize; 3];
        for (axis, (v, &n)) in ext.iter_mut().zip(rec).enumerate() {
            if n < 1 {
                return Err(Plot3dError::InvalidHeader(format!(
                    "block {b}: extent {n} along axis {axis} must be at least 1"
                )));
            }
            *v = n as usize;
        }
        dims.push(BlockDims::new(ext[0], ext[1], ext[2]));
    }
    debug!(blocks = nblocks, ?dims, "header parsed");
    Ok(dims)
}

fn element_count(d: &BlockDims, channels: usize) -> Result<usize> {
    d.ni.checked_mul(d.nj)
        .and_then(|n| n.checked_mul(d.nk))
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| Plot3dError::InvalidHeader(format!("block extents {d} overflow")))
}

fn checked_total(mut counts: impl Iterator<Item = usize>) -> Result<usize> {
    counts
        .try_fold(0usize, |acc, n| acc.checked_add(n))
        .ok_or_else(|| Plot3dError::InvalidHeader("total element count overflows".into()))
}

/// Zero-filled `(max_ni, max_nj, max_nk, channels, nblocks)` array. Fails
/// instead of aborting when the padded volume overflows, passes `limit`, or
/// cannot be allocated.
fn padded_zeros(dims: &[BlockDims], channels: usize, limit: usize) -> Result<Array5<f64>> {
    let m = max_dims(dims);
    let nb = dims.len();
    let len = [m.nj, m.nk, channels, nb]
        .iter()
        .try_fold(m.ni, |acc, &n| acc.checked_mul(n))
        .filter(|&n| n <= limit)
        .ok_or_else(|| {
            Plot3dError::InvalidHeader(format!(
                "padded array {m} x {channels} x {nb} exceeds {limit} elements"
            ))
        })?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        Plot3dError::InvalidHeader(format!("cannot allocate padded array of {len} elements: {e}"))
    })?;
    data.resize(len, 0.0);
    Array5::from_shape_vec((m.ni, m.nj, m.nk, channels, nb), data)
        .map_err(|e| Plot3dError::InvalidHeader(format!("padded array: {e}")))
}

fn warn_trailing(cur: &ByteCursor<'_>, what: &str) {
    if cur.remaining() > 0 {
        warn!(bytes = cur.remaining(), "ignoring trailing bytes after {what} payload");
    }
}

/// Reshape one block's flat run column-major into `(ni, nj, nk, channels)`
/// and copy it into the block's corner of the padded array.
fn place_block(
    dst: &mut Array5<f64>,
    block: usize,
    d: &BlockDims,
    channels: usize,
    run: &[f64],
) -> Result<()> {
    let src = ArrayView::from_shape((d.ni, d.nj, d.nk, channels).f(), run)
        .map_err(|e| Plot3dError::InvalidHeader(format!("block {block}: {e}")))?;
    dst.slice_mut(s![0..d.ni, 0..d.nj, 0..d.nk, .., block])
        .assign(&src);
    Ok(())
}
