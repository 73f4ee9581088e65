#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use plot3d_flow::{
    read_flow_from, read_grid_from, Endian, FloatPrecision, MultiBlockFlow, MultiBlockGrid,
    ReadOptions,
};

pub type Dims = (usize, usize, usize);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Flatten `f(i, j, k, c)` column-major (i fastest, c slowest).
pub fn column_major(
    dims: Dims,
    channels: usize,
    f: impl Fn(usize, usize, usize, usize) -> f64,
) -> Vec<f64> {
    let (ni, nj, nk) = dims;
    let mut out = Vec::with_capacity(ni * nj * nk * channels);
    for c in 0..channels {
        for k in 0..nk {
            for j in 0..nj {
                for i in 0..ni {
                    out.push(f(i, j, k, c));
                }
            }
        }
    }
    out
}

struct Writer {
    buf: Vec<u8>,
    opts: ReadOptions,
}

impl Writer {
    fn new(opts: ReadOptions) -> Self {
        Self { buf: Vec::new(), opts }
    }

    fn int(&mut self, v: i32) {
        match self.opts.endian {
            Endian::Little => self.buf.write_i32::<LittleEndian>(v).unwrap(),
            Endian::Big => self.buf.write_i32::<BigEndian>(v).unwrap(),
        }
    }

    fn floats(&mut self, v: &[f64]) {
        let w = &mut self.buf;
        for &x in v {
            match (self.opts.precision, self.opts.endian) {
                (FloatPrecision::F32, Endian::Little) => w.write_f32::<LittleEndian>(x as f32),
                (FloatPrecision::F32, Endian::Big) => w.write_f32::<BigEndian>(x as f32),
                (FloatPrecision::F64, Endian::Little) => w.write_f64::<LittleEndian>(x),
                (FloatPrecision::F64, Endian::Big) => w.write_f64::<BigEndian>(x),
            }
            .unwrap();
        }
    }

    fn header(&mut self, dims: &[Dims]) {
        self.int(dims.len() as i32);
        for &(ni, nj, nk) in dims {
            self.int(ni as i32);
            self.int(nj as i32);
            self.int(nk as i32);
        }
    }
}

/// Grid file image; `coords[b]` is block b's column-major `(i, j, k, xyz)` run.
pub fn grid_bytes(dims: &[Dims], coords: &[Vec<f64>], opts: ReadOptions) -> Vec<u8> {
    let mut w = Writer::new(opts);
    w.header(dims);
    for c in coords {
        w.floats(c);
    }
    w.buf
}

/// Flow file image with each block's four scalars ahead of its field run.
pub fn flow_bytes(
    dims: &[Dims],
    scalars: &[[f64; 4]],
    fields: &[Vec<f64>],
    opts: ReadOptions,
) -> Vec<u8> {
    let mut w = Writer::new(opts);
    w.header(dims);
    for (s, f) in scalars.iter().zip(fields) {
        w.floats(s);
        w.floats(f);
    }
    w.buf
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Rectilinear block with node `(i, j, k)` at `(xs[i], ys[j], zs[k])`.
pub fn rectilinear(xs: &[f64], ys: &[f64], zs: &[f64]) -> Vec<f64> {
    column_major((xs.len(), ys.len(), zs.len()), 3, |i, j, k, c| match c {
        0 => xs[i],
        1 => ys[j],
        _ => zs[k],
    })
}

pub fn grid_from(dims: &[Dims], coords: &[Vec<f64>]) -> MultiBlockGrid {
    let opts = ReadOptions::default();
    read_grid_from(Cursor::new(grid_bytes(dims, coords, opts)), &opts).unwrap()
}

pub fn flow_from(dims: &[Dims], fields: &[Vec<f64>]) -> MultiBlockFlow {
    let opts = ReadOptions::default();
    let scalars = vec![[0.8, 2.0, 1.0e6, 0.5]; dims.len()];
    read_flow_from(Cursor::new(flow_bytes(dims, &scalars, fields, opts)), &opts).unwrap()
}

/// Corner order of the unit-spaced cell whose lowest node is `(i, j, k)`.
pub fn cell_corners(i: usize, j: usize, k: usize) -> [[usize; 3]; 8] {
    [
        [i, j, k],
        [i + 1, j, k],
        [i + 1, j + 1, k],
        [i, j + 1, k],
        [i, j, k + 1],
        [i + 1, j, k + 1],
        [i + 1, j + 1, k + 1],
        [i, j + 1, k + 1],
    ]
}
