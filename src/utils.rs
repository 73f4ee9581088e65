use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::error::{Plot3dError, Result};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Width of one payload element on disk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloatPrecision {
    #[default]
    F32,
    F64,
}

impl FloatPrecision {
    #[inline]
    pub fn size(self) -> usize {
        match self {
            FloatPrecision::F32 => 4,
            FloatPrecision::F64 => 8,
        }
    }
}

impl Endian {
    pub fn read_i32(buf: &[u8], e: Endian) -> i32 {
        match e {
            Endian::Little => LittleEndian::read_i32(buf),
            Endian::Big => BigEndian::read_i32(buf),
        }
    }
    /// Decode a run of 4-byte floats, widening to f64.
    pub fn read_f32_slice(buf: &[u8], e: Endian) -> Vec<f64> {
        let mut tmp = vec![0f32; buf.len() / 4];
        match e {
            Endian::Little => LittleEndian::read_f32_into(buf, &mut tmp),
            Endian::Big => BigEndian::read_f32_into(buf, &mut tmp),
        }
        tmp.into_iter().map(f64::from).collect()
    }
    pub fn read_f64_slice(buf: &[u8], e: Endian) -> Vec<f64> {
        let mut out = vec![0f64; buf.len() / 8];
        match e {
            Endian::Little => LittleEndian::read_f64_into(buf, &mut out),
            Endian::Big => BigEndian::read_f64_into(buf, &mut out),
        }
        out
    }
}

// Forward-only view over an in-memory file image. Every take is bounds
// checked so a short file surfaces as `Truncated` naming the section.
pub(crate) struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(buf: &'a [u8], endian: Endian) -> Self {
        Self { buf, pos: 0, endian }
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn take(&mut self, n: usize, section: &'static str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Plot3dError::Truncated {
                section,
                expected: n,
                available: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn read_i32(&mut self, section: &'static str) -> Result<i32> {
        let b = self.take(4, section)?;
        Ok(Endian::read_i32(b, self.endian))
    }

    /// Decode `count` consecutive 4-byte integers.
    pub(crate) fn read_i32s(&mut self, count: usize, section: &'static str) -> Result<Vec<i32>> {
        let nbytes = count.checked_mul(4).ok_or_else(|| {
            Plot3dError::InvalidHeader(format!("{section}: element count overflows"))
        })?;
        let b = self.take(nbytes, section)?;
        Ok(b.chunks_exact(4)
            .map(|c| Endian::read_i32(c, self.endian))
            .collect())
    }

    pub(crate) fn read_floats(
        &mut self,
        count: usize,
        precision: FloatPrecision,
        section: &'static str,
    ) -> Result<Vec<f64>> {
        let nbytes = count.checked_mul(precision.size()).ok_or_else(|| {
            Plot3dError::InvalidHeader(format!("{section}: element count overflows"))
        })?;
        let b = self.take(nbytes, section)?;
        Ok(match precision {
            FloatPrecision::F32 => Endian::read_f32_slice(b, self.endian),
            FloatPrecision::F64 => Endian::read_f64_slice(b, self.endian),
        })
    }
}
