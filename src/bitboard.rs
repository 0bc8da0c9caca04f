//! Rectangular bit grids for per-cell flags (shots, impacts, occupancy).
//!
//! A `W×H` grid is packed row by row into one unsigned integer `T`, so maps
//! are `Copy` and need no allocation.

use core::fmt;
use core::ops::BitOr;
use num_traits::{PrimInt, Unsigned, Zero};

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitBoardError {
    /// Column or row index is out of bounds.
    IndexOutOfBounds { x: usize, y: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::IndexOutOfBounds { x, y } => {
                write!(f, "IndexOutOfBounds: x={}, y={}", x, y)
            }
        }
    }
}

/// A fixed-size W×H bitboard stored in the unsigned integer `T`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitBoard<T, const W: usize, const H: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
}

impl<T, const W: usize, const H: usize> BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    /// An empty grid. `W * H` must fit in `T`.
    #[inline]
    pub fn new() -> Self {
        BitBoard { bits: T::zero() }
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Gets the bit at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Result<bool, BitBoardError> {
        let idx = Self::index(x, y)?;
        Ok(((self.bits >> idx) & T::one()) != T::zero())
    }

    /// Sets the bit at (x, y) to 1.
    pub fn set(&mut self, x: usize, y: usize) -> Result<(), BitBoardError> {
        let idx = Self::index(x, y)?;
        self.bits = self.bits | (T::one() << idx);
        Ok(())
    }

    /// Clears all bits to `0`.
    #[inline]
    pub fn clear_all(&mut self) {
        self.bits = T::zero();
    }

    #[inline]
    fn index(x: usize, y: usize) -> Result<usize, BitBoardError> {
        if x >= W || y >= H {
            Err(BitBoardError::IndexOutOfBounds { x, y })
        } else {
            Ok(y * W + x)
        }
    }

    /// Set cells in row-major order, as `(x, y)`.
    #[inline]
    pub fn iter_set_bits(&self) -> SetBits<'_, T, W, H> {
        SetBits {
            board: self,
            idx: 0,
        }
    }
}

impl<T, const W: usize, const H: usize> Default for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const W: usize, const H: usize> fmt::Debug for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}x{}>:", W, H)?;
        fmt::Display::fmt(self, f)?;
        writeln!(f)
    }
}

impl<T, const W: usize, const H: usize> fmt::Display for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..H {
            for x in 0..W {
                let bit = if ((self.bits >> (y * W + x)) & T::one()) != T::zero() {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            if y + 1 < H {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the set bits of a bitboard.
#[derive(Clone, Copy)]
pub struct SetBits<'a, T, const W: usize, const H: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    board: &'a BitBoard<T, W, H>,
    idx: usize,
}

impl<'a, T, const W: usize, const H: usize> Iterator for SetBits<'a, T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < W * H {
            let idx = self.idx;
            self.idx += 1;
            if ((self.board.bits >> idx) & T::one()) != T::zero() {
                return Some((idx % W, idx / W));
            }
        }
        None
    }
}

/// Bitwise OR for combining two bitboards.
impl<T, const W: usize, const H: usize> BitOr for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        BitBoard {
            bits: self.bits | rhs.bits,
        }
    }
}
