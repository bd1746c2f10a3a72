// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Fixed-capacity bit arrays.
//!
//! Each type stores its bits in the smallest unsigned integer that can hold them, so that they
//! are plain `Copy` values that never allocate. [`BitArray128`] is made of two 64-bit words, and
//! every operation on it is applied to both words independently.
//!
//! Bit indices must be below the capacity. An index that is out of range is a bug in the caller:
//! it panics in debug builds, and always panics for [`BitArray128`].

use bytemuck::{Pod, Zeroable};
use std::{
    error::Error,
    fmt::{Debug, Display, Error as FmtError, Formatter},
    hash::Hash,
    ops::{BitAnd, BitOr, Not},
};

/// Operations shared by all the bit array types.
pub trait BitArray:
    Pod
    + Eq
    + Hash
    + Default
    + Debug
    + Not<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
{
    /// The number of bits stored.
    const CAPACITY: u32;

    /// Returns the value of the bit at `index`.
    fn get(&self, index: u32) -> bool;

    /// Sets the bit at `index` to `value`.
    fn set(&mut self, index: u32, value: bool);

    /// Returns whether no bit is set.
    fn all_false(&self) -> bool;

    /// Returns whether every bit is set.
    fn all_true(&self) -> bool;

    /// Returns the bits as a binary string, most significant bit first, with a `.` between each
    /// byte.
    fn humanized_data(&self) -> String;

    /// Returns the backing words as bytes, in native endianness.
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Rebuilds a bit array from the bytes returned by [`as_bytes`](Self::as_bytes).
    fn from_bytes(bytes: &[u8]) -> Result<Self, ByteLengthError> {
        let expected = size_of::<Self>();

        if bytes.len() != expected {
            return Err(ByteLengthError {
                expected,
                provided: bytes.len(),
            });
        }

        Ok(bytemuck::pod_read_unaligned(bytes))
    }
}

bit_array! {
    /// A bit array of 8 bits.
    BitArray8(u8) = 8;
}

bit_array! {
    /// A bit array of 16 bits.
    BitArray16(u16) = 16;
}

bit_array! {
    /// A bit array of 32 bits.
    BitArray32(u32) = 32;
}

bit_array! {
    /// A bit array of 64 bits.
    BitArray64(u64) = 64;
}

/// A bit array of 128 bits, made of two 64-bit words.
///
/// Bits 0 to 63 are stored in the first word, bits 64 to 127 in the second.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct BitArray128 {
    data1: BitArray64,
    data2: BitArray64,
}

impl BitArray128 {
    /// The number of bits stored.
    pub const CAPACITY: u32 = 128;

    /// Returns a `BitArray128` from its two raw words. `data1` holds bits 0 to 63.
    #[inline]
    pub const fn new(data1: u64, data2: u64) -> Self {
        Self {
            data1: BitArray64::new(data1),
            data2: BitArray64::new(data2),
        }
    }

    /// Returns a `BitArray128` with none of the bits set.
    #[inline]
    pub const fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Returns a `BitArray128` with all of the bits set.
    #[inline]
    pub const fn all() -> Self {
        Self::new(u64::MAX, u64::MAX)
    }

    /// Returns a bit array where exactly the bits listed in `indices` are set.
    ///
    /// Listing an index more than once has no further effect.
    ///
    /// # Panics
    ///
    /// - Panics if an index is not below 128.
    pub const fn from_indices(indices: &[u32]) -> Self {
        let mut data1 = 0u64;
        let mut data2 = 0u64;
        let mut i = 0;

        while i < indices.len() {
            let index = indices[i];
            assert!(index < 128, "bit index out of range");

            if index < 64 {
                data1 |= 1 << index;
            } else {
                data2 |= 1 << (index - 64);
            }

            i += 1;
        }

        Self::new(data1, data2)
    }

    /// Returns the union of `self` and `other`.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self::new(self.data1() | other.data1(), self.data2() | other.data2())
    }

    /// Returns the intersection of `self` and `other`.
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self::new(self.data1() & other.data1(), self.data2() & other.data2())
    }

    /// Returns `self` without the bits set in `other`.
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self::new(self.data1() & !other.data1(), self.data2() & !other.data2())
    }

    /// Returns the word holding bits 0 to 63.
    #[inline]
    pub const fn data1(self) -> u64 {
        self.data1.data()
    }

    /// Returns the word holding bits 64 to 127.
    #[inline]
    pub const fn data2(self) -> u64 {
        self.data2.data()
    }

    /// Returns the value of the bit at `index`.
    ///
    /// # Panics
    ///
    /// - Panics if `index` is not below 128.
    #[inline]
    pub const fn get(self, index: u32) -> bool {
        if index < 64 {
            self.data1.get(index)
        } else {
            assert!(index < 128, "bit index out of range");
            self.data2.get(index - 64)
        }
    }

    /// Sets the bit at `index` to `value`.
    ///
    /// # Panics
    ///
    /// - Panics if `index` is not below 128.
    #[inline]
    pub fn set(&mut self, index: u32, value: bool) {
        if index < 64 {
            self.data1.set(index, value);
        } else {
            assert!(index < 128, "bit index out of range");
            self.data2.set(index - 64, value);
        }
    }

    /// Returns whether no bit is set.
    #[inline]
    pub const fn all_false(self) -> bool {
        self.data1.all_false() && self.data2.all_false()
    }

    /// Returns whether every bit is set.
    #[inline]
    pub const fn all_true(self) -> bool {
        self.data1.all_true() && self.data2.all_true()
    }

    /// Returns the number of bits set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.data1.count() + self.data2.count()
    }

    /// Returns an iterator over the indices of the bits that are set, in ascending order.
    pub fn iter_ones(self) -> impl Iterator<Item = u32> {
        (0..Self::CAPACITY).filter(move |&index| self.get(index))
    }

    /// Returns the bits as a binary string, most significant bit first, with a `.` between each
    /// byte.
    pub fn humanized_data(self) -> String {
        format!(
            "{}.{}",
            self.data2.humanized_data(),
            self.data1.humanized_data(),
        )
    }
}

impl BitArray for BitArray128 {
    const CAPACITY: u32 = 128;

    #[inline]
    fn get(&self, index: u32) -> bool {
        BitArray128::get(*self, index)
    }

    #[inline]
    fn set(&mut self, index: u32, value: bool) {
        BitArray128::set(self, index, value)
    }

    #[inline]
    fn all_false(&self) -> bool {
        BitArray128::all_false(*self)
    }

    #[inline]
    fn all_true(&self) -> bool {
        BitArray128::all_true(*self)
    }

    fn humanized_data(&self) -> String {
        BitArray128::humanized_data(*self)
    }
}

impl Debug for BitArray128 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "BitArray128({})", self.humanized_data())
    }
}

impl BitAnd for BitArray128 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            data1: self.data1 & rhs.data1,
            data2: self.data2 & rhs.data2,
        }
    }
}

impl std::ops::BitAndAssign for BitArray128 {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.data1 &= rhs.data1;
        self.data2 &= rhs.data2;
    }
}

impl BitOr for BitArray128 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            data1: self.data1 | rhs.data1,
            data2: self.data2 | rhs.data2,
        }
    }
}

impl std::ops::BitOrAssign for BitArray128 {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.data1 |= rhs.data1;
        self.data2 |= rhs.data2;
    }
}

impl std::ops::BitXor for BitArray128 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            data1: self.data1 ^ rhs.data1,
            data2: self.data2 ^ rhs.data2,
        }
    }
}

impl std::ops::BitXorAssign for BitArray128 {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.data1 ^= rhs.data1;
        self.data2 ^= rhs.data2;
    }
}

impl Not for BitArray128 {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self {
            data1: !self.data1,
            data2: !self.data2,
        }
    }
}

/// Error that can happen when rebuilding a bit array from bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteLengthError {
    /// The number of bytes of the bit array.
    pub expected: usize,
    /// The number of bytes that were provided.
    pub provided: usize,
}

impl Error for ByteLengthError {}

impl Display for ByteLengthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "expected {} bytes to rebuild the bit array, but {} were provided",
            self.expected, self.provided,
        )
    }
}

/// Inserts a `.` between each group of 8 binary digits.
pub(crate) fn group_bytes(bits: &str) -> String {
    let mut grouped = String::with_capacity(bits.len() + bits.len() / 8);

    for (i, digit) in bits.chars().enumerate() {
        if i != 0 && i % 8 == 0 {
            grouped.push('.');
        }

        grouped.push(digit);
    }

    grouped
}
