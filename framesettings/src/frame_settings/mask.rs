// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use super::FrameSettingsField;
use crate::bit_array::BitArray128;
use std::fmt::{Debug, Error as FmtError, Formatter};

/// Every bit index that can hold a value: all of them except the retired ones.
pub(crate) const STORED_BITS: BitArray128 =
    BitArray128::all().difference(BitArray128::from_indices(&FrameSettingsField::RETIRED));

/// Selects which fields of a custom [`FrameSettings`](super::FrameSettings) replace the ones
/// they are applied to.
///
/// The mask uses the same indexing as the frame settings: a set bit means that the overriding
/// value wins.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BitArray128", into = "BitArray128"))]
pub struct FrameSettingsOverrideMask {
    mask: BitArray128,
}

impl FrameSettingsOverrideMask {
    /// Returns a mask that overrides nothing.
    #[inline]
    pub const fn none() -> Self {
        Self {
            mask: BitArray128::empty(),
        }
    }

    /// Returns a mask that overrides every field.
    ///
    /// Retired indices are never set.
    #[inline]
    pub const fn all() -> Self {
        Self { mask: STORED_BITS }
    }

    /// Returns a mask that overrides exactly the given fields.
    pub const fn from_fields(fields: &[FrameSettingsField]) -> Self {
        let mut mask = BitArray128::empty();
        let mut i = 0;

        while i < fields.len() {
            mask = mask.union(BitArray128::from_indices(&[fields[i] as u32]));
            i += 1;
        }

        Self { mask }
    }

    /// Returns the mask as a raw bit array.
    #[inline]
    pub const fn bits(&self) -> BitArray128 {
        self.mask
    }

    /// Returns whether `field` is overridden.
    #[inline]
    pub const fn get(&self, field: FrameSettingsField) -> bool {
        self.mask.get(field as u32)
    }

    /// Sets whether `field` is overridden.
    #[inline]
    pub fn set(&mut self, field: FrameSettingsField, value: bool) {
        self.mask.set(field as u32, value);
    }

    /// Returns `self` with `field` overridden.
    #[inline]
    pub fn with(mut self, field: FrameSettingsField) -> Self {
        self.set(field, true);
        self
    }

    /// Returns whether nothing is overridden.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.mask.all_false()
    }

    /// Returns whether every field is overridden.
    #[inline]
    pub const fn is_all(&self) -> bool {
        STORED_BITS.difference(self.mask).all_false()
    }

    /// Returns an iterator over the overridden fields.
    ///
    /// Bits that are set but name no field are skipped.
    pub fn fields(&self) -> impl Iterator<Item = FrameSettingsField> {
        self.mask
            .iter_ones()
            .filter_map(|index| FrameSettingsField::try_from(index).ok())
    }
}

impl From<BitArray128> for FrameSettingsOverrideMask {
    /// Bits at retired indices are dropped.
    #[inline]
    fn from(mask: BitArray128) -> Self {
        Self {
            mask: mask.intersection(STORED_BITS),
        }
    }
}

impl From<FrameSettingsOverrideMask> for BitArray128 {
    #[inline]
    fn from(mask: FrameSettingsOverrideMask) -> Self {
        mask.mask
    }
}

impl FromIterator<FrameSettingsField> for FrameSettingsOverrideMask {
    fn from_iter<T: IntoIterator<Item = FrameSettingsField>>(iter: T) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

impl Debug for FrameSettingsOverrideMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if self.is_empty() {
            return write!(f, "empty()");
        }

        if self.is_all() {
            return write!(f, "all()");
        }

        let mut first = true;

        for field in self.fields() {
            if !first {
                write!(f, " | ")?;
            }

            write!(f, "{:?}", field)?;
            first = false;
        }

        Ok(())
    }
}
