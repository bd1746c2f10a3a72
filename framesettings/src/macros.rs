// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

/// Generates a fixed-capacity bit array backed by a single unsigned integer.
macro_rules! bit_array {
    {
        $(#[doc = $ty_doc:literal])*
        $ty:ident($repr:ty) = $capacity:literal;
    } => {
        $(#[doc = $ty_doc])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        #[repr(transparent)]
        pub struct $ty($repr);

        impl $ty {
            /// The number of bits stored.
            pub const CAPACITY: u32 = $capacity;

            #[doc = concat!("Returns a `", stringify!($ty), "` wrapping the raw `data`.")]
            #[inline]
            pub const fn new(data: $repr) -> Self {
                Self(data)
            }

            #[doc = concat!("Returns a `", stringify!($ty), "` with none of the bits set.")]
            #[inline]
            pub const fn empty() -> Self {
                Self(0)
            }

            #[doc = concat!("Returns a `", stringify!($ty), "` with all of the bits set.")]
            #[inline]
            pub const fn all() -> Self {
                Self(<$repr>::MAX)
            }

            /// Returns a bit array where exactly the bits listed in `indices` are set.
            ///
            /// Listing an index more than once has no further effect.
            ///
            /// # Panics
            ///
            /// - Panics if an index is not below the capacity.
            pub const fn from_indices(indices: &[u32]) -> Self {
                let mut data: $repr = 0;
                let mut i = 0;

                while i < indices.len() {
                    assert!(indices[i] < $capacity, "bit index out of range");
                    data |= (1 as $repr) << indices[i];
                    i += 1;
                }

                Self(data)
            }

            /// Returns the raw backing word.
            #[inline]
            pub const fn data(self) -> $repr {
                self.0
            }

            /// Returns the value of the bit at `index`.
            #[inline]
            pub const fn get(self, index: u32) -> bool {
                debug_assert!(index < $capacity, "bit index out of range");

                self.0 & ((1 as $repr) << index) != 0
            }

            /// Sets the bit at `index` to `value`.
            #[inline]
            pub fn set(&mut self, index: u32, value: bool) {
                debug_assert!(index < $capacity, "bit index out of range");

                if value {
                    self.0 |= (1 as $repr) << index;
                } else {
                    self.0 &= !((1 as $repr) << index);
                }
            }

            /// Returns whether no bit is set.
            #[inline]
            pub const fn all_false(self) -> bool {
                self.0 == 0
            }

            /// Returns whether every bit is set.
            #[inline]
            pub const fn all_true(self) -> bool {
                self.0 == <$repr>::MAX
            }

            /// Returns the number of bits set.
            #[inline]
            pub const fn count(self) -> u32 {
                self.0.count_ones()
            }

            /// Returns the bits as a binary string, most significant bit first, with a `.` between
            /// each byte.
            pub fn humanized_data(self) -> String {
                crate::bit_array::group_bytes(&format!("{:0width$b}", self.0, width = $capacity))
            }
        }

        impl crate::bit_array::BitArray for $ty {
            const CAPACITY: u32 = $capacity;

            #[inline]
            fn get(&self, index: u32) -> bool {
                $ty::get(*self, index)
            }

            #[inline]
            fn set(&mut self, index: u32, value: bool) {
                $ty::set(self, index, value)
            }

            #[inline]
            fn all_false(&self) -> bool {
                $ty::all_false(*self)
            }

            #[inline]
            fn all_true(&self) -> bool {
                $ty::all_true(*self)
            }

            fn humanized_data(&self) -> String {
                $ty::humanized_data(*self)
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                write!(f, "{}({})", stringify!($ty), self.humanized_data())
            }
        }

        impl From<$repr> for $ty {
            #[inline]
            fn from(val: $repr) -> Self {
                Self(val)
            }
        }

        impl From<$ty> for $repr {
            #[inline]
            fn from(val: $ty) -> Self {
                val.0
            }
        }

        impl std::ops::BitAnd for $ty {
            type Output = Self;

            #[inline]
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl std::ops::BitAndAssign for $ty {
            #[inline]
            fn bitand_assign(&mut self, rhs: Self) {
                self.0 &= rhs.0;
            }
        }

        impl std::ops::BitOr for $ty {
            type Output = Self;

            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $ty {
            #[inline]
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl std::ops::BitXor for $ty {
            type Output = Self;

            #[inline]
            fn bitxor(self, rhs: Self) -> Self {
                Self(self.0 ^ rhs.0)
            }
        }

        impl std::ops::BitXorAssign for $ty {
            #[inline]
            fn bitxor_assign(&mut self, rhs: Self) {
                self.0 ^= rhs.0;
            }
        }

        impl std::ops::Not for $ty {
            type Output = Self;

            #[inline]
            fn not(self) -> Self {
                Self(!self.0)
            }
        }
    };
}

/// Generates the closed registry of frame settings fields.
///
/// Each field has a stable bit index, which is also its discriminant.
macro_rules! frame_settings_fields {
    {
        $(#[doc = $ty_doc:literal])*
        $ty:ident;

        $(
            $(#[doc = $field_doc:literal])*
            $field_name:ident = $index:literal, $display_name:literal,
        )+
    } => {
        $(#[doc = $ty_doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
        #[repr(u32)]
        pub enum $ty {
            $(
                $(#[doc = $field_doc])*
                $field_name = $index,
            )+
        }

        impl $ty {
            /// Every field, in ascending bit index order.
            pub const ALL: [Self; [$($ty::$field_name),+].len()] = [$(Self::$field_name),+];

            /// The number of fields.
            pub const COUNT: usize = Self::ALL.len();

            /// Returns the bit index of the field. Indices are stable and never reused.
            #[inline]
            pub const fn index(self) -> u32 {
                self as u32
            }

            /// Returns the name shown for the field in debug and editor tools.
            pub const fn display_name(self) -> &'static str {
                match self {
                    $(Self::$field_name => $display_name,)+
                }
            }
        }

        impl TryFrom<u32> for $ty {
            type Error = UnknownFieldError;

            #[inline]
            fn try_from(val: u32) -> Result<Self, Self::Error> {
                Ok(match val {
                    $($index => Self::$field_name,)+
                    _ => return Err(UnknownFieldError { index: val }),
                })
            }
        }

        impl From<$ty> for u32 {
            #[inline]
            fn from(val: $ty) -> Self {
                val as u32
            }
        }
    };
}

/// Generates a boolean getter and setter on `FrameSettings` for each listed field.
macro_rules! frame_settings_accessors {
    {
        $(
            $(#[doc = $doc:literal])*
            $getter:ident, $setter:ident => $field:ident;
        )+
    } => {
        impl FrameSettings {
            $(
                $(#[doc = $doc])*
                #[inline]
                pub const fn $getter(&self) -> bool {
                    self.bit_datas.get(FrameSettingsField::$field as u32)
                }

                #[doc = concat!(
                    "Sets the value returned by [`", stringify!($getter), "`](Self::",
                    stringify!($getter), ").",
                )]
                #[inline]
                pub fn $setter(&mut self, value: bool) {
                    self.bit_datas.set(FrameSettingsField::$field as u32, value);
                }
            )+
        }
    };
}

/// Generates a flags word from a superseded serialization format, together with an enum of its
/// individual flags.
macro_rules! legacy_flags {
    {
        $(#[doc = $ty_doc:literal])*
        $ty:ident($repr:ident);

        $(#[doc = $flag_ty_doc:literal])*
        $flag_ty:ident;

        $(
            $flag_name:ident = $bit:expr,
        )+
    } => {
        $(#[doc = $ty_doc])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $ty($repr);

        $(#[doc = $flag_ty_doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr($repr)]
        pub enum $flag_ty {
            $($flag_name = $bit,)+
        }

        impl $flag_ty {
            /// Every flag of the legacy format.
            pub const ALL: [Self; [$($flag_ty::$flag_name),+].len()] = [$(Self::$flag_name),+];

            /// Returns the bit of the flag in the legacy flags word.
            #[inline]
            pub const fn bit(self) -> $repr {
                self as $repr
            }
        }

        impl $ty {
            #[doc = concat!("Returns a `", stringify!($ty), "` with none of the flags set.")]
            #[inline]
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Wraps a raw flags word read from serialized data. Bits that name no flag are kept
            /// so that they can be reported.
            #[inline]
            pub const fn from_raw(raw: $repr) -> Self {
                Self(raw)
            }

            /// Returns the raw flags word.
            #[inline]
            pub const fn raw(self) -> $repr {
                self.0
            }

            /// Returns whether `flag` is set.
            #[inline]
            pub const fn contains(self, flag: $flag_ty) -> bool {
                self.0 & flag.bit() != 0
            }

            /// Returns `self` with `flag` set.
            #[inline]
            pub const fn with(self, flag: $flag_ty) -> Self {
                Self(self.0 | flag.bit())
            }

            /// Returns the set bits that name no flag.
            #[inline]
            pub const fn unknown_bits(self) -> $repr {
                self.0 & !Self::known_raw()
            }

            /// Returns an iterator over the known flags that are set.
            pub fn iter(self) -> impl Iterator<Item = $flag_ty> {
                $flag_ty::ALL.into_iter().filter(move |&flag| self.contains(flag))
            }

            const fn known_raw() -> $repr {
                0 $(| ($bit))+
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                let mut written = false;

                for flag in self.iter() {
                    if written {
                        write!(f, " | ")?;
                    }

                    write!(f, "{:?}", flag)?;
                    written = true;
                }

                if self.unknown_bits() != 0 {
                    if written {
                        write!(f, " | ")?;
                    }

                    write!(f, "{:#x}", self.unknown_bits())?;
                    written = true;
                }

                if !written {
                    write!(f, "empty()")?;
                }

                Ok(())
            }
        }

        impl From<$flag_ty> for $ty {
            #[inline]
            fn from(val: $flag_ty) -> Self {
                Self(val.bit())
            }
        }

        impl std::ops::BitOr<$flag_ty> for $ty {
            type Output = Self;

            #[inline]
            fn bitor(self, rhs: $flag_ty) -> Self {
                self.with(rhs)
            }
        }

        impl std::ops::BitOr for $flag_ty {
            type Output = $ty;

            #[inline]
            fn bitor(self, rhs: Self) -> $ty {
                $ty(self.bit() | rhs.bit())
            }
        }
    };
}
