// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The registry of frame settings fields.
//!
//! The index of a field is its identity: it is the position of its bit in both
//! [`FrameSettings`](super::FrameSettings) and
//! [`FrameSettingsOverrideMask`](super::FrameSettingsOverrideMask), and it is persisted. Indices
//! are grouped in bands, so that new fields can be added to a band without moving the others.

use std::{
    error::Error,
    fmt::{Display, Error as FmtError, Formatter},
    ops::Range,
};

frame_settings_fields! {
    /// A field of the frame settings.
    FrameSettingsField;

    /// Shadows are rendered.
    Shadow = 0, "Enable Shadow",
    /// Contact shadows are rendered.
    ContactShadow = 1, "Enable Contact Shadows",
    /// Shadow masks are used.
    ShadowMask = 2, "Enable Shadow Masks",
    /// Screen space reflections are rendered.
    Ssr = 3, "Enable SSR",
    /// Screen space ambient occlusion is rendered.
    Ssao = 4, "Enable SSAO",
    /// Subsurface scattering is rendered.
    SubsurfaceScattering = 5, "Enable Subsurface Scattering",
    /// Transmission is rendered.
    Transmission = 6, "Enable Transmission",
    /// Atmospheric scattering (fog) is rendered.
    AtmosphericScattering = 7, "Enable Atmospheric Scattering",
    /// Volumetric fog and lights are rendered.
    Volumetrics = 8, "Enable Volumetrics",
    /// Volumetrics are reprojected from the previous frame.
    ReprojectionForVolumetrics = 9, "Enable Reprojection For Volumetrics",
    /// Light layers are used.
    LightLayers = 10, "Enable LightLayers",
    /// Multisample anti-aliasing is used.
    Msaa = 11, "Enable MSAA",

    /// Transparent objects write depth before the main pass.
    TransparentPrepass = 20, "Enable Transparent Prepass",
    /// Transparent objects write depth after the main pass.
    TransparentPostpass = 21, "Enable Transparent Postpass",
    /// Camera motion vectors are rendered.
    MotionVectors = 22, "Enable Motion Vectors",
    /// Object motion vectors are rendered.
    ObjectMotionVectors = 23, "Enable Object Motion Vectors",
    /// Decals are rendered.
    Decals = 24, "Enable DBuffer",
    /// Rough refraction is rendered.
    RoughRefraction = 25, "Enable Rough Refraction",
    /// Distortion is rendered.
    Distortion = 26, "Enable Distortion",
    /// Post-processing is applied.
    Postprocess = 27, "Enable Postprocess",

    /// The lit shader mode. The bit is set for [`LitShaderMode::Deferred`].
    LitShaderMode = 40, "Lit Shader Mode",
    /// A depth prepass is rendered in deferred mode.
    DepthPrepassWithDeferredRendering = 41, "Deferred Depth Prepass",
    /// Opaque objects are rendered.
    OpaqueObjects = 42, "Enable Opaque Objects",
    /// Transparent objects are rendered.
    TransparentObjects = 43, "Enable Transparent Objects",
    /// Realtime planar reflections are rendered.
    RealtimePlanarReflection = 44, "Enable Realtime Planar Reflection",

    /// Work may run on an asynchronous compute queue.
    AsyncCompute = 60, "Enable Async Compute",
    /// The light list is built asynchronously.
    LightListAsync = 61, "Run Build Light List Async",
    /// Screen space reflections run asynchronously.
    SsrAsync = 62, "Run SSR Async",
    /// Screen space ambient occlusion runs asynchronously.
    SsaoAsync = 63, "Run SSAO Async",
    /// Contact shadows run asynchronously.
    ContactShadowsAsync = 64, "Run Contact Shadows Async",
    /// Volume voxelization runs asynchronously.
    VolumeVoxelizationsAsync = 65, "Run Volume Voxelization Async",

    /// The fine pruned tiled lighting is used for forward opaque objects.
    FptlForForwardOpaque = 120, "Enable Fptl for Forward Opaque",
    /// The big tile prepass is used.
    BigTilePrepass = 121, "Enable Big Tile",
    /// Lights are evaluated in a compute shader.
    ComputeLightEvaluation = 122, "Enable Compute Lighting",
    /// Light variants are classified in a compute shader.
    ComputeLightVariants = 123, "Enable Light Classification",
    /// Material variants are classified in a compute shader.
    ComputeMaterialVariants = 124, "Enable Material Classification",
    /// Tiled and clustered light lists are built.
    TileAndCluster = 125, "Enable Tile And Cluster",
}

impl FrameSettingsField {
    /// Indices set aside for fields added in the future.
    pub const RESERVED: Range<u32> = 80..120;

    /// Indices that were used by fields that no longer exist. They are never reused, so that old
    /// data cannot be misread.
    pub const RETIRED: [u32; 1] = [126];

    /// Returns the band that the field belongs to.
    #[inline]
    pub const fn band(self) -> Band {
        match self.index() {
            0..20 => Band::Lighting,
            20..40 => Band::RenderingPass,
            40..60 => Band::RenderingMode,
            60..80 => Band::AsyncCompute,
            _ => Band::LightLoop,
        }
    }

    /// Returns the path under which the field is shown in debug and editor tools.
    #[inline]
    pub const fn path(self) -> &'static str {
        self.band().path()
    }

    /// Returns the kind of value the field holds.
    #[inline]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::LitShaderMode => FieldKind::Enum {
                bits: LitShaderMode::BITS,
                value_names: LitShaderMode::VALUE_NAMES,
            },
            _ => FieldKind::Bool,
        }
    }
}

/// A group of frame settings fields, with its own range of indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    /// Lighting features, indices 0 to 19.
    Lighting,
    /// Rendering passes, indices 20 to 39.
    RenderingPass,
    /// Rendering modes such as the lit shader mode, indices 40 to 59.
    RenderingMode,
    /// Async compute scheduling, indices 60 to 79.
    AsyncCompute,
    /// Light loop settings, indices 120 to 127.
    LightLoop,
}

impl Band {
    /// Every band, in ascending index order.
    pub const ALL: [Self; 5] = [
        Self::Lighting,
        Self::RenderingPass,
        Self::RenderingMode,
        Self::AsyncCompute,
        Self::LightLoop,
    ];

    /// Returns the range of indices that belongs to the band.
    #[inline]
    pub const fn range(self) -> Range<u32> {
        match self {
            Self::Lighting => 0..20,
            Self::RenderingPass => 20..40,
            Self::RenderingMode => 40..60,
            Self::AsyncCompute => 60..80,
            Self::LightLoop => 120..128,
        }
    }

    /// Returns the path under which the fields of the band are shown in debug and editor tools.
    #[inline]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Lighting => "Light Settings",
            Self::RenderingPass => "Rendering Pass",
            Self::RenderingMode => "Rendering Settings",
            Self::AsyncCompute => "Async Compute Settings",
            Self::LightLoop => "Light Loop Settings",
        }
    }

    /// Returns an iterator over the fields of the band.
    pub fn fields(self) -> impl Iterator<Item = FrameSettingsField> {
        FrameSettingsField::ALL
            .into_iter()
            .filter(move |field| field.band() == self)
    }
}

/// The kind of value that a frame settings field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A single boolean.
    Bool,

    /// An enum packed into consecutive bits.
    Enum {
        /// The number of bits the value occupies.
        bits: u32,
        /// The display name of each value, indexed by the packed value.
        value_names: &'static [&'static str],
    },
}

/// An enum whose values are packed into bits of the frame settings.
///
/// An enum with `N` values uses `ceil(log2(N))` bits, and each value is stored as its index.
pub trait PackedEnum: Copy + Sized {
    /// The number of bits used.
    const BITS: u32;

    /// The names of the values, in index order.
    const VALUE_NAMES: &'static [&'static str];

    /// Returns the index of the value.
    fn to_index(self) -> u32;

    /// Returns the value with the given index, or `None` if there is no such value.
    fn from_index(index: u32) -> Option<Self>;
}

/// The shading path used for lit materials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum LitShaderMode {
    Forward = 0,
    #[default]
    Deferred = 1,
}

impl PackedEnum for LitShaderMode {
    const BITS: u32 = 1;
    const VALUE_NAMES: &'static [&'static str] = &["Forward", "Deferred"];

    #[inline]
    fn to_index(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Forward),
            1 => Some(Self::Deferred),
            _ => None,
        }
    }
}

/// Error that can happen when converting an index to a [`FrameSettingsField`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownFieldError {
    /// The index that names no field.
    pub index: u32,
}

impl Error for UnknownFieldError {}

impl Display for UnknownFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if FrameSettingsField::RESERVED.contains(&self.index) {
            write!(f, "the index {} is reserved for future fields", self.index)
        } else if FrameSettingsField::RETIRED.contains(&self.index) {
            write!(f, "the index {} belonged to a retired field", self.index)
        } else {
            write!(f, "the index {} is not a known frame settings field", self.index)
        }
    }
}
