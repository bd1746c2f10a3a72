// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The effective rendering configuration of a camera.
//!
//! A [`FrameSettings`] is a record of boolean features stored in a [`BitArray128`], one bit per
//! [`FrameSettingsField`]. Reading or writing a feature is a single bit operation, and combining
//! two records is a single bitwise expression over the whole array.
//!
//! # Aggregation
//!
//! The settings used to render a frame are computed from three layers:
//!
//! ```
//! use framesettings::{
//!     CustomFrameSettings, DefaultFrameSettings, FrameContext, FrameSettings,
//!     FrameSettingsField, RenderPipelineSettings,
//! };
//!
//! let mut custom = CustomFrameSettings::default();
//! custom.settings.set_ssr(true);
//! custom.mask.set(FrameSettingsField::Ssr, true);
//!
//! let aggregated = FrameSettings::aggregate(
//!     &FrameContext::default(),
//!     &RenderPipelineSettings::default(),
//!     &DefaultFrameSettings::default(),
//!     Some(&custom),
//! );
//!
//! // The preset does not enable screen space reflections, but the custom settings do.
//! assert!(!FrameSettings::CAMERA.ssr());
//! assert!(aggregated.ssr());
//! ```
//!
//! The last layer, [`FrameSettings::sanitize`], is always applied. It can only disable features,
//! with the exception of the lit shader mode which it may force to either value.

pub use self::{
    field::{Band, FieldKind, FrameSettingsField, LitShaderMode, PackedEnum, UnknownFieldError},
    mask::FrameSettingsOverrideMask,
};
use self::mask::STORED_BITS;
use crate::{
    bit_array::BitArray128,
    context::FrameContext,
    pipeline::{DefaultFrameSettings, RenderPipelineSettings},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{Debug, Error as FmtError, Formatter},
    hash::{Hash, Hasher},
};

pub mod field;
pub mod history;
mod mask;
pub mod migration;
mod sanitize;

/// The effective rendering configuration of a camera.
///
/// Only the bits are compared, hashed and persisted. The global dimmers and the lit shader mode
/// index are recomputed from them.
#[derive(Clone, Copy)]
pub struct FrameSettings {
    bit_datas: BitArray128,

    diffuse_global_dimmer: f32,
    specular_global_dimmer: f32,
    lit_shader_mode_enum_index: u32,
}

impl FrameSettings {
    /// The default frame settings of cameras.
    ///
    /// Everything is enabled in deferred mode, except screen space reflections, multisample
    /// anti-aliasing and the deferred depth prepass.
    pub const CAMERA: Self = Self::from_fields(&CAMERA_FIELDS);

    /// The default frame settings of reflection probes rendered every frame.
    ///
    /// Same as [`CAMERA`](Self::CAMERA), without contact shadows, shadow masks, screen space
    /// ambient occlusion, atmospheric scattering, rough refraction, distortion and
    /// post-processing.
    pub const REALTIME_REFLECTION_PROBE: Self = Self::from_bits(
        BitArray128::from_indices(&CAMERA_FIELDS_INDICES)
            .difference(BitArray128::from_indices(&REALTIME_REFLECTION_EXCLUDED_INDICES)),
    );

    /// The default frame settings of reflection probes rendered once or provided by the user.
    ///
    /// Same as [`CAMERA`](Self::CAMERA).
    pub const CUSTOM_OR_BAKED_REFLECTION_PROBE: Self = Self::from_fields(&CAMERA_FIELDS);

    /// Returns frame settings with every field disabled, in forward mode.
    #[inline]
    pub const fn empty() -> Self {
        Self::from_bits(BitArray128::empty())
    }

    /// Returns frame settings with exactly the given fields enabled.
    pub const fn from_fields(fields: &[FrameSettingsField]) -> Self {
        Self::from_bits(FrameSettingsOverrideMask::from_fields(fields).bits())
    }

    /// Returns frame settings from their raw bits.
    ///
    /// Bits at [retired indices](FrameSettingsField::RETIRED) are dropped. The global dimmers
    /// start at `1.0` until the settings are sanitized.
    #[inline]
    pub const fn from_bits(bit_datas: BitArray128) -> Self {
        let bit_datas = bit_datas.intersection(STORED_BITS);

        Self {
            bit_datas,
            diffuse_global_dimmer: 1.0,
            specular_global_dimmer: 1.0,
            lit_shader_mode_enum_index: if bit_datas.get(FrameSettingsField::LitShaderMode as u32)
            {
                1
            } else {
                0
            },
        }
    }

    /// Returns the raw bits.
    #[inline]
    pub const fn bits(&self) -> BitArray128 {
        self.bit_datas
    }

    /// Returns whether `field` is enabled.
    ///
    /// For [`FrameSettingsField::LitShaderMode`], returns whether the mode is deferred.
    #[inline]
    pub const fn is_enabled(&self, field: FrameSettingsField) -> bool {
        self.bit_datas.get(field as u32)
    }

    /// Enables or disables `field`.
    #[inline]
    pub fn set_enabled(&mut self, field: FrameSettingsField, value: bool) {
        self.bit_datas.set(field as u32, value);

        if field == FrameSettingsField::LitShaderMode {
            self.refresh_lit_shader_mode_enum_index();
        }
    }

    /// Returns the lit shader mode.
    #[inline]
    pub const fn lit_shader_mode(&self) -> LitShaderMode {
        if self.bit_datas.get(FrameSettingsField::LitShaderMode as u32) {
            LitShaderMode::Deferred
        } else {
            LitShaderMode::Forward
        }
    }

    /// Sets the lit shader mode.
    #[inline]
    pub fn set_lit_shader_mode(&mut self, mode: LitShaderMode) {
        self.set_enabled(
            FrameSettingsField::LitShaderMode,
            mode == LitShaderMode::Deferred,
        );
    }

    /// Returns the index of the lit shader mode among its values, as shown by debug tools.
    #[inline]
    pub const fn lit_shader_mode_enum_index(&self) -> u32 {
        self.lit_shader_mode_enum_index
    }

    /// Returns the multiplier applied to diffuse global illumination.
    ///
    /// It is set by [`sanitize`](Self::sanitize).
    #[inline]
    pub const fn diffuse_global_dimmer(&self) -> f32 {
        self.diffuse_global_dimmer
    }

    /// Returns the multiplier applied to specular global illumination. It is zero when rendering
    /// reflections, so that reflection probes do not capture each other.
    ///
    /// It is set by [`sanitize`](Self::sanitize).
    #[inline]
    pub const fn specular_global_dimmer(&self) -> f32 {
        self.specular_global_dimmer
    }

    /// Returns whether the fine pruned tiled lighting is used.
    ///
    /// It always is in deferred mode, and in forward mode when
    /// [`fptl_for_forward_opaque`](Self::fptl_for_forward_opaque) is enabled. This value is not
    /// stored, and therefore can't be overridden.
    #[inline]
    pub const fn fptl(&self) -> bool {
        matches!(self.lit_shader_mode(), LitShaderMode::Deferred) || self.fptl_for_forward_opaque()
    }

    /// Replaces the fields selected by `mask` with the values of `overriding`.
    ///
    /// The other fields are left untouched. An empty mask does nothing, and a full mask makes
    /// `self` a copy of `overriding`.
    pub fn override_with(
        &mut self,
        overriding: &FrameSettings,
        mask: &FrameSettingsOverrideMask,
    ) {
        if mask.is_empty() {
            return;
        }

        if mask.is_all() {
            *self = *overriding;
            return;
        }

        let mask = mask.bits();

        self.bit_datas = (overriding.bit_datas & mask) | (self.bit_datas & !mask);

        if mask.get(FrameSettingsField::LitShaderMode as u32) {
            self.refresh_lit_shader_mode_enum_index();
        }
    }

    /// Computes the frame settings used to render a frame in `context`.
    ///
    /// The defaults for the render type of `context` are overridden by `custom`, if any, then
    /// sanitized against `context` and `pipeline_settings`.
    pub fn aggregate(
        context: &FrameContext,
        pipeline_settings: &RenderPipelineSettings,
        defaults: &DefaultFrameSettings,
        custom: Option<&CustomFrameSettings>,
    ) -> FrameSettings {
        let mut aggregated = *defaults.get(context.render_type);

        if let Some(custom) = custom {
            aggregated.override_with(&custom.settings, &custom.mask);
        }

        aggregated.sanitize(context, pipeline_settings);

        aggregated
    }

    /// Returns whether the light list is built on the asynchronous compute queue.
    #[inline]
    pub fn build_light_list_runs_async(&self, pipeline_settings: &RenderPipelineSettings) -> bool {
        self.runs_async(pipeline_settings, self.light_list_async())
    }

    /// Returns whether screen space reflections run on the asynchronous compute queue.
    #[inline]
    pub fn ssr_runs_async(&self, pipeline_settings: &RenderPipelineSettings) -> bool {
        self.runs_async(pipeline_settings, self.ssr_async())
    }

    /// Returns whether screen space ambient occlusion runs on the asynchronous compute queue.
    #[inline]
    pub fn ssao_runs_async(&self, pipeline_settings: &RenderPipelineSettings) -> bool {
        self.runs_async(pipeline_settings, self.ssao_async())
    }

    /// Returns whether contact shadows run on the asynchronous compute queue.
    #[inline]
    pub fn contact_shadows_run_async(&self, pipeline_settings: &RenderPipelineSettings) -> bool {
        self.runs_async(pipeline_settings, self.contact_shadows_async())
    }

    /// Returns whether volume voxelization runs on the asynchronous compute queue.
    #[inline]
    pub fn volume_voxelization_runs_async(
        &self,
        pipeline_settings: &RenderPipelineSettings,
    ) -> bool {
        self.runs_async(pipeline_settings, self.volume_voxelizations_async())
    }

    #[inline]
    fn runs_async(&self, pipeline_settings: &RenderPipelineSettings, sub_flag: bool) -> bool {
        pipeline_settings.supports_async_compute && self.async_compute() && sub_flag
    }

    #[inline]
    fn refresh_lit_shader_mode_enum_index(&mut self) {
        self.lit_shader_mode_enum_index = self.lit_shader_mode().to_index();
    }
}

frame_settings_accessors! {
    /// Returns whether shadows are rendered.
    shadow, set_shadow => Shadow;
    /// Returns whether contact shadows are rendered.
    contact_shadow, set_contact_shadow => ContactShadow;
    /// Returns whether shadow masks are used.
    shadow_mask, set_shadow_mask => ShadowMask;
    /// Returns whether screen space reflections are rendered.
    ssr, set_ssr => Ssr;
    /// Returns whether screen space ambient occlusion is rendered.
    ssao, set_ssao => Ssao;
    /// Returns whether subsurface scattering is rendered.
    subsurface_scattering, set_subsurface_scattering => SubsurfaceScattering;
    transmission, set_transmission => Transmission;
    /// Returns whether atmospheric scattering (fog) is rendered.
    atmospheric_scattering, set_atmospheric_scattering => AtmosphericScattering;
    volumetrics, set_volumetrics => Volumetrics;
    reprojection_for_volumetrics, set_reprojection_for_volumetrics => ReprojectionForVolumetrics;
    light_layers, set_light_layers => LightLayers;
    /// Returns whether multisample anti-aliasing is used. Only possible in forward mode.
    msaa, set_msaa => Msaa;

    transparent_prepass, set_transparent_prepass => TransparentPrepass;
    transparent_postpass, set_transparent_postpass => TransparentPostpass;
    /// Returns whether camera motion vectors are rendered.
    motion_vectors, set_motion_vectors => MotionVectors;
    /// Returns whether object motion vectors are rendered. Requires camera motion vectors.
    object_motion_vectors, set_object_motion_vectors => ObjectMotionVectors;
    /// Returns whether decals are rendered in the decal buffer.
    decals, set_decals => Decals;
    rough_refraction, set_rough_refraction => RoughRefraction;
    distortion, set_distortion => Distortion;
    postprocess, set_postprocess => Postprocess;

    depth_prepass_with_deferred_rendering, set_depth_prepass_with_deferred_rendering =>
        DepthPrepassWithDeferredRendering;
    opaque_objects, set_opaque_objects => OpaqueObjects;
    transparent_objects, set_transparent_objects => TransparentObjects;
    realtime_planar_reflection, set_realtime_planar_reflection => RealtimePlanarReflection;

    /// Returns whether work may run on the asynchronous compute queue.
    ///
    /// See also [`build_light_list_runs_async`](Self::build_light_list_runs_async) and the other
    /// predicates, which also take the platform into account.
    async_compute, set_async_compute => AsyncCompute;
    light_list_async, set_light_list_async => LightListAsync;
    ssr_async, set_ssr_async => SsrAsync;
    ssao_async, set_ssao_async => SsaoAsync;
    contact_shadows_async, set_contact_shadows_async => ContactShadowsAsync;
    volume_voxelizations_async, set_volume_voxelizations_async => VolumeVoxelizationsAsync;

    /// Returns whether the fine pruned tiled lighting is used for forward opaque objects.
    ///
    /// See [`fptl`](Self::fptl) for whether it is used at all.
    fptl_for_forward_opaque, set_fptl_for_forward_opaque => FptlForForwardOpaque;
    big_tile_prepass, set_big_tile_prepass => BigTilePrepass;
    compute_light_evaluation, set_compute_light_evaluation => ComputeLightEvaluation;
    compute_light_variants, set_compute_light_variants => ComputeLightVariants;
    compute_material_variants, set_compute_material_variants => ComputeMaterialVariants;
    tile_and_cluster, set_tile_and_cluster => TileAndCluster;
}

const CAMERA_FIELDS: [FrameSettingsField; 34] = [
    FrameSettingsField::Shadow,
    FrameSettingsField::ContactShadow,
    FrameSettingsField::ShadowMask,
    FrameSettingsField::Ssao,
    FrameSettingsField::SubsurfaceScattering,
    FrameSettingsField::Transmission,
    FrameSettingsField::AtmosphericScattering,
    FrameSettingsField::Volumetrics,
    FrameSettingsField::ReprojectionForVolumetrics,
    FrameSettingsField::LightLayers,
    FrameSettingsField::LitShaderMode,
    FrameSettingsField::TransparentPrepass,
    FrameSettingsField::TransparentPostpass,
    FrameSettingsField::MotionVectors,
    FrameSettingsField::ObjectMotionVectors,
    FrameSettingsField::Decals,
    FrameSettingsField::RoughRefraction,
    FrameSettingsField::Distortion,
    FrameSettingsField::Postprocess,
    FrameSettingsField::OpaqueObjects,
    FrameSettingsField::TransparentObjects,
    FrameSettingsField::RealtimePlanarReflection,
    FrameSettingsField::AsyncCompute,
    FrameSettingsField::LightListAsync,
    FrameSettingsField::SsrAsync,
    FrameSettingsField::SsaoAsync,
    FrameSettingsField::ContactShadowsAsync,
    FrameSettingsField::VolumeVoxelizationsAsync,
    FrameSettingsField::TileAndCluster,
    FrameSettingsField::ComputeLightEvaluation,
    FrameSettingsField::ComputeLightVariants,
    FrameSettingsField::ComputeMaterialVariants,
    FrameSettingsField::FptlForForwardOpaque,
    FrameSettingsField::BigTilePrepass,
];

const CAMERA_FIELDS_INDICES: [u32; CAMERA_FIELDS.len()] = {
    let mut indices = [0; CAMERA_FIELDS.len()];
    let mut i = 0;

    while i < CAMERA_FIELDS.len() {
        indices[i] = CAMERA_FIELDS[i] as u32;
        i += 1;
    }

    indices
};

const REALTIME_REFLECTION_EXCLUDED_INDICES: [u32; 7] = [
    FrameSettingsField::ContactShadow as u32,
    FrameSettingsField::ShadowMask as u32,
    FrameSettingsField::Ssao as u32,
    FrameSettingsField::AtmosphericScattering as u32,
    FrameSettingsField::RoughRefraction as u32,
    FrameSettingsField::Distortion as u32,
    FrameSettingsField::Postprocess as u32,
];

impl Default for FrameSettings {
    /// Returns [`FrameSettings::empty()`].
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for FrameSettings {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bit_datas == other.bit_datas
    }
}

impl Eq for FrameSettings {}

impl Hash for FrameSettings {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bit_datas.hash(state);
    }
}

impl Debug for FrameSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "FrameSettings({:?}", self.lit_shader_mode())?;

        for field in FrameSettingsField::ALL {
            if field != FrameSettingsField::LitShaderMode && self.is_enabled(field) {
                write!(f, " | {:?}", field)?;
            }
        }

        write!(f, ")")
    }
}

#[cfg(feature = "serde")]
impl Serialize for FrameSettings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.bit_datas.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for FrameSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        BitArray128::deserialize(deserializer).map(Self::from_bits)
    }
}

/// Frame settings attached to a camera, with the mask of the fields that they override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomFrameSettings {
    /// The overriding values.
    ///
    /// The default value is [`FrameSettings::CAMERA`].
    pub settings: FrameSettings,

    /// The fields of `settings` that are used.
    ///
    /// The default value is [`FrameSettingsOverrideMask::none()`].
    pub mask: FrameSettingsOverrideMask,
}

impl Default for CustomFrameSettings {
    #[inline]
    fn default() -> Self {
        Self {
            settings: FrameSettings::CAMERA,
            mask: FrameSettingsOverrideMask::none(),
        }
    }
}
