// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configuration of the render pipeline, shared by every camera.
//!
//! [`RenderPipelineSettings`] describes what the platform and the project support. Frame settings
//! are sanitized against it, so a feature that is not supported is never enabled, whatever the
//! defaults or custom settings ask for.

use crate::{context::RenderType, frame_settings::FrameSettings};

/// The lit shader modes that the pipeline compiles shaders for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupportedLitShaderMode {
    /// Only forward shaders are available.
    ForwardOnly,

    /// Only deferred shaders are available.
    DeferredOnly,

    /// Both are available, and each camera chooses.
    #[default]
    Both,
}

/// Describes the features supported by the render pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderPipelineSettings {
    /// The lit shader modes that are available.
    ///
    /// The default value is [`SupportedLitShaderMode::Both`].
    pub supported_lit_shader_mode: SupportedLitShaderMode,

    /// Whether shadow masks are supported.
    ///
    /// The default value is `true`.
    pub support_shadow_mask: bool,

    /// Whether screen space reflections are supported.
    ///
    /// The default value is `true`.
    pub support_ssr: bool,

    /// Whether screen space ambient occlusion is supported.
    ///
    /// The default value is `true`.
    pub support_ssao: bool,

    /// Whether subsurface scattering is supported.
    ///
    /// The default value is `true`.
    pub support_subsurface_scattering: bool,

    /// Whether volumetrics are supported.
    ///
    /// The default value is `true`.
    pub support_volumetrics: bool,

    /// Whether light layers are supported.
    ///
    /// The default value is `true`.
    pub support_light_layers: bool,

    /// Whether transparent objects can write depth before the main pass.
    ///
    /// The default value is `true`.
    pub support_transparent_depth_prepass: bool,

    /// Whether transparent objects can write depth after the main pass.
    ///
    /// The default value is `true`.
    pub support_transparent_depth_postpass: bool,

    /// Whether motion vectors are supported.
    ///
    /// The default value is `true`.
    pub support_motion_vectors: bool,

    /// Whether decals are supported.
    ///
    /// The default value is `true`.
    pub support_decals: bool,

    /// Whether distortion is supported.
    ///
    /// The default value is `true`.
    pub support_distortion: bool,

    /// Whether multisample anti-aliasing is supported. It is only ever used in forward mode.
    ///
    /// The default value is `true`.
    pub support_msaa: bool,

    /// Whether the platform has an asynchronous compute queue.
    ///
    /// The default value is `true`.
    pub supports_async_compute: bool,

    /// Whether rendering for a headset is enabled.
    ///
    /// The default value is `false`.
    pub xr_enabled: bool,

    #[cfg_attr(feature = "serde", serde(skip, default = "crate::NonExhaustive::new"))]
    pub _ne: crate::NonExhaustive,
}

impl Default for RenderPipelineSettings {
    #[inline]
    fn default() -> Self {
        Self {
            supported_lit_shader_mode: SupportedLitShaderMode::Both,
            support_shadow_mask: true,
            support_ssr: true,
            support_ssao: true,
            support_subsurface_scattering: true,
            support_volumetrics: true,
            support_light_layers: true,
            support_transparent_depth_prepass: true,
            support_transparent_depth_postpass: true,
            support_motion_vectors: true,
            support_decals: true,
            support_distortion: true,
            support_msaa: true,
            supports_async_compute: true,
            xr_enabled: false,
            _ne: crate::NonExhaustive::new(),
        }
    }
}

impl RenderPipelineSettings {
    /// Returns settings where nothing optional is supported, and only forward shaders are
    /// available.
    #[inline]
    pub fn minimal() -> Self {
        Self {
            supported_lit_shader_mode: SupportedLitShaderMode::ForwardOnly,
            support_shadow_mask: false,
            support_ssr: false,
            support_ssao: false,
            support_subsurface_scattering: false,
            support_volumetrics: false,
            support_light_layers: false,
            support_transparent_depth_prepass: false,
            support_transparent_depth_postpass: false,
            support_motion_vectors: false,
            support_decals: false,
            support_distortion: false,
            support_msaa: false,
            supports_async_compute: false,
            xr_enabled: false,
            _ne: crate::NonExhaustive::new(),
        }
    }
}

/// The frame settings used by each kind of rendering context, before any custom override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefaultFrameSettings {
    /// Used for [`RenderType::Camera`].
    ///
    /// The default value is [`FrameSettings::CAMERA`].
    pub camera: FrameSettings,

    /// Used for [`RenderType::CustomOrBakedReflection`].
    ///
    /// The default value is [`FrameSettings::CUSTOM_OR_BAKED_REFLECTION_PROBE`].
    pub custom_or_baked_reflection: FrameSettings,

    /// Used for [`RenderType::RealtimeReflection`].
    ///
    /// The default value is [`FrameSettings::REALTIME_REFLECTION_PROBE`].
    pub realtime_reflection: FrameSettings,
}

impl Default for DefaultFrameSettings {
    #[inline]
    fn default() -> Self {
        Self {
            camera: FrameSettings::CAMERA,
            custom_or_baked_reflection: FrameSettings::CUSTOM_OR_BAKED_REFLECTION_PROBE,
            realtime_reflection: FrameSettings::REALTIME_REFLECTION_PROBE,
        }
    }
}

impl DefaultFrameSettings {
    /// Returns the frame settings used for `render_type`.
    #[inline]
    pub fn get(&self, render_type: RenderType) -> &FrameSettings {
        match render_type {
            RenderType::Camera => &self.camera,
            RenderType::CustomOrBakedReflection => &self.custom_or_baked_reflection,
            RenderType::RealtimeReflection => &self.realtime_reflection,
        }
    }

    /// Returns the frame settings used for `render_type`, for modification.
    #[inline]
    pub fn get_mut(&mut self, render_type: RenderType) -> &mut FrameSettings {
        match render_type {
            RenderType::Camera => &mut self.camera,
            RenderType::CustomOrBakedReflection => &mut self.custom_or_baked_reflection,
            RenderType::RealtimeReflection => &mut self.realtime_reflection,
        }
    }
}
