// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The rendering context that frame settings are aggregated for.

use std::{
    error::Error,
    fmt::{Display, Error as FmtError, Formatter},
};

/// The kind of rendering context, which selects the default frame settings that are used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum RenderType {
    /// A regular camera.
    #[default]
    Camera = 0,

    /// A reflection probe that is rendered once, or whose content is provided by the user.
    CustomOrBakedReflection = 1,

    /// A reflection probe that is rendered every frame.
    RealtimeReflection = 2,
}

impl RenderType {
    /// Returns whether the context renders a reflection probe.
    #[inline]
    pub const fn is_reflection(self) -> bool {
        !matches!(self, Self::Camera)
    }
}

impl TryFrom<u32> for RenderType {
    type Error = UnknownRenderTypeError;

    #[inline]
    fn try_from(val: u32) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(Self::Camera),
            1 => Ok(Self::CustomOrBakedReflection),
            2 => Ok(Self::RealtimeReflection),
            _ => Err(UnknownRenderTypeError { value: val }),
        }
    }
}

impl From<RenderType> for u32 {
    #[inline]
    fn from(val: RenderType) -> Self {
        val as u32
    }
}

/// Error that can happen when converting a raw value to a [`RenderType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownRenderTypeError {
    /// The raw value that names no render type.
    pub value: u32,
}

impl Error for UnknownRenderTypeError {}

impl Display for UnknownRenderTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "the value {} is not a known render type", self.value)
    }
}

/// Describes the context that a camera is rendered in.
///
/// These values change from one camera to the next, and sometimes from one frame to the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameContext {
    /// The kind of rendering context.
    ///
    /// The default value is [`RenderType::Camera`].
    pub render_type: RenderType,

    /// Whether the camera renders an editor preview, such as a material thumbnail.
    ///
    /// The default value is `false`.
    pub preview: bool,

    /// Whether the camera renders a reflection probe or planar reflection.
    ///
    /// The default value is `false`.
    pub reflection: bool,

    /// Whether the camera renders in stereo for a headset.
    ///
    /// The default value is `false`.
    pub stereo: bool,

    /// Whether the camera renders in wireframe mode.
    ///
    /// The default value is `false`.
    pub wireframe: bool,

    /// Whether fog is enabled in the scene view. Cameras that are not scene view cameras should
    /// leave this enabled.
    ///
    /// The default value is `true`.
    pub scene_view_fog: bool,

    pub _ne: crate::NonExhaustive,
}

impl Default for FrameContext {
    #[inline]
    fn default() -> Self {
        Self {
            render_type: RenderType::Camera,
            preview: false,
            reflection: false,
            stereo: false,
            wireframe: false,
            scene_view_fog: true,
            _ne: crate::NonExhaustive::new(),
        }
    }
}

impl FrameContext {
    /// Returns a `FrameContext` for rendering a reflection probe of the given `render_type`.
    #[inline]
    pub fn reflection_probe(render_type: RenderType) -> Self {
        Self {
            render_type,
            reflection: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameContext, RenderType, UnknownRenderTypeError};

    #[test]
    fn render_type_from_raw() {
        assert_eq!(RenderType::try_from(0), Ok(RenderType::Camera));
        assert_eq!(
            RenderType::try_from(1),
            Ok(RenderType::CustomOrBakedReflection),
        );
        assert_eq!(RenderType::try_from(2), Ok(RenderType::RealtimeReflection));
        assert_eq!(
            RenderType::try_from(3),
            Err(UnknownRenderTypeError { value: 3 }),
        );
        assert_eq!(u32::from(RenderType::RealtimeReflection), 2);
    }

    #[test]
    fn default_context() {
        let context = FrameContext::default();

        assert_eq!(context.render_type, RenderType::Camera);
        assert!(context.scene_view_fog);
        assert!(!(context.preview || context.reflection || context.stereo || context.wireframe));
    }

    #[test]
    fn reflection_probe_context() {
        let context = FrameContext::reflection_probe(RenderType::RealtimeReflection);

        assert!(context.reflection);
        assert!(context.render_type.is_reflection());
        assert!(!RenderType::Camera.is_reflection());
    }
}
